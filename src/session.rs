use crate::{
    api::{Envelope, QueryBody, UserStatusData},
    book::Book,
    error::Result,
    transport::Transport,
};
use reqwest::header::{HeaderMap, HeaderValue, CONNECTION, CONTENT_TYPE, REFERER};
use serde::de::DeserializeOwned;
use std::{fmt, time::Duration};
use tracing::{debug, info, warn};

pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// URLs of the remote site, all derived from one base.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self { base }
    }

    pub fn sign_in(&self) -> String {
        format!("{}accounts/login/", self.base)
    }

    pub fn query(&self) -> String {
        format!("{}graphql/", self.base)
    }

    pub fn problem_list(&self, book: Book) -> String {
        format!("{}api/problems/{}/", self.base, book)
    }

    pub fn problem(&self, slug: &str) -> String {
        format!("{}problems/{}/", self.base, slug)
    }

    pub fn submissions(&self, slug: &str) -> String {
        format!("{}problems/{}/submissions/", self.base, slug)
    }

    /// `path` is the site-relative url a submission entry carries.
    pub fn site(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }
}

/// One authenticated connection to the remote site.
///
/// `signed_in` and `account` only change through [`Session::login`] and
/// [`Session::logout`].
#[derive(Debug)]
pub struct Session<T> {
    transport: T,
    endpoints: Endpoints,
    signed_in: bool,
    account: Option<String>,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            endpoints: Endpoints::new(base_url),
            signed_in: false,
            account: None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.signed_in
    }

    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Signs in and confirms the server accepted the credentials.
    ///
    /// Network failures and non-success statuses are retried up to
    /// `max_attempts` times, `retry_interval` apart. A login the server
    /// answers but whose identity check comes back empty means the
    /// credentials were rejected, and fails at once.
    pub async fn login(
        &mut self,
        credentials: &Credentials,
        max_attempts: u32,
        retry_interval: Duration,
    ) -> bool {
        let sign_in = self.endpoints.sign_in();
        let form = [
            ("login", credentials.login.as_str()),
            ("password", credentials.password.as_str()),
        ];

        for attempt in 1..=max_attempts {
            let outcome = match self.transport.post_form(&sign_in, &form, &sign_in).await {
                Ok(status) if status.is_success() => self.verify().await.map(Some),
                Ok(status) => {
                    warn!(%status, attempt, "login failed, not OK response from server");
                    Ok(None)
                }
                Err(e) => Err(e),
            };

            match outcome {
                Ok(Some(Some(account))) => {
                    info!("login successfully, welcome {account}");
                    self.account = Some(account);
                    self.signed_in = true;
                    return true;
                }
                Ok(Some(None)) => {
                    warn!("login failed, wrong login or password");
                    return false;
                }
                Ok(None) => {}
                Err(e) => warn!(attempt, "login failed, connection error: {e}"),
            }

            if attempt < max_attempts {
                info!("retry login in {:.1} seconds", retry_interval.as_secs_f32());
                tokio::time::sleep(retry_interval).await;
            }
        }

        warn!("login failed after {max_attempts} attempts");
        false
    }

    pub fn logout(&mut self) {
        self.signed_in = false;
        self.account = None;
    }

    /// Asks the server who we are. `None` means it does not consider this
    /// session authenticated.
    async fn verify(&self) -> Result<Option<String>> {
        let data: Option<UserStatusData> = self
            .query(&self.endpoints.query(), &QueryBody::user_status())
            .await?;
        Ok(data
            .and_then(|d| d.user_status)
            .and_then(|s| s.user_slug))
    }

    /// Posts one query and unwraps the `data` envelope. A null or absent
    /// `data` comes back as `Ok(None)`.
    pub async fn query<R: DeserializeOwned>(
        &self,
        referer: &str,
        body: &QueryBody,
    ) -> Result<Option<R>> {
        debug!(operation = body.operation_name, "query");
        let body = serde_json::to_value(body)?;
        let value = self
            .transport
            .post_json(&self.endpoints.query(), json_headers(referer), &body)
            .await?;
        let envelope: Envelope<R> = serde_json::from_value(value)?;
        Ok(envelope.data)
    }

    pub async fn get<R: DeserializeOwned>(&self, url: &str) -> Result<R> {
        debug!(url, "get");
        let value = self.transport.get_json(url).await?;
        Ok(serde_json::from_value(value)?)
    }
}

fn json_headers(referer: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(value) = HeaderValue::from_str(referer) {
        headers.insert(REFERER, value);
    }
    headers
}
