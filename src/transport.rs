use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, REFERER},
    StatusCode,
};
use serde_json::Value;

/// The only way the crate talks to the network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Posts a urlencoded form and reports the status; the body is ignored.
    async fn post_form(&self, url: &str, form: &[(&str, &str)], referer: &str)
        -> Result<StatusCode>;

    async fn post_json(&self, url: &str, headers: HeaderMap, body: &Value) -> Result<Value>;

    async fn get_json(&self, url: &str) -> Result<Value>;
}

/// `reqwest` backed transport. Cookies set by the login call are replayed on
/// every later request, which is what keeps the session authenticated.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .gzip(true)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        referer: &str,
    ) -> Result<StatusCode> {
        let res = self
            .client
            .post(url)
            .header(REFERER, referer)
            .form(form)
            .send()
            .await?;
        Ok(res.status())
    }

    async fn post_json(&self, url: &str, headers: HeaderMap, body: &Value) -> Result<Value> {
        let res = self
            .client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            return Err(Error::Status(status));
        }
        Ok(res.json().await?)
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        let res = self.client.get(url).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(Error::Status(status));
        }
        Ok(res.json().await?)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use serde_json::json;
    use std::{
        collections::{HashMap, VecDeque},
        sync::Mutex,
    };

    /// How the scripted login endpoint answers one attempt.
    #[derive(Debug, Clone, Copy)]
    pub enum LoginReply {
        Refused,
        Status(u16),
    }

    /// Scripted remote: answers from in-memory tables and records every call
    /// as `"<operation>:<key>"`.
    #[derive(Debug, Default)]
    pub struct FakeTransport {
        pub account: Option<String>,
        pub login_replies: Mutex<VecDeque<LoginReply>>,
        pub lists: HashMap<String, Vec<Value>>,
        pub questions: HashMap<String, Value>,
        pub submissions: HashMap<String, Vec<Value>>,
        pub details: HashMap<String, Value>,
        /// Detail replies served in order before falling back to `details`.
        pub detail_replies: Mutex<HashMap<String, VecDeque<Value>>>,
        pub broken_slugs: Vec<String>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        pub fn signed_in(account: &str) -> Self {
            Self {
                account: Some(account.to_string()),
                ..Default::default()
            }
        }

        pub fn with_login_replies(self, replies: &[LoginReply]) -> Self {
            *self.login_replies.lock().unwrap() = replies.iter().copied().collect();
            self
        }

        /// Registers an accepted problem with one accepted submission whose
        /// detail is available.
        pub fn with_problem(mut self, book: &str, qid: &str, slug: &str, title: &str) -> Self {
            self.lists.entry(book.to_string()).or_default().push(json!({
                "stat": {
                    "frontend_question_id": qid,
                    "question__title": title,
                    "question__title_slug": slug,
                },
                "status": "ac",
            }));
            self.questions.insert(
                slug.to_string(),
                json!({
                    "title": title,
                    "translatedTitle": title,
                    "translatedContent": format!("<p>{title}</p>"),
                    "difficulty": "Easy",
                }),
            );
            let id = format!("{slug}-ac");
            self.submissions.insert(
                slug.to_string(),
                vec![
                    json!({"id": format!("{slug}-wa"), "statusDisplay": "Wrong Answer",
                           "lang": "cpp", "url": format!("/submissions/detail/{slug}-wa/")}),
                    json!({"id": id, "statusDisplay": "Accepted", "lang": "cpp",
                           "url": format!("/submissions/detail/{id}/")}),
                ],
            );
            self.details
                .insert(id, json!({"code": format!("// {slug}\n")}));
            self
        }

        pub fn with_detail_replies(self, id: &str, replies: Vec<Value>) -> Self {
            self.detail_replies
                .lock()
                .unwrap()
                .insert(id.to_string(), replies.into_iter().collect());
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn count(&self, prefix: &str) -> usize {
            self.calls()
                .iter()
                .filter(|c| c.starts_with(prefix))
                .count()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn post_form(
            &self,
            _url: &str,
            _form: &[(&str, &str)],
            _referer: &str,
        ) -> Result<StatusCode> {
            self.record("login".to_string());
            match self.login_replies.lock().unwrap().pop_front() {
                Some(LoginReply::Refused) => Err(Error::Status(StatusCode::BAD_GATEWAY)),
                Some(LoginReply::Status(code)) => {
                    Ok(StatusCode::from_u16(code).unwrap_or(StatusCode::OK))
                }
                None => Ok(StatusCode::OK),
            }
        }

        async fn post_json(&self, _url: &str, _headers: HeaderMap, body: &Value) -> Result<Value> {
            let op = body["operationName"].as_str().unwrap_or_default();
            let vars = &body["variables"];
            let data = match op {
                "userStatus" => {
                    self.record("userStatus".to_string());
                    json!({"userStatus": {"userSlug": self.account}})
                }
                "questionData" => {
                    let slug = vars["titleSlug"].as_str().unwrap_or_default();
                    self.record(format!("questionData:{slug}"));
                    json!({"question": self.questions.get(slug)})
                }
                "submissions" => {
                    let slug = vars["questionSlug"].as_str().unwrap_or_default();
                    self.record(format!("submissions:{slug}"));
                    if self.broken_slugs.iter().any(|s| s == slug) {
                        return Err(Error::Status(StatusCode::SERVICE_UNAVAILABLE));
                    }
                    let list = self.submissions.get(slug).cloned().unwrap_or_default();
                    json!({"submissionList": {"submissions": list}})
                }
                "mySubmissionDetail" => {
                    let id = vars["id"].as_str().unwrap_or_default();
                    self.record(format!("mySubmissionDetail:{id}"));
                    let queued = self
                        .detail_replies
                        .lock()
                        .unwrap()
                        .get_mut(id)
                        .and_then(|q| q.pop_front());
                    let detail = queued.or_else(|| self.details.get(id).cloned());
                    json!({ "submissionDetail": detail })
                }
                other => panic!("unexpected operation {other}"),
            };
            Ok(json!({ "data": data }))
        }

        async fn get_json(&self, url: &str) -> Result<Value> {
            let book = url
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string();
            self.record(format!("list:{book}"));
            let pairs = self.lists.get(&book).cloned().unwrap_or_default();
            Ok(json!({ "stat_status_pairs": pairs }))
        }
    }
}
