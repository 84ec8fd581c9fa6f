use derive_builder::Builder;
use std::{path::PathBuf, time::Duration};

pub const DEFAULT_BASE_URL: &str = "https://leetcode-cn.com/";
pub const DEFAULT_LOGIN_ATTEMPTS: u32 = 3;
pub const DEFAULT_LOGIN_INTERVAL: Duration = Duration::from_secs(5);

/// Knobs for a grasp run. Everything except the save root has a sane default.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct GraspConfig {
    #[builder(default = "PathBuf::from(\"problems\")")]
    pub save_root: PathBuf,
    /// Re-fetch problems that already have a folder on disk.
    #[builder(default)]
    pub force: bool,
    /// Ask the remote for the full field set of every query.
    #[builder(default)]
    pub verbose: bool,
    #[builder(default = "20")]
    pub submission_attempts: u32,
    #[builder(default = "Duration::from_secs(3)")]
    pub submission_interval: Duration,
    #[builder(default = "50")]
    pub page_size: u32,
}

impl GraspConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.submission_attempts {
            Some(n) if n < 3 => Err(format!("submission_attempts must be at least 3, got {n}")),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_should_fill_defaults() {
        let config = GraspConfigBuilder::default().build().unwrap();
        assert_eq!(config.save_root, PathBuf::from("problems"));
        assert!(!config.force);
        assert_eq!(config.submission_attempts, 20);
        assert_eq!(config.submission_interval, Duration::from_secs(3));
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn builder_should_reject_too_few_submission_attempts() {
        let err = GraspConfigBuilder::default()
            .submission_attempts(2u32)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("at least 3"));
    }
}
