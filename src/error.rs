use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded with {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("render error: {0}")]
    Template(#[from] askama::Error),

    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    #[error("unknown book: {0}")]
    UnknownBook(String),

    #[error("not signed in")]
    NotSignedIn,

    #[error("no accepted submission for {0}")]
    NoAcceptedSubmission(String),

    #[error("submission detail for {slug} still empty after {attempts} attempts")]
    SubmissionUnavailable { slug: String, attempts: u32 },

    #[error("problem detail for {0} is not available")]
    QuestionUnavailable(String),

    #[error("expected exactly one solution file in {}, found {count}", path.display())]
    SolutionFile { path: PathBuf, count: usize },
}

impl Error {
    /// Failures that stop a grasp before any problem work starts. They are
    /// already reported where they occur.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Error::NotSignedIn | Error::UnknownBook(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
