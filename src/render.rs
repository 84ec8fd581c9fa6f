use crate::{book::Book, error::Result};
use askama::Template;
use std::str::FromStr;
use strum::EnumString;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[default]
    #[strum(disabled)]
    Unknown,
}

impl Difficulty {
    pub fn parse(s: Option<&str>) -> Self {
        s.and_then(|s| Difficulty::from_str(s).ok())
            .unwrap_or_default()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "简单",
            Difficulty::Medium => "中等",
            Difficulty::Hard => "困难",
            Difficulty::Unknown => "未知",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Difficulty::Easy => "#5AB726",
            Difficulty::Medium => "#FFA119",
            Difficulty::Hard => "#EF4743",
            Difficulty::Unknown => "#595959",
        }
    }
}

#[derive(Debug, Template)]
#[template(path = "problem.html.j2")]
pub struct StatementPage<'a> {
    pub heading: String,
    pub difficulty: Difficulty,
    pub content: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub qid: String,
    pub title: String,
    /// Links relative to the book directory, already percent-encoded.
    pub statement_href: String,
    pub solution_href: String,
}

#[derive(Debug, Template)]
#[template(path = "index.html.j2")]
pub struct IndexPage {
    pub book: Book,
    pub entries: Vec<IndexEntry>,
}

impl<'a> StatementPage<'a> {
    pub fn new(qid: &str, title: &str, difficulty: Difficulty, content: &'a str) -> Self {
        Self {
            heading: format!("{qid} - {title}"),
            difficulty,
            content,
        }
    }

    pub fn generate(&self) -> Result<String> {
        Ok(self.render()?)
    }
}

impl IndexPage {
    pub fn generate(&self) -> Result<String> {
        Ok(self.render()?)
    }
}

/// Joins path segments into a relative href, encoding each one.
pub fn href<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    segments
        .into_iter()
        .map(|s| urlencoding::encode(s).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
