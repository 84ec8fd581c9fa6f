use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// A named collection of problems on the remote site.
///
/// Declaration order is the order `all` walks the books in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, EnumIter, Display,
)]
pub enum Book {
    #[strum(serialize = "algorithms")]
    #[serde(rename = "algorithms")]
    Algorithms,
    #[strum(serialize = "database")]
    #[serde(rename = "database")]
    Database,
    #[strum(serialize = "shell")]
    #[serde(rename = "shell")]
    Shell,
    #[strum(serialize = "concurrency")]
    #[serde(rename = "concurrency")]
    Concurrency,
    #[strum(to_string = "lcci", serialize = "interview-classics")]
    #[serde(rename = "lcci")]
    Lcci,
    #[strum(to_string = "lcof", serialize = "offer-prep")]
    #[serde(rename = "lcof")]
    Lcof,
}

/// What the user asked to grasp: one book, or every book in sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSelector {
    All,
    One(Book),
}

impl BookSelector {
    pub fn books(self) -> Vec<Book> {
        match self {
            BookSelector::All => Book::iter().collect(),
            BookSelector::One(book) => vec![book],
        }
    }
}

impl FromStr for BookSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(BookSelector::All);
        }
        Book::from_str(s)
            .map(BookSelector::One)
            .map_err(|_| Error::UnknownBook(s.to_string()))
    }
}
