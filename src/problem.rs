use crate::{api::ProblemList, book::Book};
use std::{cmp::Ordering, collections::HashSet};

/// One accepted problem of a book listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemSummary {
    pub qid: String,
    /// Source-language title, only used in log lines.
    pub title: String,
    pub slug: String,
    pub grasped: bool,
    pub translated_title: Option<String>,
}

impl ProblemSummary {
    pub fn new(qid: impl Into<String>, title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            qid: qid.into(),
            title: title.into(),
            slug: slug.into(),
            grasped: false,
            translated_title: None,
        }
    }

    /// Marks the problem saved under `translated_title`.
    pub fn mark_grasped(&mut self, translated_title: String) {
        self.translated_title = Some(translated_title);
        self.grasped = true;
    }
}

/// State of one book while it is being grasped. Built fresh from every listing.
#[derive(Debug)]
pub struct BookGraspContext {
    pub book: Book,
    pub problems: Vec<ProblemSummary>,
}

impl BookGraspContext {
    /// Keeps accepted entries only, at most one per qid, in listing order.
    /// Rows without a slug cannot be queried and are dropped.
    pub fn from_listing(book: Book, list: ProblemList) -> Self {
        let mut seen = HashSet::new();
        let problems = list
            .stat_status_pairs
            .into_iter()
            .filter(|p| p.status.as_deref() == Some("ac"))
            .filter_map(|p| {
                let slug = p.stat.title_slug.filter(|s| !s.is_empty())?;
                let title = p.stat.title.unwrap_or_else(|| slug.clone());
                Some(ProblemSummary::new(p.stat.frontend_question_id, title, slug))
            })
            .filter(|p| seen.insert(p.qid.clone()))
            .collect();
        Self { book, problems }
    }

    /// Grasped problems in ascending numeric qid order.
    pub fn grasped(&self) -> Vec<&ProblemSummary> {
        let mut grasped: Vec<_> = self.problems.iter().filter(|p| p.grasped).collect();
        grasped.sort_by(|a, b| compare_qid(&a.qid, &b.qid));
        grasped
    }
}

/// Numeric ids sort by value; ids that are not plain numbers (`"LCP 01"`)
/// follow them, lexicographically.
pub fn compare_qid(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
