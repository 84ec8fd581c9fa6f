//! On-disk layout of grasped problems. The folder names double as resume state:
//!
//! ```text
//! {root}/{book}/{qid} - {title}/{title}.html
//! {root}/{book}/{qid} - {title}/{title}.{ext}
//! {root}/{book}/题目与题解汇总.html
//! ```

use crate::{
    book::Book,
    error::{Error, Result},
    lang::Language,
};
use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

pub const SEPARATOR: &str = " - ";
pub const STATEMENT_EXT: &str = "html";
pub const INDEX_FILE_NAME: &str = "题目与题解汇总";

/// Percent-encodes the characters a path component cannot carry, plus `%`
/// itself so [`unescape_title`] can reverse it exactly.
pub fn escape_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for ch in title.chars() {
        if matches!(ch, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '%') || ch.is_control()
        {
            let mut buf = [0u8; 4];
            for byte in ch.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{byte:02X}"));
            }
        } else {
            out.push(ch);
        }
    }
    out
}

pub fn unescape_title(name: &str) -> String {
    urlencoding::decode(name)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| name.to_string())
}

pub fn folder_name(qid: &str, title: &str) -> String {
    format!("{qid}{SEPARATOR}{}", escape_title(title))
}

/// Splits `"{qid} - {title}"` at the first separator. Both halves must be
/// non-empty; the title is unescaped.
pub fn parse_folder_name(name: &str) -> Option<(String, String)> {
    let (qid, title) = name.split_once(SEPARATOR)?;
    if qid.is_empty() || title.is_empty() {
        return None;
    }
    Some((qid.to_string(), unescape_title(title)))
}

#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn book_dir(&self, book: Book) -> PathBuf {
        self.root.join(book.to_string())
    }

    pub fn problem_dir(&self, book: Book, qid: &str, title: &str) -> PathBuf {
        self.book_dir(book).join(folder_name(qid, title))
    }

    pub fn index_path(&self, book: Book) -> PathBuf {
        self.book_dir(book)
            .join(format!("{INDEX_FILE_NAME}.{STATEMENT_EXT}"))
    }

    /// Titles of every problem folder in the book, keyed by qid. When one qid
    /// has several folders the first by name wins. Hidden entries, such as
    /// unfinished staging folders, are ignored.
    pub fn grasped_titles(&self, book: Book) -> Result<HashMap<String, String>> {
        let entries = match fs::read_dir(self.book_dir(book)) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = vec![];
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if !name.starts_with('.') {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();

        let mut titles = HashMap::new();
        for (qid, title) in names.iter().filter_map(|n| parse_folder_name(n)) {
            titles.entry(qid).or_insert(title);
        }
        Ok(titles)
    }

    /// Writes the statement page and the solution source into a hidden staging
    /// folder, then renames it to the problem's folder, replacing any previous
    /// one. An interrupted save never leaves a folder that looks grasped.
    pub fn save_problem(
        &self,
        book: Book,
        qid: &str,
        title: &str,
        statement: &str,
        code: &str,
        lang: Language,
    ) -> Result<PathBuf> {
        let dir = self.problem_dir(book, qid, title);
        let staging = self
            .book_dir(book)
            .join(format!(".{}.partial", folder_name(qid, title)));
        if staging.exists() {
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir_all(&staging)?;

        let file_stem = escape_title(title);
        fs::write(staging.join(format!("{file_stem}.{STATEMENT_EXT}")), statement)?;
        fs::write(staging.join(format!("{file_stem}.{}", lang.extension())), code)?;

        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        fs::rename(&staging, &dir)?;
        Ok(dir)
    }

    pub fn write_index(&self, book: Book, html: &str) -> Result<PathBuf> {
        let path = self.index_path(book);
        fs::create_dir_all(self.book_dir(book))?;
        fs::write(&path, html)?;
        Ok(path)
    }
}

/// The one file in a problem folder that is not the statement page.
pub fn solution_file(folder: &Path) -> Result<PathBuf> {
    let mut found = vec![];
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        let is_statement = path.extension().and_then(|e| e.to_str()) == Some(STATEMENT_EXT);
        if path.is_file() && !is_statement {
            found.push(path);
        }
    }
    match found.len() {
        1 => Ok(found.remove(0)),
        count => Err(Error::SolutionFile {
            path: folder.to_path_buf(),
            count,
        }),
    }
}
