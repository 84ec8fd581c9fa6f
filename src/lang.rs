use crate::error::{Error, Result};
use std::str::FromStr;
use strum::EnumString;

/// Submission languages, keyed by the tag the remote reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    Cpp,
    Java,
    Python,
    Python3,
    C,
    CSharp,
    JavaScript,
    Ruby,
    Swift,
    Golang,
    Scala,
    Kotlin,
    Rust,
    Php,
    TypeScript,
    Racket,
    MySql,
    MsSql,
    OracleSql,
    Bash,
}

impl Language {
    pub fn from_tag(tag: &str) -> Result<Self> {
        Language::from_str(tag).map_err(|_| Error::UnknownLanguage(tag.to_string()))
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::Cpp => "C++",
            Language::Java => "JAVA",
            Language::Python => "Python",
            Language::Python3 => "Python3",
            Language::C => "C",
            Language::CSharp => "C#",
            Language::JavaScript => "JavaScript",
            Language::Ruby => "Ruby",
            Language::Swift => "Swift",
            Language::Golang => "Go",
            Language::Scala => "Scala",
            Language::Kotlin => "Kotlin",
            Language::Rust => "Rust",
            Language::Php => "PHP",
            Language::TypeScript => "TypeScript",
            Language::Racket => "Racket",
            Language::MySql => "MySQL",
            Language::MsSql => "MS SQL Server",
            Language::OracleSql => "Oracle",
            Language::Bash => "Bash",
        }
    }

    /// File extension of a saved solution, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::Python | Language::Python3 => "py",
            Language::C => "c",
            Language::CSharp => "cs",
            Language::JavaScript => "js",
            Language::Ruby => "rb",
            Language::Swift => "swift",
            Language::Golang => "go",
            Language::Scala => "scl",
            Language::Kotlin => "kt",
            Language::Rust => "rs",
            Language::Php => "php",
            Language::TypeScript => "ts",
            Language::Racket => "rkt",
            Language::MySql | Language::MsSql | Language::OracleSql => "sql",
            Language::Bash => "sh",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_should_map_to_name_and_extension() {
        let cases = [
            ("cpp", "C++", "cpp"),
            ("python3", "Python3", "py"),
            ("golang", "Go", "go"),
            ("csharp", "C#", "cs"),
            ("mysql", "MySQL", "sql"),
            ("bash", "Bash", "sh"),
        ];
        for (tag, name, ext) in cases {
            let lang = Language::from_tag(tag).unwrap();
            assert_eq!(lang.display_name(), name);
            assert_eq!(lang.extension(), ext);
        }
    }

    #[test]
    fn unmapped_tag_should_fail_loudly() {
        let err = Language::from_tag("brainfuck").unwrap_err();
        assert!(matches!(err, Error::UnknownLanguage(tag) if tag == "brainfuck"));
    }
}
