use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use inquire::autocompletion::Replacement;
use inquire::{Autocomplete, CustomUserError};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PATTERN: Regex = Regex::new(r"\b[A-Z][A-Z0-9_]+-\d+\b").unwrap();
    static ref EXACT: Regex = Regex::new(r"^[A-Z][A-Z0-9_]+-\d+$").unwrap();
    static ref COMMIT_PATTERN: Regex =
        Regex::new(r"^(?:\[([A-Z][A-Z0-9_]+-\d+)\]|([A-Z][A-Z0-9_]+-\d+)\b)").unwrap();
}

/// Prefixes of standard names that look like issue keys (UTF-8, SHA-256, ISO-8601)
const NON_ISSUE_PREFIXES: &[&str] = &[
    "UTF", "SHA", "ISO", "RFC", "CVE", "AES", "RSA", "MD", "TLS", "SSL", "HTTP", "IPV",
];

fn is_standard_name(key: &str) -> bool {
    key.split('-')
        .next()
        .map_or(false, |prefix| NON_ISSUE_PREFIXES.contains(&prefix))
}

/// Returns true if the whole input is an issue key (e.g., "PROJ-123")
pub fn is_valid(key: &str) -> bool {
    EXACT.is_match(key)
}

/// Trim and uppercase user input, returning it if it is a valid key
pub fn normalize(input: &str) -> Option<String> {
    let key = input.trim().to_uppercase();
    is_valid(&key).then_some(key)
}

/// Extract the first issue key from a string
/// (e.g., "feature/PROJ-123-login" -> "PROJ-123")
pub fn extract_from_str(message: &str) -> Option<String> {
    PATTERN
        .find_iter(message)
        .map(|m| m.as_str())
        .find(|key| !is_standard_name(key))
        .map(str::to_string)
}

/// Extract an issue key from a commit summary
///
/// Only a leading key counts, bare or bracketed
/// ("PROJ-7: Add endpoint", "[OPS-9]: Rotate keys"); keys mentioned
/// mid-sentence are ignored.
pub fn extract_from_commit(summary: &str) -> Option<String> {
    let caps = COMMIT_PATTERN.captures(summary.trim_start())?;
    let key = caps.get(1).or_else(|| caps.get(2))?.as_str();
    (!is_standard_name(key)).then(|| key.to_string())
}

/// Validator for issue key input
pub fn validator(key: &str) -> Result<inquire::validator::Validation, CustomUserError> {
    if normalize(key).is_some() {
        Ok(inquire::validator::Validation::Valid)
    } else {
        Ok(inquire::validator::Validation::Invalid(
            "This does not look like a valid issue key (e.g., PROJ-123)".into(),
        ))
    }
}

/// Recently viewed issue keys, most recent first, persisted one per line
#[derive(Debug, Clone)]
pub struct RecentIssues {
    file: PathBuf,
    keys: Vec<String>,
    limit: usize,
}

impl Autocomplete for RecentIssues {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        let input = input.to_uppercase();
        Ok(self
            .keys
            .iter()
            .filter(|key| key.starts_with(&input))
            .cloned()
            .collect())
    }

    fn get_completion(
        &mut self,
        input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        if highlighted_suggestion.is_some() {
            return Ok(highlighted_suggestion);
        }
        let input = input.to_uppercase();
        Ok(self.keys.iter().find(|key| key.starts_with(&input)).cloned())
    }
}

impl RecentIssues {
    /// Load keys from a file, or start empty if the file doesn't exist
    ///
    /// Lines that are not valid keys are dropped; at most `limit` are kept.
    pub fn from_file<P: AsRef<Path>>(path: P, limit: usize) -> std::io::Result<Self> {
        let path = path.as_ref();

        let mut keys = Vec::new();
        if path.exists() {
            let mut contents = String::new();
            std::fs::File::open(path)?.read_to_string(&mut contents)?;

            keys = contents
                .lines()
                .map(str::trim)
                .filter(|line| is_valid(line))
                .map(str::to_string)
                .collect();
            keys.truncate(limit);
        }

        Ok(Self {
            file: path.to_path_buf(),
            keys,
            limit,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.keys.iter()
    }

    /// The most recently used key, if any
    pub fn latest(&self) -> Option<&str> {
        self.keys.first().map(String::as_str)
    }

    /// Move a key to the front, dropping duplicates and the oldest overflow
    pub fn add(&mut self, key: &str) {
        self.keys.retain(|k| k != key);
        self.keys.insert(0, key.to_string());
        self.keys.truncate(self.limit);
    }

    pub fn save(&self) -> std::io::Result<()> {
        let mut file = std::fs::File::create(&self.file)?;
        for key in &self.keys {
            file.write_all(key.as_bytes())?;
            file.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Add a key and immediately save to file
    pub fn add_and_save(&mut self, key: &str) -> std::io::Result<()> {
        self.add(key);
        self.save()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
