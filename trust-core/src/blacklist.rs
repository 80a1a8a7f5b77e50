//! Keyword blacklist scanning.
//!
//! Matching is case-insensitive and respects word boundaries, so "scam"
//! matches "Total SCAM!" but not "scampi".

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// A keyword found in scanned text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct BlacklistMatch {
    pub keyword: String,
}

/// Maintained list of blocked keywords and phrases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordList {
    keywords: Vec<String>,
}

impl KeywordList {
    /// Build a list, normalizing case and dropping blanks and duplicates.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !normalized.contains(&keyword) {
                normalized.push(keyword);
            }
        }
        Self { keywords: normalized }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Every listed keyword present in `text`, in list order.
    pub fn scan(&self, text: &str) -> Vec<BlacklistMatch> {
        let haystack = text.to_lowercase();
        self.keywords
            .iter()
            .filter(|keyword| contains_word(&haystack, keyword))
            .map(|keyword| BlacklistMatch {
                keyword: keyword.clone(),
            })
            .collect()
    }
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
