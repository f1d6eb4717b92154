//! HTTP fetch + whole-word count: the production per-item operation.

use anyhow::{Context, Result};
use regex::bytes::Regex;
use std::time::Duration;

use crate::Counter;

/// Fetches a URL and counts whole-word occurrences of one search term in the body.
#[derive(Clone, Debug)]
pub struct WordCounter {
    client: reqwest::blocking::Client,
    pattern: Regex,
}

/// Whole-word pattern for `word` with ASCII word boundaries. The word is escaped, so `a.b`
/// matches literally.
pub fn word_pattern(word: &str) -> Result<Regex> {
    anyhow::ensure!(!word.trim().is_empty(), "search word is empty");
    let src = format!(r"(?-u:\b){}(?-u:\b)", regex::escape(word.trim()));
    Regex::new(&src).with_context(|| format!("build pattern for {:?}", word))
}

impl WordCounter {
    /// Every fetch is bounded by `timeout` (connect + read).
    pub fn new(word: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            client,
            pattern: word_pattern(word)?,
        })
    }

    /// Count non-overlapping whole-word matches in `body`.
    pub fn count_in(&self, body: &[u8]) -> usize {
        self.pattern.find_iter(body).count()
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Counter for WordCounter {
    fn count(&self, url: &str) -> Result<usize> {
        let resp = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("GET {url}"))?
            .error_for_status()?;
        let body = resp.bytes().with_context(|| format!("read body of {url}"))?;
        Ok(self.count_in(&body))
    }
}
