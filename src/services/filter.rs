//! Title-based content filtering.

use std::fmt;

use crate::models::{Asset, FilterConfig};

/// Which pass produced the assets being filtered. Used as a log prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Primary,
    Secondary,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::Primary => f.write_str("[primary]"),
            Pass::Secondary => f.write_str("[secondary]"),
        }
    }
}

/// Classification of one title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict<'a> {
    Accept,
    /// Matched a harmful-content marker
    Harmful(&'a str),
    /// Matched a banned/irrelevant marker
    Irrelevant(&'a str),
}

/// Case-sensitive substring filter over cleaned titles.
#[derive(Debug, Clone)]
pub struct ContentFilter {
    harmful: Vec<String>,
    banned: Vec<String>,
}

impl ContentFilter {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            harmful: Self::non_empty(&config.harmful_title_substrings),
            banned: Self::non_empty(&config.banned_title_substrings),
        }
    }

    /// Classify a cleaned title. The harmful check runs first.
    pub fn classify<'a>(&'a self, title: &str) -> Verdict<'a> {
        if let Some(word) = Self::first_match(&self.harmful, title) {
            return Verdict::Harmful(word);
        }
        if let Some(word) = Self::first_match(&self.banned, title) {
            return Verdict::Irrelevant(word);
        }
        Verdict::Accept
    }

    pub fn is_harmful(&self, title: &str) -> bool {
        Self::first_match(&self.harmful, title).is_some()
    }

    pub fn is_irrelevant(&self, title: &str) -> bool {
        Self::first_match(&self.banned, title).is_some()
    }

    /// Keep only assets whose cleaned title passes both checks.
    pub fn retain(&self, pass: Pass, assets: Vec<Asset>) -> Vec<Asset> {
        assets
            .into_iter()
            .filter(|asset| {
                let title = asset.cleaned_title();
                match self.classify(&title) {
                    Verdict::Accept => true,
                    Verdict::Harmful(word) => {
                        log::info!(
                            "{pass} Dropped harmful site: {title} ({}) [matched {word}]",
                            asset.domain
                        );
                        false
                    }
                    Verdict::Irrelevant(word) => {
                        log::info!(
                            "{pass} Dropped irrelevant site: {title} ({}) [matched {word}]",
                            asset.domain
                        );
                        false
                    }
                }
            })
            .collect()
    }

    fn first_match<'a>(words: &'a [String], title: &str) -> Option<&'a str> {
        words
            .iter()
            .find(|word| title.contains(word.as_str()))
            .map(String::as_str)
    }

    // An empty marker would match every title.
    fn non_empty(words: &[String]) -> Vec<String> {
        words.iter().filter(|w| !w.is_empty()).cloned().collect()
    }
}
