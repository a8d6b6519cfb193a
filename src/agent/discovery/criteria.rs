use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::agent::domain::JobListing;

/// Criteria shared by ad hoc searches and saved searches.
///
/// Keywords combine with OR semantics; location, job type, and platform
/// filters combine with AND against the keyword match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub keywords: Vec<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub platforms: Option<Vec<String>>,
}

impl SearchCriteria {
    pub fn with_keywords<I, K>(keywords: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.keywords.iter().all(|keyword| keyword.trim().is_empty()) {
            return Err("at least one keyword is required".to_string());
        }
        Ok(())
    }

    pub(crate) fn matches(&self, listing: &JobListing) -> bool {
        let keyword_hit = self
            .keywords
            .iter()
            .filter(|keyword| !keyword.trim().is_empty())
            .any(|keyword| {
                contains_ci(&listing.title, keyword) || contains_ci(&listing.description, keyword)
            });
        if !keyword_hit {
            return false;
        }

        if let Some(location) = &self.location {
            if !contains_ci(&listing.location, location) {
                return false;
            }
        }
        if let Some(job_type) = &self.job_type {
            if !listing.job_type.eq_ignore_ascii_case(job_type) {
                return false;
            }
        }
        if let Some(platforms) = &self.platforms {
            let Some(source) = &listing.source else {
                return false;
            };
            if !platforms
                .iter()
                .any(|platform| platform.eq_ignore_ascii_case(&source.platform))
            {
                return false;
            }
        }
        true
    }
}

/// One-based pagination window, applied only after filtering and ordering so
/// counts stay stable across pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Page {
    pub fn new(number: u32, size: u32) -> Self {
        Self { number, size }
    }

    pub(crate) fn validate(self) -> Result<(), String> {
        if self.number < 1 || self.size < 1 {
            return Err("page and page size must both be at least 1".to_string());
        }
        Ok(())
    }

    pub(crate) fn slice<T>(self, items: Vec<T>) -> Vec<T> {
        let skip = (self.number as usize - 1) * self.size as usize;
        items
            .into_iter()
            .skip(skip)
            .take(self.size as usize)
            .collect()
    }
}

pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.trim().to_lowercase())
}

/// Descending by posting date, undated listings last, ties broken by identity
/// so repeated calls over unchanged data return a stable order.
pub(crate) fn sort_by_recency(listings: &mut [JobListing]) {
    listings.sort_by_key(|listing| (Reverse(listing.posted_at), listing.id));
}
