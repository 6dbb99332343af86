//! Trusted medical-authority domains.
//!
//! Membership is a plain substring test on the URL, not a parsed-host check,
//! so `https://x.who.int.example.com/` is accepted as well.

use crate::types::EvidenceItem;

/// Domains whose pages may be cited as evidence.
pub const TRUSTED_DOMAINS: &[&str] = &[
    "who.int",
    "cdc.gov",
    "cochranelibrary.com",
    "ncbi.nlm.nih.gov", // PubMed / NCBI
    "nice.org.uk",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    domains: Vec<String>,
}

impl AllowList {
    /// The process-wide trusted list.
    pub fn trusted() -> Self {
        Self::new(TRUSTED_DOMAINS.iter().copied())
    }

    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            domains: domains.into_iter().map(Into::into).collect(),
        }
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    pub fn is_allowed(&self, url: &str) -> bool {
        self.domains.iter().any(|d| url.contains(d.as_str()))
    }

    /// Keep allowed items in their original order, stopping after `max`.
    pub fn filter_evidence<I>(&self, items: I, max: usize) -> Vec<EvidenceItem>
    where
        I: IntoIterator<Item = EvidenceItem>,
    {
        items
            .into_iter()
            .filter(|item| self.is_allowed(&item.url))
            .take(max)
            .collect()
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::trusted()
    }
}
