use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound on the number of sources attached to a [`CheckResult`].
pub const MAX_SOURCES: usize = 5;

/// A non-empty, trimmed health claim to evaluate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim(String);

impl Claim {
    /// Trim the input and reject it if nothing is left.
    pub fn new(text: impl AsRef<str>) -> Option<Self> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A candidate supporting document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub title: String,
    pub url: String,
}

impl EvidenceItem {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Outcome of judging a claim against the evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    True,
    #[default]
    Uncertain,
    Misleading,
    False,
}

impl Verdict {
    /// Case-insensitive parse. Anything outside the four labels collapses to `Uncertain`.
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "true" => Self::True,
            "misleading" => Self::Misleading,
            "false" => Self::False,
            _ => Self::Uncertain,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::True => "true",
            Self::Uncertain => "uncertain",
            Self::Misleading => "misleading",
            Self::False => "false",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The structured verdict returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub verdict: Verdict,
    pub reason: String,
    pub sources: Vec<EvidenceItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_text: Option<String>,
}

impl CheckResult {
    pub fn new(verdict: Verdict, reason: impl Into<String>, sources: Vec<EvidenceItem>) -> Self {
        Self {
            verdict,
            reason: reason.into(),
            sources,
            ocr_text: None,
        }
    }

    /// An `uncertain` result carrying only a reason and whatever sources are at hand.
    pub fn uncertain(reason: impl Into<String>, sources: Vec<EvidenceItem>) -> Self {
        Self::new(Verdict::Uncertain, reason, sources)
    }

    pub fn with_ocr_text(mut self, text: impl Into<String>) -> Self {
        self.ocr_text = Some(text.into());
        self
    }
}

/// What the check pipeline produced for one claim.
///
/// Both variants carry a well-formed [`CheckResult`]; `ModelFailed` lets the
/// HTTP layer pick an upstream-error status without a separate error body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Completed(CheckResult),
    ModelFailed {
        category: &'static str,
        result: CheckResult,
    },
}

impl CheckOutcome {
    pub fn is_model_failure(&self) -> bool {
        matches!(self, Self::ModelFailed { .. })
    }

    pub fn result(&self) -> &CheckResult {
        match self {
            Self::Completed(result) | Self::ModelFailed { result, .. } => result,
        }
    }

    pub fn into_result(self) -> CheckResult {
        match self {
            Self::Completed(result) | Self::ModelFailed { result, .. } => result,
        }
    }
}
