pub mod allowlist;
pub mod error;
pub mod traits;
pub mod types;

pub use allowlist::AllowList;
pub use error::{MedLensError, ProviderError};
pub use traits::{EvidenceRetriever, LlmProvider, LlmRequest, LlmResponse, OcrEngine};
pub use types::{CheckOutcome, CheckResult, Claim, EvidenceItem, Verdict, MAX_SOURCES};
