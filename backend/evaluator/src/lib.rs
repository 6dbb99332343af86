//! Claim evaluation for MedLens Verify.
//!
//! The [`ClaimChecker`] runs one sequential pipeline per claim: evidence
//! retrieval, a single model call, then normalization of whatever the model
//! wrote into a validated [`medlens_core::CheckResult`].

pub mod checker;
pub mod normalize;
pub mod prompt;
pub mod providers;

pub use checker::{ClaimChecker, ClaimEvaluator};
pub use normalize::{normalize, recover_object, ResponseNormalizer};
pub use prompt::{build_user_prompt, SYSTEM_PROMPT};
