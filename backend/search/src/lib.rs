//! Evidence retrieval.
//!
//! Every retriever returns allow-listed items only, in ranking order, and
//! degrades to an empty list instead of failing.

pub mod bing;
pub mod fixed;

pub use bing::{BingRetriever, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
pub use fixed::StaticRetriever;
