// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod scoring;
pub mod tables;

pub use filters::{is_eligible, meets_threshold, DEFAULT_MIN_SCORE};
pub use matcher::Matcher;
pub use scoring::{calculate_match_score, match_reasons, Criterion};
