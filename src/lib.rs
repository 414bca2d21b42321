//! Exchange Match - buyer-to-listing matching for the AI Exchange Club marketplace
//!
//! The scoring core is pure: it rates a listing against a buyer's stated
//! preferences on six fixed criteria and ranks a catalog for one buyer.
//! The HTTP service around it reads listings and preferences from Postgres
//! and caches ranked results.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, Criterion, calculate_match_score, DEFAULT_MIN_SCORE};
pub use crate::models::{BuyerPreferences, Product, ProductStatus, MatchResult, ScoreBreakdown};
