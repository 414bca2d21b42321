// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{BuyerPreferences, Product, ProductStatus, MatchResult, ScoreBreakdown};
pub use requests::{ScoreRequest, FindMatchesRequest, BuyerMatchesQuery};
pub use responses::{ScoreResponse, FindMatchesResponse, HealthResponse, ErrorResponse};
