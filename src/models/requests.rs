use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{BuyerPreferences, Product};

/// Request to score a single product for a buyer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub buyer: BuyerPreferences,
    pub product: Product,
}

/// Request to rank a batch of products for a buyer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[serde(default)]
    pub buyer: BuyerPreferences,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub products: Vec<Product>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Query parameters for buyer-scoped matching
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BuyerMatchesQuery {
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
}
