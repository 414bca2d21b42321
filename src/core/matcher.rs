use crate::models::{BuyerPreferences, MatchResult, Product};
use crate::core::{
    filters::{is_eligible, meets_threshold, DEFAULT_MIN_SCORE},
    scoring::calculate_match_score,
};

/// Buyer-to-listing matcher
///
/// # Pipeline Stages
/// 1. Status filter (active listings only)
/// 2. Scoring
/// 3. Minimum score cut
/// 4. Ranking by score, ties kept in input order
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    min_score: u8,
}

impl Matcher {
    pub fn new(min_score: u8) -> Self {
        Self { min_score }
    }

    pub fn with_default_threshold() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
        }
    }

    pub fn min_score(&self) -> u8 {
        self.min_score
    }

    /// Score a single product for a buyer
    ///
    /// Pure: the same inputs always give the same result. The product's
    /// status is not checked here.
    pub fn score(&self, buyer: &BuyerPreferences, product: &Product) -> MatchResult {
        let (breakdown, match_reasons) = calculate_match_score(product, buyer);

        MatchResult {
            product: product.clone(),
            score: breakdown.total(),
            match_reasons,
            breakdown,
        }
    }

    /// Rank the products that suit a buyer
    ///
    /// # Arguments
    /// * `buyer` - The buyer's preferences
    /// * `products` - Candidate listings, in catalog order
    ///
    /// # Returns
    /// Active products scoring at least the minimum score, best first.
    /// Equal scores keep their relative input order.
    pub fn find_matches(
        &self,
        buyer: &BuyerPreferences,
        products: Vec<Product>,
    ) -> Vec<MatchResult> {
        let mut matches: Vec<MatchResult> = products
            .into_iter()
            // Stage 1: lifecycle filter
            .filter(is_eligible)
            // Stage 2 & 3: score and cut
            .filter_map(|product| {
                let (breakdown, match_reasons) = calculate_match_score(&product, buyer);
                let score = breakdown.total();

                if meets_threshold(score, self.min_score) {
                    Some(MatchResult {
                        product,
                        score,
                        match_reasons,
                        breakdown,
                    })
                } else {
                    None
                }
            })
            .collect();

        // Stage 4: stable sort keeps input order for ties
        matches.sort_by(|a, b| b.score.cmp(&a.score));

        matches
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_threshold()
    }
}
