use crate::models::{BuyerPreferences, Product, ScoreBreakdown};
use crate::core::tables::{
    contains_text, expand, is_any, BudgetBracket, RevenueStage, CATEGORY_SYNONYMS, STAGE_SYNONYMS,
};

/// The six independent matching criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    Budget,
    Category,
    Revenue,
    Stage,
    BusinessModel,
    Industry,
}

impl Criterion {
    pub const ALL: [Criterion; 6] = [
        Criterion::Budget,
        Criterion::Category,
        Criterion::Revenue,
        Criterion::Stage,
        Criterion::BusinessModel,
        Criterion::Industry,
    ];

    /// Points awarded when the criterion matches. The six maxima sum to 100.
    pub const fn max_points(&self) -> u8 {
        match self {
            Criterion::Budget => 25,
            Criterion::Category => 20,
            Criterion::Revenue => 20,
            Criterion::Stage => 15,
            Criterion::BusinessModel => 10,
            Criterion::Industry => 10,
        }
    }

    pub const fn reason(&self) -> &'static str {
        match self {
            Criterion::Budget => "Price fits your investment budget",
            Criterion::Category => "Matches your preferred AI category",
            Criterion::Revenue => "Revenue matches your requirements",
            Criterion::Stage => "Development stage aligns with your preference",
            Criterion::BusinessModel => "Business model matches your monetization preference",
            Criterion::Industry => "Operates in your target industry",
        }
    }

    /// Points this criterion holds in a breakdown
    pub fn points(&self, breakdown: &ScoreBreakdown) -> u8 {
        match self {
            Criterion::Budget => breakdown.budget,
            Criterion::Category => breakdown.category,
            Criterion::Revenue => breakdown.revenue,
            Criterion::Stage => breakdown.stage,
            Criterion::BusinessModel => breakdown.business_model,
            Criterion::Industry => breakdown.industry,
        }
    }
}

/// Score a product against a buyer's preferences
///
/// Scoring table:
///     budget          25   price inside the buyer's budget bracket
///     category        20   any preferred category (or synonym) in the product category
///     revenue         20   monthly revenue inside the required revenue stage
///     stage           15   development stage synonym match, or "any"
///     business model  10   monetization preference in the business model
///     industry        10   preferred industry in the product industry, or "any"
///
/// Returns the per-criterion breakdown and one reason per criterion that scored.
pub fn calculate_match_score(
    product: &Product,
    buyer: &BuyerPreferences,
) -> (ScoreBreakdown, Vec<String>) {
    let breakdown = ScoreBreakdown {
        budget: award(Criterion::Budget, budget_matches(product, buyer)),
        category: award(Criterion::Category, category_matches(product, buyer)),
        revenue: award(Criterion::Revenue, revenue_matches(product, buyer)),
        stage: award(Criterion::Stage, stage_matches(product, buyer)),
        business_model: award(Criterion::BusinessModel, business_model_matches(product, buyer)),
        industry: award(Criterion::Industry, industry_matches(product, buyer)),
    };

    (breakdown, match_reasons(&breakdown))
}

/// One reason per criterion that contributed points, in table order
pub fn match_reasons(breakdown: &ScoreBreakdown) -> Vec<String> {
    Criterion::ALL
        .iter()
        .filter(|c| c.points(breakdown) > 0)
        .map(|c| c.reason().to_string())
        .collect()
}

#[inline]
fn award(criterion: Criterion, matched: bool) -> u8 {
    if matched {
        criterion.max_points()
    } else {
        0
    }
}

/// The authoritative entry of a preference list. Later entries are ignored.
#[inline]
fn first_preference(values: &[String]) -> Option<&str> {
    values
        .first()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn budget_matches(product: &Product, buyer: &BuyerPreferences) -> bool {
    first_preference(&buyer.investment_budget)
        .and_then(BudgetBracket::from_token)
        .map_or(false, |bracket| bracket.range().contains(product.price))
}

fn category_matches(product: &Product, buyer: &BuyerPreferences) -> bool {
    buyer
        .preferred_categories
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .any(|preferred| {
            expand(CATEGORY_SYNONYMS, preferred)
                .into_iter()
                .any(|term| contains_text(&product.category, term))
        })
}

fn revenue_matches(product: &Product, buyer: &BuyerPreferences) -> bool {
    first_preference(&buyer.revenue_requirements)
        .and_then(RevenueStage::from_token)
        .map_or(false, |stage| stage.range().contains(product.monthly_revenue))
}

fn stage_matches(product: &Product, buyer: &BuyerPreferences) -> bool {
    match first_preference(&buyer.investment_stage) {
        Some(stage) if is_any(stage) => true,
        Some(stage) => expand(STAGE_SYNONYMS, stage)
            .into_iter()
            .any(|term| contains_text(&product.stage, term)),
        None => false,
    }
}

fn business_model_matches(product: &Product, buyer: &BuyerPreferences) -> bool {
    first_preference(&buyer.monetization_preferences)
        .map_or(false, |model| contains_text(&product.business_model, model))
}

fn industry_matches(product: &Product, buyer: &BuyerPreferences) -> bool {
    match first_preference(&buyer.preferred_industries) {
        Some(industry) if is_any(industry) => true,
        Some(industry) => contains_text(&product.industry, industry),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductStatus;

    fn create_test_product() -> Product {
        Product {
            id: "prod_1".to_string(),
            title: "DocuMind".to_string(),
            price: Some(30_000.0),
            monthly_revenue: Some(5_000.0),
            category: "Automation Suite".to_string(),
            stage: "mvp".to_string(),
            business_model: "subscription-based".to_string(),
            industry: "healthcare".to_string(),
            tech_stack: vec!["python".to_string()],
            status: ProductStatus::Active,
            created_at: None,
        }
    }

    fn prefs(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_maxima_sum_to_one_hundred() {
        let total: u16 = Criterion::ALL.iter().map(|c| u16::from(c.max_points())).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_budget_only() {
        let mut product = create_test_product();
        product.price = Some(75_000.0);
        let buyer = BuyerPreferences {
            investment_budget: prefs(&["50k_200k"]),
            ..Default::default()
        };

        let (breakdown, reasons) = calculate_match_score(&product, &buyer);

        assert_eq!(breakdown.total(), 25);
        assert_eq!(breakdown.budget, 25);
        assert_eq!(reasons, vec![Criterion::Budget.reason()]);
    }

    #[test]
    fn test_category_synonym() {
        let mut product = create_test_product();
        product.category = "Natural Language Processing Tools".to_string();
        let buyer = BuyerPreferences {
            preferred_categories: prefs(&["nlp"]),
            ..Default::default()
        };

        let (breakdown, _) = calculate_match_score(&product, &buyer);
        assert_eq!(breakdown.category, 20);
    }

    #[test]
    fn test_category_counts_once() {
        let buyer = BuyerPreferences {
            preferred_categories: prefs(&["automation", "workflow", "rpa"]),
            ..Default::default()
        };

        let (breakdown, reasons) = calculate_match_score(&create_test_product(), &buyer);
        assert_eq!(breakdown.category, 20);
        assert_eq!(reasons.len(), 1);
    }

    #[test]
    fn test_later_category_can_match() {
        let buyer = BuyerPreferences {
            preferred_categories: prefs(&["computer_vision", "automation"]),
            ..Default::default()
        };

        let (breakdown, _) = calculate_match_score(&create_test_product(), &buyer);
        assert_eq!(breakdown.category, 20);
    }

    #[test]
    fn test_full_match() {
        let buyer = BuyerPreferences {
            investment_budget: prefs(&["10k_50k"]),
            preferred_categories: prefs(&["automation"]),
            revenue_requirements: prefs(&["early_revenue"]),
            investment_stage: prefs(&["any"]),
            monetization_preferences: prefs(&["subscription"]),
            preferred_industries: prefs(&["any"]),
            ..Default::default()
        };

        let (breakdown, reasons) = calculate_match_score(&create_test_product(), &buyer);

        assert_eq!(breakdown.total(), 100);
        assert_eq!(reasons.len(), 6);
    }

    #[test]
    fn test_only_first_entry_is_read() {
        let buyer = BuyerPreferences {
            investment_budget: prefs(&["1m_plus", "10k_50k"]),
            preferred_industries: prefs(&["fintech", "healthcare"]),
            ..Default::default()
        };

        let (breakdown, reasons) = calculate_match_score(&create_test_product(), &buyer);

        assert_eq!(breakdown.total(), 0);
        assert!(reasons.is_empty());
    }

    #[test]
    fn test_stage_synonyms() {
        let mut product = create_test_product();
        product.stage = "Public Beta".to_string();
        let buyer = BuyerPreferences {
            investment_stage: prefs(&["mvp"]),
            ..Default::default()
        };
        assert_eq!(calculate_match_score(&product, &buyer).0.stage, 15);

        product.stage = "Profitable".to_string();
        assert_eq!(calculate_match_score(&product, &buyer).0.stage, 0);
    }

    #[test]
    fn test_unknown_tokens_score_zero() {
        let buyer = BuyerPreferences {
            investment_budget: prefs(&["whatever"]),
            revenue_requirements: prefs(&["unicorn"]),
            ..Default::default()
        };

        assert_eq!(calculate_match_score(&create_test_product(), &buyer).0.total(), 0);
    }

    #[test]
    fn test_blank_preference_is_ignored() {
        let buyer = BuyerPreferences {
            monetization_preferences: prefs(&[""]),
            preferred_industries: prefs(&["  "]),
            preferred_categories: prefs(&[""]),
            ..Default::default()
        };

        assert_eq!(calculate_match_score(&create_test_product(), &buyer).0.total(), 0);
    }

    #[test]
    fn test_non_numeric_price_fails_budget() {
        let mut product = create_test_product();
        product.price = None;
        product.monthly_revenue = None;
        let buyer = BuyerPreferences {
            investment_budget: prefs(&["10k_50k"]),
            revenue_requirements: prefs(&["early_revenue"]),
            ..Default::default()
        };

        assert_eq!(calculate_match_score(&product, &buyer).0.total(), 0);
    }

    #[test]
    fn test_reasons_follow_breakdown() {
        let breakdown = ScoreBreakdown {
            revenue: 20,
            industry: 10,
            ..Default::default()
        };

        assert_eq!(
            match_reasons(&breakdown),
            vec![Criterion::Revenue.reason(), Criterion::Industry.reason()]
        );
    }
}
