use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A buyer's stated acquisition criteria
///
/// Every list is optional on the wire. Missing or `null` decodes to an empty
/// list and a bare string decodes to a one-element list. Apart from
/// `preferredCategories`, only the first entry of each list is consulted
/// when scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerPreferences {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub investment_budget: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub preferred_categories: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub revenue_requirements: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub investment_stage: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub monetization_preferences: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub preferred_industries: Vec<String>,
    /// Carried through from the preference store, not scored
    #[serde(default, deserialize_with = "one_or_many")]
    pub tech_stack_preferences: Vec<String>,
    /// Carried through from the preference store, not scored
    #[serde(default, deserialize_with = "one_or_many")]
    pub investment_timeline: Vec<String>,
}

impl BuyerPreferences {
    /// True when the buyer has not expressed any scored preference
    pub fn is_empty(&self) -> bool {
        self.investment_budget.is_empty()
            && self.preferred_categories.is_empty()
            && self.revenue_requirements.is_empty()
            && self.investment_stage.is_empty()
            && self.monetization_preferences.is_empty()
            && self.preferred_industries.is_empty()
    }
}

/// Lifecycle state of a listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    Draft,
    Pending,
    Rejected,
    Sold,
    #[default]
    #[serde(other)]
    Other,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Draft => "draft",
            ProductStatus::Pending => "pending",
            ProductStatus::Rejected => "rejected",
            ProductStatus::Sold => "sold",
            ProductStatus::Other => "other",
        }
    }
}

impl From<&str> for ProductStatus {
    /// Exact, case-sensitive mapping; anything unrecognised is `Other`
    fn from(value: &str) -> Self {
        match value {
            "active" => ProductStatus::Active,
            "draft" => ProductStatus::Draft,
            "pending" => ProductStatus::Pending,
            "rejected" => ProductStatus::Rejected,
            "sold" => ProductStatus::Sold,
            _ => ProductStatus::Other,
        }
    }
}

/// A listed AI SaaS business
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    /// Asking price in whole currency units; `None` when the stored value is not numeric
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub monthly_revenue: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub stage: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub business_model: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub industry: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub tech_stack: Vec<String>,
    #[serde(default, deserialize_with = "null_as_other")]
    pub status: ProductStatus,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Product {
    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }
}

/// Points awarded per criterion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub budget: u8,
    pub category: u8,
    pub revenue: u8,
    pub stage: u8,
    pub business_model: u8,
    pub industry: u8,
}

impl ScoreBreakdown {
    /// Sum of all criteria, clamped to 0..=100
    pub fn total(&self) -> u8 {
        let sum = u16::from(self.budget)
            + u16::from(self.category)
            + u16::from(self.revenue)
            + u16::from(self.stage)
            + u16::from(self.business_model)
            + u16::from(self.industry);

        sum.min(100) as u8
    }
}

/// A product scored against one buyer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub product: Product,
    pub score: u8,
    pub match_reasons: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<Option<String>>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values.into_iter().flatten().collect(),
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_other<'de, D>(deserializer: D) -> Result<ProductStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ProductStatus>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(value
        .and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|n| n.is_finite()))
}
