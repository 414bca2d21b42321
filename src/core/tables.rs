//! Fixed lookup tables used by the scorer.
//!
//! Budget and revenue tokens map to numeric ranges, category and stage
//! tokens map to synonym families. Tokens are matched after
//! [`normalize`], so `computer-vision`, `Computer_Vision` and
//! `computer vision` are the same key.

/// A numeric range, inclusive at both ends; `max: None` is unbounded
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountRange {
    pub min: f64,
    pub max: Option<f64>,
}

impl AmountRange {
    pub const fn bounded(min: f64, max: f64) -> Self {
        Self { min, max: Some(max) }
    }

    pub const fn at_least(min: f64) -> Self {
        Self { min, max: None }
    }

    pub const fn exactly(value: f64) -> Self {
        Self { min: value, max: Some(value) }
    }

    /// Non-numeric values never fall inside a range
    #[inline]
    pub fn contains(&self, value: Option<f64>) -> bool {
        match value {
            Some(v) if v.is_finite() => v >= self.min && self.max.map_or(true, |max| v <= max),
            _ => false,
        }
    }
}

/// Investment budget brackets a buyer can pick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetBracket {
    From10kTo50k,
    From50kTo200k,
    From200kTo1m,
    Over1m,
}

impl BudgetBracket {
    pub const ALL: [BudgetBracket; 4] = [
        BudgetBracket::From10kTo50k,
        BudgetBracket::From50kTo200k,
        BudgetBracket::From200kTo1m,
        BudgetBracket::Over1m,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            BudgetBracket::From10kTo50k => "10k_50k",
            BudgetBracket::From50kTo200k => "50k_200k",
            BudgetBracket::From200kTo1m => "200k_1m",
            BudgetBracket::Over1m => "1m_plus",
        }
    }

    pub fn range(&self) -> AmountRange {
        match self {
            BudgetBracket::From10kTo50k => AmountRange::bounded(10_000.0, 50_000.0),
            BudgetBracket::From50kTo200k => AmountRange::bounded(50_000.0, 200_000.0),
            BudgetBracket::From200kTo1m => AmountRange::bounded(200_000.0, 1_000_000.0),
            BudgetBracket::Over1m => AmountRange::at_least(1_000_000.0),
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        let key = normalize(token);
        Self::ALL.into_iter().find(|b| normalize(b.token()) == key)
    }
}

/// Monthly revenue stages a buyer can require
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevenueStage {
    PreRevenue,
    Early,
    Growing,
    Established,
}

impl RevenueStage {
    pub const ALL: [RevenueStage; 4] = [
        RevenueStage::PreRevenue,
        RevenueStage::Early,
        RevenueStage::Growing,
        RevenueStage::Established,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            RevenueStage::PreRevenue => "pre_revenue",
            RevenueStage::Early => "early_revenue",
            RevenueStage::Growing => "growing_revenue",
            RevenueStage::Established => "established_revenue",
        }
    }

    pub fn range(&self) -> AmountRange {
        match self {
            RevenueStage::PreRevenue => AmountRange::exactly(0.0),
            RevenueStage::Early => AmountRange::bounded(1_000.0, 10_000.0),
            RevenueStage::Growing => AmountRange::bounded(10_000.0, 50_000.0),
            RevenueStage::Established => AmountRange::at_least(50_000.0),
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        let key = normalize(token);
        Self::ALL.into_iter().find(|s| normalize(s.token()) == key)
    }
}

/// A token and the phrases it stands for
pub type SynonymTable = &'static [(&'static str, &'static [&'static str])];

pub const CATEGORY_SYNONYMS: SynonymTable = &[
    ("nlp", &["natural_language_processing", "nlp", "text_analysis"]),
    ("computer_vision", &["computer_vision", "vision", "image_recognition"]),
    ("machine_learning", &["machine_learning", "ml", "predictive_analytics"]),
    ("automation", &["automation", "workflow", "rpa"]),
    ("chatbots", &["chatbot", "conversational_ai", "virtual_assistant"]),
    ("generative_ai", &["generative_ai", "gen_ai", "content_generation"]),
    ("data_analytics", &["data_analytics", "analytics", "business_intelligence"]),
    ("speech", &["speech_recognition", "voice", "text_to_speech"]),
];

pub const STAGE_SYNONYMS: SynonymTable = &[
    ("mvp", &["mvp", "prototype", "beta", "early"]),
    ("growth", &["growth", "growing", "scaling"]),
    ("established", &["established", "mature", "profitable"]),
];

/// Sentinel meaning "any value is acceptable"
pub const ANY: &str = "any";

/// Expand `token` through `table`; tokens with no entry expand to themselves
pub fn expand<'a>(table: SynonymTable, token: &'a str) -> Vec<&'a str> {
    let key = normalize(token);

    match table.iter().find(|(entry, _)| normalize(entry) == key) {
        Some((_, synonyms)) => synonyms.iter().copied().collect(),
        None => vec![token],
    }
}

/// Lowercase, treat `_` and `-` as spaces, collapse whitespace
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Case-insensitive substring test; a blank needle never matches
#[inline]
pub fn contains_text(haystack: &str, needle: &str) -> bool {
    let needle = normalize(needle);
    !needle.is_empty() && normalize(haystack).contains(&needle)
}

#[inline]
pub fn is_any(token: &str) -> bool {
    token.trim().eq_ignore_ascii_case(ANY)
}
