use crate::models::{BuyerPreferences, Product, ProductStatus};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when reading the marketplace database
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Read-only client for the marketplace catalog and buyer preferences
///
/// Talks plain SQL to the Postgres database behind the marketplace. Listings
/// and preferences are written by the web application; this service only
/// reads them.
pub struct PostgresClient {
    pool: PgPool,
}

const PRODUCT_COLUMNS: &str = r#"
    id, title, price::float8 AS price, monthly_revenue::float8 AS monthly_revenue,
    category, stage, business_model, industry, tech_stack, status, created_at
"#;

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Fetch every listing currently open for matching
    ///
    /// Ordered newest first, which becomes the tie-break order for equal scores.
    pub async fn get_active_products(&self) -> Result<Vec<Product>, PostgresError> {
        let query = format!(
            "SELECT {} FROM products WHERE status = 'active' ORDER BY created_at DESC NULLS LAST, id",
            PRODUCT_COLUMNS
        );

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        let products: Vec<Product> = rows.iter().map(product_from_row).collect();

        tracing::debug!("Loaded {} active products", products.len());

        Ok(products)
    }

    /// Fetch a single listing regardless of status
    pub async fn get_product(&self, product_id: &str) -> Result<Option<Product>, PostgresError> {
        let id = parse_id(product_id)?;
        let query = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(product_from_row))
    }

    /// Fetch a buyer's stored preferences, `None` if the buyer never saved any
    pub async fn get_buyer_preferences(
        &self,
        user_id: &str,
    ) -> Result<Option<BuyerPreferences>, PostgresError> {
        let id = parse_id(user_id)?;

        let query = r#"
            SELECT user_id, investment_budget, preferred_categories, revenue_requirements,
                   investment_stage, monetization_preferences, preferred_industries,
                   tech_stack_preferences, investment_timeline
            FROM buyer_preferences
            WHERE user_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| BuyerPreferences {
            user_id: Some(row.get::<Uuid, _>("user_id").to_string()),
            investment_budget: text_array(&row, "investment_budget"),
            preferred_categories: text_array(&row, "preferred_categories"),
            revenue_requirements: text_array(&row, "revenue_requirements"),
            investment_stage: text_array(&row, "investment_stage"),
            monetization_preferences: text_array(&row, "monetization_preferences"),
            preferred_industries: text_array(&row, "preferred_industries"),
            tech_stack_preferences: text_array(&row, "tech_stack_preferences"),
            investment_timeline: text_array(&row, "investment_timeline"),
        }))
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// Parse a row id, rejecting anything that is not a UUID
pub fn parse_id(value: &str) -> Result<Uuid, PostgresError> {
    Uuid::parse_str(value.trim())
        .map_err(|_| PostgresError::InvalidInput(format!("'{}' is not a valid id", value)))
}

fn product_from_row(row: &PgRow) -> Product {
    let status: String = row.get("status");

    Product {
        id: row.get::<Uuid, _>("id").to_string(),
        title: row.get::<Option<String>, _>("title").unwrap_or_default(),
        price: row.get("price"),
        monthly_revenue: row.get("monthly_revenue"),
        category: row.get::<Option<String>, _>("category").unwrap_or_default(),
        stage: row.get::<Option<String>, _>("stage").unwrap_or_default(),
        business_model: row.get::<Option<String>, _>("business_model").unwrap_or_default(),
        industry: row.get::<Option<String>, _>("industry").unwrap_or_default(),
        tech_stack: text_array(row, "tech_stack"),
        status: ProductStatus::from(status.as_str()),
        created_at: row.get("created_at"),
    }
}

/// NULL arrays read as empty
fn text_array(row: &PgRow, column: &str) -> Vec<String> {
    row.get::<Option<Vec<String>>, _>(column).unwrap_or_default()
}
