use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{
    BuyerMatchesQuery, BuyerPreferences, ErrorResponse, FindMatchesRequest, FindMatchesResponse,
    HealthResponse, ScoreRequest, ScoreResponse,
};
use crate::config::MatchingSettings;
use crate::services::{CacheKey, CacheManager, PostgresClient, PostgresError};
use crate::core::Matcher;
use std::sync::Arc;

/// Store and cache handles for the catalog-backed handlers
///
/// The [`Matcher`] and [`MatchingSettings`] are registered as their own
/// `web::Data` so the stateless scoring routes run without a database.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<CacheManager>,
    pub postgres: Arc<PostgresClient>,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/score", web::post().to(score_product))
        .route("/matches/find", web::post().to(find_matches))
        .route("/buyers/{user_id}/matches", web::get().to(get_buyer_matches))
        .route("/buyers/{user_id}/matches", web::delete().to(invalidate_buyer_matches))
        .route("/buyers/{user_id}/matches/{product_id}", web::get().to(score_catalog_product))
        .route("/catalog/invalidate", web::post().to(invalidate_catalog));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cached_entries: state.cache.l1_entries(),
    })
}

/// Score one product for one buyer
///
/// POST /api/v1/matches/score
///
/// Request body:
/// ```json
/// {
///   "buyer": { "investmentBudget": ["50k_200k"], "preferredCategories": ["nlp"] },
///   "product": { "id": "string", "price": 75000, "category": "NLP Tools", "status": "active" }
/// }
/// ```
async fn score_product(
    matcher: web::Data<Matcher>,
    req: web::Json<ScoreRequest>,
) -> impl Responder {
    let result = matcher.score(&req.buyer, &req.product);

    tracing::debug!("Scored product {}: {}", req.product.id, result.score);

    HttpResponse::Ok().json(ScoreResponse {
        score: result.score,
        match_reasons: result.match_reasons,
        breakdown: result.breakdown,
    })
}

/// Rank a batch of products for a buyer
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "buyer": { ... },
///   "products": [ { ... } ],
///   "limit": 20
/// }
/// ```
async fn find_matches(
    matcher: web::Data<Matcher>,
    settings: web::Data<MatchingSettings>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return HttpResponse::BadRequest()
            .json(ErrorResponse::new("Validation failed", errors, 400));
    }

    let limit = match settings.validate_limit(req.limit) {
        Ok(limit) => limit,
        Err(message) => {
            return HttpResponse::BadRequest()
                .json(ErrorResponse::new("Validation failed", message, 400));
        }
    };

    let FindMatchesRequest { buyer, products, .. } = req.into_inner();
    let total_candidates = products.len();

    let mut matches = matcher.find_matches(&buyer, products);
    let total_results = matches.len();
    if let Some(limit) = limit {
        matches.truncate(limit);
    }

    tracing::info!(
        "Returning {} matches (from {} candidates)",
        matches.len(),
        total_candidates
    );

    HttpResponse::Ok().json(FindMatchesResponse {
        matches,
        total_candidates,
        total_results,
    })
}

/// Ranked catalog matches for a stored buyer
///
/// GET /api/v1/buyers/{userId}/matches?limit=20
///
/// A buyer without stored preferences gets an empty list.
async fn get_buyer_matches(
    state: web::Data<AppState>,
    matcher: web::Data<Matcher>,
    settings: web::Data<MatchingSettings>,
    path: web::Path<String>,
    query: web::Query<BuyerMatchesQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest()
            .json(ErrorResponse::new("Validation failed", errors, 400));
    }

    let limit = match settings.validate_limit(query.limit) {
        Ok(limit) => limit.unwrap_or_else(|| settings.effective_default_limit()),
        Err(message) => {
            return HttpResponse::BadRequest()
                .json(ErrorResponse::new("Validation failed", message, 400));
        }
    };

    let user_id = path.into_inner();
    let cache_key = CacheKey::buyer_matches(&user_id);

    match state.cache.get::<FindMatchesResponse>(&cache_key).await {
        Ok(Some(cached)) => {
            tracing::debug!("Serving cached matches for buyer {}", user_id);
            return HttpResponse::Ok().json(limited(cached, limit));
        }
        Ok(None) => {}
        Err(e) => tracing::warn!("Cache read failed for {}, falling back to database: {}", user_id, e),
    }

    let preferences = match state.postgres.get_buyer_preferences(&user_id).await {
        Ok(Some(prefs)) if !no_possible_matches(&prefs, &matcher) => prefs,
        Ok(_) => {
            tracing::info!("Buyer {} has no stored preferences", user_id);
            return HttpResponse::Ok().json(empty_matches());
        }
        Err(e) => return store_error("Failed to fetch buyer preferences", &user_id, e),
    };

    let products = match state.postgres.get_active_products().await {
        Ok(products) => products,
        Err(e) => return store_error("Failed to fetch products", &user_id, e),
    };

    let total_candidates = products.len();
    let matches = matcher.find_matches(&preferences, products);
    let response = FindMatchesResponse {
        total_results: matches.len(),
        matches,
        total_candidates,
    };

    if let Err(e) = state.cache.set(&cache_key, &response).await {
        tracing::warn!("Failed to cache matches for {}: {}", user_id, e);
    }

    tracing::info!(
        "Returning {} matches for buyer {} (from {} candidates)",
        response.total_results.min(limit),
        user_id,
        total_candidates
    );

    HttpResponse::Ok().json(limited(response, limit))
}

/// Score one catalog listing for a stored buyer
///
/// GET /api/v1/buyers/{userId}/matches/{productId}
///
/// Scores the listing whatever its status; a buyer without stored
/// preferences scores zero.
async fn score_catalog_product(
    state: web::Data<AppState>,
    matcher: web::Data<Matcher>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (user_id, product_id) = path.into_inner();

    let preferences = match state.postgres.get_buyer_preferences(&user_id).await {
        Ok(prefs) => prefs.unwrap_or_else(BuyerPreferences::default),
        Err(e) => return store_error("Failed to fetch buyer preferences", &user_id, e),
    };

    let product = match state.postgres.get_product(&product_id).await {
        Ok(Some(product)) => product,
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse::new(
                "Product not found",
                format!("No product with id {}", product_id),
                404,
            ));
        }
        Err(e) => return store_error("Failed to fetch product", &product_id, e),
    };

    let result = matcher.score(&preferences, &product);

    HttpResponse::Ok().json(ScoreResponse {
        score: result.score,
        match_reasons: result.match_reasons,
        breakdown: result.breakdown,
    })
}

/// Drop every cached buyer match list, e.g. after listings change
///
/// POST /api/v1/catalog/invalidate
async fn invalidate_catalog(state: web::Data<AppState>) -> impl Responder {
    match state.cache.invalidate_pattern(CacheKey::BUYER_MATCHES_PATTERN).await {
        Ok(count) => {
            tracing::info!("Invalidated {} cached match lists", count);
            HttpResponse::Ok().json(serde_json::json!({ "invalidated": count }))
        }
        Err(e) => {
            tracing::error!("Failed to invalidate match cache: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to invalidate cache", e, 500))
        }
    }
}

/// Drop one buyer's cached match list, e.g. after their preferences change
///
/// DELETE /api/v1/buyers/{userId}/matches
async fn invalidate_buyer_matches(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let user_id = path.into_inner();

    match state.cache.delete(&CacheKey::buyer_matches(&user_id)).await {
        Ok(()) => {
            tracing::info!("Invalidated cached matches for buyer {}", user_id);
            HttpResponse::NoContent().finish()
        }
        Err(e) => {
            tracing::error!("Failed to invalidate matches for {}: {}", user_id, e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to invalidate cache", e, 500))
        }
    }
}

/// With no scored preferences every listing scores zero, so only a zero
/// threshold could let anything through
fn no_possible_matches(preferences: &BuyerPreferences, matcher: &Matcher) -> bool {
    preferences.is_empty() && matcher.min_score() > 0
}

fn empty_matches() -> FindMatchesResponse {
    FindMatchesResponse {
        matches: vec![],
        total_candidates: 0,
        total_results: 0,
    }
}

fn limited(mut response: FindMatchesResponse, limit: usize) -> FindMatchesResponse {
    response.matches.truncate(limit);
    response
}

/// Invalid ids are the caller's fault, everything else is ours
fn store_error(context: &str, id: &str, e: PostgresError) -> HttpResponse {
    match e {
        PostgresError::InvalidInput(message) => {
            HttpResponse::BadRequest().json(ErrorResponse::new("Invalid id", message, 400))
        }
        e => {
            tracing::error!("{} for {}: {}", context, id, e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new(context, format!("{}: {}", id, e), 500))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use serde_json::json;

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        test_app_with(MatchingSettings::default())
    }

    fn test_app_with(settings: MatchingSettings) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(Matcher::new(settings.min_score)))
            .app_data(web::Data::new(settings))
            .configure(configure)
    }

    #[actix_web::test]
    async fn test_score_endpoint() {
        let app = test::init_service(test_app()).await;

        let req = test::TestRequest::post()
            .uri("/matches/score")
            .set_json(json!({
                "buyer": { "investmentBudget": ["50k_200k"] },
                "product": { "id": "p1", "price": 75000, "status": "active" }
            }))
            .to_request();

        let resp: ScoreResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.score, 25);
        assert_eq!(resp.match_reasons.len(), 1);
        assert_eq!(resp.breakdown.budget, 25);
    }

    #[actix_web::test]
    async fn test_find_endpoint_filters_and_limits() {
        let app = test::init_service(test_app()).await;

        let req = test::TestRequest::post()
            .uri("/matches/find")
            .set_json(json!({
                "buyer": { "investmentBudget": "50k_200k", "preferredCategories": ["nlp"] },
                "products": [
                    { "id": "a", "price": 75000, "category": "NLP Tools", "status": "active" },
                    { "id": "b", "price": 75000, "category": "NLP Tools", "status": "sold" },
                    { "id": "c", "price": 90000, "category": "Text Analysis", "status": "active" },
                    { "id": "d", "price": 5000, "category": "Robotics", "status": "active" }
                ],
                "limit": 1
            }))
            .to_request();

        let resp: FindMatchesResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.total_candidates, 4);
        assert_eq!(resp.total_results, 2);
        assert_eq!(resp.matches.len(), 1);
        assert_eq!(resp.matches[0].product.id, "a");
    }

    #[actix_web::test]
    async fn test_find_endpoint_rejects_bad_limit() {
        let app = test::init_service(test_app()).await;

        let req = test::TestRequest::post()
            .uri("/matches/find")
            .set_json(json!({ "products": [], "limit": 500 }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_find_endpoint_honours_configured_max_limit() {
        let app = test::init_service(test_app_with(MatchingSettings {
            max_limit: 500,
            ..Default::default()
        }))
        .await;

        let req = test::TestRequest::post()
            .uri("/matches/find")
            .set_json(json!({ "products": [], "limit": 300 }))
            .to_request();

        let resp: FindMatchesResponse = test::call_and_read_body_json(&app, req).await;
        assert!(resp.matches.is_empty());

        let req = test::TestRequest::post()
            .uri("/matches/find")
            .set_json(json!({ "products": [], "limit": 501 }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_find_endpoint_tolerates_null_fields() {
        let app = test::init_service(test_app()).await;

        let req = test::TestRequest::post()
            .uri("/matches/find")
            .set_json(json!({
                "buyer": { "investmentBudget": ["50k_200k", null], "preferredCategories": ["nlp"] },
                "products": [
                    { "id": "a", "price": 75000, "category": "NLP Tools", "status": "active" },
                    { "id": "b", "price": 75000, "category": null, "stage": null, "status": "active" },
                    { "id": "c", "price": 75000, "status": null }
                ]
            }))
            .to_request();

        let resp: FindMatchesResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.total_candidates, 3);
        assert_eq!(resp.matches.len(), 1);
        assert_eq!(resp.matches[0].product.id, "a");
    }

    #[actix_web::test]
    async fn test_empty_preferences_short_circuit() {
        let matcher = Matcher::default();
        assert!(no_possible_matches(&BuyerPreferences::default(), &matcher));
        assert!(!no_possible_matches(&BuyerPreferences::default(), &Matcher::new(0)));

        let buyer = BuyerPreferences {
            preferred_industries: vec!["any".to_string()],
            ..Default::default()
        };
        assert!(!no_possible_matches(&buyer, &matcher));
        assert_eq!(empty_matches().total_results, 0);
    }

    #[actix_web::test]
    async fn test_store_error_names_the_failing_id() {
        let resp = store_error(
            "Failed to fetch product",
            "7d9f1c1e-0000-4000-8000-000000000001",
            PostgresError::SqlxError(sqlx::Error::RowNotFound),
        );
        assert_eq!(resp.status(), actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);

        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Failed to fetch product");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("7d9f1c1e-0000-4000-8000-000000000001:"));

        let resp = store_error(
            "Failed to fetch product",
            "not-a-uuid",
            PostgresError::InvalidInput("bad id".to_string()),
        );
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }
}
