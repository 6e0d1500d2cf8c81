use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use super::{catalog_error, validation_error, AppState};
use crate::models::{
    CustomerMatchesResponse, HealthResponse, MatchQuery, PropertyMatchesResponse,
    RankCustomersRequest, RankPropertiesRequest, ScoreRequest,
};
use crate::services::CacheKey;

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches/score", web::post().to(score_pair))
        .route("/matches/properties", web::post().to(rank_properties))
        .route("/matches/customers", web::post().to(rank_customers))
        .route("/customers/{id}/matches", web::get().to(customer_matches))
        .route("/properties/{id}/matches", web::get().to(property_matches));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        counts: state.catalog.counts().await,
    })
}

/// Score one customer against one property
///
/// POST /api/v1/matches/score
///
/// Request body:
/// ```json
/// { "customer": { ... }, "property": { ... } }
/// ```
async fn score_pair(state: web::Data<AppState>, req: web::Json<ScoreRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let breakdown = state.matcher.score(&req.customer, &req.property);

    tracing::debug!(
        "Scored customer {} against property {}: {}",
        req.customer.id,
        req.property.id,
        breakdown.score
    );

    HttpResponse::Ok().json(breakdown)
}

/// Rank caller-supplied properties for a caller-supplied customer
///
/// POST /api/v1/matches/properties
async fn rank_properties(
    state: web::Data<AppState>,
    req: web::Json<RankPropertiesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let limit = state.match_limit(req.limit);
    let RankPropertiesRequest {
        customer,
        properties,
        ..
    } = req.into_inner();

    let result = state.matcher.top_properties(&customer, properties, limit);

    tracing::info!(
        "Ranked {} of {} properties for customer {}",
        result.matches.len(),
        result.total_candidates,
        customer.id
    );

    HttpResponse::Ok().json(CustomerMatchesResponse {
        customer: customer.summary(),
        matches: result.matches,
    })
}

/// Rank caller-supplied customers for a caller-supplied property
///
/// POST /api/v1/matches/customers
async fn rank_customers(
    state: web::Data<AppState>,
    req: web::Json<RankCustomersRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let limit = state.match_limit(req.limit);
    let RankCustomersRequest {
        property,
        customers,
        ..
    } = req.into_inner();

    let result = state.matcher.top_customers(&property, customers, limit);

    tracing::info!(
        "Ranked {} of {} customers for property {}",
        result.matches.len(),
        result.total_candidates,
        property.id
    );

    HttpResponse::Ok().json(PropertyMatchesResponse {
        property: property.summary(),
        matches: result.matches,
    })
}

/// Best available catalog properties for a stored customer
///
/// GET /api/v1/customers/{id}/matches?limit=10
async fn customer_matches(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<MatchQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    let customer_id = path.into_inner();
    let limit = state.match_limit(query.limit);
    // Read before the catalog so the key is never newer than the data
    let generation = state.catalog.generation();
    let cache_key = CacheKey::customer_matches(&customer_id, limit, generation);

    if let Ok(cached) = state.cache.get::<CustomerMatchesResponse>(&cache_key).await {
        tracing::debug!("Serving cached matches for customer {}", customer_id);
        return HttpResponse::Ok().json(cached);
    }

    let customer = match state.catalog.get_customer(customer_id).await {
        Ok(customer) => customer,
        Err(e) => return catalog_error(e),
    };

    let properties = state.catalog.properties().await;
    let result = state.matcher.top_properties(&customer, properties, limit);

    tracing::info!(
        "Returning {} matches for customer {} (from {} listings)",
        result.matches.len(),
        customer_id,
        result.total_candidates
    );

    let response = CustomerMatchesResponse {
        customer: customer.summary(),
        matches: result.matches,
    };

    if let Err(e) = state.cache.set(&cache_key, &response).await {
        tracing::warn!("Failed to cache matches for customer {}: {}", customer_id, e);
    }

    HttpResponse::Ok().json(response)
}

/// Best catalog customers for a stored property
///
/// GET /api/v1/properties/{id}/matches?limit=10
async fn property_matches(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<MatchQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    let property_id = path.into_inner();
    let limit = state.match_limit(query.limit);
    let generation = state.catalog.generation();
    let cache_key = CacheKey::property_matches(&property_id, limit, generation);

    if let Ok(cached) = state.cache.get::<PropertyMatchesResponse>(&cache_key).await {
        tracing::debug!("Serving cached matches for property {}", property_id);
        return HttpResponse::Ok().json(cached);
    }

    let property = match state.catalog.get_property(property_id).await {
        Ok(property) => property,
        Err(e) => return catalog_error(e),
    };

    let customers = state.catalog.customers().await;
    let result = state.matcher.top_customers(&property, customers, limit);

    tracing::info!(
        "Returning {} matches for property {} (from {} customers)",
        result.matches.len(),
        property_id,
        result.total_candidates
    );

    let response = PropertyMatchesResponse {
        property: property.summary(),
        matches: result.matches,
    };

    if let Err(e) = state.cache.set(&cache_key, &response).await {
        tracing::warn!("Failed to cache matches for property {}: {}", property_id, e);
    }

    HttpResponse::Ok().json(response)
}
