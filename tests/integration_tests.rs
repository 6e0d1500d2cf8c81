// Integration tests for KCRM

use actix_web::{http::StatusCode, test, web, App};
use chrono::Utc;
use kcrm::config::Settings;
use kcrm::core::Matcher;
use kcrm::models::{
    CreateClientRequest, CreateCustomerRequest, CreatePropertyRequest, Customer,
    CustomerMatchesResponse, MatchBreakdown, PreferredLocations, Property, PropertyListResponse,
    PropertyLocation, PropertyMatchesResponse, PropertyStatus, UpdatePropertyRequest,
};
use kcrm::routes::{self, AppState};
use kcrm::services::{CacheKey, Catalog};
use serde_json::{json, Value};
use uuid::Uuid;

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
                .app_data(web::QueryConfig::default().error_handler(routes::handle_query_payload_error))
                .app_data(web::PathConfig::default().error_handler(routes::handle_path_error))
                .configure(routes::configure_routes),
        )
        .await
    };
}

fn test_state(settings: &Settings) -> AppState {
    AppState::new(settings, Catalog::new())
}

/// Seller, buyer and one available Town Center listing, created directly
/// in the catalog
async fn seed_catalog(state: &AppState) -> (Customer, Property) {
    let client = state
        .catalog
        .create_client(CreateClientRequest {
            name: "Owner".to_string(),
            phone: "+919811111111".to_string(),
            email: None,
            address: None,
            notes: None,
        })
        .await;

    let customer = state
        .catalog
        .create_customer(CreateCustomerRequest {
            name: "Buyer".to_string(),
            phone: "+919822222222".to_string(),
            email: None,
            budget_min: 2_000_000.0,
            budget_max: 5_000_000.0,
            preferred_types: vec!["apartment".to_string()],
            preferred_locations: PreferredLocations {
                locality: Some("Town Center".to_string()),
                ..Default::default()
            },
            opt_in_whatsapp: true,
            notes: None,
        })
        .await;

    let property = state
        .catalog
        .create_property(CreatePropertyRequest {
            title: "Town Center flat".to_string(),
            property_type: "apartment".to_string(),
            price: 3_500_000.0,
            location: PropertyLocation {
                city: "Karimnagar".to_string(),
                locality: Some("Town Center".to_string()),
                ..Default::default()
            },
            client_id: client.id,
            bedrooms: Some(2),
            bathrooms: Some(2),
            area: None,
            description: None,
            status: PropertyStatus::Available,
            images: vec![],
        })
        .await
        .unwrap();

    (customer, property)
}

fn create_customer(name: &str, budget_min: f64, budget_max: f64, locality: &str) -> Customer {
    Customer {
        id: Uuid::new_v4(),
        name: name.to_string(),
        phone: "+919876543210".to_string(),
        email: None,
        budget_min,
        budget_max,
        preferred_types: vec!["apartment".to_string(), "house".to_string()],
        preferred_locations: PreferredLocations {
            city: Some("Karimnagar".to_string()),
            locality: Some(locality.to_string()),
            district: None,
        },
        opt_in_whatsapp: true,
        opt_in_timestamp: None,
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn create_property(title: &str, price: f64, locality: &str, status: PropertyStatus) -> Property {
    Property {
        id: Uuid::new_v4(),
        title: title.to_string(),
        property_type: "apartment".to_string(),
        price,
        location: PropertyLocation {
            city: "Karimnagar".to_string(),
            locality: Some(locality.to_string()),
            district: None,
            address: None,
        },
        client_id: Uuid::new_v4(),
        bedrooms: None,
        bathrooms: None,
        area: None,
        description: None,
        status,
        images: vec![],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[::core::prelude::v1::test]
fn test_integration_end_to_end_ranking() {
    let matcher = Matcher::with_default_weights();
    let customer = create_customer("Buyer", 2_000_000.0, 5_000_000.0, "Town Center");

    let properties = vec![
        create_property("perfect", 3_500_000.0, "Town Center", PropertyStatus::Available),
        create_property("same city", 3_500_000.0, "Kothirampur", PropertyStatus::Available),
        create_property("pricey", 6_000_000.0, "Town Center", PropertyStatus::Available),
        create_property("sold", 3_500_000.0, "Town Center", PropertyStatus::Sold),
        create_property("on hold", 3_500_000.0, "Town Center", PropertyStatus::OnHold),
        create_property("way out", 20_000_000.0, "Kothirampur", PropertyStatus::Available),
    ];

    let result = matcher.top_properties(&customer, properties, 3);

    assert_eq!(result.total_candidates, 6);
    assert_eq!(result.matches.len(), 3);
    assert_eq!(result.matches[0].property.title, "perfect");
    assert_eq!(result.matches[0].breakdown.score, 100.0);
    assert_eq!(result.matches[1].property.title, "same city");

    for m in &result.matches {
        assert_eq!(m.property.status, PropertyStatus::Available);
        assert!((0.0..=100.0).contains(&m.breakdown.score));
    }

    for pair in result.matches.windows(2) {
        assert!(pair[0].breakdown.score >= pair[1].breakdown.score, "Matches not sorted by score");
    }
}

#[actix_web::test]
async fn test_health() {
    let state = test_state(&Settings::default());
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["counts"]["properties"], 0);
}

#[actix_web::test]
async fn test_score_endpoint() {
    let state = test_state(&Settings::default());
    let app = test_app!(state);

    let customer = create_customer("Buyer", 2_000_000.0, 5_000_000.0, "Town Center");
    let property = create_property("Flat", 3_500_000.0, "Town Center", PropertyStatus::Available);

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/score")
        .set_json(json!({ "customer": customer, "property": property }))
        .to_request();
    let breakdown: MatchBreakdown = test::call_and_read_body_json(&app, req).await;

    assert_eq!(breakdown.score, 100.0);
    assert_eq!(breakdown.type_match, 1);
    assert_eq!(breakdown.reasons.len(), 3);
}

#[actix_web::test]
async fn test_score_endpoint_rejects_negative_budget() {
    let state = test_state(&Settings::default());
    let app = test_app!(state);

    let customer = create_customer("Buyer", -1.0, 5_000_000.0, "Town Center");
    let property = create_property("Flat", 3_500_000.0, "Town Center", PropertyStatus::Available);

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/score")
        .set_json(json!({ "customer": customer, "property": property }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let state = test_state(&Settings::default());
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/score")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"customer\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_json");
}

#[actix_web::test]
async fn test_rank_customers_endpoint() {
    let state = test_state(&Settings::default());
    let app = test_app!(state);

    let property = create_property("Flat", 3_500_000.0, "Town Center", PropertyStatus::Sold);
    let customers = vec![
        create_customer("elsewhere", 3_000_000.0, 4_000_000.0, "Kothirampur"),
        create_customer("local", 3_000_000.0, 4_000_000.0, "Town Center"),
        create_customer("tiny budget", 100_000.0, 200_000.0, "Town Center"),
    ];

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/customers")
        .set_json(json!({ "property": property, "customers": customers, "limit": 2 }))
        .to_request();
    let body: PropertyMatchesResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.property.id, property.id);
    assert_eq!(body.matches.len(), 2);
    assert_eq!(body.matches[0].customer.name, "local");
    assert_eq!(body.matches[1].customer.name, "elsewhere");
}

#[actix_web::test]
async fn test_catalog_matching_flow() {
    let state = test_state(&Settings::default());
    let app = test_app!(state);

    // Seller
    let req = test::TestRequest::post()
        .uri("/api/v1/clients")
        .set_json(json!({ "name": "Owner", "phone": "+919811111111" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let client_id = body["client"]["id"].as_str().unwrap().to_string();

    // Buyer
    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .set_json(json!({
            "name": "Buyer",
            "phone": "+919822222222",
            "budget_min": 2_000_000.0,
            "budget_max": 5_000_000.0,
            "preferred_types": ["apartment"],
            "preferred_locations": { "locality": "Town Center" },
            "opt_in_whatsapp": true
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let customer_id = body["customer"]["id"].as_str().unwrap().to_string();
    assert!(body["customer"]["opt_in_timestamp"].is_string());

    // Listings
    let mut property_ids = Vec::new();
    for (title, price, status) in [
        ("Town Center flat", 3_500_000.0, "available"),
        ("Sold flat", 3_500_000.0, "sold"),
        ("Big flat", 5_500_000.0, "available"),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/properties")
            .set_json(json!({
                "title": title,
                "type": "apartment",
                "price": price,
                "location": { "city": "Karimnagar", "locality": "Town Center" },
                "client_id": client_id,
                "status": status
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        property_ids.push(body["property"]["id"].as_str().unwrap().to_string());
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/customers/{}/matches", customer_id))
        .to_request();
    let body: CustomerMatchesResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.customer.name, "Buyer");
    assert_eq!(body.matches.len(), 2);
    assert_eq!(body.matches[0].property.title, "Town Center flat");
    assert_eq!(body.matches[1].property.title, "Big flat");

    // Selling the best listing must drop it from a fresh ranking
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/properties/{}", property_ids[0]))
        .set_json(json!({ "status": "sold" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/customers/{}/matches", customer_id))
        .to_request();
    let body: CustomerMatchesResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.matches.len(), 1);
    assert_eq!(body.matches[0].property.title, "Big flat");

    // Reverse direction
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/properties/{}/matches?limit=5", property_ids[1]))
        .to_request();
    let body: PropertyMatchesResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.matches.len(), 1);
    assert_eq!(body.matches[0].customer.name, "Buyer");

    // Listing filters
    let req = test::TestRequest::get()
        .uri("/api/v1/properties?status=available&city=Karimnagar")
        .to_request();
    let body: PropertyListResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.total, 1);
    assert_eq!(body.properties[0].title, "Big flat");
}

#[actix_web::test]
async fn test_unknown_ids() {
    let state = test_state(&Settings::default());
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/customers/{}/matches", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/properties/{}", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/v1/properties")
        .set_json(json!({
            "title": "Orphan",
            "type": "plot",
            "price": 1_000_000.0,
            "location": { "city": "Karimnagar" },
            "client_id": Uuid::new_v4()
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_customer_validation() {
    let state = test_state(&Settings::default());
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .set_json(json!({
            "name": "",
            "phone": "+919822222222",
            "budget_min": 1.0,
            "budget_max": 2.0
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["status_code"], 400);
}

#[actix_web::test]
async fn test_message_rate_limit() {
    let mut settings = Settings::default();
    settings.messages.rate_limit = 1;
    let state = test_state(&settings);
    let app = test_app!(state);

    let message = json!({
        "to_phone": "+919876543210",
        "message_text": "New 2BHK listing in Town Center",
        "created_by": "admin"
    });

    let req = test::TestRequest::post()
        .uri("/api/v1/messages")
        .set_json(&message)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/v1/messages")
        .set_json(&message)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    let req = test::TestRequest::get().uri("/api/v1/messages").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["messages"][0]["method"], "wa.me");
    assert_eq!(body["messages"][0]["status"], "recorded");
}

#[actix_web::test]
async fn test_repeated_customer_matches_served_from_cache() {
    let state = test_state(&Settings::default());
    let (customer, _) = seed_catalog(&state).await;
    let app = test_app!(state);

    let uri = format!("/api/v1/customers/{}/matches", customer.id);

    let req = test::TestRequest::get().uri(&uri).to_request();
    let first: Value = test::call_and_read_body_json(&app, req).await;

    let key = CacheKey::customer_matches(&customer.id, 10, state.catalog.generation());
    let cached: CustomerMatchesResponse = state.cache.get(&key).await.unwrap();
    assert_eq!(cached.matches.len(), 1);

    let req = test::TestRequest::get().uri(&uri).to_request();
    let second: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(first, second);
    assert_eq!(second["matches"][0]["property"]["title"], "Town Center flat");
}

#[actix_web::test]
async fn test_new_customer_refreshes_property_matches() {
    let state = test_state(&Settings::default());
    let (_, property) = seed_catalog(&state).await;
    let app = test_app!(state);

    let uri = format!("/api/v1/properties/{}/matches", property.id);

    let req = test::TestRequest::get().uri(&uri).to_request();
    let body: PropertyMatchesResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.matches.len(), 1);

    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .set_json(json!({
            "name": "Second buyer",
            "phone": "+919833333333",
            "budget_min": 3_000_000.0,
            "budget_max": 4_000_000.0,
            "preferred_types": ["apartment"],
            "preferred_locations": { "locality": "Town Center" }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get().uri(&uri).to_request();
    let body: PropertyMatchesResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.matches.len(), 2);
    assert!(body.matches.iter().any(|m| m.customer.name == "Second buyer"));
}

#[actix_web::test]
async fn test_ranking_stored_after_a_write_is_not_served() {
    let state = test_state(&Settings::default());
    let (customer, property) = seed_catalog(&state).await;
    let app = test_app!(state);

    // Ranked before the listing sells
    let generation = state.catalog.generation();
    let result = state
        .matcher
        .top_properties(&customer, state.catalog.properties().await, 10);
    let stale = CustomerMatchesResponse {
        customer: customer.summary(),
        matches: result.matches,
    };

    state
        .catalog
        .update_property(
            property.id,
            UpdatePropertyRequest {
                status: Some(PropertyStatus::Sold),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    state.cache.invalidate_all();

    // Stored after the write and the cache clear
    let key = CacheKey::customer_matches(&customer.id, 10, generation);
    state.cache.set(&key, &stale).await.unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/customers/{}/matches", customer.id))
        .to_request();
    let body: CustomerMatchesResponse = test::call_and_read_body_json(&app, req).await;

    assert!(body.matches.is_empty());
}
