use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use super::{catalog_error, validation_error, AppState};
use crate::models::{
    ClientListResponse, CreateClientRequest, CreateCustomerRequest, CreatePropertyRequest,
    CustomerListResponse, ListQuery, PropertyListQuery, PropertyListResponse,
    UpdatePropertyRequest,
};
use crate::services::Page;

/// Default page size for the client, customer and listing endpoints
const DEFAULT_PAGE_SIZE: usize = 100;

/// Configure client, customer and listing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/clients", web::get().to(list_clients))
        .route("/clients", web::post().to(create_client))
        .route("/customers", web::get().to(list_customers))
        .route("/customers", web::post().to(create_customer))
        .route("/properties", web::get().to(list_properties))
        .route("/properties", web::post().to(create_property))
        .route("/properties/{id}", web::get().to(get_property))
        .route("/properties/{id}", web::patch().to(update_property))
        .route("/properties/{id}", web::delete().to(delete_property));
}

/// GET /api/v1/clients?search=&limit=&skip=
async fn list_clients(state: web::Data<AppState>, query: web::Query<ListQuery>) -> impl Responder {
    let page = Page::new(query.limit, query.skip, DEFAULT_PAGE_SIZE);
    let (clients, total) = state.catalog.list_clients(&query, page).await;

    HttpResponse::Ok().json(ClientListResponse {
        clients,
        total,
        limit: page.limit,
        skip: page.skip,
    })
}

/// POST /api/v1/clients
async fn create_client(
    state: web::Data<AppState>,
    req: web::Json<CreateClientRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let client = state.catalog.create_client(req.into_inner()).await;
    tracing::info!("Created client {}", client.id);

    HttpResponse::Created().json(serde_json::json!({ "client": client }))
}

/// GET /api/v1/customers?search=&limit=&skip=
async fn list_customers(state: web::Data<AppState>, query: web::Query<ListQuery>) -> impl Responder {
    let page = Page::new(query.limit, query.skip, DEFAULT_PAGE_SIZE);
    let (customers, total) = state.catalog.list_customers(&query, page).await;

    HttpResponse::Ok().json(CustomerListResponse {
        customers,
        total,
        limit: page.limit,
        skip: page.skip,
    })
}

/// POST /api/v1/customers
async fn create_customer(
    state: web::Data<AppState>,
    req: web::Json<CreateCustomerRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let customer = state.catalog.create_customer(req.into_inner()).await;
    state.cache.invalidate_all();
    tracing::info!("Created customer {}", customer.id);

    HttpResponse::Created().json(serde_json::json!({ "customer": customer }))
}

/// GET /api/v1/properties?status=&type=&city=&limit=&skip=
async fn list_properties(
    state: web::Data<AppState>,
    query: web::Query<PropertyListQuery>,
) -> impl Responder {
    let page = Page::new(query.limit, query.skip, DEFAULT_PAGE_SIZE);
    let (properties, total) = state.catalog.list_properties(&query, page).await;

    HttpResponse::Ok().json(PropertyListResponse {
        properties,
        total,
        limit: page.limit,
        skip: page.skip,
    })
}

/// POST /api/v1/properties
async fn create_property(
    state: web::Data<AppState>,
    req: web::Json<CreatePropertyRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    match state.catalog.create_property(req.into_inner()).await {
        Ok(property) => {
            state.cache.invalidate_all();
            tracing::info!("Created property {}", property.id);
            HttpResponse::Created().json(serde_json::json!({ "property": property }))
        }
        Err(e) => catalog_error(e),
    }
}

/// GET /api/v1/properties/{id}
async fn get_property(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    match state.catalog.get_property(path.into_inner()).await {
        Ok(property) => HttpResponse::Ok().json(serde_json::json!({ "property": property })),
        Err(e) => catalog_error(e),
    }
}

/// PATCH /api/v1/properties/{id}
async fn update_property(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<UpdatePropertyRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    match state.catalog.update_property(path.into_inner(), req.into_inner()).await {
        Ok(property) => {
            state.cache.invalidate_all();
            tracing::info!("Updated property {}", property.id);
            HttpResponse::Ok().json(serde_json::json!({ "property": property }))
        }
        Err(e) => catalog_error(e),
    }
}

/// DELETE /api/v1/properties/{id}
async fn delete_property(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let property_id = path.into_inner();

    match state.catalog.delete_property(property_id).await {
        Ok(()) => {
            state.cache.invalidate_all();
            tracing::info!("Deleted property {}", property_id);
            HttpResponse::Ok().json(serde_json::json!({ "success": true }))
        }
        Err(e) => catalog_error(e),
    }
}
