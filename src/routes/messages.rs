use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

use super::{error_response, validation_error, AppState};
use crate::models::{MessageListQuery, MessageListResponse, RecordMessageRequest, RecordMessageResponse};
use crate::services::Page;

const DEFAULT_PAGE_SIZE: usize = 50;

/// Configure message log routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/messages", web::get().to(list_messages))
        .route("/messages", web::post().to(record_message));
}

/// GET /api/v1/messages?customer_id=&property_id=&limit=&skip=
async fn list_messages(
    state: web::Data<AppState>,
    query: web::Query<MessageListQuery>,
) -> impl Responder {
    let page = Page::new(query.limit, query.skip, DEFAULT_PAGE_SIZE);
    let (messages, total) = state.catalog.list_messages(&query, page).await;

    HttpResponse::Ok().json(MessageListResponse {
        messages,
        total,
        limit: page.limit,
        skip: page.skip,
    })
}

/// Record an outbound message in the log
///
/// POST /api/v1/messages
///
/// Request body:
/// ```json
/// {
///   "to_phone": "+919876543210",
///   "message_text": "string",
///   "property_id": "uuid",
///   "customer_id": "uuid",
///   "created_by": "string"
/// }
/// ```
async fn record_message(
    state: web::Data<AppState>,
    req: web::Json<RecordMessageRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    if !state.limiter.check(&req.created_by) {
        tracing::warn!("Message rate limit exceeded for {}", req.created_by);
        return error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded",
            "Rate limit exceeded. Please try again later.",
        );
    }

    // Sending without opt-in is allowed, but flagged
    if let Some(customer_id) = req.customer_id {
        if let Ok(customer) = state.catalog.get_customer(customer_id).await {
            if !customer.opt_in_whatsapp {
                tracing::warn!("Recording message to customer {} without opt-in", customer_id);
            }
        }
    }

    let message = state.catalog.record_message(req.into_inner()).await;

    tracing::info!("Recorded message {} to {}", message.id, message.to_phone);

    HttpResponse::Ok().json(RecordMessageResponse {
        success: true,
        message_id: message.id,
    })
}
