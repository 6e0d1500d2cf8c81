use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{
    Client, Customer, CustomerMatch, CustomerSummary, Message, Property, PropertyMatch,
    PropertySummary,
};

/// Ranked properties for one customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerMatchesResponse {
    pub customer: CustomerSummary,
    pub matches: Vec<PropertyMatch>,
}

/// Ranked customers for one property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyMatchesResponse {
    pub property: PropertySummary,
    pub matches: Vec<CustomerMatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogCounts {
    pub clients: usize,
    pub customers: usize,
    pub properties: usize,
    pub messages: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub counts: CatalogCounts,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientListResponse {
    pub clients: Vec<Client>,
    pub total: usize,
    pub limit: usize,
    pub skip: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerListResponse {
    pub customers: Vec<Customer>,
    pub total: usize,
    pub limit: usize,
    pub skip: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyListResponse {
    pub properties: Vec<Property>,
    pub total: usize,
    pub limit: usize,
    pub skip: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageListResponse {
    pub messages: Vec<Message>,
    pub total: usize,
    pub limit: usize,
    pub skip: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordMessageResponse {
    pub success: bool,
    pub message_id: Uuid,
}
