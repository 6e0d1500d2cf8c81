use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::domain::{Customer, PreferredLocations, Property, PropertyLocation, PropertyStatus};

/// Score one customer against one property
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScoreRequest {
    #[validate(nested)]
    pub customer: Customer,
    #[validate(nested)]
    pub property: Property,
}

/// Rank a set of properties for a customer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankPropertiesRequest {
    #[validate(nested)]
    pub customer: Customer,
    #[validate(nested)]
    pub properties: Vec<Property>,
    #[validate(range(min = 1))]
    pub limit: Option<usize>,
}

/// Rank a set of customers for a property
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankCustomersRequest {
    #[validate(nested)]
    pub property: Property,
    #[validate(nested)]
    pub customers: Vec<Customer>,
    #[validate(range(min = 1))]
    pub limit: Option<usize>,
}

/// `?limit=` on the by-id match endpoints
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MatchQuery {
    #[validate(range(min = 1))]
    pub limit: Option<usize>,
}

/// Search and paging parameters shared by the list endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub skip: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyListQuery {
    pub status: Option<PropertyStatus>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub city: Option<String>,
    pub limit: Option<usize>,
    pub skip: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageListQuery {
    pub customer_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub limit: Option<usize>,
    pub skip: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(range(min = 0.0))]
    pub budget_min: f64,
    #[validate(range(min = 0.0))]
    pub budget_max: f64,
    #[serde(default)]
    pub preferred_types: Vec<String>,
    #[serde(default)]
    pub preferred_locations: PreferredLocations,
    #[serde(default)]
    pub opt_in_whatsapp: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePropertyRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    #[serde(rename = "type")]
    pub property_type: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(nested)]
    pub location: PropertyLocation,
    pub client_id: Uuid,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    #[validate(range(min = 0.0))]
    pub area: Option<f64>,
    pub description: Option<String>,
    #[serde(default)]
    pub status: PropertyStatus,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Partial property update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePropertyRequest {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(nested)]
    pub location: Option<PropertyLocation>,
    pub client_id: Option<Uuid>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    #[validate(range(min = 0.0))]
    pub area: Option<f64>,
    pub description: Option<String>,
    pub status: Option<PropertyStatus>,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordMessageRequest {
    #[validate(length(min = 1))]
    pub to_phone: String,
    #[validate(length(min = 1))]
    pub message_text: String,
    pub property_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    #[validate(length(min = 1))]
    pub created_by: String,
}
