use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Buyer's preferred location. Every field is optional; a missing field
/// never matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferredLocations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
}

/// Buyer profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Customer {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(email)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opt_in_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Condensed view returned alongside match results
    pub fn summary(&self) -> CustomerSummary {
        CustomerSummary {
            id: self.id,
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            budget_min: self.budget_min,
            budget_max: self.budget_max,
            preferred_types: self.preferred_types.clone(),
            preferred_locations: self.preferred_locations.clone(),
            opt_in_whatsapp: self.opt_in_whatsapp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub budget_min: f64,
    pub budget_max: f64,
    pub preferred_types: Vec<String>,
    pub preferred_locations: PreferredLocations,
    pub opt_in_whatsapp: bool,
}

/// Listing availability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    #[default]
    Available,
    Sold,
    OnHold,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct PropertyLocation {
    #[validate(length(min = 1))]
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Property listing owned by a client
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Property {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    /// Floor area in sqft
    #[validate(range(min = 0.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: PropertyStatus,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Property {
    pub fn is_available(&self) -> bool {
        self.status == PropertyStatus::Available
    }

    pub fn summary(&self) -> PropertySummary {
        PropertySummary {
            id: self.id,
            title: self.title.clone(),
            property_type: self.property_type.clone(),
            price: self.price,
            location: self.location.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySummary {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub price: f64,
    pub location: PropertyLocation,
}

/// Seller
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Client {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(email)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageMethod {
    #[default]
    #[serde(rename = "wa.me")]
    WaMe,
    #[serde(rename = "cloud_api")]
    CloudApi,
    #[serde(rename = "twilio")]
    Twilio,
    #[serde(rename = "manual")]
    Manual,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    Recorded,
    Sent,
    Failed,
    Pending,
}

/// Log record of an outbound WhatsApp message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub to_phone: String,
    pub message_text: String,
    #[serde(default)]
    pub method: MessageMethod,
    #[serde(default)]
    pub status: MessageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_by: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Scorer output for one customer/property pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    pub score: f64,
    pub type_match: u8,
    pub location_score: f64,
    pub price_score: f64,
    pub reasons: Vec<String>,
}

/// A property ranked for a customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyMatch {
    pub property: Property,
    #[serde(flatten)]
    pub breakdown: MatchBreakdown,
}

/// A customer ranked for a property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerMatch {
    pub customer: CustomerSummary,
    #[serde(flatten)]
    pub breakdown: MatchBreakdown,
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub price: f64,
    pub location: f64,
    pub type_match: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            price: 0.5,
            location: 0.3,
            type_match: 0.2,
        }
    }
}
