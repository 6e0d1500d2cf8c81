use crate::core::{matches_client_search, matches_customer_search, matches_message_query, matches_property_query};
use crate::models::{
    CatalogCounts, Client, CreateClientRequest, CreateCustomerRequest, CreatePropertyRequest,
    Customer, ListQuery, Message, MessageListQuery, MessageMethod, MessageStatus, Property,
    PropertyListQuery, RecordMessageRequest, UpdatePropertyRequest,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Errors that can occur when reading or writing the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-disk JSON form of the catalog, used to seed it at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Paging window applied to list results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub skip: usize,
}

impl Page {
    pub fn new(limit: Option<usize>, skip: Option<usize>, default_limit: usize) -> Self {
        Self {
            limit: limit.unwrap_or(default_limit),
            skip: skip.unwrap_or(0),
        }
    }
}

/// In-memory record store for clients, customers, listings and the
/// message log
///
/// Records are kept in insertion order; list endpoints return them newest
/// first, matching receives them oldest first.
///
/// `generation` advances after every client, customer or listing write.
/// Message records do not affect matching and leave it alone.
pub struct Catalog {
    data: RwLock<CatalogSnapshot>,
    generation: AtomicU64,
}

impl Catalog {
    pub fn new() -> Self {
        Self::from_snapshot(CatalogSnapshot::default())
    }

    pub fn from_snapshot(mut snapshot: CatalogSnapshot) -> Self {
        snapshot.clients.sort_by_key(|c| c.created_at);
        snapshot.customers.sort_by_key(|c| c.created_at);
        snapshot.properties.sort_by_key(|p| p.created_at);
        snapshot.messages.sort_by_key(|m| m.created_at);

        for property in &snapshot.properties {
            if !snapshot.clients.iter().any(|c| c.id == property.client_id) {
                tracing::warn!(
                    "Property {} references unknown client {}",
                    property.id,
                    property.client_id
                );
            }
        }

        Self {
            data: RwLock::new(snapshot),
            generation: AtomicU64::new(0),
        }
    }

    /// Current write generation. Anything read after this call is at least
    /// as new as the generation returned.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    fn bump_generation(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Load a catalog from a JSON snapshot file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let snapshot: CatalogSnapshot = serde_json::from_str(&raw)?;

        tracing::info!(
            "Loaded catalog snapshot from {}: {} clients, {} customers, {} properties, {} messages",
            path.as_ref().display(),
            snapshot.clients.len(),
            snapshot.customers.len(),
            snapshot.properties.len(),
            snapshot.messages.len()
        );

        Ok(Self::from_snapshot(snapshot))
    }

    pub async fn counts(&self) -> CatalogCounts {
        let data = self.data.read().await;
        CatalogCounts {
            clients: data.clients.len(),
            customers: data.customers.len(),
            properties: data.properties.len(),
            messages: data.messages.len(),
        }
    }

    pub async fn create_client(&self, req: CreateClientRequest) -> Client {
        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4(),
            name: req.name.trim().to_string(),
            phone: req.phone.trim().to_string(),
            email: normalize_email(req.email),
            address: req.address,
            notes: req.notes,
            created_at: now,
            updated_at: now,
        };

        self.data.write().await.clients.push(client.clone());
        self.bump_generation();
        tracing::debug!("Created client {}", client.id);

        client
    }

    pub async fn list_clients(&self, query: &ListQuery, page: Page) -> (Vec<Client>, usize) {
        let data = self.data.read().await;
        paginate(
            data.clients
                .iter()
                .rev()
                .filter(|c| matches_client_search(c, query.search.as_deref())),
            page,
        )
    }

    pub async fn create_customer(&self, req: CreateCustomerRequest) -> Customer {
        let now = Utc::now();
        let customer = Customer {
            id: Uuid::new_v4(),
            name: req.name.trim().to_string(),
            phone: req.phone.trim().to_string(),
            email: normalize_email(req.email),
            budget_min: req.budget_min,
            budget_max: req.budget_max,
            preferred_types: req.preferred_types,
            preferred_locations: req.preferred_locations,
            opt_in_whatsapp: req.opt_in_whatsapp,
            opt_in_timestamp: req.opt_in_whatsapp.then_some(now),
            notes: req.notes,
            created_at: now,
            updated_at: now,
        };

        self.data.write().await.customers.push(customer.clone());
        self.bump_generation();
        tracing::debug!("Created customer {}", customer.id);

        customer
    }

    pub async fn get_customer(&self, id: Uuid) -> Result<Customer, CatalogError> {
        self.data
            .read()
            .await
            .customers
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("customer {}", id)))
    }

    pub async fn list_customers(&self, query: &ListQuery, page: Page) -> (Vec<Customer>, usize) {
        let data = self.data.read().await;
        paginate(
            data.customers
                .iter()
                .rev()
                .filter(|c| matches_customer_search(c, query.search.as_deref())),
            page,
        )
    }

    /// Every customer, oldest first
    pub async fn customers(&self) -> Vec<Customer> {
        self.data.read().await.customers.clone()
    }

    pub async fn create_property(&self, req: CreatePropertyRequest) -> Result<Property, CatalogError> {
        let mut data = self.data.write().await;

        if !data.clients.iter().any(|c| c.id == req.client_id) {
            return Err(CatalogError::InvalidInput(format!(
                "client {} does not exist",
                req.client_id
            )));
        }

        let now = Utc::now();
        let property = Property {
            id: Uuid::new_v4(),
            title: req.title.trim().to_string(),
            property_type: req.property_type.trim().to_string(),
            price: req.price,
            location: req.location,
            client_id: req.client_id,
            bedrooms: req.bedrooms,
            bathrooms: req.bathrooms,
            area: req.area,
            description: req.description,
            status: req.status,
            images: req.images,
            created_at: now,
            updated_at: now,
        };

        data.properties.push(property.clone());
        self.bump_generation();
        tracing::debug!("Created property {} for client {}", property.id, property.client_id);

        Ok(property)
    }

    pub async fn get_property(&self, id: Uuid) -> Result<Property, CatalogError> {
        self.data
            .read()
            .await
            .properties
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("property {}", id)))
    }

    /// Apply a partial update; fields absent from the request are kept
    pub async fn update_property(
        &self,
        id: Uuid,
        req: UpdatePropertyRequest,
    ) -> Result<Property, CatalogError> {
        let mut data = self.data.write().await;

        if let Some(client_id) = req.client_id {
            if !data.clients.iter().any(|c| c.id == client_id) {
                return Err(CatalogError::InvalidInput(format!(
                    "client {} does not exist",
                    client_id
                )));
            }
        }

        let property = data
            .properties
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CatalogError::NotFound(format!("property {}", id)))?;

        if let Some(title) = req.title {
            property.title = title.trim().to_string();
        }
        if let Some(property_type) = req.property_type {
            property.property_type = property_type.trim().to_string();
        }
        if let Some(price) = req.price {
            property.price = price;
        }
        if let Some(location) = req.location {
            property.location = location;
        }
        if let Some(client_id) = req.client_id {
            property.client_id = client_id;
        }
        if req.bedrooms.is_some() {
            property.bedrooms = req.bedrooms;
        }
        if req.bathrooms.is_some() {
            property.bathrooms = req.bathrooms;
        }
        if req.area.is_some() {
            property.area = req.area;
        }
        if req.description.is_some() {
            property.description = req.description;
        }
        if let Some(status) = req.status {
            property.status = status;
        }
        if let Some(images) = req.images {
            property.images = images;
        }
        property.updated_at = Utc::now();
        let updated = property.clone();
        self.bump_generation();

        Ok(updated)
    }

    pub async fn delete_property(&self, id: Uuid) -> Result<(), CatalogError> {
        let mut data = self.data.write().await;
        let before = data.properties.len();
        data.properties.retain(|p| p.id != id);

        if data.properties.len() == before {
            return Err(CatalogError::NotFound(format!("property {}", id)));
        }

        self.bump_generation();
        tracing::debug!("Deleted property {}", id);
        Ok(())
    }

    pub async fn list_properties(&self, query: &PropertyListQuery, page: Page) -> (Vec<Property>, usize) {
        let data = self.data.read().await;
        paginate(
            data.properties
                .iter()
                .rev()
                .filter(|p| matches_property_query(p, query)),
            page,
        )
    }

    /// Every listing, oldest first. Availability filtering is the matcher's job.
    pub async fn properties(&self) -> Vec<Property> {
        self.data.read().await.properties.clone()
    }

    pub async fn record_message(&self, req: RecordMessageRequest) -> Message {
        let now = Utc::now();
        let message = Message {
            id: Uuid::new_v4(),
            to_phone: req.to_phone.trim().to_string(),
            message_text: req.message_text,
            method: MessageMethod::WaMe,
            status: MessageStatus::Recorded,
            property_id: req.property_id,
            customer_id: req.customer_id,
            sent_at: None,
            error_message: None,
            created_by: req.created_by,
            created_at: now,
            updated_at: now,
        };

        self.data.write().await.messages.push(message.clone());

        message
    }

    pub async fn list_messages(&self, query: &MessageListQuery, page: Page) -> (Vec<Message>, usize) {
        let data = self.data.read().await;
        paginate(
            data.messages
                .iter()
                .rev()
                .filter(|m| matches_message_query(m, query)),
            page,
        )
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

fn paginate<'a, T, I>(items: I, page: Page) -> (Vec<T>, usize)
where
    T: Clone + 'a,
    I: Iterator<Item = &'a T>,
{
    let mut total = 0;
    let mut out = Vec::new();

    for (i, item) in items.enumerate() {
        total += 1;
        if i >= page.skip && out.len() < page.limit {
            out.push(item.clone());
        }
    }

    (out, total)
}

fn normalize_email(email: Option<String>) -> Option<String> {
    email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
}
