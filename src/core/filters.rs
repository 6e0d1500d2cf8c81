use crate::models::{Client, Customer, Message, MessageListQuery, Property, PropertyListQuery};

/// Only available listings take part in customer -> property matching
#[inline]
pub fn is_matchable(property: &Property) -> bool {
    property.is_available()
}

/// Case-insensitive substring search over name, phone and email
pub fn matches_contact_search(
    search: Option<&str>,
    name: &str,
    phone: &str,
    email: Option<&str>,
) -> bool {
    let needle = match search.map(str::trim).filter(|s| !s.is_empty()) {
        Some(needle) => needle.to_lowercase(),
        None => return true,
    };

    name.to_lowercase().contains(&needle)
        || phone.to_lowercase().contains(&needle)
        || email.is_some_and(|e| e.to_lowercase().contains(&needle))
}

#[inline]
pub fn matches_client_search(client: &Client, search: Option<&str>) -> bool {
    matches_contact_search(search, &client.name, &client.phone, client.email.as_deref())
}

#[inline]
pub fn matches_customer_search(customer: &Customer, search: Option<&str>) -> bool {
    matches_contact_search(search, &customer.name, &customer.phone, customer.email.as_deref())
}

/// Exact-match listing filters: status, type and city
pub fn matches_property_query(property: &Property, query: &PropertyListQuery) -> bool {
    if let Some(status) = query.status {
        if property.status != status {
            return false;
        }
    }

    if let Some(property_type) = query.property_type.as_deref() {
        if property.property_type != property_type {
            return false;
        }
    }

    if let Some(city) = query.city.as_deref() {
        if property.location.city != city {
            return false;
        }
    }

    true
}

pub fn matches_message_query(message: &Message, query: &MessageListQuery) -> bool {
    if query.customer_id.is_some() && message.customer_id != query.customer_id {
        return false;
    }

    if query.property_id.is_some() && message.property_id != query.property_id {
        return false;
    }

    true
}
