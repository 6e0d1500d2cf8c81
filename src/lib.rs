//! KCRM - real-estate CRM service with property/customer matching
//!
//! This library provides the match scorer and ranking used to suggest
//! listings to buyers and buyers to listings, plus the in-memory catalog and
//! HTTP routes serving them.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{calculate_match_score, MatchResult, Matcher};
pub use models::{Customer, MatchBreakdown, Property, PropertyStatus, ScoringWeights};
