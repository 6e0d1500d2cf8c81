// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use filters::{is_matchable, matches_client_search, matches_customer_search, matches_message_query, matches_property_query};
pub use matcher::{MatchResult, Matcher};
pub use scoring::{calculate_location_score, calculate_match_score, calculate_price_score, calculate_type_match, format_price};
