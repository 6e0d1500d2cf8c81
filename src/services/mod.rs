// Service exports
pub mod cache;
pub mod catalog;
pub mod rate_limit;

pub use cache::{CacheError, CacheKey, CacheManager};
pub use catalog::{Catalog, CatalogError, CatalogSnapshot, Page};
pub use rate_limit::RateLimiter;
