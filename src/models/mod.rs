// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Client, Customer, CustomerMatch, CustomerSummary, MatchBreakdown, Message, MessageMethod,
    MessageStatus, PreferredLocations, Property, PropertyLocation, PropertyMatch, PropertyStatus,
    PropertySummary, ScoringWeights,
};
pub use requests::{
    CreateClientRequest, CreateCustomerRequest, CreatePropertyRequest, ListQuery, MatchQuery,
    MessageListQuery, PropertyListQuery, RankCustomersRequest, RankPropertiesRequest,
    RecordMessageRequest, ScoreRequest, UpdatePropertyRequest,
};
pub use responses::{
    CatalogCounts, ClientListResponse, CustomerListResponse, CustomerMatchesResponse,
    ErrorResponse, HealthResponse, MessageListResponse, PropertyListResponse,
    PropertyMatchesResponse, RecordMessageResponse,
};
