mod client;
mod config;
pub mod credentials;
mod errors;
pub mod pagination;
mod query;
mod throttle;
pub mod transport;
pub mod types;
pub use self::client::{Client, ClientBuilder, SearchResult, AUTH_HEADER, LEGACY_AUTH_HEADER};
pub use self::config::Stage;
pub use self::errors::Error;
pub use self::query::SearchQuery;
pub use self::throttle::Throttle;
pub use self::transport::{ApiRequest, ApiResponse, HttpTransport, ResponseBody, Transport};
