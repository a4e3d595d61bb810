// MediBook Client - library root

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod request;
pub mod store;

pub use auth::{AccountApi, SessionManager};
pub use config::Config;
pub use error::ApiError;
pub use gateway::ApiGateway;
pub use request::{Body, MultipartForm, RequestOptions};
pub use store::{CredentialStore, MemoryStore, SqliteStore, ACCESS_TOKEN_KEY, USER_KEY};
