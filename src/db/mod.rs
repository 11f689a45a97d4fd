//! Database module: a single MySQL connection and who owns it.
//!
//! Layout:
//! - `credentials.rs`: connection parameters and validation
//! - `connector.rs`: the `Connector` seam and its sqlx MySQL implementation
//! - `registry.rs`: `Registry`, holding the current connection and table prefix

pub mod connector;
pub mod credentials;
pub mod registry;

pub use connector::{Connector, MySqlConnector, MySqlHandle};
pub use credentials::Credentials;
pub use registry::{Connection, DEFAULT_ENCODING, Registry};
