pub mod config;
pub mod db;
pub mod error;
pub mod timestamp;

pub use db::{Connection, Credentials, MySqlConnector, Registry};
pub use error::RegistryError;
pub use timestamp::format_timestamp;
