use crate::db::connector::Connector;
use crate::db::credentials::Credentials;
use crate::error::RegistryError;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_ENCODING: &str = "utf8mb4";

/// A stored connection and who is responsible for releasing it.
#[derive(Debug)]
pub enum Connection<H> {
    /// Opened by the registry from credentials.
    Owned {
        credentials: Credentials,
        handle: Arc<H>,
    },
    /// Supplied and managed by the embedding application.
    Borrowed { handle: Arc<H> },
}

impl<H> Connection<H> {
    pub fn handle(&self) -> &Arc<H> {
        match self {
            Connection::Owned { handle, .. } | Connection::Borrowed { handle } => handle,
        }
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        match self {
            Connection::Owned { credentials, .. } => Some(credentials),
            Connection::Borrowed { .. } => None,
        }
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, Connection::Owned { .. })
    }
}

/// Holds at most one database connection plus the table prefix callers use.
///
/// Initialization takes `&mut self`, so it cannot overlap with readers of the
/// registry. Handles are handed out as `Arc` clones and outlive a replacement.
pub struct Registry<K: Connector> {
    connector: K,
    current: Option<Connection<K::Handle>>,
    table_prefix: Option<String>,
}

impl<K: Connector> Registry<K> {
    pub fn new(connector: K) -> Self {
        Self {
            connector,
            current: None,
            table_prefix: None,
        }
    }

    /// Open a new connection and make it the current one.
    ///
    /// `encoding` defaults to [`DEFAULT_ENCODING`]. On error the previous
    /// state is left as it was.
    pub async fn initialize_from_credentials(
        &mut self,
        credentials: Credentials,
        table_prefix: Option<String>,
        encoding: Option<&str>,
    ) -> Result<Arc<K::Handle>, RegistryError> {
        credentials.validate()?;
        let encoding = encoding.unwrap_or(DEFAULT_ENCODING);
        validate_encoding(encoding)?;

        let target = credentials.target();
        let handle = match self.connector.connect(&credentials, encoding).await {
            Ok(h) => Arc::new(h),
            Err(msg) => {
                warn!(endpoint = %target, error = %msg, "database connection failed");
                return Err(RegistryError::ConnectionFailed(msg));
            }
        };
        info!(
            endpoint = %target,
            user = %credentials.user,
            encoding,
            "database connection established"
        );

        self.replace(
            Connection::Owned {
                credentials,
                handle: handle.clone(),
            },
            table_prefix,
        );
        Ok(handle)
    }

    /// Adopt a connection the caller already opened. The stored credentials are cleared.
    pub fn initialize_from_existing(
        &mut self,
        handle: Option<Arc<K::Handle>>,
        table_prefix: Option<String>,
    ) -> Result<Arc<K::Handle>, RegistryError> {
        let handle = handle.ok_or(RegistryError::ExternalConnectionMissing)?;
        info!("using external database connection");
        self.replace(
            Connection::Borrowed {
                handle: handle.clone(),
            },
            table_prefix,
        );
        Ok(handle)
    }

    pub fn is_connected(&self) -> bool {
        self.current.is_some()
    }

    pub fn connection(&self) -> Option<Arc<K::Handle>> {
        self.current.as_ref().map(|c| c.handle().clone())
    }

    pub fn current(&self) -> Option<&Connection<K::Handle>> {
        self.current.as_ref()
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.current.as_ref().and_then(Connection::credentials)
    }

    pub fn table_prefix(&self) -> Option<&str> {
        self.table_prefix.as_deref()
    }

    fn replace(&mut self, next: Connection<K::Handle>, table_prefix: Option<String>) {
        // An owned handle closes once its last Arc clone is dropped.
        if let Some(prev) = self.current.replace(next) {
            debug!(
                owned = prev.is_owned(),
                outstanding = Arc::strong_count(prev.handle()) - 1,
                "releasing previous database connection"
            );
        }
        self.table_prefix = table_prefix;
    }
}

/// Charset names are sent inside `SET NAMES`, so only identifiers are allowed.
fn validate_encoding(encoding: &str) -> Result<(), RegistryError> {
    let valid = !encoding.is_empty()
        && encoding
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(RegistryError::InvalidEncoding(encoding.to_string()))
    }
}
