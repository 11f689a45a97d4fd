use crate::db::credentials::Credentials;
use secrecy::ExposeSecret;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection};
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;

/// Opens a single database connection from credentials.
pub trait Connector {
    type Handle: Send + Sync;

    /// The error message is surfaced verbatim in `RegistryError::ConnectionFailed`.
    fn connect(
        &self,
        credentials: &Credentials,
        encoding: &str,
    ) -> impl Future<Output = Result<Self::Handle, String>> + Send;
}

/// One MySQL connection; callers lock it for the duration of a query.
pub type MySqlHandle = Mutex<MySqlConnection>;

#[derive(Debug, Clone, Default)]
pub struct MySqlConnector {
    connect_timeout: Option<Duration>,
}

impl MySqlConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the connect attempt. Without this the client/network timeout applies.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn options(credentials: &Credentials, encoding: &str) -> MySqlConnectOptions {
        let mut opts = MySqlConnectOptions::new()
            .host(&credentials.host)
            .database(&credentials.database)
            .username(&credentials.user)
            .password(credentials.password.expose_secret())
            // issued as `SET NAMES <charset>` once connected
            .charset(encoding)
            .log_statements(log::LevelFilter::Debug);
        if let Some(port) = credentials.port {
            opts = opts.port(port);
        }
        opts
    }
}

impl Connector for MySqlConnector {
    type Handle = MySqlHandle;

    async fn connect(
        &self,
        credentials: &Credentials,
        encoding: &str,
    ) -> Result<Self::Handle, String> {
        let opts = Self::options(credentials, encoding);
        let attempt = MySqlConnection::connect_with(&opts);
        let conn = match self.connect_timeout {
            Some(limit) => tokio::time::timeout(limit, attempt)
                .await
                .map_err(|_| format!("connect timed out after {}s", limit.as_secs_f32()))?,
            None => attempt.await,
        }
        .map_err(|e| e.to_string())?;
        Ok(Mutex::new(conn))
    }
}
