use crate::error::RegistryError;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Connection parameters for a self-managed MySQL connection.
#[derive(Deserialize)]
pub struct Credentials {
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    pub database: String,
    pub user: String,
    #[serde(default = "empty_secret", deserialize_with = "secret_string")]
    pub password: SecretString,
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

fn secret_string<'de, D: Deserializer<'de>>(d: D) -> Result<SecretString, D::Error> {
    String::deserialize(d).map(SecretString::from)
}

impl Credentials {
    pub fn new(
        host: impl Into<String>,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: None,
            database: database.into(),
            user: user.into(),
            password: SecretString::from(password.into()),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.host.trim().is_empty() && self.database.trim().is_empty() && self.user.trim().is_empty()
    }

    /// Host, database and user are required; the password may be empty.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.is_empty() {
            return Err(RegistryError::CredentialsMissing);
        }
        let blank = [&self.host, &self.database, &self.user]
            .iter()
            .any(|s| s.trim().is_empty());
        if blank {
            return Err(RegistryError::CredentialsMissing);
        }
        Ok(())
    }

    /// Connection target without user or password, safe for logs.
    pub fn target(&self) -> String {
        match self.port {
            Some(port) => format!("mysql://{}:{}/{}", self.host, port, self.database),
            None => format!("mysql://{}/{}", self.host, self.database),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_required_field_is_missing() {
        let creds = Credentials::new("localhost", "", "bot", "pw");
        assert!(matches!(
            creds.validate(),
            Err(RegistryError::CredentialsMissing)
        ));
        assert!(!creds.is_empty());
    }

    #[test]
    fn empty_password_is_accepted() {
        let creds = Credentials::new("localhost", "telegram", "bot", "");
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn target_includes_port_only_when_set() {
        let creds = Credentials::new("db.internal", "telegram", "bot", "pw");
        assert_eq!(creds.target(), "mysql://db.internal/telegram");
        assert_eq!(
            creds.with_port(3307).target(),
            "mysql://db.internal:3307/telegram"
        );
    }

    #[test]
    fn deserializes_from_toml_table() {
        use figment::{
            Figment,
            providers::{Format, Toml},
        };
        use secrecy::ExposeSecret;

        let creds: Credentials = Figment::from(Toml::string(
            r#"
host = "db.internal"
port = 3307
database = "telegram"
user = "bot"
password = "hunter2"
"#,
        ))
        .extract()
        .unwrap();
        assert_eq!(creds.target(), "mysql://db.internal:3307/telegram");
        assert_eq!(creds.password.expose_secret(), "hunter2");

        let no_password: Credentials = Figment::from(Toml::string(
            r#"
host = "localhost"
database = "telegram"
user = "bot"
"#,
        ))
        .extract()
        .unwrap();
        assert_eq!(no_password.port, None);
        assert!(no_password.password.expose_secret().is_empty());
        assert!(no_password.validate().is_ok());
    }

    #[test]
    fn all_blank_is_empty_and_missing() {
        let creds = Credentials::new(" ", "", "", "pw");
        assert!(creds.is_empty());
        assert!(matches!(
            creds.validate(),
            Err(RegistryError::CredentialsMissing)
        ));
    }

    #[test]
    fn debug_redacts_password() {
        let creds = Credentials::new("localhost", "telegram", "bot", "hunter2");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
