use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Base64-encoded shared key for ENS signature verification.
    /// When absent the relay accepts callbacks unverified (with a warning).
    pub signature_key: Option<String>,
    /// Maximum number of events retained in memory
    pub max_events: usize,
    /// Salesforce sink credentials. When absent the relay runs in
    /// logging-only mode: events are stored and visible on the dashboard
    /// but no records are created.
    pub salesforce: Option<SalesforceConfig>,
}

/// Credentials for the JWT-bearer exchange and record creation
#[derive(Debug, Clone)]
pub struct SalesforceConfig {
    pub instance_url: String,
    pub client_id: String,
    pub username: String,
    /// PEM private key; `\n` escapes from the environment are unescaped
    pub private_key_pem: String,
    /// API object the sink writes events into
    pub event_object: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            signature_key: env::var("ENS_SIGNATURE_KEY").ok(),
            max_events: env::var("MAX_EVENTS_IN_MEMORY")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap_or(100),
            salesforce: SalesforceConfig::from_env(),
        })
    }
}

impl SalesforceConfig {
    /// Load sink credentials from environment variables.
    ///
    /// Returns `None` unless all four credential variables are present;
    /// a partial set is treated the same as none.
    pub fn from_env() -> Option<Self> {
        let instance_url = env::var("SF_INSTANCE_URL").ok()?;
        let client_id = env::var("SF_CLIENT_ID").ok()?;
        let username = env::var("SF_USERNAME").ok()?;
        let private_key_pem = env::var("SF_PRIVATE_KEY").ok()?.replace("\\n", "\n");

        Some(Self {
            instance_url,
            client_id,
            username,
            private_key_pem,
            event_object: env::var("SF_EVENT_OBJECT")
                .unwrap_or_else(|_| "ENS_Event__c".to_string()),
        })
    }

    /// Identity-provider base URL for the token exchange.
    ///
    /// Sandbox orgs authenticate against test.salesforce.com; anything
    /// whose instance URL does not look like a sandbox uses production.
    pub fn login_base(&self) -> &'static str {
        let url = self.instance_url.to_lowercase();
        if url.contains("sandbox") || url.contains("test") {
            "https://test.salesforce.com"
        } else {
            "https://login.salesforce.com"
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "PORT must be a valid number"),
        }
    }
}

impl std::error::Error for ConfigError {}
