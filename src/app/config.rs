use std::env;
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::error::{PayopError, Result};

pub const DEFAULT_API_URL: &str = "https://payop.com/v1/";
pub const DEFAULT_PROCESSING_ENDPOINT: &str =
    "https://checkout.payop.com/{{locale}}/payment/invoice-preprocessing/{{invoiceId}}";

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub public_key: String,
    pub application_key: String,
    pub secret_key: String,
    pub access_token: String,
    pub processing_endpoint: String,
    pub production_endpoint: String,
    pub sandbox_endpoint: String,
    pub test_mode: bool,
    pub timeout_ms: u64,
    pub language: String,
    pub item_name: String,
    pub callbacks: CallbackRoutes,
}

/// Application routes the remote checkout redirects back to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CallbackRoutes {
    pub success: String,
    pub failure: String,
    pub international_success: String,
    pub international_failure: String,
}

impl Default for CallbackRoutes {
    fn default() -> Self {
        Self {
            success: "http://localhost:8000/payop/success".to_string(),
            failure: "http://localhost:8000/payop/failure".to_string(),
            international_success: "http://localhost:8000/card/international-success".to_string(),
            international_failure: "http://localhost:8000/card/international-failure".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            public_key: String::new(),
            application_key: String::new(),
            secret_key: String::new(),
            access_token: String::new(),
            processing_endpoint: DEFAULT_PROCESSING_ENDPOINT.to_string(),
            production_endpoint: DEFAULT_API_URL.to_string(),
            sandbox_endpoint: DEFAULT_API_URL.to_string(),
            test_mode: false,
            timeout_ms: 5000,
            language: "en".to_string(),
            item_name: "Order payment".to_string(),
            callbacks: CallbackRoutes::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        let callbacks = defaults.callbacks.clone();

        Self {
            base_url: env::var("PAYOP_BASE_URL").unwrap_or(defaults.base_url),
            public_key: env::var("PAYOP_PUBLIC_KEY").unwrap_or_default(),
            application_key: env::var("PAYOP_APPLICATION_KEY").unwrap_or_default(),
            secret_key: env::var("PAYOP_SECRET_KEY").unwrap_or_default(),
            access_token: env::var("PAYOP_ACCESS_TOKEN").unwrap_or_default(),
            processing_endpoint: env::var("PAYOP_PROCESSING_ENDPOINT")
                .unwrap_or(defaults.processing_endpoint),
            production_endpoint: env::var("PAYOP_PRODUCTION_ENDPOINT")
                .unwrap_or(defaults.production_endpoint),
            sandbox_endpoint: env::var("PAYOP_SANDBOX_ENDPOINT")
                .unwrap_or(defaults.sandbox_endpoint),
            test_mode: env::var("PAYOP_TEST_MODE")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            timeout_ms: env::var("PAYOP_TIMEOUT_MS")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            language: env::var("PAYOP_LANGUAGE").unwrap_or(defaults.language),
            item_name: env::var("PAYOP_ITEM_NAME").unwrap_or(defaults.item_name),
            callbacks: CallbackRoutes {
                success: env::var("PAYOP_SUCCESS_URL").unwrap_or(callbacks.success),
                failure: env::var("PAYOP_FAILURE_URL").unwrap_or(callbacks.failure),
                international_success: env::var("PAYOP_INTERNATIONAL_SUCCESS_URL")
                    .unwrap_or(callbacks.international_success),
                international_failure: env::var("PAYOP_INTERNATIONAL_FAILURE_URL")
                    .unwrap_or(callbacks.international_failure),
            },
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| PayopError::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PayopError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        let urls = [
            ("base_url", &self.base_url),
            ("production_endpoint", &self.production_endpoint),
            ("sandbox_endpoint", &self.sandbox_endpoint),
            ("callbacks.success", &self.callbacks.success),
            ("callbacks.failure", &self.callbacks.failure),
            ("callbacks.international_success", &self.callbacks.international_success),
            ("callbacks.international_failure", &self.callbacks.international_failure),
        ];
        for (name, value) in urls {
            Url::parse(value)
                .map_err(|e| PayopError::Config(format!("{} is not a valid URL: {}", name, e)))?;
        }

        if self.secret_key.is_empty() {
            return Err(PayopError::Config("secret_key is empty".to_string()));
        }
        if self.access_token.is_empty() {
            return Err(PayopError::Config("access_token is empty".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("public_key", &self.public_key)
            .field("application_key", &self.application_key)
            .field("secret_key", &"***")
            .field("access_token", &"***")
            .field("processing_endpoint", &self.processing_endpoint)
            .field("production_endpoint", &self.production_endpoint)
            .field("sandbox_endpoint", &self.sandbox_endpoint)
            .field("test_mode", &self.test_mode)
            .field("timeout_ms", &self.timeout_ms)
            .field("language", &self.language)
            .field("item_name", &self.item_name)
            .field("callbacks", &self.callbacks)
            .finish()
    }
}
