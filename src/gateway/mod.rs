//! Gateway-style integration: a purchase request assembled from normalized
//! parameters, sent through an injected [`HttpTransport`], answered with a
//! typed [`Response`].

pub mod purchase;
pub mod response;
pub mod transport;

use std::sync::Arc;

use crate::app::config::Config;

pub use purchase::PurchaseRequest;
pub use response::Response;
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

pub struct PayopGateway {
    transport: Arc<dyn HttpTransport>,
    public_key: String,
    secret_key: String,
    application_key: String,
    access_token: String,
    language: String,
    production_endpoint: String,
    sandbox_endpoint: String,
    test_mode: bool,
}

impl PayopGateway {
    pub fn new(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            public_key: config.public_key.clone(),
            secret_key: config.secret_key.clone(),
            application_key: config.application_key.clone(),
            access_token: config.access_token.clone(),
            language: config.language.clone(),
            production_endpoint: config.production_endpoint.clone(),
            sandbox_endpoint: config.sandbox_endpoint.clone(),
            test_mode: config.test_mode,
        }
    }

    pub fn name(&self) -> &'static str {
        "Payop"
    }

    /// New purchase request carrying the gateway credentials and language.
    pub fn purchase(&self) -> PurchaseRequest {
        PurchaseRequest::new(self.transport.clone(), &self.production_endpoint, &self.sandbox_endpoint)
            .test_mode(self.test_mode)
            .public_key(self.public_key.as_str())
            .secret_key(self.secret_key.as_str())
            .application_key(self.application_key.as_str())
            .access_token(self.access_token.as_str())
            .language(self.language.as_str())
    }
}
