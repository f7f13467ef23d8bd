use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{PayopError, Result};
use crate::gateway::response::Response;
use crate::gateway::transport::{HttpRequest, HttpTransport};
use crate::models::api::InvoiceCreateRequest;
use crate::models::order::{ItemPayload, OrderPayload};
use crate::utils::money::{ensure_valid_amount, format_amount};
use crate::utils::signature::sign;

const INVOICE_CREATE_PATH: &str = "invoices/create";

/// Builds the `invoices/create` payload from normalized purchase parameters.
#[derive(Clone)]
pub struct PurchaseRequest {
    transport: Arc<dyn HttpTransport>,
    production_endpoint: String,
    sandbox_endpoint: String,
    test_mode: bool,
    public_key: Option<String>,
    secret_key: Option<String>,
    application_key: Option<String>,
    access_token: Option<String>,
    language: Option<String>,
    amount: Option<Decimal>,
    currency: Option<String>,
    transaction_id: Option<String>,
    description: Option<String>,
    return_url: Option<String>,
    cancel_url: Option<String>,
    product_name: Option<String>,
    email: Option<String>,
    payer: Option<Map<String, Value>>,
    payment_method: Option<String>,
    custom_data: Option<Map<String, Value>>,
}

impl PurchaseRequest {
    pub fn new(transport: Arc<dyn HttpTransport>, production_endpoint: &str, sandbox_endpoint: &str) -> Self {
        Self {
            transport,
            production_endpoint: production_endpoint.to_string(),
            sandbox_endpoint: sandbox_endpoint.to_string(),
            test_mode: false,
            public_key: None,
            secret_key: None,
            application_key: None,
            access_token: None,
            language: None,
            amount: None,
            currency: None,
            transaction_id: None,
            description: None,
            return_url: None,
            cancel_url: None,
            product_name: None,
            email: None,
            payer: None,
            payment_method: None,
            custom_data: None,
        }
    }

    pub fn test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    pub fn public_key(mut self, value: impl Into<String>) -> Self {
        self.public_key = Some(value.into());
        self
    }

    pub fn secret_key(mut self, value: impl Into<String>) -> Self {
        self.secret_key = Some(value.into());
        self
    }

    pub fn application_key(mut self, value: impl Into<String>) -> Self {
        self.application_key = Some(value.into());
        self
    }

    pub fn access_token(mut self, value: impl Into<String>) -> Self {
        self.access_token = Some(value.into());
        self
    }

    pub fn language(mut self, value: impl Into<String>) -> Self {
        self.language = Some(value.into());
        self
    }

    pub fn amount(mut self, value: Decimal) -> Self {
        self.amount = Some(value);
        self
    }

    pub fn currency(mut self, value: &str) -> Self {
        self.currency = Some(value.to_uppercase());
        self
    }

    pub fn transaction_id(mut self, value: impl Into<String>) -> Self {
        self.transaction_id = Some(value.into());
        self
    }

    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = Some(value.into());
        self
    }

    pub fn return_url(mut self, value: impl Into<String>) -> Self {
        self.return_url = Some(value.into());
        self
    }

    pub fn cancel_url(mut self, value: impl Into<String>) -> Self {
        self.cancel_url = Some(value.into());
        self
    }

    pub fn product_name(mut self, value: impl Into<String>) -> Self {
        self.product_name = Some(value.into());
        self
    }

    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    pub fn payer(mut self, value: Map<String, Value>) -> Self {
        self.payer = Some(value);
        self
    }

    pub fn payment_method(mut self, value: impl Into<String>) -> Self {
        self.payment_method = Some(value.into());
        self
    }

    /// Extra top-level keys sent back as-is. Built keys win on collision.
    pub fn custom_data(mut self, value: Map<String, Value>) -> Self {
        self.custom_data = Some(value);
        self
    }

    pub fn get_email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn get_application_key(&self) -> Option<&str> {
        self.application_key.as_deref()
    }

    pub fn url(&self) -> &str {
        if self.test_mode {
            &self.sandbox_endpoint
        } else {
            &self.production_endpoint
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.url(), INVOICE_CREATE_PATH)
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("currency", self.currency.is_some()),
            ("amount", self.amount.is_some()),
            ("transactionId", self.transaction_id.is_some()),
            ("description", self.description.is_some()),
            ("returnUrl", self.return_url.is_some()),
            ("cancelUrl", self.cancel_url.is_some()),
            ("language", self.language.is_some()),
        ];
        match required.iter().find(|(_, present)| !present) {
            Some((name, _)) => Err(PayopError::MissingParameter(*name)),
            None => Ok(()),
        }
    }

    pub fn get_data(&self) -> Result<Map<String, Value>> {
        self.validate()?;

        let amount = match self.amount {
            Some(amount) => ensure_valid_amount(amount)?,
            None => return Err(PayopError::MissingParameter("amount")),
        };
        let currency = self.currency.clone().unwrap_or_default();
        let transaction_id = self.transaction_id.clone().unwrap_or_default();
        let formatted = format_amount(amount);

        let payload = InvoiceCreateRequest {
            public_key: self.public_key.clone(),
            order: OrderPayload {
                id: transaction_id.clone(),
                amount: formatted.clone(),
                currency: currency.clone(),
                items: ItemPayload {
                    name: self.product_name.clone(),
                    price: formatted,
                    currency: currency.clone(),
                },
                description: self.description.clone(),
            },
            payer: self.payer.clone().unwrap_or_default(),
            language: self.language.clone(),
            result_url: self.return_url.clone(),
            fail_path: self.cancel_url.clone(),
            signature: sign(
                &transaction_id,
                amount,
                &currency,
                self.secret_key.as_deref().unwrap_or_default(),
            ),
            payment_method: self.payment_method.clone().filter(|pm| !pm.is_empty()),
        };

        let mut data = self.custom_data.clone().unwrap_or_default();
        if let Value::Object(built) = serde_json::to_value(payload)? {
            data.extend(built);
        }
        Ok(data)
    }

    pub async fn send_data(&self, data: &Map<String, Value>) -> Result<Response> {
        let request = HttpRequest::post_json(self.endpoint(), serde_json::to_string(data)?)
            .header("Accept", "application/json")
            .bearer(self.access_token.as_deref().unwrap_or_default());

        debug!("Sending purchase request to {}", request.url);
        let reply = self.transport.send(request).await?;
        info!("Purchase request answered with HTTP {}", reply.status);

        Ok(Response::new(&reply.body, reply.headers))
    }

    pub async fn send(&self) -> Result<Response> {
        let data = self.get_data()?;
        self.send_data(&data).await
    }
}
