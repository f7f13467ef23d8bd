use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::app::config::Config;
use crate::error::{PayopError, Result};
use crate::gateway::transport::{HttpRequest, HttpTransport, ReqwestTransport};
use crate::models::api::{
    ApiOutcome, Card, CardToken, CardTokenRequest, CheckoutResult, Envelope, ErrorRecord,
    InvoiceCreateRequest, InvoiceDetails, PaymentMethod, TransactionCreateRequest,
    TransactionDetails, TransactionStatus,
};
use crate::models::order::Order;
use crate::models::payer::Payer;
use crate::utils::signature::sign;

/// One method per remote endpoint. No method returns an error: failures are
/// logged and come back as `None` or as an [`ErrorRecord`], per endpoint.
pub struct PayopClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    public_key: String,
    secret_key: String,
    access_token: String,
    processing_endpoint: String,
    language: String,
}

impl PayopClient {
    pub fn new(config: &Config) -> Result<Self> {
        let transport = ReqwestTransport::new(Duration::from_millis(config.timeout_ms))?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            base_url: config.base_url.clone(),
            public_key: config.public_key.clone(),
            secret_key: config.secret_key.clone(),
            access_token: config.access_token.clone(),
            processing_endpoint: config.processing_endpoint.clone(),
            language: config.language.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn call<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T> {
        let response = self
            .transport
            .send(request.bearer(&self.access_token))
            .await?
            .error_for_status()?;

        let envelope: Envelope<T> = serde_json::from_str(&response.body)?;
        envelope.data.ok_or(PayopError::MissingEnvelope)
    }

    pub async fn list_payment_methods(&self) -> Option<Vec<PaymentMethod>> {
        let request = HttpRequest::get(self.url(
            "instrument-settings/payment-methods/available-for-application",
        ));
        match self.call(request).await {
            Ok(methods) => Some(methods),
            Err(e) => {
                warn!("list_payment_methods failed: {}", e);
                None
            }
        }
    }

    pub fn get_payment_link(&self, invoice_id: &str, locale: &str) -> String {
        self.processing_endpoint
            .replace("{{locale}}", locale)
            .replace("{{invoiceId}}", invoice_id)
    }

    /// `None` means the invoice could not be created.
    pub async fn create_invoice(
        &self,
        order: &Order,
        payer: &Payer,
        result_url: &str,
        fail_url: &str,
    ) -> Option<String> {
        match self.try_create_invoice(order, payer, result_url, fail_url).await {
            Ok(invoice_id) => {
                info!("Invoice {} created for order {}", invoice_id, order.id);
                Some(invoice_id)
            }
            Err(e) => {
                error!("create_invoice failed for order {}: {}", order.id, e);
                None
            }
        }
    }

    async fn try_create_invoice(
        &self,
        order: &Order,
        payer: &Payer,
        result_url: &str,
        fail_url: &str,
    ) -> Result<String> {
        if payer.email.is_empty() {
            return Err(PayopError::MissingParameter("email"));
        }

        let payload = InvoiceCreateRequest {
            public_key: Some(self.public_key.clone()),
            order: order.to_payload()?,
            payer: payer.to_payload(),
            language: Some(self.language.clone()),
            result_url: Some(result_url.to_string()),
            fail_path: Some(fail_url.to_string()),
            signature: sign(&order.id, order.amount, &order.currency, &self.secret_key),
            payment_method: order.payment_method.clone(),
        };

        let request = HttpRequest::post_json(self.url("invoices/create"), serde_json::to_string(&payload)?);
        self.call(request).await
    }

    pub async fn get_invoice(&self, invoice_id: &str) -> Option<InvoiceDetails> {
        let request = HttpRequest::get(self.url(&format!("invoices/{}", invoice_id)));
        match self.call(request).await {
            Ok(invoice) => Some(invoice),
            Err(e) => {
                warn!("get_invoice {} failed: {}", invoice_id, e);
                None
            }
        }
    }

    pub async fn create_transaction(
        &self,
        invoice_id: &str,
        check_status_url: &str,
        customer: &Map<String, Value>,
        card_token: Option<&str>,
    ) -> ApiOutcome<CheckoutResult> {
        let payload = TransactionCreateRequest {
            invoice_identifier: invoice_id.to_string(),
            customer: customer.clone(),
            card_token: card_token.map(str::to_string),
            check_status_url: check_status_url.to_string(),
        };

        let result = match serde_json::to_string(&payload) {
            Ok(body) => self.call(HttpRequest::post_json(self.url("checkout/create"), body)).await,
            Err(e) => Err(e.into()),
        };
        outcome("create_transaction", result)
    }

    pub async fn create_card_token(&self, invoice_id: &str, card: &Card) -> ApiOutcome<CardToken> {
        let payload = CardTokenRequest::new(invoice_id, card);

        let result = match serde_json::to_string(&payload) {
            Ok(body) => {
                self.call(HttpRequest::post_json(self.url("payment-tools/card-token/create"), body))
                    .await
            }
            Err(e) => Err(e.into()),
        };
        outcome("create_card_token", result)
    }

    pub async fn check_transaction_status(&self, txid: &str) -> ApiOutcome<TransactionStatus> {
        let request = HttpRequest::get(self.url(&format!("checkout/check-transaction-status/{}", txid)));
        outcome("check_transaction_status", self.call(request).await)
    }

    pub async fn get_transaction(&self, txid: &str) -> ApiOutcome<TransactionDetails> {
        let request = HttpRequest::get(self.url(&format!("transactions/{}", txid)));
        outcome("get_transaction", self.call(request).await)
    }
}

fn outcome<T>(operation: &str, result: Result<T>) -> ApiOutcome<T> {
    match result {
        Ok(data) => ApiOutcome::Data(data),
        Err(e) => {
            warn!("{} failed: {}", operation, e);
            ApiOutcome::Error(ErrorRecord::from_error(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::transport::testing::{BrokenTransport, StubTransport};
    use crate::gateway::transport::HttpMethod;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn config() -> Config {
        Config {
            base_url: "https://payop.com/v1/".to_string(),
            public_key: "application-1".to_string(),
            secret_key: "secret".to_string(),
            access_token: "jwt".to_string(),
            ..Config::default()
        }
    }

    fn client(transport: Arc<dyn HttpTransport>) -> PayopClient {
        PayopClient::with_transport(&config(), transport)
    }

    fn order() -> Order {
        Order::new("T1", Decimal::from(100), "usd", "Coins", "Payment for order #1")
    }

    fn payer() -> Payer {
        Payer::new("a@b.com")
            .with_phone(Some("+1".to_string()))
            .with_name(Some("A B".to_string()))
    }

    #[test]
    fn test_payment_link_template() {
        let api = client(Arc::new(BrokenTransport { code: 500 }));
        assert_eq!(
            api.get_payment_link("inv-1", "ru"),
            "https://checkout.payop.com/ru/payment/invoice-preprocessing/inv-1"
        );
    }

    #[tokio::test]
    async fn test_list_payment_methods() {
        let transport = StubTransport::replying(
            200,
            json!({"data": [{"identifier": 1, "formType": "cards"}, {"identifier": 2, "formType": "standard"}]}),
        );
        let methods = client(transport.clone()).list_payment_methods().await.unwrap();
        assert_eq!(methods.len(), 2);

        let sent = transport.last();
        assert_eq!(sent.method, HttpMethod::Get);
        assert_eq!(
            sent.url,
            "https://payop.com/v1/instrument-settings/payment-methods/available-for-application"
        );
        assert_eq!(sent.header_value("Authorization"), Some("Bearer jwt"));
    }

    #[tokio::test]
    async fn test_create_invoice_payload() {
        let transport = StubTransport::replying(200, json!({"data": "inv-1", "status": 1}));
        let order = order().with_payment_method(Some("381".to_string()));
        let invoice_id = client(transport.clone())
            .create_invoice(&order, &payer(), "https://shop/ok", "https://shop/fail")
            .await;
        assert_eq!(invoice_id.as_deref(), Some("inv-1"));

        let sent = transport.last();
        assert_eq!(sent.url, "https://payop.com/v1/invoices/create");
        let body: Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["publicKey"], "application-1");
        assert_eq!(body["order"]["amount"], "100.000");
        assert_eq!(body["order"]["currency"], "USD");
        assert_eq!(body["payer"]["extraFields"]["email"], "a@b.com");
        assert_eq!(body["language"], "en");
        assert_eq!(body["resultUrl"], "https://shop/ok");
        assert_eq!(body["failPath"], "https://shop/fail");
        assert_eq!(body["paymentMethod"], "381");
        assert_eq!(
            body["signature"],
            "8977b4dfc5a26d5dccde6248bf831267d60a9326e9d1e612d9024dc1d62e4bc1"
        );
    }

    #[tokio::test]
    async fn test_create_invoice_failures_are_none() {
        let transport = StubTransport::replying(401, json!({"message": "Unauthorized"}));
        let result = client(transport)
            .create_invoice(&order(), &payer(), "https://shop/ok", "https://shop/fail")
            .await;
        assert_eq!(result, None);

        let transport = StubTransport::replying(200, json!({"data": "inv-1"}));
        let result = client(transport.clone())
            .create_invoice(&order(), &Payer::new(""), "https://shop/ok", "https://shop/fail")
            .await;
        assert_eq!(result, None);
        assert_eq!(transport.sent(), 0);
    }

    #[tokio::test]
    async fn test_get_invoice_transport_failure_is_none() {
        assert_eq!(client(Arc::new(BrokenTransport { code: 500 })).get_invoice("inv-1").await, None);
    }

    #[tokio::test]
    async fn test_get_invoice_missing_envelope_is_none() {
        let transport = StubTransport::replying(200, json!({"status": 1}));
        assert_eq!(client(transport).get_invoice("inv-1").await, None);
    }

    #[tokio::test]
    async fn test_create_transaction_failure_is_error_record() {
        let mut customer = Map::new();
        customer.insert("email".to_string(), json!("a@b.com"));

        let outcome = client(Arc::new(BrokenTransport { code: 500 }))
            .create_transaction("inv-1", "https://shop/check", &customer, Some("tok"))
            .await;
        assert_eq!(
            outcome,
            ApiOutcome::Error(ErrorRecord {
                status: "error".to_string(),
                message: "Code:500 Error:Remote API returned HTTP 500: boom".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_create_transaction_payload() {
        let transport = StubTransport::replying(200, json!({"data": {"isSuccess": true, "txid": "tx-9"}}));
        let outcome = client(transport.clone())
            .create_transaction("inv-1", "https://shop/check", &Map::new(), None)
            .await;
        assert_eq!(outcome.data().and_then(|d| d.txid.as_deref()), Some("tx-9"));

        let body: Value = serde_json::from_str(transport.last().body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "invoiceIdentifier": "inv-1",
                "customer": {},
                "cardToken": null,
                "checkStatusUrl": "https://shop/check"
            })
        );
    }

    #[tokio::test]
    async fn test_card_token_request() {
        let transport = StubTransport::replying(200, json!({"data": {"token": "card-tok"}}));
        let card = Card {
            pan: "4111111111111111".to_string(),
            expiration_date: "12/30".to_string(),
            cvv: "123".to_string(),
            holder_name: "A B".to_string(),
        };
        let outcome = client(transport.clone()).create_card_token("inv-1", &card).await;
        assert_eq!(outcome.data().and_then(|t| t.token.as_deref()), Some("card-tok"));

        let sent = transport.last();
        assert_eq!(sent.url, "https://payop.com/v1/payment-tools/card-token/create");
        let body: Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["invoiceIdentifier"], "inv-1");
        assert_eq!(body["expirationDate"], "12/30");
        assert_eq!(body["holderName"], "A B");
    }

    #[tokio::test]
    async fn test_status_and_transaction_paths() {
        let transport = StubTransport::replying(200, json!({"data": {"status": "pending", "state": 4}}));
        let api = client(transport.clone());

        let status = api.check_transaction_status("tx-1").await;
        assert_eq!(status.data().and_then(|s| s.status.as_deref()), Some("pending"));
        assert_eq!(
            transport.last().url,
            "https://payop.com/v1/checkout/check-transaction-status/tx-1"
        );

        let transaction = api.get_transaction("tx-1").await.into_result().unwrap();
        assert_eq!(transaction.status(), Some(crate::models::PayopStatus::Pending));
        assert_eq!(transport.last().url, "https://payop.com/v1/transactions/tx-1");
    }

    #[tokio::test]
    async fn test_error_record_family_on_decode_failure() {
        let transport = StubTransport::replying(200, json!("not an envelope"));
        let outcome = client(transport).get_transaction("tx-1").await;
        match outcome {
            ApiOutcome::Error(record) => {
                assert_eq!(record.status, "error");
                assert!(record.message.starts_with("Code:0 Error:"));
            }
            ApiOutcome::Data(_) => panic!("expected error record"),
        }
    }
}
