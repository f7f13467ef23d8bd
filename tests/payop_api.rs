//! Client and service against a local mock of the Payop API.

use std::sync::Arc;

use mockito::{Matcher, Server};
use payop_gateway::models::invoice::{Currency, InvoiceUser};
use payop_gateway::models::{Invoice, PayopStatus};
use payop_gateway::utils::sign;
use payop_gateway::{Config, PayopClient, PayopService};
use rust_decimal::Decimal;
use serde_json::{json, Map};

fn config(base_url: &str) -> Config {
    Config {
        base_url: base_url.to_string(),
        public_key: "application-1".to_string(),
        secret_key: "secret".to_string(),
        access_token: "jwt-token".to_string(),
        ..Config::default()
    }
}

fn invoice() -> Invoice {
    Invoice {
        id: Some(7),
        transaction_id: "T1".to_string(),
        amount: Decimal::from(100),
        currency: Currency {
            code: "usd".to_string(),
        },
        user: InvoiceUser {
            email: "a@b.com".to_string(),
            full_name: None,
        },
        phone_number: None,
    }
}

#[tokio::test]
async fn create_invoice_posts_signed_payload() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/invoices/create")
        .match_header("authorization", "Bearer jwt-token")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "publicKey": "application-1",
            "order": {
                "id": "T1",
                "amount": "100.000",
                "currency": "USD",
                "description": "Payment for order #T1"
            },
            "payer": {"email": "a@b.com", "extraFields": {"email": "a@b.com"}},
            "language": "en",
            "signature": sign("T1", Decimal::from(100), "USD", "secret"),
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":"inv-42","status":1}"#)
        .create_async()
        .await;

    let config = config(&server.url());
    let client = Arc::new(PayopClient::new(&config).unwrap());
    let service = PayopService::new(client, &config);

    let created = service.create_invoice(&invoice(), Decimal::from(100), None, false).await;
    mock.assert_async().await;
    assert_eq!(created.as_deref(), Some("inv-42"));
    assert_eq!(
        service.get_payment_link("inv-42", "en"),
        "https://checkout.payop.com/en/payment/invoice-preprocessing/inv-42"
    );
}

#[tokio::test]
async fn get_invoice_failure_is_none() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/invoices/missing")
        .with_status(404)
        .with_body(r#"{"message":"Not found"}"#)
        .create_async()
        .await;

    let client = PayopClient::new(&config(&server.url())).unwrap();
    assert_eq!(client.get_invoice("missing").await, None);
    mock.assert_async().await;
}

#[tokio::test]
async fn get_invoice_reads_status() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/invoices/inv-1")
        .with_status(200)
        .with_body(r#"{"data":{"identifier":"inv-1","status":"4","amount":100,"currency":"USD"}}"#)
        .create_async()
        .await;

    let client = PayopClient::new(&config(&server.url())).unwrap();
    let details = client.get_invoice("inv-1").await.unwrap();
    assert_eq!(details.status(), Some(PayopStatus::Pending));
}

#[tokio::test]
async fn create_transaction_failure_is_error_record() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/checkout/create")
        .with_status(422)
        .with_body(r#"{"message":"Invoice expired"}"#)
        .create_async()
        .await;

    let client = PayopClient::new(&config(&server.url())).unwrap();
    let mut customer = Map::new();
    customer.insert("email".to_string(), json!("a@b.com"));

    let outcome = client
        .create_transaction("inv-1", "https://shop.example.com/status", &customer, None)
        .await;
    let record = outcome.into_result().unwrap_err();
    assert_eq!(record.status, "error");
    assert!(record.message.starts_with("Code:422 Error:"));
}

#[tokio::test]
async fn transaction_status_success() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/checkout/check-transaction-status/tx-1")
        .match_header("authorization", "Bearer jwt-token")
        .with_status(200)
        .with_body(r#"{"data":{"isSuccess":true,"status":"success","txid":"tx-1"}}"#)
        .create_async()
        .await;

    let client = PayopClient::new(&config(&server.url())).unwrap();
    let status = client.check_transaction_status("tx-1").await.into_result().unwrap();
    assert_eq!(status.status.as_deref(), Some("success"));
    assert_eq!(status.txid.as_deref(), Some("tx-1"));
}
