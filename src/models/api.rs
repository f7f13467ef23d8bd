use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PayopError;
use crate::models::order::OrderPayload;
use crate::models::status::PayopStatus;

/// `{"data": ...}` wrapper around successful replies.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceCreateRequest<P> {
    #[serde(rename = "publicKey")]
    pub public_key: Option<String>,
    pub order: OrderPayload,
    pub payer: P,
    pub language: Option<String>,
    #[serde(rename = "resultUrl")]
    pub result_url: Option<String>,
    #[serde(rename = "failPath")]
    pub fail_path: Option<String>,
    pub signature: String,
    #[serde(rename = "paymentMethod", skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    #[serde(default)]
    pub identifier: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "formType", default)]
    pub form_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PaymentMethod {
    pub fn is_card(&self) -> bool {
        self.form_type.as_deref() == Some("cards")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDetails {
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InvoiceDetails {
    pub fn status(&self) -> Option<PayopStatus> {
        self.status.as_ref().and_then(PayopStatus::from_value)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionCreateRequest {
    #[serde(rename = "invoiceIdentifier")]
    pub invoice_identifier: String,
    pub customer: Map<String, Value>,
    #[serde(rename = "cardToken")]
    pub card_token: Option<String>,
    #[serde(rename = "checkStatusUrl")]
    pub check_status_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutResult {
    #[serde(rename = "isSuccess", default)]
    pub is_success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub txid: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Card {
    pub pan: String,
    #[serde(rename = "expirationDate")]
    pub expiration_date: String,
    pub cvv: String,
    #[serde(rename = "holderName")]
    pub holder_name: String,
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last4 = self.pan.get(self.pan.len().saturating_sub(4)..).unwrap_or("");
        f.debug_struct("Card")
            .field("pan", &format!("****{}", last4))
            .field("expiration_date", &self.expiration_date)
            .field("cvv", &"***")
            .field("holder_name", &self.holder_name)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CardTokenRequest {
    #[serde(rename = "invoiceIdentifier")]
    pub invoice_identifier: String,
    pub pan: String,
    #[serde(rename = "expirationDate")]
    pub expiration_date: String,
    pub cvv: String,
    #[serde(rename = "holderName")]
    pub holder_name: String,
}

impl CardTokenRequest {
    pub fn new(invoice_identifier: &str, card: &Card) -> Self {
        Self {
            invoice_identifier: invoice_identifier.to_string(),
            pan: card.pan.clone(),
            expiration_date: card.expiration_date.clone(),
            cvv: card.cvv.clone(),
            holder_name: card.holder_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardToken {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionStatus {
    #[serde(rename = "isSuccess", default)]
    pub is_success: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub txid: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDetails {
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub state: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TransactionDetails {
    pub fn status(&self) -> Option<PayopStatus> {
        self.state.as_ref().and_then(PayopStatus::from_value)
    }
}

/// Failure shape returned by the transaction and card-token endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub status: String,
    pub message: String,
}

impl ErrorRecord {
    pub fn from_error(error: &PayopError) -> Self {
        Self {
            status: "error".to_string(),
            message: format!("Code:{} Error:{}", error.code(), error),
        }
    }
}

/// Either the `data` of the reply, or an [`ErrorRecord`]. Serializes to the
/// bare payload in both cases.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApiOutcome<T> {
    Data(T),
    Error(ErrorRecord),
}

impl<T> ApiOutcome<T> {
    pub fn is_error(&self) -> bool {
        matches!(self, ApiOutcome::Error(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ApiOutcome::Data(data) => Some(data),
            ApiOutcome::Error(_) => None,
        }
    }

    pub fn into_result(self) -> Result<T, ErrorRecord> {
        match self {
            ApiOutcome::Data(data) => Ok(data),
            ApiOutcome::Error(record) => Err(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_record_shape() {
        let error = PayopError::Status {
            code: 422,
            body: "bad".to_string(),
        };
        let record = ErrorRecord::from_error(&error);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"status": "error", "message": "Code:422 Error:Remote API returned HTTP 422: bad"})
        );
    }

    #[test]
    fn test_outcome_serializes_untagged() {
        let outcome: ApiOutcome<CardToken> = ApiOutcome::Error(ErrorRecord {
            status: "error".to_string(),
            message: "Code:0 Error:x".to_string(),
        });
        assert!(outcome.is_error());
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"status": "error", "message": "Code:0 Error:x"})
        );
    }

    #[test]
    fn test_payment_method_keeps_unknown_fields() {
        let method: PaymentMethod = serde_json::from_value(json!({
            "identifier": 381,
            "formType": "cards",
            "title": "Visa",
            "currencies": ["USD"]
        }))
        .unwrap();
        assert!(method.is_card());
        assert_eq!(method.extra["currencies"], json!(["USD"]));
    }

    #[test]
    fn test_invoice_status_classification() {
        let invoice: InvoiceDetails =
            serde_json::from_value(json!({"identifier": "inv-1", "status": 4})).unwrap();
        assert_eq!(invoice.status(), Some(PayopStatus::Pending));

        let unknown: InvoiceDetails = serde_json::from_value(json!({"status": 2})).unwrap();
        assert_eq!(unknown.status(), None);
    }

    #[test]
    fn test_card_debug_masks_sensitive_fields() {
        let card = Card {
            pan: "4111111111111111".to_string(),
            expiration_date: "12/30".to_string(),
            cvv: "123".to_string(),
            holder_name: "A B".to_string(),
        };
        let printed = format!("{:?}", card);
        assert!(printed.contains("****1111"));
        assert!(!printed.contains("4111111111111111"));
        assert!(!printed.contains("123\""));
    }
}
