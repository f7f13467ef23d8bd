use serde::{Deserialize, Serialize};

/// End customer paying the invoice. Only `email` is required by the remote
/// API; other fields depend on the selected payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    pub email: String,
    pub phone: Option<String>,
    pub name: Option<String>,
}

impl Payer {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            phone: None,
            name: None,
        }
    }

    pub fn with_phone(mut self, phone: Option<String>) -> Self {
        self.phone = phone;
        self
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    /// `extraFields` carries a verbatim copy of the payer so the remote side
    /// keeps fields its schema does not know about.
    pub fn to_payload(&self) -> PayerPayload {
        PayerPayload {
            payer: self.clone(),
            extra_fields: self.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayerPayload {
    #[serde(flatten)]
    pub payer: Payer,
    #[serde(rename = "extraFields")]
    pub extra_fields: Payer,
}
