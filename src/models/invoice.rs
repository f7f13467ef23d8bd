use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// Registro de fatura mantido pela aplicação; aqui é somente leitura.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(default)]
    pub id: Option<u64>,
    pub transaction_id: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub user: InvoiceUser,
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceUser {
    pub email: String,
    #[serde(rename = "fullName", default)]
    pub full_name: Option<String>,
}
