use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::Result;
use crate::utils::money::{ensure_valid_amount, format_amount};

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub name: String,
    pub price: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub amount: Decimal,
    pub currency: String,
    pub item: OrderItem,
    pub description: String,
    pub payment_method: Option<String>,
}

impl Order {
    /// The item is a copy of the order level amount and currency.
    pub fn new(
        id: impl Into<String>,
        amount: Decimal,
        currency: &str,
        item_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let currency = currency.to_uppercase();
        Self {
            id: id.into(),
            amount,
            item: OrderItem {
                name: item_name.into(),
                price: amount,
                currency: currency.clone(),
            },
            currency,
            description: description.into(),
            payment_method: None,
        }
    }

    pub fn with_payment_method(mut self, payment_method: Option<String>) -> Self {
        self.payment_method = payment_method.filter(|pm| !pm.is_empty());
        self
    }

    pub fn to_payload(&self) -> Result<OrderPayload> {
        let amount = ensure_valid_amount(self.amount)?;
        let price = ensure_valid_amount(self.item.price)?;

        Ok(OrderPayload {
            id: self.id.clone(),
            amount: format_amount(amount),
            currency: self.currency.to_uppercase(),
            items: ItemPayload {
                name: Some(self.item.name.clone()),
                price: format_amount(price),
                currency: self.item.currency.to_uppercase(),
            },
            description: Some(self.description.clone()),
        })
    }
}

// Payload enviado no campo "order" de invoices/create
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderPayload {
    pub id: String,
    pub amount: String,
    pub currency: String,
    pub items: ItemPayload,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemPayload {
    pub name: Option<String>,
    pub price: String,
    pub currency: String,
}
