use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{error, info};

use crate::app::config::{CallbackRoutes, Config};
use crate::models::api::{InvoiceDetails, PaymentMethod};
use crate::models::invoice::Invoice;
use crate::models::order::Order;
use crate::models::payer::Payer;
use crate::services::payop_client::PayopClient;
use crate::utils::money::ensure_valid_amount;

/// Placeholder the remote checkout substitutes with its invoice identifier.
pub const INVOICE_ID_PLACEHOLDER: &str = "{{invoiceId}}";

pub struct PayopService {
    client: Arc<PayopClient>,
    callbacks: CallbackRoutes,
    item_name: String,
}

impl PayopService {
    pub fn new(client: Arc<PayopClient>, config: &Config) -> Self {
        Self {
            client,
            callbacks: config.callbacks.clone(),
            item_name: config.item_name.clone(),
        }
    }

    pub async fn get_card_payment_methods(&self) -> Vec<PaymentMethod> {
        self.client
            .list_payment_methods()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(PaymentMethod::is_card)
            .collect()
    }

    /// Result and fail URLs for an order, standard or international-card flow.
    pub fn callback_urls(&self, transaction_id: &str, is_international_card: bool) -> (String, String) {
        let (success, failure) = if is_international_card {
            (&self.callbacks.international_success, &self.callbacks.international_failure)
        } else {
            (&self.callbacks.success, &self.callbacks.failure)
        };

        (
            callback_url(success, transaction_id),
            callback_url(failure, transaction_id),
        )
    }

    pub fn build_payer(invoice: &Invoice) -> Payer {
        Payer::new(invoice.user.email.clone())
            .with_phone(invoice.phone_number.clone())
            .with_name(invoice.user.full_name.clone())
    }

    pub fn build_order(&self, invoice: &Invoice, price: Decimal, payment_method: Option<&str>) -> Order {
        Order::new(
            invoice.transaction_id.clone(),
            price,
            &invoice.currency.code,
            self.item_name.clone(),
            format!("Payment for order #{}", invoice.transaction_id),
        )
        .with_payment_method(payment_method.map(str::to_string))
    }

    pub async fn create_invoice(
        &self,
        invoice: &Invoice,
        price: Decimal,
        payment_method: Option<&str>,
        is_international_card: bool,
    ) -> Option<String> {
        let (result_url, fail_url) = self.callback_urls(&invoice.transaction_id, is_international_card);
        self.create_new_invoice(invoice, price, &result_url, &fail_url, payment_method)
            .await
    }

    pub async fn create_new_invoice(
        &self,
        invoice: &Invoice,
        price: Decimal,
        result_url: &str,
        fail_url: &str,
        payment_method: Option<&str>,
    ) -> Option<String> {
        if let Err(e) = ensure_valid_amount(price) {
            error!("create_invoice failed for order {}: {}", invoice.transaction_id, e);
            return None;
        }

        let payer = Self::build_payer(invoice);
        let order = self.build_order(invoice, price, payment_method);

        info!("Creating invoice for order {}", invoice.transaction_id);
        self.client.create_invoice(&order, &payer, result_url, fail_url).await
    }

    pub fn get_payment_link(&self, invoice_id: &str, locale: &str) -> String {
        self.client.get_payment_link(invoice_id, locale)
    }

    pub async fn find_by_identifier(&self, identifier: &str) -> Option<InvoiceDetails> {
        self.client.get_invoice(identifier).await
    }
}

fn callback_url(route: &str, transaction_id: &str) -> String {
    format!("{}?orderId={}&invoiceId={}", route, transaction_id, INVOICE_ID_PLACEHOLDER)
}
