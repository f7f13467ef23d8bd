use std::collections::BTreeMap;

use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use crate::utils::money::format_amount;

/// Colon-joined string the signature is computed over. Fields are ordered by
/// key name, which always gives `amount:currency:id:secret`.
pub fn signing_string(transaction_id: &str, amount: Decimal, currency_code: &str, secret_key: &str) -> String {
    let mut fields = BTreeMap::new();
    fields.insert("id", transaction_id.to_string());
    fields.insert("amount", format_amount(amount));
    fields.insert("currency", currency_code.to_uppercase());

    let mut parts: Vec<String> = fields.into_values().collect();
    parts.push(secret_key.to_string());
    parts.join(":")
}

/// Lowercase hex SHA-256 over [`signing_string`]. Empty ids or currencies are
/// signed as empty fields.
pub fn sign(transaction_id: &str, amount: Decimal, currency_code: &str, secret_key: &str) -> String {
    let digest = Sha256::digest(signing_string(transaction_id, amount, currency_code, secret_key).as_bytes());
    hex::encode(digest)
}
