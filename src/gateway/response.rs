use serde_json::Value;

use crate::models::status::{loose_code, PayopStatus};

/// Reply to a gateway request. Remote-side errors are not raised; callers
/// inspect the predicates.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    data: Option<Value>,
    headers: Vec<(String, String)>,
}

impl Response {
    /// A body that is not JSON yields a response with no data.
    pub fn new(body: &str, headers: Vec<(String, String)>) -> Self {
        Self {
            data: serde_json::from_str(body).ok(),
            headers,
        }
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    fn field(&self, key: &str) -> Option<&Value> {
        self.data
            .as_ref()
            .and_then(|data| data.get(key))
            .filter(|value| !value.is_null())
    }

    fn status_code(&self) -> Option<i64> {
        self.order_status().and_then(loose_code)
    }

    pub fn order_status(&self) -> Option<&Value> {
        self.field("state")
    }

    pub fn is_processing(&self) -> bool {
        self.status_code() == Some(PayopStatus::New.code())
    }

    pub fn is_pending(&self) -> bool {
        self.status_code() == Some(PayopStatus::Pending.code())
    }

    pub fn is_completed(&self) -> bool {
        self.status_code() == Some(PayopStatus::Successful.code())
    }

    // True only when errorId equals the FAILED code.
    pub fn is_not_error(&self) -> bool {
        self.field("errorId").and_then(loose_code) == Some(PayopStatus::Failed.code())
    }

    /// `0`, `"0"`, `""` and `false` report no status, like an unset field.
    fn has_status(&self) -> bool {
        self.order_status().map_or(false, is_truthy)
    }

    pub fn is_successful(&self) -> bool {
        if self.has_status() {
            return self.is_completed() && self.is_not_error();
        }
        self.is_not_error()
    }

    pub fn code(&self) -> Option<String> {
        self.field("errorId").map(scalar_to_string)
    }

    pub fn message(&self) -> Option<String> {
        None
    }

    pub fn public_id(&self) -> Option<String> {
        self.field("public_id").map(scalar_to_string)
    }

    pub fn is_redirect(&self) -> bool {
        false
    }

    pub fn redirect_url(&self) -> String {
        String::new()
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
