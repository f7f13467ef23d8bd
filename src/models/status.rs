use serde::{Deserialize, Serialize};
use serde_json::Value;

//        0  new       New invoice
//        1  accepted  Invoice was paid successfully
//        4  pending   Invoice pending
//        5  failed    Invoice failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum PayopStatus {
    New,
    Successful,
    Pending,
    Failed,
}

impl PayopStatus {
    pub const fn code(self) -> i64 {
        match self {
            PayopStatus::New => 0,
            PayopStatus::Successful => 1,
            PayopStatus::Pending => 4,
            PayopStatus::Failed => 5,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(PayopStatus::New),
            1 => Some(PayopStatus::Successful),
            4 => Some(PayopStatus::Pending),
            5 => Some(PayopStatus::Failed),
            _ => None,
        }
    }

    /// Classifies a raw JSON status field. Unknown codes yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        loose_code(value).and_then(Self::from_code)
    }
}

impl From<PayopStatus> for i64 {
    fn from(status: PayopStatus) -> Self {
        status.code()
    }
}

impl TryFrom<i64> for PayopStatus {
    type Error = String;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        PayopStatus::from_code(code).ok_or_else(|| format!("unknown Payop status code {}", code))
    }
}

/// Reads an integer code from a JSON number or a numeric string. Whole
/// floats (`5.0`, `"5.0"`, `"5e0"`) count as their integer value.
pub fn loose_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole)),
        Value::String(s) => {
            let s = s.trim();
            s.parse().ok().or_else(|| s.parse::<f64>().ok().and_then(whole))
        }
        _ => None,
    }
}

fn whole(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0).then(|| f as i64)
}
