pub mod api;
pub mod invoice;
pub mod order;
pub mod payer;
pub mod status;

pub use api::{
    ApiOutcome, Card, CardToken, CheckoutResult, ErrorRecord, InvoiceDetails, PaymentMethod,
    TransactionDetails, TransactionStatus,
};
pub use invoice::Invoice;
pub use order::Order;
pub use payer::Payer;
pub use status::PayopStatus;
