//! Payop payment API integration.
//!
//! Two entry points share one signing routine ([`utils::sign`]):
//!
//! - [`gateway`]: a purchase request assembled from normalized parameters and
//!   sent through an injected [`gateway::HttpTransport`], answered with a
//!   [`gateway::Response`] exposing success/pending/failed predicates.
//! - [`services`]: [`services::PayopClient`] with one method per remote
//!   endpoint, and [`services::PayopService`] building orders and payers from
//!   application invoices.

pub mod app;
pub mod error;
pub mod gateway;
pub mod models;
pub mod services;
pub mod utils;

pub use app::config::Config;
pub use error::{PayopError, Result};
pub use gateway::{PayopGateway, Response};
pub use services::{PayopClient, PayopService};
