pub mod payop_client;
pub mod payop_service;

pub use payop_client::PayopClient;
pub use payop_service::PayopService;
