//! HTTP surface: routing, handlers and error mapping

pub mod appliances;
pub mod bills;
pub mod error;
pub mod household;
pub mod routes;
pub mod shopping;

pub use routes::build_router;
