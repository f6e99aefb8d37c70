//! Record store: SQLite persistence for bills, shopping items and household items

pub mod bills;
pub mod db;
pub mod error;
pub mod household;
pub mod shopping;

pub use bills::BillStore;
pub use db::Db;
pub use error::StoreError;
pub use household::HouseholdStore;
pub use shopping::ShoppingStore;
