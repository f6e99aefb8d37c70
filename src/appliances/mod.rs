//! Smart appliance integration
//!
//! Connections are bookkeeping only: no device is contacted. The fridge
//! inventory comes from a [`fridge::InventorySource`], which is a mock for now.

pub mod fridge;
pub mod registry;
pub mod sync;

pub use fridge::FridgeItem;
pub use registry::{ApplianceManager, ConnectOutcome, ConnectRequest};
pub use sync::{sync_fridge, SyncReport};
