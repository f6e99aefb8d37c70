//! Application state shared across routes

use std::sync::Arc;

use crate::appliances::ApplianceManager;
use crate::config::Config;
use crate::store::{BillStore, Db, HouseholdStore, ShoppingStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub bills: BillStore,
    pub shopping: ShoppingStore,
    pub household: HouseholdStore,
    pub appliances: Arc<ApplianceManager>,
}

impl AppState {
    pub fn new(config: Config, db: Db, appliances: ApplianceManager) -> Self {
        Self {
            config: Arc::new(config),
            bills: BillStore::new(db.clone()),
            shopping: ShoppingStore::new(db.clone()),
            household: HouseholdStore::new(db),
            appliances: Arc::new(appliances),
        }
    }
}
