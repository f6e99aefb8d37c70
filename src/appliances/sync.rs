//! Fridge → household item reconciliation

use serde::Serialize;
use tracing::{info, warn};

use super::fridge::FridgeItem;
use super::registry::ApplianceManager;
use crate::store::household::{CreateHouseholdItem, HouseholdStore, UpdateHouseholdItem};
use crate::store::StoreError;
use crate::util::time::start_of_day;

/// Category given to household items first seen in the fridge
pub const SYNCED_CATEGORY: &str = "food";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub synced_items: Vec<String>,
    pub count: usize,
}

/// Copy the fridge inventory into the household items.
///
/// Items are matched by exact name. A match gets its quantity and expiry
/// overwritten; anything else is created as a food item. Each item is written
/// on its own, so a failure part-way keeps what was already written and the
/// failed item is left out of the report.
pub async fn sync_fridge(appliances: &ApplianceManager, household: &HouseholdStore) -> SyncReport {
    let inventory = appliances.fridge_inventory();
    let mut synced_items = Vec::with_capacity(inventory.len());

    for fridge_item in inventory {
        match apply_reading(household, &fridge_item).await {
            Ok(()) => synced_items.push(fridge_item.name),
            Err(e) => {
                warn!(item = %fridge_item.name, error = %e, "Skipping fridge item during sync");
            }
        }
    }

    info!(count = synced_items.len(), "Fridge sync finished");

    SyncReport {
        count: synced_items.len(),
        synced_items,
    }
}

async fn apply_reading(household: &HouseholdStore, reading: &FridgeItem) -> Result<(), StoreError> {
    let expiry_date = reading.expiry_date.map(start_of_day);

    match household.find_by_name(&reading.name).await? {
        Some(existing) => {
            let changes = UpdateHouseholdItem {
                current_quantity: Some(reading.quantity),
                // no reported expiry keeps the stored one
                expiry_date: expiry_date.map(Some),
                ..Default::default()
            };
            household.update(existing.id, &changes).await?;
        }
        None => {
            let item = CreateHouseholdItem {
                category: SYNCED_CATEGORY.to_string(),
                current_quantity: reading.quantity,
                min_quantity: 1,
                expiry_date,
                ..CreateHouseholdItem::named(reading.name.clone())
            };
            household.create(&item).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appliances::registry::ConnectionInfo;
    use crate::store::household::HouseholdFilter;
    use crate::store::Db;

    async fn household() -> HouseholdStore {
        HouseholdStore::new(Db::in_memory().await.unwrap())
    }

    fn connected_manager() -> ApplianceManager {
        let manager = ApplianceManager::default();
        manager.connect("fridge", &ConnectionInfo::default());
        manager
    }

    #[tokio::test]
    async fn without_fridge_nothing_syncs() {
        let household = household().await;
        let report = sync_fridge(&ApplianceManager::default(), &household).await;

        assert_eq!(report.count, 0);
        assert!(report.synced_items.is_empty());
        assert!(household
            .list(&HouseholdFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn existing_item_is_overwritten_not_duplicated() {
        let household = household().await;
        let milk = household
            .create(&CreateHouseholdItem {
                current_quantity: 9,
                min_quantity: 3,
                category: "dairy".to_string(),
                ..CreateHouseholdItem::named("Milk")
            })
            .await
            .unwrap();

        let report = sync_fridge(&connected_manager(), &household).await;
        assert_eq!(report.synced_items, vec!["Milk", "Eggs", "Butter"]);
        assert_eq!(report.count, 3);

        let all = household.list(&HouseholdFilter::default()).await.unwrap();
        let milks: Vec<_> = all.iter().filter(|item| item.name == "Milk").collect();
        assert_eq!(milks.len(), 1);
        assert_eq!(milks[0].id, milk.id);
        assert_eq!(milks[0].current_quantity, 2);
        assert!(milks[0].expiry_date.is_some());
        // untouched fields survive
        assert_eq!(milks[0].category, "dairy");
        assert_eq!(milks[0].min_quantity, 3);
    }

    #[tokio::test]
    async fn missing_item_is_created_as_food() {
        let household = household().await;
        sync_fridge(&connected_manager(), &household).await;

        let eggs = household.find_by_name("Eggs").await.unwrap().unwrap();
        assert_eq!(eggs.category, "food");
        assert_eq!(eggs.min_quantity, 1);
        assert_eq!(eggs.current_quantity, 12);
        assert_eq!(eggs.refill_reminder_days, 7);
        assert!(eggs.expiry_date.is_some());
    }

    #[tokio::test]
    async fn name_match_is_case_sensitive() {
        let household = household().await;
        household
            .create(&CreateHouseholdItem::named("milk"))
            .await
            .unwrap();

        sync_fridge(&connected_manager(), &household).await;

        let lower = household.find_by_name("milk").await.unwrap().unwrap();
        assert_eq!(lower.current_quantity, 1);
        assert!(household.find_by_name("Milk").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn repeated_sync_is_idempotent_on_row_count() {
        let household = household().await;
        let manager = connected_manager();

        sync_fridge(&manager, &household).await;
        sync_fridge(&manager, &household).await;

        assert_eq!(
            household
                .list(&HouseholdFilter::default())
                .await
                .unwrap()
                .len(),
            3
        );
    }
}
