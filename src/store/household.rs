//! Household consumables tracked by quantity and optional expiry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::error::require_name;
use super::{Db, StoreError};
use crate::util::time::iso8601;

pub const DEFAULT_CATEGORY: &str = "general";
pub const DEFAULT_REFILL_REMINDER_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct HouseholdItem {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub current_quantity: i64,
    pub min_quantity: i64,
    pub expiry_date: Option<DateTime<Utc>>,
    /// Days before expiry at which the item starts showing up as expiring
    pub refill_reminder_days: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HouseholdItem {
    /// At or below the minimum stock level
    pub fn is_low(&self) -> bool {
        self.current_quantity <= self.min_quantity
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateHouseholdItem {
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_quantity")]
    pub current_quantity: i64,
    #[serde(default = "default_quantity")]
    pub min_quantity: i64,
    #[serde(default, deserialize_with = "iso8601::option::deserialize")]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default = "default_refill_reminder_days")]
    pub refill_reminder_days: i64,
}

impl CreateHouseholdItem {
    /// New item with defaults for everything but the name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: default_category(),
            current_quantity: default_quantity(),
            min_quantity: default_quantity(),
            expiry_date: None,
            refill_reminder_days: DEFAULT_REFILL_REMINDER_DAYS,
        }
    }
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_quantity() -> i64 {
    1
}

fn default_refill_reminder_days() -> i64 {
    DEFAULT_REFILL_REMINDER_DAYS
}

/// Partial update. `expiry_date` distinguishes "absent" (`None`) from an
/// explicit `null` that clears it (`Some(None)`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateHouseholdItem {
    pub name: Option<String>,
    pub category: Option<String>,
    pub current_quantity: Option<i64>,
    pub min_quantity: Option<i64>,
    #[serde(default, deserialize_with = "iso8601::patch::deserialize")]
    pub expiry_date: Option<Option<DateTime<Utc>>>,
    pub refill_reminder_days: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HouseholdFilter {
    pub category: Option<String>,
}

/// Household item operations
#[derive(Clone)]
pub struct HouseholdStore {
    db: Db,
}

impl HouseholdStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn list(&self, filter: &HouseholdFilter) -> Result<Vec<HouseholdItem>, StoreError> {
        let items = match &filter.category {
            Some(category) => {
                sqlx::query_as::<_, HouseholdItem>(
                    "SELECT * FROM household_items WHERE category = ? ORDER BY id",
                )
                .bind(category)
                .fetch_all(self.db.pool())
                .await?
            }
            None => {
                sqlx::query_as::<_, HouseholdItem>("SELECT * FROM household_items ORDER BY id")
                    .fetch_all(self.db.pool())
                    .await?
            }
        };
        Ok(items)
    }

    pub async fn get(&self, id: i64) -> Result<HouseholdItem, StoreError> {
        sqlx::query_as::<_, HouseholdItem>("SELECT * FROM household_items WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or(StoreError::not_found("Household item", id))
    }

    /// Oldest item whose name matches exactly (case-sensitive)
    pub async fn find_by_name(&self, name: &str) -> Result<Option<HouseholdItem>, StoreError> {
        let item = sqlx::query_as::<_, HouseholdItem>(
            "SELECT * FROM household_items WHERE name = ? ORDER BY id LIMIT 1",
        )
        .bind(name)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(item)
    }

    pub async fn create(&self, data: &CreateHouseholdItem) -> Result<HouseholdItem, StoreError> {
        require_name(&data.name)?;
        let now = Utc::now();

        let item = sqlx::query_as::<_, HouseholdItem>(
            r#"INSERT INTO household_items
                (name, category, current_quantity, min_quantity, expiry_date,
                 refill_reminder_days, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *"#,
        )
        .bind(data.name.trim())
        .bind(&data.category)
        .bind(data.current_quantity)
        .bind(data.min_quantity)
        .bind(data.expiry_date)
        .bind(data.refill_reminder_days)
        .bind(now)
        .bind(now)
        .fetch_one(self.db.pool())
        .await?;

        Ok(item)
    }

    pub async fn update(
        &self,
        id: i64,
        changes: &UpdateHouseholdItem,
    ) -> Result<HouseholdItem, StoreError> {
        let existing = self.get(id).await?;

        let name = changes.name.as_ref().unwrap_or(&existing.name);
        require_name(name)?;
        let category = changes.category.as_ref().unwrap_or(&existing.category);
        let current_quantity = changes.current_quantity.unwrap_or(existing.current_quantity);
        let min_quantity = changes.min_quantity.unwrap_or(existing.min_quantity);
        let expiry_date = changes.expiry_date.unwrap_or(existing.expiry_date);
        let refill_reminder_days = changes
            .refill_reminder_days
            .unwrap_or(existing.refill_reminder_days);

        sqlx::query_as::<_, HouseholdItem>(
            r#"UPDATE household_items
            SET name = ?, category = ?, current_quantity = ?, min_quantity = ?,
                expiry_date = ?, refill_reminder_days = ?, updated_at = ?
            WHERE id = ?
            RETURNING *"#,
        )
        .bind(name.trim())
        .bind(category)
        .bind(current_quantity)
        .bind(min_quantity)
        .bind(expiry_date)
        .bind(refill_reminder_days)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or(StoreError::not_found("Household item", id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM household_items WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Household item", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn store() -> HouseholdStore {
        HouseholdStore::new(Db::in_memory().await.unwrap())
    }

    #[test]
    fn update_distinguishes_absent_from_null_expiry() {
        let absent: UpdateHouseholdItem =
            serde_json::from_value(serde_json::json!({ "current_quantity": 3 })).unwrap();
        assert_eq!(absent.expiry_date, None);

        let cleared: UpdateHouseholdItem =
            serde_json::from_value(serde_json::json!({ "expiry_date": null })).unwrap();
        assert_eq!(cleared.expiry_date, Some(None));

        let set: UpdateHouseholdItem =
            serde_json::from_value(serde_json::json!({ "expiry_date": "2026-12-01" })).unwrap();
        assert!(matches!(set.expiry_date, Some(Some(_))));
    }

    #[tokio::test]
    async fn create_with_defaults() {
        let store = store().await;
        let item = store.create(&CreateHouseholdItem::named("Detergent")).await.unwrap();

        assert_eq!(item.category, "general");
        assert_eq!(item.current_quantity, 1);
        assert_eq!(item.min_quantity, 1);
        assert_eq!(item.expiry_date, None);
        assert_eq!(item.refill_reminder_days, 7);
        assert!(item.is_low());
    }

    #[tokio::test]
    async fn update_sets_and_clears_expiry() {
        let store = store().await;
        let expiry = Utc::now() + Duration::days(30);
        let item = store
            .create(&CreateHouseholdItem {
                expiry_date: Some(expiry),
                ..CreateHouseholdItem::named("Vitamins")
            })
            .await
            .unwrap();
        assert_eq!(item.expiry_date, Some(expiry));

        let untouched = store
            .update(
                item.id,
                &UpdateHouseholdItem {
                    current_quantity: Some(4),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(untouched.expiry_date, Some(expiry));
        assert_eq!(untouched.current_quantity, 4);

        let cleared = store
            .update(
                item.id,
                &UpdateHouseholdItem {
                    expiry_date: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.expiry_date, None);
        assert_eq!(cleared.current_quantity, 4);
    }

    #[tokio::test]
    async fn find_by_name_is_exact_and_case_sensitive() {
        let store = store().await;
        let milk = store.create(&CreateHouseholdItem::named("Milk")).await.unwrap();
        store.create(&CreateHouseholdItem::named("Milk")).await.unwrap();

        assert_eq!(store.find_by_name("Milk").await.unwrap(), Some(milk));
        assert_eq!(store.find_by_name("milk").await.unwrap(), None);
        assert_eq!(store.find_by_name("Mil").await.unwrap(), None);
    }

    #[tokio::test]
    async fn renamed_item_is_stored_trimmed() {
        let store = store().await;
        let item = store.create(&CreateHouseholdItem::named("Cheese")).await.unwrap();

        let renamed = store
            .update(
                item.id,
                &UpdateHouseholdItem {
                    name: Some(" Milk ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(renamed.name, "Milk");
        assert_eq!(store.find_by_name("Milk").await.unwrap(), Some(renamed));
    }

    #[tokio::test]
    async fn list_filters_by_category() {
        let store = store().await;
        store.create(&CreateHouseholdItem::named("Soap")).await.unwrap();
        store
            .create(&CreateHouseholdItem {
                category: "food".to_string(),
                ..CreateHouseholdItem::named("Rice")
            })
            .await
            .unwrap();

        let food = store
            .list(&HouseholdFilter {
                category: Some("food".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(food.len(), 1);
        assert_eq!(food[0].name, "Rice");
        assert_eq!(store.list(&HouseholdFilter::default()).await.unwrap().len(), 2);
    }
}
