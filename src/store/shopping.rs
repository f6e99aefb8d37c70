//! Shopping list

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::error::require_name;
use super::{Db, StoreError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// An entry on the shopping list
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ShoppingItem {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub category: String,
    pub priority: Priority,
    pub purchased: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateShoppingItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
}

fn default_quantity() -> i64 {
    1
}

fn default_category() -> String {
    "general".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateShoppingItem {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub purchased: Option<bool>,
}

/// List filter. Only items still to buy unless `purchased=true` is asked for.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShoppingFilter {
    #[serde(default)]
    pub purchased: bool,
}

/// Shopping list operations
#[derive(Clone)]
pub struct ShoppingStore {
    db: Db,
}

impl ShoppingStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn list(&self, filter: &ShoppingFilter) -> Result<Vec<ShoppingItem>, StoreError> {
        let items = sqlx::query_as::<_, ShoppingItem>(
            "SELECT * FROM shopping_items WHERE purchased = ? ORDER BY id",
        )
        .bind(filter.purchased)
        .fetch_all(self.db.pool())
        .await?;
        Ok(items)
    }

    pub async fn get(&self, id: i64) -> Result<ShoppingItem, StoreError> {
        sqlx::query_as::<_, ShoppingItem>("SELECT * FROM shopping_items WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or(StoreError::not_found("Shopping item", id))
    }

    pub async fn create(&self, data: &CreateShoppingItem) -> Result<ShoppingItem, StoreError> {
        require_name(&data.name)?;
        let now = Utc::now();

        let item = sqlx::query_as::<_, ShoppingItem>(
            r#"INSERT INTO shopping_items
                (name, quantity, category, priority, purchased, created_at, updated_at)
            VALUES (?, ?, ?, ?, FALSE, ?, ?)
            RETURNING *"#,
        )
        .bind(data.name.trim())
        .bind(data.quantity)
        .bind(&data.category)
        .bind(data.priority)
        .bind(now)
        .bind(now)
        .fetch_one(self.db.pool())
        .await?;

        Ok(item)
    }

    pub async fn update(
        &self,
        id: i64,
        changes: &UpdateShoppingItem,
    ) -> Result<ShoppingItem, StoreError> {
        let existing = self.get(id).await?;

        let name = changes.name.as_ref().unwrap_or(&existing.name);
        require_name(name)?;
        let quantity = changes.quantity.unwrap_or(existing.quantity);
        let category = changes.category.as_ref().unwrap_or(&existing.category);
        let priority = changes.priority.unwrap_or(existing.priority);
        let purchased = changes.purchased.unwrap_or(existing.purchased);

        sqlx::query_as::<_, ShoppingItem>(
            r#"UPDATE shopping_items
            SET name = ?, quantity = ?, category = ?, priority = ?, purchased = ?, updated_at = ?
            WHERE id = ?
            RETURNING *"#,
        )
        .bind(name.trim())
        .bind(quantity)
        .bind(category)
        .bind(priority)
        .bind(purchased)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or(StoreError::not_found("Shopping item", id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM shopping_items WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Shopping item", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> ShoppingStore {
        ShoppingStore::new(Db::in_memory().await.unwrap())
    }

    fn milk() -> CreateShoppingItem {
        serde_json::from_value(serde_json::json!({ "name": "Milk" })).unwrap()
    }

    #[test]
    fn create_request_applies_defaults() {
        let item = milk();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.category, "general");
        assert_eq!(item.priority, Priority::Medium);
    }

    #[test]
    fn unknown_priority_is_rejected() {
        let parsed: Result<CreateShoppingItem, _> =
            serde_json::from_value(serde_json::json!({ "name": "Bread", "priority": "urgent" }));
        assert!(parsed.is_err());
    }

    #[tokio::test]
    async fn list_hides_purchased_items_by_default() {
        let store = store().await;
        let milk = store.create(&milk()).await.unwrap();
        let bread = store
            .create(&CreateShoppingItem {
                name: "Bread".to_string(),
                quantity: 2,
                category: "bakery".to_string(),
                priority: Priority::High,
            })
            .await
            .unwrap();

        store
            .update(
                milk.id,
                &UpdateShoppingItem {
                    purchased: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let pending = store.list(&ShoppingFilter::default()).await.unwrap();
        assert_eq!(pending, vec![bread]);

        let bought = store.list(&ShoppingFilter { purchased: true }).await.unwrap();
        assert_eq!(bought.len(), 1);
        assert_eq!(bought[0].name, "Milk");
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let store = store().await;
        let item = store.create(&milk()).await.unwrap();

        let updated = store
            .update(
                item.id,
                &UpdateShoppingItem {
                    quantity: Some(3),
                    priority: Some(Priority::Low),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.quantity, 3);
        assert_eq!(updated.priority, Priority::Low);
        assert_eq!(updated.name, "Milk");
        assert_eq!(updated.category, "general");
        assert!(!updated.purchased);
    }

    #[tokio::test]
    async fn update_trims_name() {
        let store = store().await;
        let item = store.create(&milk()).await.unwrap();

        let updated = store
            .update(
                item.id,
                &UpdateShoppingItem {
                    name: Some("  Oat milk\t".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Oat milk");
    }

    #[tokio::test]
    async fn missing_item_is_not_found() {
        let store = store().await;
        assert!(matches!(store.get(7).await, Err(StoreError::NotFound { .. })));
        assert!(matches!(store.delete(7).await, Err(StoreError::NotFound { .. })));
    }
}
