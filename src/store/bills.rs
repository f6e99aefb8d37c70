//! Bill tracking

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::error::require_name;
use super::{Db, StoreError};
use crate::util::time::iso8601;

/// How often a recurring bill comes due. Informational only: no follow-up
/// bill is generated when one is paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum RecurringInterval {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

/// A stored bill
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Bill {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub due_date: DateTime<Utc>,
    pub paid: bool,
    pub recurring: bool,
    pub recurring_interval: RecurringInterval,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bill {
    /// Unpaid and due on or before `cutoff`
    pub fn is_due_by(&self, cutoff: DateTime<Utc>) -> bool {
        !self.paid && self.due_date <= cutoff
    }

    /// Copy of this bill with every provided field of `changes` applied
    fn merged(&self, changes: &UpdateBill) -> Self {
        Self {
            name: changes.name.clone().unwrap_or_else(|| self.name.clone()),
            amount: changes.amount.unwrap_or(self.amount),
            due_date: changes.due_date.unwrap_or(self.due_date),
            paid: changes.paid.unwrap_or(self.paid),
            recurring: changes.recurring.unwrap_or(self.recurring),
            recurring_interval: changes.recurring_interval.unwrap_or(self.recurring_interval),
            ..self.clone()
        }
    }
}

/// Request to create a bill
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBill {
    pub name: String,
    pub amount: f64,
    #[serde(deserialize_with = "iso8601::deserialize")]
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub recurring_interval: RecurringInterval,
}

/// Partial update: `None` leaves the field unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBill {
    pub name: Option<String>,
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "iso8601::option::deserialize")]
    pub due_date: Option<DateTime<Utc>>,
    pub paid: Option<bool>,
    pub recurring: Option<bool>,
    pub recurring_interval: Option<RecurringInterval>,
}

/// List filter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillFilter {
    pub paid: Option<bool>,
}

fn validate(name: &str, amount: f64) -> Result<(), StoreError> {
    require_name(name)?;
    if !amount.is_finite() {
        return Err(StoreError::Invalid {
            field: "amount",
            reason: "must be a finite number",
        });
    }
    Ok(())
}

/// Bill store operations
#[derive(Clone)]
pub struct BillStore {
    db: Db,
}

impl BillStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// All bills in insertion order
    pub async fn list(&self, filter: &BillFilter) -> Result<Vec<Bill>, StoreError> {
        let bills = match filter.paid {
            Some(paid) => {
                sqlx::query_as::<_, Bill>("SELECT * FROM bills WHERE paid = ? ORDER BY id")
                    .bind(paid)
                    .fetch_all(self.db.pool())
                    .await?
            }
            None => {
                sqlx::query_as::<_, Bill>("SELECT * FROM bills ORDER BY id")
                    .fetch_all(self.db.pool())
                    .await?
            }
        };
        Ok(bills)
    }

    pub async fn get(&self, id: i64) -> Result<Bill, StoreError> {
        sqlx::query_as::<_, Bill>("SELECT * FROM bills WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or(StoreError::not_found("Bill", id))
    }

    pub async fn create(&self, data: &CreateBill) -> Result<Bill, StoreError> {
        validate(&data.name, data.amount)?;
        let now = Utc::now();

        let bill = sqlx::query_as::<_, Bill>(
            r#"INSERT INTO bills
                (name, amount, due_date, paid, recurring, recurring_interval, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *"#,
        )
        .bind(data.name.trim())
        .bind(data.amount)
        .bind(data.due_date)
        .bind(data.paid)
        .bind(data.recurring)
        .bind(data.recurring_interval)
        .bind(now)
        .bind(now)
        .fetch_one(self.db.pool())
        .await?;

        Ok(bill)
    }

    /// Apply a partial update and refresh `updated_at`
    pub async fn update(&self, id: i64, changes: &UpdateBill) -> Result<Bill, StoreError> {
        let merged = self.get(id).await?.merged(changes);
        validate(&merged.name, merged.amount)?;

        sqlx::query_as::<_, Bill>(
            r#"UPDATE bills
            SET name = ?, amount = ?, due_date = ?, paid = ?, recurring = ?,
                recurring_interval = ?, updated_at = ?
            WHERE id = ?
            RETURNING *"#,
        )
        .bind(merged.name.trim())
        .bind(merged.amount)
        .bind(merged.due_date)
        .bind(merged.paid)
        .bind(merged.recurring)
        .bind(merged.recurring_interval)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or(StoreError::not_found("Bill", id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM bills WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Bill", id));
        }
        Ok(())
    }

    /// Unpaid bills due within `days` of `now`, overdue ones included
    pub async fn upcoming(&self, days: i64, now: DateTime<Utc>) -> Result<Vec<Bill>, StoreError> {
        let cutoff = Duration::try_days(days)
            .and_then(|window| now.checked_add_signed(window))
            .unwrap_or(if days < 0 {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            });
        let unpaid = self.list(&BillFilter { paid: Some(false) }).await?;
        Ok(unpaid.into_iter().filter(|bill| bill.is_due_by(cutoff)).collect())
    }
}
