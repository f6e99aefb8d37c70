//! Reminder evaluation over household items
//!
//! Reminders are derived at read time and never stored. Each item is checked
//! against two independent conditions, so one item yields zero, one or two
//! reminders, in item order.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::household::HouseholdItem;
use crate::util::time::days_until;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    LowQuantity,
    ExpiringSoon,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reminder {
    pub item: HouseholdItem,
    #[serde(rename = "type")]
    pub kind: ReminderKind,
    pub message: String,
}

/// Reminders for `items` as of `now`
pub fn evaluate(items: &[HouseholdItem], now: DateTime<Utc>) -> Vec<Reminder> {
    let mut reminders = Vec::new();

    for item in items {
        if item.is_low() {
            reminders.push(Reminder {
                item: item.clone(),
                kind: ReminderKind::LowQuantity,
                message: format!(
                    "{} is running low (current: {}, min: {})",
                    item.name, item.current_quantity, item.min_quantity
                ),
            });
        }

        if let Some(days) = days_until_expiry(item, now) {
            if days <= item.refill_reminder_days {
                reminders.push(Reminder {
                    item: item.clone(),
                    kind: ReminderKind::ExpiringSoon,
                    message: format!("{} expires in {} days", item.name, days),
                });
            }
        }
    }

    reminders
}

fn days_until_expiry(item: &HouseholdItem, now: DateTime<Utc>) -> Option<i64> {
    item.expiry_date.map(|expiry| days_until(expiry, now))
}
