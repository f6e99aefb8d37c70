//! Fridge inventory sources

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

/// One item reported by a fridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FridgeItem {
    pub name: String,
    pub quantity: i64,
    /// Best-before date as printed on the package
    pub expiry_date: Option<NaiveDate>,
    pub location: String,
}

/// Something that can report what is in the fridge
pub trait InventorySource: Send + Sync {
    fn inventory(&self, now: DateTime<Utc>) -> Vec<FridgeItem>;
}

/// Fixed demo inventory with expiry dates relative to `now`.
/// Stands in for a vendor API until a real client exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockFridge;

/// (name, quantity, days until expiry, shelf)
const MOCK_CONTENTS: [(&str, i64, i64, &str); 3] = [
    ("Milk", 2, 5, "main_shelf"),
    ("Eggs", 12, 10, "door"),
    ("Butter", 1, 15, "main_shelf"),
];

impl InventorySource for MockFridge {
    fn inventory(&self, now: DateTime<Utc>) -> Vec<FridgeItem> {
        MOCK_CONTENTS
            .iter()
            .map(|&(name, quantity, expires_in, location)| FridgeItem {
                name: name.to_string(),
                quantity,
                expiry_date: Some((now + Duration::days(expires_in)).date_naive()),
                location: location.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn mock_dates_are_relative_to_now() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 23, 30, 0).unwrap();
        let items = MockFridge.inventory(now);

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].name, "Milk");
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].expiry_date, NaiveDate::from_ymd_opt(2026, 10, 24));
        assert_eq!(items[1].expiry_date, NaiveDate::from_ymd_opt(2026, 10, 29));
        assert_eq!(items[2].location, "main_shelf");
    }

    #[test]
    fn expiry_serializes_as_plain_date() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        let json = serde_json::to_value(MockFridge.inventory(now)).unwrap();
        assert_eq!(json[1]["expiry_date"], "2026-10-29");
        assert_eq!(json[1]["location"], "door");
    }
}
