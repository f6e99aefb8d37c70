//! In-memory registry of declared appliance connections

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::fridge::{FridgeItem, InventorySource, MockFridge};
use crate::store::shopping::ShoppingItem;

pub const FRIDGE: &str = "fridge";

const DEFAULT_MQTT_BROKER: &str = "localhost";
const DEFAULT_MQTT_PORT: u16 = 1883;

/// Body of `POST /appliances/connect`
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectRequest {
    #[serde(rename = "type")]
    pub appliance_type: String,
    pub connection_info: ConnectionInfo,
}

/// Connection details as sent by the client. Which fields matter depends
/// on `protocol` (default `mqtt`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectionInfo {
    pub protocol: Option<String>,
    pub broker: Option<String>,
    pub port: Option<u16>,
    pub topic: Option<String>,
    pub url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "protocol", rename_all = "lowercase")]
pub enum Endpoint {
    Mqtt {
        broker: String,
        port: u16,
        topic: String,
    },
    Http {
        url: String,
        api_key: String,
    },
}

impl Endpoint {
    fn label(&self) -> &'static str {
        match self {
            Endpoint::Mqtt { .. } => "MQTT",
            Endpoint::Http { .. } => "HTTP",
        }
    }
}

/// What we know about one appliance. Replaced wholesale on reconnect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplianceConnection {
    #[serde(flatten)]
    pub endpoint: Endpoint,
    pub connected: bool,
    pub last_sync: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appliance: Option<ApplianceConnection>,
}

impl ConnectOutcome {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            appliance: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplianceStatus {
    pub appliances: BTreeMap<String, ApplianceConnection>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_sent: Option<usize>,
}

#[derive(Debug, thiserror::Error)]
enum EndpointError {
    #[error("Unsupported protocol: {0}")]
    Unsupported(String),

    #[error("{protocol} connection for {appliance} has no {field}")]
    Incomplete {
        protocol: &'static str,
        appliance: String,
        field: &'static str,
    },
}

fn resolve_endpoint(appliance_type: &str, info: &ConnectionInfo) -> Result<Endpoint, EndpointError> {
    match info.protocol.as_deref().unwrap_or("mqtt") {
        "mqtt" => Ok(Endpoint::Mqtt {
            broker: info
                .broker
                .clone()
                .unwrap_or_else(|| DEFAULT_MQTT_BROKER.to_string()),
            port: info.port.unwrap_or(DEFAULT_MQTT_PORT),
            topic: info
                .topic
                .clone()
                .unwrap_or_else(|| format!("home/{}", appliance_type)),
        }),
        "http" => {
            let url = info
                .url
                .clone()
                .filter(|url| !url.trim().is_empty())
                .ok_or_else(|| EndpointError::Incomplete {
                    protocol: "HTTP",
                    appliance: appliance_type.to_string(),
                    field: "url",
                })?;
            Ok(Endpoint::Http {
                url,
                api_key: info.api_key.clone().unwrap_or_default(),
            })
        }
        other => Err(EndpointError::Unsupported(other.to_string())),
    }
}

/// Registry of appliance connections plus the fridge inventory source.
/// Built once at startup and shared through [`crate::app::AppState`].
pub struct ApplianceManager {
    connections: DashMap<String, ApplianceConnection>,
    fridge: Arc<dyn InventorySource>,
}

impl ApplianceManager {
    pub fn new(fridge: Arc<dyn InventorySource>) -> Self {
        Self {
            connections: DashMap::new(),
            fridge,
        }
    }

    /// Record a connection. Never fails loudly: problems come back as
    /// `success: false` and leave the registry as it was.
    pub fn connect(&self, appliance_type: &str, info: &ConnectionInfo) -> ConnectOutcome {
        let endpoint = match resolve_endpoint(appliance_type, info) {
            Ok(endpoint) => endpoint,
            Err(e @ EndpointError::Unsupported(_)) => {
                info!(appliance = appliance_type, "Rejected connection: {}", e);
                return ConnectOutcome::failed(e.to_string());
            }
            Err(e @ EndpointError::Incomplete { protocol, .. }) => {
                warn!(appliance = appliance_type, error = %e, "Appliance connection failed");
                return ConnectOutcome::failed(format!(
                    "Failed to connect to appliance via {}",
                    protocol
                ));
            }
        };

        let label = endpoint.label();
        let connection = ApplianceConnection {
            endpoint,
            connected: true,
            last_sync: Utc::now(),
        };
        self.connections
            .insert(appliance_type.to_string(), connection.clone());

        info!(appliance = appliance_type, protocol = label, "Appliance connected");

        ConnectOutcome {
            success: true,
            message: format!("Connected to {} via {}", appliance_type, label),
            appliance: Some(connection),
        }
    }

    pub fn get(&self, appliance_type: &str) -> Option<ApplianceConnection> {
        self.connections
            .get(appliance_type)
            .map(|entry| entry.value().clone())
    }

    pub fn connected_count(&self) -> usize {
        self.connections.len()
    }

    /// Snapshot of every connection, keyed by appliance type
    pub fn status(&self) -> ApplianceStatus {
        let appliances: BTreeMap<String, ApplianceConnection> = self
            .connections
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        ApplianceStatus {
            count: appliances.len(),
            appliances,
        }
    }

    /// Current fridge contents, or nothing when no fridge is connected.
    /// Refreshes the fridge's `last_sync`.
    pub fn fridge_inventory(&self) -> Vec<FridgeItem> {
        let Some(mut fridge) = self.connections.get_mut(FRIDGE) else {
            return Vec::new();
        };

        let now = Utc::now();
        let items = self.fridge.inventory(now);
        fridge.last_sync = now;
        items
    }

    /// Push the shopping list to an appliance's display (mock: nothing is sent)
    pub fn send_shopping_list(&self, appliance_type: &str, items: &[ShoppingItem]) -> SendOutcome {
        if self.get(appliance_type).is_none() {
            return SendOutcome {
                success: false,
                message: format!("{} not connected", appliance_type),
                items_sent: None,
            };
        }

        info!(appliance = appliance_type, items = items.len(), "Shopping list sent");
        SendOutcome {
            success: true,
            message: format!("Shopping list sent to {}", appliance_type),
            items_sent: Some(items.len()),
        }
    }
}

impl Default for ApplianceManager {
    fn default() -> Self {
        Self::new(Arc::new(MockFridge))
    }
}
