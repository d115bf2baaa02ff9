//! Resource managers: one per family of Meilisearch routes.
//!
//! Every method issues one remote call (multi-index search and the
//! system-information aggregate excepted) and wraps failures as
//! `"Failed to <operation>: <cause>"`.

pub mod documents;
pub mod indexes;
pub mod keys;
pub mod monitoring;
pub mod search;
pub mod settings;
pub mod tasks;

pub use documents::DocumentManager;
pub use indexes::{IndexList, IndexManager, IndexRecord};
pub use keys::{KeyManager, KeyOptions};
pub use monitoring::{HealthStatus, IndexMetrics, MonitoringManager, SystemInfo};
pub use search::{MultiIndexResults, SearchManager, SearchOutcome, SearchParams};
pub use settings::SettingsManager;
pub use tasks::{TaskFilters, TaskManager};

use std::sync::Arc;

use crate::client::{Coordinates, MeiliClient, Transport};
use crate::error::Result;
use crate::logs::Logger;

/// Every manager, built together from one set of coordinates.
///
/// A set is never mutated; reconfiguration builds a new one.
pub struct ManagerSet {
    client: Arc<MeiliClient>,
    pub indexes: IndexManager,
    pub documents: DocumentManager,
    pub settings: SettingsManager,
    pub tasks: TaskManager,
    pub keys: KeyManager,
    pub monitoring: MonitoringManager,
    pub search: SearchManager,
}

impl ManagerSet {
    pub fn build(
        coordinates: Coordinates,
        transport: Arc<dyn Transport>,
        logger: &Logger,
    ) -> Result<Self> {
        let client = Arc::new(MeiliClient::new(coordinates, transport)?);
        Ok(Self {
            indexes: IndexManager::new(client.clone()),
            documents: DocumentManager::new(client.clone()),
            settings: SettingsManager::new(client.clone()),
            tasks: TaskManager::new(client.clone()),
            keys: KeyManager::new(client.clone()),
            monitoring: MonitoringManager::new(client.clone()),
            search: SearchManager::new(client.clone(), logger.clone()),
            client,
        })
    }

    pub fn client(&self) -> &MeiliClient {
        &self.client
    }

    pub fn coordinates(&self) -> &Coordinates {
        self.client.coordinates()
    }
}
