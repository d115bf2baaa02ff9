//! Connection facade: the current coordinates and the managers built
//! from them.
//!
//! Readers take an `Arc` snapshot of the current [`ManagerSet`] under a
//! short read lock and keep using it for the rest of their call, so a
//! concurrent [`Connection::reconfigure`] never changes the client under
//! an in-flight request.  Reconfigurations themselves are serialized.

use std::sync::{Arc, RwLock};

use serde_json::json;
use tokio::sync::Mutex;

use crate::client::{Coordinates, CoordinatesView, Transport};
use crate::error::Result;
use crate::logs::Logger;
use crate::managers::ManagerSet;

pub struct Connection {
    transport: Arc<dyn Transport>,
    logger: Logger,
    current: RwLock<Arc<ManagerSet>>,
    reconfigure_lock: Mutex<()>,
}

impl Connection {
    /// Build the initial manager set; fails on an unusable URL.
    pub fn new(coordinates: Coordinates, transport: Arc<dyn Transport>, logger: Logger) -> Result<Self> {
        let managers = ManagerSet::build(coordinates, transport.clone(), &logger)?;
        Ok(Self {
            transport,
            logger,
            current: RwLock::new(Arc::new(managers)),
            reconfigure_lock: Mutex::new(()),
        })
    }

    /// Snapshot of the current managers.
    pub fn managers(&self) -> Arc<ManagerSet> {
        self.current
            .read()
            .expect("connection state poisoned")
            .clone()
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn current_coordinates(&self) -> CoordinatesView {
        self.managers().coordinates().view()
    }

    /// Replace the provided coordinates and rebuild every manager.
    ///
    /// Empty strings count as not provided.  On error the previous
    /// state is kept.
    pub async fn reconfigure(
        &self,
        url: Option<String>,
        api_key: Option<String>,
    ) -> Result<CoordinatesView> {
        let _guard = self.reconfigure_lock.lock().await;

        let previous = self.managers().coordinates().clone();
        let url = url.filter(|u| !u.is_empty()).unwrap_or(previous.url);
        let api_key = api_key.filter(|k| !k.is_empty()).or(previous.api_key);
        let coordinates = Coordinates::new(url, api_key);

        let managers = ManagerSet::build(coordinates, self.transport.clone(), &self.logger)?;
        let view = managers.coordinates().view();
        *self.current.write().expect("connection state poisoned") = Arc::new(managers);

        self.logger.info(
            "Updated Meilisearch connection settings",
            json!({ "url": view.url }),
        );
        Ok(view)
    }

    /// `GET /health` against the current coordinates.
    pub async fn health_check(&self) -> bool {
        self.managers().client().is_healthy().await
    }
}
