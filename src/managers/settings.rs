use std::sync::Arc;

use serde_json::Value;

use crate::client::MeiliClient;
use crate::error::{Error, Result};
use crate::templates::SettingsTemplate;

pub struct SettingsManager {
    client: Arc<MeiliClient>,
}

impl SettingsManager {
    pub fn new(client: Arc<MeiliClient>) -> Self {
        Self { client }
    }

    pub async fn get_settings(&self, index_uid: &str) -> Result<Value> {
        self.client
            .get(["indexes", index_uid, "settings"])
            .await
            .map_err(Error::failed("get settings"))
    }

    pub async fn update_settings(&self, index_uid: &str, settings: Value) -> Result<Value> {
        self.client
            .patch(["indexes", index_uid, "settings"], settings)
            .await
            .map_err(Error::failed("update settings"))
    }

    pub async fn reset_settings(&self, index_uid: &str) -> Result<Value> {
        self.client
            .delete(["indexes", index_uid, "settings"])
            .await
            .map_err(Error::failed("reset settings"))
    }

    pub async fn apply_template(&self, index_uid: &str, template: SettingsTemplate) -> Result<Value> {
        self.client
            .patch(["indexes", index_uid, "settings"], template.settings())
            .await
            .map_err(Error::failed("apply template"))
    }
}
