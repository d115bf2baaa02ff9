use std::sync::Arc;

use reqwest::Method;
use serde_json::{json, Value};

use crate::client::{ApiRequest, MeiliClient};
use crate::error::{Error, Result};

pub struct DocumentManager {
    client: Arc<MeiliClient>,
}

impl DocumentManager {
    pub fn new(client: Arc<MeiliClient>) -> Self {
        Self { client }
    }

    pub async fn get_documents(
        &self,
        index_uid: &str,
        offset: Option<u64>,
        limit: Option<u64>,
        fields: Option<&[String]>,
    ) -> Result<Value> {
        let request = ApiRequest::new(Method::GET, ["indexes", index_uid, "documents"])
            .with_query("offset", offset)
            .with_query("limit", limit)
            .with_query("fields", fields.map(|f| f.join(",")));
        self.client
            .send(request)
            .await
            .map_err(Error::failed("get documents"))
    }

    pub async fn get_document(&self, index_uid: &str, document_id: &str) -> Result<Value> {
        self.client
            .get(["indexes", index_uid, "documents", document_id])
            .await
            .map_err(Error::failed("get document"))
    }

    /// Add or replace documents (`POST`).
    pub async fn add_documents(
        &self,
        index_uid: &str,
        documents: Vec<Value>,
        primary_key: Option<&str>,
    ) -> Result<Value> {
        let request = ApiRequest::new(Method::POST, ["indexes", index_uid, "documents"])
            .with_query("primaryKey", primary_key)
            .with_body(Value::Array(documents));
        self.client
            .send(request)
            .await
            .map_err(Error::failed("add documents"))
    }

    /// Add or partially update documents (`PUT`).
    pub async fn update_documents(
        &self,
        index_uid: &str,
        documents: Vec<Value>,
        primary_key: Option<&str>,
    ) -> Result<Value> {
        let request = ApiRequest::new(Method::PUT, ["indexes", index_uid, "documents"])
            .with_query("primaryKey", primary_key)
            .with_body(Value::Array(documents));
        self.client
            .send(request)
            .await
            .map_err(Error::failed("update documents"))
    }

    pub async fn delete_document(&self, index_uid: &str, document_id: &str) -> Result<Value> {
        self.client
            .delete(["indexes", index_uid, "documents", document_id])
            .await
            .map_err(Error::failed("delete document"))
    }

    pub async fn delete_documents(&self, index_uid: &str, document_ids: &[String]) -> Result<Value> {
        self.client
            .post(
                ["indexes", index_uid, "documents", "delete-batch"],
                json!(document_ids),
            )
            .await
            .map_err(Error::failed("delete documents"))
    }

    pub async fn delete_all_documents(&self, index_uid: &str) -> Result<Value> {
        self.client
            .delete(["indexes", index_uid, "documents"])
            .await
            .map_err(Error::failed("delete all documents"))
    }
}
