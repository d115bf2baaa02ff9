//! Per-index MCP resources: `meilisearch://index/<uid>/<kind>`.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::managers::{ManagerSet, TaskFilters};

const SCHEME: &str = "meilisearch://";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Stats,
    Settings,
    Tasks,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [ResourceKind::Stats, ResourceKind::Settings, ResourceKind::Tasks];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Stats => "stats",
            ResourceKind::Settings => "settings",
            ResourceKind::Tasks => "tasks",
        }
    }

    pub fn name(self, index_uid: &str) -> String {
        match self {
            ResourceKind::Stats => format!("Stats for {index_uid}"),
            ResourceKind::Settings => format!("Settings for {index_uid}"),
            ResourceKind::Tasks => format!("Tasks for {index_uid}"),
        }
    }

    pub fn description(self, index_uid: &str) -> String {
        match self {
            ResourceKind::Stats => format!("Statistics and metadata for the {index_uid} index"),
            ResourceKind::Settings => {
                format!("Current settings configuration for the {index_uid} index")
            }
            ResourceKind::Tasks => format!("Recent tasks history for the {index_uid} index"),
        }
    }
}

impl FromStr for ResourceKind {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        Self::ALL.into_iter().find(|k| k.as_str() == s).ok_or(())
    }
}

/// A parsed resource address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceUri {
    pub index_uid: String,
    pub kind: ResourceKind,
}

impl ResourceUri {
    pub fn new(index_uid: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            index_uid: index_uid.into(),
            kind,
        }
    }

    pub fn parse(uri: &str) -> Result<Self> {
        let invalid = || Error::UnknownResource(uri.to_string());
        let rest = uri.strip_prefix(SCHEME).ok_or_else(invalid)?;
        let mut parts = rest.split('/');
        let (Some("index"), Some(index_uid), Some(kind), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        if index_uid.is_empty() {
            return Err(invalid());
        }
        let kind = kind.parse().map_err(|_| invalid())?;
        Ok(Self::new(index_uid, kind))
    }

    /// Issue the single remote read backing this resource.
    pub async fn read(&self, managers: &ManagerSet) -> Result<String> {
        let uid = &self.index_uid;
        Ok(match self.kind {
            ResourceKind::Stats => {
                let stats = managers.monitoring.index_metrics(uid).await?;
                format!("Statistics for index {uid}:\n{}", pretty(&stats))
            }
            ResourceKind::Settings => {
                let settings = managers.settings.get_settings(uid).await?;
                format!("Settings for index {uid}:\n{}", pretty(&settings))
            }
            ResourceKind::Tasks => {
                let tasks = managers.tasks.get_tasks(&TaskFilters::for_index(uid)).await?;
                format!("Recent tasks for index {uid}:\n{}", pretty(&tasks))
            }
        })
    }
}

fn pretty<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}index/{}/{}", self.index_uid, self.kind.as_str())
    }
}
