//! Static settings presets.
//!
//! [`SettingsTemplate`] backs the `apply-template` tool;
//! [`OptimizationPreset`] backs the `optimize-settings` prompt.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Index settings tuned for a common application shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SettingsTemplate {
    Ecommerce,
    ContentSearch,
    SaasApp,
}

impl SettingsTemplate {
    pub const ALL: [SettingsTemplate; 3] = [
        SettingsTemplate::Ecommerce,
        SettingsTemplate::ContentSearch,
        SettingsTemplate::SaasApp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SettingsTemplate::Ecommerce => "ecommerce",
            SettingsTemplate::ContentSearch => "content_search",
            SettingsTemplate::SaasApp => "saas_app",
        }
    }

    /// The settings document sent to `PATCH /indexes/{uid}/settings`.
    pub fn settings(self) -> Value {
        match self {
            SettingsTemplate::Ecommerce => json!({
                "searchableAttributes": ["name", "description", "brand", "categories", "sku"],
                "filterableAttributes": ["price", "brand", "categories", "color", "size", "in_stock"],
                "sortableAttributes": ["price", "created_at", "rating"],
                "rankingRules": [
                    "words", "typo", "proximity", "attribute", "sort", "exactness",
                    "popularity:desc"
                ],
                "distinctAttribute": "sku",
                "stopWords": ["the", "a", "an", "and", "or", "but", "in", "on", "with"],
                "synonyms": {
                    "laptop": ["notebook", "portable computer"],
                    "phone": ["smartphone", "mobile", "cellphone"],
                    "tv": ["television", "smart tv", "monitor"]
                },
                "typoTolerance": {
                    "enabled": true,
                    "minWordSizeForTypos": { "oneTypo": 4, "twoTypos": 8 }
                },
                "pagination": { "maxTotalHits": 1000 },
                "faceting": { "maxValuesPerFacet": 100 }
            }),
            SettingsTemplate::ContentSearch => json!({
                "searchableAttributes": ["title", "content", "description", "tags", "author"],
                "filterableAttributes": ["type", "category", "tags", "published_date", "author"],
                "sortableAttributes": ["published_date", "updated_date"],
                "rankingRules": [
                    "words", "typo", "proximity", "attribute", "sort", "exactness",
                    "published_date:desc"
                ],
                "stopWords": [
                    "the", "be", "to", "of", "and", "a", "in", "that", "have", "it",
                    "for", "not", "on", "with"
                ],
                "distinctAttribute": null,
                "typoTolerance": {
                    "enabled": true,
                    "minWordSizeForTypos": { "oneTypo": 5, "twoTypos": 9 }
                }
            }),
            SettingsTemplate::SaasApp => json!({
                "searchableAttributes": ["name", "email", "company", "title", "metadata"],
                "filterableAttributes": ["role", "plan", "status", "team_id", "organization_id"],
                "sortableAttributes": ["created_at", "last_login", "plan_level"],
                "rankingRules": ["words", "typo", "proximity", "attribute", "sort", "exactness"],
                "distinctAttribute": "id",
                "typoTolerance": { "enabled": true, "disableOnAttributes": ["email"] },
                "pagination": { "maxTotalHits": 100 }
            }),
        }
    }
}

impl fmt::Display for SettingsTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search-behaviour presets offered by the `optimize-settings` prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationPreset {
    SearchAsYouType,
    ExactSearch,
    FuzzySearch,
}

impl OptimizationPreset {
    pub const ALL: [OptimizationPreset; 3] = [
        OptimizationPreset::SearchAsYouType,
        OptimizationPreset::ExactSearch,
        OptimizationPreset::FuzzySearch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OptimizationPreset::SearchAsYouType => "search-as-you-type",
            OptimizationPreset::ExactSearch => "exact-search",
            OptimizationPreset::FuzzySearch => "fuzzy-search",
        }
    }

    pub fn settings(self) -> Value {
        match self {
            OptimizationPreset::SearchAsYouType => json!({
                "rankingRules": ["words", "typo", "proximity", "attribute", "sort", "exactness"],
                "typoTolerance": {
                    "enabled": true,
                    "minWordSizeForTypos": { "oneTypo": 5, "twoTypos": 9 }
                }
            }),
            OptimizationPreset::ExactSearch => json!({
                "rankingRules": ["words", "attribute", "sort", "exactness"],
                "typoTolerance": { "enabled": false }
            }),
            OptimizationPreset::FuzzySearch => json!({
                "rankingRules": ["typo", "words", "proximity", "attribute", "sort", "exactness"],
                "typoTolerance": {
                    "enabled": true,
                    "minWordSizeForTypos": { "oneTypo": 3, "twoTypos": 7 }
                }
            }),
        }
    }

    /// Comma-separated list of accepted names.
    pub fn available() -> String {
        Self::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for OptimizationPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or(wanted)
    }
}
