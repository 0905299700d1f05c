use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::fingerprint;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Safety,
    Weather,
    Health,
    Transport,
    Event,
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Safety => "safety",
            Category::Weather => "weather",
            Category::Health => "health",
            Category::Transport => "transport",
            Category::Event => "event",
            Category::General => "general",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// Provider-shaped record as decoded off the wire. Field aliases absorb the
/// naming differences between news-style upstreams.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "summary", alias = "content", alias = "snippet")]
    pub description: String,
    #[serde(default, alias = "publishedAt", alias = "pubDate", alias = "published")]
    pub published_at: Option<String>,
    #[serde(default, alias = "source_name", alias = "provider")]
    pub source: Option<String>,
    #[serde(default, alias = "link")]
    pub url: Option<String>,
}

/// Normalized record handed to consumers. Category and severity are always
/// populated; location and the passthrough fields may be absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    pub category: Category,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A logical request: operation name plus its parameters. Parameters live in a
/// BTreeMap so the fingerprint is independent of construction order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedQuery {
    operation: String,
    params: BTreeMap<String, String>,
}

impl FeedQuery {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn location(&self) -> Option<&str> {
        self.param("location")
    }

    pub fn topic(&self) -> Option<&str> {
        self.param("topic")
    }

    pub fn fingerprint(&self) -> String {
        fingerprint::fingerprint(&self.operation, &self.params)
    }
}
