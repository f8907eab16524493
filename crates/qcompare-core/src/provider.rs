//! Provider records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::system::System;

/// Attribution for providers listed through a third party (e.g. a cloud marketplace).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThirdParty {
    #[serde(default, alias = "third_party_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, alias = "third_party_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Provider description: either plain text or a structured record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Structured {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        short_description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        long_description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        history: Option<String>,
    },
    Text(String),
}

/// Which part of a description to render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DescriptionScope {
    Summary,
    History,
    #[default]
    All,
}

/// An organization offering one or more systems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// URL-friendly provider slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, alias = "fromThirdParty", skip_serializing_if = "Option::is_none")]
    pub from_third_party: Option<bool>,
    #[serde(default, alias = "thirdParty", skip_serializing_if = "Option::is_none")]
    pub third_party: Option<ThirdParty>,
    #[serde(default, alias = "fetchMethod", skip_serializing_if = "Option::is_none")]
    pub fetch_method: Option<String>,
    /// Ids of the systems this provider owns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backends_ids: Option<Vec<String>>,
    #[serde(default, alias = "lastChecked", skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    /// Keys not modelled above.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl Provider {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Some(id.into()),
            pid: Some(name.to_lowercase().replace(' ', "-")),
            name: Some(name),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: Description) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_backends<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.backends_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Best available label: name, then pid, then id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.pid.as_deref())
            .or(self.id.as_deref())
            .unwrap_or("Unnamed provider")
    }

    /// Name of the third party the provider is listed through, if any.
    pub fn third_party_name(&self) -> Option<&str> {
        self.third_party.as_ref()?.name.as_deref()
    }

    /// Whether `system` is listed in this provider's `backends_ids`.
    pub fn lists_backend(&self, system: &System) -> bool {
        self.backends_ids
            .as_ref()
            .is_some_and(|ids| ids.iter().any(|id| *id == system.id))
    }

    /// Render the description for `scope`.
    ///
    /// Plain-text descriptions are returned unchanged for every scope.
    pub fn description_text(&self, scope: DescriptionScope) -> Option<String> {
        match self.description.as_ref()? {
            Description::Text(text) => Some(text.clone()),
            Description::Structured {
                short_description,
                history,
                ..
            } => match scope {
                DescriptionScope::Summary => short_description.clone(),
                DescriptionScope::History => history.clone(),
                DescriptionScope::All => Some(format!(
                    "Summary\n{}\n\nHistory\n{}",
                    short_description.as_deref().unwrap_or_default(),
                    history.as_deref().unwrap_or_default()
                )),
            },
        }
    }

    /// Names of the attributes that carry a value, sorted by name.
    pub fn populated_attributes(&self) -> Vec<String> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, _)| k)
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())?;
        if let Some(party) = self.third_party_name() {
            write!(f, " (via {party})")?;
        }
        Ok(())
    }
}
