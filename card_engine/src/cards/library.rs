//! Loading and validating the card content document.
//!
//! The wire format is a JSON object mapping string keys to card templates;
//! choice followups reference those keys. All content-authoring errors are
//! surfaced here, at load time.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::preconditions::{PreconditionError, PreconditionSpec};

use super::{CardId, CardTemplate, Choice, EdgeModifier, StatModifier};

/// Errors raised while loading card content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read card content: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed card content: {0}")]
    Json(#[from] serde_json::Error),

    #[error("template {key} has {found} choices, expected exactly 2")]
    WrongChoiceCount { key: String, found: usize },

    #[error("template {key} declares {num_roles} roles but lists {listed}")]
    RoleCountMismatch {
        key: String,
        num_roles: usize,
        listed: usize,
    },

    #[error("template {key}: {source}")]
    Precondition {
        key: String,
        #[source]
        source: PreconditionError,
    },

    /// A followup reference that resolves nowhere is a content-authoring
    /// error, caught before play rather than mid-session.
    #[error("template {key} references missing followup template {followup}")]
    MissingFollowupTemplate { key: String, followup: String },
}

/// All card templates, keyed by the content document's string keys.
///
/// Iteration is in sorted-key order, so sequential presentation is
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct CardLibrary {
    templates: BTreeMap<String, Arc<CardTemplate>>,
}

impl CardLibrary {
    /// Create a new empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a template under a key, replacing any previous entry.
    ///
    /// Programmatic construction skips followup validation; call
    /// [`Self::check_followups`] once the library is complete.
    pub fn insert(&mut self, key: impl Into<String>, template: CardTemplate) {
        self.templates.insert(key.into(), Arc::new(template));
    }

    /// Parse and validate a card content document.
    pub fn load_from_str(input: &str) -> Result<Self, ContentError> {
        let raw: BTreeMap<String, TemplateData> = serde_json::from_str(input)?;

        let mut library = Self::new();
        for (key, data) in raw {
            let template = data.into_template(&key)?;
            library.insert(key, template);
        }

        library.check_followups()?;

        tracing::debug!(count = library.len(), "card library loaded");
        Ok(library)
    }

    /// Load a card content document from a JSON file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let contents = std::fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    /// The template stored under `key`, if any.
    pub fn template(&self, key: &str) -> Option<&Arc<CardTemplate>> {
        self.templates.get(key)
    }

    /// All templates in sorted-key order.
    pub fn templates(&self) -> impl Iterator<Item = (&String, &Arc<CardTemplate>)> {
        self.templates.iter()
    }

    /// Number of templates in the library.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the library holds no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Verify that every followup reference resolves to a library key.
    pub fn check_followups(&self) -> Result<(), ContentError> {
        for (key, template) in &self.templates {
            for choice in &template.choices {
                if let Some(followup) = &choice.followup {
                    if !self.templates.contains_key(followup) {
                        tracing::warn!(%key, %followup, "dangling followup reference");
                        return Err(ContentError::MissingFollowupTemplate {
                            key: key.clone(),
                            followup: followup.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TemplateData {
    #[serde(rename = "ID")]
    id: Uuid,
    num_roles: usize,
    scenario: String,
    roles: Vec<String>,
    choices: Vec<ChoiceData>,
    #[serde(default)]
    preconditions: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ChoiceData {
    choice_text: String,
    #[serde(default)]
    compatibility_modifier: i32,
    #[serde(default)]
    stat_modifiers: Vec<StatModifier>,
    #[serde(default)]
    edge_modifiers: Vec<EdgeModifier>,
    #[serde(default)]
    followup_card: Option<String>,
}

impl TemplateData {
    fn into_template(self, key: &str) -> Result<CardTemplate, ContentError> {
        if self.roles.len() != self.num_roles {
            return Err(ContentError::RoleCountMismatch {
                key: key.to_string(),
                num_roles: self.num_roles,
                listed: self.roles.len(),
            });
        }

        let preconditions = self
            .preconditions
            .iter()
            .map(PreconditionSpec::from_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| ContentError::Precondition {
                key: key.to_string(),
                source,
            })?;

        let found = self.choices.len();
        let choices: [Choice; 2] = self
            .choices
            .into_iter()
            .map(ChoiceData::into_choice)
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|_| ContentError::WrongChoiceCount {
                key: key.to_string(),
                found,
            })?;

        Ok(CardTemplate {
            id: CardId::from_uuid(self.id),
            num_roles: self.num_roles,
            scenario: self.scenario,
            roles: self.roles,
            choices,
            preconditions,
        })
    }
}

impl ChoiceData {
    fn into_choice(self) -> Choice {
        Choice {
            text: self.choice_text,
            compatibility_modifier: self.compatibility_modifier,
            stat_modifiers: self.stat_modifiers,
            edge_modifiers: self.edge_modifiers,
            // The literal "null" and the empty string both mean "no
            // followup" on the wire.
            followup: self
                .followup_card
                .filter(|key| !key.is_empty() && key != "null"),
        }
    }
}
