//! Narrative content: card templates, choices, modifiers, and bound cards.

mod library;

pub use library::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use family_rules::{CharacterId, Stat};

use crate::preconditions::PreconditionSpec;
use crate::social_graph::SocialGraph;

/// The reserved role token bound to the player's character in every card.
pub const PLAYER_ROLE: &str = "[[P]]";

/// Unique identifier for card templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub Uuid);

impl CardId {
    /// Create a new random card ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a card ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Create a nil/empty card ID (useful for defaults).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which of a card's two choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChoiceSide {
    One,
    Two,
}

impl ChoiceSide {
    fn index(self) -> usize {
        match self {
            ChoiceSide::One => 0,
            ChoiceSide::Two => 1,
        }
    }
}

/// A change to one player stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatModifier {
    pub stat: Stat,
    pub value: i32,
}

/// A change to the affinity edge between two role-bound characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EdgeModifier {
    pub role_one: String,
    pub role_two: String,
    pub positive_modifier: f32,
    pub negative_modifier: f32,
}

/// One of the two choices on a card.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub text: String,
    pub compatibility_modifier: i32,
    pub stat_modifiers: Vec<StatModifier>,
    pub edge_modifiers: Vec<EdgeModifier>,
    /// Library key of the template presented next if this choice is made.
    pub followup: Option<String>,
}

impl Choice {
    /// Whether making this choice leads to a specific followup card.
    pub fn has_followup(&self) -> bool {
        self.followup.is_some()
    }
}

/// An immutable narrative scene loaded from content data.
///
/// `scenario` and choice texts contain `[[TOKEN]]` role placeholders; every
/// token in `roles` is bound to a concrete character when the template is
/// turned into a [`Card`].
#[derive(Debug, Clone, PartialEq)]
pub struct CardTemplate {
    pub id: CardId,
    pub num_roles: usize,
    pub scenario: String,
    pub roles: Vec<String>,
    pub choices: [Choice; 2],
    pub preconditions: Vec<PreconditionSpec>,
}

/// A card template with every role token resolved to a character.
///
/// Created by the binder for every valid role combination; never mutated
/// afterwards. Display text is derived at construction by literal token
/// replacement, applied once per distinct role key.
#[derive(Debug, Clone)]
pub struct Card {
    template: Arc<CardTemplate>,
    role_to_character: HashMap<String, CharacterId>,
    scenario: String,
    choice_texts: [String; 2],
}

impl Card {
    /// Bind a template to concrete characters. The graph supplies display
    /// names for role substitution.
    pub fn new(
        template: Arc<CardTemplate>,
        role_to_character: HashMap<String, CharacterId>,
        graph: &SocialGraph,
    ) -> Self {
        let scenario = substitute_roles(&template.scenario, &role_to_character, graph);
        let choice_texts = [
            substitute_roles(&template.choices[0].text, &role_to_character, graph),
            substitute_roles(&template.choices[1].text, &role_to_character, graph),
        ];

        Self {
            template,
            role_to_character,
            scenario,
            choice_texts,
        }
    }

    /// The template this card was bound from.
    pub fn template(&self) -> &CardTemplate {
        &self.template
    }

    /// The bound template's ID.
    pub fn template_id(&self) -> CardId {
        self.template.id
    }

    /// The scenario text with every role token replaced by its character's
    /// name.
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// One of the card's two choices.
    pub fn choice(&self, side: ChoiceSide) -> &Choice {
        &self.template.choices[side.index()]
    }

    /// A choice's display text, with role tokens replaced.
    pub fn choice_text(&self, side: ChoiceSide) -> &str {
        &self.choice_texts[side.index()]
    }

    /// The character bound to a role token, if the token is bound at all.
    pub fn role_character(&self, token: &str) -> Option<CharacterId> {
        self.role_to_character.get(token).copied()
    }

    /// The full role-to-character binding, including the player binding.
    pub fn role_map(&self) -> &HashMap<String, CharacterId> {
        &self.role_to_character
    }
}

fn substitute_roles(
    text: &str,
    role_to_character: &HashMap<String, CharacterId>,
    graph: &SocialGraph,
) -> String {
    role_to_character
        .iter()
        .fold(text.to_string(), |current, (token, id)| {
            let name = graph
                .character(*id)
                .map(|character| character.full_name())
                .unwrap_or_else(|| "Unknown".to_string());
            current.replace(token.as_str(), &name)
        })
}
