//! Character definitions for generated family members.

mod family;

pub use family::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for characters.
///
/// Ordered so that unordered character pairs can be canonicalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    /// Create a new random character ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a character ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Create a nil/empty character ID (useful for defaults).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A generated family member.
///
/// Attributes are assigned once by the external character generator and never
/// change afterwards. Equality is identity-based: two characters with the same
/// attributes are still distinct people, so everything downstream (graph
/// edges, role bindings) refers to characters by [`CharacterId`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub first_name: String,
    pub surname: String,
    pub age: u32,
    pub alignment: String,
    pub personality_traits: Vec<String>,
    pub occupation: String,
    pub likes: Vec<String>,
    pub dislikes: Vec<String>,
}

impl Character {
    /// Create a new character with the given first name and surname.
    pub fn new(first_name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            first_name: first_name.into(),
            surname: surname.into(),
            age: 0,
            alignment: String::new(),
            personality_traits: Vec::new(),
            occupation: String::new(),
            likes: Vec::new(),
            dislikes: Vec::new(),
        }
    }

    /// Set the character's age.
    pub fn with_age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    /// Set the character's alignment.
    pub fn with_alignment(mut self, alignment: impl Into<String>) -> Self {
        self.alignment = alignment.into();
        self
    }

    /// Set the character's personality traits.
    pub fn with_personality_traits(
        mut self,
        traits: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.personality_traits = traits.into_iter().map(Into::into).collect();
        self
    }

    /// Set the character's occupation.
    pub fn with_occupation(mut self, occupation: impl Into<String>) -> Self {
        self.occupation = occupation.into();
        self
    }

    /// Set what the character likes.
    pub fn with_likes(mut self, likes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.likes = likes.into_iter().map(Into::into).collect();
        self
    }

    /// Set what the character dislikes.
    pub fn with_dislikes(mut self, dislikes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.dislikes = dislikes.into_iter().map(Into::into).collect();
        self
    }

    /// The character's display name, used for role substitution in card text.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.surname)
    }
}

impl PartialEq for Character {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Character {}

impl std::fmt::Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\nAge: {}\nAlignment: {}\nOccupation: {}\nLikes: {}\nDislikes: {}",
            self.full_name(),
            self.age,
            self.alignment,
            self.occupation,
            self.likes.join(", "),
            self.dislikes.join(", ")
        )
    }
}
