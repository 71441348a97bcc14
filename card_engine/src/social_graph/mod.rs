//! The social graph: who knows whom, and how much.
//!
//! Edges are undirected and carry an [`AffinityPair`]. Absence of an edge is
//! a distinct state from a zero-valued edge: no relationship vs. a known,
//! neutral one. Edges are only ever created or adjusted, never removed.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use family_rules::{Character, CharacterId, Family};

use crate::cards::EdgeModifier;

/// Relationship strength between two characters along independent positive
/// and negative axes. A character can be simultaneously fond of and resentful
/// toward another.
///
/// Each axis is nominally in `[0, 1]`. Modifier increments are clamped to
/// that range individually, but the accumulated total is allowed to drift
/// above 1 over many applications.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffinityPair {
    pub positive: f32,
    pub negative: f32,
}

impl AffinityPair {
    pub fn new(positive: f32, negative: f32) -> Self {
        Self { positive, negative }
    }

    /// A known-but-neutral relationship.
    pub fn neutral() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Net attitude: positive minus negative. Always recomputed, never
    /// stored.
    pub fn net(&self) -> f32 {
        self.positive - self.negative
    }
}

/// The in-game relationship network over all characters.
///
/// Owns the characters it was built from; edges and role bindings elsewhere
/// refer to them by [`CharacterId`]. Edge keys are canonicalized to the
/// (smaller, larger) id ordering, so there is at most one pair per unordered
/// character pair and connectivity is symmetric by construction.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SocialGraph {
    characters: HashMap<CharacterId, Character>,
    edges: HashMap<(CharacterId, CharacterId), AffinityPair>,
}

impl SocialGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a generated family, seeding every solver edge with
    /// a neutral affinity pair.
    pub fn from_family(family: &Family) -> Self {
        Self::build_from_family(family, AffinityPair::neutral)
    }

    /// Build a graph from a generated family, seeding every solver edge with
    /// random affinities in `[0, 1]`, rounded to two decimals.
    pub fn from_family_seeded<R: Rng>(family: &Family, rng: &mut R) -> Self {
        Self::build_from_family(family, || {
            AffinityPair::new(
                round_two(rng.gen_range(0.0..=1.0)),
                round_two(rng.gen_range(0.0..=1.0)),
            )
        })
    }

    fn build_from_family(family: &Family, mut seed: impl FnMut() -> AffinityPair) -> Self {
        let mut graph = Self::new();
        for member in &family.members {
            graph.add_character(member.clone());
        }
        for &(a, b) in &family.edges {
            // Indices were validated by Family::new.
            let (Some(ca), Some(cb)) = (family.member_id(a), family.member_id(b)) else {
                continue;
            };
            graph.add_or_merge_edge(ca, cb, seed());
        }
        graph
    }

    /// Add a character to the graph. Returns the character's ID.
    pub fn add_character(&mut self, character: Character) -> CharacterId {
        let id = character.id;
        self.characters.insert(id, character);
        id
    }

    /// Get a character by ID.
    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(&id)
    }

    /// All characters in the graph.
    pub fn all_characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    /// Number of characters in the graph.
    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    /// Number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether an edge exists between two characters, in either order.
    pub fn are_connected(&self, a: CharacterId, b: CharacterId) -> bool {
        self.edges.contains_key(&Self::key(a, b))
    }

    /// The affinity pair between two characters, or `None` if they have no
    /// relationship. `None` is not a neutral pair: callers must branch on it.
    pub fn affinity_between(&self, a: CharacterId, b: CharacterId) -> Option<&AffinityPair> {
        self.edges.get(&Self::key(a, b))
    }

    /// Insert an edge for the unordered pair if none exists. If one already
    /// exists the call is a no-op: relationships, once formed, are never
    /// silently replaced, only adjusted through [`Self::apply_edge_modifier`].
    pub fn add_or_merge_edge(&mut self, a: CharacterId, b: CharacterId, pair: AffinityPair) {
        self.edges.entry(Self::key(a, b)).or_insert(pair);
    }

    /// Apply a choice's edge modifier to the pair.
    ///
    /// If the characters are unconnected, a new edge is seeded from the
    /// modifier's values; otherwise each axis is incremented. Either way the
    /// modifier's values are individually clamped to `[0, 1]` first - a
    /// bound on a single update, not on the accumulated total.
    pub fn apply_edge_modifier(&mut self, a: CharacterId, b: CharacterId, modifier: &EdgeModifier) {
        let positive = modifier.positive_modifier.clamp(0.0, 1.0);
        let negative = modifier.negative_modifier.clamp(0.0, 1.0);

        let pair = self
            .edges
            .entry(Self::key(a, b))
            .or_insert_with(|| AffinityPair::new(0.0, 0.0));
        pair.positive += positive;
        pair.negative += negative;
    }

    fn key(a: CharacterId, b: CharacterId) -> (CharacterId, CharacterId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

fn round_two(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use family_rules::Character;

    fn two_characters(graph: &mut SocialGraph) -> (CharacterId, CharacterId) {
        let a = graph.add_character(Character::new("Alice", "Harlow"));
        let b = graph.add_character(Character::new("Bram", "Vane"));
        (a, b)
    }

    #[test]
    fn test_connection_symmetry() {
        let mut graph = SocialGraph::new();
        let (a, b) = two_characters(&mut graph);

        graph.add_or_merge_edge(a, b, AffinityPair::new(0.5, 0.1));

        assert!(graph.are_connected(a, b));
        assert!(graph.are_connected(b, a));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_one_pair_per_unordered_pair() {
        let mut graph = SocialGraph::new();
        let (a, b) = two_characters(&mut graph);

        graph.add_or_merge_edge(a, b, AffinityPair::new(0.5, 0.1));
        // Reversed insertion must not create a second edge or replace the
        // first.
        graph.add_or_merge_edge(b, a, AffinityPair::new(0.9, 0.9));

        assert_eq!(graph.edge_count(), 1);
        let pair = graph.affinity_between(a, b).unwrap();
        assert_eq!(pair.positive, 0.5);
        assert_eq!(pair.negative, 0.1);
    }

    #[test]
    fn test_no_edge_is_not_a_zero_pair() {
        let mut graph = SocialGraph::new();
        let (a, b) = two_characters(&mut graph);

        assert!(graph.affinity_between(a, b).is_none());

        graph.add_or_merge_edge(a, b, AffinityPair::neutral());
        let pair = graph.affinity_between(a, b).unwrap();
        assert_eq!(pair.net(), 0.0);
    }

    #[test]
    fn test_edge_modifier_seeds_then_accumulates() {
        let mut graph = SocialGraph::new();
        let (a, b) = two_characters(&mut graph);

        graph.apply_edge_modifier(
            a,
            b,
            &EdgeModifier {
                role_one: "[[X]]".to_string(),
                role_two: "[[Y]]".to_string(),
                positive_modifier: 0.6,
                negative_modifier: 0.3,
            },
        );
        let pair = *graph.affinity_between(a, b).unwrap();
        assert!((pair.positive - 0.6).abs() < 0.001);
        assert!((pair.negative - 0.3).abs() < 0.001);

        graph.apply_edge_modifier(
            b,
            a,
            &EdgeModifier {
                role_one: "[[X]]".to_string(),
                role_two: "[[Y]]".to_string(),
                positive_modifier: 0.6,
                negative_modifier: 0.1,
            },
        );
        // Additive per application; the running total may exceed 1.
        let pair = *graph.affinity_between(a, b).unwrap();
        assert!((pair.positive - 1.2).abs() < 0.001);
        assert!((pair.negative - 0.4).abs() < 0.001);
    }

    #[test]
    fn test_edge_modifier_increment_is_clamped() {
        let mut graph = SocialGraph::new();
        let (a, b) = two_characters(&mut graph);

        graph.apply_edge_modifier(
            a,
            b,
            &EdgeModifier {
                role_one: "[[X]]".to_string(),
                role_two: "[[Y]]".to_string(),
                positive_modifier: 5.0,
                negative_modifier: -2.0,
            },
        );

        let pair = graph.affinity_between(a, b).unwrap();
        assert_eq!(pair.positive, 1.0);
        assert_eq!(pair.negative, 0.0);
    }

    #[test]
    fn test_net_is_recomputed() {
        let pair = AffinityPair::new(0.8, 0.3);
        assert!((pair.net() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_from_family_seeds_neutral_edges() {
        let members = vec![
            Character::new("Alice", "Harlow"),
            Character::new("Bram", "Harlow"),
            Character::new("Cleo", "Harlow"),
        ];
        let ids: Vec<CharacterId> = members.iter().map(|m| m.id).collect();
        let family = Family::new("Harlow", members, vec![(0, 1), (1, 2)]).unwrap();

        let graph = SocialGraph::from_family(&family);

        assert_eq!(graph.character_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.are_connected(ids[0], ids[1]));
        assert!(!graph.are_connected(ids[0], ids[2]));
        assert_eq!(graph.affinity_between(ids[0], ids[1]).unwrap().net(), 0.0);
    }

    #[test]
    fn test_from_family_seeded_rounds_to_two_decimals() {
        let members = vec![
            Character::new("Alice", "Harlow"),
            Character::new("Bram", "Harlow"),
        ];
        let ids: Vec<CharacterId> = members.iter().map(|m| m.id).collect();
        let family = Family::new("Harlow", members, vec![(0, 1)]).unwrap();

        let mut rng = rand::thread_rng();
        let graph = SocialGraph::from_family_seeded(&family, &mut rng);

        let pair = graph.affinity_between(ids[0], ids[1]).unwrap();
        for value in [pair.positive, pair.negative] {
            assert!((0.0..=1.0).contains(&value));
            assert!((value * 100.0 - (value * 100.0).round()).abs() < 0.001);
        }
    }
}
