//! Families - the output contract of the external family generator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Character, CharacterId};

/// Errors raised while assembling a family from generator output.
#[derive(Debug, Error)]
pub enum FamilyError {
    /// A solver edge referenced a member index outside the family.
    #[error("edge ({0}, {1}) references a member index outside a family of {2}")]
    EdgeOutOfRange(usize, usize, usize),
}

/// A generated family: an ordered set of members plus the relationship edges
/// the graph solver selected, as member-index pairs.
///
/// The solver and the character generator themselves are external
/// collaborators; this type only carries what they produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Family {
    pub surname: String,
    pub members: Vec<Character>,
    /// Solver-selected edges between members, by index into `members`.
    pub edges: Vec<(usize, usize)>,
}

impl Family {
    /// Create a family from generator output, validating that every edge
    /// references a real member.
    pub fn new(
        surname: impl Into<String>,
        members: Vec<Character>,
        edges: Vec<(usize, usize)>,
    ) -> Result<Self, FamilyError> {
        let size = members.len();
        for &(a, b) in &edges {
            if a >= size || b >= size {
                return Err(FamilyError::EdgeOutOfRange(a, b, size));
            }
        }

        Ok(Self {
            surname: surname.into(),
            members,
            edges,
        })
    }

    /// Combine two families into one, the way the game merges the two
    /// generated households. The second family's edge indices are offset past
    /// the first family's members, and `cross_edges` (indexed into the
    /// combined member list) link the two sides.
    pub fn combine(
        one: Family,
        two: Family,
        cross_edges: Vec<(usize, usize)>,
    ) -> Result<Self, FamilyError> {
        let offset = one.members.len();
        let surname = format!("{} and {}", one.surname, two.surname);

        let mut members = one.members;
        members.extend(two.members);

        let mut edges = one.edges;
        edges.extend(two.edges.into_iter().map(|(a, b)| (a + offset, b + offset)));
        edges.extend(cross_edges);

        Self::new(surname, members, edges)
    }

    /// The ID of the member at `index`, if there is one.
    pub fn member_id(&self, index: usize) -> Option<CharacterId> {
        self.members.get(index).map(|member| member.id)
    }

    /// Number of members in the family.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the family has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn household(surname: &str, names: &[&str], edges: Vec<(usize, usize)>) -> Family {
        let members = names
            .iter()
            .map(|name| Character::new(*name, surname))
            .collect();
        Family::new(surname, members, edges).unwrap()
    }

    #[test]
    fn test_family_creation() {
        let family = household("Harlow", &["Alice", "Bram", "Cleo"], vec![(0, 1), (1, 2)]);
        assert_eq!(family.len(), 3);
        assert_eq!(family.edges.len(), 2);
        assert!(family.member_id(0).is_some());
        assert!(family.member_id(3).is_none());
    }

    #[test]
    fn test_edge_out_of_range() {
        let members = vec![Character::new("Alice", "Harlow")];
        let result = Family::new("Harlow", members, vec![(0, 1)]);
        assert!(matches!(result, Err(FamilyError::EdgeOutOfRange(0, 1, 1))));
    }

    #[test]
    fn test_combine_offsets_second_family() {
        let one = household("Harlow", &["Alice", "Bram"], vec![(0, 1)]);
        let two = household("Vane", &["Dara", "Edmund"], vec![(0, 1)]);

        let combined = Family::combine(one, two, vec![(1, 2)]).unwrap();

        assert_eq!(combined.surname, "Harlow and Vane");
        assert_eq!(combined.len(), 4);
        // (0,1) from family one, (2,3) offset from family two, (1,2) cross.
        assert_eq!(combined.edges, vec![(0, 1), (2, 3), (1, 2)]);
    }

    #[test]
    fn test_combine_rejects_bad_cross_edge() {
        let one = household("Harlow", &["Alice"], vec![]);
        let two = household("Vane", &["Dara"], vec![]);

        let result = Family::combine(one, two, vec![(0, 5)]);
        assert!(result.is_err());
    }
}
