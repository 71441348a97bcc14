//! Role binding: turning a card template into every valid bound card.
//!
//! For a template with `k` roles and a candidate pool of `n` characters the
//! binder produces C(n, k) cards, so callers are expected to keep `n` and
//! `k` small; no capping is imposed here.

use std::collections::HashMap;
use std::sync::Arc;

use family_rules::CharacterId;

use crate::cards::{Card, CardLibrary, CardTemplate, PLAYER_ROLE};
use crate::social_graph::SocialGraph;

/// Bind a template against an ordered candidate pool.
///
/// Every combination of distinct characters from `pool` (chosen without
/// repetition, assigned to the template's role tokens in one fixed order per
/// combination) yields one card, with `player` additionally bound to the
/// reserved [`PLAYER_ROLE`] token. A template with no roles yields exactly
/// one player-only card; a pool smaller than the role count yields none.
///
/// The pool is expected to exclude the player character.
pub fn bind_template(
    template: &Arc<CardTemplate>,
    pool: &[CharacterId],
    player: CharacterId,
    graph: &SocialGraph,
) -> Vec<Card> {
    let k = template.roles.len();
    let mut combinations = Vec::new();
    let mut current = Vec::with_capacity(k);
    choose(pool, k, 0, &mut current, &mut combinations);

    combinations
        .into_iter()
        .map(|combination| {
            let mut role_map = HashMap::with_capacity(k + 1);
            for (token, id) in template.roles.iter().zip(combination) {
                role_map.insert(token.clone(), id);
            }
            role_map.insert(PLAYER_ROLE.to_string(), player);
            Card::new(Arc::clone(template), role_map, graph)
        })
        .collect()
}

/// Bind every template in a library, in sorted-key order.
pub fn bind_library(
    library: &CardLibrary,
    pool: &[CharacterId],
    player: CharacterId,
    graph: &SocialGraph,
) -> Vec<Card> {
    library
        .templates()
        .flat_map(|(_, template)| bind_template(template, pool, player, graph))
        .collect()
}

/// Recursive combination generation. At each depth the branch is abandoned
/// once the remaining pool cannot fill the remaining slots.
fn choose(
    pool: &[CharacterId],
    k: usize,
    start: usize,
    current: &mut Vec<CharacterId>,
    out: &mut Vec<Vec<CharacterId>>,
) {
    if current.len() == k {
        out.push(current.clone());
        return;
    }

    let remaining = k - current.len();
    for i in start..pool.len() {
        if pool.len() - i < remaining {
            break;
        }
        current.push(pool[i]);
        choose(pool, k, i + 1, current, out);
        current.pop();
    }
}
