//! The narrative session: which card is live, and what a choice does.
//!
//! A session is a single logical actor. All mutation of the graph, player
//! stats, and sequencing state happens synchronously inside [`choose`],
//! and a choice's effects are fully applied before the next card is
//! selected, since selection may depend on the just-mutated state.
//!
//! [`choose`]: NarrativeSession::choose

use thiserror::Error;

use family_rules::{CharacterId, PlayerStats, SessionConfig};

use crate::binder::bind_library;
use crate::cards::{Card, CardId, CardLibrary, ChoiceSide};
use crate::events::{EventBus, ListenerId, SessionEvent};
use crate::preconditions::{EvalContext, EvalError};
use crate::social_graph::SocialGraph;

/// Errors raised while advancing a session. All of them are fatal
/// content-authoring errors; none are recoverable within the session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no card is currently presented")]
    NoActiveCard,

    /// A choice named a followup template that is not in the library. This
    /// must surface; it never silently falls back to sequential selection.
    #[error("choice references missing followup template {key}")]
    MissingFollowupTemplate { key: String },

    #[error("edge modifier references role {token} not bound in card template {template_id}")]
    UnboundRole { token: String, template_id: CardId },

    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// How the next card is picked from the pending pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Pending cards in order, one per advance.
    #[default]
    Sequential,
    /// The next pending card whose preconditions all hold against the
    /// current graph and player state.
    PreconditionFiltered,
}

/// Result of presenting the next card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// A card was selected; read it with
    /// [`NarrativeSession::current_card`].
    Presented,
    /// The pending pool ran out. The session holds no current card; what
    /// happens next is the caller's decision.
    Exhausted,
}

/// One playthrough: the social graph, the player's state, and the sequencing
/// of bound cards.
///
/// Sessions are not shared: one session owns its graph and stats outright,
/// and an implementation exposing this engine as a service must serialize
/// all operations per session.
#[derive(Debug)]
pub struct NarrativeSession {
    config: SessionConfig,
    graph: SocialGraph,
    stats: PlayerStats,
    compatibility: i32,
    week: u32,
    library: CardLibrary,
    pending: Vec<Card>,
    next_index: usize,
    current: Option<Card>,
    policy: SelectionPolicy,
    events: EventBus,
}

impl NarrativeSession {
    /// Create a session. The pending pool is generated up front: every
    /// library template bound against `pool` (the ordered candidates,
    /// excluding the player) with `player` on the reserved role.
    pub fn new(
        config: SessionConfig,
        graph: SocialGraph,
        player: CharacterId,
        pool: &[CharacterId],
        library: CardLibrary,
        policy: SelectionPolicy,
    ) -> Self {
        let pending = bind_library(&library, pool, player, &graph);
        tracing::debug!(cards = pending.len(), "session card pool generated");

        Self {
            stats: config.stats.starting_stats(),
            compatibility: config.compatibility.start,
            config,
            graph,
            week: 1,
            library,
            pending,
            next_index: 0,
            current: None,
            policy,
            events: EventBus::new(),
        }
    }

    /// Present the first card.
    pub fn begin(&mut self) -> Result<AdvanceOutcome, SessionError> {
        self.select_next()
    }

    /// Commit to one of the current card's choices: apply its stat, edge,
    /// and compatibility effects, advance the week, and present the next
    /// card (the choice's followup with the same role bindings, or the
    /// policy's pick from the pending pool).
    pub fn choose(&mut self, side: ChoiceSide) -> Result<AdvanceOutcome, SessionError> {
        let card = self.current.take().ok_or(SessionError::NoActiveCard)?;
        let choice = card.choice(side);

        for modifier in &choice.stat_modifiers {
            let range = *self.config.stats.range(modifier.stat);
            self.stats.apply(modifier.stat, modifier.value, &range);
        }

        // Role tokens resolve through the card the choice was made on, not
        // the card about to be presented.
        for modifier in &choice.edge_modifiers {
            let one = card.role_character(&modifier.role_one).ok_or_else(|| {
                SessionError::UnboundRole {
                    token: modifier.role_one.clone(),
                    template_id: card.template_id(),
                }
            })?;
            let two = card.role_character(&modifier.role_two).ok_or_else(|| {
                SessionError::UnboundRole {
                    token: modifier.role_two.clone(),
                    template_id: card.template_id(),
                }
            })?;
            self.graph.apply_edge_modifier(one, two, modifier);
        }

        self.compatibility = self
            .config
            .compatibility
            .range
            .clamp(self.compatibility + choice.compatibility_modifier);

        self.week += 1;
        tracing::debug!(week = self.week, "choice applied");
        self.events.emit(&SessionEvent::ChoiceMade { choice });

        match &choice.followup {
            Some(key) => {
                let template = self.library.template(key).cloned().ok_or_else(|| {
                    SessionError::MissingFollowupTemplate { key: key.clone() }
                })?;
                // Same cast, new scene.
                let next = Card::new(template, card.role_map().clone(), &self.graph);
                self.present(next);
                Ok(AdvanceOutcome::Presented)
            }
            None => self.select_next(),
        }
    }

    /// Announce a hover over one of the current card's choices. Emits the
    /// event only; no state changes.
    pub fn hover(&mut self, side: ChoiceSide, entering: bool) -> Result<(), SessionError> {
        let choice = self
            .current
            .as_ref()
            .ok_or(SessionError::NoActiveCard)?
            .choice(side);
        self.events.emit(&SessionEvent::ChoiceHover {
            choice,
            entering,
            side,
        });
        Ok(())
    }

    /// Register a session event listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&SessionEvent<'_>) + 'static) -> ListenerId {
        self.events.subscribe(listener)
    }

    /// Remove a session event listener.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    /// The card currently presented, if any.
    pub fn current_card(&self) -> Option<&Card> {
        self.current.as_ref()
    }

    /// The current week number.
    pub fn week(&self) -> u32 {
        self.week
    }

    /// The player's current stats.
    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    /// The current family-compatibility counter.
    pub fn compatibility(&self) -> i32 {
        self.compatibility
    }

    /// The session's social graph.
    pub fn graph(&self) -> &SocialGraph {
        &self.graph
    }

    fn select_next(&mut self) -> Result<AdvanceOutcome, SessionError> {
        let mut index = self.next_index;
        let selected = loop {
            if index >= self.pending.len() {
                break None;
            }
            match self.policy {
                SelectionPolicy::Sequential => break Some(index),
                SelectionPolicy::PreconditionFiltered => {
                    if self.passes_preconditions(&self.pending[index])? {
                        break Some(index);
                    }
                    index += 1;
                }
            }
        };

        match selected {
            Some(found) => {
                self.next_index = found + 1;
                let card = self.pending[found].clone();
                self.present(card);
                Ok(AdvanceOutcome::Presented)
            }
            None => {
                tracing::debug!("pending card pool exhausted");
                self.current = None;
                Ok(AdvanceOutcome::Exhausted)
            }
        }
    }

    fn passes_preconditions(&self, card: &Card) -> Result<bool, EvalError> {
        let ctx = EvalContext {
            card,
            graph: &self.graph,
            stats: &self.stats,
            compatibility: self.compatibility,
        };
        for spec in &card.template().preconditions {
            if !spec.to_expr().evaluate(&ctx)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn present(&mut self, card: Card) {
        tracing::debug!(template = %card.template_id(), week = self.week, "card selected");
        self.events.emit(&SessionEvent::CardSelected {
            card: &card,
            week: self.week,
        });
        self.current = Some(card);
    }
}
