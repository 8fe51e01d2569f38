//! The append-only governance event log
//!
//! The log is the single source of truth for rules and token balances.
//! Appends are linearized through the `&mut` receiver: the validity check
//! against the current projection and the append itself are one atomic
//! step, so two trades that would jointly overdraw a balance can never
//! both land. Accepted events are never edited, removed, or reordered.

use tracing::{debug, info};

use crate::core::types::EventSeq;
use crate::governance::event::{GovernanceEvent, SequencedEvent};
use crate::governance::projector::{GovernanceError, Projection};
use crate::rules::RuleSpace;

/// Append-only event log with a memoized projection
///
/// The cached projection always equals a replay of the full log; it is an
/// optimization only and is re-derivable from the events alone.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: Vec<SequencedEvent>,
    projection: Projection,
}

impl EventLog {
    pub fn new(space: &RuleSpace) -> Self {
        Self {
            events: Vec::new(),
            projection: Projection::genesis(space),
        }
    }

    /// Append an event, or reject it with no state change
    ///
    /// The event is validated against the projection at the current head.
    /// On success the memoized projection advances incrementally and the
    /// event receives the next sequence position. On rejection nothing is
    /// recorded; there is no partial-apply state.
    pub fn append(
        &mut self,
        event: GovernanceEvent,
        timestamp: u64,
    ) -> Result<EventSeq, GovernanceError> {
        let mut next = self.projection.clone();
        if let Err(err) = next.apply(&event) {
            debug!(?event, %err, "event rejected");
            return Err(err);
        }

        let seq = EventSeq(self.events.len() as u64);
        self.events.push(SequencedEvent {
            seq,
            timestamp,
            event,
        });
        self.projection = next;
        info!(?seq, "event appended");
        Ok(seq)
    }

    pub fn events(&self) -> &[SequencedEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The memoized projection of the full log
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// The position the next accepted event will occupy
    pub fn head(&self) -> EventSeq {
        EventSeq(self.events.len() as u64)
    }

    /// Pure replay from genesis of every event before position `upto`
    ///
    /// `head()` reproduces the memoized projection; earlier positions
    /// answer "what was the state as of position N".
    pub fn project_prefix(&self, upto: EventSeq) -> Result<Projection, GovernanceError> {
        let end = (upto.0 as usize).min(self.events.len());
        Projection::replay(self.projection.space(), &self.events[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ActorId;
    use crate::governance::tokens::Token;

    #[test]
    fn test_append_assigns_sequential_positions() {
        let space = RuleSpace::standard();
        let mut log = EventLog::new(&space);
        let actor = ActorId::new();

        let s0 = log
            .append(
                GovernanceEvent::Grant {
                    to: actor,
                    token: Token::Coin,
                    amount: 5,
                },
                0,
            )
            .unwrap();
        let s1 = log
            .append(
                GovernanceEvent::Grant {
                    to: actor,
                    token: Token::Coin,
                    amount: 5,
                },
                1,
            )
            .unwrap();

        assert_eq!(s0, EventSeq(0));
        assert_eq!(s1, EventSeq(1));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_rejected_event_not_recorded() {
        let space = RuleSpace::standard();
        let mut log = EventLog::new(&space);
        let (a, b) = (ActorId::new(), ActorId::new());

        let err = log
            .append(
                GovernanceEvent::Trade {
                    from: a,
                    to: b,
                    token: Token::Coin,
                    amount: 1,
                },
                0,
            )
            .unwrap_err();

        assert!(matches!(err, GovernanceError::InsufficientBalance { .. }));
        assert!(log.is_empty());
        assert_eq!(log.projection().balances.balance(b, Token::Coin), 0);
    }

    #[test]
    fn test_memoized_projection_matches_replay() {
        let space = RuleSpace::standard();
        let mut log = EventLog::new(&space);
        let (a, b) = (ActorId::new(), ActorId::new());

        log.append(
            GovernanceEvent::Grant {
                to: a,
                token: Token::Coin,
                amount: 10,
            },
            0,
        )
        .unwrap();
        log.append(
            GovernanceEvent::Trade {
                from: a,
                to: b,
                token: Token::Coin,
                amount: 4,
            },
            1,
        )
        .unwrap();

        let replayed = log.project_prefix(log.head()).unwrap();
        assert_eq!(&replayed, log.projection());
    }

    #[test]
    fn test_prefix_projection_sees_earlier_state() {
        let space = RuleSpace::standard();
        let mut log = EventLog::new(&space);
        let (a, b) = (ActorId::new(), ActorId::new());

        log.append(
            GovernanceEvent::Grant {
                to: a,
                token: Token::Coin,
                amount: 10,
            },
            0,
        )
        .unwrap();
        log.append(
            GovernanceEvent::Trade {
                from: a,
                to: b,
                token: Token::Coin,
                amount: 4,
            },
            1,
        )
        .unwrap();

        let before_trade = log.project_prefix(EventSeq(1)).unwrap();
        assert_eq!(before_trade.balances.balance(a, Token::Coin), 10);
        assert_eq!(before_trade.balances.balance(b, Token::Coin), 0);
    }
}
