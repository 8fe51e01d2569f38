//! Governance events: the immutable acts the log is made of
//!
//! Events are never edited or deleted once appended. The structured
//! `RuleChange` inside `Propose`/`Amend` arrives from the external
//! free-text interpreter already structured, and is still validated against
//! the rule space before it can affect anything.

use serde::{Deserialize, Serialize};

use crate::core::types::{ActorId, EventSeq, ProposalId};
use crate::governance::tokens::Token;
use crate::rules::RuleChange;

/// A vote on an open proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteChoice {
    Yes,
    No,
}

/// One governance act
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GovernanceEvent {
    /// Open a new proposal carrying a structured rule-change draft
    Propose {
        proposal: ProposalId,
        actor: ActorId,
        change: RuleChange,
        description: String,
    },
    /// Replace an open proposal's draft
    Amend {
        proposal: ProposalId,
        actor: ActorId,
        change: RuleChange,
    },
    /// Cast a weighted vote; the weight is debited from the actor's
    /// Vote-token balance at append time
    Vote {
        proposal: ProposalId,
        actor: ActorId,
        choice: VoteChoice,
        weight: i64,
    },
    /// Close voting at the external deadline; the projector derives
    /// passed/failed from the recorded votes
    Tally { proposal: ProposalId },
    /// Apply a passed proposal's change to the live ruleset
    Enact { proposal: ProposalId },
    /// Revert an enacted proposal's parameters to their pre-enactment values
    Repeal { proposal: ProposalId },
    /// League-issued token credit (stipends, rewards)
    Grant {
        to: ActorId,
        token: Token,
        amount: i64,
    },
    /// Token transfer between actors
    Trade {
        from: ActorId,
        to: ActorId,
        token: Token,
        amount: i64,
    },
}

/// An event at its position in the total order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequencedEvent {
    pub seq: EventSeq,
    /// Wall-clock metadata supplied by the caller; ordering authority is
    /// always `seq`, never this field
    pub timestamp: u64,
    pub event: GovernanceEvent,
}
