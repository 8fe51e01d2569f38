//! Pure projection: replaying the event log into read models
//!
//! A `Projection` is a fold over the log from genesis: current ruleset,
//! current balances, per-proposal status. It is re-derivable at any point
//! from any prefix of the log, which is what makes "what was the ruleset
//! as of round N" answerable and auditable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::core::types::{ActorId, ProposalId};
use crate::governance::event::{GovernanceEvent, SequencedEvent, VoteChoice};
use crate::governance::tokens::{Balances, Token};
use crate::rules::{RuleChange, RuleError, RuleSet, RuleSpace};

/// Why an event was rejected at the append boundary
///
/// A rejected event is never appended; there is no partial-apply state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GovernanceError {
    #[error("unknown proposal {0:?}")]
    UnknownProposal(ProposalId),

    #[error("proposal {0:?} already exists")]
    DuplicateProposal(ProposalId),

    #[error("proposal {0:?} is no longer open")]
    ProposalClosed(ProposalId),

    #[error("proposal {0:?} has not passed")]
    NotPassed(ProposalId),

    #[error("proposal {0:?} is not enacted")]
    NotEnacted(ProposalId),

    #[error("actor {actor:?} already voted on proposal {proposal:?}")]
    AlreadyVoted {
        proposal: ProposalId,
        actor: ActorId,
    },

    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(i64),

    #[error(
        "insufficient {token:?} balance for {actor:?}: have {have}, need {need}"
    )]
    InsufficientBalance {
        actor: ActorId,
        token: Token,
        have: i64,
        need: i64,
    },

    #[error("rule validation failed: {0}")]
    Rule(#[from] RuleError),
}

/// Lifecycle of a proposal; transitions only move forward
///
/// `open -> {passed, failed} -> enacted | repealed`. `failed` and
/// `repealed` are terminal; re-proposing requires a new identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    Open,
    Passed,
    Failed,
    Enacted,
    Repealed,
}

/// Derived view of one proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalView {
    pub proposer: ActorId,
    pub description: String,
    /// Current draft (latest amendment wins)
    pub change: RuleChange,
    pub status: ProposalStatus,
    pub yes_weight: i64,
    pub no_weight: i64,
    /// Actors who have voted; one vote each
    pub voters: Vec<ActorId>,
    /// Values the touched parameters held immediately before enactment,
    /// captured at enact time so a repeal restores them exactly
    pub prior_values: Option<RuleChange>,
}

/// Read models derived from the log: ruleset, balances, proposal statuses
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    space: RuleSpace,
    pub ruleset: RuleSet,
    pub balances: Balances,
    pub proposals: BTreeMap<ProposalId, ProposalView>,
}

impl Projection {
    /// The state before any event: default ruleset, empty balances
    pub fn genesis(space: &RuleSpace) -> Self {
        Self {
            space: space.clone(),
            ruleset: space.default_ruleset(),
            balances: Balances::new(),
            proposals: BTreeMap::new(),
        }
    }

    /// Fold an entire log prefix from genesis
    pub fn replay<'a>(
        space: &RuleSpace,
        events: impl IntoIterator<Item = &'a SequencedEvent>,
    ) -> Result<Self, GovernanceError> {
        let mut projection = Self::genesis(space);
        for sequenced in events {
            projection.apply(&sequenced.event)?;
        }
        Ok(projection)
    }

    /// The rule space this projection validates against
    pub fn space(&self) -> &RuleSpace {
        &self.space
    }

    pub fn proposal_status(&self, id: ProposalId) -> Option<ProposalStatus> {
        self.proposals.get(&id).map(|p| p.status)
    }

    fn proposal_mut(
        &mut self,
        id: ProposalId,
    ) -> Result<&mut ProposalView, GovernanceError> {
        self.proposals
            .get_mut(&id)
            .ok_or(GovernanceError::UnknownProposal(id))
    }

    fn require_positive(amount: i64) -> Result<(), GovernanceError> {
        if amount <= 0 {
            return Err(GovernanceError::NonPositiveAmount(amount));
        }
        Ok(())
    }

    fn require_funds(
        &self,
        actor: ActorId,
        token: Token,
        need: i64,
    ) -> Result<(), GovernanceError> {
        let have = self.balances.balance(actor, token);
        if have < need {
            return Err(GovernanceError::InsufficientBalance {
                actor,
                token,
                have,
                need,
            });
        }
        Ok(())
    }

    /// One fold step
    ///
    /// Either fully applies the event or returns an error leaving `self`
    /// untouched for every rejection path that matters to callers: all
    /// checks precede the first mutation.
    pub fn apply(&mut self, event: &GovernanceEvent) -> Result<(), GovernanceError> {
        match event {
            GovernanceEvent::Propose {
                proposal,
                actor,
                change,
                description,
            } => {
                if self.proposals.contains_key(proposal) {
                    return Err(GovernanceError::DuplicateProposal(*proposal));
                }
                // Drafts must satisfy the schema before they can sit in
                // the log as an open proposal
                self.space.validate(&self.ruleset, change)?;

                self.proposals.insert(
                    *proposal,
                    ProposalView {
                        proposer: *actor,
                        description: description.clone(),
                        change: change.clone(),
                        status: ProposalStatus::Open,
                        yes_weight: 0,
                        no_weight: 0,
                        voters: Vec::new(),
                        prior_values: None,
                    },
                );
                Ok(())
            }

            GovernanceEvent::Amend {
                proposal, change, ..
            } => {
                self.space.validate(&self.ruleset, change)?;
                let view = self.proposal_mut(*proposal)?;
                if view.status != ProposalStatus::Open {
                    return Err(GovernanceError::ProposalClosed(*proposal));
                }
                view.change = change.clone();
                Ok(())
            }

            GovernanceEvent::Vote {
                proposal,
                actor,
                choice,
                weight,
            } => {
                Self::require_positive(*weight)?;
                {
                    let view = self
                        .proposals
                        .get(proposal)
                        .ok_or(GovernanceError::UnknownProposal(*proposal))?;
                    if view.status != ProposalStatus::Open {
                        return Err(GovernanceError::ProposalClosed(*proposal));
                    }
                    if view.voters.contains(actor) {
                        return Err(GovernanceError::AlreadyVoted {
                            proposal: *proposal,
                            actor: *actor,
                        });
                    }
                }
                // Weighted votes are funded: the weight is spent
                self.require_funds(*actor, Token::Vote, *weight)?;

                self.balances.debit(*actor, Token::Vote, *weight);
                let view = self.proposal_mut(*proposal)?;
                match choice {
                    VoteChoice::Yes => view.yes_weight += weight,
                    VoteChoice::No => view.no_weight += weight,
                }
                view.voters.push(*actor);
                Ok(())
            }

            GovernanceEvent::Tally { proposal } => {
                let quorum = self.ruleset.int("vote_quorum").unwrap_or(1);
                let majority = self.ruleset.float("vote_majority").unwrap_or(0.5);

                let view = self.proposal_mut(*proposal)?;
                if view.status != ProposalStatus::Open {
                    return Err(GovernanceError::ProposalClosed(*proposal));
                }

                // Quorum over total weight, then the yes share must meet
                // the majority threshold. Yes must also beat no outright:
                // a tie fails at 0.5, while a unanimous vote can still
                // clear a threshold of 1.0.
                let total = view.yes_weight + view.no_weight;
                let passed = total >= quorum
                    && view.yes_weight > view.no_weight
                    && (view.yes_weight as f64) >= (total as f64) * majority;
                view.status = if passed {
                    ProposalStatus::Passed
                } else {
                    ProposalStatus::Failed
                };
                debug!(?proposal, yes = view.yes_weight, no = view.no_weight, passed, "tallied");
                Ok(())
            }

            GovernanceEvent::Enact { proposal } => {
                let view = self
                    .proposals
                    .get(proposal)
                    .ok_or(GovernanceError::UnknownProposal(*proposal))?;
                if view.status != ProposalStatus::Passed {
                    return Err(GovernanceError::NotPassed(*proposal));
                }
                let change = view.change.clone();

                // Capture the outgoing values of exactly the parameters
                // this change touches; a later repeal restores these, not
                // the hard defaults
                let mut prior = RuleChange::new();
                for name in change.parameters() {
                    if let Some(value) = self.ruleset.get(name) {
                        prior.set(name, value.clone());
                    }
                }

                // Overlapping enactments resolve last-writer-wins by
                // event order: this validation runs against the ruleset
                // as of this log position
                let next = self.space.validate(&self.ruleset, &change)?;
                self.ruleset = next;

                let view = self.proposal_mut(*proposal)?;
                view.status = ProposalStatus::Enacted;
                view.prior_values = Some(prior);
                Ok(())
            }

            GovernanceEvent::Repeal { proposal } => {
                let view = self
                    .proposals
                    .get(proposal)
                    .ok_or(GovernanceError::UnknownProposal(*proposal))?;
                if view.status != ProposalStatus::Enacted {
                    return Err(GovernanceError::NotEnacted(*proposal));
                }
                let prior = view
                    .prior_values
                    .clone()
                    .ok_or(GovernanceError::NotEnacted(*proposal))?;

                let next = self.space.validate(&self.ruleset, &prior)?;
                self.ruleset = next;

                let view = self.proposal_mut(*proposal)?;
                view.status = ProposalStatus::Repealed;
                Ok(())
            }

            GovernanceEvent::Grant { to, token, amount } => {
                Self::require_positive(*amount)?;
                self.balances.credit(*to, *token, *amount);
                Ok(())
            }

            GovernanceEvent::Trade {
                from,
                to,
                token,
                amount,
            } => {
                Self::require_positive(*amount)?;
                self.require_funds(*from, *token, *amount)?;
                self.balances.debit(*from, *token, *amount);
                self.balances.credit(*to, *token, *amount);
                Ok(())
            }
        }
    }
}
