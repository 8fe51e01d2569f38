//! Append-only governance: event log, projection, token balances
//!
//! Current rules and balances are never stored as mutable state; they are
//! derived by replaying the event log, and the log is the only
//! serialization point in the system.

pub mod event;
pub mod log;
pub mod projector;
pub mod tokens;

pub use event::{GovernanceEvent, SequencedEvent, VoteChoice};
pub use log::EventLog;
pub use projector::{GovernanceError, Projection, ProposalStatus, ProposalView};
pub use tokens::{Balances, Token};
