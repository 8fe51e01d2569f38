pub mod config;
pub mod error;
pub mod types;

pub use types::{ActorId, EventSeq, ProposalId, Side};
