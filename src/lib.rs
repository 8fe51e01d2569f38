//! Hardwood - vote-governed basketball league simulation

pub mod core;
pub mod governance;
pub mod rules;
pub mod sim;
pub mod team;
