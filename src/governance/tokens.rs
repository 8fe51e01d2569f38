//! Governance currency and derived balances
//!
//! Balances are never persisted as a source of truth; they are a pure fold
//! over grant/vote/trade events. Non-negativity holds by construction:
//! any event that would overdraw a balance is rejected before it is
//! appended to the log.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::ActorId;

/// The league's token types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Token {
    /// Spent to cast weighted votes
    Vote,
    /// General-purpose trading currency
    Coin,
}

/// Derived per-actor balances
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Balances {
    accounts: BTreeMap<ActorId, BTreeMap<Token, i64>>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, actor: ActorId, token: Token) -> i64 {
        self.accounts
            .get(&actor)
            .and_then(|tokens| tokens.get(&token))
            .copied()
            .unwrap_or(0)
    }

    pub fn credit(&mut self, actor: ActorId, token: Token, amount: i64) {
        *self
            .accounts
            .entry(actor)
            .or_default()
            .entry(token)
            .or_insert(0) += amount;
    }

    /// Debit without a balance check
    ///
    /// Callers verify sufficiency first; the projector rejects the event
    /// before this point if funds are short.
    pub fn debit(&mut self, actor: ActorId, token: Token, amount: i64) {
        *self
            .accounts
            .entry(actor)
            .or_default()
            .entry(token)
            .or_insert(0) -= amount;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ActorId, &BTreeMap<Token, i64>)> {
        self.accounts.iter()
    }

    /// True when every balance of every actor is non-negative
    pub fn all_non_negative(&self) -> bool {
        self.accounts
            .values()
            .all(|tokens| tokens.values().all(|&v| v >= 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_account_is_zero() {
        let balances = Balances::new();
        assert_eq!(balances.balance(ActorId::new(), Token::Coin), 0);
    }

    #[test]
    fn test_credit_then_debit() {
        let mut balances = Balances::new();
        let actor = ActorId::new();
        balances.credit(actor, Token::Vote, 10);
        balances.debit(actor, Token::Vote, 4);
        assert_eq!(balances.balance(actor, Token::Vote), 6);
        // Other token untouched
        assert_eq!(balances.balance(actor, Token::Coin), 0);
    }

    #[test]
    fn test_non_negativity_check() {
        let mut balances = Balances::new();
        let actor = ActorId::new();
        balances.credit(actor, Token::Coin, 5);
        assert!(balances.all_non_negative());
        balances.debit(actor, Token::Coin, 9);
        assert!(!balances.all_non_negative());
    }
}
