//! Ledger change notifications
//!
//! Every successful mutation emits a structured notification to an event
//! sink, synchronously and in the same order the mutations are applied.
//! Failed operations emit nothing.

use crate::token::account::AccountId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};

/// Transfer notification (emitted when tokens move between accounts)
///
/// `from` is `None` exactly once, for the creation notification that
/// credits the total supply to the initial owner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub from: Option<AccountId>,
    pub to: AccountId,
    pub amount: u128,
    pub timestamp: DateTime<Utc>,
}

impl TransferEvent {
    pub fn new(from: Option<AccountId>, to: AccountId, amount: u128) -> Self {
        Self {
            from,
            to,
            amount,
            timestamp: Utc::now(),
        }
    }
}

/// Approval notification (emitted when an allowance changes)
///
/// Carries the new allowance value, not a delta: `approve` replaces the
/// previous value and a delegated spend reports what remains.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApprovalEvent {
    pub owner: AccountId,
    pub spender: AccountId,
    pub amount: u128,
    pub timestamp: DateTime<Utc>,
}

impl ApprovalEvent {
    pub fn new(owner: AccountId, spender: AccountId, amount: u128) -> Self {
        Self {
            owner,
            spender,
            amount,
            timestamp: Utc::now(),
        }
    }
}

/// A notification as delivered to an event sink
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEvent {
    Transfer(TransferEvent),
    Approval(ApprovalEvent),
}

/// External observer of ledger mutations.
///
/// Called synchronously after each successful operation, while the ledger
/// still holds its write boundary, so the sink observes notifications in
/// the exact serialization order of mutations.
pub trait EventSink: Send {
    fn record(&mut self, event: LedgerEvent);
}

/// In-memory sink recording notifications in delivery order
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    events: Vec<LedgerEvent>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded notifications, oldest first
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for MemorySink {
    fn record(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }
}

/// A shared sink: the ledger owns one handle while an observer keeps
/// another to read back what was recorded.
impl<S: EventSink> EventSink for Arc<Mutex<S>> {
    fn record(&mut self, event: LedgerEvent) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(event);
    }
}
