//! Blokkypay: a fungible-token accounting ledger
//!
//! This crate implements the Blokkypay token (BPT) as an in-process
//! state machine:
//! - Fixed total supply, credited entirely to an initial owner
//! - Balances over an open set of opaque account identities
//! - Delegated spending via replace-semantics allowances
//! - Atomic, all-or-nothing mutations with two precondition errors
//! - Synchronous change notifications to a pluggable event sink
//! - A thread-safe single-writer handle for concurrent submission
//!
//! Consensus, persistence and networking are out of scope; the caller
//! identity on every mutating operation comes from an external identity
//! source and is trusted as-is.
//!
//! # Example
//!
//! ```rust
//! use blokkypay::{AccountId, Ledger, MemorySink, TokenMetadata};
//!
//! let owner = AccountId::from("owner");
//! let other = AccountId::from("other");
//!
//! let ledger = Ledger::new(
//!     TokenMetadata::new("Blokkypay", "BPT", 18),
//!     10,
//!     owner.clone(),
//!     Box::new(MemorySink::new()),
//! );
//!
//! ledger.transfer(&owner, &other, 2).unwrap();
//! assert_eq!(ledger.balance_of(&owner), 8);
//!
//! ledger.approve(&owner, &other, 5);
//! ledger.transfer_from(&other, &owner, &other, 3).unwrap();
//! assert_eq!(ledger.allowance(&owner, &other), 2);
//! ```

pub mod token;

// Re-export commonly used types
pub use token::{
    AccountId, ApprovalEvent, EventSink, Ledger, LedgerEvent, MemorySink, Token, TokenError,
    TokenMetadata, TransferEvent,
};
