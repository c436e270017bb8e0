//! ERC-20 style fungible token ledger
//!
//! Provides a fixed-supply fungible token with:
//! - Balances per account
//! - Allowances for delegated transfers
//! - Transfer, approve and transfer-from operations
//! - Change notifications delivered to an event sink
//!
//! # Example
//!
//! ```
//! use blokkypay::token::{AccountId, Ledger, MemorySink, TokenMetadata};
//!
//! let ledger = Ledger::new(
//!     TokenMetadata::new("Blokkypay", "BPT", 18),
//!     1_000_000,
//!     AccountId::from("treasury"),
//!     Box::new(MemorySink::new()),
//! );
//!
//! let treasury = AccountId::from("treasury");
//! let alice = AccountId::from("alice");
//!
//! ledger.transfer(&treasury, &alice, 1_000).unwrap();
//! assert_eq!(ledger.balance_of(&alice), 1_000);
//! ```

pub mod account;
pub mod events;
pub mod shared;
pub mod token;

pub use account::AccountId;
pub use events::{ApprovalEvent, EventSink, LedgerEvent, MemorySink, TransferEvent};
pub use shared::Ledger;
pub use token::{Token, TokenError, TokenMetadata};
