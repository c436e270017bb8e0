//! Fungible token ledger state machine
//!
//! Tracks ownership of a fixed-supply divisible asset across an open set
//! of accounts, plus the delegated-spending allowances one account grants
//! another. All state changes go through the mutating operations below;
//! each either applies atomically or fails with no effect, and each
//! successful one yields the notification(s) it produced.

use crate::token::account::AccountId;
use crate::token::events::{ApprovalEvent, TransferEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Precondition failures of the mutating operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u128, need: u128 },
    #[error("insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance { have: u128, need: u128 },
}

/// Token metadata (immutable after creation)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Token name (e.g., "Blokkypay")
    pub name: String,
    /// Token symbol (e.g., "BPT")
    pub symbol: String,
    /// Decimal places (usually 18)
    pub decimals: u8,
}

impl TokenMetadata {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }
}

/// An ERC-20 style fungible token ledger
///
/// The aggregate invariant is that the sum of all balances equals the
/// total supply at every observation point: operations redistribute,
/// never create or destroy. Accounts and allowances absent from the maps
/// read as zero; entries are only ever created by a write, never by a
/// query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Token metadata
    metadata: TokenMetadata,
    /// Total supply, fixed at creation
    total_supply: u128,
    /// Balances: account -> amount
    balances: HashMap<AccountId, u128>,
    /// Allowances: owner -> (spender -> amount)
    allowances: HashMap<AccountId, HashMap<AccountId, u128>>,
}

impl Token {
    /// Create a new ledger with the entire supply credited to one owner.
    ///
    /// This is the only point at which balances are created rather than
    /// redistributed. Returns the creation notification: a transfer of
    /// `total_supply` from a null origin to `initial_owner`.
    pub fn new(
        metadata: TokenMetadata,
        total_supply: u128,
        initial_owner: AccountId,
    ) -> (Self, TransferEvent) {
        let mut balances = HashMap::new();
        if total_supply > 0 {
            balances.insert(initial_owner.clone(), total_supply);
        }

        let token = Self {
            metadata,
            total_supply,
            balances,
            allowances: HashMap::new(),
        };

        let event = TransferEvent::new(None, initial_owner, total_supply);
        (token, event)
    }

    // =========================================================================
    // View Functions
    // =========================================================================

    /// Get token name
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Get token symbol
    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    /// Get decimal places
    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    /// Get total supply
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Get balance of an account (zero if never credited)
    pub fn balance_of(&self, account: &AccountId) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Get the amount `spender` may still move out of `owner`'s balance
    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128 {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or(0)
    }

    // =========================================================================
    // Mutating Functions
    // =========================================================================

    /// Transfer tokens from the caller to another account.
    ///
    /// Zero-amount transfers and transfers to the caller itself are
    /// permitted; both still run the balance check and still produce a
    /// notification, like any other transfer.
    pub fn transfer(
        &mut self,
        caller: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<TransferEvent, TokenError> {
        let caller_balance = self.balance_of(caller);
        if caller_balance < amount {
            return Err(TokenError::InsufficientBalance {
                have: caller_balance,
                need: amount,
            });
        }

        self.move_balance(caller, to, amount);

        Ok(TransferEvent::new(Some(caller.clone()), to.clone(), amount))
    }

    /// Set the allowance `spender` may move out of the caller's balance.
    ///
    /// Replace semantics: the new value overwrites any prior allowance
    /// rather than adjusting it. A caller changing an allowance from A to
    /// B therefore races any in-flight spend against the old value — the
    /// spender can consume both A and B across the boundary. Callers who
    /// need to shrink an allowance safely should set it to zero and
    /// verify no spend happened before setting the new value.
    pub fn approve(
        &mut self,
        caller: &AccountId,
        spender: &AccountId,
        amount: u128,
    ) -> ApprovalEvent {
        self.allowances
            .entry(caller.clone())
            .or_default()
            .insert(spender.clone(), amount);

        ApprovalEvent::new(caller.clone(), spender.clone(), amount)
    }

    /// Spend on behalf of `owner`: move `amount` from `owner` to `to`,
    /// consuming that much of the caller's allowance.
    ///
    /// The allowance is checked before the balance, so allowance
    /// exhaustion is reported even when the owner also lacks funds. On
    /// success the allowance decrement, debit and credit are one state
    /// transition, and two notifications are produced: the remaining
    /// allowance, then the transfer itself.
    pub fn transfer_from(
        &mut self,
        caller: &AccountId,
        owner: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(ApprovalEvent, TransferEvent), TokenError> {
        let current_allowance = self.allowance(owner, caller);
        if current_allowance < amount {
            return Err(TokenError::InsufficientAllowance {
                have: current_allowance,
                need: amount,
            });
        }

        let owner_balance = self.balance_of(owner);
        if owner_balance < amount {
            return Err(TokenError::InsufficientBalance {
                have: owner_balance,
                need: amount,
            });
        }

        // All checks passed; the writes below cannot fail.
        let remaining = current_allowance - amount;
        self.allowances
            .entry(owner.clone())
            .or_default()
            .insert(caller.clone(), remaining);

        self.move_balance(owner, to, amount);

        Ok((
            ApprovalEvent::new(owner.clone(), caller.clone(), remaining),
            TransferEvent::new(Some(owner.clone()), to.clone(), amount),
        ))
    }

    /// Debit `from` and credit `to` in one step. Callers must have
    /// already verified `balance_of(from) >= amount`.
    fn move_balance(&mut self, from: &AccountId, to: &AccountId, amount: u128) {
        if amount == 0 || from == to {
            // No-op on balances; avoids materializing zero entries.
            return;
        }

        *self.balances.entry(from.clone()).or_insert(0) -= amount;
        *self.balances.entry(to.clone()).or_insert(0) += amount;
    }
}
