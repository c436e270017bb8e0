//! Thread-safe ledger handle
//!
//! The token ledger itself is a plain value; this wrapper gives it the
//! single-writer discipline the accounting rules assume when callers
//! submit operations concurrently. Every mutation runs under one write
//! lock and its notifications reach the event sink before the lock is
//! released, so the sink observes events in the exact order the
//! mutations were serialized.

use crate::token::account::AccountId;
use crate::token::events::{ApprovalEvent, EventSink, LedgerEvent, TransferEvent};
use crate::token::token::{Token, TokenError, TokenMetadata};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A token ledger shared between threads.
///
/// Wraps the [`Token`] state machine behind a read/write lock and wires
/// it to an [`EventSink`]. Reads take the shared lock; the four mutating
/// operations take the exclusive lock. Failed operations touch neither
/// the state nor the sink.
pub struct Ledger {
    state: RwLock<Token>,
    sink: Mutex<Box<dyn EventSink>>,
}

impl Ledger {
    /// Create a ledger with the entire supply credited to `initial_owner`
    /// and deliver the creation notification to `sink`.
    pub fn new(
        metadata: TokenMetadata,
        total_supply: u128,
        initial_owner: AccountId,
        sink: Box<dyn EventSink>,
    ) -> Self {
        let (token, creation) = Token::new(metadata, total_supply, initial_owner);

        log::info!(
            "Ledger created: {} ({}) supply {} -> {}",
            token.name(),
            token.symbol(),
            total_supply,
            creation.to,
        );

        let ledger = Self {
            state: RwLock::new(token),
            sink: Mutex::new(sink),
        };
        ledger.sink().record(LedgerEvent::Transfer(creation));
        ledger
    }

    // Lock helpers. A poisoned lock is safe to recover: every write to
    // the token happens after all precondition checks and cannot panic,
    // so a guard is never dropped with half-applied state.

    fn read(&self) -> RwLockReadGuard<'_, Token> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Token> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn sink(&self) -> MutexGuard<'_, Box<dyn EventSink>> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn name(&self) -> String {
        self.read().name().to_string()
    }

    pub fn symbol(&self) -> String {
        self.read().symbol().to_string()
    }

    pub fn decimals(&self) -> u8 {
        self.read().decimals()
    }

    pub fn total_supply(&self) -> u128 {
        self.read().total_supply()
    }

    pub fn balance_of(&self, account: &AccountId) -> u128 {
        self.read().balance_of(account)
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128 {
        self.read().allowance(owner, spender)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Move `amount` from `caller` to `to`
    pub fn transfer(
        &self,
        caller: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<TransferEvent, TokenError> {
        let mut token = self.write();
        let event = token.transfer(caller, to, amount)?;

        log::debug!("transfer: {} -> {} amount {}", caller, to, amount);
        self.sink().record(LedgerEvent::Transfer(event.clone()));
        Ok(event)
    }

    /// Set the allowance `spender` may move out of `caller`'s balance
    pub fn approve(&self, caller: &AccountId, spender: &AccountId, amount: u128) -> ApprovalEvent {
        let mut token = self.write();
        let event = token.approve(caller, spender, amount);

        log::debug!("approve: {} grants {} up to {}", caller, spender, amount);
        self.sink().record(LedgerEvent::Approval(event.clone()));
        event
    }

    /// Spend `caller`'s allowance from `owner`, moving `amount` to `to`
    pub fn transfer_from(
        &self,
        caller: &AccountId,
        owner: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(ApprovalEvent, TransferEvent), TokenError> {
        let mut token = self.write();
        let (approval, transfer) = token.transfer_from(caller, owner, to, amount)?;

        log::debug!(
            "transfer_from: {} spends {} of {} -> {}",
            caller,
            amount,
            owner,
            to
        );
        let mut sink = self.sink();
        sink.record(LedgerEvent::Approval(approval.clone()));
        sink.record(LedgerEvent::Transfer(transfer.clone()));
        Ok((approval, transfer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::events::MemorySink;
    use std::sync::{Arc, Mutex};
    use std::thread;

    fn shared_sink() -> (Arc<Mutex<MemorySink>>, Box<dyn EventSink>) {
        let sink = Arc::new(Mutex::new(MemorySink::new()));
        (sink.clone(), Box::new(sink))
    }

    fn create_ledger(supply: u128) -> (Ledger, Arc<Mutex<MemorySink>>) {
        let _ = env_logger::builder().is_test(true).try_init();
        let (handle, sink) = shared_sink();
        let ledger = Ledger::new(
            TokenMetadata::new("Blokkypay", "BPT", 18),
            supply,
            "owner".into(),
            sink,
        );
        (ledger, handle)
    }

    #[test]
    fn test_creation_notification_reaches_sink() {
        let (ledger, sink) = create_ledger(10);

        assert_eq!(ledger.name(), "Blokkypay");
        assert_eq!(ledger.symbol(), "BPT");
        assert_eq!(ledger.decimals(), 18);
        assert_eq!(ledger.total_supply(), 10);

        let sink = sink.lock().unwrap();
        assert_eq!(sink.len(), 1);
        match &sink.events()[0] {
            LedgerEvent::Transfer(t) => {
                assert_eq!(t.from, None);
                assert_eq!(t.to, "owner".into());
                assert_eq!(t.amount, 10);
            }
            other => panic!("expected creation transfer, got {:?}", other),
        }
    }

    #[test]
    fn test_operations_notify_in_order() {
        let (ledger, sink) = create_ledger(10);
        let owner = AccountId::from("owner");
        let other = AccountId::from("other");

        ledger.transfer(&owner, &other, 2).unwrap();
        ledger.approve(&owner, &other, 5);
        ledger.transfer_from(&other, &owner, &other, 3).unwrap();

        assert_eq!(ledger.balance_of(&owner), 5);
        assert_eq!(ledger.balance_of(&other), 5);
        assert_eq!(ledger.allowance(&owner, &other), 2);

        let sink = sink.lock().unwrap();
        let kinds: Vec<&str> = sink
            .events()
            .iter()
            .map(|e| match e {
                LedgerEvent::Transfer(_) => "transfer",
                LedgerEvent::Approval(_) => "approval",
            })
            .collect();
        // creation, transfer, approve, then the spend's approval+transfer pair
        assert_eq!(
            kinds,
            vec!["transfer", "transfer", "approval", "approval", "transfer"]
        );

        match &sink.events()[3] {
            LedgerEvent::Approval(a) => assert_eq!(a.amount, 2),
            other => panic!("expected remaining-allowance approval, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_operations_notify_nothing() {
        let (ledger, sink) = create_ledger(10);
        let owner = AccountId::from("owner");
        let other = AccountId::from("other");

        assert!(ledger.transfer(&other, &owner, 1).is_err());
        assert!(ledger.transfer_from(&other, &owner, &other, 1).is_err());

        assert_eq!(sink.lock().unwrap().len(), 1); // creation only
        assert_eq!(ledger.balance_of(&owner), 10);
    }

    #[test]
    fn test_concurrent_transfers_conserve_supply() {
        const THREADS: u128 = 4;
        const TRANSFERS: u128 = 50;

        let (ledger, sink) = create_ledger(1_000);
        let ledger = Arc::new(ledger);
        let owner = AccountId::from("owner");

        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let ledger = Arc::clone(&ledger);
                let owner = owner.clone();
                thread::spawn(move || {
                    let me = AccountId::new(format!("worker-{}", i));
                    for _ in 0..TRANSFERS {
                        ledger.transfer(&owner, &me, 1).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut sum = ledger.balance_of(&owner);
        assert_eq!(sum, 1_000 - THREADS * TRANSFERS);
        for i in 0..THREADS {
            let worker = AccountId::new(format!("worker-{}", i));
            assert_eq!(ledger.balance_of(&worker), TRANSFERS);
            sum += ledger.balance_of(&worker);
        }
        assert_eq!(sum, ledger.total_supply());

        // One notification per mutation, plus creation.
        assert_eq!(sink.lock().unwrap().len(), 1 + (THREADS * TRANSFERS) as usize);
    }
}
