use parking_lot::Mutex;
use std::sync::Arc;

use crate::engine::{Amount, Catalog, MachineSnapshot, Operation, Outcome, TransactionMachine};

/// Handle for one machine shared between callers.
/// Each call holds the lock for the whole operation, so calls on the same
/// machine are serialized. Clones share the machine.
#[derive(Debug, Clone)]
pub struct SharedMachine {
    inner: Arc<Mutex<TransactionMachine>>,
}

impl SharedMachine {
    pub fn new(catalog: Catalog) -> Self {
        SharedMachine::from(TransactionMachine::new(catalog))
    }

    pub fn insert_funds(&self, amount: Amount) -> Outcome {
        self.inner.lock().insert_funds(amount)
    }

    pub fn select_item(&self, item: &str) -> Outcome {
        self.inner.lock().select_item(item)
    }

    pub fn dispense(&self) -> Outcome {
        self.inner.lock().dispense()
    }

    pub fn refund(&self) -> Outcome {
        self.inner.lock().refund()
    }

    pub fn apply(&self, op: Operation) -> Outcome {
        self.inner.lock().apply(op)
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        self.inner.lock().snapshot()
    }
}

impl From<TransactionMachine> for SharedMachine {
    fn from(machine: TransactionMachine) -> Self {
        SharedMachine {
            inner: Arc::new(Mutex::new(machine)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn concurrent_funding_is_not_lost() {
        let machine = SharedMachine::new(Catalog::standard());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let machine = machine.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        assert!(machine.insert_funds(Amount::from_cents(5)).is_accepted());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = machine.snapshot();
        assert_eq!(snapshot.balance, Amount::from_cents(8 * 100 * 5));
        assert_eq!(snapshot.state, "Funded");
    }

    #[test]
    fn only_one_concurrent_selection_wins() {
        let machine = SharedMachine::new(Catalog::standard());
        machine.insert_funds(Amount::from_cents(200));

        let handles: Vec<_> = ["cola", "chips", "candy", "cola"]
            .into_iter()
            .map(|item| {
                let machine = machine.clone();
                thread::spawn(move || machine.select_item(item).is_accepted())
            })
            .collect();

        let accepted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(accepted, 1);
        assert_eq!(machine.snapshot().state, "Dispensing");
        assert!(machine.dispense().is_accepted());
    }

    #[test]
    fn separate_machines_are_independent() {
        let a = SharedMachine::new(Catalog::standard());
        let b = SharedMachine::new(Catalog::standard());

        a.insert_funds(Amount::from_cents(100));
        assert_eq!(b.refund().to_string(), "No money to refund");
        assert_eq!(a.apply(Operation::Refund).to_string(), "Refunded $1.00");
    }
}
