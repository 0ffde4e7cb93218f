use crate::engine::state::{self, Context, Selection, Transition};
use crate::engine::{Amount, Catalog, MachineSnapshot, MachineState, Operation, Outcome};

/// Balance-and-dispense controller.
/// Every operation is forwarded to the active state's handler; the returned
/// transition (if any) is committed before the outcome is handed back.
#[derive(Debug, Clone)]
pub struct TransactionMachine {
    catalog: Catalog,
    balance: Amount,
    selection: Option<Selection>,
    state: MachineState,
}

impl TransactionMachine {
    pub fn new(catalog: Catalog) -> Self {
        TransactionMachine {
            catalog,
            balance: Amount::new(),
            selection: None,
            state: MachineState::Idle,
        }
    }

    pub fn insert_funds(&mut self, amount: Amount) -> Outcome {
        self.apply(Operation::InsertFunds(amount))
    }

    pub fn select_item(&mut self, item: &str) -> Outcome {
        self.apply(Operation::SelectItem(item.to_owned()))
    }

    pub fn dispense(&mut self) -> Outcome {
        self.apply(Operation::Dispense)
    }

    pub fn refund(&mut self) -> Outcome {
        self.apply(Operation::Refund)
    }

    pub fn apply(&mut self, op: Operation) -> Outcome {
        log::debug!("Dispatching {op:?} in state {}", self.state);

        let ctx = Context {
            balance: self.balance,
            selection: self.selection.as_ref(),
            catalog: &self.catalog,
        };
        let step = state::handle(self.state, &ctx, &op);

        match step.transition {
            Some(transition) => self.commit(transition),
            None => log::debug!("{} rejected in state {}: {}", op.command(), self.state, step.outcome),
        }

        step.outcome
    }

    fn commit(&mut self, transition: Transition) {
        let from = self.state;
        match transition {
            Transition::Funded { balance } => {
                self.balance = balance;
                self.state = MachineState::Funded;
            }
            Transition::Dispensing { selection } => {
                self.selection = Some(selection);
                self.state = MachineState::Dispensing;
            }
            Transition::Idle => {
                self.balance = Amount::new();
                self.selection = None;
                self.state = MachineState::Idle;
            }
        }
        log::info!("Transition {from} -> {} (balance {})", self.state, self.balance);
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn selected_item(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.item.as_str())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            state: self.state.name().to_owned(),
            balance: self.balance,
            selected_item: self.selected_item().map(str::to_owned),
        }
    }
}

impl Default for TransactionMachine {
    fn default() -> Self {
        TransactionMachine::new(Catalog::standard())
    }
}
