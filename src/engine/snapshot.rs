use crate::engine::{Amount, MachineState, Outcome};
use serde::{Deserialize, Serialize};

/// A Snapshot of the machine to easily view its content
/// It is used for decoupling output from TransactionMachine and easy serialisation
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MachineSnapshot {
    pub state: String,
    pub balance: Amount,
    pub selected_item: Option<String>,
}

/// One output row per processed command
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OutcomeRecord {
    pub step: usize,
    pub command: String,
    pub status: String,
    pub state: String,
    pub balance: Amount,
    pub message: String,
}

impl OutcomeRecord {
    pub fn new(
        step: usize,
        command: &str,
        outcome: &Outcome,
        state: MachineState,
        balance: Amount,
    ) -> Self {
        OutcomeRecord {
            step,
            command: command.to_owned(),
            status: outcome.status().to_owned(),
            state: state.name().to_owned(),
            balance,
            message: outcome.to_string(),
        }
    }
}
