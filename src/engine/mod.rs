mod amount;
mod catalog;
mod machine;
mod outcome;
mod record;
mod shared;
mod snapshot;
pub mod state;

pub use amount::{Amount, AmountError};
pub use catalog::{Catalog, CatalogError};
pub use machine::TransactionMachine;
pub use outcome::{Outcome, Rejection, RejectionKind};
pub use record::{CommandRecord, CommandType};
pub use shared::SharedMachine;
pub use snapshot::{MachineSnapshot, OutcomeRecord};
pub use state::{MachineState, Operation};
