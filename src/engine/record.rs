use serde::Deserialize;
use std::str::FromStr;

use crate::engine::{Amount, Operation, Rejection};

#[derive(Deserialize, Debug, Clone)]
pub struct CommandRecord {
    pub command: CommandType,
    pub argument: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Insert,
    Select,
    Dispense,
    Refund,
}

impl CommandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Insert => "insert",
            CommandType::Select => "select",
            CommandType::Dispense => "dispense",
            CommandType::Refund => "refund",
        }
    }
}

impl CommandRecord {
    /// Malformed arguments are reported as a rejection without reaching the machine
    pub fn to_operation(&self) -> Result<Operation, Rejection> {
        match self.command {
            CommandType::Insert => {
                let raw = self.required_argument()?;
                match Amount::from_str(raw) {
                    Ok(amount) => Ok(Operation::InsertFunds(amount)),
                    Err(e) => {
                        log::debug!("Unparsable amount {raw:?}: {e}");
                        Err(Rejection::InvalidAmount(raw.to_owned()))
                    }
                }
            }
            CommandType::Select => {
                let item = self.required_argument()?;
                Ok(Operation::SelectItem(item.to_owned()))
            }
            CommandType::Dispense => Ok(Operation::Dispense),
            CommandType::Refund => Ok(Operation::Refund),
        }
    }

    fn required_argument(&self) -> Result<&str, Rejection> {
        match self.argument.as_deref() {
            Some(arg) if !arg.is_empty() => Ok(arg),
            _ => Err(Rejection::MissingArgument(self.command.as_str())),
        }
    }
}
