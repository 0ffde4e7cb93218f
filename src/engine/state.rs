//! Per-state behaviour of the transaction machine.
//!
//! Handlers are pure: they read a [`Context`] and return a [`Step`] holding the
//! outcome and, optionally, the [`Transition`] the machine must commit. Every
//! (state, operation) pair has an explicit arm.

use crate::engine::{Amount, Catalog, Outcome, Rejection};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MachineState {
    #[default]
    Idle,
    Funded,
    Dispensing,
}

impl MachineState {
    pub fn name(&self) -> &'static str {
        match self {
            MachineState::Idle => "Idle",
            MachineState::Funded => "Funded",
            MachineState::Dispensing => "Dispensing",
        }
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    InsertFunds(Amount),
    SelectItem(String),
    Dispense,
    Refund,
}

impl Operation {
    pub fn command(&self) -> &'static str {
        match self {
            Operation::InsertFunds(_) => "insert",
            Operation::SelectItem(_) => "select",
            Operation::Dispense => "dispense",
            Operation::Refund => "refund",
        }
    }
}

/// The item being dispensed, with the price it was accepted at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub item: String,
    pub price: Amount,
}

/// Change the machine commits once a handler has returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Enter (or stay in) Funded with the given balance
    Funded { balance: Amount },
    /// Enter Dispensing for the selection
    Dispensing { selection: Selection },
    /// Back to Idle: balance and selection cleared
    Idle,
}

impl Transition {
    pub fn target(&self) -> MachineState {
        match self {
            Transition::Funded { .. } => MachineState::Funded,
            Transition::Dispensing { .. } => MachineState::Dispensing,
            Transition::Idle => MachineState::Idle,
        }
    }
}

/// Read-only view of the machine data a handler needs
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub balance: Amount,
    pub selection: Option<&'a Selection>,
    pub catalog: &'a Catalog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub outcome: Outcome,
    pub transition: Option<Transition>,
}

impl Step {
    fn stay(outcome: impl Into<Outcome>) -> Self {
        Step {
            outcome: outcome.into(),
            transition: None,
        }
    }

    fn to(outcome: Outcome, transition: Transition) -> Self {
        Step {
            outcome,
            transition: Some(transition),
        }
    }
}

pub fn handle(state: MachineState, ctx: &Context<'_>, op: &Operation) -> Step {
    match state {
        MachineState::Idle => idle(ctx, op),
        MachineState::Funded => funded(ctx, op),
        MachineState::Dispensing => dispensing(ctx, op),
    }
}

fn idle(ctx: &Context<'_>, op: &Operation) -> Step {
    match op {
        Operation::InsertFunds(amount) => fund(ctx.balance, *amount),
        Operation::SelectItem(_) => Step::stay(Rejection::NoFunds),
        Operation::Dispense => Step::stay(Rejection::NoFunds),
        Operation::Refund => Step::stay(Rejection::NothingToRefund),
    }
}

fn funded(ctx: &Context<'_>, op: &Operation) -> Step {
    match op {
        Operation::InsertFunds(amount) => fund(ctx.balance, *amount),
        Operation::SelectItem(item) => select(ctx, item),
        Operation::Dispense => Step::stay(Rejection::NoSelection),
        Operation::Refund => Step::to(
            Outcome::Refunded {
                amount: ctx.balance,
            },
            Transition::Idle,
        ),
    }
}

fn dispensing(ctx: &Context<'_>, op: &Operation) -> Step {
    match op {
        Operation::InsertFunds(_) => Step::stay(Rejection::DispenseInProgress),
        Operation::SelectItem(_) => Step::stay(Rejection::DispenseInProgress),
        Operation::Dispense => dispense(ctx),
        Operation::Refund => Step::stay(Rejection::RefundUnavailable),
    }
}

fn fund(balance: Amount, amount: Amount) -> Step {
    if !amount.is_positive() {
        return Step::stay(Rejection::InvalidAmount(amount.to_string()));
    }

    match balance.add(&amount) {
        Ok(total) => Step::to(
            Outcome::Inserted { amount, total },
            Transition::Funded { balance: total },
        ),
        Err(e) => {
            log::warn!("Refusing {amount}: {e}");
            Step::stay(Rejection::BalanceOverflow)
        }
    }
}

fn select(ctx: &Context<'_>, item: &str) -> Step {
    if item.trim().is_empty() {
        return Step::stay(Rejection::InvalidItemId);
    }

    let Some(price) = ctx.catalog.price(item) else {
        return Step::stay(Rejection::UnknownItem(item.to_owned()));
    };

    if ctx.balance < price {
        // Both are non-negative so this cannot underflow
        let shortfall = price.sub(&ctx.balance).unwrap_or(price);
        return Step::stay(Rejection::InsufficientFunds { shortfall });
    }

    Step::to(
        Outcome::Selected {
            item: item.to_owned(),
            price,
        },
        Transition::Dispensing {
            selection: Selection {
                item: item.to_owned(),
                price,
            },
        },
    )
}

fn dispense(ctx: &Context<'_>) -> Step {
    let Some(selection) = ctx.selection else {
        log::error!("Dispensing state entered without a selection");
        return Step::stay(Rejection::NoSelection);
    };

    let change = ctx.balance.sub(&selection.price).unwrap_or_default();

    Step::to(
        Outcome::Dispensed {
            item: selection.item.clone(),
            change,
        },
        Transition::Idle,
    )
}
