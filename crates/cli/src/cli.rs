//! Command-line surface.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use shopbook_core::StockItemId;
use shopbook_ledger::{LedgerError, OverpayPolicy};

/// Shop credit book: customers, dues, debts and stock.
#[derive(Parser, Debug)]
#[command(name = "shopbook")]
#[command(about = "Track what customers owe the shop and what the shop owes them")]
pub struct Cli {
    /// Snapshot file (overrides SHOPBOOK_DATA)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Overpayment handling: faithful or carry-credit (overrides SHOPBOOK_OVERPAY_POLICY)
    #[arg(long, global = true, value_parser = parse_policy)]
    pub policy: Option<OverpayPolicy>,

    #[command(subcommand)]
    pub command: Command,
}

fn parse_policy(s: &str) -> Result<OverpayPolicy, LedgerError> {
    s.parse()
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Manage customers
    #[command(subcommand)]
    Customer(CustomerCommand),

    /// Record a transaction: Due, Payment, Debt or "Debt Payment"
    Txn {
        /// Customer id or name
        customer: String,
        kind: String,
        amount: String,
    },

    /// Manage the stock list
    #[command(subcommand)]
    Stock(StockCommand),

    /// Shop-wide totals and per-customer net positions
    Summary,

    /// A customer's ledger entries (inclusive range)
    Statement(StatementArgs),

    /// Entries recorded today
    Today,

    /// Free-form activity notes (not tied to a customer)
    #[command(subcommand)]
    Log(LogCommand),
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum LogCommand {
    Add {
        /// What happened, e.g. "Rent"
        label: String,
        amount: String,
    },
    List,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum CustomerCommand {
    Add {
        name: String,
        contact: String,
        #[arg(long)]
        address: Option<String>,
    },
    List,
    Remove {
        /// Customer id or name
        customer: String,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum StockCommand {
    Add {
        name: String,
        value: String,
        #[arg(long)]
        unit: Option<String>,
    },
    /// Daily value update (once per item per day)
    Update { name: String, value: String },
    /// Correct an item's name and value
    Edit {
        id: StockItemId,
        name: String,
        value: String,
    },
    Remove { id: StockItemId },
    /// Items in update order, pending first
    List,
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct StatementArgs {
    /// Customer id or name
    pub customer: String,
    /// First day (YYYY-MM-DD); defaults to the customer's first entry
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last day (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub to: Option<NaiveDate>,
}
