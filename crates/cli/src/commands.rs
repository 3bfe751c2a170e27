use std::io::Write;

use anyhow::{Context, Result};

use shopbook_accounts::NewAccount;
use shopbook_app::{CustomerRef, ShopService};
use shopbook_ledger::LedgerEntry;
use shopbook_reporting::{DateRange, NetPosition};

use crate::cli::{Command, CustomerCommand, LogCommand, StatementArgs, StockCommand};

/// Execute one command against the service, writing plain text to `out`.
pub fn run(service: &ShopService, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Customer(cmd) => customer(service, cmd, out),
        Command::Txn {
            customer,
            kind,
            amount,
        } => {
            let who = CustomerRef::from(customer.as_str());
            let posting = service
                .record_transaction(&who, &kind, &amount)
                .with_context(|| format!("recording {kind} of {amount} for {customer}"))?;
            for entry in &posting.entries {
                write_entry(out, entry)?;
            }
            writeln!(
                out,
                "{}: due {} debt {}",
                posting.account.name(),
                posting.account.due(),
                posting.account.debt()
            )?;
            Ok(())
        }
        Command::Stock(cmd) => stock(service, cmd, out),
        Command::Summary => summary(service, out),
        Command::Statement(args) => statement(service, args, out),
        Command::Today => {
            for entry in service.entries_today()? {
                write_entry(out, &entry)?;
            }
            Ok(())
        }
        Command::Log(LogCommand::Add { label, amount }) => {
            let entry = service
                .add_activity(&label, &amount)
                .with_context(|| format!("logging {label}"))?;
            writeln!(out, "{}\t{}\t{}", entry.date(), entry.label(), entry.amount())?;
            Ok(())
        }
        Command::Log(LogCommand::List) => {
            for entry in service.activity()? {
                writeln!(out, "{}\t{}\t{}", entry.date(), entry.label(), entry.amount())?;
            }
            Ok(())
        }
    }
}

fn customer(service: &ShopService, cmd: CustomerCommand, out: &mut impl Write) -> Result<()> {
    match cmd {
        CustomerCommand::Add {
            name,
            contact,
            address,
        } => {
            let mut new = NewAccount::new(name, contact);
            if let Some(address) = address {
                new = new.with_address(address);
            }
            let account = service.add_customer(new).context("adding customer")?;
            writeln!(out, "{} {}", account.id_typed(), account.name())?;
        }
        CustomerCommand::List => {
            for account in service.customers()? {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\tdue {}\tdebt {}",
                    account.id_typed(),
                    account.name(),
                    account.contact(),
                    account.address().unwrap_or("-"),
                    account.due(),
                    account.debt()
                )?;
            }
        }
        CustomerCommand::Remove { customer } => {
            let account = service
                .remove_customer(&CustomerRef::from(customer.as_str()))
                .with_context(|| format!("removing {customer}"))?;
            writeln!(out, "removed {}", account.name())?;
        }
    }
    Ok(())
}

fn stock(service: &ShopService, cmd: StockCommand, out: &mut impl Write) -> Result<()> {
    match cmd {
        StockCommand::Add { name, value, unit } => {
            let item = service.add_stock(&name, &value, unit)?;
            writeln!(out, "{} {} {}", item.id_typed(), item.name(), item.value())?;
        }
        StockCommand::Update { name, value } => {
            let item = service
                .update_stock(&name, &value)
                .with_context(|| format!("updating {name}"))?;
            writeln!(out, "{} {}", item.name(), item.value())?;
        }
        StockCommand::Edit { id, name, value } => {
            let item = service.edit_stock(id, &name, &value)?;
            writeln!(out, "{} {}", item.name(), item.value())?;
        }
        StockCommand::Remove { id } => {
            let item = service.remove_stock(id)?;
            writeln!(out, "removed {}", item.name())?;
        }
        StockCommand::List => {
            let today = service.today();
            for item in service.stock_queue()? {
                let mark = if item.updated_on(today) { "updated" } else { "pending" };
                writeln!(
                    out,
                    "{}\t{}\t{}{}\t{}",
                    item.id_typed(),
                    item.name(),
                    item.value(),
                    item.unit().map(|u| format!(" per {u}")).unwrap_or_default(),
                    mark
                )?;
            }
            let status = service.stock_status()?;
            writeln!(out, "{}/{} updated today", status.updated_today, status.total)?;
        }
    }
    Ok(())
}

fn summary(service: &ShopService, out: &mut impl Write) -> Result<()> {
    let totals = service.totals()?;
    writeln!(out, "total due   {}", totals.total_due)?;
    writeln!(out, "total debt  {}", totals.total_debt)?;
    writeln!(out, "stock       {}", totals.total_stock)?;
    writeln!(out, "cash        {}", totals.cash)?;

    for (account, position) in service.net_positions()? {
        let line = match position {
            NetPosition::Settled => "settled".to_string(),
            NetPosition::Due(x) => format!("owes {x}"),
            NetPosition::Debt(x) => format!("is owed {x}"),
        };
        writeln!(out, "{}: {line}", account.name())?;
    }
    Ok(())
}

fn statement(service: &ShopService, args: StatementArgs, out: &mut impl Write) -> Result<()> {
    let who = CustomerRef::from(args.customer.as_str());
    let range = (args.from.is_some() || args.to.is_some()).then(|| DateRange::new(args.from, args.to));
    let (range, entries) = service
        .statement(&who, range)
        .with_context(|| format!("statement for {}", args.customer))?;

    let bound = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
    writeln!(out, "{} .. {}", bound(range.from), bound(range.to))?;
    for entry in &entries {
        write_entry(out, entry)?;
    }
    Ok(())
}

fn write_entry(out: &mut impl Write, entry: &LedgerEntry) -> Result<()> {
    writeln!(
        out,
        "{}\t{}\t{}\t{}",
        entry.date(),
        entry.account_name(),
        entry.kind().label(),
        entry.amount()
    )?;
    Ok(())
}
