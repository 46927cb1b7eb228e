use crate::commands::{print_json, Context};
use crate::error::not_found;
use crate::util::{format_optional_timestamp, now_utc, parse_participant_id};
use anyhow::Result;
use clap::{Args, Subcommand};
use roster_core::domain::PaymentStatus;
use roster_store::repo::PaymentNew;

#[derive(Debug, Subcommand)]
pub enum PaymentCommand {
    /// Record a payment (or an outstanding amount) for a participant
    Record(RecordArgs),
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct RecordArgs {
    pub id: String,
    /// paid or unpaid
    #[arg(long, value_parser = parse_status)]
    pub status: PaymentStatus,
    #[arg(long)]
    pub amount: f64,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    pub id: String,
}

fn parse_status(raw: &str) -> Result<PaymentStatus, String> {
    PaymentStatus::parse(raw).map_err(|err| err.to_string())
}

pub fn record(ctx: &Context<'_>, args: RecordArgs) -> Result<()> {
    let participant_id = parse_participant_id(&args.id)?;
    let payment = ctx.store.payments().record(
        now_utc(),
        PaymentNew {
            participant_id,
            status: args.status,
            amount: args.amount,
            paid_at: None,
        },
    )?;

    if ctx.json {
        print_json(&payment)?;
    } else {
        println!(
            "recorded {} payment {} of {:.2} for participant {}",
            payment.status.as_str(),
            payment.id,
            payment.amount,
            payment.participant_id
        );
    }
    Ok(())
}

pub fn list(ctx: &Context<'_>, args: ListArgs) -> Result<()> {
    let id = parse_participant_id(&args.id)?;
    if ctx.store.participants().get(id)?.is_none() {
        return Err(not_found(format!("participant {id}")));
    }
    let payments = ctx.store.payments().list_for_participant(id)?;

    if ctx.json {
        return print_json(&payments);
    }
    for payment in payments {
        println!(
            "{}  {}  {:.2}  paid at {}",
            payment.id,
            payment.status.as_str(),
            payment.amount,
            format_optional_timestamp(payment.paid_at)
        );
    }
    Ok(())
}
