use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use crate::util::read_input;
use anyhow::Result;
use clap::Args;
use roster_core::domain::{RegistrationMatch, RegistrationQuery};
use roster_core::dto::RegistrationCheckDto;
use roster_import::manual::classify_lookup_input;
use roster_import::vcard::{looks_like_vcard, parse_scanned_card, ScannedCard};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// File holding the scanned payload, or `-` for standard input
    pub source: PathBuf,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanReport {
    input: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    card: Option<ScannedCard>,
    #[serde(flatten)]
    check: RegistrationCheckDto,
}

pub fn check(ctx: &Context<'_>, args: CheckArgs) -> Result<()> {
    let query = RegistrationQuery::new(args.email.as_deref(), args.phone.as_deref())?;
    let found = ctx.store.participants().find_registration(&query)?;
    if ctx.json {
        return print_json(&RegistrationCheckDto::from(&found));
    }
    print_match(&found);
    Ok(())
}

pub fn scan(ctx: &Context<'_>, args: ScanArgs) -> Result<()> {
    let payload = read_input(&args.source)?;
    let policy = &ctx.config.phone;

    let (input, card, query) = if looks_like_vcard(&payload) {
        let card = parse_scanned_card(&payload)?;
        debug!(
            email = card.email.as_deref().unwrap_or("-"),
            phone = card.phone.as_deref().unwrap_or("-"),
            "scanned vcard"
        );
        let query = card.to_query(policy)?;
        ("vcard", Some(card), query)
    } else {
        let trimmed = payload.trim();
        if trimmed.is_empty() {
            return Err(invalid_input("scanned payload is empty"));
        }
        let query = classify_lookup_input(trimmed).into_query(policy)?;
        ("manual", None, query)
    };

    let found = ctx.store.participants().find_registration(&query)?;
    if ctx.json {
        return print_json(&ScanReport {
            input,
            card,
            check: RegistrationCheckDto::from(&found),
        });
    }
    if let Some(name) = card.as_ref().and_then(|card| card.name.as_deref()) {
        println!("card: {name}");
    }
    print_match(&found);
    Ok(())
}

fn print_match(found: &RegistrationMatch) {
    match found {
        RegistrationMatch::Found {
            participant,
            matched_by,
        } => println!(
            "registered: {} {} <{}> (matched by {})",
            participant.id,
            participant.display_name(),
            participant.email,
            matched_by.as_str()
        ),
        RegistrationMatch::NotFound => println!("not registered"),
    }
}
