use crate::commands::{print_json, Context};
use crate::util::{now_utc, read_input};
use anyhow::{Context as _, Result};
use clap::{ArgAction, Args, Subcommand};
use roster_import::{ImportReport, ParsedImport};
use roster_store::legacy::{self, DEFAULT_TABLE};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Subcommand)]
pub enum ImportCommand {
    /// Import a JSON array of participant records
    Json(ImportJsonArgs),
    /// Copy participants, and optionally their payments, out of an older SQLite database
    Legacy(ImportLegacyArgs),
}

#[derive(Debug, Args)]
pub struct ImportJsonArgs {
    /// JSON file, or `-` for standard input
    pub file: PathBuf,
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct ImportLegacyArgs {
    pub db: PathBuf,
    #[arg(long, default_value = DEFAULT_TABLE)]
    pub table: String,
    /// Payment table whose `inscription_id` points into `--table`
    /// (the form database uses `paiement`)
    #[arg(long, value_name = "NAME")]
    pub payments_table: Option<String>,
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,
}

pub fn import_json(ctx: &Context<'_>, args: ImportJsonArgs) -> Result<()> {
    let data = read_input(&args.file)?;
    let parsed = roster_import::json::parse_participants(&data, ctx.store.phone_policy())
        .with_context(|| format!("parse {}", args.file.display()))?;
    let report = apply(ctx, args.file.display().to_string(), parsed, args.dry_run)?;
    print_report(ctx, &report)
}

pub fn import_legacy(ctx: &Context<'_>, args: ImportLegacyArgs) -> Result<()> {
    let rows = legacy::read_rows(&args.db, &args.table)
        .with_context(|| format!("read {} from {}", args.table, args.db.display()))?;
    info!(rows = rows.len(), table = %args.table, "legacy rows loaded");
    let payments = match args.payments_table.as_deref() {
        Some(table) => {
            let payments = legacy::read_rows(&args.db, table)
                .with_context(|| format!("read {table} from {}", args.db.display()))?;
            info!(rows = payments.len(), table, "legacy payment rows loaded");
            Some(payments)
        }
        None => None,
    };

    let parsed = roster_import::legacy::drafts_from_rows(&rows, ctx.store.phone_policy());
    let source = format!("{}#{}", args.db.display(), args.table);
    let Some(payments) = payments else {
        let report = apply(ctx, source, parsed, args.dry_run)?;
        return print_report(ctx, &report);
    };

    if args.dry_run {
        let mut report = apply(ctx, source, parsed, true)?;
        report.payments = Some(payments.len());
        return print_report(ctx, &report);
    }

    let tx = ctx.store.connection().unchecked_transaction()?;
    let mut report = apply(ctx, source, parsed, false)?;
    let migration = legacy::migrate_payments(ctx.store, now_utc(), &rows, &payments)?;
    tx.commit()?;

    info!(
        recorded = migration.recorded,
        skipped = migration.warnings.len(),
        "legacy payments migrated"
    );
    report.payments = Some(migration.recorded);
    report.warnings.extend(migration.warnings);
    print_report(ctx, &report)
}

fn apply(
    ctx: &Context<'_>,
    source: String,
    parsed: ParsedImport,
    dry_run: bool,
) -> Result<ImportReport> {
    let mut report = ImportReport::new(source, dry_run);
    report.skipped = parsed.skipped;
    report.warnings = parsed.warnings;

    if dry_run {
        report.created = parsed.drafts.len();
        return Ok(report);
    }

    let outcome = ctx.store.participants().import(now_utc(), parsed.drafts)?;
    report.created = outcome.created.len();
    report.skipped += outcome.skipped.len();
    for row in outcome.skipped {
        let email = row.email.as_deref().unwrap_or("-");
        report.warnings.push(format!(
            "record {}: skipped {email}, {}",
            row.index + 1,
            row.reason.as_str()
        ));
    }
    info!(
        created = report.created,
        skipped = report.skipped,
        "import finished"
    );
    Ok(report)
}

fn print_report(ctx: &Context<'_>, report: &ImportReport) -> Result<()> {
    if ctx.json {
        return print_json(report);
    }

    let verb = if report.dry_run { "would create" } else { "created" };
    println!(
        "Imported participants from {}: {verb} {}, skipped {}",
        report.source, report.created, report.skipped
    );
    if let Some(payments) = report.payments {
        let verb = if report.dry_run { "would read" } else { "recorded" };
        println!("Payments: {verb} {payments}");
    }
    if !report.warnings.is_empty() {
        println!("Warnings:");
        for warning in &report.warnings {
            println!("- {}", warning);
        }
    }
    Ok(())
}
