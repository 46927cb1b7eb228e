use crate::commands::print_json;
use crate::error::invalid_input;
use anyhow::Result;
use clap::{Args, Subcommand};
use roster_config::AppConfig;
use roster_core::domain::normalize_email;
use roster_core::fields::slugify;
use serde::Serialize;

#[derive(Debug, Subcommand)]
pub enum NormalizeCommand {
    Phone(ValueArgs),
    Email(ValueArgs),
    Slug(ValueArgs),
}

#[derive(Debug, Args)]
pub struct ValueArgs {
    pub value: String,
}

#[derive(Debug, Serialize)]
struct Normalized<'a> {
    kind: &'static str,
    input: &'a str,
    output: String,
}

pub fn run(config: &AppConfig, json: bool, cmd: NormalizeCommand) -> Result<()> {
    let (kind, input, output) = match &cmd {
        NormalizeCommand::Phone(args) => {
            ("phone", &args.value, config.phone.normalize(&args.value))
        }
        NormalizeCommand::Email(args) => ("email", &args.value, normalize_email(&args.value)),
        NormalizeCommand::Slug(args) => ("slug", &args.value, Some(slugify(&args.value))),
    };
    let output = output.ok_or_else(|| invalid_input(format!("no usable {kind} in {input:?}")))?;

    if json {
        return print_json(&Normalized {
            kind,
            input,
            output,
        });
    }
    println!("{output}");
    Ok(())
}
