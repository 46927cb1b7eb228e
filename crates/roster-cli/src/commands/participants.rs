use crate::commands::{print_json, Context};
use crate::error::{not_found, CliError};
use crate::util::{now_utc, parse_participant_id};
use anyhow::Result;
use clap::{ArgAction, Args};
use roster_core::domain::{Participant, ParticipantDraft};
use roster_core::dto::{format_timestamp, BadgeCardDto, ParticipantStats, PaymentSummaryDto};
use roster_core::fields::{map_fields, CanonicalField, RawRecord};
use roster_core::rules::validate_registration;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub middle_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    /// M, F, Autre or a form label such as "Féminin"
    #[arg(long)]
    pub gender: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub date_of_birth: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub degree: Option<String>,
    #[arg(long)]
    pub institution: Option<String>,
    #[arg(long)]
    pub graduation_year: Option<i32>,
    #[arg(long)]
    pub position: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub years_of_experience: Option<i32>,
    #[arg(long)]
    pub expertise_domain: Option<String>,
    #[arg(long, value_name = "CHANNEL")]
    pub how_heard: Vec<String>,
    #[arg(long, value_name = "EXPECTATION")]
    pub expectation: Vec<String>,
    #[arg(long)]
    pub objectives: Option<String>,
    #[arg(long)]
    pub comments: Option<String>,
    #[arg(long)]
    pub drink: Option<String>,
    #[arg(long, action = ArgAction::SetTrue)]
    pub accept_terms: bool,
    #[arg(long, action = ArgAction::SetTrue)]
    pub accept_data_usage: bool,
    #[arg(long, action = ArgAction::SetTrue)]
    pub accept_future_info: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only participants who submitted the full registration form
    #[arg(long, action = ArgAction::SetTrue)]
    pub registrations: bool,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    pub term: String,
}

#[derive(Debug, Serialize)]
struct StatsReport {
    #[serde(flatten)]
    participants: ParticipantStats,
    payments: Vec<PaymentSummaryDto>,
}

impl RegisterArgs {
    /// The submission as the form would post it, keyed by canonical names.
    fn into_record(self) -> RawRecord {
        let mut record = RawRecord::new();
        let mut text = |field: CanonicalField, value: Option<String>| {
            if let Some(value) = value {
                record.insert(field.as_str().to_string(), Value::String(value));
            }
        };
        text(CanonicalField::Email, Some(self.email));
        text(CanonicalField::FirstName, self.first_name);
        text(CanonicalField::MiddleName, self.middle_name);
        text(CanonicalField::LastName, self.last_name);
        text(CanonicalField::Gender, self.gender);
        text(CanonicalField::Phone, self.phone);
        text(CanonicalField::DateOfBirth, self.date_of_birth);
        text(CanonicalField::Address, self.address);
        text(CanonicalField::Degree, self.degree);
        text(CanonicalField::Institution, self.institution);
        text(CanonicalField::Position, self.position);
        text(CanonicalField::Company, self.company);
        text(CanonicalField::ExpertiseDomain, self.expertise_domain);
        text(CanonicalField::Objectives, self.objectives);
        text(CanonicalField::AdditionalComments, self.comments);
        text(CanonicalField::DrinkPreference, self.drink);

        let numbers = [
            (CanonicalField::GraduationYear, self.graduation_year),
            (CanonicalField::YearsOfExperience, self.years_of_experience),
        ];
        for (field, value) in numbers {
            if let Some(value) = value {
                record.insert(field.as_str().to_string(), Value::from(value));
            }
        }

        let lists = [
            (CanonicalField::HowHeard, self.how_heard),
            (CanonicalField::Expectations, self.expectation),
        ];
        for (field, values) in lists {
            record.insert(field.as_str().to_string(), Value::from(values));
        }

        let flags = [
            (CanonicalField::TermsAccepted, self.accept_terms),
            (CanonicalField::DataUsageAccepted, self.accept_data_usage),
            (CanonicalField::FutureInfoAccepted, self.accept_future_info),
        ];
        for (field, value) in flags {
            record.insert(field.as_str().to_string(), Value::Bool(value));
        }
        record
    }
}

pub fn register(ctx: &Context<'_>, args: RegisterArgs) -> Result<()> {
    let record = args.into_record();
    let conversion = ParticipantDraft::from_record(&map_fields(&record), ctx.store.phone_policy());
    for warning in &conversion.warnings {
        warn!(%warning, "registration value dropped");
    }

    let issues = validate_registration(&conversion.draft);
    if !issues.is_empty() {
        return Err(CliError::Rejected(issues).into());
    }

    let participant = ctx
        .store
        .participants()
        .create(now_utc(), conversion.draft)?;
    if ctx.json {
        print_json(&participant)?;
    } else {
        println!(
            "registered {} {} <{}>",
            participant.id,
            participant.display_name(),
            participant.email
        );
    }
    Ok(())
}

pub fn show(ctx: &Context<'_>, args: ShowArgs) -> Result<()> {
    let id = parse_participant_id(&args.id)?;
    let participant = ctx
        .store
        .participants()
        .get(id)?
        .ok_or_else(|| not_found(format!("participant {id}")))?;

    if ctx.json {
        return print_json(&participant);
    }

    println!("{} {}", participant.id, participant.display_name());
    println!("email: {}", participant.email);
    print_optional("phone", participant.phone.as_deref());
    print_optional("gender", participant.gender.map(|gender| gender.as_str()));
    print_optional("degree", participant.degree.as_deref());
    print_optional("institution", participant.institution.as_deref());
    if let Some(year) = participant.graduation_year {
        println!("graduation year: {year}");
    }
    print_optional("position", participant.position.as_deref());
    print_optional("company", participant.company.as_deref());
    print_optional("expertise", participant.expertise_domain.as_deref());
    if !participant.how_heard.is_empty() {
        println!("heard via: {}", participant.how_heard.join(", "));
    }
    if !participant.expectations.is_empty() {
        println!("expectations: {}", participant.expectations.join(", "));
    }
    println!("registered at: {}", format_timestamp(participant.created_at));
    Ok(())
}

fn print_optional(label: &str, value: Option<&str>) {
    if let Some(value) = value {
        println!("{label}: {value}");
    }
}

pub fn list(ctx: &Context<'_>, args: ListArgs) -> Result<()> {
    let repo = ctx.store.participants();
    let participants = if args.registrations {
        repo.list_registrations()?
    } else {
        repo.list()?
    };
    print_participants(ctx, &participants)
}

pub fn search(ctx: &Context<'_>, args: SearchArgs) -> Result<()> {
    let participants = ctx.store.participants().search(&args.term)?;
    print_participants(ctx, &participants)
}

fn print_participants(ctx: &Context<'_>, participants: &[Participant]) -> Result<()> {
    if ctx.json {
        let cards: Vec<BadgeCardDto> = participants.iter().map(BadgeCardDto::from).collect();
        return print_json(&cards);
    }
    for participant in participants {
        println!(
            "{}  {}  {}  {}",
            participant.id,
            participant.display_name(),
            participant.email,
            participant.phone.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

pub fn count(ctx: &Context<'_>) -> Result<()> {
    let count = ctx.store.participants().count()?;
    if ctx.json {
        return print_json(&serde_json::json!({ "count": count }));
    }
    println!("{count}");
    Ok(())
}

pub fn stats(ctx: &Context<'_>) -> Result<()> {
    let report = StatsReport {
        participants: ctx.store.participants().stats()?,
        payments: ctx.store.payments().summary()?,
    };
    if ctx.json {
        return print_json(&report);
    }

    let stats = &report.participants;
    println!("participants: {}", stats.total);
    println!("with phone: {}", stats.with_phone);
    for (title, buckets) in [
        ("gender", &stats.by_gender),
        ("expertise", &stats.by_expertise_domain),
        ("degree", &stats.by_degree),
    ] {
        println!("by {title}:");
        for bucket in buckets {
            println!("  {}: {}", bucket.label, bucket.count);
        }
    }
    for summary in &report.payments {
        println!(
            "payments {}: {} totalling {:.2}",
            summary.status.as_str(),
            summary.count,
            summary.total_amount
        );
    }
    Ok(())
}
