pub mod participants;
pub mod payments;

pub use participants::{ImportOutcome, ParticipantsRepo, SkipReason, SkippedRow};
pub use payments::{PaymentNew, PaymentsRepo};
