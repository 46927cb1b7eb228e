use crate::error::invalid_input;
use anyhow::{Context as _, Result};
use chrono::Utc;
use roster_core::domain::ParticipantId;
use roster_core::dto::format_timestamp;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Argument value meaning "read from standard input".
pub const STDIN_MARKER: &str = "-";

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn parse_participant_id(raw: &str) -> Result<ParticipantId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid_input("participant id cannot be empty"));
    }
    trimmed
        .parse()
        .map_err(|_| invalid_input(format!("invalid participant id: {trimmed}")))
}

pub fn read_input(source: &Path) -> Result<String> {
    if source.as_os_str() == STDIN_MARKER {
        let mut buffer = String::new();
        io::stdin()
            .lock()
            .read_to_string(&mut buffer)
            .with_context(|| "read standard input")?;
        return Ok(buffer);
    }
    fs::read_to_string(source).with_context(|| format!("read {}", source.display()))
}

pub fn format_optional_timestamp(ts: Option<i64>) -> String {
    ts.map(format_timestamp).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::{format_optional_timestamp, parse_participant_id};

    #[test]
    fn participant_ids_are_trimmed_integers() {
        assert_eq!(parse_participant_id(" 12 ").expect("id").as_i64(), 12);
        assert!(parse_participant_id("").is_err());
        assert!(parse_participant_id("abc").is_err());
    }

    #[test]
    fn optional_timestamps_render_placeholder() {
        assert_eq!(format_optional_timestamp(None), "-");
        assert_eq!(format_optional_timestamp(Some(0)), "1970-01-01T00:00:00Z");
    }
}
