use crate::error::{ImportError, Result};
use roster_core::domain::{is_valid_email, PhonePolicy, RegistrationQuery};
use serde::Serialize;
use std::borrow::Cow;

pub const NOTHING_TO_LOOK_UP: &str = "no email or phone number found in the QR code";

/// Identity read from a scanned contact card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScannedCard {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ScannedCard {
    /// Registration lookup for this card. The phone is canonicalized first
    /// so it lines up with stored numbers.
    pub fn to_query(&self, policy: &PhonePolicy) -> Result<RegistrationQuery> {
        let phone = self
            .phone
            .as_deref()
            .map(|raw| policy.normalize(raw).unwrap_or_else(|| raw.to_string()));
        Ok(RegistrationQuery::new(self.email.as_deref(), phone.as_deref())?)
    }
}

pub fn looks_like_vcard(payload: &str) -> bool {
    payload
        .trim_start()
        .get(..11)
        .is_some_and(|head| head.eq_ignore_ascii_case("BEGIN:VCARD"))
}

/// Decodes a QR payload in vCard form.
///
/// Only the first card is read. A card without an email or phone number
/// is rejected since nothing could be looked up.
pub fn parse_scanned_card(payload: &str) -> Result<ScannedCard> {
    let mut card = ScannedCard::default();
    let mut structured_name: Option<String> = None;

    for line in unfold_lines(payload) {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("END:VCARD") {
            break;
        }
        let Some((key, raw_value)) = split_property(trimmed) else {
            continue;
        };

        match key.as_str() {
            "FN" => {
                let value = unescape_vcard_value(&raw_value);
                if card.name.is_none() && !value.trim().is_empty() {
                    card.name = Some(value.trim().to_string());
                }
            }
            "N" => {
                if structured_name.is_none() {
                    structured_name = name_from_components(&raw_value);
                }
            }
            "EMAIL" => {
                if card.email.is_none() {
                    card.email = first_email(&unescape_vcard_value(&raw_value));
                }
            }
            "TEL" => {
                if card.phone.is_none() {
                    card.phone = first_phone(&unescape_vcard_value(&raw_value));
                }
            }
            _ => {}
        }
    }

    if card.name.is_none() {
        card.name = structured_name;
    }
    if card.email.is_none() && card.phone.is_none() {
        return Err(ImportError::Parse(NOTHING_TO_LOOK_UP.to_string()));
    }
    Ok(card)
}

fn first_email(value: &str) -> Option<String> {
    value
        .split(|ch: char| ch.is_whitespace() || matches!(ch, ';' | ',' | '<' | '>'))
        .map(|token| strip_scheme(token, "mailto:"))
        .find(|token| is_valid_email(token))
        .map(str::to_string)
}

/// First run of digits, with an optional leading `+` and the separators
/// people type inside numbers.
fn first_phone(value: &str) -> Option<String> {
    let value = strip_scheme(value.trim(), "tel:");
    let start = value.find(|ch: char| ch.is_ascii_digit() || ch == '+')?;

    let mut number = String::new();
    for ch in value[start..].chars() {
        match ch {
            '+' if number.is_empty() => number.push(ch),
            '0'..='9' => number.push(ch),
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => break,
        }
    }
    if number.chars().any(|ch| ch.is_ascii_digit()) {
        Some(number)
    } else {
        None
    }
}

fn strip_scheme<'a>(value: &'a str, scheme: &str) -> &'a str {
    match value.get(..scheme.len()) {
        Some(head) if head.eq_ignore_ascii_case(scheme) => &value[scheme.len()..],
        _ => value,
    }
}

/// `N:Family;Given;Additional;Prefix;Suffix` rendered as `Given Additional Family`.
fn name_from_components(raw: &str) -> Option<String> {
    let parts: Vec<String> = split_escaped(raw, ';')
        .iter()
        .map(|part| unescape_vcard_value(part).trim().to_string())
        .collect();
    let pick = |index: usize| parts.get(index).filter(|part| !part.is_empty());
    let joined = [pick(1), pick(2), pick(0)]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

fn unfold_lines(input: &str) -> Vec<String> {
    let input = normalize_line_endings(input);
    let mut lines: Vec<String> = Vec::new();
    for line in input.lines() {
        if let Some(rest) = line.strip_prefix([' ', '\t']) {
            if let Some(last) = lines.last_mut() {
                last.push_str(rest);
                continue;
            }
        }
        lines.push(line.to_string());
    }
    lines
}

fn normalize_line_endings(input: &str) -> Cow<'_, str> {
    if !input.contains('\r') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            if matches!(chars.peek(), Some('\n')) {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

/// Property name without group or parameters, uppercased, and the raw value.
fn split_property(line: &str) -> Option<(String, String)> {
    let (left, value) = line.split_once(':')?;
    let mut name = left.split(';').next()?.trim();
    if let Some((_, ungrouped)) = name.rsplit_once('.') {
        name = ungrouped;
    }
    if name.is_empty() {
        return None;
    }
    Some((name.to_ascii_uppercase(), value.to_string()))
}

fn split_escaped(value: &str, separator: char) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut escape = false;

    for ch in value.chars() {
        if escape {
            current.push(ch);
            escape = false;
        } else if ch == '\\' {
            current.push(ch);
            escape = true;
        } else if ch == separator {
            items.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }

    items.push(current);
    items
}

fn unescape_vcard_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n' | 'N' | 'r' | 'R') => out.push('\n'),
            Some(other) => out.push(other),
            None => break,
        }
    }
    out
}
