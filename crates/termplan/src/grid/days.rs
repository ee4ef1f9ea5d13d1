//! Day-set canonicalization.
//!
//! Solver payloads encode meeting days in three shapes: a native list of
//! day codes, a comma-separated string, or a string containing a serialized
//! JSON array. All three normalize to the same ordered, deduplicated
//! sequence.

use serde::{Deserialize, Serialize};

use crate::solver::DaysField;

/// One of the five weekdays a section can meet.
///
/// The declaration order is the canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayCode {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl DayCode {
    pub const ALL: [DayCode; 5] = [
        DayCode::Mon,
        DayCode::Tue,
        DayCode::Wed,
        DayCode::Thu,
        DayCode::Fri,
    ];

    /// Wire code used by the solver (`M`, `T`, `W`, `Th`, `F`).
    pub fn code(&self) -> &'static str {
        match self {
            DayCode::Mon => "M",
            DayCode::Tue => "T",
            DayCode::Wed => "W",
            DayCode::Thu => "Th",
            DayCode::Fri => "F",
        }
    }

    /// Three-letter display label.
    pub fn label(&self) -> &'static str {
        match self {
            DayCode::Mon => "Mon",
            DayCode::Tue => "Tue",
            DayCode::Wed => "Wed",
            DayCode::Thu => "Thu",
            DayCode::Fri => "Fri",
        }
    }

    /// Parses a single day token. Accepts the wire code, the three-letter
    /// label, and the full weekday name (labels case-insensitively).
    pub fn parse(token: &str) -> Option<DayCode> {
        match token {
            "M" => return Some(DayCode::Mon),
            "T" => return Some(DayCode::Tue),
            "W" => return Some(DayCode::Wed),
            "Th" => return Some(DayCode::Thu),
            "F" => return Some(DayCode::Fri),
            _ => {}
        }

        match token.to_ascii_lowercase().as_str() {
            "mon" | "monday" => Some(DayCode::Mon),
            "tue" | "tuesday" => Some(DayCode::Tue),
            "wed" | "wednesday" => Some(DayCode::Wed),
            "thu" | "thursday" => Some(DayCode::Thu),
            "fri" | "friday" => Some(DayCode::Fri),
            _ => None,
        }
    }
}

/// A normalized day token: either a recognized weekday or an unrecognized
/// token carried through as-is. Unknown tokens are preserved rather than
/// dropped so that bad data stays visible.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DayToken {
    Day(DayCode),
    Other(String),
}

impl DayToken {
    /// Canonical wire form of this token.
    pub fn as_str(&self) -> &str {
        match self {
            DayToken::Day(day) => day.code(),
            DayToken::Other(raw) => raw,
        }
    }

    /// Display form of this token.
    pub fn label(&self) -> &str {
        match self {
            DayToken::Day(day) => day.label(),
            DayToken::Other(raw) => raw,
        }
    }

    pub fn day(&self) -> Option<DayCode> {
        match self {
            DayToken::Day(day) => Some(*day),
            DayToken::Other(_) => None,
        }
    }
}

/// Normalizes a day-set from any wire shape into canonical order.
///
/// Recognized days sort in the fixed `Mon..Fri` order with duplicates
/// removed; unrecognized tokens follow in first-seen order. A missing or
/// empty input yields an empty sequence. Normalization is idempotent:
/// feeding the canonical wire codes back in returns the same sequence.
pub fn normalize_days(raw: Option<&DaysField>) -> Vec<DayToken> {
    let tokens: Vec<String> = match raw {
        None => return Vec::new(),
        Some(DaysField::List(items)) => items.clone(),
        Some(DaysField::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Vec::new();
            }
            // A text field may itself hold a serialized array; try that
            // before falling back to a comma split.
            match serde_json::from_str::<Vec<String>>(trimmed) {
                Ok(items) => items,
                Err(_) => trimmed.split(',').map(str::to_string).collect(),
            }
        }
    };

    canonicalize(&tokens)
}

fn canonicalize(tokens: &[String]) -> Vec<DayToken> {
    let mut seen_days = [false; 5];
    let mut unknown: Vec<String> = Vec::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match DayCode::parse(token) {
            Some(day) => seen_days[day as usize] = true,
            None => {
                if !unknown.iter().any(|u| u == token) {
                    unknown.push(token.to_string());
                }
            }
        }
    }

    let mut out: Vec<DayToken> = DayCode::ALL
        .iter()
        .filter(|day| seen_days[**day as usize])
        .map(|day| DayToken::Day(*day))
        .collect();
    out.extend(unknown.into_iter().map(DayToken::Other));
    out
}

/// Joins normalized tokens into display text for tabular views.
pub fn display_days(tokens: &[DayToken]) -> String {
    if tokens.is_empty() {
        return "TBA".to_string();
    }
    tokens
        .iter()
        .map(DayToken::label)
        .collect::<Vec<_>>()
        .join(", ")
}
