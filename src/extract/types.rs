use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

/// Paramètres explicites d'une passe d'extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Année de référence pour retrouver l'année du planning dans l'en-tête.
    pub year: i32,
    pub call_start: NaiveTime,
    pub call_end: NaiveTime,
}

impl ExtractOptions {
    pub fn new(year: i32, call_start: NaiveTime, call_end: NaiveTime) -> Self {
        Self {
            year,
            call_start,
            call_end,
        }
    }
}

/// Séquence de fragments mal formée.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("begin marker {0:?} not found in document")]
    MissingBeginMarker(String),
    #[error("no day marker \"1\" found in document")]
    MissingFirstDay,
    #[error("could not resolve schedule year from heading (current year {0})")]
    UnresolvedYear(i32),
    #[error("invalid year in heading: {0:?}")]
    InvalidYear(String),
    #[error("could not resolve schedule month from heading")]
    UnresolvedMonth,
    #[error("fragment {0:?} appears before any day marker")]
    OrphanFragment(String),
    #[error("invalid day marker {0:?}")]
    InvalidDayMarker(String),
    #[error("day {day} does not exist in {year}-{month:02}")]
    InvalidDay { year: i32, month: u32, day: u32 },
    #[error("rolling over {days} day(s) after {from} leaves the calendar")]
    DateOverflow { from: NaiveDate, days: u32 },
}

/// Journée impossible à résoudre en événements typés.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("{date}: expected at least 2 entries (service, call), found {found}")]
    TooFewEntries { date: NaiveDate, found: usize },
    #[error("{date}: no person in {fragment:?}")]
    EmptyPerson { date: NaiveDate, fragment: String },
    #[error("{date}: invalid call window: {reason}")]
    InvalidCall { date: NaiveDate, reason: String },
}
