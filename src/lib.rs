#![forbid(unsafe_code)]
//! Dutycal — conversion d'un planning de garde mensuel en agenda.
//!
//! - Entrée : fragments de texte extraits du document (un par cellule).
//! - Extraction : en-tête (année, mois) puis jours, avec détection du passage au mois suivant.
//! - Sortie : CSV (import agenda en ligne) ou iCalendar (RFC 5545).
//! - Configuration explicite (fuseau, heures d'astreinte) ; aucun état global.

pub mod config;
pub mod error;
pub mod extract;
pub mod ics;
pub mod io;
pub mod model;

pub use config::{ConfigError, CoreSettings, Settings};
pub use error::{Error, Result};
pub use extract::{ExtractError, ExtractOptions, RecordError, ScheduleExtractor};
pub use ics::{IcsError, IcsSerializer};
pub use io::{read_fragments, CsvSerializer, RenderError};
pub use model::{DutyEvent, EventSpan, PersonAssignment, Record, Selector};
