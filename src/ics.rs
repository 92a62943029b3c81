use crate::model::{DutyEvent, EventSpan, Record, Selector};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, Component, Event, EventLike, Property};
use thiserror::Error;
use tracing::debug;

/// Identifiant produit (PRODID) du calendrier émis.
pub const PRODUCT_ID: &str = "-//ton-org//dutycal//EN";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IcsError {
    #[error("local time {local} does not exist in timezone {tz}")]
    NonexistentLocalTime { local: NaiveDateTime, tz: Tz },
    #[error("no day after {0}")]
    DateOverflow(NaiveDate),
}

/// Export iCalendar (RFC 5545) : un VCALENDAR, un VEVENT par enregistrement.
#[derive(Debug, Clone, Copy)]
pub struct IcsSerializer {
    tz: Tz,
}

impl IcsSerializer {
    /// `tz` : fuseau dans lequel les heures du planning sont exprimées.
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn render(&self, records: &[Record], selector: &Selector) -> Result<String, IcsError> {
        let mut calendar = Calendar::new();
        calendar.append_property(Property::new("METHOD", "PUBLISH"));

        let pid = std::process::id();
        let mut count = 0usize;
        for event in records.iter().filter_map(|r| r.select(selector)) {
            let uid = unique_id(Utc::now(), pid, count, selector);
            calendar.push(self.component(&event, &uid)?);
            count += 1;
        }
        debug!(events = count, %selector, "calendar built");

        Ok(stamp_product_id(&calendar.to_string()))
    }

    fn component(&self, event: &DutyEvent, uid: &str) -> Result<Event, IcsError> {
        let mut component = Event::new();
        component
            .uid(uid)
            .timestamp(Utc::now())
            .summary(&event.subject);

        match event.span {
            EventSpan::AllDay => {
                let end = event
                    .date
                    .succ_opt()
                    .ok_or(IcsError::DateOverflow(event.date))?;
                component.starts(event.date).ends(end);
            }
            EventSpan::Timed { start, end } => {
                component.starts(self.to_utc(start)?).ends(self.to_utc(end)?);
            }
        }
        Ok(component.done())
    }

    /// Heure locale du planning → UTC. En cas d'ambiguïté (retour à l'heure
    /// d'hiver), la première occurrence est retenue.
    fn to_utc(&self, local: NaiveDateTime) -> Result<DateTime<Utc>, IcsError> {
        self.tz
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or(IcsError::NonexistentLocalTime { local, tz: self.tz })
    }
}

/// Horodatage haute résolution, processus, rang dans l'exécution et sélecteur.
fn unique_id(now: DateTime<Utc>, pid: u32, seq: usize, selector: &Selector) -> String {
    format!("{}-{pid}-{seq}-{selector}", now.format("%Y%m%d%H%M%S%6f"))
}

/// Remplace le PRODID par défaut d'icalendar par le nôtre (un seul PRODID,
/// placé après VERSION s'il manquait).
fn stamp_product_id(ics: &str) -> String {
    let product_line = format!("PRODID:{PRODUCT_ID}\r\n");
    let mut out = String::with_capacity(ics.len() + product_line.len());
    let mut stamped = false;

    for line in ics.split_inclusive('\n') {
        if line.starts_with("PRODID:") {
            if !stamped {
                out.push_str(&product_line);
                stamped = true;
            }
            continue;
        }
        out.push_str(line);
        if !stamped && line.starts_with("VERSION:") {
            out.push_str(&product_line);
            stamped = true;
        }
    }
    out
}
