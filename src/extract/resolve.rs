use super::table::DateEventTable;
use super::{ExtractOptions, RecordError};
use crate::model::{DutyEvent, PersonAssignment, Record, CALL_SUBJECT, SERVICE_SUBJECT};
use chrono::NaiveDate;
use tracing::debug;

/// Transforme chaque journée de la table en enregistrements typés,
/// dans l'ordre croissant des dates.
pub(super) fn resolve_table(
    table: &DateEventTable<'_>,
    opts: &ExtractOptions,
) -> Result<Vec<Record>, RecordError> {
    let mut out = Vec::new();
    for (date, fragments) in table {
        resolve_day(*date, fragments, opts, &mut out)?;
    }
    Ok(out)
}

fn resolve_day(
    date: NaiveDate,
    fragments: &[&str],
    opts: &ExtractOptions,
    out: &mut Vec<Record>,
) -> Result<(), RecordError> {
    let [service, call, others @ ..] = fragments else {
        return Err(RecordError::TooFewEntries {
            date,
            found: fragments.len(),
        });
    };
    debug!(%date, entries = fragments.len(), "resolving day");

    out.push(assign(date, service, service, DutyEvent::all_day(SERVICE_SUBJECT, date))?);

    let call_event = DutyEvent::overnight(CALL_SUBJECT, date, opts.call_start, opts.call_end)
        .map_err(|reason| RecordError::InvalidCall { date, reason })?;
    out.push(assign(date, call, call, call_event)?);

    for fragment in others {
        out.push(resolve_extra(date, fragment)?);
    }
    Ok(())
}

/// `"Backup: Lee"` donne une assignation, tout autre texte un événement seul.
fn resolve_extra(date: NaiveDate, fragment: &str) -> Result<Record, RecordError> {
    match fragment.split_once(':') {
        Some((label, person)) => assign(
            date,
            fragment,
            person.trim(),
            DutyEvent::all_day(label.trim(), date),
        ),
        None => Ok(Record::Event(DutyEvent::all_day(fragment, date))),
    }
}

fn assign(
    date: NaiveDate,
    fragment: &str,
    person: &str,
    event: DutyEvent,
) -> Result<Record, RecordError> {
    PersonAssignment::new(person, event)
        .map(Record::Assignment)
        .map_err(|_| RecordError::EmptyPerson {
            date,
            fragment: fragment.to_string(),
        })
}
