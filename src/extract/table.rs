use super::ExtractError;
use chrono::{Datelike, Days, Month, NaiveDate};
use std::collections::BTreeMap;
use tracing::debug;

/// Table intermédiaire : date → fragments bruts, dans l'ordre du document.
pub(super) type DateEventTable<'a> = BTreeMap<NaiveDate, Vec<&'a str>>;

/// Curseur mois/année local à une passe d'extraction.
#[derive(Debug)]
struct Cursor {
    year: i32,
    month: u32,
    current: Option<NaiveDate>,
}

impl Cursor {
    fn new(year: i32, month: Month) -> Self {
        Self {
            year,
            month: month.number_from_month(),
            current: None,
        }
    }

    /// Positionne le curseur sur le jour `day`. Un jour déjà présent dans la
    /// table signale un changement de mois : la valeur lue devient alors un
    /// décalage en jours depuis le jour précédent, même resté sans entrée.
    fn advance(&mut self, day: u32, table: &DateEventTable<'_>) -> Result<(), ExtractError> {
        let candidate =
            NaiveDate::from_ymd_opt(self.year, self.month, day).ok_or(ExtractError::InvalidDay {
                year: self.year,
                month: self.month,
                day,
            })?;

        if !table.contains_key(&candidate) {
            self.current = Some(candidate);
            return Ok(());
        }

        let from = self.current.unwrap_or(candidate);
        let rolled = from
            .checked_add_days(Days::new(u64::from(day)))
            .ok_or(ExtractError::DateOverflow { from, days: day })?;
        debug!(%from, %rolled, day, "repeated day marker, rolling over");
        self.year = rolled.year();
        self.month = rolled.month();
        self.current = Some(rolled);
        Ok(())
    }

    fn record<'a>(&self, fragment: &'a str, table: &mut DateEventTable<'a>) -> Result<(), ExtractError> {
        let date = self
            .current
            .ok_or_else(|| ExtractError::OrphanFragment(fragment.to_string()))?;
        table.entry(date).or_default().push(fragment);
        Ok(())
    }
}

/// Parcourt le corps et regroupe les fragments par date.
pub(super) fn build_table<S: AsRef<str>>(
    body: &[S],
    year: i32,
    month: Month,
) -> Result<DateEventTable<'_>, ExtractError> {
    let mut table = DateEventTable::new();
    let mut cursor = Cursor::new(year, month);

    for fragment in body {
        let fragment = fragment.as_ref();
        match parse_day_marker(fragment)? {
            Some(day) => cursor.advance(day, &table)?,
            None => cursor.record(fragment, &mut table)?,
        }
    }

    Ok(table)
}

/// `Some(jour)` pour un entier positif ou nul, `None` pour tout autre texte.
fn parse_day_marker(fragment: &str) -> Result<Option<u32>, ExtractError> {
    let fragment = fragment.trim();
    if fragment.is_empty() || !fragment.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    fragment
        .parse()
        .map(Some)
        .map_err(|_| ExtractError::InvalidDayMarker(fragment.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_markers() {
        assert_eq!(parse_day_marker("1"), Ok(Some(1)));
        assert_eq!(parse_day_marker("031"), Ok(Some(31)));
        assert_eq!(parse_day_marker("Smith"), Ok(None));
        assert_eq!(parse_day_marker("-1"), Ok(None));
        assert_eq!(parse_day_marker("1st"), Ok(None));
        assert!(parse_day_marker("99999999999").is_err());
    }

    #[test]
    fn consecutive_markers_without_fragments_leave_no_entry() {
        let body = ["1", "A", "B", "2", "3", "C", "D"];
        let table = build_table(&body, 2021, Month::March).unwrap();
        let dates: Vec<_> = table.keys().map(|d| d.day()).collect();
        assert_eq!(dates, vec![1, 3]);
    }

    #[test]
    fn rollover_moves_year_and_month() {
        let body = ["1", "A", "B", "30", "C", "D", "31", "E", "F", "1", "G", "H", "2", "I", "J"];
        let table = build_table(&body, 2021, Month::December).unwrap();
        let dates: Vec<_> = table.keys().map(|d| d.to_string()).collect();
        assert_eq!(
            dates,
            vec!["2021-12-01", "2021-12-30", "2021-12-31", "2022-01-01", "2022-01-02"]
        );
    }

    #[test]
    fn rollover_counts_from_an_empty_last_day() {
        let body = ["1", "A", "B", "30", "C", "D", "31", "1", "E", "F"];
        let table = build_table(&body, 2021, Month::January).unwrap();
        let dates: Vec<_> = table.keys().map(|d| d.to_string()).collect();
        assert_eq!(dates, vec!["2021-01-01", "2021-01-30", "2021-02-01"]);
    }
}
