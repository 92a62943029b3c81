use super::ExtractError;
use chrono::Month;

/// Fragment qui ouvre le corps du planning.
pub(super) const FIRST_DAY: &str = "1";

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Coupe au premier fragment exactement égal à `"1"` : (en-tête, corps).
pub(super) fn split_heading<S: AsRef<str>>(fragments: &[S]) -> Result<(&[S], &[S]), ExtractError> {
    let pos = fragments
        .iter()
        .position(|f| f.as_ref() == FIRST_DAY)
        .ok_or(ExtractError::MissingFirstDay)?;
    Ok(fragments.split_at(pos))
}

/// L'année courante en toutes lettres l'emporte ; sinon le premier fragment
/// contenant siècle + décennie est pris tel quel comme année.
pub(super) fn resolve_year<S: AsRef<str>>(heading: &[S], current_year: i32) -> Result<i32, ExtractError> {
    let full = format!("{current_year:04}");
    if heading.iter().any(|f| f.as_ref().contains(&full)) {
        return Ok(current_year);
    }

    let decade = &full[..3];
    let candidate = heading
        .iter()
        .map(|f| f.as_ref().trim())
        .find(|f| f.contains(decade))
        .ok_or(ExtractError::UnresolvedYear(current_year))?;
    candidate
        .parse()
        .map_err(|_| ExtractError::InvalidYear(candidate.to_string()))
}

pub(super) fn resolve_month<S: AsRef<str>>(heading: &[S]) -> Result<Month, ExtractError> {
    heading
        .iter()
        .find_map(|f| month_from_name(f.as_ref()))
        .ok_or(ExtractError::UnresolvedMonth)
}

/// Noms canoniques en majuscules uniquement (`"MARCH"`, pas `"March"`).
fn month_from_name(name: &str) -> Option<Month> {
    MONTHS
        .into_iter()
        .find(|m| m.name().to_ascii_uppercase() == name)
}
