use crate::extract::ExtractError;
use crate::model::{Record, Selector, CSV_HEADER};
use csv::{Terminator, WriterBuilder};
use thiserror::Error;

/// Découpe le texte brut d'un document en fragments.
///
/// Séparateurs : `\r`, `\n` et `\x07` (fin de cellule des anciens fichiers
/// Word). Si `begin_marker` n'est pas vide, la lecture commence au premier
/// fragment qui lui est égal. Les fragments contenant des caractères de
/// contrôle ou des octets non UTF-8 (déjà remplacés par U+FFFD) sont écartés, les autres sont nettoyés et les vides ignorés.
pub fn read_fragments(text: &str, begin_marker: &str) -> Result<Vec<String>, ExtractError> {
    let pieces: Vec<&str> = text
        .split(|c: char| matches!(c, '\r' | '\n' | '\u{7}'))
        .collect();

    let begin_marker = begin_marker.trim();
    let start = if begin_marker.is_empty() {
        0
    } else {
        pieces
            .iter()
            .position(|p| p.trim() == begin_marker)
            .ok_or_else(|| ExtractError::MissingBeginMarker(begin_marker.to_string()))?
    };

    Ok(pieces[start..]
        .iter()
        .filter(|p| !p.chars().any(|c| c.is_control() || c == char::REPLACEMENT_CHARACTER))
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .collect())
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("flushing CSV output: {0}")]
    Flush(String),
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Export CSV au format d'import des agendas en ligne (9 colonnes fixes).
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvSerializer;

impl CsvSerializer {
    pub fn new() -> Self {
        Self
    }

    /// En-tête puis une ligne par enregistrement retenu par `selector`.
    pub fn render(&self, records: &[Record], selector: &Selector) -> Result<String, RenderError> {
        let mut w = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        w.write_record(CSV_HEADER)?;
        for event in records.iter().filter_map(|r| r.select(selector)) {
            w.write_record(event.csv_fields())?;
        }
        let bytes = w
            .into_inner()
            .map_err(|err| RenderError::Flush(err.error().to_string()))?;
        Ok(String::from_utf8(bytes)?)
    }
}
