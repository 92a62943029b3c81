mod heading;
mod resolve;
mod table;
mod types;

pub use types::{ExtractError, ExtractOptions, RecordError};

use crate::error::Error;
use crate::model::Record;
use tracing::{debug, info};

/// Extracteur : transforme la séquence de fragments d'un planning mensuel
/// en enregistrements typés.
#[derive(Debug, Clone)]
pub struct ScheduleExtractor {
    opts: ExtractOptions,
}

impl ScheduleExtractor {
    pub fn new(opts: ExtractOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.opts
    }

    /// Extrait les enregistrements, triés par date puis par ordre
    /// d'apparition dans le document. Échoue sans résultat partiel.
    pub fn extract<S: AsRef<str>>(&self, fragments: &[S]) -> Result<Vec<Record>, Error> {
        let (head, body) = heading::split_heading(fragments)?;
        let year = heading::resolve_year(head, self.opts.year)?;
        let month = heading::resolve_month(head)?;
        debug!(year, month = month.number_from_month(), "resolved schedule heading");

        let table = table::build_table(body, year, month)?;
        let records = resolve::resolve_table(&table, &self.opts)?;
        info!(days = table.len(), records = records.len(), "schedule extracted");
        Ok(records)
    }
}
