use crate::config::ConfigError;
use crate::extract::{ExtractError, RecordError};
use crate::ics::IcsError;
use crate::io::RenderError;
use thiserror::Error;

/// Erreur de la bibliothèque ; toutes sont fatales pour une exécution.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error(transparent)]
    Ics(#[from] IcsError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
