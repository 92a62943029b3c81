use crate::extract::ExtractOptions;
use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

/// Emplacements recherchés (relatifs au répertoire de travail), dans l'ordre.
pub const SEARCH_PATHS: [&str; 2] = [".dutycal/config.toml", "dutycal.toml"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("writing config {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("serializing config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("unknown timezone {0:?}")]
    Timezone(String),
    #[error("invalid {key} {value:?} (expected HH:MM)")]
    Time { key: &'static str, value: String },
}

/// Fichier de configuration complet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub core: CoreSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CoreSettings {
    /// Nom IANA du fuseau des heures du planning.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_call_start")]
    pub call_start: String,
    #[serde(default = "default_call_end")]
    pub call_end: String,
    /// Texte qui marque le début du planning dans le document ; vide = début du fichier.
    #[serde(default)]
    pub file_start: String,
    /// Sélecteur par défaut (`all` ou un nom).
    #[serde(default = "default_person")]
    pub person: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}
fn default_call_start() -> String {
    "16:30".to_string()
}
fn default_call_end() -> String {
    "7:30".to_string()
}
fn default_person() -> String {
    "all".to_string()
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            call_start: default_call_start(),
            call_end: default_call_end(),
            file_start: String::new(),
            person: default_person(),
        }
    }
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Sauvegarde de manière atomique (fichier temporaire puis renommage).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        let text = toml::to_string_pretty(self)?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(write_err)?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(text.as_bytes()).map_err(write_err)?;
        tmp.flush().map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(path).map_err(|err| write_err(err.error))?;
        Ok(())
    }

    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        let name = self.core.timezone.trim();
        name.parse::<Tz>()
            .map_err(|_| ConfigError::Timezone(name.to_string()))
    }

    pub fn call_start(&self) -> Result<NaiveTime, ConfigError> {
        parse_time("call-start", &self.core.call_start)
    }

    pub fn call_end(&self) -> Result<NaiveTime, ConfigError> {
        parse_time("call-end", &self.core.call_end)
    }

    /// Valide les heures d'astreinte et construit les options d'extraction.
    pub fn extract_options(&self, year: i32) -> Result<ExtractOptions, ConfigError> {
        Ok(ExtractOptions::new(year, self.call_start()?, self.call_end()?))
    }
}

fn parse_time(key: &'static str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| ConfigError::Time {
        key,
        value: value.to_string(),
    })
}

/// Charge `explicit` s'il est donné, sinon le premier fichier trouvé dans
/// [`SEARCH_PATHS`] sous `base_dir`. À défaut, les valeurs par défaut sont
/// écrites dans le premier emplacement ; un échec d'écriture n'est pas fatal.
pub fn load_or_init(explicit: Option<&Path>, base_dir: &Path) -> Result<Settings, ConfigError> {
    if let Some(path) = explicit {
        return Settings::load(path);
    }

    for candidate in SEARCH_PATHS.iter().map(|p| base_dir.join(p)) {
        if candidate.is_file() {
            debug!(path = %candidate.display(), "loading config");
            return Settings::load(&candidate);
        }
    }

    let settings = Settings::default();
    let target = base_dir.join(SEARCH_PATHS[0]);
    match settings.save(&target) {
        Ok(()) => debug!(path = %target.display(), "wrote default config"),
        Err(err) => warn!(%err, "could not write default config"),
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_digit_hours_are_accepted() {
        assert_eq!(
            parse_time("call-end", "7:30").unwrap(),
            NaiveTime::from_hms_opt(7, 30, 0).unwrap()
        );
        assert!(parse_time("call-end", "25:00").is_err());
        assert!(parse_time("call-end", "noon").is_err());
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let settings: Settings = toml::from_str("[core]\ntimezone = \"US/Hawaii\"\n").unwrap();
        assert_eq!(settings.core.call_start, "16:30");
        assert_eq!(settings.core.person, "all");
        assert_eq!(settings.timezone().unwrap(), chrono_tz::US::Hawaii);
    }
}
