#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::Parser;
use dutycal::{config, io, CsvSerializer, IcsSerializer, ScheduleExtractor, Selector};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Convertit un planning de garde mensuel en CSV ou iCalendar.
#[derive(Parser, Debug)]
#[command(author, version, about, after_help = "Ex: dutycal -f dec.doc -p Tanaka")]
struct Cli {
    /// Sortie iCalendar (RFC 5545) au lieu du CSV
    #[arg(short, long)]
    ics: bool,

    /// Document source (défaut : entrée standard)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Personne à extraire ; `all` liste tous les événements
    #[arg(short, long)]
    person: Option<String>,

    /// Année de référence (défaut : année courante)
    #[arg(long)]
    year: Option<i32>,

    /// Fichier de configuration TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Active les logs sur stderr (feature `logging`)
    #[arg(long)]
    #[cfg_attr(not(feature = "logging"), allow(dead_code))]
    log: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // une seule ligne de diagnostic
            let message = format!("{err:#}");
            let message: Vec<&str> = message
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect();
            eprintln!("ERROR: {}", message.join(" "));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("resolving working directory")?;
    let settings = config::load_or_init(cli.config.as_deref(), &cwd)?;
    let opts = settings.extract_options(cli.year.unwrap_or_else(|| Local::now().year()))?;
    let tz = settings.timezone()?;
    let selector = Selector::from(cli.person.as_deref().unwrap_or(&settings.core.person));

    let raw = read_input(cli.file.as_deref())?;
    let fragments = io::read_fragments(&raw, &settings.core.file_start)?;
    let records = ScheduleExtractor::new(opts).extract(&fragments)?;

    let output = if cli.ics {
        IcsSerializer::new(tz).render(&records, &selector)?
    } else {
        CsvSerializer::new().render(&records, &selector)?
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Lit le document (fichier ou stdin) ; les octets non UTF-8 sont remplacés.
fn read_input(path: Option<&Path>) -> Result<String> {
    let bytes = match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("reading standard input")?;
            buf
        }
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
