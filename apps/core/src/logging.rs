use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing_subscriber::EnvFilter;

use crate::config::Config;

const LOG_FILE_NAME: &str = "cardsearch.log";
const ARCHIVE_PREFIX: &str = "cardsearch-";
const MAX_LOG_BYTES: u64 = 1_000_000;
const MAX_ARCHIVES: usize = 5;

static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to prepare log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("a global subscriber is already installed")]
    AlreadyInstalled,
}

pub fn init(cfg: &Config) -> Result<(), LoggingError> {
    fs::create_dir_all(&cfg.log_dir)?;
    let log_path = cfg.log_dir.join(LOG_FILE_NAME);
    rotate_if_needed(&log_path, &cfg.log_dir)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(cfg.log_level.to_ascii_lowercase())?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|_| LoggingError::AlreadyInstalled)?;

    install_panic_hook();
    Ok(())
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn rotate_if_needed(log_path: &Path, log_dir: &Path) -> Result<(), std::io::Error> {
    rotate_at(log_path, log_dir, now_secs())
}

fn rotate_at(log_path: &Path, log_dir: &Path, stamp: u64) -> Result<(), std::io::Error> {
    let size = match fs::metadata(log_path) {
        Ok(meta) => meta.len(),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };
    if size < MAX_LOG_BYTES {
        return Ok(());
    }

    fs::rename(log_path, free_archive_path(log_dir, stamp))?;
    prune_old_archives(log_dir)
}

/// `cardsearch-<stamp>-<seq>.log`, bumping `seq` until the name is unused so
/// rotations within the same second never overwrite each other.
fn free_archive_path(log_dir: &Path, stamp: u64) -> PathBuf {
    (0u32..)
        .map(|seq| log_dir.join(format!("{ARCHIVE_PREFIX}{stamp}-{seq}.log")))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| log_dir.join(format!("{ARCHIVE_PREFIX}{stamp}.log")))
}

/// Sort key for archive names; a missing `-seq` counts as 0.
fn archive_order(file_name: &str) -> Option<(u64, u32)> {
    let body = file_name
        .strip_prefix(ARCHIVE_PREFIX)?
        .strip_suffix(".log")?;
    match body.split_once('-') {
        Some((stamp, seq)) => Some((stamp.parse().ok()?, seq.parse().ok()?)),
        None => Some((body.parse().ok()?, 0)),
    }
}

fn prune_old_archives(log_dir: &Path) -> Result<(), std::io::Error> {
    let mut archives: Vec<((u64, u32), PathBuf)> = fs::read_dir(log_dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let order = archive_order(entry.file_name().to_str()?)?;
            Some((order, entry.path()))
        })
        .collect();

    archives.sort_by_key(|(order, _)| *order);
    let excess = archives.len().saturating_sub(MAX_ARCHIVES);
    for (_, oldest) in archives.drain(..excess) {
        let _ = fs::remove_file(oldest);
    }
    Ok(())
}

fn panic_payload(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "panic payload unavailable"
    }
}

fn install_panic_hook() {
    let _ = PANIC_HOOK_INSTALLED.get_or_init(|| {
        let prior = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let location = info
                .location()
                .map_or_else(|| "unknown".to_string(), |l| format!("{}:{}", l.file(), l.line()));
            tracing::error!(%location, payload = panic_payload(info.payload()), "panic");
            prior(info);
        }));
    });
}
