//! Copies of the league database with a JSON report next to each copy.
//!
//! Backups live in one directory and are named
//! `<prefix>_backup_<YYYYmmdd_HHMMSS>.db`, where the prefix is the database
//! file stem. Only the newest [`KEEP_BACKUPS`] are kept.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use league_persistence_sqlite::TABLES;
use serde::{Deserialize, Serialize};
use sqlx::{
    Connection,
    sqlite::{SqliteConnectOptions, SqliteConnection},
};
use thiserror::Error;

pub const KEEP_BACKUPS: usize = 10;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("database not found: {0}")]
    DatabaseNotFound(PathBuf),
    #[error("backup not found: {0}")]
    BackupNotFound(String),
    #[error("file operation failed on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write report {path}: {source}")]
    Report {
        path: PathBuf,
        source: serde_json::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> BackupError + '_ {
    move |source| BackupError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[derive(Clone, Debug)]
pub struct BackupConfig {
    pub db_path: PathBuf,
    pub backup_dir: PathBuf,
}

impl BackupConfig {
    pub fn new(db_path: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            backup_dir: backup_dir.into(),
        }
    }

    pub fn prefix(&self) -> String {
        self.db_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("league")
            .to_string()
    }

    fn backup_file_name(&self, timestamp: &str) -> String {
        format!("{}_backup_{}.db", self.prefix(), timestamp)
    }

    fn is_backup_file(&self, file_name: &str) -> bool {
        file_name.starts_with(&format!("{}_backup_", self.prefix())) && file_name.ends_with(".db")
    }
}

pub fn report_path(backup_path: &Path) -> PathBuf {
    let stem = backup_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    backup_path.with_file_name(format!("{}_report.json", stem))
}

fn size_mb(bytes: u64) -> f64 {
    (bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackupReport {
    pub timestamp: String,
    pub date: String,
    pub backup_file: String,
    pub file_size_mb: f64,
    pub statistics: BTreeMap<String, i64>,
}

#[derive(Clone, Debug)]
pub struct BackupInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
    pub modified: DateTime<Local>,
}

impl BackupInfo {
    pub fn size_mb(&self) -> f64 {
        size_mb(self.size_bytes)
    }

    fn read(path: PathBuf) -> Result<Self, BackupError> {
        let metadata = std::fs::metadata(&path).map_err(io_error(&path))?;
        let modified = metadata.modified().map_err(io_error(&path))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Ok(Self {
            file_name,
            size_bytes: metadata.len(),
            modified: DateTime::<Local>::from(modified),
            path,
        })
    }
}

#[derive(Debug)]
pub struct CreatedBackup {
    pub info: BackupInfo,
    /// `None` when the report could not be written; the copy itself is kept.
    pub report: Option<BackupReport>,
    pub removed: usize,
}

/// Row count per league table of the database at `path`. A table that cannot
/// be counted reports 0.
pub async fn table_counts(path: &Path) -> BTreeMap<String, i64> {
    let mut counts: BTreeMap<String, i64> =
        TABLES.iter().map(|table| (table.to_string(), 0)).collect();

    let options = SqliteConnectOptions::new().filename(path).read_only(true);
    let mut conn = match SqliteConnection::connect_with(&options).await {
        Ok(conn) => conn,
        Err(e) => {
            log::warn!("Could not open {} for statistics: {}", path.display(), e);
            return counts;
        }
    };

    for table in TABLES {
        match sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&mut conn)
            .await
        {
            Ok(count) => {
                counts.insert(table.to_string(), count);
            }
            Err(e) => log::warn!("Could not count {}: {}", table, e),
        }
    }
    if let Err(e) = conn.close().await {
        log::warn!("Closing {} failed: {}", path.display(), e);
    }
    counts
}

async fn write_report(
    backup: &BackupInfo,
    timestamp: &str,
    now: DateTime<Local>,
) -> Result<BackupReport, BackupError> {
    let report = BackupReport {
        timestamp: timestamp.to_string(),
        date: now.to_rfc3339(),
        backup_file: backup.path.display().to_string(),
        file_size_mb: backup.size_mb(),
        statistics: table_counts(&backup.path).await,
    };
    let path = report_path(&backup.path);
    let json = serde_json::to_string_pretty(&report).map_err(|source| BackupError::Report {
        path: path.clone(),
        source,
    })?;
    std::fs::write(&path, json).map_err(io_error(&path))?;
    Ok(report)
}

/// Copies the database into the backup directory, writes its report and
/// prunes old backups.
pub async fn create_backup(
    config: &BackupConfig,
    now: DateTime<Local>,
) -> Result<CreatedBackup, BackupError> {
    if !config.db_path.exists() {
        return Err(BackupError::DatabaseNotFound(config.db_path.clone()));
    }
    std::fs::create_dir_all(&config.backup_dir).map_err(io_error(&config.backup_dir))?;

    let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
    let backup_path = config.backup_dir.join(config.backup_file_name(&timestamp));
    std::fs::copy(&config.db_path, &backup_path).map_err(io_error(&backup_path))?;
    let info = BackupInfo::read(backup_path)?;
    log::info!("Created backup {}", info.path.display());

    let report = match write_report(&info, &timestamp, now).await {
        Ok(report) => Some(report),
        Err(e) => {
            log::warn!("Backup report skipped: {}", e);
            None
        }
    };

    let removed = match cleanup_old_backups(config, KEEP_BACKUPS) {
        Ok(removed) => removed,
        Err(e) => {
            log::warn!("Cleaning up old backups failed: {}", e);
            0
        }
    };

    Ok(CreatedBackup {
        info,
        report,
        removed,
    })
}

/// Backups in the directory, newest first. A missing directory has none.
pub fn list_backups(config: &BackupConfig) -> Result<Vec<BackupInfo>, BackupError> {
    if !config.backup_dir.exists() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(&config.backup_dir).map_err(io_error(&config.backup_dir))?;

    let mut backups = Vec::new();
    for entry in entries {
        let entry = entry.map_err(io_error(&config.backup_dir))?;
        let is_backup = entry
            .file_name()
            .to_str()
            .is_some_and(|name| config.is_backup_file(name));
        if is_backup {
            backups.push(BackupInfo::read(entry.path())?);
        }
    }
    backups.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| b.file_name.cmp(&a.file_name))
    });
    Ok(backups)
}

/// Deletes every backup after the `keep` newest, with its report. Returns the
/// number of backups removed.
pub fn cleanup_old_backups(config: &BackupConfig, keep: usize) -> Result<usize, BackupError> {
    let mut removed = 0;
    for old in list_backups(config)?.into_iter().skip(keep) {
        if let Err(e) = std::fs::remove_file(&old.path) {
            log::warn!("Could not delete {}: {}", old.path.display(), e);
            continue;
        }
        let report = report_path(&old.path);
        if report.exists() {
            if let Err(e) = std::fs::remove_file(&report) {
                log::warn!("Could not delete {}: {}", report.display(), e);
            }
        }
        removed += 1;
    }
    if removed > 0 {
        log::info!("Removed {} old backups", removed);
    }
    Ok(removed)
}

#[derive(Debug)]
pub struct RestoredBackup {
    /// Copy of the database taken just before it was overwritten.
    pub safety_copy: Option<PathBuf>,
}

/// Replaces the database with the named backup, saving the current database
/// first.
pub fn restore_backup(
    config: &BackupConfig,
    file_name: &str,
    now: DateTime<Local>,
) -> Result<RestoredBackup, BackupError> {
    let backup_path = config.backup_dir.join(file_name);
    if !backup_path.is_file() {
        return Err(BackupError::BackupNotFound(file_name.to_string()));
    }

    let safety_copy = if config.db_path.exists() {
        let path = config.backup_dir.join(format!(
            "{}_before_restore_{}.db",
            config.prefix(),
            now.format(TIMESTAMP_FORMAT)
        ));
        std::fs::copy(&config.db_path, &path).map_err(io_error(&path))?;
        Some(path)
    } else {
        if let Some(parent) = config.db_path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        None
    };

    std::fs::copy(&backup_path, &config.db_path).map_err(io_error(&config.db_path))?;
    log::info!(
        "Restored {} over {}",
        backup_path.display(),
        config.db_path.display()
    );
    Ok(RestoredBackup { safety_copy })
}
