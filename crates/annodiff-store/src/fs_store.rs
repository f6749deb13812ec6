//! Filesystem report store
//!
//! One pretty-printed JSON file per session: `<root>/report_<session>.json`.

use crate::atomic::atomic_write;
use crate::errors::{corrupt_report, invalid_session_id, io_error, report_not_found, Result};
use annodiff_core::diff::{to_json_string, Report};
use annodiff_core::{log_op_end, log_op_error, log_op_start};
use annodiff_core_types::SessionId;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

const FILE_PREFIX: &str = "report_";
const FILE_SUFFIX: &str = ".json";

/// Persistence for finished reports, keyed by session
pub trait ReportStore {
    /// Store `report` under `session`, replacing any earlier report
    ///
    /// # Errors
    ///
    /// `Io` or `Serialization` if the report cannot be written.
    fn save(&self, session: &SessionId, report: &Report) -> Result<PathBuf>;

    /// Fetch the report stored under `session`
    ///
    /// # Errors
    ///
    /// `NotFound` if nothing is stored for `session`.
    fn load(&self, session: &SessionId) -> Result<Report>;

    /// Sessions with a stored report, in id order
    ///
    /// # Errors
    ///
    /// `Io` if the store cannot be listed.
    fn list(&self) -> Result<Vec<SessionId>>;
}

/// Parse a user-supplied session id
///
/// # Errors
///
/// `InvalidInput` unless `raw` is a UUID.
pub fn parse_session_id(raw: &str) -> Result<SessionId> {
    SessionId::parse(raw).ok_or_else(|| invalid_session_id(raw))
}

/// Report store rooted at a directory
pub struct FsReportStore {
    root: PathBuf,
}

impl FsReportStore {
    /// Store under `root`; the directory is created on first save
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the report file for `session`
    pub fn report_path(&self, session: &SessionId) -> PathBuf {
        self.root
            .join(format!("{FILE_PREFIX}{}{FILE_SUFFIX}", session.as_str()))
    }

    /// Load by a raw, user-supplied session id
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: `raw` is not a UUID; the filesystem is not touched
    /// - `NotFound`: no report for that session
    pub fn load_by_str(&self, raw: &str) -> Result<Report> {
        self.load(&parse_session_id(raw)?)
    }
}

impl ReportStore for FsReportStore {
    fn save(&self, session: &SessionId, report: &Report) -> Result<PathBuf> {
        log_op_start!("save_report", session_id = session.as_str());
        let start = Instant::now();

        let path = self.report_path(session);
        let result = to_json_string(report)
            .and_then(|json| atomic_write(&path, json.as_bytes()));

        match result {
            Ok(()) => {
                log_op_end!(
                    "save_report",
                    duration_ms = start.elapsed().as_millis() as u64,
                    session_id = session.as_str()
                );
                Ok(path)
            }
            Err(e) => {
                log_op_error!(
                    "save_report",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(e)
            }
        }
    }

    fn load(&self, session: &SessionId) -> Result<Report> {
        let path = self.report_path(session);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(report_not_found(session.as_str()))
            }
            Err(e) => return Err(io_error("load_report", e)),
        };
        serde_json::from_str(&raw)
            .map_err(|e| corrupt_report(session.as_str(), e))
    }

    fn list(&self) -> Result<Vec<SessionId>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("list_reports", e)),
        };

        let mut sessions: Vec<SessionId> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name();
                let name = name.to_str()?;
                let id = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
                SessionId::parse(id)
            })
            .collect();
        sessions.sort();
        Ok(sessions)
    }
}
