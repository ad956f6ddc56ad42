use crate::analysis::{AnalysisResult, Label};
use crate::config::HistoryConfig;
use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanKind {
    Email,
    Url,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub timestamp: DateTime<Local>,
    #[serde(rename = "type")]
    pub kind: ScanKind,
    pub content: String,
    pub score: u32,
    pub label: Label,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanSummary {
    pub email_count: usize,
    pub url_count: usize,
    /// Newest first
    pub recent_scans: Vec<ScanRecord>,
}

/// Append-only scan log kept as a single JSON array on disk.
///
/// Every append rewrites the whole file; there are no durability guarantees.
pub struct ScanHistory {
    path: PathBuf,
    preview_chars: usize,
    recent_limit: usize,
    write_lock: Mutex<()>,
}

impl ScanHistory {
    pub fn new(config: &HistoryConfig) -> Self {
        Self {
            path: PathBuf::from(&config.path),
            preview_chars: config.preview_chars,
            recent_limit: config.recent_limit,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored records, oldest first. A missing or unreadable file reads as empty.
    pub fn load(&self) -> Vec<ScanRecord> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return Vec::new(),
        };

        match serde_json::from_str(&content) {
            Ok(records) => records,
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable scan history {}: {e}",
                    self.path.display()
                );
                Vec::new()
            }
        }
    }

    pub fn record(
        &self,
        kind: ScanKind,
        input: &str,
        result: &AnalysisResult,
    ) -> Result<ScanRecord> {
        let content = match kind {
            ScanKind::Email => preview(input, self.preview_chars),
            ScanKind::Url => input.to_string(),
        };
        let record = ScanRecord {
            timestamp: Local::now(),
            kind,
            content,
            score: result.score,
            label: result.label,
            reasons: result.reasons.clone(),
        };

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("scan history lock poisoned"))?;

        let mut records = self.load();
        records.push(record.clone());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create history directory: {}", parent.display())
            })?;
        }
        let json = serde_json::to_string_pretty(&records)?;
        std::fs::write(&self.path, json).with_context(|| {
            format!("Failed to write scan history: {}", self.path.display())
        })?;

        log::debug!("Recorded {:?} scan in {}", kind, self.path.display());
        Ok(record)
    }

    /// Scan counts for `day` plus the most recent records.
    pub fn summary(&self, day: NaiveDate) -> ScanSummary {
        let records = self.load();

        let today = records
            .iter()
            .filter(|r| r.timestamp.date_naive() == day);
        let (email_count, url_count) = today.fold((0, 0), |(e, u), r| match r.kind {
            ScanKind::Email => (e + 1, u),
            ScanKind::Url => (e, u + 1),
        });

        let recent_scans = records
            .iter()
            .rev()
            .take(self.recent_limit)
            .cloned()
            .collect();

        ScanSummary {
            email_count,
            url_count,
            recent_scans,
        }
    }
}

/// First `limit` characters of `text`, with `...` appended when cut.
pub fn preview(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let head: String = text.chars().take(limit).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
