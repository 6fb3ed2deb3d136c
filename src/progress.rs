use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::output;

#[derive(Debug, Clone, Serialize)]
pub struct ProgressEntry {
    pub timestamp: DateTime<Utc>,
    pub phase: Phase,
    pub level: ProgressLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    Availability,
    PreScans,
    PostScans,
    Tests,
    Results,
    Testcase,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProgressLevel {
    Info,
    Success,
    Failure,
    Warn,
}

/// Incremental progress of one orchestrator run.
///
/// Every entry is kept in order so callers can inspect what was reported;
/// when `echo` is set each entry is also printed to the terminal as it
/// arrives.
pub struct ProgressLog {
    echo: bool,
    phase: RwLock<Phase>,
    entries: RwLock<Vec<ProgressEntry>>,
}

impl ProgressLog {
    pub fn new(echo: bool) -> Self {
        Self {
            echo,
            phase: RwLock::new(Phase::Setup),
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Record without printing.
    pub fn quiet() -> Self {
        Self::new(false)
    }

    pub fn console() -> Self {
        Self::new(true)
    }

    /// Switch to `phase` and announce it.
    pub async fn enter(&self, phase: Phase, message: impl Into<String>) {
        *self.phase.write().await = phase;
        self.emit(ProgressLevel::Info, message).await;
    }

    pub async fn phase(&self) -> Phase {
        *self.phase.read().await
    }

    pub async fn emit(&self, level: ProgressLevel, message: impl Into<String>) {
        let entry = ProgressEntry {
            timestamp: Utc::now(),
            phase: self.phase().await,
            level,
            message: message.into(),
        };
        debug!(phase = ?entry.phase, level = ?entry.level, "{}", entry.message);

        if self.echo {
            match entry.level {
                ProgressLevel::Info => output::plain(&entry.message),
                ProgressLevel::Success => output::success(&entry.message),
                ProgressLevel::Failure => output::failure(&entry.message),
                ProgressLevel::Warn => output::warning(&entry.message),
            }
        }

        self.entries.write().await.push(entry);
    }

    pub async fn info(&self, message: impl Into<String>) {
        self.emit(ProgressLevel::Info, message).await;
    }

    pub async fn success(&self, message: impl Into<String>) {
        self.emit(ProgressLevel::Success, message).await;
    }

    pub async fn failure(&self, message: impl Into<String>) {
        self.emit(ProgressLevel::Failure, message).await;
    }

    pub async fn warn(&self, message: impl Into<String>) {
        self.emit(ProgressLevel::Warn, message).await;
    }

    pub async fn history(&self) -> Vec<ProgressEntry> {
        self.entries.read().await.clone()
    }

    /// Messages logged at `level`, oldest first.
    pub async fn messages(&self, level: ProgressLevel) -> Vec<String> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect()
    }
}

impl Default for ProgressLog {
    fn default() -> Self {
        Self::quiet()
    }
}
