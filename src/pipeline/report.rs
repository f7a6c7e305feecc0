//! Run outcome reporting
//!
//! Aggregates what each sink did during a run and maps the result onto the
//! process exit status.

use crate::feishu::SyncReport;

/// Exit status for runs that aborted before anything was delivered
pub const FATAL_EXIT_CODE: u8 = 1;

/// Exit status for runs where a sink failed in whole or in part
pub const PARTIAL_EXIT_CODE: u8 = 3;

/// Overall status of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Partial,
}

impl RunStatus {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Partial => PARTIAL_EXIT_CODE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial => "partial",
        }
    }
}

/// What happened to the chat card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOutcome {
    Delivered,
    Skipped(String),
    Failed(String),
}

/// What happened to the table sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Synced(SyncReport),
    Skipped(String),
    Failed(String),
}

/// Summary of a run that got past fetch and extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Entries extracted from the page
    pub extracted: usize,

    /// Entries shown on the card
    pub delivered: usize,

    pub notify: SinkOutcome,
    pub sync: SyncOutcome,
}

impl RunReport {
    /// Report for a page that listed no repositories
    pub fn empty() -> Self {
        let reason = "no trending repositories".to_string();
        Self {
            extracted: 0,
            delivered: 0,
            notify: SinkOutcome::Skipped(reason.clone()),
            sync: SyncOutcome::Skipped(reason),
        }
    }

    /// Success only when no sink failed and every row was written
    pub fn status(&self) -> RunStatus {
        let notify_ok = !matches!(self.notify, SinkOutcome::Failed(_));
        let sync_ok = match &self.sync {
            SyncOutcome::Synced(report) => report.is_complete(),
            SyncOutcome::Skipped(_) => true,
            SyncOutcome::Failed(_) => false,
        };

        if notify_ok && sync_ok {
            RunStatus::Success
        } else {
            RunStatus::Partial
        }
    }
}

/// Prints the run report to stdout
pub fn print_report(report: &RunReport) {
    println!("=== Trending Relay Run ===\n");

    println!("Leaderboard:");
    println!("  Entries extracted: {}", report.extracted);
    println!("  Entries on card: {}", report.delivered);
    println!();

    println!("Webhook:");
    match &report.notify {
        SinkOutcome::Delivered => println!("  Card delivered"),
        SinkOutcome::Skipped(reason) => println!("  Skipped ({})", reason),
        SinkOutcome::Failed(error) => println!("  FAILED: {}", error),
    }
    println!();

    println!("Bitable:");
    match &report.sync {
        SyncOutcome::Synced(sync) => {
            println!("  Rows written: {}", sync.written());
            println!("    created: {}", sync.created);
            println!("    updated: {}", sync.updated);
            if !sync.failures.is_empty() {
                println!("  Rows failed ({}):", sync.failures.len());
                for failure in &sync.failures {
                    println!("    - {}: {}", failure.repo, failure.error);
                }
            }
        }
        SyncOutcome::Skipped(reason) => println!("  Skipped ({})", reason),
        SyncOutcome::Failed(error) => println!("  FAILED: {}", error),
    }
    println!();

    println!("Status: {}", report.status().as_str());
}
