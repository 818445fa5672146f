//! Run summary: human-readable console output and machine-readable JSON.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use specforge_core::{FailureKind, Outcome, OutcomeStatus};

/// Machine-readable record of one batch run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// When the report was produced.
    pub timestamp: DateTime<Utc>,

    /// Aggregate statistics.
    pub summary: Summary,

    /// Per-spec entries keyed by spec id.
    pub specs: BTreeMap<String, SpecEntry>,
}

/// Aggregate statistics for a batch.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Percentage of successful outcomes.
    pub success_rate: f64,
    /// Mean latency of successful outcomes, in milliseconds.
    pub avg_latency_ms: f64,
    /// Wall-clock duration of the whole batch, in milliseconds.
    pub elapsed_ms: u64,
    /// Specs per second over the whole batch.
    pub throughput_per_sec: f64,
}

/// Per-spec report entry.
#[derive(Debug, Serialize)]
pub struct SpecEntry {
    pub status: &'static str,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunReport {
    /// Build a report from collected outcomes and batch wall-clock time.
    pub fn new(outcomes: &[Outcome], elapsed: Duration) -> Self {
        let total = outcomes.len();
        let successful = outcomes.iter().filter(|o| o.is_success()).count();
        let failed = total - successful;

        let success_rate = if total == 0 {
            0.0
        } else {
            successful as f64 / total as f64 * 100.0
        };
        let avg_latency_ms = if successful == 0 {
            0.0
        } else {
            outcomes
                .iter()
                .filter(|o| o.is_success())
                .map(|o| o.latency_ms as f64)
                .sum::<f64>()
                / successful as f64
        };
        let elapsed_secs = elapsed.as_secs_f64();
        let throughput_per_sec = if elapsed_secs > 0.0 {
            total as f64 / elapsed_secs
        } else {
            0.0
        };

        let specs = outcomes
            .iter()
            .map(|outcome| {
                let entry = match &outcome.status {
                    OutcomeStatus::Success { .. } => SpecEntry {
                        status: "success",
                        latency_ms: outcome.latency_ms,
                        kind: None,
                        error: None,
                    },
                    OutcomeStatus::Failure { kind, message } => SpecEntry {
                        status: "failed",
                        latency_ms: outcome.latency_ms,
                        kind: Some(*kind),
                        error: Some(message.clone()),
                    },
                };
                (outcome.spec_id.as_str().to_string(), entry)
            })
            .collect();

        Self {
            timestamp: Utc::now(),
            summary: Summary {
                total,
                successful,
                failed,
                success_rate,
                avg_latency_ms,
                elapsed_ms: elapsed.as_millis() as u64,
                throughput_per_sec,
            },
            specs,
        }
    }

    /// Print the aggregate summary and, if any, a table of failed specs.
    pub fn print(&self) {
        let s = &self.summary;
        println!("=== Results ===");
        println!("  Total:        {}", s.total);
        println!("  Successful:   {}", s.successful);
        println!("  Failed:       {}", s.failed);
        println!("  Success rate: {:.1}%", s.success_rate);
        println!("  Avg latency:  {:.2} ms", s.avg_latency_ms);
        println!("  Elapsed:      {:.2} s", s.elapsed_ms as f64 / 1000.0);
        println!("  Throughput:   {:.2} specs/s", s.throughput_per_sec);

        if s.failed > 0 {
            println!();
            println!("{:<24}  {:<24}  {}", "SPEC", "FAILURE", "MESSAGE");
            println!("{}", "-".repeat(80));
            for (id, entry) in &self.specs {
                if entry.status == "failed" {
                    let kind = entry
                        .kind
                        .map(|k| k.to_string())
                        .unwrap_or_default();
                    let message = entry.error.as_deref().unwrap_or("");
                    println!("{:<24}  {:<24}  {}", id, kind, message);
                }
            }
        }
    }
}
