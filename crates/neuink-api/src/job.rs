//! Background parse-job status polling.
//!
//! While a background parse job is outstanding the editor polls its status
//! on a fixed interval until it reaches a terminal state. At most one
//! completion notification fires per job, even if a poll tick and an
//! external progress push race; cancellation stops the loop and drops any
//! in-flight result.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use neuink_model::{Block, PaperContent};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::NeuInkError;

/// Lifecycle of a background parse job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// One status report for a block parse job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockParseStatus {
    pub status: JobStatus,
    /// 0.0 ..= 1.0
    pub progress: f32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_blocks: Option<Vec<Block>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper: Option<PaperContent>,
}

/// Identifies the job being polled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobKey {
    pub owner_id: SmolStr,
    pub section_id: SmolStr,
    pub block_id: SmolStr,
}

/// The status endpoint.
#[trait_variant::make(Send)]
pub trait StatusProbe {
    async fn check_status(&self, key: &JobKey) -> Result<BlockParseStatus, NeuInkError>;
}

/// Repeat-until-terminal poller for one job.
///
/// Share it (e.g. in an `Arc`) between the poll loop and whatever external
/// push channel might also learn about completion; `try_claim_notification`
/// is the once-only guard both sides go through.
pub struct JobPoller {
    interval: Duration,
    cancelled: AtomicBool,
    notified: AtomicBool,
}

impl JobPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            cancelled: AtomicBool::new(false),
            notified: AtomicBool::new(false),
        }
    }

    /// Stop the loop. An in-flight status check is allowed to complete; its
    /// result is dropped.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Claim the single completion notification. Returns true exactly once.
    pub fn try_claim_notification(&self) -> bool {
        !self.notified.swap(true, Ordering::AcqRel)
    }

    /// Poll until the job reaches a terminal state.
    ///
    /// `on_done` fires at most once, with the terminal status, and never
    /// after `cancel()`. A failed status check propagates as an error; the
    /// fixed-interval repeat is repeat-until-terminal, not retry-on-failure.
    pub async fn run<P, F>(&self, probe: &P, key: &JobKey, on_done: F) -> Result<(), NeuInkError>
    where
        P: StatusProbe + Sync,
        F: FnOnce(BlockParseStatus),
    {
        loop {
            if self.is_cancelled() {
                return Ok(());
            }

            let status = probe.check_status(key).await?;

            if self.is_cancelled() {
                return Ok(());
            }

            if status.status.is_terminal() {
                if self.try_claim_notification() {
                    on_done(status);
                } else {
                    tracing::debug!(block_id = %key.block_id, "job already notified, dropping poll result");
                }
                return Ok(());
            }

            tracing::trace!(
                block_id = %key.block_id,
                progress = status.progress,
                "parse job still running"
            );
            tokio::time::sleep(self.interval).await;
        }
    }
}
