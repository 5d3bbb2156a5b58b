//! Drives a [`JobQueue`] from a stream of command lines.
use std::io;

use serde::Serialize;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument, trace, warn};

use crate::line_reader::LineReader;
use crate::parser::{is_blank, parse_header};
use crate::queue::{JobQueue, Modified, Promoted, QueueError};
use crate::types::command::{Command, SortOrder};
use crate::types::job::Job;
use crate::types::render::Render;
use crate::types::response::Response;
use crate::util::bytes_to_human_str;

/// Counters describing one run, reported by `--stats`.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize)]
pub struct RunStats {
    /// operation count stated on the first line, if it parsed
    #[serde(rename = "declared-operations")]
    pub declared_operations: Option<u64>,
    /// lines read, including the first and any blank ones
    #[serde(rename = "lines-read")]
    pub lines_read: u64,
    /// lines that parsed into a command
    #[serde(rename = "commands-executed")]
    pub commands_executed: u64,
    pub enqueued: u64,
    /// successful dequeues only
    pub dequeued: u64,
    /// dequeues attempted against an empty queue
    #[serde(rename = "empty-dequeues")]
    pub empty_dequeues: u64,
    /// `C` commands that found their job, whether or not the change applied
    pub modified: u64,
    /// `P` commands that moved a job
    pub promoted: u64,
    /// `C` and `P` commands naming a job that isn't queued
    #[serde(rename = "not-found")]
    pub not_found: u64,
    #[serde(rename = "rejected-attributes")]
    pub rejected_attributes: u64,
    #[serde(rename = "parse-errors")]
    pub parse_errors: u64,
    /// whether the run stopped at an empty dequeue
    pub halted: bool,
}

/// The stats plus whatever is left in the queue.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    #[serde(flatten)]
    pub stats: &'a RunStats,
    #[serde(rename = "current-jobs")]
    pub current_jobs: usize,
    pub jobs: &'a [Job],
}

#[derive(Debug, Default)]
pub struct Interpreter {
    queue: JobQueue<Job>,
    stats: RunStats,
    halt_on_empty: bool,
}

impl Interpreter {
    pub fn new(halt_on_empty: bool) -> Self {
        Self {
            halt_on_empty,
            ..Default::default()
        }
    }

    pub fn queue(&self) -> &JobQueue<Job> {
        &self.queue
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn summary(&self) -> RunSummary<'_> {
        RunSummary {
            stats: &self.stats,
            current_jobs: self.queue.len(),
            jobs: self.queue.jobs(),
        }
    }

    /// Applies one command to the queue. Only a dequeue from an empty queue
    /// fails; every other anomaly is reported in the response.
    pub fn execute(&mut self, cmd: Command) -> Result<Response, QueueError> {
        use Command::*;

        self.stats.commands_executed += 1;

        let resp = match cmd {
            Add {
                id,
                priority,
                job_type,
                cpu_time,
                memory,
            } => {
                self.stats.enqueued += 1;
                let job = Job::new(id, priority, job_type, cpu_time, memory);
                Response::Enqueued(self.queue.enqueue(job).clone())
            },
            Remove => match self.queue.dequeue() {
                Ok(job) => {
                    self.stats.dequeued += 1;
                    Response::Dequeued(job)
                },
                Err(error) => {
                    self.stats.empty_dequeues += 1;
                    return Err(error);
                },
            },
            Change {
                id,
                attribute,
                value,
            } => match self.queue.modify_job(id, attribute, value) {
                Modified::Found { record, rejected } => {
                    self.stats.modified += 1;
                    if let Some(error) = rejected {
                        self.stats.rejected_attributes += 1;
                        warn!(id, attribute, value, %error, "change rejected");
                    }
                    Response::Changed {
                        id,
                        attribute,
                        value,
                        rejected,
                        job: record.clone(),
                    }
                },
                Modified::NotFound => {
                    self.stats.not_found += 1;
                    warn!(id, "cannot change unknown job");
                    Response::NotFound { id }
                },
            },
            Promote { id, positions } => {
                match self.queue.promote_job(id, positions) {
                    Promoted::Moved { record, index } => {
                        self.stats.promoted += 1;
                        debug!(id, positions, index, "promoted");
                        Response::Promoted {
                            id,
                            positions,
                            job: record.clone(),
                        }
                    },
                    Promoted::OutOfRange => {
                        debug!(id, positions, "promotion out of range");
                        Response::Unmoved
                    },
                    Promoted::NotFound => {
                        self.stats.not_found += 1;
                        warn!(id, "cannot promote unknown job");
                        Response::NotFound { id }
                    },
                }
            },
            Display => Response::Listing(self.queue.jobs().to_vec()),
            Sort { order } => {
                match order {
                    SortOrder::ById => self.queue.sort_by_id(),
                    SortOrder::ByPriority => self.queue.sort_by_priority(),
                    SortOrder::Unrecognised(option) => {
                        warn!(option, "unrecognised sort option, not sorting")
                    },
                };
                Response::Sorted(self.queue.jobs().to_vec())
            },
            Length => Response::QueueSize(self.queue.len()),
            Reorder => Response::Reordered(self.queue.reorder().to_vec()),
        };

        Ok(resp)
    }

    /// Reads the operation count line, then executes each following line in
    /// turn, writing responses to `out`. Returns early without error if
    /// `cancel` fires between lines.
    #[instrument(skip_all)]
    pub async fn run<R, W>(
        &mut self,
        lines: &mut LineReader<R>,
        out: &mut W,
        cancel: &CancellationToken,
    ) -> io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        // Cancellation is checked first so a ready input can't starve it.
        let header = select!(
            biased;
            _ = cancel.cancelled() => return Ok(()),
            x = lines.read_line() => x?,
        );

        if let Some(header) = header {
            self.stats.lines_read += 1;
            match parse_header(&header) {
                Ok(n) => self.stats.declared_operations = Some(n),
                Err(error) => warn!(
                    %error,
                    line = bytes_to_human_str(&header),
                    "ignoring malformed operation count"
                ),
            }
        }

        out.write_all(&Response::Start.render()).await?;

        loop {
            let line = select!(
                biased;
                _ = cancel.cancelled() => break,
                x = lines.read_line() => match x? {
                    Some(x) => x,
                    None => break,
                },
            );
            self.stats.lines_read += 1;

            trace!(line = bytes_to_human_str(&line), "processing command");

            if is_blank(&line) {
                continue;
            }

            let cmd = match Command::try_from(&line as &[u8]) {
                Ok(cmd) => cmd,
                Err(error) => {
                    self.stats.parse_errors += 1;
                    warn!(
                        %error,
                        line = bytes_to_human_str(&line),
                        "skipping line"
                    );
                    continue;
                },
            };

            match self.execute(cmd) {
                Ok(resp) => out.write_all(&resp.render()).await?,
                Err(error) => {
                    error!(%error, "dequeue failed");
                    if self.halt_on_empty {
                        self.stats.halted = true;
                        break;
                    }
                },
            }
        }

        out.flush().await?;

        if let Some(declared) = self.stats.declared_operations {
            if declared != self.stats.commands_executed {
                debug!(
                    declared,
                    executed = self.stats.commands_executed,
                    "operation count differs from commands executed"
                );
            }
        }

        Ok(())
    }
}
