//! An ordered, in-memory job queue supporting promotion, modification by ID and
//! re-sorting.
use std::fmt;

use crate::types::record::QueueRecord;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QueueError {
    /// A dequeue was attempted with no jobs in the queue.
    Empty,
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Empty => "Queue is empty",
        })
    }
}

impl std::error::Error for QueueError {}

/// Result of [`JobQueue::modify_job`].
#[derive(Debug, PartialEq)]
pub enum Modified<'a, T: QueueRecord> {
    /// The record was found. `rejected` holds the reason if the record refused
    /// the change, in which case it is unchanged.
    Found {
        record: &'a T,
        rejected: Option<T::Error>,
    },
    NotFound,
}

/// Result of [`JobQueue::promote_job`].
#[derive(Debug, PartialEq)]
pub enum Promoted<'a, T> {
    /// The record now sits at `index`.
    Moved { record: &'a T, index: usize },
    /// The target position lies outside the queue; nothing moved.
    OutOfRange,
    NotFound,
}

/// Holds records in insertion order until re-sorted or promoted. Records are
/// owned by the queue and leave it only through `dequeue`.
#[derive(Debug)]
pub struct JobQueue<T: QueueRecord> {
    jobs: Vec<T>,
}

impl<T: QueueRecord> Default for JobQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: QueueRecord> JobQueue<T> {
    pub fn new() -> Self {
        Self { jobs: Vec::new() }
    }

    /// Appends a record to the tail, returning it as stored.
    pub fn enqueue(&mut self, job: T) -> &T {
        self.jobs.push(job);
        &self.jobs[self.jobs.len() - 1]
    }

    /// Removes the record at the head.
    pub fn dequeue(&mut self) -> Result<T, QueueError> {
        if self.jobs.is_empty() {
            return Err(QueueError::Empty);
        }

        // O(n), but the queue is only ever as long as an input file.
        Ok(self.jobs.remove(0))
    }

    /// Changes one attribute of the first record with the given ID.
    pub fn modify_job(
        &mut self,
        id: T::Id,
        code: i64,
        value: i64,
    ) -> Modified<'_, T> {
        let Some(index) = self.position(id) else {
            return Modified::NotFound;
        };

        let record = &mut self.jobs[index];
        let rejected = record.modify_attribute(code, value).err();

        Modified::Found { record, rejected }
    }

    /// Swaps the first record with the given ID with the one `positions`
    /// places closer to the head. Intervening records don't move.
    ///
    /// A negative `positions` swaps towards the tail instead. If the target
    /// index falls outside the queue, nothing happens.
    pub fn promote_job(
        &mut self,
        id: T::Id,
        positions: i64,
    ) -> Promoted<'_, T> {
        let Some(index) = self.position(id) else {
            return Promoted::NotFound;
        };

        let target = i64::try_from(index)
            .ok()
            .and_then(|i| i.checked_sub(positions))
            .and_then(|t| usize::try_from(t).ok())
            .filter(|t| *t < self.jobs.len());

        match target {
            Some(target) => {
                self.jobs.swap(index, target);
                Promoted::Moved {
                    record: &self.jobs[target],
                    index: target,
                }
            },
            None => Promoted::OutOfRange,
        }
    }

    /// Sorts ascending by ID.
    pub fn sort_by_id(&mut self) {
        self.jobs.sort_by_key(|j| j.id());
    }

    /// Sorts ascending by priority. The sort is stable: equal priorities keep
    /// their relative order.
    pub fn sort_by_priority(&mut self) {
        self.jobs.sort_by_key(|j| j.priority());
    }

    /// Sorts by priority and hands back the result for display.
    pub fn reorder(&mut self) -> &[T] {
        self.sort_by_priority();
        &self.jobs
    }

    /// Index of the first record with the given ID.
    pub fn position(&self, id: T::Id) -> Option<usize> {
        self.jobs.iter().position(|j| j.id() == id)
    }

    pub fn jobs(&self) -> &[T] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

// One line per record, head to tail.
impl<T: QueueRecord> fmt::Display for JobQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for job in &self.jobs {
            writeln!(f, "{job}")?;
        }
        Ok(())
    }
}
