/// A single line of the input, after parsing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    /// Enqueues a new job at the tail.
    ///
    /// In the input: `A <id> <priority> <job type> <cpu time> <memory>`
    Add {
        id: i64,
        priority: i64,
        job_type: i64,
        cpu_time: u64,
        memory: u64,
    },
    /// Swaps the job with the one `positions` places nearer the head, if there
    /// is one.
    ///
    /// In the input: `P <id> <positions>`
    Promote { id: i64, positions: i64 },
    /// Sets one attribute of a job. See
    /// [`Attribute`](super::job::Attribute) for the codes.
    ///
    /// In the input: `C <id> <attribute> <value>`
    Change { id: i64, attribute: i64, value: i64 },
    /// Dequeues the job at the head.
    ///
    /// In the input: `R`
    Remove,
    /// Lists the queue head to tail.
    ///
    /// In the input: `D`
    Display,
    /// Sorts the queue then lists it.
    ///
    /// In the input: `O <1|2>`
    Sort { order: SortOrder },
    /// Reports the number of jobs in the queue.
    ///
    /// In the input: `L`
    Length,
    /// Sorts by priority then lists the queue.
    ///
    /// In the input: `N`
    Reorder,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortOrder {
    ById,
    ByPriority,
    /// Any other option. The queue is listed without sorting.
    Unrecognised(i64),
}

impl From<i64> for SortOrder {
    fn from(option: i64) -> Self {
        match option {
            1 => Self::ById,
            2 => Self::ByPriority,
            other => Self::Unrecognised(other),
        }
    }
}
