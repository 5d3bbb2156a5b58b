use super::job::{AttributeError, Job};
use super::render::Render;

/// Everything the interpreter writes to its output.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Response {
    /// Printed once before the first command.
    Start,
    /// In response to an `A`, the job as inserted.
    Enqueued(Job),
    /// In response to an `R`, the job just removed from the head.
    Dequeued(Job),
    /// In response to a `C` naming a job in the queue. If `rejected` is set,
    /// `job` is unchanged.
    Changed {
        id: i64,
        attribute: i64,
        value: i64,
        rejected: Option<AttributeError>,
        job: Job,
    },
    /// In response to a `P` that moved a job, its new state.
    Promoted { id: i64, positions: i64, job: Job },
    /// In response to a `P` that would move a job past either end. Renders as
    /// nothing at all.
    Unmoved,
    /// In response to a `C` or `P` naming a job that isn't queued.
    NotFound { id: i64 },
    /// In response to a `D`.
    Listing(Vec<Job>),
    /// In response to an `O`.
    Sorted(Vec<Job>),
    /// In response to an `N`.
    Reordered(Vec<Job>),
    /// In response to an `L`.
    QueueSize(usize),
}

fn job_line(job: &Job) -> Vec<u8> {
    format!("{job}\n").into()
}

fn listing(header: Option<&str>, jobs: &[Job]) -> Vec<u8> {
    let mut out: Vec<u8> = header
        .map(|h| format!("{h}\n").into())
        .unwrap_or_default();
    for job in jobs {
        out.extend(job_line(job));
    }
    out
}

impl Render for Response {
    fn render(&self) -> Vec<u8> {
        use Response::*;

        match self {
            Start => b"Start Enqueueing Jobs: \n".to_vec(),
            Enqueued(job) => job_line(job),
            Dequeued(job) => {
                [b"Dequeued Job: \n".to_vec(), job_line(job)].concat()
            },
            Changed {
                id,
                attribute,
                value,
                rejected,
                job,
            } => [
                format!("Changed Job ID {id} field {attribute} to {value}:\n")
                    .into_bytes(),
                rejected
                    .map(|e| format!("{e}\n").into_bytes())
                    .unwrap_or_default(),
                job_line(job),
            ]
            .concat(),
            Promoted { id, positions, job } => [
                format!("Promoted Job ID {id} by {positions} Position(s):\n")
                    .into_bytes(),
                job_line(job),
            ]
            .concat(),
            Unmoved => Vec::new(),
            NotFound { id } => format!(
                "Job with ID {id} not found in the queue (perhaps dequeued).\n"
            )
            .into(),
            Listing(jobs) => listing(None, jobs),
            Sorted(jobs) => {
                listing(Some("List of jobs in sorted order:"), jobs)
            },
            Reordered(jobs) => listing(Some("Reordered Queue:"), jobs),
            QueueSize(n) => {
                format!("Number of elements in the queue: {n}\n").into()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        use Response::*;

        #[track_caller]
        fn renders(resp: Response, expected: &str) {
            assert_eq!(String::from_utf8(resp.render()).unwrap(), expected);
        }

        let job = Job::new(3, 2, 1, 30, 40);
        let line = "Job ID: 3, Priority: 2, Job Type: 1, \
                    CPU Time Consumed: 30, Memory Consumed: 40\n";

        renders(Start, "Start Enqueueing Jobs: \n");
        renders(Enqueued(job.clone()), line);
        renders(Dequeued(job.clone()), &format!("Dequeued Job: \n{line}"));
        renders(
            Changed {
                id: 3,
                attribute: 1,
                value: 2,
                rejected: None,
                job: job.clone(),
            },
            &format!("Changed Job ID 3 field 1 to 2:\n{line}"),
        );
        renders(
            Changed {
                id: 3,
                attribute: 8,
                value: 2,
                rejected: Some(AttributeError::UnknownAttribute(8)),
                job: job.clone(),
            },
            &format!(
                "Changed Job ID 3 field 8 to 2:\nInvalid attribute\n{line}"
            ),
        );
        renders(
            Promoted {
                id: 3,
                positions: 1,
                job: job.clone(),
            },
            &format!("Promoted Job ID 3 by 1 Position(s):\n{line}"),
        );
        renders(Unmoved, "");
        renders(
            NotFound { id: 12 },
            "Job with ID 12 not found in the queue (perhaps dequeued).\n",
        );
        renders(Listing(vec![]), "");
        renders(
            Listing(vec![job.clone(), job.clone()]),
            &format!("{line}{line}"),
        );
        renders(
            Sorted(vec![job.clone()]),
            &format!("List of jobs in sorted order:\n{line}"),
        );
        renders(Reordered(vec![]), "Reordered Queue:\n");
        renders(QueueSize(4), "Number of elements in the queue: 4\n");
    }
}
