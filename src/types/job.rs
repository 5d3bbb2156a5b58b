use std::fmt;

use serde::Serialize;

use super::record::QueueRecord;

/// Selects which mutable field of a [`Job`] a `C` command targets. The
/// identifier deliberately has no code.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Attribute {
    Priority,
    JobType,
    CpuTimeConsumed,
    MemoryConsumed,
}

impl TryFrom<i64> for Attribute {
    type Error = AttributeError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        use Attribute::*;

        Ok(match code {
            1 => Priority,
            2 => JobType,
            3 => CpuTimeConsumed,
            4 => MemoryConsumed,
            _ => return Err(AttributeError::UnknownAttribute(code)),
        })
    }
}

/// Why a modification was refused. Either way the job is left untouched.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AttributeError {
    UnknownAttribute(i64),
    /// Resource counters can't go below zero.
    NegativeValue { attribute: Attribute, value: i64 },
}

impl fmt::Display for AttributeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::UnknownAttribute(_) => "Invalid attribute",
            Self::NegativeValue { .. } => "Invalid attribute value",
        })
    }
}

impl std::error::Error for AttributeError {}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Job {
    id: i64,
    priority: i64,
    #[serde(rename = "job-type")]
    job_type: i64,
    #[serde(rename = "cpu-time-consumed")]
    cpu_time_consumed: u64,
    #[serde(rename = "memory-consumed")]
    memory_consumed: u64,
}

impl Job {
    pub fn new(
        id: i64,
        priority: i64,
        job_type: i64,
        cpu_time_consumed: u64,
        memory_consumed: u64,
    ) -> Self {
        Self {
            id,
            priority,
            job_type,
            cpu_time_consumed,
            memory_consumed,
        }
    }

    pub fn job_type(&self) -> i64 {
        self.job_type
    }

    pub fn cpu_time_consumed(&self) -> u64 {
        self.cpu_time_consumed
    }

    pub fn memory_consumed(&self) -> u64 {
        self.memory_consumed
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Job ID: {}, Priority: {}, Job Type: {}, CPU Time Consumed: {}, \
             Memory Consumed: {}",
            self.id,
            self.priority,
            self.job_type,
            self.cpu_time_consumed,
            self.memory_consumed,
        )
    }
}

// Job's id, priority and modify_attribute come from here.
impl QueueRecord for Job {
    type Id = i64;
    type Priority = i64;
    type Error = AttributeError;

    fn id(&self) -> i64 {
        self.id
    }

    fn priority(&self) -> i64 {
        self.priority
    }

    /// Sets the field selected by `code` (see [`Attribute`]) to `value`.
    fn modify_attribute(
        &mut self,
        code: i64,
        value: i64,
    ) -> Result<(), AttributeError> {
        use Attribute::*;

        let attribute = Attribute::try_from(code)?;

        let counter = || {
            u64::try_from(value)
                .map_err(|_| AttributeError::NegativeValue { attribute, value })
        };

        match attribute {
            Priority => self.priority = value,
            JobType => self.job_type = value,
            CpuTimeConsumed => self.cpu_time_consumed = counter()?,
            MemoryConsumed => self.memory_consumed = counter()?,
        };

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> Job {
        Job::new(7, 3, 1, 120, 2048)
    }

    #[test]
    fn test_display() {
        assert_eq!(
            job().to_string(),
            "Job ID: 7, Priority: 3, Job Type: 1, CPU Time Consumed: 120, \
             Memory Consumed: 2048"
        );
    }

    #[test]
    fn test_modify_attribute() {
        let mut j = job();

        j.modify_attribute(1, -4).unwrap();
        assert_eq!(j.priority(), -4);

        j.modify_attribute(2, 9).unwrap();
        assert_eq!(j.job_type(), 9);

        j.modify_attribute(3, 0).unwrap();
        assert_eq!(j.cpu_time_consumed(), 0);

        j.modify_attribute(4, 512).unwrap();
        assert_eq!(j.memory_consumed(), 512);

        assert_eq!(j.id(), 7);
    }

    #[test]
    fn test_modify_attribute_rejected() {
        let mut j = job();

        // Codes outside 1..=4, including 0 which would name the identifier.
        for code in [0, 5, -1, i64::MAX] {
            assert_eq!(
                j.modify_attribute(code, 99),
                Err(AttributeError::UnknownAttribute(code))
            );
        }

        assert_eq!(
            j.modify_attribute(3, -1),
            Err(AttributeError::NegativeValue {
                attribute: Attribute::CpuTimeConsumed,
                value: -1,
            })
        );
        assert_eq!(
            j.modify_attribute(4, -1).unwrap_err().to_string(),
            "Invalid attribute value"
        );

        assert_eq!(j, job());
    }
}
