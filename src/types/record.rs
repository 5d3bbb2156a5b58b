use std::fmt;

/// Types implementing QueueRecord can be held in a
/// [`JobQueue`](crate::queue::JobQueue). Display renders the record's full
/// state on a single line.
pub trait QueueRecord: fmt::Display {
    /// Lookup key. Never changed by `modify_attribute`.
    type Id: Copy + Eq + Ord;
    type Priority: Copy + Ord;
    type Error: fmt::Display;

    fn id(&self) -> Self::Id;

    fn priority(&self) -> Self::Priority;

    /// Changes the field selected by `code`. A rejected change must leave the
    /// record untouched.
    fn modify_attribute(
        &mut self,
        code: i64,
        value: i64,
    ) -> Result<(), Self::Error>;
}
