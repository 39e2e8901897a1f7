//! Task ids.

use core::fmt;

use crate::error::TaskError;

/// Path of a task in the task tree, e.g. `compile solidity`.
///
/// Always has at least one segment and no empty segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId {
    segments: Vec<String>,
}

impl TaskId {
    /// Builds an id from its segments.
    ///
    /// # Errors
    ///
    /// [`TaskError::InvalidTaskId`] if there are no segments or one is empty.
    pub fn new<I, S>(segments: I) -> Result<Self, TaskError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(String::is_empty) {
            return Err(TaskError::InvalidTaskId {
                id: segments.join(" "),
            });
        }
        Ok(Self { segments })
    }

    /// Parses a space-separated path such as `"compile solidity"`.
    ///
    /// # Errors
    ///
    /// [`TaskError::InvalidTaskId`] if `path` contains no segment.
    pub fn parse(path: &str) -> Result<Self, TaskError> {
        Self::new(path.split_whitespace())
    }

    /// The segments, root first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The last segment.
    #[must_use]
    pub fn name(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Returns whether this is a top-level task.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.len() == 1
    }

    /// The id of the enclosing task, or `None` for a top-level task.
    #[must_use]
    pub fn parent(&self) -> Option<TaskId> {
        match self.segments.split_last() {
            Some((_, parent)) if !parent.is_empty() => Some(TaskId {
                segments: parent.to_vec(),
            }),
            _ => None,
        }
    }

    /// The id of sub-task `name` of this task.
    #[must_use]
    pub fn child(&self, name: impl Into<String>) -> TaskId {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        TaskId { segments }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(" "))
    }
}
