use std::fmt;

/// Change in the working tree that is not staged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceChangeType {
    Modified,
    Deleted,
}

impl WorkspaceChangeType {
    pub fn label(&self) -> &'static str {
        match self {
            WorkspaceChangeType::Modified => "modified",
            WorkspaceChangeType::Deleted => "deleted",
        }
    }
}

impl fmt::Display for WorkspaceChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.label())
    }
}
