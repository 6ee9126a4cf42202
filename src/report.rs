use std::path::Path;

/// a single pending change as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub file_name: String,
    pub file_path: String,
    pub action_kind: String, // backend verb: "add", "edit", "delete", "rename", ...
}

impl ChangeRecord {
    pub fn new(file_path: &str, action_kind: &str) -> Self {
        // display name is the path leaf; fall back to the full path when
        // there is no leaf to take
        let file_name = Path::new(file_path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.to_string());

        Self {
            file_name,
            file_path: file_path.to_string(),
            action_kind: action_kind.to_string(),
        }
    }
}

/// the backend's answer to one status query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub has_pending_changes: bool,
    /// human-readable summary, only meaningful when nothing is pending
    pub message: String,
    /// changes already tracked by the index, in backend report order
    pub included_changes: Vec<ChangeRecord>,
    /// on-disk changes the index does not track yet
    pub detected_changes: Vec<ChangeRecord>,
}

impl StatusReport {
    pub fn clean(message: &str) -> Self {
        Self {
            has_pending_changes: false,
            message: message.to_string(),
            included_changes: Vec::new(),
            detected_changes: Vec::new(),
        }
    }

    pub fn pending(
        included_changes: Vec<ChangeRecord>,
        detected_changes: Vec<ChangeRecord>,
    ) -> Self {
        Self {
            has_pending_changes: true,
            message: String::new(),
            included_changes,
            detected_changes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_path_leaf() {
        let record = ChangeRecord::new("src/deeply/nested/mod.rs", "edit");
        assert_eq!(record.file_name, "mod.rs");
        assert_eq!(record.file_path, "src/deeply/nested/mod.rs");
    }

    #[test]
    fn file_name_of_bare_path_is_itself() {
        let record = ChangeRecord::new("README.md", "add");
        assert_eq!(record.file_name, "README.md");
    }
}
