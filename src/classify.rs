use crate::report::{ChangeRecord, StatusReport};
use std::collections::HashSet;

/// what selecting a row does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryAction {
    /// remove the file from the next checkin
    Exclude,
    /// bring an excluded file back into the next checkin
    Include,
    /// informational row for an untracked change, carrying the backend verb
    Detected(String),
    /// section headers and separators; selecting one does nothing
    None,
}

/// one row of the picker list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEntry {
    pub label: String,
    pub detail: String,
    pub description: String,
    pub action: EntryAction,
}

const SECTION_RULE: &str =
    "‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾";

impl DisplayEntry {
    fn file(record: &ChangeRecord, action: EntryAction) -> Self {
        Self {
            label: record.file_name.clone(),
            detail: record.file_path.clone(),
            description: record.action_kind.to_uppercase(),
            action,
        }
    }

    fn header(label: &str, hint: &str) -> Self {
        Self {
            label: label.to_string(),
            detail: SECTION_RULE.to_string(),
            description: hint.to_string(),
            action: EntryAction::None,
        }
    }

    fn separator() -> Self {
        Self {
            label: String::new(),
            detail: String::new(),
            description: String::new(),
            action: EntryAction::None,
        }
    }

    pub fn is_header(&self) -> bool {
        self.action == EntryAction::None && !self.label.is_empty()
    }

    pub fn is_separator(&self) -> bool {
        self.action == EntryAction::None && self.label.is_empty()
    }
}

/// partition a status report against the exclusion set into the ordered
/// picker list: included-active section, detected section, excluded section.
/// empty sections contribute no header and no adjacent separator.
pub fn classify(report: &StatusReport, excluded: &HashSet<String>) -> Vec<DisplayEntry> {
    let mut entries = Vec::new();

    // split tracked changes into active and excluded; excluded rows are
    // deferred so they render as their own trailing section
    let mut active = Vec::new();
    let mut excluded_changes = Vec::new();
    for record in &report.included_changes {
        if excluded.contains(&record.file_path) {
            excluded_changes.push(record);
        } else {
            active.push(DisplayEntry::file(record, EntryAction::Exclude));
        }
    }

    if !active.is_empty() {
        entries.push(DisplayEntry::header(
            "◊ INCLUDED CHANGES",
            "⏎ to exclude a file from the next checkin",
        ));
        entries.append(&mut active);
    }

    if !report.detected_changes.is_empty() {
        if !entries.is_empty() {
            entries.push(DisplayEntry::separator());
        }
        entries.push(DisplayEntry::header(
            "◊ DETECTED CHANGES (untracked)",
            "files on disk the index does not track yet",
        ));
        for record in &report.detected_changes {
            entries.push(DisplayEntry::file(
                record,
                EntryAction::Detected(record.action_kind.clone()),
            ));
        }
    }

    if !excluded_changes.is_empty() {
        if !entries.is_empty() {
            entries.push(DisplayEntry::separator());
        }
        entries.push(DisplayEntry::header(
            "◊ EXCLUDED CHANGES",
            "⏎ to include a file in the next checkin",
        ));
        for record in excluded_changes {
            entries.push(DisplayEntry::file(record, EntryAction::Include));
        }
    }

    entries
}
