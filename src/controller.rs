use crate::classify::{DisplayEntry, EntryAction, classify};
use crate::report::StatusReport;
use anyhow::Result;
use std::collections::HashSet;
use std::path::PathBuf;

/// version-control backend: one status query per cycle
pub trait VcsBackend {
    fn status(&self, itemspec: &[PathBuf], recursive: bool) -> Result<StatusReport>;
}

/// persisted per-file exclusion set, read fresh every cycle
pub trait ExclusionStore {
    fn list(&self) -> Vec<String>;
    fn exclude(&mut self, path: &str) -> Result<()>;
    fn include(&mut self, path: &str) -> Result<()>;
}

/// single-selection list prompt; `None` means the user cancelled
pub trait Picker {
    fn pick(&self, entries: &[DisplayEntry]) -> Result<Option<usize>>;
}

/// transient status line plus error/info reporting
pub trait Notifier {
    fn set_status(&self, text: Option<&str>);
    fn show_error(&self, text: &str);
    fn show_info(&self, text: &str);
}

/// where a cycle stands between querying the backend and acting on the
/// user's selection; Failed and Clean are terminal
enum CycleState {
    Querying,
    Listing(StatusReport),
    Failed(String),
    Clean(String),
}

fn on_backend_result(result: Result<StatusReport>) -> CycleState {
    match result {
        Err(e) => CycleState::Failed(e.to_string()),
        Ok(report) if !report.has_pending_changes => CycleState::Clean(report.message),
        Ok(report) => CycleState::Listing(report),
    }
}

pub struct StatusController<'a> {
    backend: &'a dyn VcsBackend,
    store: &'a mut dyn ExclusionStore,
    picker: &'a dyn Picker,
    notifier: &'a dyn Notifier,
}

impl<'a> StatusController<'a> {
    pub fn new(
        backend: &'a dyn VcsBackend,
        store: &'a mut dyn ExclusionStore,
        picker: &'a dyn Picker,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            backend,
            store,
            picker,
            notifier,
        }
    }

    /// run status cycles until the backend fails or reports a clean
    /// workspace; every user selection loops back into a fresh query
    pub fn run(&mut self, itemspec: &[PathBuf], recursive: bool) {
        let mut state = CycleState::Querying;
        loop {
            state = match state {
                CycleState::Querying => {
                    self.notifier.set_status(Some("listing pending changes..."));
                    let next = on_backend_result(self.backend.status(itemspec, recursive));
                    if !matches!(next, CycleState::Failed(_)) {
                        self.notifier.set_status(Some("pending changes listed"));
                    }
                    next
                }
                CycleState::Listing(report) => self.present(&report),
                CycleState::Failed(message) => {
                    self.notifier.set_status(None);
                    self.notifier.show_error(&message);
                    return;
                }
                CycleState::Clean(message) => {
                    self.notifier.set_status(None);
                    self.notifier.show_info(&message);
                    return;
                }
            };
        }
    }

    /// classify against a fresh exclusion snapshot, prompt, and apply the
    /// selection; anything but an actionable row is a no-op requery
    fn present(&mut self, report: &StatusReport) -> CycleState {
        let excluded: HashSet<String> = self.store.list().into_iter().collect();
        let entries = classify(report, &excluded);

        let selection = match self.picker.pick(&entries) {
            Ok(selection) => selection,
            Err(e) => return CycleState::Failed(e.to_string()),
        };

        if let Some(entry) = selection.and_then(|idx| entries.get(idx)) {
            let toggled = match &entry.action {
                EntryAction::Exclude => self.store.exclude(&entry.detail),
                EntryAction::Include => self.store.include(&entry.detail),
                // headers, separators and detected rows carry no toggle
                EntryAction::Detected(_) | EntryAction::None => Ok(()),
            };
            if let Err(e) = toggled {
                return CycleState::Failed(e.to_string());
            }
        }

        CycleState::Querying
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ChangeRecord;
    use anyhow::anyhow;
    use std::cell::RefCell;

    struct ScriptedBackend {
        responses: RefCell<Vec<Result<StatusReport>>>,
    }

    impl ScriptedBackend {
        fn new(responses: Vec<Result<StatusReport>>) -> Self {
            Self {
                responses: RefCell::new(responses),
            }
        }

        fn exhausted(&self) -> bool {
            self.responses.borrow().is_empty()
        }
    }

    impl VcsBackend for ScriptedBackend {
        fn status(&self, _itemspec: &[PathBuf], _recursive: bool) -> Result<StatusReport> {
            let mut responses = self.responses.borrow_mut();
            assert!(!responses.is_empty(), "unexpected extra backend query");
            responses.remove(0)
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        excluded: Vec<String>,
    }

    impl ExclusionStore for MemoryStore {
        fn list(&self) -> Vec<String> {
            self.excluded.clone()
        }

        fn exclude(&mut self, path: &str) -> Result<()> {
            if !self.excluded.iter().any(|p| p == path) {
                self.excluded.push(path.to_string());
            }
            Ok(())
        }

        fn include(&mut self, path: &str) -> Result<()> {
            self.excluded.retain(|p| p != path);
            Ok(())
        }
    }

    /// store whose writes always fail, as if the exclusion file were unwritable
    struct BrokenStore;

    impl ExclusionStore for BrokenStore {
        fn list(&self) -> Vec<String> {
            Vec::new()
        }

        fn exclude(&mut self, _path: &str) -> Result<()> {
            Err(anyhow!("failed to write exclusion file"))
        }

        fn include(&mut self, _path: &str) -> Result<()> {
            Err(anyhow!("failed to write exclusion file"))
        }
    }

    /// returns scripted selections and records every list it was shown
    #[derive(Default)]
    struct ScriptedPicker {
        picks: RefCell<Vec<Option<usize>>>,
        seen: RefCell<Vec<Vec<DisplayEntry>>>,
    }

    impl ScriptedPicker {
        fn new(picks: Vec<Option<usize>>) -> Self {
            Self {
                picks: RefCell::new(picks),
                seen: RefCell::default(),
            }
        }

        fn shown_lists(&self) -> Vec<Vec<DisplayEntry>> {
            self.seen.borrow().clone()
        }
    }

    impl Picker for ScriptedPicker {
        fn pick(&self, entries: &[DisplayEntry]) -> Result<Option<usize>> {
            self.seen.borrow_mut().push(entries.to_vec());
            let mut picks = self.picks.borrow_mut();
            assert!(!picks.is_empty(), "unexpected extra picker prompt");
            Ok(picks.remove(0))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        statuses: RefCell<Vec<Option<String>>>,
        errors: RefCell<Vec<String>>,
        infos: RefCell<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn set_status(&self, text: Option<&str>) {
            self.statuses.borrow_mut().push(text.map(str::to_string));
        }

        fn show_error(&self, text: &str) {
            self.errors.borrow_mut().push(text.to_string());
        }

        fn show_info(&self, text: &str) {
            self.infos.borrow_mut().push(text.to_string());
        }
    }

    fn one_file_report() -> StatusReport {
        StatusReport::pending(vec![ChangeRecord::new("a.txt", "edit")], vec![])
    }

    #[test]
    fn clean_report_short_circuits_without_prompting() {
        let backend = ScriptedBackend::new(vec![Ok(StatusReport::clean("no pending changes."))]);
        let mut store = MemoryStore::default();
        let picker = ScriptedPicker::new(vec![]);
        let notifier = RecordingNotifier::default();

        StatusController::new(&backend, &mut store, &picker, &notifier).run(&[], true);

        assert!(picker.shown_lists().is_empty());
        assert_eq!(notifier.infos.borrow().as_slice(), ["no pending changes."]);
        assert!(notifier.errors.borrow().is_empty());
        assert!(backend.exhausted());
    }

    #[test]
    fn backend_error_is_surfaced_and_terminal() {
        let backend = ScriptedBackend::new(vec![Err(anyhow!("repository is locked"))]);
        let mut store = MemoryStore::default();
        let picker = ScriptedPicker::new(vec![]);
        let notifier = RecordingNotifier::default();

        StatusController::new(&backend, &mut store, &picker, &notifier).run(&[], true);

        assert!(picker.shown_lists().is_empty());
        assert_eq!(notifier.errors.borrow().as_slice(), ["repository is locked"]);
        // status line was cleared on failure
        assert_eq!(notifier.statuses.borrow().last(), Some(&None));
        assert!(store.excluded.is_empty());
    }

    #[test]
    fn excluding_a_file_mutates_the_store_and_requeries() {
        let backend = ScriptedBackend::new(vec![
            Ok(one_file_report()),
            Ok(StatusReport::clean("no pending changes.")),
        ]);
        let mut store = MemoryStore::default();
        // index 0 is the included header, index 1 the a.txt row
        let picker = ScriptedPicker::new(vec![Some(1)]);
        let notifier = RecordingNotifier::default();

        StatusController::new(&backend, &mut store, &picker, &notifier).run(&[], true);

        assert_eq!(store.excluded, ["a.txt"]);
        assert!(backend.exhausted(), "selection must trigger a requery");
    }

    #[test]
    fn store_write_failure_is_surfaced_and_terminal() {
        // one response only: a failed toggle must not trigger a requery
        let backend = ScriptedBackend::new(vec![Ok(one_file_report())]);
        let mut store = BrokenStore;
        let picker = ScriptedPicker::new(vec![Some(1)]);
        let notifier = RecordingNotifier::default();

        StatusController::new(&backend, &mut store, &picker, &notifier).run(&[], true);

        assert_eq!(
            notifier.errors.borrow().as_slice(),
            ["failed to write exclusion file"]
        );
        // status line was cleared on failure
        assert_eq!(notifier.statuses.borrow().last(), Some(&None));
        assert_eq!(picker.shown_lists().len(), 1);
        assert!(backend.exhausted());
    }

    #[test]
    fn exclude_then_include_round_trips() {
        let backend = ScriptedBackend::new(vec![
            Ok(one_file_report()),
            Ok(one_file_report()),
            Ok(one_file_report()),
            Ok(StatusReport::clean("no pending changes.")),
        ]);
        let mut store = MemoryStore::default();
        let picker = ScriptedPicker::new(vec![Some(1), Some(1), None]);
        let notifier = RecordingNotifier::default();

        StatusController::new(&backend, &mut store, &picker, &notifier).run(&[], true);

        // second list shows the file under the excluded section
        let lists = picker.shown_lists();
        assert_eq!(lists[1][0].label, "◊ EXCLUDED CHANGES");
        assert_eq!(lists[1][1].action, EntryAction::Include);

        // third list is back to the original included-active shape
        assert_eq!(lists[2], lists[0]);
        assert!(store.excluded.is_empty());
    }

    #[test]
    fn cancelling_the_picker_requeries() {
        let backend = ScriptedBackend::new(vec![
            Ok(one_file_report()),
            Ok(StatusReport::clean("no pending changes.")),
        ]);
        let mut store = MemoryStore::default();
        let picker = ScriptedPicker::new(vec![None]);
        let notifier = RecordingNotifier::default();

        StatusController::new(&backend, &mut store, &picker, &notifier).run(&[], true);

        assert!(store.excluded.is_empty());
        assert!(backend.exhausted());
    }

    #[test]
    fn selecting_a_header_is_a_noop_requery() {
        let backend = ScriptedBackend::new(vec![
            Ok(one_file_report()),
            Ok(StatusReport::clean("no pending changes.")),
        ]);
        let mut store = MemoryStore::default();
        let picker = ScriptedPicker::new(vec![Some(0)]);
        let notifier = RecordingNotifier::default();

        StatusController::new(&backend, &mut store, &picker, &notifier).run(&[], true);

        assert!(store.excluded.is_empty());
        assert!(backend.exhausted());
    }

    #[test]
    fn detected_rows_are_informational_only() {
        let detected = StatusReport::pending(vec![], vec![ChangeRecord::new("b.log", "add")]);
        let backend = ScriptedBackend::new(vec![
            Ok(detected),
            Ok(StatusReport::clean("no pending changes.")),
        ]);
        let mut store = MemoryStore::default();
        let picker = ScriptedPicker::new(vec![Some(1)]);
        let notifier = RecordingNotifier::default();

        StatusController::new(&backend, &mut store, &picker, &notifier).run(&[], true);

        assert!(store.excluded.is_empty(), "detected rows never touch the store");
        assert!(backend.exhausted());
    }

    #[test]
    fn exclusion_snapshot_is_read_fresh_each_cycle() {
        let backend = ScriptedBackend::new(vec![
            Ok(one_file_report()),
            Ok(one_file_report()),
            Ok(StatusReport::clean("no pending changes.")),
        ]);
        let mut store = MemoryStore::default();
        let picker = ScriptedPicker::new(vec![Some(1), None]);
        let notifier = RecordingNotifier::default();

        StatusController::new(&backend, &mut store, &picker, &notifier).run(&[], true);

        let lists = picker.shown_lists();
        // the exclusion written in cycle one is visible in cycle two
        assert_eq!(lists[0][1].action, EntryAction::Exclude);
        assert_eq!(lists[1][1].action, EntryAction::Include);
    }
}
