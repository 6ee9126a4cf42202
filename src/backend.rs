use crate::controller::VcsBackend;
use crate::report::{ChangeRecord, StatusReport};
use anyhow::{Context, Result, bail};
use git2::{Repository, Status, StatusOptions};
use std::path::{Path, PathBuf};

/// git-backed status queries via libgit2
pub struct GitBackend {
    repo: Repository,
    workdir: PathBuf,
}

impl GitBackend {
    /// open the repository containing `path` (can be anywhere within it)
    pub fn discover(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path).context("not in a git repository")?;
        if repo.is_bare() {
            bail!("cannot query the status of a bare repository");
        }
        let workdir = repo
            .workdir()
            .context("repository has no working directory")?
            .to_path_buf();
        Ok(Self { repo, workdir })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }
}

impl VcsBackend for GitBackend {
    fn status(&self, itemspec: &[PathBuf], recursive: bool) -> Result<StatusReport> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(recursive)
            .renames_head_to_index(true)
            .renames_index_to_workdir(true)
            .exclude_submodules(true);
        for path in itemspec {
            opts.pathspec(path.as_path());
        }

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .context("failed to query repository status")?;

        let mut included = Vec::new();
        let mut detected = Vec::new();

        for entry in statuses.iter() {
            let status = entry.status();
            if status.contains(Status::IGNORED) {
                continue;
            }
            // StatusEntry::path reports the pre-rename path, so pull the
            // post-rename path out of the delta for renamed entries
            let path = if status.intersects(Status::INDEX_RENAMED | Status::WT_RENAMED) {
                entry
                    .head_to_index()
                    .or_else(|| entry.index_to_workdir())
                    .and_then(|delta| {
                        delta
                            .new_file()
                            .path()
                            .map(|p| p.to_string_lossy().into_owned())
                    })
            } else {
                entry.path().map(str::to_string)
            };
            let Some(path) = path else { continue };

            if status.contains(Status::WT_NEW) {
                detected.push(ChangeRecord::new(&path, "add"));
            } else if let Some(verb) = action_verb(status) {
                included.push(ChangeRecord::new(&path, verb));
            }
        }

        if included.is_empty() && detected.is_empty() {
            return Ok(StatusReport::clean("no pending changes."));
        }
        Ok(StatusReport::pending(included, detected))
    }
}

/// map a libgit2 status bitfield onto a backend verb for tracked files
fn action_verb(status: Status) -> Option<&'static str> {
    if status.intersects(Status::CONFLICTED) {
        Some("conflict")
    } else if status.intersects(Status::INDEX_RENAMED | Status::WT_RENAMED) {
        Some("rename")
    } else if status.intersects(Status::INDEX_DELETED | Status::WT_DELETED) {
        Some("delete")
    } else if status.intersects(Status::INDEX_NEW) {
        Some("add")
    } else if status.intersects(
        Status::INDEX_MODIFIED
            | Status::WT_MODIFIED
            | Status::INDEX_TYPECHANGE
            | Status::WT_TYPECHANGE,
    ) {
        Some("edit")
    } else {
        None
    }
}
