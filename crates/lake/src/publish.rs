//! Staged, all-or-nothing table publication.
//!
//! Every table of a run is written under a hidden staging directory inside
//! the output root. Only once all five tables are complete does `publish`
//! swap them into place; any failure discards the staging directory and
//! leaves the previously published tables untouched. A consumer therefore
//! never observes a partially written table.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

use etl_core::{Error, Result};

use crate::table::Table;

/// A per-run staging area under the output root.
#[derive(Debug)]
pub struct Staging {
    root: PathBuf,
    output_root: PathBuf,
}

impl Staging {
    /// Creates `<output_root>/.staging-<run_id>/`. The staging directory
    /// lives on the same filesystem as the destination so the final swap is
    /// a rename, not a copy.
    pub fn create(output_root: &Path) -> Result<Self> {
        fs::create_dir_all(output_root).map_err(|e| Error::io(output_root, e))?;
        let root = output_root.join(format!(".staging-{}", Uuid::new_v4().simple()));
        fs::create_dir(&root).map_err(|e| Error::io(&root, e))?;
        Ok(Self {
            root,
            output_root: output_root.to_path_buf(),
        })
    }

    /// Staged directory for one table.
    pub fn table_dir(&self, table: Table) -> PathBuf {
        self.root.join(table.subpath())
    }

    /// Swaps every staged table into the output root, replacing any
    /// previously published version, then removes the staging directory.
    pub fn publish(self) -> Result<()> {
        for table in Table::ALL {
            let staged = self.table_dir(table);
            if !staged.is_dir() {
                return Err(Error::dependency(
                    table.subpath(),
                    "staged table missing at publish time".to_string(),
                ));
            }
        }
        for table in Table::ALL {
            let staged = self.table_dir(table);
            let dest = self.output_root.join(table.subpath());
            if dest.exists() {
                fs::remove_dir_all(&dest).map_err(|e| Error::io(&dest, e))?;
            }
            fs::rename(&staged, &dest).map_err(|e| Error::io(&dest, e))?;
            info!(table = table.subpath(), "published table");
        }
        fs::remove_dir_all(&self.root).map_err(|e| Error::io(&self.root, e))?;
        Ok(())
    }

    /// Removes the staging directory without publishing. Best effort; a
    /// leftover staging directory is inert because its name is hidden.
    pub fn discard(self) {
        if let Err(e) = fs::remove_dir_all(&self.root) {
            warn!(path = %self.root.display(), error = %e, "failed to remove staging directory");
        }
    }
}
