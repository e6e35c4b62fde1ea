use crate::areas::database::Database;
use crate::areas::refs::Refs;
use crate::areas::staging::StagingArea;
use crate::areas::workspace::{METADATA_DIR, Workspace};
use crate::artifacts::branch::branch_table::BranchTable;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::core::settings::Settings;
use crate::artifacts::objects::commit::Commit;
use std::cell::{RefCell, RefMut};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

const OBJECTS_DIR: &str = "objects";
const STAGING_FILE: &str = "staging";

/// Handle on one repository for the duration of a command
///
/// Holds no cached history between invocations: every command reloads the staging
/// area and the branch table from `.gitlet/`, checks its preconditions, then writes the
/// results back.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    staging: Arc<Mutex<StagingArea>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    settings: Settings,
}

impl Repository {
    pub fn new(
        path: &Path,
        writer: Box<dyn std::io::Write>,
        settings: Settings,
    ) -> anyhow::Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;
        let metadata_path = path.join(METADATA_DIR);

        let staging = StagingArea::new(metadata_path.join(STAGING_FILE).into_boxed_path());
        let database = Database::new(metadata_path.join(OBJECTS_DIR).into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(metadata_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            staging: Arc::new(Mutex::new(staging)),
            database,
            workspace,
            refs,
            settings,
        })
    }

    /// Open an existing repository rooted at `path`
    pub fn open(
        path: &Path,
        writer: Box<dyn std::io::Write>,
        settings: Settings,
    ) -> anyhow::Result<Self> {
        if !path.join(METADATA_DIR).is_dir() {
            return Err(RepositoryError::NotInitialized.into());
        }

        Self::new(path, writer, settings)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata_path(&self) -> Box<Path> {
        self.path.join(METADATA_DIR).into_boxed_path()
    }

    pub fn is_initialized(&self) -> bool {
        self.metadata_path().is_dir()
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn staging(&self) -> Arc<Mutex<StagingArea>> {
        self.staging.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn branch_table(&self) -> anyhow::Result<BranchTable> {
        if !self.is_initialized() {
            return Err(RepositoryError::NotInitialized.into());
        }

        self.refs.load_table()
    }

    /// The commit the current branch points at
    pub fn head_commit(&self, table: &BranchTable) -> anyhow::Result<Commit> {
        self.database.parse_object_as_commit(table.head())
    }
}
