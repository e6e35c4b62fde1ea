use crate::areas::repository::Repository;
use crate::artifacts::log::LogRecord;
use std::io::Write;

impl Repository {
    /// History of the current branch, following first parents only
    pub fn log(&self) -> anyhow::Result<()> {
        let table = self.branch_table()?;
        let mut next = Some(table.head().clone());

        while let Some(oid) = next {
            let commit = self.database().parse_object_as_commit(&oid)?;
            writeln!(self.writer(), "{}", LogRecord::new(&oid, &commit))?;

            next = commit.parent().cloned();
        }

        Ok(())
    }
}
