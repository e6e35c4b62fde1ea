//! History records printed by `log`, `global-log` and `find`
//!
//! Each record has the shape:
//!
//! ```text
//! ===
//! commit <id>
//! Merge: <p1[..7]> <p2[..7]>
//! Date: Thu Jan 01 00:00:00 1970 +0000
//! <message>
//!
//! ```
//!
//! The `Merge:` line only appears for merge commits.

use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use derive_new::new;
use std::fmt;

pub const RECORD_SEPARATOR: &str = "===";

#[derive(Debug, new)]
pub struct LogRecord<'c> {
    oid: &'c ObjectId,
    commit: &'c Commit,
}

impl fmt::Display for LogRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RECORD_SEPARATOR)?;
        writeln!(f, "{}", format!("commit {}", self.oid).yellow())?;

        if let [first, second] = self.commit.parents() {
            writeln!(
                f,
                "Merge: {} {}",
                first.to_short_oid(),
                second.to_short_oid()
            )?;
        }

        writeln!(f, "Date: {}", self.commit.readable_timestamp())?;
        writeln!(f, "{}", self.commit.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object::Object;
    use crate::artifacts::objects::tree::FileTree;
    use pretty_assertions::assert_eq;

    #[test]
    fn merge_record_lists_abbreviated_parents() {
        colored::control::set_override(false);
        let first = ObjectId::try_parse("1234567aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string()).unwrap();
        let second = ObjectId::try_parse("89abcdebbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb".to_string()).unwrap();
        let commit = Commit::new(
            vec![first, second],
            Commit::initial().timestamp(),
            FileTree::new(),
            "Merged dev into master.".to_string(),
        );
        let oid = commit.object_id().unwrap();

        assert_eq!(
            LogRecord::new(&oid, &commit).to_string(),
            format!(
                "===\ncommit {}\nMerge: 1234567 89abcde\nDate: Thu Jan 01 00:00:00 1970 +0000\nMerged dev into master.\n",
                oid
            )
        );
    }
}
