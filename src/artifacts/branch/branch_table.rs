//! In-memory branch table
//!
//! Maps every branch name to its tip commit and remembers the current branch.
//! Commands load the table from [`crate::areas::refs::Refs`], mutate it, and persist it
//! after all their checks have passed.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchTable {
    current: BranchName,
    tips: BTreeMap<BranchName, ObjectId>,
}

impl BranchTable {
    /// Table of a freshly initialized repository
    pub fn new(current: BranchName, tip: ObjectId) -> Self {
        let mut tips = BTreeMap::new();
        tips.insert(current.clone(), tip);

        BranchTable { current, tips }
    }

    pub fn from_parts(
        current: BranchName,
        tips: BTreeMap<BranchName, ObjectId>,
    ) -> anyhow::Result<Self> {
        if !tips.contains_key(&current) {
            return Err(RepositoryError::BranchNotFound(current.to_string()).into());
        }

        Ok(BranchTable { current, tips })
    }

    pub fn current(&self) -> &BranchName {
        &self.current
    }

    /// Tip of the current branch
    pub fn head(&self) -> &ObjectId {
        // from_parts and set_current keep the current branch in the table
        &self.tips[&self.current]
    }

    pub fn tip(&self, name: &BranchName) -> Option<&ObjectId> {
        self.tips.get(name)
    }

    pub fn contains(&self, name: &BranchName) -> bool {
        self.tips.contains_key(name)
    }

    pub fn is_current(&self, name: &BranchName) -> bool {
        &self.current == name
    }

    /// Branches in lexicographic order
    pub fn iter(&self) -> impl Iterator<Item = (&BranchName, &ObjectId)> {
        self.tips.iter()
    }

    /// Look up a branch given by name on the command line
    pub fn resolve(&self, raw_name: &str) -> anyhow::Result<(BranchName, ObjectId)> {
        BranchName::try_parse(raw_name.to_string())
            .ok()
            .and_then(|name| self.tips.get(&name).cloned().map(|tip| (name, tip)))
            .ok_or_else(|| RepositoryError::BranchNotFound(raw_name.to_string()).into())
    }

    pub fn create_branch(&mut self, name: BranchName, tip: ObjectId) -> anyhow::Result<()> {
        if self.tips.contains_key(&name) {
            return Err(RepositoryError::BranchExists(name.to_string()).into());
        }

        self.tips.insert(name, tip);
        Ok(())
    }

    pub fn delete_branch(&mut self, name: &BranchName) -> anyhow::Result<ObjectId> {
        if !self.tips.contains_key(name) {
            return Err(RepositoryError::BranchNotFound(name.to_string()).into());
        }
        if self.is_current(name) {
            return Err(RepositoryError::CannotDeleteCurrent.into());
        }

        self.tips
            .remove(name)
            .ok_or_else(|| RepositoryError::BranchNotFound(name.to_string()).into())
    }

    pub fn set_current(&mut self, name: BranchName) -> anyhow::Result<()> {
        if !self.tips.contains_key(&name) {
            return Err(RepositoryError::BranchNotFound(name.to_string()).into());
        }

        self.current = name;
        Ok(())
    }

    /// Move the current branch to `tip`
    pub fn advance_current(&mut self, tip: ObjectId) {
        self.tips.insert(self.current.clone(), tip);
    }
}
