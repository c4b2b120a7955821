//! Rule group storage

use crate::error::{Result, ServiceError};
use docmorph_core::RuleGroup;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Storage for rule groups, keyed by id
pub trait RuleGroupStore: Send + Sync {
    /// Fetch a rule group, `None` when absent
    fn get(&self, id: &str) -> Result<Option<RuleGroup>>;

    /// Insert or replace a rule group
    fn set(&self, group: RuleGroup) -> Result<()>;

    /// Remove a rule group, returning it when it existed
    fn remove(&self, id: &str) -> Result<Option<RuleGroup>>;

    /// All stored rule groups ordered by id
    fn list(&self) -> Result<Vec<RuleGroup>>;
}

/// In-memory rule group store
#[derive(Debug, Default)]
pub struct MemoryRuleGroupStore {
    groups: RwLock<BTreeMap<String, RuleGroup>>,
}

impl MemoryRuleGroupStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> ServiceError {
    ServiceError::store("rule group store lock poisoned")
}

impl RuleGroupStore for MemoryRuleGroupStore {
    fn get(&self, id: &str) -> Result<Option<RuleGroup>> {
        let groups = self.groups.read().map_err(poisoned)?;
        Ok(groups.get(id).cloned())
    }

    fn set(&self, group: RuleGroup) -> Result<()> {
        let mut groups = self.groups.write().map_err(poisoned)?;
        groups.insert(group.id.clone(), group);
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<Option<RuleGroup>> {
        let mut groups = self.groups.write().map_err(poisoned)?;
        Ok(groups.remove(id))
    }

    fn list(&self) -> Result<Vec<RuleGroup>> {
        let groups = self.groups.read().map_err(poisoned)?;
        Ok(groups.values().cloned().collect())
    }
}
