//! Process-wide registry of named [`Group`]s.
//!
//! Mirrors the original package-level `groups` map: a group is created once
//! via [`new_group`] and can be looked up from anywhere in the process by
//! name via [`get_group`]. There is no way to remove a group — namespaces
//! live until process exit.

use crate::error::CacheError;
use crate::group::{Group, Loader};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::OnceLock;

fn registry() -> &'static RwLock<HashMap<String, Arc<Group>>> {
    static REGISTRY: OnceLock<RwLock<HashMap<String, Arc<Group>>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Creates a new named [`Group`] and registers it process-wide.
///
/// # Errors
///
/// Returns [`CacheError::Misconfiguration`] if a group with this name
/// already exists.
pub fn new_group(
    name: impl Into<String>,
    cache_bytes: usize,
    loader: Box<dyn Loader>,
) -> Result<Arc<Group>, CacheError> {
    let name = name.into();
    let mut groups = registry().write();
    if groups.contains_key(&name) {
        return Err(CacheError::Misconfiguration(format!(
            "group {name:?} already registered"
        )));
    }
    let group = Arc::new(Group::new(name.clone(), cache_bytes, loader));
    groups.insert(name, Arc::clone(&group));
    Ok(group)
}

/// Looks up a group previously created with [`new_group`].
pub fn get_group(name: &str) -> Option<Arc<Group>> {
    registry().read().get(name).cloned()
}
