// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Symbol name to handle cache.

use std::collections::HashMap;

/// Handle assigned by the device to a resolved symbol name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolHandle(pub u32);

impl SymbolHandle {
    /// Raw handle value, used as the index offset of value requests.
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// Session-scoped cache of resolved handles.
///
/// Names match exactly and case-sensitively. Entries are added only after
/// a successful resolution and leave only through [`HandleCache::evict`] or
/// [`HandleCache::drain`].
#[derive(Debug, Clone, Default)]
pub struct HandleCache {
    entries: HashMap<String, SymbolHandle>,
}

impl HandleCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached handle for `name`.
    pub fn get(&self, name: &str) -> Option<SymbolHandle> {
        self.entries.get(name).copied()
    }

    /// Cache a freshly resolved handle.
    pub fn insert(&mut self, name: impl Into<String>, handle: SymbolHandle) {
        self.entries.insert(name.into(), handle);
    }

    /// Drop the entry for `name`, returning its handle.
    pub fn evict(&mut self, name: &str) -> Option<SymbolHandle> {
        self.entries.remove(name)
    }

    /// Take every entry, leaving the cache empty.
    pub fn drain(&mut self) -> Vec<(String, SymbolHandle)> {
        self.entries.drain().collect()
    }

    /// Check if `name` is cached.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of cached handles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
