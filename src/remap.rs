use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::key::KeyInputSet;
use crate::mode::KeyRemapMode;

/// Outcome of resolving a key sequence against the remap table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMappingResult {
    /// No mapping applies; the sequence stands as typed.
    NoMapping,
    /// The sequence is a proper prefix of at least one mapping; the engine
    /// should buffer it and wait.
    NeedsMoreInput,
    /// The sequence resolved to this replacement.
    Mapped(KeyInputSet),
    /// Expansion cycled or exceeded the depth cap.
    Recursive,
}

/// The contract the input engine consumes: resolve a key sequence under a
/// remap mode. [`KeyMap`] is the reference implementation; hosts with their
/// own mapping storage implement this directly.
pub trait KeyMapTable {
    fn get_key_mapping(&self, keys: &KeyInputSet, mode: KeyRemapMode) -> KeyMappingResult;
}

/// A mapping right-hand side plus its remap policy.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MapEntry {
    rhs: KeyInputSet,
    allow_remap: bool,
}

/// Hard ceiling on expansion steps. A chain this deep is a runaway mapping
/// even without a literal cycle.
const EXPANSION_DEPTH_CAP: usize = 100;

/// Key-mapping storage with Vim remap semantics.
///
/// Mappings are keyed by `(remap mode, left-hand side)`. Resolution prefers
/// an exact match; when none exists but some mapping properly extends the
/// query, the result is [`KeyMappingResult::NeedsMoreInput`] so the engine
/// buffers the prefix. An exact match whose entry allows remapping is
/// expanded recursively over the whole replacement sequence; expansion stops
/// with [`KeyMappingResult::Recursive`] when a left-hand side re-enters its
/// own chain or the chain exceeds [`EXPANSION_DEPTH_CAP`] steps.
#[derive(Debug, Default, Clone)]
pub struct KeyMap {
    maps: HashMap<KeyRemapMode, HashMap<KeyInputSet, MapEntry>>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `lhs → rhs` under `mode`, replacing any existing mapping for
    /// the same left-hand side. `allow_remap = false` is `noremap`.
    pub fn add_mapping(
        &mut self,
        mode: KeyRemapMode,
        lhs: KeyInputSet,
        rhs: KeyInputSet,
        allow_remap: bool,
    ) {
        self.maps
            .entry(mode)
            .or_default()
            .insert(lhs, MapEntry { rhs, allow_remap });
    }

    /// Removes the mapping for `lhs` under `mode`. Returns whether one
    /// existed.
    pub fn remove_mapping(&mut self, mode: KeyRemapMode, lhs: &KeyInputSet) -> bool {
        self.maps
            .get_mut(&mode)
            .is_some_and(|m| m.remove(lhs).is_some())
    }

    /// Drops every mapping under `mode`.
    pub fn clear_mode(&mut self, mode: KeyRemapMode) {
        self.maps.remove(&mode);
    }

    /// The installed `(lhs, rhs, allow_remap)` triples for `mode`, in no
    /// particular order.
    pub fn mappings(
        &self,
        mode: KeyRemapMode,
    ) -> impl Iterator<Item = (&KeyInputSet, &KeyInputSet, bool)> + '_ {
        self.maps
            .get(&mode)
            .into_iter()
            .flat_map(|m| m.iter().map(|(l, e)| (l, &e.rhs, e.allow_remap)))
    }

    pub fn is_empty(&self) -> bool {
        self.maps.values().all(|m| m.is_empty())
    }

    fn expand(
        &self,
        table: &HashMap<KeyInputSet, MapEntry>,
        start: &KeyInputSet,
        entry: &MapEntry,
    ) -> KeyMappingResult {
        if !entry.allow_remap {
            return KeyMappingResult::Mapped(entry.rhs.clone());
        }

        let mut visited: HashSet<KeyInputSet> = HashSet::new();
        visited.insert(start.clone());

        let mut current = entry.rhs.clone();
        for _ in 0..EXPANSION_DEPTH_CAP {
            match table.get(&current) {
                Some(next) if !next.allow_remap => {
                    return KeyMappingResult::Mapped(next.rhs.clone());
                }
                Some(next) => {
                    if !visited.insert(current.clone()) {
                        return KeyMappingResult::Recursive;
                    }
                    current = next.rhs.clone();
                }
                None => return KeyMappingResult::Mapped(current),
            }
        }
        KeyMappingResult::Recursive
    }
}

impl KeyMapTable for KeyMap {
    fn get_key_mapping(&self, keys: &KeyInputSet, mode: KeyRemapMode) -> KeyMappingResult {
        let Some(table) = self.maps.get(&mode) else {
            return KeyMappingResult::NoMapping;
        };

        let result = if let Some(entry) = table.get(keys) {
            self.expand(table, keys, entry)
        } else if table.keys().any(|lhs| keys.is_proper_prefix_of(lhs)) {
            KeyMappingResult::NeedsMoreInput
        } else {
            KeyMappingResult::NoMapping
        };
        trace!(?mode, len = keys.len(), ?result, "remap lookup");
        result
    }
}
