//! Identity registry: maps values to the nodes already created for them.
//!
//! Two indices back the registry. The address index keys pointers, slices,
//! and maps by [`Identity`]. The equality index, enabled only when value
//! deduplication is requested, buckets structs, arrays, and interface values
//! by structural hash and confirms hits with deep equality.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tg_value::{structural_fingerprint, structurally_equal, Identity, Value};

use crate::NodeId;

/// Lookup table from value identity to node.
#[derive(Default)]
pub struct IdentityRegistry {
    dedup_values: bool,
    by_address: FxHashMap<Identity, NodeId>,
    by_value: FxHashMap<u64, SmallVec<[(Value, NodeId); 1]>>,
}

impl IdentityRegistry {
    /// Create a registry. With `dedup_values`, equal value-typed aggregates
    /// share one node.
    pub fn new(dedup_values: bool) -> Self {
        IdentityRegistry {
            dedup_values,
            ..Self::default()
        }
    }

    /// Whether `value` is indexed at all.
    pub fn tracks(&self, value: &Value) -> bool {
        match value {
            Value::Pointer(_) | Value::Slice(_) | Value::Map(_) => !value.is_nil(),
            Value::Struct(_) | Value::Array(_) | Value::Interface(_) => {
                self.dedup_values && !value.is_nil()
            }
            _ => false,
        }
    }

    /// Find the node previously registered for `value`.
    pub fn lookup(&self, value: &Value) -> Option<NodeId> {
        if let Some(identity) = value.identity() {
            return self.by_address.get(&identity).copied();
        }
        if !self.tracks(value) {
            return None;
        }
        self.by_value
            .get(&structural_fingerprint(value))?
            .iter()
            .find(|(seen, _)| structurally_equal(seen, value))
            .map(|&(_, node)| node)
    }

    /// Record that `node` stands for `value`. Untracked values are ignored.
    pub fn register(&mut self, value: &Value, node: NodeId) {
        if let Some(identity) = value.identity() {
            self.by_address.insert(identity, node);
        } else if self.tracks(value) {
            self.by_value
                .entry(structural_fingerprint(value))
                .or_default()
                .push((value.clone(), node));
        }
    }

    /// Number of registered values.
    pub fn len(&self) -> usize {
        self.by_address.len() + self.by_value.values().map(SmallVec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget everything, keeping the deduplication setting.
    pub fn clear(&mut self) {
        self.by_address.clear();
        self.by_value.clear();
    }
}

#[cfg(test)]
mod tests;
