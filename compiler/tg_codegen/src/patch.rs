//! Deferred assignments.
//!
//! A slot whose value is not available when its container is declared gets a
//! zero placeholder, and a [`Patch`] records the assignment that fills it in
//! once every declaration has been emitted.

use rustc_hash::FxHashSet;
use tg_graph::NodeId;

/// An assignment `lhs = <expression of target>` run after all declarations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patch {
    /// Assignment target, e.g. `var1.next` or `var2[0]`.
    pub lhs: String,
    /// The variable `lhs` writes into.
    pub base: String,
    pub target: NodeId,
    /// Whether the right-hand side copies a value rather than an address or
    /// a reference-semantics header.
    pub copies: bool,
}

/// Patches in creation order.
#[derive(Default)]
pub struct PatchQueue {
    patches: Vec<Patch>,
    bases: FxHashSet<String>,
}

impl PatchQueue {
    pub fn push(&mut self, patch: Patch) {
        self.bases.insert(patch.base.clone());
        self.patches.push(patch);
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// Whether some patch writes into `var`.
    pub fn writes_into(&self, var: &str) -> bool {
        self.bases.contains(var)
    }

    /// The order to run patches in.
    ///
    /// Non-copying patches run first, in creation order. Copies follow, each
    /// after every patch writing into the variable it copies from, so no copy
    /// observes a placeholder. `source` names the variable a copy reads.
    pub fn schedule(&self, source: impl Fn(NodeId) -> Option<String>) -> Vec<&Patch> {
        let mut order: Vec<&Patch> = self.patches.iter().filter(|p| !p.copies).collect();
        let copies: Vec<&Patch> = self.patches.iter().filter(|p| p.copies).collect();
        let sources: Vec<Option<String>> = copies.iter().map(|p| source(p.target)).collect();

        let mut state = vec![Visit::Pending; copies.len()];
        for i in 0..copies.len() {
            schedule_copy(i, &copies, &sources, &mut state, &mut order);
        }
        order
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Visit {
    Pending,
    Active,
    Done,
}

fn schedule_copy<'a>(
    i: usize,
    copies: &[&'a Patch],
    sources: &[Option<String>],
    state: &mut [Visit],
    order: &mut Vec<&'a Patch>,
) {
    if state[i] != Visit::Pending {
        return;
    }
    state[i] = Visit::Active;
    if let Some(source) = &sources[i] {
        for (j, other) in copies.iter().enumerate() {
            if j != i && other.base == *source {
                schedule_copy(j, copies, sources, state, order);
            }
        }
    }
    state[i] = Visit::Done;
    order.push(copies[i]);
}
