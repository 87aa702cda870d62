//! Object number assignment.
//!
//! Numbers are an output artifact, never state: the side table is empty
//! between saves, filled in a single deterministic pass immediately before
//! the body is rendered, and wiped again afterwards. Numbering walks the
//! finalized top-level list in order, so the same graph always serializes
//! with the same numbers.

use crate::document::Document;

impl Document {
    /// Clear the per-identity number/generation side table.
    ///
    /// Invoked after construction and after every save, so numbering from a
    /// source file or a previous serialization never leaks into output.
    pub fn remove_old_ids(&mut self) {
        self.numbers.clear();
    }

    /// Assign consecutive object numbers to the top-level list.
    ///
    /// List order, each identity at most once, numbers starting at 1 with
    /// generation 0. Number 0 stays reserved for the xref free-list head.
    /// An object referenced from several places receives exactly one
    /// number because identity, not position, keys the table.
    pub fn renumber_object_ids(&mut self) {
        self.numbers.clear();
        let mut next: u32 = 1;
        for &id in &self.top {
            if let std::collections::hash_map::Entry::Vacant(slot) = self.numbers.entry(id) {
                slot.insert((next, 0));
                next += 1;
            }
        }
    }

    /// Assigned number/generation for an identity, if any.
    pub fn assigned_number(&self, id: crate::graph::ObjId) -> Option<(u32, u16)> {
        self.numbers.get(&id).copied()
    }
}
