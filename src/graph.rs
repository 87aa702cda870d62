//! Arena storage for indirect objects.
//!
//! Every indirect object a document owns lives in one [`ObjectArena`] slot,
//! and the slot index ([`ObjId`]) is the object's identity. Equality before
//! serialization is identity equality; object numbers are a disposable
//! output artifact assigned elsewhere. Nested arrays and dictionaries stay
//! inline inside their owning slot and have no identity of their own.

use std::collections::{HashMap, HashSet};

use crate::object::{Object, Ref};

/// Identity of an indirect object: its slot in the owning document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjId(pub(crate) usize);

impl std::fmt::Display for ObjId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "obj#{}", self.0)
    }
}

/// Owned storage for a document's indirect objects.
#[derive(Debug, Clone, Default)]
pub struct ObjectArena {
    slots: Vec<Object>,
}

impl ObjectArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object, returning its identity.
    pub fn alloc(&mut self, obj: Object) -> ObjId {
        let id = ObjId(self.slots.len());
        self.slots.push(obj);
        id
    }

    /// Number of slots (including orphans not reachable from any root).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the arena holds no objects.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Borrow the object with the given identity.
    pub fn get(&self, id: ObjId) -> Option<&Object> {
        self.slots.get(id.0)
    }

    /// Mutably borrow the object with the given identity.
    pub fn get_mut(&mut self, id: ObjId) -> Option<&mut Object> {
        self.slots.get_mut(id.0)
    }

    /// Iterate over all slots in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjId, &Object)> {
        self.slots.iter().enumerate().map(|(i, o)| (ObjId(i), o))
    }

    /// Mutable iteration over all slots in allocation order.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (ObjId, &mut Object)> {
        self.slots
            .iter_mut()
            .enumerate()
            .map(|(i, o)| (ObjId(i), o))
    }

    /// Transitive closure of linked objects starting from `roots`.
    ///
    /// Returns identities in deterministic order: roots first, then their
    /// links breadth-first in link order, each identity exactly once.
    pub fn reachable(&self, roots: &[ObjId]) -> Vec<ObjId> {
        let mut seen: HashSet<ObjId> = HashSet::new();
        let mut order: Vec<ObjId> = Vec::new();
        let mut queue: std::collections::VecDeque<ObjId> = roots.iter().copied().collect();

        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            order.push(id);
            if let Some(obj) = self.get(id) {
                let mut links = Vec::new();
                collect_links(obj, &mut links);
                queue.extend(links);
            } else {
                log::warn!("Reachability walk met dangling identity {}", id);
            }
        }
        order
    }

    /// Deep-copy the subtrees rooted at `roots` from `source` into this
    /// arena, remapping every link to the freshly allocated slots.
    ///
    /// Returns the identities the roots received here, in input order.
    /// Combining documents goes through this: the copy is explicit, so a
    /// later mutation in either document is invisible to the other.
    pub fn adopt(&mut self, source: &ObjectArena, roots: &[ObjId]) -> Vec<ObjId> {
        let closure = source.reachable(roots);
        let mut map: HashMap<ObjId, ObjId> = HashMap::with_capacity(closure.len());

        for &src_id in &closure {
            if let Some(obj) = source.get(src_id) {
                let new_id = self.alloc(obj.clone());
                map.insert(src_id, new_id);
            }
        }
        for &src_id in &closure {
            if let Some(&new_id) = map.get(&src_id) {
                if let Some(obj) = self.get_mut(new_id) {
                    remap_links(obj, &map);
                }
            }
        }

        roots
            .iter()
            .filter_map(|src_id| map.get(src_id).copied())
            .collect()
    }
}

/// Collect every linked identity appearing anywhere inside `obj`.
pub(crate) fn collect_links(obj: &Object, out: &mut Vec<ObjId>) {
    match obj {
        Object::Reference(Ref::Linked(id)) => out.push(*id),
        Object::Array(items) => {
            for item in items {
                collect_links(item, out);
            }
        },
        Object::Dictionary(dict) | Object::Stream { dict, .. } => {
            // Sort keys so closure order never depends on hash state.
            let mut keys: Vec<_> = dict.keys().collect();
            keys.sort();
            for key in keys {
                collect_links(&dict[key], out);
            }
        },
        _ => {},
    }
}

/// Rewrite every linked identity inside `obj` through `map`.
///
/// A link with no mapping is left alone; the caller copied a subtree that
/// pointed outside itself, and the dangling link degrades at resolve time.
fn remap_links(obj: &mut Object, map: &HashMap<ObjId, ObjId>) {
    match obj {
        Object::Reference(Ref::Linked(id)) => {
            if let Some(&new_id) = map.get(id) {
                *id = new_id;
            } else {
                log::warn!("Adopted subtree links outside itself via {}", id);
            }
        },
        Object::Array(items) => {
            for item in items {
                remap_links(item, map);
            }
        },
        Object::Dictionary(dict) | Object::Stream { dict, .. } => {
            for value in dict.values_mut() {
                remap_links(value, map);
            }
        },
        _ => {},
    }
}
