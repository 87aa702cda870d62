//! Document state and intake from a parser collaborator.
//!
//! A [`Document`] owns an arena of indirect objects plus the ordered list of
//! top-level identities that drives serialization order. Byte-level parsing
//! is not this crate's job: anything that can produce a [`ParsedDocument`]
//! (the [`Parser`] contract) can feed the engine.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::graph::{ObjId, ObjectArena};
use crate::object::{Dict, Object, ObjectRef, Ref};

/// The outcome of the external parse step: numbered top-level objects, the
/// declared version, and the info dictionary, if any.
///
/// References inside the objects are [`Ref::Unresolved`] number pairs;
/// document intake links them.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    /// Top-level indirect objects with the numbers the file assigned them
    pub objects: Vec<(ObjectRef, Object)>,
    /// Header version, when the parser found one
    pub version: Option<f32>,
    /// Trailer info dictionary, when present
    pub info: Option<Dict>,
}

/// Contract for the byte-level parser collaborator.
///
/// Malformed byte input is the implementer's failure domain; the engine
/// assumes a returned [`ParsedDocument`] is well formed apart from the
/// recoverable conditions it checks itself (duplicate numbers, dangling
/// references).
pub trait Parser {
    /// Turn raw file bytes into an initial object list, version, and info
    /// dictionary.
    fn parse(&self, bytes: &[u8]) -> Result<ParsedDocument>;
}

/// An in-memory PDF document: object graph, version, and metadata.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Header version; 0.0 means unset, defaulted at serialization time
    version: f32,
    /// Info dictionary, rendered inline into the trailer on save
    pub info: Dict,
    /// Viewer preferences dictionary
    pub viewer_preferences: Dict,
    pub(crate) arena: ObjectArena,
    /// Top-level identities in insertion order
    pub(crate) top: Vec<ObjId>,
    /// Assigned object numbers, keyed by identity. Populated only during
    /// serialization and cleared again afterwards; never an input artifact.
    pub(crate) numbers: HashMap<ObjId, (u32, u16)>,
}

impl Document {
    /// Create an empty document with no objects and an unset version.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from the output of a [`Parser`].
    ///
    /// Every object lands in the arena in input order; references are then
    /// linked against the number index. Duplicate object numbers make the
    /// input an invalid object source and abort construction. Whatever
    /// numbering the source file used is discarded immediately: identity
    /// from here on is arena placement, not number.
    pub fn from_parsed(parsed: ParsedDocument) -> Result<Self> {
        let mut doc = Document {
            version: parsed.version.unwrap_or(0.0),
            info: parsed.info.unwrap_or_default(),
            ..Document::default()
        };

        let mut index: HashMap<ObjectRef, ObjId> = HashMap::with_capacity(parsed.objects.len());
        for (num, obj) in parsed.objects {
            let id = doc.arena.alloc(obj);
            doc.top.push(id);
            if index.insert(num, id).is_some() {
                return Err(Error::Construction(format!(
                    "duplicate object number {}",
                    num
                )));
            }
        }

        doc.link_references(&index);
        doc.remove_old_ids();
        Ok(doc)
    }

    /// Rewrite every `Unresolved` reference whose number the index knows
    /// into a `Linked` arena back-link. Unknown numbers stay unresolved and
    /// degrade at resolve time.
    fn link_references(&mut self, index: &HashMap<ObjectRef, ObjId>) {
        fn link(obj: &mut Object, index: &HashMap<ObjectRef, ObjId>) {
            match obj {
                Object::Reference(r) => {
                    if let Ref::Unresolved(num) = *r {
                        if let Some(&id) = index.get(&num) {
                            *r = Ref::Linked(id);
                        }
                    }
                },
                Object::Array(items) => {
                    for item in items {
                        link(item, index);
                    }
                },
                Object::Dictionary(dict) | Object::Stream { dict, .. } => {
                    for value in dict.values_mut() {
                        link(value, index);
                    }
                },
                _ => {},
            }
        }

        for (_, obj) in self.arena.iter_mut() {
            link(obj, index);
        }
        for value in self.info.values_mut() {
            link(value, index);
        }
        for value in self.viewer_preferences.values_mut() {
            link(value, index);
        }
    }

    /// Header version, or 0.0 when unset.
    pub fn version(&self) -> f32 {
        self.version
    }

    /// Set the header version.
    pub fn set_version(&mut self, version: f32) {
        self.version = version;
    }

    /// Raise the version to at least `other` (used when combining).
    pub(crate) fn raise_version(&mut self, other: f32) {
        if other > self.version {
            self.version = other;
        }
    }

    /// Top-level object identities in serialization order.
    pub fn objects(&self) -> &[ObjId] {
        &self.top
    }

    /// Borrow an object by identity.
    pub fn get(&self, id: ObjId) -> Option<&Object> {
        self.arena.get(id)
    }

    /// Mutably borrow an object by identity.
    pub fn get_mut(&mut self, id: ObjId) -> Option<&mut Object> {
        self.arena.get_mut(id)
    }

    /// Store a new top-level object, returning its identity.
    pub fn push_object(&mut self, obj: Object) -> ObjId {
        let id = self.arena.alloc(obj);
        self.top.push(id);
        id
    }

    /// Follow reference indirections to the value they name.
    ///
    /// Non-reference input resolves to itself. An unresolved reference, a
    /// dangling link, or a reference chain longer than the arena (a cycle)
    /// yields `None` after a warning — traversal callers contribute nothing
    /// for that branch and continue.
    pub fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        let mut current = obj;
        let mut hops = 0usize;
        loop {
            match current {
                Object::Reference(Ref::Linked(id)) => {
                    hops += 1;
                    if hops > self.arena.len() {
                        log::warn!("Reference cycle while resolving {}", id);
                        return None;
                    }
                    match self.arena.get(*id) {
                        Some(next) => current = next,
                        None => {
                            log::warn!("Dangling reference to {}", id);
                            return None;
                        },
                    }
                },
                Object::Reference(Ref::Unresolved(num)) => {
                    log::warn!("Unresolved reference {}", num);
                    return None;
                },
                other => return Some(other),
            }
        }
    }

    /// Resolve an identity's body, following reference-only slots.
    pub(crate) fn resolve_id(&self, id: ObjId) -> Option<&Object> {
        self.arena.get(id).and_then(|obj| self.resolve(obj))
    }

    /// Identity a slot finally stands for, when its body is itself a
    /// reference chain.
    pub(crate) fn target_id(&self, id: ObjId) -> Option<ObjId> {
        let mut current = id;
        let mut hops = 0usize;
        loop {
            match self.arena.get(current)? {
                Object::Reference(Ref::Linked(next)) => {
                    hops += 1;
                    if hops > self.arena.len() {
                        log::warn!("Reference cycle while resolving {}", id);
                        return None;
                    }
                    current = *next;
                },
                Object::Reference(Ref::Unresolved(num)) => {
                    log::warn!("Unresolved reference {}", num);
                    return None;
                },
                _ => return Some(current),
            }
        }
    }
}
