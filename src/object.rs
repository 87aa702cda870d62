//! PDF object values.
//!
//! `Object` is the tagged union every other module operates on. Dictionaries
//! carry document keys only: engine bookkeeping (assigned numbers) lives in
//! an out-of-band side table on [`crate::document::Document`], keyed by
//! arena identity, so it can never collide with real PDF names.

use crate::graph::ObjId;

/// A PDF dictionary: name keys mapped to object values.
///
/// Key order is irrelevant; the serializer sorts keys for deterministic
/// output.
pub type Dict = std::collections::HashMap<String, Object>;

/// PDF object representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Null object
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Real (floating-point) value
    Real(f64),
    /// String (byte array)
    String(Vec<u8>),
    /// Name (starting with /)
    Name(String),
    /// Array of objects
    Array(Vec<Object>),
    /// Dictionary (key-value pairs)
    Dictionary(Dict),
    /// Stream (dictionary + raw data)
    Stream {
        /// Stream dictionary
        dict: Dict,
        /// Raw stream payload, carried byte-for-byte
        data: bytes::Bytes,
    },
    /// Indirect object reference
    Reference(Ref),
}

/// A by-number reference as it appears in a file: object number plus
/// generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// Object number
    pub id: u32,
    /// Generation number
    pub gen: u16,
}

impl ObjectRef {
    /// Create a new object reference.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

/// Resolution state of an indirect reference.
///
/// Parser output carries `Unresolved` number/generation pairs. Document
/// intake links them to arena slots; a reference whose target is absent
/// stays `Unresolved` and degrades gracefully wherever it is met (warning
/// plus an empty contribution, never a hard failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ref {
    /// Number/generation pair with no known target in this document
    Unresolved(ObjectRef),
    /// Resolved back-link to an object owned by this document's arena
    Linked(ObjId),
}

impl Object {
    /// Build a reference to an arena slot.
    pub fn link(id: ObjId) -> Self {
        Object::Reference(Ref::Linked(id))
    }

    /// Get the type name of this object (without data).
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Null => "Null",
            Object::Boolean(_) => "Boolean",
            Object::Integer(_) => "Integer",
            Object::Real(_) => "Real",
            Object::String(_) => "String",
            Object::Name(_) => "Name",
            Object::Array(_) => "Array",
            Object::Dictionary(_) => "Dictionary",
            Object::Stream { .. } => "Stream",
            Object::Reference(_) => "Reference",
        }
    }

    /// Try to cast to integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Object::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to cast to real number.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Object::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Numeric value with integers coerced to `f64`.
    ///
    /// Page box coordinates may be written either way.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Object::Integer(i) => Some(*i as f64),
            Object::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Try to cast to name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Object::Name(s) => Some(s),
            _ => None,
        }
    }

    /// Try to cast to string (bytes).
    pub fn as_string(&self) -> Option<&[u8]> {
        match self {
            Object::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to cast to dictionary. Works for both Dictionary and Stream
    /// objects.
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Object::Dictionary(d) => Some(d),
            Object::Stream { dict, .. } => Some(dict),
            _ => None,
        }
    }

    /// Mutable dictionary access. Works for both Dictionary and Stream
    /// objects.
    pub fn as_dict_mut(&mut self) -> Option<&mut Dict> {
        match self {
            Object::Dictionary(d) => Some(d),
            Object::Stream { dict, .. } => Some(dict),
            _ => None,
        }
    }

    /// Try to cast to array.
    pub fn as_array(&self) -> Option<&Vec<Object>> {
        match self {
            Object::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Mutable array access.
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Object>> {
        match self {
            Object::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to cast to reference.
    pub fn as_reference(&self) -> Option<Ref> {
        match self {
            Object::Reference(r) => Some(*r),
            _ => None,
        }
    }

    /// Resolved back-link, if this is a linked reference.
    pub fn as_link(&self) -> Option<ObjId> {
        match self {
            Object::Reference(Ref::Linked(id)) => Some(*id),
            _ => None,
        }
    }

    /// Check if object is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    /// The `/Type` name of this dictionary, if any.
    pub fn dict_type(&self) -> Option<&str> {
        self.as_dict()?.get("Type")?.as_name()
    }
}
