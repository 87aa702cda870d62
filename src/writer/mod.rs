//! Byte-exact serialization of the object graph.
//!
//! [`object_serializer`] renders single objects; [`document_writer`]
//! assembles the complete file: header, numbered bodies, cross-reference
//! table, and trailer.

pub mod document_writer;
pub mod object_serializer;

pub use document_writer::SaveOptions;
pub use object_serializer::ObjectSerializer;
