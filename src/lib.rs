//! # pdf_splice
//!
//! An object-graph engine for assembling PDF documents: merge files,
//! insert and remove pages, number and stamp them, and serialize the
//! result byte-exactly with a classic cross-reference table.
//!
//! Parsing raw bytes and drawing content streams are collaborator jobs,
//! reached through the [`Parser`] and [`PageWriter`] traits. Everything in
//! between is this crate: a [`Document`] holds indirect objects in an
//! arena where the slot is the object's identity, object numbers exist
//! only while a save is in flight, and composition operations work on one
//! canonical catalog no matter how many documents were merged in.
//!
//! ```no_run
//! use pdf_splice::{Document, SaveOptions};
//!
//! # fn demo(first: Document, second: Document) -> pdf_splice::Result<()> {
//! let mut merged = first;
//! if merged.combine(second).is_none() {
//!     eprintln!("nothing to combine");
//! }
//! merged.save("merged.pdf", &SaveOptions::new().with_subject("merged"))?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod composer;
pub mod document;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod labels;
pub mod numbering;
pub mod object;
pub mod stamping;
pub mod writer;

pub use composer::PageSource;
pub use document::{Document, ParsedDocument, Parser};
pub use error::{Error, Result};
pub use geometry::Rect;
pub use graph::{ObjId, ObjectArena};
pub use labels::PageLabel;
pub use object::{Dict, Object, ObjectRef, Ref};
pub use stamping::{
    Anchor, NumberPagesOptions, PageWriter, StampOptions, TextBoxOptions, DEFAULT_PAGE_BOX,
};
pub use writer::{ObjectSerializer, SaveOptions};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
