//! Whole-document serialization: header, body, xref table, and trailer.
//!
//! `to_pdf` finalizes the catalog, numbers the reachable set, and emits the
//! byte layout. The recorded cross-reference offsets are exact: each entry
//! points at the first byte of that object's `{id} {gen} obj` token.
//! Serialization leaves the document number-free again, so repeated saves
//! of an unmodified document produce identical bytes (given a pinned
//! timestamp in the options).

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::document::Document;
use crate::error::{Error, Result};
use crate::object::{Dict, Object};
use crate::writer::object_serializer::ObjectSerializer;

/// Default header version when the document never declared one.
const DEFAULT_VERSION: f32 = 1.5;

/// Binary marker comment recommended after the header line.
const BINARY_MARKER: &[u8] = b"%\xE2\xE3\xCF\xD3\n";

/// Options for document serialization.
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    /// `/Subject` stamped into the trailer info dictionary
    pub subject: Option<String>,
    /// Timestamp for `/CreationDate` and `/ModDate`; defaults to the
    /// current time. Pin it to make repeated saves byte-identical.
    pub timestamp: Option<DateTime<Utc>>,
}

impl SaveOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `/Subject` info entry.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Pin the metadata timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Format a timestamp in PDF date syntax.
fn pdf_date(ts: DateTime<Utc>) -> String {
    ts.format("D:%Y%m%d%H%M%SZ").to_string()
}

impl Document {
    /// Render the document to its complete byte representation.
    ///
    /// Finalizes one canonical reachable graph, assigns fresh object
    /// numbers, emits header, bodies, xref table, and trailer, then clears
    /// the numbering side table so the document returns to its number-free
    /// state.
    pub fn to_pdf(&mut self, options: &SaveOptions) -> Result<Vec<u8>> {
        if self.version() == 0.0 {
            self.set_version(DEFAULT_VERSION);
        }
        let catalog = self.rebuild_catalog_and_objects();
        if !self.viewer_preferences.is_empty() {
            let prefs = Object::Dictionary(self.viewer_preferences.clone());
            if let Some(dict) = self.get_mut(catalog).and_then(|o| o.as_dict_mut()) {
                dict.insert("ViewerPreferences".to_string(), prefs);
            }
        }
        self.renumber_object_ids();

        let mut output: Vec<u8> = Vec::new();
        writeln!(output, "%PDF-{:.1}", self.version())?;
        output.extend_from_slice(BINARY_MARKER);

        let serializer = ObjectSerializer::new(self);
        let mut offsets: Vec<(u32, usize)> = Vec::with_capacity(self.objects().len());

        for &id in self.objects() {
            let Some((num, gen)) = self.assigned_number(id) else {
                log::warn!("Top-level {} missed numbering; not serialized", id);
                continue;
            };
            let Some(obj) = self.get(id) else {
                continue;
            };
            offsets.push((num, output.len()));
            output.extend_from_slice(&serializer.serialize_indirect(num, gen, obj));
        }
        offsets.sort_by_key(|&(num, _)| num);

        // Cross-reference table: fixed free-list head, then one 20-byte
        // entry per object in ascending number order.
        let xref_start = output.len();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", offsets.len() + 1)?;
        writeln!(output, "0000000000 65535 f ")?;
        for &(_, offset) in &offsets {
            writeln!(output, "{:010} 00000 n ", offset)?;
        }

        let root = Object::link(catalog);
        if self.assigned_number(catalog).is_none() {
            return Err(Error::MissingRoot);
        }

        let mut trailer = Dict::new();
        trailer.insert("Size".to_string(), Object::Integer(offsets.len() as i64 + 1));
        trailer.insert("Root".to_string(), root);
        if let Some(info) = self.trailer_info(options) {
            trailer.insert("Info".to_string(), Object::Dictionary(info));
        }

        writeln!(output, "trailer")?;
        output.extend_from_slice(&serializer.serialize(&Object::Dictionary(trailer)));
        writeln!(output)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", xref_start)?;
        write!(output, "%%EOF")?;

        // Back to number-free state; the next save renumbers from scratch.
        self.remove_old_ids();
        Ok(output)
    }

    /// Serialize and write to `path`, silently overwriting existing content.
    pub fn save(&mut self, path: impl AsRef<Path>, options: &SaveOptions) -> Result<()> {
        let bytes = self.to_pdf(options)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Info dictionary as rendered inline into the trailer, with fresh
    /// date stamps, or `None` when there is nothing to say.
    ///
    /// Reference values are resolved and inlined: the trailer renders after
    /// the reachable set is pruned to the catalog closure, so an info value
    /// left as a link would have no assigned number.
    fn trailer_info(&self, options: &SaveOptions) -> Option<Dict> {
        if self.info.is_empty() && options.subject.is_none() {
            return None;
        }
        let mut info: Dict = self
            .info
            .iter()
            .map(|(key, value)| {
                let inlined = match value {
                    Object::Reference(_) => self.resolve(value).cloned().unwrap_or(Object::Null),
                    other => other.clone(),
                };
                (key.clone(), inlined)
            })
            .collect();
        let stamp = pdf_date(options.timestamp.unwrap_or_else(Utc::now));
        info.insert(
            "CreationDate".to_string(),
            Object::String(stamp.clone().into_bytes()),
        );
        info.insert("ModDate".to_string(), Object::String(stamp.into_bytes()));
        if let Some(subject) = &options.subject {
            info.insert(
                "Subject".to_string(),
                Object::String(subject.as_bytes().to_vec()),
            );
        }
        Some(info)
    }
}
