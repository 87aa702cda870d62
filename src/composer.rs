//! Page composition: inserting, removing, and combining pages.
//!
//! All positional operations address the canonical `Pages` node's top-level
//! `Kids` array. Out-of-range insert positions clamp to the nearest end;
//! negative positions count back from the end. Operations return `Option`
//! for chaining: a rejected source or an empty removal yields `None` after
//! a warning, never a panic.

use crate::catalog::dict_types;
use crate::document::Document;
use crate::graph::ObjId;
use crate::object::{Dict, Object};

/// Pages to insert, in increasing order of ceremony.
#[derive(Debug, Clone)]
pub enum PageSource {
    /// Every page of another document, deep-copied in
    Document(Document),
    /// Loose page dictionaries, in order
    Pages(Vec<Dict>),
    /// One page dictionary
    Page(Dict),
}

impl Document {
    /// Insert pages at `location` in the canonical top-level `Kids` array.
    ///
    /// Negative locations count from the end; anything out of range clamps
    /// to the nearest end. A dictionary source whose `/Type` is not `Page`
    /// is rejected with a warning and `None`, leaving the document
    /// untouched. A [`PageSource::Document`] contributes a deep copy of its
    /// flattened pages and raises this document's version to at least the
    /// source's.
    pub fn insert(&mut self, location: isize, source: PageSource) -> Option<&mut Self> {
        match &source {
            PageSource::Page(dict) => {
                if !is_page_dict(dict) {
                    log::warn!("Rejecting insert: dictionary is not /Type /Page");
                    return None;
                }
            },
            PageSource::Pages(dicts) => {
                if let Some(bad) = dicts.iter().find(|d| !is_page_dict(d)) {
                    log::warn!(
                        "Rejecting insert: dictionary with /Type {:?} is not a page",
                        bad.get("Type").and_then(|t| t.as_name())
                    );
                    return None;
                }
            },
            PageSource::Document(_) => {},
        }

        let catalog = self.rebuild_catalog();
        let pages_node = self.ensure_pages_node(catalog);

        let new_pages: Vec<ObjId> = match source {
            PageSource::Page(dict) => vec![self.store_page(dict, pages_node)],
            PageSource::Pages(dicts) => dicts
                .into_iter()
                .map(|dict| self.store_page(dict, pages_node))
                .collect(),
            PageSource::Document(mut other) => {
                other.rebuild_catalog();
                let roots = other.pages(None);
                let adopted = self.arena.adopt(&other.arena, &roots);
                for &id in &adopted {
                    if let Some(dict) = self.get_mut(id).and_then(|o| o.as_dict_mut()) {
                        dict.insert("Parent".to_string(), Object::link(pages_node));
                    }
                    self.top.push(id);
                }
                self.raise_version(other.version());
                adopted
            },
        };

        let kids = self.kids_mut(pages_node)?;
        let n = kids.len() as isize;
        let at = if location < 0 {
            (n + location).max(0)
        } else {
            location.min(n)
        } as usize;
        for (offset, &id) in new_pages.iter().enumerate() {
            kids.insert(at + offset, Object::link(id));
        }

        self.refresh_count(catalog, pages_node);
        Some(self)
    }

    /// Append every page of `other` as a deep copy.
    pub fn combine(&mut self, other: Document) -> Option<&mut Self> {
        self.insert(isize::MAX, PageSource::Document(other))
    }

    /// Remove the page at `index` in the canonical top-level `Kids` array,
    /// returning its identity. Negative indices count from the end; an
    /// index out of range removes nothing.
    pub fn remove(&mut self, index: isize) -> Option<ObjId> {
        let catalog = self.rebuild_catalog();
        let pages_node = self.ensure_pages_node(catalog);

        let kids = self.kids_mut(pages_node)?;
        let n = kids.len() as isize;
        let at = if index < 0 { n + index } else { index };
        if at < 0 || at >= n {
            log::warn!("Remove index {} out of range for {} kids", index, n);
            return None;
        }
        let removed = kids.remove(at as usize);

        self.refresh_count(catalog, pages_node);
        removed.as_link().and_then(|id| self.target_id(id))
    }

    fn store_page(&mut self, mut dict: Dict, parent: ObjId) -> ObjId {
        dict.insert("Parent".to_string(), Object::link(parent));
        self.push_object(Object::Dictionary(dict))
    }

    /// Re-derive `Count` from the flattened tree under `catalog`.
    fn refresh_count(&mut self, catalog: ObjId, pages_node: ObjId) {
        let count = self.pages(Some(catalog)).len() as i64;
        if let Some(dict) = self.get_mut(pages_node).and_then(|o| o.as_dict_mut()) {
            dict.insert("Count".to_string(), Object::Integer(count));
        }
    }
}

fn is_page_dict(dict: &Dict) -> bool {
    dict.get("Type").and_then(|t| t.as_name()) == Some(dict_types::PAGE)
}
