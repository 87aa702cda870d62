//! Catalog location, merging, and page-tree flattening.
//!
//! After documents are combined, several `/Type /Catalog` objects can sit in
//! the top-level list. [`Document::rebuild_catalog`] folds them into one
//! canonical catalog whose `Pages` tree carries every kid, and
//! [`Document::rebuild_catalog_and_objects`] additionally prunes the
//! top-level list down to the reachable set. Traversal is iterative with a
//! visited-identity set: page-tree `/Parent` back-references may form
//! cycles.

use std::collections::HashSet;

use crate::document::Document;
use crate::graph::ObjId;
use crate::object::{Dict, Object};

/// Dictionary type names used by the page tree.
pub(crate) mod dict_types {
    pub const CATALOG: &str = "Catalog";
    pub const PAGES: &str = "Pages";
    pub const PAGE: &str = "Page";
}

impl Document {
    /// Identities of every top-level object that resolves to a
    /// `/Type /Catalog` dictionary, in list order.
    pub fn existing_catalogs(&self) -> Vec<ObjId> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for &id in &self.top {
            let Some(target) = self.target_id(id) else {
                continue;
            };
            if !seen.insert(target) {
                continue;
            }
            if self
                .resolve_id(target)
                .map(|o| o.dict_type() == Some(dict_types::CATALOG))
                .unwrap_or(false)
            {
                out.push(target);
            }
        }
        out
    }

    /// Produce the single catalog that is authoritative for this document.
    ///
    /// Zero catalogs: synthesize a minimal catalog with an empty `Pages`
    /// tree and append both. One: return it. Several: the first is
    /// canonical; every other catalog's top-level `Kids` entries are
    /// appended onto the canonical `Pages` (duplicates by identity removed,
    /// `/Parent` re-pointed), the orphaned catalogs and their `Pages` nodes
    /// leave the top-level list, and `Count` becomes the flattened page
    /// count.
    pub fn rebuild_catalog(&mut self) -> ObjId {
        let catalogs = self.existing_catalogs();
        let canonical = match catalogs.first() {
            None => return self.synthesize_catalog(),
            Some(&first) => first,
        };
        if catalogs.len() == 1 {
            // Still normalize the Pages entry so callers get a live node.
            self.ensure_pages_node(canonical);
            return canonical;
        }

        let pages_node = self.ensure_pages_node(canonical);
        let mut orphans: HashSet<ObjId> = HashSet::new();

        // Identities already present under the canonical tree.
        let mut present: HashSet<ObjId> = self
            .kids_of(pages_node)
            .iter()
            .filter_map(|kid| kid.as_link())
            .filter_map(|id| self.target_id(id))
            .collect();

        for &other in &catalogs[1..] {
            orphans.insert(other);
            let other_pages = match self.pages_entry(other) {
                Some(id) => id,
                None => continue,
            };
            orphans.insert(other_pages);

            for kid in self.kids_of(other_pages) {
                let Some(kid_id) = kid.as_link().and_then(|id| self.target_id(id)) else {
                    log::warn!("Skipping page-tree kid that is not an indirect reference");
                    continue;
                };
                if !present.insert(kid_id) {
                    continue;
                }
                if let Some(kid_dict) = self.get_mut(kid_id).and_then(|o| o.as_dict_mut()) {
                    kid_dict.insert("Parent".to_string(), Object::link(pages_node));
                }
                if let Some(kids) = self.kids_mut(pages_node) {
                    kids.push(Object::link(kid_id));
                }
            }
        }

        let kept: Vec<ObjId> = self
            .top
            .iter()
            .copied()
            .filter(|&id| match self.target_id(id) {
                Some(t) => !orphans.contains(&t),
                None => true,
            })
            .collect();
        self.top = kept;

        let count = self.pages(Some(canonical)).len() as i64;
        if let Some(dict) = self.get_mut(pages_node).and_then(|o| o.as_dict_mut()) {
            dict.insert("Count".to_string(), Object::Integer(count));
        }
        canonical
    }

    /// [`Document::rebuild_catalog`], then prune the top-level list to
    /// exactly the canonical catalog and its transitive closure. Orphans
    /// from earlier merges stop being serialized; their arena slots survive
    /// until the document is dropped.
    pub fn rebuild_catalog_and_objects(&mut self) -> ObjId {
        let catalog = self.rebuild_catalog();
        self.top = self.arena.reachable(&[catalog]);
        catalog
    }

    /// Recursively flatten the page tree into its `Page` leaves.
    ///
    /// `root` defaults to every existing catalog. Reference-only nodes are
    /// followed through their targets (warning and empty contribution when
    /// unresolved); a `Page` contributes itself; a `Pages` node — or any
    /// dictionary carrying `Kids` — recurses into its kids in order;
    /// a `Catalog` recurses into its `Pages`. A visited set guards against
    /// parent back-reference cycles.
    pub fn pages(&self, root: Option<ObjId>) -> Vec<ObjId> {
        let roots = match root {
            Some(id) => vec![id],
            None => self.existing_catalogs(),
        };

        let mut visited: HashSet<ObjId> = HashSet::new();
        let mut out: Vec<ObjId> = Vec::new();
        // Depth-first with children reversed, so leaves come out in
        // document order.
        let mut stack: Vec<ObjId> = roots.into_iter().rev().collect();

        while let Some(id) = stack.pop() {
            let Some(target) = self.target_id(id) else {
                continue; // warning already logged by target_id
            };
            if !visited.insert(target) {
                continue;
            }
            let Some(body) = self.resolve_id(target) else {
                continue;
            };

            match body.dict_type() {
                Some(dict_types::PAGE) => out.push(target),
                Some(dict_types::CATALOG) => {
                    match body.as_dict().and_then(|d| d.get("Pages")) {
                        Some(entry) => match entry.as_link() {
                            Some(pages_id) => stack.push(pages_id),
                            // Inline Pages dictionary: walk its kids directly.
                            None if entry.as_dict().is_some() => {
                                self.push_kids(entry, &mut stack)
                            },
                            None => {
                                log::warn!("Catalog /Pages entry is not a page tree; skipping")
                            },
                        },
                        None => {},
                    }
                },
                Some(dict_types::PAGES) => self.push_kids(body, &mut stack),
                // Lenient readers accept untyped intermediate nodes that
                // carry /Kids.
                None if body.as_dict().map(|d| d.contains_key("Kids")).unwrap_or(false) => {
                    self.push_kids(body, &mut stack)
                },
                other => {
                    log::warn!(
                        "Unrecognized page-tree node type {:?} at {}; skipping",
                        other,
                        target
                    );
                },
            }
        }
        out
    }

    /// Number of reachable `Page` leaves.
    pub fn page_count(&self) -> usize {
        self.pages(None).len()
    }

    fn push_kids(&self, body: &Object, stack: &mut Vec<ObjId>) {
        let Some(kids) = body.as_dict().and_then(|d| d.get("Kids")).and_then(|k| k.as_array())
        else {
            return; // absent Kids: nothing to recurse into
        };
        for kid in kids.iter().rev() {
            match kid.as_link() {
                Some(id) => stack.push(id),
                None => log::warn!("Page-tree kid is not an indirect reference; skipping"),
            }
        }
    }

    /// Append a minimal catalog plus empty `Pages` tree and return the
    /// catalog's identity.
    fn synthesize_catalog(&mut self) -> ObjId {
        let mut pages = Dict::new();
        pages.insert("Type".to_string(), Object::Name(dict_types::PAGES.to_string()));
        pages.insert("Kids".to_string(), Object::Array(Vec::new()));
        pages.insert("Count".to_string(), Object::Integer(0));
        let pages_id = self.arena.alloc(Object::Dictionary(pages));

        let mut catalog = Dict::new();
        catalog.insert("Type".to_string(), Object::Name(dict_types::CATALOG.to_string()));
        catalog.insert("Pages".to_string(), Object::link(pages_id));
        let catalog_id = self.push_object(Object::Dictionary(catalog));
        self.top.push(pages_id);
        catalog_id
    }

    /// Identity of the `Pages` node a catalog points at, if resolvable.
    pub(crate) fn pages_entry(&self, catalog: ObjId) -> Option<ObjId> {
        let entry = self
            .resolve_id(catalog)?
            .as_dict()?
            .get("Pages")?
            .as_link()?;
        self.target_id(entry)
    }

    /// The catalog's `Pages` node as a live arena identity, normalizing an
    /// inline or missing entry into a real node.
    pub(crate) fn ensure_pages_node(&mut self, catalog: ObjId) -> ObjId {
        if let Some(id) = self.pages_entry(catalog) {
            // A live node may still lack a Kids array; callers splice into it.
            if let Some(dict) = self.get_mut(id).and_then(|o| o.as_dict_mut()) {
                dict.entry("Kids".to_string())
                    .or_insert_with(|| Object::Array(Vec::new()));
            }
            return id;
        }

        // Inline Pages dictionary: hoist it into its own slot.
        let inline = self
            .resolve_id(catalog)
            .and_then(|o| o.as_dict())
            .and_then(|d| d.get("Pages"))
            .and_then(|p| p.as_dict())
            .cloned();

        let mut pages = inline.unwrap_or_else(|| {
            let mut d = Dict::new();
            d.insert("Type".to_string(), Object::Name(dict_types::PAGES.to_string()));
            d.insert("Kids".to_string(), Object::Array(Vec::new()));
            d.insert("Count".to_string(), Object::Integer(0));
            d
        });
        pages
            .entry("Kids".to_string())
            .or_insert_with(|| Object::Array(Vec::new()));

        let pages_id = self.push_object(Object::Dictionary(pages));
        let catalog_slot = self
            .target_id(catalog)
            .unwrap_or(catalog);
        if let Some(dict) = self.get_mut(catalog_slot).and_then(|o| o.as_dict_mut()) {
            dict.insert("Pages".to_string(), Object::link(pages_id));
        }
        pages_id
    }

    /// Clone of a node's `Kids` entries (empty when absent).
    pub(crate) fn kids_of(&self, node: ObjId) -> Vec<Object> {
        self.resolve_id(node)
            .and_then(|o| o.as_dict())
            .and_then(|d| d.get("Kids"))
            .and_then(|k| k.as_array())
            .cloned()
            .unwrap_or_default()
    }

    /// Mutable borrow of a node's `Kids` array.
    pub(crate) fn kids_mut(&mut self, node: ObjId) -> Option<&mut Vec<Object>> {
        self.get_mut(node)?
            .as_dict_mut()?
            .get_mut("Kids")?
            .as_array_mut()
    }
}
