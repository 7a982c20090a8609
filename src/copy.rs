use crate::pdf_utils;
use crate::{Result, UnlockConfig};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use std::collections::BTreeSet;
use tracing::debug;

/// Page attributes a page may inherit from its ancestors in the page tree
/// (PDF 32000-1 §7.7.3.4).
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guards the `/Parent` walk against cyclic page trees.
const MAX_TREE_DEPTH: usize = 64;

// ── CopiedDocument ───────────────────────────────────────────────────────────

pub(crate) struct CopiedDocument {
    pub(crate) document: Document,
    pub(crate) page_count: usize,
    pub(crate) metadata_copied: bool,
}

// ── PageCopier ───────────────────────────────────────────────────────────────
//
// Builds a fresh document from an already-decrypted source. Page objects keep
// their object ids so every resource they reference stays valid; the page
// tree, catalog and trailer are rebuilt from scratch, which leaves the
// encryption dictionary unreachable.

pub(crate) struct PageCopier<'a> {
    source: &'a Document,
    config: &'a UnlockConfig,
}

impl<'a> PageCopier<'a> {
    pub(crate) fn new(source: &'a Document, config: &'a UnlockConfig) -> Self {
        Self { source, config }
    }

    pub(crate) fn copy(&self) -> Result<CopiedDocument> {
        // get_pages() is keyed by page number, so values come out in order.
        let page_ids: Vec<ObjectId> = self.source.get_pages().into_values().collect();

        let mut dest = Document::with_version(self.source.version.clone());
        let skipped = self.structural_ids();
        for (id, object) in &self.source.objects {
            if !skipped.contains(id) {
                dest.objects.insert(*id, object.clone());
            }
        }
        dest.max_id = self.source.max_id;

        let pages_id = dest.new_object_id();
        for &page_id in &page_ids {
            let mut page = self.flattened_page(page_id)?;
            page.set("Parent", pages_id);
            dest.objects.insert(page_id, Object::Dictionary(page));
        }

        let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();
        dest.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_ids.len() as i64,
            }),
        );

        let catalog_id = dest.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        dest.trailer.set("Root", catalog_id);

        let mut metadata_copied = false;
        if self.config.copy_metadata {
            if let Some(info) = pdf_utils::info_dictionary(self.source) {
                let info_id = dest.add_object(info);
                dest.trailer.set("Info", info_id);
                metadata_copied = true;
            }
        }

        if self.config.prune_unreferenced {
            let pruned = dest.prune_objects();
            debug!(count = pruned.len(), "pruned unreachable objects");
        }

        if self.config.compress_output {
            dest.compress();
        }

        Ok(CopiedDocument {
            document: dest,
            page_count: page_ids.len(),
            metadata_copied,
        })
    }

    /// Ids of objects that must not be carried over verbatim: the old catalog,
    /// every page-tree node, the encryption dictionary, and cross-reference or
    /// object streams left behind by the reader.
    fn structural_ids(&self) -> BTreeSet<ObjectId> {
        let mut ids = BTreeSet::new();

        for key in [b"Root" as &[u8], b"Encrypt"] {
            if let Ok(id) = self.source.trailer.get(key).and_then(Object::as_reference) {
                ids.insert(id);
            }
        }

        for (id, object) in &self.source.objects {
            let skip = match object {
                Object::Dictionary(dict) => pdf_utils::has_type(dict, b"Pages"),
                Object::Stream(stream) => {
                    pdf_utils::has_type(&stream.dict, b"XRef")
                        || pdf_utils::has_type(&stream.dict, b"ObjStm")
                }
                _ => false,
            };
            if skip {
                ids.insert(*id);
            }
        }

        ids
    }

    /// Clone a page dictionary and copy down any inheritable attribute the page
    /// does not set itself, nearest ancestor first.
    fn flattened_page(&self, page_id: ObjectId) -> Result<Dictionary> {
        let mut page = self.source.get_object(page_id)?.as_dict()?.clone();

        let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
        let mut depth = 0;
        while let Some(node_id) = parent {
            if depth >= MAX_TREE_DEPTH {
                break;
            }
            let node = match self.source.get_object(node_id).and_then(Object::as_dict) {
                Ok(node) => node,
                Err(_) => break,
            };
            for key in INHERITABLE_KEYS {
                if !page.has(key) {
                    if let Ok(value) = node.get(key) {
                        page.set(key, value.clone());
                    }
                }
            }
            parent = node.get(b"Parent").and_then(Object::as_reference).ok();
            depth += 1;
        }

        Ok(page)
    }
}
