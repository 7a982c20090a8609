//! Shared PDF object helpers used by the unlocker and the page copier.

use lopdf::{Dictionary, Document, Object};

/// Resolve a value that might be an inline dictionary or a reference to one.
pub fn resolve_dict(document: &Document, value: &Object) -> Option<Dictionary> {
    if let Ok(id) = value.as_reference() {
        document
            .get_object(id)
            .ok()
            .and_then(|o| o.as_dict().ok().cloned())
    } else {
        value.as_dict().ok().cloned()
    }
}

/// The trailer's `/Info` dictionary, or `None` when it is missing or empty.
pub fn info_dictionary(document: &Document) -> Option<Dictionary> {
    let info = document.trailer.get(b"Info").ok()?;
    resolve_dict(document, info).filter(|d| !d.is_empty())
}

/// Returns `true` when the dictionary's `/Type` is the given name.
pub fn has_type(dict: &Dictionary, name: &[u8]) -> bool {
    dict.get(b"Type")
        .and_then(Object::as_name)
        .map(|t| t == name)
        .unwrap_or(false)
}
