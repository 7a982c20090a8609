// Fixture builders shared by the integration tests.
//
// Encrypted inputs are produced with lopdf's own RC4-128 security handler so
// the tests need no binary fixtures on disk.

#![allow(dead_code)]

use lopdf::{
    dictionary, Dictionary, Document, EncryptionState, EncryptionVersion, Object, Permissions,
    Stream, StringFormat,
};
use std::path::Path;

pub const TITLE: &str = "Quarterly report";
pub const OWNER_PASSWORD: &str = "owner-secret";

/// Build an unencrypted document with `pages` pages. Each page shows
/// `Page N`. MediaBox and Resources live on the page-tree root so pages
/// inherit them.
pub fn build_pdf(pages: u32, with_info: bool) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for n in 1..=pages {
        let content = format!("BT /F1 24 Tf 72 720 Td (Page {n}) Tj ET");
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if with_info {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(TITLE),
            "Author" => Object::string_literal("Finance"),
        });
        doc.trailer.set("Info", info_id);
    }

    // The standard security handler keys off the first file identifier.
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(vec![1u8; 16], StringFormat::Literal),
            Object::String(vec![2u8; 16], StringFormat::Literal),
        ]),
    );

    doc
}

pub fn encrypt(doc: &mut Document, user_password: &str) {
    let version = EncryptionVersion::V2 {
        document: &*doc,
        owner_password: OWNER_PASSWORD,
        user_password,
        key_length: 128,
        permissions: Permissions::all(),
    };
    let state = EncryptionState::try_from(version).expect("build encryption state");
    doc.encrypt(&state).expect("encrypt fixture");
}

/// Write a `pages`-page PDF encrypted with `password` to `path`. An empty
/// `password` leaves only the owner password set.
pub fn write_encrypted(path: &Path, pages: u32, password: &str) {
    let mut doc = build_pdf(pages, true);
    encrypt(&mut doc, password);
    doc.save(path).expect("save encrypted fixture");
}

/// Write a `pages`-page PDF with no encryption to `path`.
pub fn write_plain(path: &Path, pages: u32) {
    let mut doc = build_pdf(pages, true);
    doc.save(path).expect("save plain fixture");
}

/// Decompressed content stream of every page, in page order.
pub fn page_contents(path: &Path) -> Vec<Vec<u8>> {
    let doc = Document::load(path).expect("load output");
    doc.get_pages()
        .into_values()
        .map(|id| doc.get_page_content(id).expect("page content"))
        .collect()
}

pub fn page_count(path: &Path) -> usize {
    Document::load(path).expect("load output").get_pages().len()
}
