//! Programmatic PDF fixtures for the integration tests.

#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use pdfexcise::pdfexcise_core::Filter;
use pdfexcise::pdfexcise_parse::codec;

/// Builds a small multi-page document.
pub struct FixtureBuilder {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

/// One page under construction.
pub struct PageFixture {
    pub contents: Vec<ObjectId>,
    pub xobjects: Vec<(String, ObjectId)>,
    pub annotations: Vec<Object>,
}

impl PageFixture {
    pub fn new(contents: &[ObjectId]) -> Self {
        Self {
            contents: contents.to_vec(),
            xobjects: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn with_form(mut self, name: &str, form: ObjectId) -> Self {
        self.xobjects.push((name.to_string(), form));
        self
    }

    pub fn with_annotation(mut self, contents: &str) -> Self {
        self.annotations.push(Object::Dictionary(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Text",
            "Rect" => vec![0.into(), 0.into(), 20.into(), 20.into()],
            "Contents" => Object::String(contents.as_bytes().to_vec(), StringFormat::Literal),
        }));
        self
    }
}

impl FixtureBuilder {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// An unfiltered content stream.
    pub fn stream(&mut self, content: &[u8]) -> ObjectId {
        self.doc
            .add_object(Stream::new(Dictionary::new(), content.to_vec()))
    }

    /// A Flate-compressed content stream.
    pub fn flate_stream(&mut self, content: &[u8]) -> ObjectId {
        let packed = codec::encode(content, &[Filter::FLATE]).expect("deflate fixture");
        self.doc.add_object(Stream::new(
            dictionary! { "Filter" => "FlateDecode" },
            packed,
        ))
    }

    /// A content stream declaring a filter the editor does not support.
    pub fn opaque_stream(&mut self, filter: &str, payload: &[u8]) -> ObjectId {
        self.doc.add_object(Stream::new(
            dictionary! { "Filter" => filter },
            payload.to_vec(),
        ))
    }

    /// A form XObject with the given content and optional nested forms.
    pub fn form(&mut self, content: &[u8], nested: &[(&str, ObjectId)]) -> ObjectId {
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        if !nested.is_empty() {
            dict.set("Resources", xobject_resources(nested));
        }
        self.doc.add_object(Stream::new(dict, content.to_vec()))
    }

    pub fn page(&mut self, page_fixture: PageFixture) -> ObjectId {
        let contents: Object = match page_fixture.contents.as_slice() {
            [single] => Object::Reference(*single),
            many => Object::Array(many.iter().map(|&id| Object::Reference(id)).collect()),
        };
        let named: Vec<(&str, ObjectId)> = page_fixture
            .xobjects
            .iter()
            .map(|(name, id)| (name.as_str(), *id))
            .collect();
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => contents,
            "Resources" => xobject_resources(&named),
        };
        if !page_fixture.annotations.is_empty() {
            page.set("Annots", Object::Array(page_fixture.annotations));
        }
        let id = self.doc.add_object(page);
        self.kids.push(id.into());
        id
    }

    /// Convenience: one page per content stream, no resources.
    pub fn pages(mut self, contents: &[&[u8]]) -> Self {
        for content in contents {
            let id = self.stream(content);
            self.page(PageFixture::new(&[id]));
        }
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        let count = self.kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => self.kids,
                "Count" => count,
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        self.doc.save_to(&mut buf).expect("failed to save test PDF");
        buf
    }
}

fn xobject_resources(named: &[(&str, ObjectId)]) -> Dictionary {
    let mut xobjects = Dictionary::new();
    for (name, id) in named {
        xobjects.set(*name, Object::Reference(*id));
    }
    dictionary! { "XObject" => xobjects }
}

/// Raw payload of object `id` in a saved document.
pub fn stream_content(bytes: &[u8], id: ObjectId) -> Vec<u8> {
    let doc = Document::load_mem(bytes).expect("reload");
    let stream = doc
        .get_object(id)
        .and_then(Object::as_stream)
        .expect("stream object");
    if stream.dict.get(b"Filter").is_ok() {
        stream.decompressed_content().expect("decompress")
    } else {
        stream.content.clone()
    }
}

/// `/Filter` name of object `id` in a saved document, if any.
pub fn stream_filter(bytes: &[u8], id: ObjectId) -> Option<String> {
    let doc = Document::load_mem(bytes).expect("reload");
    let stream = doc
        .get_object(id)
        .and_then(Object::as_stream)
        .expect("stream object");
    stream
        .dict
        .get(b"Filter")
        .and_then(Object::as_name)
        .ok()
        .map(|name| String::from_utf8_lossy(name).into_owned())
}

/// Undecoded payload of object `id` in a saved document.
pub fn raw_stream(bytes: &[u8], id: ObjectId) -> Vec<u8> {
    let doc = Document::load_mem(bytes).expect("reload");
    doc.get_object(id)
        .and_then(Object::as_stream)
        .expect("stream object")
        .content
        .clone()
}
