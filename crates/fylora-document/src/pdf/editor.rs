// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Structured PDF editor — load, create, save, copy pages between documents,
// and rotate pages, using the `lopdf` crate.

use fylora_core::error::{FyloraError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, info, instrument, warn};

/// Recursion guard for object-graph imports; malformed documents can contain
/// reference cycles beyond the /Parent back-edge.
const MAX_IMPORT_DEPTH: usize = 32;

/// In-memory, editable representation of a PDF document.
///
/// Wraps `lopdf::Document` and provides the operations the transformation
/// handlers need: page enumeration, copying pages across documents (deep
/// clone of the page object graph), rotation, and serialisation with or
/// without structural compaction.
#[derive(Debug)]
pub struct PdfEditor {
    document: Document,
}

impl PdfEditor {
    // -- Construction ---------------------------------------------------------

    /// Parse a PDF from raw bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data)
            .map_err(|err| FyloraError::CorruptedDocument(err.to_string()))?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    /// Create an empty document with a catalog and an empty page tree.
    pub fn empty() -> Self {
        let mut document = Document::with_version("1.5");

        let pages_id = document.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(Vec::new())),
            ("Count", Object::Integer(0)),
        ]));
        let catalog_id = document.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        document.trailer.set("Root", Object::Reference(catalog_id));

        Self { document }
    }

    /// Wrap an already-built `lopdf::Document`.
    pub fn from_document(document: Document) -> Self {
        Self { document }
    }

    // -- Raw access -----------------------------------------------------------

    /// Borrow the underlying `lopdf::Document`.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutably borrow the underlying `lopdf::Document`.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Page object IDs in page order.
    pub fn page_ids(&self) -> Vec<ObjectId> {
        self.document.get_pages().values().copied().collect()
    }

    /// Object ID of the page at `index` (0-based).
    pub fn page_id(&self, index: usize) -> Result<ObjectId> {
        self.page_ids()
            .get(index)
            .copied()
            .ok_or_else(|| {
                FyloraError::Pdf(format!(
                    "page index {} out of range (document has {} pages)",
                    index,
                    self.page_count()
                ))
            })
    }

    /// Whether the document carries an /Encrypt dictionary.
    pub fn is_encrypted(&self) -> bool {
        self.document.trailer.get(b"Encrypt").is_ok()
    }

    /// Page dimensions (width, height) in content-space units, resolving the
    /// MediaBox through the page tree when inherited. Defaults to US Letter
    /// when no MediaBox is present anywhere.
    pub fn page_size(&self, index: usize) -> Result<(f32, f32)> {
        let page_id = self.page_id(index)?;
        let media_box = self
            .inherited_entry(page_id, b"MediaBox")
            .and_then(|obj| rect_from_object(&self.document, obj))
            .unwrap_or([0.0, 0.0, 612.0, 792.0]);
        Ok((media_box[2] - media_box[0], media_box[3] - media_box[1]))
    }

    /// Current /Rotate value of the page at `index`, resolving inheritance,
    /// defaulting to 0.
    pub fn rotation(&self, index: usize) -> Result<i32> {
        let page_id = self.page_id(index)?;
        let rotation = self
            .inherited_entry(page_id, b"Rotate")
            .and_then(|obj| obj.as_i64().ok())
            .map(|v| v as i32)
            .unwrap_or(0);
        Ok(rotation)
    }

    // -- Rotation -------------------------------------------------------------

    /// Add `degrees` to every page's declared rotation, normalised mod 360.
    ///
    /// Rotation is additive to whatever each page already declares, not
    /// absolute.
    #[instrument(skip(self), fields(pages = self.page_count()))]
    pub fn rotate_all(&mut self, degrees: i32) -> Result<()> {
        for index in 0..self.page_count() {
            let current = self.rotation(index)?;
            let next = (current + degrees).rem_euclid(360);
            let page_id = self.page_id(index)?;
            if let Ok(Object::Dictionary(dict)) = self.document.get_object_mut(page_id) {
                dict.set("Rotate", Object::Integer(next as i64));
            }
        }
        info!(degrees, "Rotation applied to all pages");
        Ok(())
    }

    // -- Page copying ---------------------------------------------------------

    /// Deep-copy the page at `index` from `source` and append it to this
    /// document's page tree.
    ///
    /// The page object and everything it transitively references (content
    /// streams, fonts, images) are cloned as new objects; document-level
    /// state of the source (encryption, metadata) is not carried over.
    /// Attributes the page inherits from its ancestors (MediaBox, Resources,
    /// Rotate) are materialised onto the copy so it stays self-contained.
    pub fn append_page_from(&mut self, source: &PdfEditor, index: usize) -> Result<()> {
        let source_id = source.page_id(index)?;
        let page_object = source.document.get_object(source_id).map_err(|err| {
            FyloraError::Pdf(format!("cannot read page object {source_id:?}: {err}"))
        })?;

        let mut cloned = import_object(&source.document, &mut self.document, page_object, 0)?;

        // Materialise inherited page attributes that the clone would lose.
        if let Object::Dictionary(dict) = &mut cloned {
            let inheritable: [&[u8]; 4] = [b"MediaBox", b"Resources", b"Rotate", b"CropBox"];
            for key in inheritable {
                if !dict.has(key)
                    && let Some(inherited) = source.inherited_entry(source_id, key)
                {
                    let value =
                        import_object(&source.document, &mut self.document, &inherited, 0)?;
                    dict.set(key.to_vec(), value);
                }
            }
        }

        let cloned_id = self.document.add_object(cloned);
        self.attach_page(cloned_id)
    }

    /// Append copies of all pages of `source`, in their original order.
    #[instrument(skip_all, fields(pages = source.page_count()))]
    pub fn append_all_pages_from(&mut self, source: &PdfEditor) -> Result<()> {
        for index in 0..source.page_count() {
            self.append_page_from(source, index)?;
        }
        Ok(())
    }

    /// Register an already-added page object in the page tree: push it onto
    /// /Kids, bump /Count, and point its /Parent at the tree root.
    pub fn attach_page(&mut self, page_id: ObjectId) -> Result<()> {
        let pages_id = self.pages_root_id()?;

        if let Ok(Object::Dictionary(pages_dict)) = self.document.get_object_mut(pages_id) {
            if let Ok(Object::Array(kids)) = pages_dict.get_mut(b"Kids") {
                kids.push(Object::Reference(page_id));
            }
            if let Ok(Object::Integer(count)) = pages_dict.get_mut(b"Count") {
                *count += 1;
            }
        }

        if let Ok(Object::Dictionary(page_dict)) = self.document.get_object_mut(page_id) {
            page_dict.set("Parent", Object::Reference(pages_id));
            page_dict.set("Type", Object::Name(b"Page".to_vec()));
        }

        Ok(())
    }

    // -- Serialisation --------------------------------------------------------

    /// Serialise the document to bytes.
    #[instrument(skip(self))]
    pub fn save(&mut self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.document
            .save_to(&mut output)
            .map_err(|err| FyloraError::Pdf(format!("failed to serialise PDF: {err}")))?;
        debug!(output_bytes = output.len(), "PDF serialised");
        Ok(output)
    }

    /// Serialise with structural compaction: renumber the object table and
    /// deflate-compress eligible streams. Visual content is unchanged.
    #[instrument(skip(self))]
    pub fn save_compacted(&mut self) -> Result<Vec<u8>> {
        self.document.renumber_objects();
        self.document.compress();
        let mut output = Vec::new();
        self.document
            .save_to(&mut output)
            .map_err(|err| FyloraError::Pdf(format!("failed to serialise compacted PDF: {err}")))?;
        debug!(output_bytes = output.len(), "Compacted PDF serialised");
        Ok(output)
    }

    // -- Helpers --------------------------------------------------------------

    /// Look up `key` on a page dictionary, walking /Parent links when the key
    /// is inherited from an ancestor node. Returns a clone of the value.
    fn inherited_entry(&self, page_id: ObjectId, key: &[u8]) -> Option<Object> {
        let mut current = page_id;
        for _ in 0..MAX_IMPORT_DEPTH {
            let dict = self
                .document
                .get_object(current)
                .ok()
                .and_then(|obj| obj.as_dict().ok())?;
            if let Ok(value) = dict.get(key) {
                return Some(value.clone());
            }
            current = dict.get(b"Parent").ok()?.as_reference().ok()?;
        }
        None
    }

    /// Object ID of the /Pages root referenced from the catalog.
    fn pages_root_id(&self) -> Result<ObjectId> {
        let catalog = self
            .document
            .catalog()
            .map_err(|err| FyloraError::Pdf(format!("no catalog: {err}")))?;
        match catalog.get(b"Pages") {
            Ok(Object::Reference(id)) => Ok(*id),
            Ok(_) => Err(FyloraError::Pdf("/Pages is not a reference".to_string())),
            Err(err) => Err(FyloraError::Pdf(format!("no /Pages: {err}"))),
        }
    }
}

/// Read a 4-number rectangle from an Array object (or a reference to one).
fn rect_from_object(document: &Document, object: Object) -> Option<[f32; 4]> {
    let resolved = match object {
        Object::Reference(id) => document.get_object(id).ok()?.clone(),
        other => other,
    };
    let array = resolved.as_array().ok()?;
    if array.len() != 4 {
        return None;
    }
    let mut rect = [0.0f32; 4];
    for (slot, value) in rect.iter_mut().zip(array) {
        *slot = number(value)?;
    }
    Some(rect)
}

/// Convert a numeric lopdf object (Integer or Real) to f32.
pub(crate) fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Deep-clone an object from `source` into `target`, recursively resolving
/// references. /Parent is deliberately skipped (the page tree attachment
/// patches it) and unresolvable references degrade to Null.
fn import_object(
    source: &Document,
    target: &mut Document,
    object: &Object,
    depth: usize,
) -> Result<Object> {
    if depth > MAX_IMPORT_DEPTH {
        warn!(depth, "Import depth limit hit, inserting Null");
        return Ok(Object::Null);
    }

    match object {
        Object::Dictionary(dict) => {
            let mut new_dict = Dictionary::new();
            for (key, value) in dict.iter() {
                if key == b"Parent" {
                    continue;
                }
                let cloned = import_object(source, target, value, depth + 1)?;
                new_dict.set(key.clone(), cloned);
            }
            Ok(Object::Dictionary(new_dict))
        }
        Object::Array(items) => {
            let mut new_items = Vec::with_capacity(items.len());
            for item in items {
                new_items.push(import_object(source, target, item, depth + 1)?);
            }
            Ok(Object::Array(new_items))
        }
        Object::Reference(ref_id) => match source.get_object(*ref_id) {
            Ok(referenced) => {
                let cloned = import_object(source, target, referenced, depth + 1)?;
                let new_id = target.add_object(cloned);
                Ok(Object::Reference(new_id))
            }
            Err(err) => {
                warn!(?ref_id, %err, "Cannot resolve reference, using Null");
                Ok(Object::Null)
            }
        },
        Object::Stream(stream) => {
            let mut new_dict = Dictionary::new();
            for (key, value) in stream.dict.iter() {
                if key == b"Parent" {
                    continue;
                }
                let cloned = import_object(source, target, value, depth + 1)?;
                new_dict.set(key.clone(), cloned);
            }
            Ok(Object::Stream(lopdf::Stream::new(
                new_dict,
                stream.content.clone(),
            )))
        }
        other => Ok(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testdoc::sample_pdf;

    #[test]
    fn empty_document_has_no_pages() {
        let mut editor = PdfEditor::empty();
        assert_eq!(editor.page_count(), 0);
        let bytes = editor.save().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn copies_preserve_page_order() {
        let source = PdfEditor::from_bytes(&sample_pdf(&["one", "two", "three"])).unwrap();
        let mut target = PdfEditor::empty();
        target.append_all_pages_from(&source).unwrap();
        assert_eq!(target.page_count(), 3);

        let bytes = target.save().unwrap();
        let reloaded = PdfEditor::from_bytes(&bytes).unwrap();
        assert_eq!(reloaded.page_count(), 3);
    }

    #[test]
    fn rotation_is_additive_and_normalised() {
        let mut editor = PdfEditor::from_bytes(&sample_pdf(&["page"])).unwrap();
        assert_eq!(editor.rotation(0).unwrap(), 0);

        editor.rotate_all(90).unwrap();
        assert_eq!(editor.rotation(0).unwrap(), 90);

        editor.rotate_all(270).unwrap();
        assert_eq!(editor.rotation(0).unwrap(), 0);

        editor.rotate_all(-90).unwrap();
        assert_eq!(editor.rotation(0).unwrap(), 270);
    }

    #[test]
    fn page_size_reads_media_box() {
        let editor = PdfEditor::from_bytes(&sample_pdf(&["page"])).unwrap();
        let (width, height) = editor.page_size(0).unwrap();
        assert_eq!(width, 612.0);
        assert_eq!(height, 792.0);
    }

    #[test]
    fn corrupt_bytes_are_rejected() {
        let err = PdfEditor::from_bytes(b"not a pdf at all").unwrap_err();
        assert!(matches!(err, FyloraError::CorruptedDocument(_)));
    }

    #[test]
    fn page_index_out_of_range() {
        let editor = PdfEditor::from_bytes(&sample_pdf(&["only"])).unwrap();
        assert!(editor.page_id(1).is_err());
    }
}
