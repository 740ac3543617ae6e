use super::toc::{extract_toc, TocEntry};
use anyhow::{Context, Result};
use lopdf::{Document, Object, ObjectId};
use std::path::Path;

/// An opened source PDF.
///
/// The underlying document is owned; dropping the handle releases it, so the
/// source is closed exactly once on every exit path.
pub struct PdfDocument {
    pub doc: Document,
    pub path: String,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().display().to_string();
        let doc =
            Document::load(&path).with_context(|| format!("Failed to open PDF: {}", path_str))?;
        Ok(PdfDocument {
            doc,
            path: path_str,
        })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        let mut pages: Vec<_> = self.doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        pages
    }

    /// Flattened table of contents, in outline declaration order
    pub fn toc(&self) -> Result<Vec<TocEntry>> {
        extract_toc(&self.doc)
            .with_context(|| format!("Failed to read table of contents: {}", self.path))
    }

    /// Copy the 1-based inclusive page range `first..=last` into a new document
    pub fn extract_page_range(&self, first: u32, last: u32) -> Result<Document> {
        let all_pages = self.page_ids();
        let total = all_pages.len() as u32;

        if first == 0 || first > last || last > total {
            anyhow::bail!(
                "Page range {}-{} is out of range (1-{})",
                first,
                last,
                total
            );
        }

        let pages_to_delete: Vec<u32> = all_pages
            .iter()
            .map(|(num, _)| *num)
            .filter(|num| !(first..=last).contains(num))
            .collect();

        let mut new_doc = self.doc.clone();
        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
        }

        // Bookmarks would point at pages that are no longer there
        if let Ok(root_id) = new_doc.trailer.get(b"Root").and_then(Object::as_reference) {
            if let Ok(catalog) = new_doc.get_dictionary_mut(root_id) {
                catalog.remove(b"Outlines");
            }
        }
        new_doc.prune_objects();

        Ok(new_doc)
    }

    /// Save to a file
    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<()> {
        doc.save(&path)
            .with_context(|| format!("Failed to save PDF: {}", path.as_ref().display()))?;
        Ok(())
    }
}
