use crate::pdf::PdfDocument;
use crate::sections::Section;
use anyhow::{Context, Result};
use log::Log;
use std::path::PathBuf;

/// Zero-based, inclusive page range copied for one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpan {
    pub from: u32,
    pub to: u32,
}

impl PageSpan {
    pub fn for_section(section: &Section, total_pages: u32) -> Self {
        let from = section.start_page.saturating_sub(1);
        let to = section.end_page.min(total_pages).saturating_sub(1);
        // A successor that starts on an earlier page leaves only the start page
        PageSpan {
            from,
            to: to.max(from),
        }
    }

    /// First and last page as 1-based numbers
    pub fn one_based(&self) -> (u32, u32) {
        (self.from + 1, self.to + 1)
    }
}

/// Replace every character that is not alphanumeric with `_`, one for one.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// `{prefix}_{index:02}_{title}.pdf`, `index` counting from 1.
pub fn output_path(prefix: &str, index: usize, title: &str) -> PathBuf {
    PathBuf::from(format!("{}_{:02}_{}.pdf", prefix, index, sanitize_title(title)))
}

/// Copy one section into its own file and return the path written.
pub fn export_section(
    doc: &PdfDocument,
    section: &Section,
    index: usize,
    prefix: &str,
    logger: &dyn Log,
) -> Result<PathBuf> {
    let span = PageSpan::for_section(section, doc.page_count());
    let (first, last) = span.one_based();
    let output = output_path(prefix, index, &section.title);

    log::debug!(
        logger: logger,
        "Copying pages {}-{} for section '{}'",
        first,
        last,
        section.title
    );

    let mut new_doc = doc
        .extract_page_range(first, last)
        .with_context(|| format!("Failed to copy pages for section '{}'", section.title))?;
    PdfDocument::save(&mut new_doc, &output)?;

    log::info!(
        logger: logger,
        "Created: {} (Pages {}-{})",
        output.display(),
        first,
        last
    );

    Ok(output)
}
