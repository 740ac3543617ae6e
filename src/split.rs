use crate::export::export_section;
use crate::pdf::PdfDocument;
use crate::sections::build_sections;
use anyhow::Result;
use log::Log;
use std::path::{Path, PathBuf};

/// What a completed run produced.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SplitReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<String>,
}

/// Split `input` into one PDF per top-level TOC entry.
///
/// A document without a usable table of contents is not an error; the run
/// completes without writing anything. The first export failure ends the run
/// and files written before it are left in place.
pub fn run<P: AsRef<Path>>(
    input: P,
    output_prefix: &str,
    logger: &dyn Log,
) -> Result<SplitReport> {
    let doc = PdfDocument::open(&input)?;
    let total_pages = doc.page_count();
    log::debug!(logger: logger, "Opened {} ({} pages)", doc.path, total_pages);

    let toc = doc.toc()?;
    log::debug!(logger: logger, "Table of contents has {} entries", toc.len());

    let mut report = SplitReport::default();
    if toc.is_empty() {
        log::warn!(
            logger: logger,
            "No usable table of contents found. Cannot split the PDF."
        );
        return Ok(report);
    }

    let plan = build_sections(&toc, total_pages);
    for skipped in &plan.skipped {
        log::warn!(
            logger: logger,
            "Skipping section '{}' due to invalid start page",
            skipped.title
        );
        report.skipped.push(skipped.title.clone());
    }
    if plan.is_empty() {
        log::warn!(
            logger: logger,
            "No usable table of contents found: no top-level entry has a page. \
             Cannot split the PDF."
        );
        return Ok(report);
    }

    for (i, section) in plan.sections.iter().enumerate() {
        log::debug!(
            logger: logger,
            "Section {}: '{}' pages {}..{}",
            i + 1,
            section.title,
            section.start_page,
            section.end_page
        );
        let written = export_section(&doc, section, i + 1, output_prefix, logger)?;
        report.written.push(written);
    }

    Ok(report)
}
