//! Top-level section boundaries derived from a flattened table of contents.
//!
//! Pages here are 1-based as they come out of the outline. A section covers
//! `start_page..end_page`; the conversion to the page range that is actually
//! copied happens in [`crate::export`].

use crate::pdf::toc::TocEntry;

/// A top-level section with a resolved page range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub start_page: u32,
    /// Start of the following section, or the total page count.
    pub end_page: u32,
}

/// A top-level entry whose start page could not be determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSection {
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionPlan {
    pub sections: Vec<Section>,
    pub skipped: Vec<SkippedSection>,
}

impl SectionPlan {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[derive(Debug)]
struct PendingSection {
    title: String,
    start_page: Option<u32>,
}

/// Group TOC entries into top-level sections.
///
/// Every depth-1 entry opens a section. A depth-1 entry without a page takes
/// the page of its first descendant that has one. A section ends where the
/// next one starts, or at `total_pages` when the next start is unknown or
/// there is no next section. Sections whose start stays unknown are reported
/// in [`SectionPlan::skipped`].
pub fn build_sections(toc: &[TocEntry], total_pages: u32) -> SectionPlan {
    let mut pending: Vec<PendingSection> = Vec::new();
    let mut current: Option<PendingSection> = None;

    for entry in toc {
        if entry.depth == 1 {
            if let Some(done) = current.take() {
                pending.push(done);
            }
            current = Some(PendingSection {
                title: entry.title.clone(),
                start_page: entry.page,
            });
        } else if let (Some(page), Some(section)) = (entry.page, current.as_mut()) {
            if section.start_page.is_none() {
                section.start_page = Some(page);
            }
        }
    }
    if let Some(done) = current {
        pending.push(done);
    }

    let mut plan = SectionPlan::default();
    for (i, section) in pending.iter().enumerate() {
        let Some(start_page) = section.start_page else {
            plan.skipped.push(SkippedSection {
                title: section.title.clone(),
            });
            continue;
        };

        let end_page = pending
            .get(i + 1)
            .and_then(|next| next.start_page)
            .unwrap_or(total_pages);

        plan.sections.push(Section {
            title: section.title.clone(),
            start_page,
            end_page,
        });
    }

    plan
}
