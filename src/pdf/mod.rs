pub mod document;
pub mod toc;

pub use document::PdfDocument;
