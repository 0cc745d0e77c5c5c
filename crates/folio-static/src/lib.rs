//! Static site export for folio portfolios.
//!
//! Renders a portfolio into a flat map of files (an `index.html`, one page
//! per project and deployment boilerplate) or into a single HTML document.

pub mod assets;
pub mod exporter;
pub mod templates;

pub use exporter::{
    write_site, ExportError, ExportOptions, ExportOutcome, SiteExporter, SiteFiles,
};
