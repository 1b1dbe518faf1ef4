//! Report generation: uniform career sampling and the print-ready PDF
//! document mailed to (and downloadable by) the respondent.

pub mod pdf;
pub mod sampler;

pub use pdf::{render_pdf, ReportContext};
pub use sampler::{sample_careers, MAX_SAMPLED_CAREERS};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("pdf generation failed: {0}")]
    Pdf(#[from] printpdf::Error),
}
