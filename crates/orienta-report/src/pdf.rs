//! The print-ready report document.
//!
//! One logical document per invocation, US Letter, fixed section order:
//! title block, introduction, instrument description, respondent line,
//! results narrative, profile descriptor, tally table, sampled careers
//! (omitted when empty), generated-on footer. Generation is total over
//! well-formed inputs — an unknown descriptor falls back to a placeholder
//! rather than failing.

use std::io::BufWriter;

use chrono::NaiveDate;
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use orienta_core::{ProfileDescriptor, ProfileTag, ScoreTally};

use crate::ReportError;

// US Letter.
const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 20.0;

const TITLE: &str = "Vocational Interest Test Report";

const INTRO: &str = "This report was designed to help you choose among the wide range of \
options higher education offers. Choosing a career is one of the most important decisions \
in life, so the following report is built from your test results, analyzed to determine \
the options most likely to lead to a successful professional path.";

const INSTRUMENT: &str = "Vocational Interest Test. This instrument is used to assess and \
understand your interests and abilities with respect to the professional activities you \
would like to pursue. It identifies interest profiles and offers an overview of some \
professions to consider.";

const RESULTS: &str = "Interest areas. Interests are preferences for carrying out certain \
activities. They are the inclination and motivation that will lead you to a given \
occupational activity; in other words, the attraction you hold for a field of work. Your \
interests obtained in the test are listed below:";

/// Everything the document renders. Careers must already be sampled.
#[derive(Debug)]
pub struct ReportContext<'a> {
    pub respondent_name: &'a str,
    pub predominant: Option<ProfileTag>,
    pub descriptor: Option<&'a ProfileDescriptor>,
    pub tally: &'a ScoreTally,
    pub careers: &'a [String],
    pub generated_on: NaiveDate,
}

/// Render the report to PDF bytes.
///
/// # Errors
///
/// Returns [`ReportError::Pdf`] only if the PDF backend fails; no valid
/// profile/tally combination is rejected.
pub fn render_pdf(ctx: &ReportContext<'_>) -> Result<Vec<u8>, ReportError> {
    let mut page = PageWriter::new(TITLE)?;

    page.heading(TITLE, 20.0);
    page.space(6.0);
    page.paragraph(INTRO, 11.0);
    page.space(4.0);

    page.heading("EVALUATION INSTRUMENT:", 14.0);
    page.paragraph(INSTRUMENT, 11.0);
    page.space(4.0);

    page.line(&format!("Respondent: {}", ctx.respondent_name), 11.0, false);
    page.line(
        &format!("Predominant profile: {}", profile_display(ctx)),
        11.0,
        false,
    );
    page.space(4.0);

    page.heading("RESULTS OBTAINED:", 14.0);
    page.paragraph(RESULTS, 11.0);
    page.space(2.0);

    let fallback = fallback_descriptor(&profile_display(ctx));
    let descriptor = ctx.descriptor.unwrap_or(&fallback);
    page.line(&format!("- {}", descriptor.title), 11.0, true);
    page.paragraph(&format!("Traits: {}", descriptor.traits), 11.0);
    page.paragraph(&descriptor.description, 11.0);
    page.space(4.0);

    page.heading("Points per profile:", 14.0);
    page.line("Profile          Points", 11.0, true);
    for (tag, count) in ctx.tally {
        page.line(&format!("{:<16} {count}", tag_title(*tag)), 11.0, false);
    }
    page.space(6.0);

    if !ctx.careers.is_empty() {
        page.heading("Recommended careers:", 14.0);
        for (i, career) in ctx.careers.iter().enumerate() {
            page.line(&format!("{}. {career}", i + 1), 11.0, false);
        }
    }

    page.space(10.0);
    page.line(
        &format!(
            "Generated by the Orienta vocational test - Date: {}",
            ctx.generated_on
        ),
        9.0,
        false,
    );

    page.finish()
}

fn profile_display(ctx: &ReportContext<'_>) -> String {
    match (ctx.descriptor, ctx.predominant) {
        (Some(descriptor), _) => descriptor.title.clone(),
        (None, Some(tag)) => tag_title(tag).to_string(),
        (None, None) => "Undefined".to_string(),
    }
}

fn fallback_descriptor(name: &str) -> ProfileDescriptor {
    ProfileDescriptor {
        title: name.to_string(),
        traits: "General traits.".to_string(),
        description: "Description not available.".to_string(),
    }
}

fn tag_title(tag: ProfileTag) -> &'static str {
    match tag {
        ProfileTag::Realistic => "Realistic",
        ProfileTag::Investigative => "Investigative",
        ProfileTag::Artistic => "Artistic",
        ProfileTag::Social => "Social",
    }
}

// Inner type of `Mm` differs across printpdf releases; go through Into.
fn mm(v: f32) -> Mm {
    Mm(v.into())
}

/// Cursor-based writer over the document, spilling to a new page when a
/// section would cross the bottom margin.
struct PageWriter {
    doc: PdfDocumentReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    layer: PdfLayerReference,
    y: f32,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, ReportError> {
        let (doc, page, layer) =
            PdfDocument::new(title, mm(PAGE_WIDTH_MM), mm(PAGE_HEIGHT_MM), "content");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            regular,
            bold,
            layer,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
        })
    }

    fn ensure_space(&mut self, needed: f32) {
        if self.y - needed < MARGIN_MM {
            let (page, layer) = self
                .doc
                .add_page(mm(PAGE_WIDTH_MM), mm(PAGE_HEIGHT_MM), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
    }

    fn line(&mut self, text: &str, size: f32, bold: bool) {
        let line_height = size * 0.5;
        self.ensure_space(line_height);
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(text, size.into(), mm(MARGIN_MM), mm(self.y), font);
        self.y -= line_height;
    }

    fn heading(&mut self, text: &str, size: f32) {
        self.line(text, size, true);
        self.space(2.0);
    }

    fn paragraph(&mut self, text: &str, size: f32) {
        for line in wrap(text, max_chars_per_line(size)) {
            self.line(&line, size, false);
        }
    }

    fn space(&mut self, amount: f32) {
        self.y -= amount;
    }

    fn finish(self) -> Result<Vec<u8>, ReportError> {
        let mut bytes = Vec::new();
        {
            let mut writer = BufWriter::new(&mut bytes);
            self.doc.save(&mut writer)?;
        }
        Ok(bytes)
    }
}

fn max_chars_per_line(size: f32) -> usize {
    // Average Helvetica glyph advance is roughly 0.18 mm per point of size.
    let usable = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    (usable / (size * 0.18)).max(1.0) as usize
}

/// Greedy word wrap. Words longer than the limit get a line of their own.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
