use serde::Serialize;

use super::view_model::ApplicationViewModel;

/// Markup placed at the top of the first page of every application document.
pub const PDF_HEADER: &str = concat!(
    "<div class=\"document-header\">",
    "<h1>Application Summary</h1>",
    "<p>Confidential. Prepared for the named applicant only.</p>",
    "</div>"
);

/// Maps a template name onto a path relative to the base address.
pub trait TemplatePathProvider: Send + Sync {
    fn template_path(&self, template: &str) -> String;
}

/// Renders a presentation model into markup using the template at `location`.
pub trait ViewGenerator: Send + Sync {
    fn generate_from_path(
        &self,
        location: &str,
        model: &ApplicationViewModel,
    ) -> Result<String, ViewError>;
}

/// Converts markup into a binary PDF.
pub trait PdfGenerator: Send + Sync {
    fn generate_from_html(&self, html: &str, options: &PdfOptions) -> Result<PdfDocument, PdfError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageNumbers {
    None,
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderRepeat {
    FirstPageOnly,
    AllPages,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderOptions {
    pub repeat: HeaderRepeat,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfOptions {
    pub page_numbers: PageNumbers,
    pub header: HeaderOptions,
}

impl PdfOptions {
    /// Numeric page numbers and the standard header on the first page only.
    pub fn application_document() -> Self {
        Self {
            page_numbers: PageNumbers::Numeric,
            header: HeaderOptions {
                repeat: HeaderRepeat::FirstPageOnly,
                html: PDF_HEADER.to_string(),
            },
        }
    }
}

/// Rendered PDF binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDocument(Vec<u8>);

impl PdfDocument {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("template not found at '{location}'")]
    TemplateNotFound { location: String },
    #[error("failed to read template '{location}': {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("template '{location}' references unknown field '{placeholder}'")]
    UnknownPlaceholder {
        location: String,
        placeholder: String,
    },
    #[error("template '{location}' has an unterminated placeholder")]
    UnterminatedPlaceholder { location: String },
    #[error("template '{location}' opens section '{section}' without closing it")]
    UnterminatedSection { location: String, section: String },
    #[error("template '{location}' closes section '{section}' that was never opened")]
    UnexpectedSectionEnd { location: String, section: String },
    #[error("failed to serialize view model: {0}")]
    Model(#[from] serde_json::Error),
    #[error("view renderer unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("failed to launch pdf converter '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("pdf converter io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("pdf converter exited with {status}: {stderr}")]
    Converter { status: String, stderr: String },
    #[error("pdf converter produced no output")]
    EmptyDocument,
    #[error("pdf engine unavailable: {0}")]
    Unavailable(String),
}
