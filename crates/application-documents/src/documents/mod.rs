//! State-aware projection of application records into PDF documents.

pub mod adapters;
pub mod domain;
pub(crate) mod portfolio;
pub mod projector;
pub mod rendering;
pub mod repository;
pub(crate) mod review;
pub mod router;
pub mod view_model;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationId, ApplicationState, Fund, LegalEntity, Person, Product, Review,
};
pub use portfolio::{portfolio_funds, portfolio_total};
pub use projector::{
    template_location, ApplicationDocumentGenerator, DocumentError, DocumentProjector,
    DocumentProjectorBuilder, ProjectorBuildError,
};
pub use rendering::{
    HeaderOptions, HeaderRepeat, PageNumbers, PdfDocument, PdfError, PdfGenerator, PdfOptions,
    TemplatePathProvider, ViewError, ViewGenerator, PDF_HEADER,
};
pub use repository::{ApplicationStore, StoreError};
pub use review::{review_message, review_message_suffix, ReviewRule, REVIEW_RULES};
pub use router::document_router;
pub use view_model::{
    ActivatedApplicationView, ApplicationSummary, ApplicationViewModel, DocumentSettings,
    DocumentTemplate, InReviewApplicationView, PendingApplicationView, PortfolioSection,
};
