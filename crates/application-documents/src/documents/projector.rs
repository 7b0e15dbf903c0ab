use std::sync::Arc;

use tracing::{debug, warn};

use super::domain::ApplicationId;
use super::rendering::{
    PdfError, PdfGenerator, PdfOptions, TemplatePathProvider, ViewError, ViewGenerator,
};
use super::repository::{ApplicationStore, StoreError};
use super::view_model::{ApplicationViewModel, DocumentSettings};

/// Caller-facing surface for producing application documents.
///
/// An empty byte vector means there was nothing to render (unknown id or a
/// closed application); the reason is reported through `tracing`.
pub trait ApplicationDocumentGenerator: Send + Sync {
    fn generate(
        &self,
        application_id: &ApplicationId,
        base_uri: &str,
    ) -> Result<Vec<u8>, DocumentError>;
}

/// Looks up an application, projects it for its state, and renders it to PDF.
pub struct DocumentProjector {
    store: Arc<dyn ApplicationStore>,
    template_paths: Arc<dyn TemplatePathProvider>,
    views: Arc<dyn ViewGenerator>,
    pdf: Arc<dyn PdfGenerator>,
    settings: DocumentSettings,
}

impl DocumentProjector {
    pub fn builder() -> DocumentProjectorBuilder {
        DocumentProjectorBuilder::default()
    }

    pub fn settings(&self) -> &DocumentSettings {
        &self.settings
    }

    pub fn render(
        &self,
        application_id: &ApplicationId,
        base_uri: &str,
    ) -> Result<Vec<u8>, DocumentError> {
        let Some(application) = self.store.find_by_id(application_id)? else {
            warn!(%application_id, "no application found for id");
            return Ok(Vec::new());
        };

        let Some(model) = ApplicationViewModel::project(&application, &self.settings) else {
            warn!(
                %application_id,
                state = %application.state,
                "application state has no valid document"
            );
            return Ok(Vec::new());
        };

        let template = model.template();
        let path = self.template_paths.template_path(template.name());
        let location = template_location(base_uri, &path);
        debug!(%application_id, template = template.name(), %location, "rendering application view");

        let html = self.views.generate_from_path(&location, &model)?;
        let document = self
            .pdf
            .generate_from_html(&html, &PdfOptions::application_document())?;

        let bytes = document.into_bytes();
        debug!(%application_id, size = bytes.len(), "application document rendered");
        Ok(bytes)
    }
}

impl ApplicationDocumentGenerator for DocumentProjector {
    fn generate(
        &self,
        application_id: &ApplicationId,
        base_uri: &str,
    ) -> Result<Vec<u8>, DocumentError> {
        self.render(application_id, base_uri)
    }
}

/// Joins the base address and a template path, dropping at most one trailing `/` from the base.
pub fn template_location(base_uri: &str, template_path: &str) -> String {
    let base = base_uri.strip_suffix('/').unwrap_or(base_uri);
    format!("{base}{template_path}")
}

/// Collects the projector's collaborators; `build` refuses to run without all of them.
#[derive(Default)]
pub struct DocumentProjectorBuilder {
    store: Option<Arc<dyn ApplicationStore>>,
    template_paths: Option<Arc<dyn TemplatePathProvider>>,
    views: Option<Arc<dyn ViewGenerator>>,
    pdf: Option<Arc<dyn PdfGenerator>>,
    settings: Option<DocumentSettings>,
}

impl DocumentProjectorBuilder {
    pub fn store(mut self, store: Arc<dyn ApplicationStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn template_paths(mut self, template_paths: Arc<dyn TemplatePathProvider>) -> Self {
        self.template_paths = Some(template_paths);
        self
    }

    pub fn view_generator(mut self, views: Arc<dyn ViewGenerator>) -> Self {
        self.views = Some(views);
        self
    }

    pub fn pdf_generator(mut self, pdf: Arc<dyn PdfGenerator>) -> Self {
        self.pdf = Some(pdf);
        self
    }

    pub fn settings(mut self, settings: DocumentSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn build(self) -> Result<DocumentProjector, ProjectorBuildError> {
        Ok(DocumentProjector {
            store: self
                .store
                .ok_or(ProjectorBuildError::MissingCollaborator("application store"))?,
            template_paths: self
                .template_paths
                .ok_or(ProjectorBuildError::MissingCollaborator("template path provider"))?,
            views: self
                .views
                .ok_or(ProjectorBuildError::MissingCollaborator("view generator"))?,
            pdf: self
                .pdf
                .ok_or(ProjectorBuildError::MissingCollaborator("pdf generator"))?,
            settings: self
                .settings
                .ok_or(ProjectorBuildError::MissingCollaborator("document settings"))?,
        })
    }
}

/// Raised at startup when the projector is assembled without a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectorBuildError {
    #[error("document projector requires a {0}")]
    MissingCollaborator(&'static str),
}

/// Collaborator failure surfaced unchanged to the caller.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    View(#[from] ViewError),
    #[error(transparent)]
    Pdf(#[from] PdfError),
}
