use application_documents::config::DocumentConfig;
use application_documents::documents::adapters::{
    CommandPdfGenerator, FileViewGenerator, PrefixedTemplatePaths,
};
use application_documents::documents::{
    Application, ApplicationId, ApplicationStore, DocumentProjector, StoreError,
};
use application_documents::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local application store, optionally seeded from a JSON array of applications.
#[derive(Default)]
pub(crate) struct InMemoryApplicationStore {
    records: RwLock<HashMap<ApplicationId, Application>>,
}

impl InMemoryApplicationStore {
    pub(crate) fn from_json_file(path: &Path) -> Result<Self, StoreError> {
        let raw = fs::read_to_string(path).map_err(|source| StoreError::Seed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub(crate) fn from_json_str(raw: &str) -> Result<Self, StoreError> {
        let applications: Vec<Application> = serde_json::from_str(raw)?;
        let records = applications
            .into_iter()
            .map(|application| (application.id, application))
            .collect();
        Ok(Self {
            records: RwLock::new(records),
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl ApplicationStore for InMemoryApplicationStore {
    fn find_by_id(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("application store lock poisoned".to_string()))?;
        Ok(records.get(id).cloned())
    }
}

/// Wires the configured collaborators; fails before the service accepts requests.
pub(crate) fn build_projector(config: &DocumentConfig) -> Result<DocumentProjector, AppError> {
    let store = match &config.applications_file {
        Some(path) => InMemoryApplicationStore::from_json_file(path)?,
        None => InMemoryApplicationStore::default(),
    };
    info!(
        applications = store.len(),
        pdf_command = %config.pdf_command,
        "application store ready"
    );

    let projector = DocumentProjector::builder()
        .store(Arc::new(store))
        .template_paths(Arc::new(PrefixedTemplatePaths::new(&config.template_prefix)))
        .view_generator(Arc::new(FileViewGenerator))
        .pdf_generator(Arc::new(CommandPdfGenerator::new(&config.pdf_command)))
        .settings(config.settings())
        .build()?;

    Ok(projector)
}
