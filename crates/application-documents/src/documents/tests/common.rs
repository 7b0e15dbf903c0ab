use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::documents::adapters::PrefixedTemplatePaths;
use crate::documents::domain::{
    Application, ApplicationId, ApplicationState, Fund, LegalEntity, Person, Product, Review,
};
use crate::documents::projector::DocumentProjector;
use crate::documents::rendering::{
    PdfDocument, PdfError, PdfGenerator, PdfOptions, ViewError, ViewGenerator,
};
use crate::documents::repository::{ApplicationStore, StoreError};
use crate::documents::view_model::{ApplicationViewModel, DocumentSettings, DocumentTemplate};

pub(super) const PDF_BYTES: &[u8] = b"%PDF-1.7 application document";

pub(super) fn settings() -> DocumentSettings {
    DocumentSettings {
        support_email: "support@example.com".to_string(),
        signature: "Client Services".to_string(),
        tax_rate: dec!(0.15),
    }
}

pub(super) fn applied_on() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2025-03-14T09:30:00+02:00").expect("valid timestamp")
}

pub(super) fn fund(name: &str, amount: Decimal, fees: Decimal) -> Fund {
    Fund {
        fund_id: format!("fund-{}", name.to_ascii_lowercase()),
        name: name.to_string(),
        amount,
        fees,
    }
}

pub(super) fn legal_entity() -> LegalEntity {
    LegalEntity {
        company_name: "Nkosi Holdings (Pty) Ltd".to_string(),
        registration_number: "2019/123456/07".to_string(),
    }
}

/// Two products holding one fund each: (1000, 50) and (2000, 100).
pub(super) fn application(state: ApplicationState) -> Application {
    Application {
        id: ApplicationId::new(),
        state,
        reference_number: "APP-2025-0042".to_string(),
        person: Person {
            first_name: "Thandi".to_string(),
            surname: "Nkosi".to_string(),
        },
        date: applied_on(),
        is_legal_entity: false,
        legal_entity: Some(legal_entity()),
        products: vec![
            Product {
                name: "Retirement Annuity".to_string(),
                funds: vec![fund("Balanced", dec!(1000), dec!(50))],
            },
            Product {
                name: "Tax Free Savings".to_string(),
                funds: vec![fund("Equity", dec!(2000), dec!(100))],
            },
        ],
        current_review: None,
    }
}

pub(super) fn in_review(reason: Option<&str>) -> Application {
    let mut application = application(ApplicationState::InReview);
    application.current_review = Some(Review {
        reason: reason.map(str::to_string),
    });
    application
}

#[derive(Default)]
pub(super) struct MemoryStore {
    records: Mutex<HashMap<ApplicationId, Application>>,
    lookups: Mutex<Vec<ApplicationId>>,
}

impl MemoryStore {
    pub(super) fn with(applications: impl IntoIterator<Item = Application>) -> Self {
        let store = Self::default();
        {
            let mut records = store.records.lock().expect("store mutex poisoned");
            for application in applications {
                records.insert(application.id, application);
            }
        }
        store
    }

    pub(super) fn lookups(&self) -> Vec<ApplicationId> {
        self.lookups.lock().expect("store mutex poisoned").clone()
    }
}

impl ApplicationStore for MemoryStore {
    fn find_by_id(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        self.lookups.lock().expect("store mutex poisoned").push(*id);
        Ok(self
            .records
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned())
    }
}

pub(super) struct UnavailableStore;

impl ApplicationStore for UnavailableStore {
    fn find_by_id(&self, _id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct RenderedView {
    pub location: String,
    pub template: DocumentTemplate,
    pub model: ApplicationViewModel,
}

#[derive(Default)]
pub(super) struct RecordingViews {
    calls: Mutex<Vec<RenderedView>>,
}

impl RecordingViews {
    pub(super) fn calls(&self) -> Vec<RenderedView> {
        self.calls.lock().expect("views mutex poisoned").clone()
    }
}

impl ViewGenerator for RecordingViews {
    fn generate_from_path(
        &self,
        location: &str,
        model: &ApplicationViewModel,
    ) -> Result<String, ViewError> {
        self.calls
            .lock()
            .expect("views mutex poisoned")
            .push(RenderedView {
                location: location.to_string(),
                template: model.template(),
                model: model.clone(),
            });
        Ok(format!(
            "<html><body><h2>{}</h2></body></html>",
            model.summary().full_name
        ))
    }
}

pub(super) struct MissingTemplateViews;

impl ViewGenerator for MissingTemplateViews {
    fn generate_from_path(
        &self,
        location: &str,
        _model: &ApplicationViewModel,
    ) -> Result<String, ViewError> {
        Err(ViewError::TemplateNotFound {
            location: location.to_string(),
        })
    }
}

#[derive(Default)]
pub(super) struct RecordingPdf {
    calls: Mutex<Vec<(String, PdfOptions)>>,
}

impl RecordingPdf {
    pub(super) fn calls(&self) -> Vec<(String, PdfOptions)> {
        self.calls.lock().expect("pdf mutex poisoned").clone()
    }
}

impl PdfGenerator for RecordingPdf {
    fn generate_from_html(&self, html: &str, options: &PdfOptions) -> Result<PdfDocument, PdfError> {
        self.calls
            .lock()
            .expect("pdf mutex poisoned")
            .push((html.to_string(), options.clone()));
        Ok(PdfDocument::new(PDF_BYTES.to_vec()))
    }
}

pub(super) struct BrokenPdf;

impl PdfGenerator for BrokenPdf {
    fn generate_from_html(&self, _html: &str, _options: &PdfOptions) -> Result<PdfDocument, PdfError> {
        Err(PdfError::Converter {
            status: "exit status: 1".to_string(),
            stderr: "malformed markup".to_string(),
        })
    }
}

/// Projector wired to recording collaborators so tests can observe every hop.
pub(super) struct Harness {
    pub store: Arc<MemoryStore>,
    pub views: Arc<RecordingViews>,
    pub pdf: Arc<RecordingPdf>,
    pub projector: DocumentProjector,
}

impl Harness {
    pub(super) fn with(applications: impl IntoIterator<Item = Application>) -> Self {
        let store = Arc::new(MemoryStore::with(applications));
        let views = Arc::new(RecordingViews::default());
        let pdf = Arc::new(RecordingPdf::default());
        let projector = DocumentProjector::builder()
            .store(store.clone())
            .template_paths(Arc::new(PrefixedTemplatePaths::new("/templates")))
            .view_generator(views.clone())
            .pdf_generator(pdf.clone())
            .settings(settings())
            .build()
            .expect("all collaborators supplied");

        Self {
            store,
            views,
            pdf,
            projector,
        }
    }
}

struct WarningCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S: Subscriber> Layer<S> for WarningCollector {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::WARN {
            return;
        }
        let mut fields = FieldText::default();
        event.record(&mut fields);
        self.events
            .lock()
            .expect("warning mutex poisoned")
            .push(fields.0);
    }
}

#[derive(Default)]
struct FieldText(String);

impl Visit for FieldText {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let _ = write!(self.0, "{}={:?} ", field.name(), value);
    }
}

/// Runs `f` under a scoped subscriber and returns the warnings it emitted.
pub(super) fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(WarningCollector {
        events: events.clone(),
    });
    let result = tracing::subscriber::with_default(subscriber, f);
    let warnings = events.lock().expect("warning mutex poisoned").clone();
    (result, warnings)
}
