use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{Application, ApplicationState, Fund, LegalEntity, Review};
use super::portfolio::{portfolio_funds, portfolio_total};
use super::review::review_message;

/// Process-wide values stamped onto every rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSettings {
    pub support_email: String,
    pub signature: String,
    pub tax_rate: Decimal,
}

/// Templates the projector can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DocumentTemplate {
    PendingApplication,
    ActivatedApplication,
    InReviewApplication,
}

impl DocumentTemplate {
    pub const fn name(self) -> &'static str {
        match self {
            DocumentTemplate::PendingApplication => "PendingApplication",
            DocumentTemplate::ActivatedApplication => "ActivatedApplication",
            DocumentTemplate::InReviewApplication => "InReviewApplication",
        }
    }
}

/// Fields shared by every document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationSummary {
    pub reference_number: String,
    pub state: &'static str,
    pub full_name: String,
    pub applied_on: DateTime<FixedOffset>,
    pub support_email: String,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_entity: Option<LegalEntity>,
    pub portfolio_funds: Vec<Fund>,
    pub portfolio_total_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingApplicationView {
    #[serde(flatten)]
    pub summary: ApplicationSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivatedApplicationView {
    #[serde(flatten)]
    pub summary: ApplicationSummary,
    #[serde(flatten)]
    pub portfolio: PortfolioSection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InReviewApplicationView {
    #[serde(flatten)]
    pub summary: ApplicationSummary,
    #[serde(flatten)]
    pub portfolio: PortfolioSection,
    pub in_review_message: String,
    pub in_review_information: Option<Review>,
}

/// Presentation model handed to the view generator, one shape per renderable state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApplicationViewModel {
    Pending(PendingApplicationView),
    Activated(ActivatedApplicationView),
    InReview(InReviewApplicationView),
}

impl ApplicationViewModel {
    /// Builds the model for the application's current state.
    ///
    /// Closed applications have no document and yield `None`.
    pub fn project(application: &Application, settings: &DocumentSettings) -> Option<Self> {
        match application.state {
            ApplicationState::Pending => Some(Self::Pending(PendingApplicationView {
                summary: summarize(application, settings),
            })),
            ApplicationState::Activated => Some(Self::Activated(ActivatedApplicationView {
                summary: summarize(application, settings),
                portfolio: portfolio_section(application, settings),
            })),
            ApplicationState::InReview => {
                let review = application.current_review.as_ref();
                Some(Self::InReview(InReviewApplicationView {
                    summary: summarize(application, settings),
                    portfolio: portfolio_section(application, settings),
                    in_review_message: review_message(review),
                    in_review_information: review.cloned(),
                }))
            }
            ApplicationState::Closed => None,
        }
    }

    pub fn template(&self) -> DocumentTemplate {
        match self {
            Self::Pending(_) => DocumentTemplate::PendingApplication,
            Self::Activated(_) => DocumentTemplate::ActivatedApplication,
            Self::InReview(_) => DocumentTemplate::InReviewApplication,
        }
    }

    pub fn summary(&self) -> &ApplicationSummary {
        match self {
            Self::Pending(view) => &view.summary,
            Self::Activated(view) => &view.summary,
            Self::InReview(view) => &view.summary,
        }
    }

    pub fn portfolio(&self) -> Option<&PortfolioSection> {
        match self {
            Self::Pending(_) => None,
            Self::Activated(view) => Some(&view.portfolio),
            Self::InReview(view) => Some(&view.portfolio),
        }
    }
}

fn summarize(application: &Application, settings: &DocumentSettings) -> ApplicationSummary {
    ApplicationSummary {
        reference_number: application.reference_number.clone(),
        state: application.state.label(),
        full_name: application.person.full_name(),
        applied_on: application.date,
        support_email: settings.support_email.clone(),
        signature: settings.signature.clone(),
    }
}

fn portfolio_section(application: &Application, settings: &DocumentSettings) -> PortfolioSection {
    let funds = portfolio_funds(application);
    let total = portfolio_total(&funds, settings.tax_rate);

    PortfolioSection {
        legal_entity: application.declared_legal_entity().cloned(),
        portfolio_funds: funds,
        portfolio_total_amount: total,
    }
}
