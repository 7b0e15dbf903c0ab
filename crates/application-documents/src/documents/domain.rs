use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper for persisted applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub Uuid);

impl ApplicationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ApplicationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ApplicationId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim()).map(Self)
    }
}

/// Lifecycle state tracked by the application store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationState {
    Pending,
    Activated,
    InReview,
    Closed,
}

impl ApplicationState {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationState::Pending => "Pending",
            ApplicationState::Activated => "Activated",
            ApplicationState::InReview => "In Review",
            ApplicationState::Closed => "Closed",
        }
    }
}

impl fmt::Display for ApplicationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Applicant named on the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub first_name: String,
    pub surname: String,
}

impl Person {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.surname)
    }
}

/// Company details captured for legal-entity applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalEntity {
    pub company_name: String,
    pub registration_number: String,
}

/// Monetary holding within a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fund {
    #[serde(default)]
    pub fund_id: String,
    #[serde(default)]
    pub name: String,
    pub amount: Decimal,
    pub fees: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub funds: Vec<Fund>,
}

/// Review record explaining why an application is held.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub reason: Option<String>,
}

/// Application record as persisted by the store. Read-only to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub state: ApplicationState,
    pub reference_number: String,
    pub person: Person,
    pub date: DateTime<FixedOffset>,
    #[serde(default)]
    pub is_legal_entity: bool,
    #[serde(default)]
    pub legal_entity: Option<LegalEntity>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub current_review: Option<Review>,
}

impl Application {
    /// Legal entity detail, only when the application is flagged as one.
    pub fn declared_legal_entity(&self) -> Option<&LegalEntity> {
        if self.is_legal_entity {
            self.legal_entity.as_ref()
        } else {
            None
        }
    }
}
