//! Application layer for the POSM survey client.
//!
//! Use cases that combine the domain model with the transport and
//! credential ports: authenticated requests with token refresh, the entry
//! guard, debounced search, catalog resolution, submission and the wizard
//! that ties them together.

pub mod api;
pub mod auth;
pub mod autocomplete;
pub mod catalog;
pub mod guard;
pub mod submission;
pub mod wizard;

pub use api::{SubmitReceipt, SurveyApi};
pub use auth::AuthenticatedClient;
pub use guard::{GuardOutcome, SessionGuard};
pub use submission::{SubmissionProgress, submit_survey};
pub use wizard::{SurveyWizard, WizardEvent, WizardSettings, WizardView};
