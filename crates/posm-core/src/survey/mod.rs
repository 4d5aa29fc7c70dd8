//! Survey domain module.
//!
//! Everything scoped to one survey attempt: the locked store, the ordered
//! model selection, per-model checkbox/quantity/image state, the derived view
//! and the submission payload.
//!
//! # Module Structure
//!
//! - `selection`: ordered, de-duplicated model list
//! - `checkbox`: the per-model "all"/individual POSM tree
//! - `quantity`: bounded per-model quantity
//! - `image`: one locally held photo per model
//! - `payload`: submission payload types
//! - `state`: the `SurveyState` aggregate and wizard steps
//! - `view`: declarative view derived from `SurveyState`

mod checkbox;
mod image;
mod payload;
mod quantity;
mod selection;
mod state;
mod view;

pub use checkbox::{sanitize_id, CheckboxStates, CheckboxTarget, TreeState};
pub use image::{CaptureSource, ImageAttachment, ModelImages};
pub use payload::{PosmSelection, SurveyResponse, SurveySubmission, DEFAULT_LEADER};
pub use quantity::{Quantity, Quantities};
pub use selection::SelectedModels;
pub use state::{Step, SurveyState};
pub use view::{CheckboxView, ImagePreview, ImageWidget, ModelCard, PosmRow, SurveyView};
