use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use posm_application::{SurveyWizard, WizardEvent};
use posm_application::autocomplete::{InputEffect, Settled};
use posm_core::store::StoreRef;
use posm_core::survey::{CaptureSource, CheckboxTarget};
use posm_infrastructure::load_image;
use tokio::sync::mpsc;

use super::context::AppContext;

/// POSM to record for one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosmChoice {
    All,
    Codes(Vec<String>),
}

/// One `--entry` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEntry {
    pub model: String,
    pub posm: PosmChoice,
    pub image: PathBuf,
    /// Raw quantity text, clamped like the quantity field
    pub quantity: Option<String>,
    pub source: CaptureSource,
}

impl FromStr for ModelEntry {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut model = None;
        let mut posm = None;
        let mut image = None;
        let mut quantity = None;
        let mut source = CaptureSource::Gallery;

        for pair in s.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("expected key=value, got '{pair}'"))?;
            let value = value.trim();
            match key.trim() {
                "model" => model = Some(value.to_string()),
                "posm" if value.eq_ignore_ascii_case("all") => posm = Some(PosmChoice::All),
                "posm" => {
                    let codes: Vec<String> = value
                        .split(',')
                        .map(str::trim)
                        .filter(|c| !c.is_empty())
                        .map(str::to_string)
                        .collect();
                    if codes.is_empty() {
                        return Err("posm needs 'all' or at least one code".to_string());
                    }
                    posm = Some(PosmChoice::Codes(codes));
                }
                "image" => image = Some(PathBuf::from(value)),
                "qty" | "quantity" => quantity = Some(value.to_string()),
                "source" => {
                    source = match value {
                        "camera" => CaptureSource::Camera,
                        "gallery" => CaptureSource::Gallery,
                        other => return Err(format!("unknown source '{other}'")),
                    }
                }
                other => return Err(format!("unknown key '{other}'")),
            }
        }

        Ok(Self {
            model: model
                .filter(|m| !m.is_empty())
                .ok_or("missing model")?,
            posm: posm.ok_or("missing posm")?,
            image: image.ok_or("missing image")?,
            quantity,
            source,
        })
    }
}

pub async fn run(ctx: &AppContext, store_query: &str, entries: &[ModelEntry]) -> Result<()> {
    let user = ctx.guard().check().await?.into_result()?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let Some(line) = progress_line(&event) {
                println!("{line}");
            }
        }
    });

    let mut wizard = SurveyWizard::new(ctx.api(), user, ctx.wizard_settings()).with_events(tx);
    let outcome = fill_and_submit(&mut wizard, store_query, entries).await;
    drop(wizard);
    let _ = printer.await;

    let message = outcome?;
    println!(
        "{}",
        message.unwrap_or_else(|| "Survey submitted successfully!".to_string())
    );
    Ok(())
}

/// Stdout line for a wizard event. Alerts are left out: the failing
/// operation also returns the error, and `main` reports it.
fn progress_line(event: &WizardEvent) -> Option<String> {
    match event {
        WizardEvent::Progress(progress) => Some(progress.to_string()),
        WizardEvent::Alert(message) => {
            tracing::debug!(%message, "alert");
            None
        }
        WizardEvent::StepChanged(step) => {
            tracing::debug!(?step, "step changed");
            None
        }
        WizardEvent::Submitted { .. } => None,
    }
}

async fn fill_and_submit(
    wizard: &mut SurveyWizard,
    store_query: &str,
    entries: &[ModelEntry],
) -> Result<Option<String>> {
    let store = find_store(wizard, store_query).await?;
    println!("Store: {}", store.label());
    wizard.go_to_models()?;

    for entry in entries {
        wizard.add_model(&entry.model).await?;

        match &entry.posm {
            PosmChoice::All => {
                wizard.set_checkbox(&entry.model, CheckboxTarget::All, true)?;
            }
            PosmChoice::Codes(codes) => {
                for code in codes {
                    let index = wizard
                        .state()
                        .items(&entry.model)
                        .iter()
                        .position(|item| &item.posm_code == code)
                        .ok_or_else(|| anyhow!("model {} has no POSM {}", entry.model, code))?;
                    wizard.set_checkbox(&entry.model, CheckboxTarget::Item(index), true)?;
                }
            }
        }

        if let Some(quantity) = &entry.quantity {
            wizard.set_quantity_input(&entry.model, quantity)?;
        }

        let image = load_image(&entry.image, entry.source)
            .await
            .with_context(|| format!("Cannot use {}", entry.image.display()))?;
        wizard.attach_image(&entry.model, image)?;
    }

    let receipt = wizard.submit().await?;
    Ok(receipt.message)
}

/// Picks the store whose id equals `query`, or the only search result.
async fn find_store(wizard: &mut SurveyWizard, query: &str) -> Result<StoreRef> {
    if let InputEffect::Cleared = wizard.on_store_input(query) {
        bail!("Store query '{query}' is too short");
    }
    if let Some(Settled::Failed(err)) = wizard.settle_store_search().await? {
        return Err(err.into());
    }

    let candidates = wizard.store_suggestions();
    if candidates.is_empty() {
        bail!("No store matches '{query}'");
    }
    let exact = candidates
        .iter()
        .position(|s| s.store_id.eq_ignore_ascii_case(query.trim()));
    let Some(index) = exact.or((candidates.len() == 1).then_some(0)) else {
        let labels: Vec<String> = candidates.iter().map(StoreRef::label).collect();
        bail!("'{query}' matches several stores: {}", labels.join("; "));
    };

    wizard
        .pick_store(index)
        .ok_or_else(|| anyhow!("Store suggestion {index} disappeared"))
}
