mod support;

use std::sync::Arc;

use posm_application::{SurveyWizard, WizardEvent, WizardSettings};
use posm_core::store::StoreRef;
use posm_core::suggest::Key;
use posm_core::survey::{CaptureSource, CheckboxTarget, ImageAttachment, Step};
use posm_core::transport::HttpMethod;
use posm_core::{SurveyError, ValidationError};
use serde_json::json;
use support::{FakeBackend, signed_in_api, user};
use tokio::sync::mpsc;

const CATALOG: &str = "/api/models/S001";

fn backend() -> Arc<FakeBackend> {
    let backend = FakeBackend::new();
    backend.on(
        HttpMethod::Get,
        CATALOG,
        200,
        json!({
            "X100": [
                {"posmCode": "P1", "posmName": "Wobbler"},
                {"posmCode": "P2", "posmName": "Banner"}
            ],
            "Y200": [{"posmCode": "P3", "posmName": "Shelf strip"}]
        }),
    );
    backend
}

fn wizard(backend: &Arc<FakeBackend>) -> SurveyWizard {
    let (api, _) = signed_in_api(backend);
    let mut wizard = SurveyWizard::new(api, user(Some("Minh")), WizardSettings::default());
    wizard.select_store(StoreRef::new("S001", "Store A"));
    wizard.go_to_models().unwrap();
    wizard
}

#[tokio::test]
async fn test_models_are_listed_newest_first() {
    let backend = backend();
    let mut wizard = wizard(&backend);

    assert!(wizard.add_model("X100").await.unwrap());
    assert!(wizard.add_model("Y200").await.unwrap());

    let view = wizard.view();
    let models: Vec<&str> = view.survey.models.iter().map(|c| c.model.as_str()).collect();
    assert_eq!(models, vec!["Y200", "X100"]);
    assert_eq!(view.survey.models[1].items.len(), 2);
}

#[tokio::test]
async fn test_store_catalog_is_fetched_once_per_store() {
    let backend = backend();
    let mut wizard = wizard(&backend);

    wizard.add_model("X100").await.unwrap();
    wizard.add_model("Y200").await.unwrap();

    assert_eq!(backend.calls(CATALOG), 1);
}

#[tokio::test]
async fn test_store_catalog_body_is_the_model_map() {
    let backend = backend();
    let (api, _) = signed_in_api(&backend);

    let catalog = api.store_catalog("S001").await.unwrap();

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog["X100"][1].posm_code, "P2");
    assert_eq!(catalog["Y200"][0].posm_name, "Shelf strip");
}

#[tokio::test]
async fn test_store_catalog_model_needs_no_fallback() {
    let backend = backend();
    let mut wizard = wizard(&backend);

    assert!(wizard.add_model("Y200").await.unwrap());

    assert_eq!(wizard.state().items("Y200")[0].posm_code, "P3");
    assert!(wizard.state().catalog().contains("X100"));
    assert_eq!(backend.calls("/api/model-posm/Y200"), 0);
}

#[tokio::test]
async fn test_duplicate_model_is_ignored() {
    let backend = backend();
    let mut wizard = wizard(&backend);

    assert!(wizard.add_model("X100").await.unwrap());
    wizard.set_checkbox("X100", CheckboxTarget::Item(1), true).unwrap();
    assert!(!wizard.add_model("X100").await.unwrap());

    assert_eq!(wizard.state().models().len(), 1);
    assert!(wizard
        .state()
        .checkboxes()
        .is_checked("X100", CheckboxTarget::Item(1)));
}

#[tokio::test]
async fn test_unknown_model_falls_back_to_model_lookup() {
    let backend = backend();
    backend.on(
        HttpMethod::Get,
        "/api/model-posm/Z900",
        200,
        json!([{"posmCode": "P9", "posmName": "Standee"}]),
    );
    let mut wizard = wizard(&backend);

    assert!(wizard.add_model("Z900").await.unwrap());

    assert_eq!(wizard.state().items("Z900")[0].posm_name, "Standee");
    assert_eq!(backend.calls("/api/model-posm/Z900"), 1);
}

#[tokio::test]
async fn test_model_without_posm_is_rolled_back() {
    let backend = backend();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut wizard = wizard(&backend).with_events(tx);

    let err = wizard.add_model("Z900").await.unwrap_err();

    assert_eq!(
        err,
        SurveyError::NoPosmFound {
            model: "Z900".to_string()
        }
    );
    assert!(wizard.state().models().is_empty());
    assert_eq!(
        rx.try_recv().unwrap(),
        WizardEvent::Alert("No POSM found for model Z900".to_string())
    );
}

#[tokio::test]
async fn test_empty_fallback_list_is_rolled_back() {
    let backend = backend();
    backend.on(HttpMethod::Get, "/api/model-posm/Z900", 200, json!([]));
    let mut wizard = wizard(&backend);

    let err = wizard.add_model("Z900").await.unwrap_err();

    assert!(matches!(err, SurveyError::NoPosmFound { .. }));
    assert!(!wizard.state().is_selected("Z900"));
}

#[tokio::test]
async fn test_catalog_failure_rolls_back() {
    let backend = FakeBackend::new();
    backend.on(HttpMethod::Get, CATALOG, 500, json!({"message": "db down"}));
    let mut wizard = wizard(&backend);

    let err = wizard.add_model("X100").await.unwrap_err();

    assert_eq!(err, SurveyError::http(500, "db down"));
    assert!(wizard.state().models().is_empty());
}

#[tokio::test]
async fn test_path_segments_are_encoded() {
    let backend = backend();
    backend.on(
        HttpMethod::Get,
        "/api/model-posm/A%2FB%20C",
        200,
        json!([{"posmCode": "P9", "posmName": "Standee"}]),
    );
    let mut wizard = wizard(&backend);

    assert!(wizard.add_model("A/B C").await.unwrap());
}

#[tokio::test]
async fn test_model_needs_locked_store() {
    let backend = backend();
    let (api, _) = signed_in_api(&backend);
    let mut wizard = SurveyWizard::new(api, user(None), WizardSettings::default());

    let err = wizard.add_model("X100").await.unwrap_err();

    assert_eq!(err, SurveyError::from(ValidationError::NoStoreSelected));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_cannot_leave_store_step_without_store() {
    let backend = backend();
    let (api, _) = signed_in_api(&backend);
    let mut wizard = SurveyWizard::new(api, user(None), WizardSettings::default());

    assert!(wizard.go_to_models().is_err());
    assert_eq!(wizard.step(), Step::SelectStore);

    wizard.select_store(StoreRef::new("S001", "Store A"));
    assert!(wizard.view().survey.can_proceed);
    wizard.on_store_input("Store A (S00");
    assert!(!wizard.view().survey.can_proceed);
}

#[tokio::test]
async fn test_returning_to_store_step_keeps_models() {
    let backend = backend();
    let mut wizard = wizard(&backend);
    wizard.add_model("X100").await.unwrap();
    wizard.set_quantity_input("X100", "7").unwrap();

    wizard.back_to_store();
    assert_eq!(wizard.step(), Step::SelectStore);
    wizard.go_to_models().unwrap();

    assert!(wizard.state().is_selected("X100"));
    assert_eq!(wizard.state().quantity("X100").get(), 7);
}

#[tokio::test]
async fn test_removing_model_drops_its_state() {
    let backend = backend();
    let mut wizard = wizard(&backend);
    wizard.add_model("X100").await.unwrap();
    wizard
        .attach_image(
            "X100",
            ImageAttachment::new("x.jpg", "image/jpeg", vec![1], CaptureSource::Gallery),
        )
        .unwrap();

    assert!(wizard.remove_model("X100"));
    assert!(!wizard.state().images().has("X100"));

    // Re-adding uses the cached catalog
    wizard.add_model("X100").await.unwrap();
    assert_eq!(backend.calls(CATALOG), 1);
    assert!(wizard.view().survey.models[0].image.inputs_enabled);
}

#[tokio::test]
async fn test_quantity_input_is_clamped() {
    let backend = backend();
    let mut wizard = wizard(&backend);
    wizard.add_model("X100").await.unwrap();

    assert_eq!(wizard.set_quantity_input("X100", "0").unwrap().get(), 1);
    assert_eq!(wizard.set_quantity_input("X100", "abc").unwrap().get(), 1);
    assert_eq!(wizard.set_quantity_input("X100", "5000").unwrap().get(), 999);
}

#[tokio::test(start_paused = true)]
async fn test_armed_suggestion_is_added() {
    let backend = backend();
    backend.on(
        HttpMethod::Get,
        "/api/model-autocomplete",
        200,
        json!(["X100", "Y200"]),
    );
    let mut wizard = wizard(&backend);
    wizard.add_model("Y200").await.unwrap();

    wizard.on_model_input("X");
    wizard.settle_model_search().await.unwrap();
    assert_eq!(wizard.view().model_search.suggestions, vec!["X100".to_string()]);
    assert!(!wizard.view().can_add_model);

    assert_eq!(wizard.model_key(Key::Enter), Some("X100".to_string()));
    assert!(wizard.view().can_add_model);

    assert_eq!(wizard.add_armed_model().await.unwrap(), Some("X100".to_string()));
    assert_eq!(wizard.view().model_search.input, "");
    assert!(!wizard.view().can_add_model);
    assert_eq!(wizard.state().models().as_slice(), ["X100", "Y200"]);
}

#[tokio::test]
async fn test_add_without_armed_model_does_nothing() {
    let backend = backend();
    let mut wizard = wizard(&backend);

    assert_eq!(wizard.add_armed_model().await.unwrap(), None);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_start_new_survey_resets_everything() {
    let backend = backend();
    let mut wizard = wizard(&backend);
    wizard.add_model("X100").await.unwrap();

    wizard.start_new_survey();

    let view = wizard.view();
    assert_eq!(view.survey.step, Step::SelectStore);
    assert_eq!(view.survey.store_label, None);
    assert!(view.survey.models.is_empty());
    assert_eq!(view.shop_search.input, "");
    assert!(wizard.state().catalog().is_empty());
}
