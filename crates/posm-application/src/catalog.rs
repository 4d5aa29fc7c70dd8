//! POSM catalog lookup for a newly added model.

use posm_core::catalog::{CatalogCache, PosmItem};
use posm_core::{Result, SurveyError};

use crate::api::SurveyApi;

/// Resolves the POSM list of `model` at `store_id`.
///
/// Order: the local cache, then the store's catalog, then the
/// store-independent model lookup. Every non-empty list fetched from the
/// store catalog is cached, so later additions of other models at the same
/// store stay local. Fails with `NoPosmFound` when no source has items.
pub async fn resolve_catalog(
    api: &SurveyApi,
    cache: &mut CatalogCache,
    store_id: &str,
    model: &str,
) -> Result<Vec<PosmItem>> {
    if let Some(items) = cache.get(model) {
        tracing::debug!(model = %model, "catalog cache hit");
        return Ok(items.to_vec());
    }

    let store_catalog = api.store_catalog(store_id).await?;
    for (name, items) in store_catalog {
        cache.insert(name, items);
    }
    if let Some(items) = cache.get(model) {
        return Ok(items.to_vec());
    }

    tracing::debug!(model = %model, store_id = %store_id, "model not in store catalog, falling back");
    match api.model_posm(model).await {
        Ok(items) if !items.is_empty() => {
            cache.insert(model, items.clone());
            Ok(items)
        }
        Ok(_) | Err(SurveyError::Http { .. }) => Err(SurveyError::NoPosmFound {
            model: model.to_string(),
        }),
        Err(err) => Err(err),
    }
}
