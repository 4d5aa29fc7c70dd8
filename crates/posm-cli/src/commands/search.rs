use anyhow::Result;
use posm_application::SurveyWizard;
use posm_application::autocomplete::{InputEffect, Settled};

use super::context::AppContext;

async fn wizard(ctx: &AppContext) -> Result<SurveyWizard> {
    let user = ctx.guard().check().await?.into_result()?;
    Ok(SurveyWizard::new(ctx.api(), user, ctx.wizard_settings()))
}

pub async fn stores(ctx: &AppContext, query: &str) -> Result<()> {
    let mut wizard = wizard(ctx).await?;
    if let InputEffect::Cleared = wizard.on_store_input(query) {
        println!(
            "Type at least {} characters to search stores",
            ctx.config.min_store_query_len
        );
        return Ok(());
    }

    report(wizard.settle_store_search().await?)?;
    for store in wizard.store_suggestions() {
        println!("{}", store.label());
    }
    Ok(())
}

pub async fn models(ctx: &AppContext, query: &str) -> Result<()> {
    let mut wizard = wizard(ctx).await?;
    if let InputEffect::Cleared = wizard.on_model_input(query) {
        return Ok(());
    }

    report(wizard.settle_model_search().await?)?;
    for model in wizard.view().model_search.suggestions {
        println!("{model}");
    }
    Ok(())
}

fn report(settled: Option<Settled>) -> Result<()> {
    match settled {
        Some(Settled::Shown(0)) => println!("No results"),
        Some(Settled::Failed(err)) => return Err(err.into()),
        _ => {}
    }
    Ok(())
}
