use std::path::Path;

use anyhow::{Context, Result};
use posm_application::GuardOutcome;
use posm_core::session::{CredentialStore, Session};

use super::context::AppContext;

pub async fn import(ctx: &AppContext, file: &Path) -> Result<()> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let session: Session = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a valid session", file.display()))?;

    ctx.credentials().save(&session).await?;
    println!("Signed in as {}", session.user.username);
    Ok(())
}

pub async fn show(ctx: &AppContext) -> Result<()> {
    match ctx.credentials().load().await? {
        Some(session) => {
            let user = &session.user;
            println!("User:   {}", user.username);
            println!("Role:   {}", user.role);
            println!("Leader: {}", user.leader.as_deref().unwrap_or("-"));
            if !user.assigned_stores.is_empty() {
                println!("Stores: {}", user.assigned_stores.join(", "));
            }
        }
        None => println!("Not signed in"),
    }
    Ok(())
}

pub async fn verify(ctx: &AppContext) -> Result<()> {
    match ctx.guard().check().await? {
        GuardOutcome::Proceed(user) => println!("Session valid for {}", user.username),
        GuardOutcome::RedirectToResults => {
            println!("Admin session: use the survey results view")
        }
        GuardOutcome::RedirectToLogin { reason } => {
            println!("Please log in again ({reason})")
        }
    }
    Ok(())
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    ctx.client().logout().await?;
    println!("Signed out");
    Ok(())
}
