//! Wiring of configuration, transport and credential storage.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use posm_application::{AuthenticatedClient, SessionGuard, SurveyApi, WizardSettings};
use posm_core::session::CredentialStore;
use posm_core::transport::Transport;
use posm_infrastructure::{ClientConfig, FileCredentialStore, PosmPaths, ReqwestTransport};

pub struct AppContext {
    pub config: ClientConfig,
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
}

impl AppContext {
    pub fn load(config_dir: Option<&Path>, base_url: Option<String>) -> Result<Self> {
        let paths = PosmPaths::new(config_dir);
        let mut config = ClientConfig::load_with_env(&paths.config_file()?)?;
        if let Some(url) = base_url {
            config.base_url = url;
        }

        let transport = Arc::new(ReqwestTransport::new(config.base_url.clone()));
        let credentials = Arc::new(FileCredentialStore::new(&paths)?);
        Ok(Self {
            config,
            transport,
            credentials,
        })
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    pub fn guard(&self) -> SessionGuard {
        SessionGuard::new(self.transport.clone(), self.credentials.clone())
    }

    pub fn client(&self) -> AuthenticatedClient {
        AuthenticatedClient::new(self.transport.clone(), self.credentials.clone())
    }

    pub fn api(&self) -> SurveyApi {
        SurveyApi::new(self.client())
    }

    pub fn wizard_settings(&self) -> WizardSettings {
        WizardSettings {
            debounce: self.config.search_debounce(),
            min_store_query_len: self.config.min_store_query_len,
            min_model_query_len: self.config.min_model_query_len,
        }
    }
}
