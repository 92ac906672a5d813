mod stop;

use std::sync::Arc;

use reqwest::Client;

use crate::catalog;
use crate::config::Config;
use crate::download::streamed::Transfer;
use crate::download::{PartialDownloads, multi_part, single_shot, streamed};
use crate::error::Result;
use crate::file::FileDescriptor;
use crate::registry::Registry;

pub use stop::StopSignal;

/// Context shared by every download started together.
///
/// Holds the HTTP client, the progress registry observed by the presentation layer and the
/// stop signal. Cloning is cheap and every clone refers to the same session.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    config: Arc<Config>,
    registry: Registry,
    stop: StopSignal,
}

impl Session {
    /// Creates a session. Must be called from within a tokio runtime.
    pub fn new(config: Config) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: Config, client: Client) -> Self {
        Self {
            client,
            config: Arc::new(config),
            registry: Registry::spawn(),
            stop: StopSignal::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    /// Asks every running streamed download to stop at its next batch boundary.
    pub fn stop_downloads(&self) {
        self.stop.stop();
    }

    /// Clears the stop signal and the registry. Only call once no downloads are in flight.
    pub async fn reset(&self) {
        self.stop.clear();
        self.registry.reset().await;
    }

    pub async fn fetch_single_shot(&self, file: &FileDescriptor) -> Result<Vec<u8>> {
        single_shot::download(self, file).await
    }

    pub async fn fetch_with_progress(
        &self,
        file: &FileDescriptor,
        partial: PartialDownloads,
    ) -> Result<Vec<u8>> {
        streamed::download(self, Transfer::whole(file), partial).await
    }

    pub async fn fetch_multi_part(&self, file: &FileDescriptor) -> Result<Vec<u8>> {
        multi_part::download(self, file).await
    }

    pub async fn list_files(&self) -> Result<Vec<FileDescriptor>> {
        catalog::fetch_file_list(&self.client, &self.config.server).await
    }

    pub async fn usage_quota(&self) -> Result<String> {
        catalog::fetch_usage_quota(&self.client, &self.config.server).await
    }
}
