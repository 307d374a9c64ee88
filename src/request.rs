use std::future::Future;

use reqwest::Client;

use crate::{Result, ARCHIVE_URL_PREFIX};

/// Somewhere raw community files can be fetched from.
pub trait Source {
    /// The URL reported in diagnostics for `file_name`.
    fn url_for(&self, file_name: &str) -> String;

    /// Fetches the whole body of `file_name`. One attempt, no retries.
    fn fetch(&self, file_name: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Fetches from the web archive snapshot of moreno.ss.uci.edu.
#[derive(Debug, Clone, Default)]
pub struct ArchiveSource {
    client: Client,
}

impl ArchiveSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Source for ArchiveSource {
    fn url_for(&self, file_name: &str) -> String {
        format!("{ARCHIVE_URL_PREFIX}{file_name}")
    }

    async fn fetch(&self, file_name: &str) -> Result<Vec<u8>> {
        let res = self
            .client
            .get(self.url_for(file_name))
            .send()
            .await?
            .error_for_status()?;
        let body = res.bytes().await?;
        Ok(body.to_vec())
    }
}
