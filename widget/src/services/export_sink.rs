//! Export destinations: a local directory and an outbound webhook

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{WidgetError, WidgetResult};
use crate::traits::ExportSink;
use crate::types::ExportDocument;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(15);

/// Writes exports into a directory and forwards them as JSON
pub struct FileExportSink {
    dir: PathBuf,
    client: Client,
}

impl FileExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let client = Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { dir: dir.into(), client }
    }
}

#[async_trait]
impl ExportSink for FileExportSink {
    async fn save(&self, document: &ExportDocument) -> WidgetResult<String> {
        let body = document.render()?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(document.file_name());
        tokio::fs::write(&path, body).await?;
        Ok(path.display().to_string())
    }

    async fn forward(&self, url: &str, document: &ExportDocument) -> WidgetResult<()> {
        // Webhooks always receive the structured form
        let response = self
            .client
            .post(url)
            .json(document)
            .send()
            .await
            .map_err(|e| WidgetError::export(format!("webhook unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(WidgetError::export(format!("webhook returned {}", response.status())));
        }
        Ok(())
    }
}
