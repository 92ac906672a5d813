use log::{debug, info};
use reqwest::StatusCode;

use crate::download::request::{download_url, full_request};
use crate::error::{DownloadError, Result};
use crate::file::FileDescriptor;
use crate::session::Session;

/// Fetches the whole file in one response. Not affected by the stop signal once started.
pub async fn download(session: &Session, file: &FileDescriptor) -> Result<Vec<u8>> {
    let url = download_url(&session.config().server, &file.name)?;
    let registry = session.registry();
    registry.begin(&file.name).await;

    debug!("requesting {}", file.name);
    let response = full_request(session.client(), url).send().await?;
    DownloadError::expect_status(response.status(), StatusCode::OK)?;
    let data = response.bytes().await?;

    registry.update(&file.name, 1.0);
    info!("{} downloaded ({} bytes)", file.name, data.len());
    Ok(data.to_vec())
}
