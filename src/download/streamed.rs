use std::pin::pin;

use futures::Stream;
use log::{debug, info, warn};
use reqwest::StatusCode;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::download::PartialDownloads;
use crate::download::accumulator::ByteAccumulator;
use crate::download::part::PartSpec;
use crate::download::request::{ByteRange, download_url, full_request, range_request};
use crate::error::{DownloadError, Result};
use crate::file::FileDescriptor;
use crate::registry::Registry;
use crate::session::Session;

/// One HTTP exchange driven by the streamed downloader.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Transfer {
    /// Name the transfer is registered under
    pub name: String,
    /// Name of the remote file
    pub file_name: String,
    /// Requested byte range, `None` for the whole file
    pub range: Option<ByteRange>,
    /// Number of bytes expected from the server
    pub size: u64,
}

impl Transfer {
    pub fn whole(file: &FileDescriptor) -> Self {
        Self {
            name: file.name.clone(),
            file_name: file.name.clone(),
            range: None,
            size: file.size,
        }
    }

    pub fn part(file: &FileDescriptor, part: &PartSpec) -> Self {
        Self {
            name: part.name.clone(),
            file_name: file.name.clone(),
            range: Some(part.range()),
            size: part.size,
        }
    }
}

/// Downloads `transfer`, publishing progress to the session registry after every batch.
///
/// The session stop signal is polled between batches. When it is set before the transfer
/// completes, the bytes received so far are returned if `partial` allows it, otherwise the
/// download fails with [`DownloadError::Cancelled`].
pub async fn download(
    session: &Session,
    transfer: Transfer,
    partial: PartialDownloads,
) -> Result<Vec<u8>> {
    let stop = session.stop_signal().token();
    let registry = session.registry();
    registry.begin(&transfer.name).await;

    let target_size = usize::try_from(transfer.size).map_err(|_| {
        DownloadError::Request(format!("{} is too large to buffer", transfer.name))
    })?;

    if transfer.range.is_some_and(|range| range.is_empty()) {
        debug!("{} is empty, nothing to request", transfer.name);
        registry.update(&transfer.name, 1.0);
        return Ok(Vec::new());
    }

    let url = download_url(&session.config().server, &transfer.file_name)?;
    let (request, expected) = match transfer.range {
        Some(range) => (
            range_request(session.client(), url, range),
            StatusCode::PARTIAL_CONTENT,
        ),
        None => (full_request(session.client(), url), StatusCode::OK),
    };
    debug!("requesting {}", transfer.name);
    let response = request.send().await?;
    DownloadError::expect_status(response.status(), expected)?;

    let accumulator = ByteAccumulator::new(
        transfer.name,
        target_size,
        session.config().progress_batches,
    );
    receive(response.bytes_stream(), accumulator, registry, &stop, partial).await
}

/// Consumes `stream` into `accumulator` until it is complete or `stop` is cancelled.
pub(crate) async fn receive<S, B, E>(
    stream: S,
    mut accumulator: ByteAccumulator,
    registry: &Registry,
    stop: &CancellationToken,
    partial: PartialDownloads,
) -> Result<Vec<u8>>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<DownloadError>,
{
    let mut stream = pin!(stream);

    while !stop.is_cancelled() && !accumulator.check_completed() {
        accumulator.start_batch();
        while !accumulator.is_batch_completed() && !accumulator.check_completed() {
            let Some(chunk) = stream.next().await else {
                warn!("{} response ended early", accumulator);
                return Err(DownloadError::IncompleteBody {
                    received: accumulator.data().len(),
                    expected: accumulator.target_size(),
                });
            };
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(err) => return Err(err.into()),
            };
            let chunk = chunk.as_ref();
            let accepted = accumulator.append(chunk);
            if accepted < chunk.len() {
                warn!(
                    "{} discarding {} bytes past the expected size",
                    accumulator.name(),
                    chunk.len() - accepted
                );
            }
        }
        registry.update(accumulator.name(), accumulator.progress());
        debug!("{}", accumulator);
    }

    if !accumulator.check_completed() {
        if !partial.is_supported() {
            info!("{} cancelled", accumulator.name());
            return Err(DownloadError::Cancelled);
        }
        info!("{} stopped, keeping partial payload", accumulator);
    }

    registry.update(accumulator.name(), accumulator.progress());
    Ok(accumulator.into_data())
}
