use std::collections::BTreeMap;

use log::{debug, info, warn};
use tokio::task::JoinSet;

use crate::download::PartialDownloads;
use crate::download::part::split;
use crate::download::streamed::{self, Transfer};
use crate::error::Result;
use crate::file::FileDescriptor;
use crate::session::Session;

/// Downloads `file` as `part_count` concurrent byte ranges and joins them in part order.
///
/// Every part is registered on its own. The first failing part aborts the others and its
/// error is returned; bytes of the remaining parts are discarded.
pub async fn download(session: &Session, file: &FileDescriptor) -> Result<Vec<u8>> {
    let parts = split(file, session.config().part_count);
    let total_parts = parts.len();

    let mut join_set = JoinSet::new();
    for part in parts {
        let session = session.clone();
        let transfer = Transfer::part(file, &part);
        join_set.spawn(async move {
            let result =
                streamed::download(&session, transfer, PartialDownloads::Unsupported).await;
            (part.index, result)
        });
    }

    let mut completed: BTreeMap<usize, Vec<u8>> = BTreeMap::new();
    while let Some(joined) = join_set.join_next().await {
        let outcome = match joined {
            Ok((index, result)) => result.map(|data| (index, data)),
            Err(err) => Err(err.into()),
        };
        match outcome {
            Ok((index, data)) => {
                debug!(part = index; "{} part {} of {} done", file.name, index + 1, total_parts);
                completed.insert(index, data);
            }
            Err(err) => {
                warn!("{} failed: {}", file.name, err);
                join_set.abort_all();
                while join_set.join_next().await.is_some() {}
                return Err(err);
            }
        }
    }

    debug_assert_eq!(completed.len(), total_parts);
    let data: Vec<u8> = completed.into_values().flatten().collect();
    info!("{} downloaded in {} parts ({} bytes)", file.name, total_parts, data.len());
    Ok(data)
}
