use reqwest::{Client, RequestBuilder, header};
use url::Url;

use crate::error::{DownloadError, Result};

/// A contiguous byte range `[offset, offset + length)` of a remote file.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ByteRange {
    pub offset: u64,
    pub length: u64,
}

impl ByteRange {
    pub fn new(offset: u64, length: u64) -> Self {
        Self { offset, length }
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Value of the `Range` header, the end position is inclusive.
    pub fn header_value(&self) -> String {
        let end = self.offset + self.length.saturating_sub(1);
        format!("bytes={}-{}", self.offset, end)
    }
}

/// URL of `GET /files/download?<name>`.
pub fn download_url(server: &Url, file_name: &str) -> Result<Url> {
    let mut url = endpoint(server, "files/download")?;
    url.set_query(Some(file_name));
    Ok(url)
}

pub(crate) fn endpoint(server: &Url, path: &str) -> Result<Url> {
    if server.cannot_be_a_base() {
        return Err(DownloadError::Request(format!(
            "{} cannot be used as a base url",
            server
        )));
    }
    server
        .join(path)
        .map_err(|err| DownloadError::Request(format!("invalid url for {}: {}", path, err)))
}

pub fn full_request(client: &Client, url: Url) -> RequestBuilder {
    client.get(url)
}

pub fn range_request(client: &Client, url: Url, range: ByteRange) -> RequestBuilder {
    client
        .get(url)
        .header(header::RANGE, range.header_value())
}
