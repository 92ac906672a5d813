use url::Url;

const DEFAULT_SERVER: &str = "http://localhost:8080";
const SERVER_ENV: &str = "FILE_DOWNLOADER_SERVER";

/// Configuration settings for a download session
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the file server, the `/files/...` endpoints are resolved against it
    pub server: Url,
    /// Number of byte ranges a multi-part download is split into
    pub part_count: usize,
    /// Roughly how many progress updates a single transfer publishes
    pub progress_batches: usize,
}

impl Config {
    pub fn new(server: Url) -> Self {
        Self {
            server,
            part_count: 4,
            progress_batches: 20,
        }
    }

    /// Reads the server base URL from `FILE_DOWNLOADER_SERVER`, falling back to the local
    /// development server.
    pub fn from_env() -> Result<Self, url::ParseError> {
        let server = std::env::var(SERVER_ENV).unwrap_or_else(|_| DEFAULT_SERVER.to_string());
        Ok(Self::new(Url::parse(&server)?))
    }

    pub fn with_part_count(mut self, n: usize) -> Self {
        self.part_count = n.max(1);
        self
    }

    pub fn with_progress_batches(mut self, n: usize) -> Self {
        self.progress_batches = n.max(1);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Url::parse(DEFAULT_SERVER).expect("default server url is valid"))
    }
}
