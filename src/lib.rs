//! Downloads files from a file server as a single response, as a progress-reporting stream or
//! as several byte ranges fetched in parallel.

pub mod catalog;
pub mod config;
pub mod download;
pub mod error;
pub mod file;
pub mod registry;
pub mod session;

pub use config::Config;
pub use download::PartialDownloads;
pub use error::DownloadError;
pub use file::FileDescriptor;
pub use registry::{DownloadId, DownloadRecord, Registry};
pub use session::{Session, StopSignal};
