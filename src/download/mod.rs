pub mod accumulator;
pub mod multi_part;
pub mod part;
pub mod request;
pub mod single_shot;
pub mod streamed;

pub use accumulator::ByteAccumulator;
pub use part::{PartSpec, split};
pub use request::ByteRange;
pub use streamed::Transfer;

/// Whether a stopped transfer may return the bytes received so far instead of failing.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum PartialDownloads {
    Supported,
    #[default]
    Unsupported,
}

impl PartialDownloads {
    /// JPEG images can be decoded from a truncated payload, other files cannot.
    pub fn for_file(file_name: &str) -> Self {
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(".jpeg") || lower.ends_with(".jpg") {
            PartialDownloads::Supported
        } else {
            PartialDownloads::Unsupported
        }
    }

    pub fn is_supported(&self) -> bool {
        *self == PartialDownloads::Supported
    }
}
