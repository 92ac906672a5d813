use rand::RngCore;

#[derive(PartialEq, Eq, Clone, Copy, Hash)]
pub struct DownloadId(pub [u8; 16]);

impl DownloadId {
    pub fn random() -> Self {
        let mut data = [0; 16];
        rand::rng().fill_bytes(&mut data);
        Self(data)
    }
}

impl std::fmt::Debug for DownloadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DownloadId({})", self)
    }
}

impl std::fmt::Display for DownloadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Progress of one logical download: a whole file or a single part of a multi-part download.
#[derive(Debug, PartialEq, Clone)]
pub struct DownloadRecord {
    pub id: DownloadId,
    pub name: String,
    /// Fraction of the transfer received so far, between 0.0 and 1.0
    pub progress: f64,
}

impl DownloadRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: DownloadId::random(),
            name: name.into(),
            progress: 0.0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }
}
