use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, de};

/// A file offered by the server, as returned by the file list.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize)]
pub struct FileDescriptor {
    /// Unique name of the file, also used to request it
    pub name: String,
    /// Size of the file in bytes
    pub size: u64,
    #[serde(rename = "date", deserialize_with = "deserialize_timestamp")]
    pub modified: DateTime<Utc>,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, size: u64, modified: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            size,
            modified,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Timestamp {
    Text(String),
    Seconds(i64),
    FractionalSeconds(f64),
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    match Timestamp::deserialize(deserializer)? {
        Timestamp::Text(text) => DateTime::parse_from_rfc3339(&text)
            .map(|date| date.with_timezone(&Utc))
            .map_err(de::Error::custom),
        Timestamp::Seconds(seconds) => DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {}", seconds))),
        Timestamp::FractionalSeconds(seconds) => {
            let millis = (seconds * 1000.0).round() as i64;
            DateTime::from_timestamp_millis(millis)
                .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {}", seconds)))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn iso_8601_date() {
        let json = r#"{"name": "photo.jpeg", "size": 1024, "date": "2023-03-12T10:30:00Z"}"#;

        let file: FileDescriptor = serde_json::from_str(json).expect("valid descriptor");

        assert_eq!(
            file,
            FileDescriptor::new(
                "photo.jpeg",
                1024,
                Utc.with_ymd_and_hms(2023, 3, 12, 10, 30, 0).unwrap()
            )
        );
    }

    #[test]
    fn epoch_date() {
        let json = r#"{"name": "notes.txt", "size": 12, "date": 1678617000}"#;

        let file: FileDescriptor = serde_json::from_str(json).expect("valid descriptor");

        assert_eq!(
            file.modified,
            Utc.with_ymd_and_hms(2023, 3, 12, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn fractional_epoch_date() {
        let json = r#"{"name": "notes.txt", "size": 12, "date": 1678617000.5}"#;

        let file: FileDescriptor = serde_json::from_str(json).expect("valid descriptor");

        assert_eq!(file.modified.timestamp_millis(), 1_678_617_000_500);
    }

    #[test]
    fn invalid_date() {
        let json = r#"{"name": "notes.txt", "size": 12, "date": "yesterday"}"#;

        assert!(serde_json::from_str::<FileDescriptor>(json).is_err());
    }
}
