//! Uniform success/error wrapper returned by every resource endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Wire format of the envelope timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Response envelope: `{ success, message, data, timestamp }`.
///
/// Fields are private so an envelope can only be built through the named
/// constructors; `success` is `true` exactly for the `success*` family.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    message: Option<String>,
    data: Option<T>,
    #[serde(with = "timestamp_format")]
    timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    fn new(success: bool, message: Option<String>, data: Option<T>) -> Self {
        Self {
            success,
            message,
            data,
            timestamp: Utc::now(),
        }
    }

    pub fn success(data: T) -> Self {
        Self::new(true, None, Some(data))
    }

    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self::new(true, Some(message.into()), Some(data))
    }

    /// Success with a message and no payload (e.g. after a delete).
    pub fn success_message(message: impl Into<String>) -> Self {
        Self::new(true, Some(message.into()), None)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(false, Some(message.into()), None)
    }

    pub fn error_with_data(message: impl Into<String>, data: T) -> Self {
        Self::new(false, Some(message.into()), Some(data))
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }
}

mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::{DateTime, Utc};
    use serde::Serializer;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(TIMESTAMP_FORMAT).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use serde_json::{json, Value};

    #[test]
    fn success_factories_set_flag() {
        let plain = ApiResponse::success(5);
        assert!(plain.is_success());
        assert_eq!(plain.message(), None);
        assert_eq!(plain.data(), Some(&5));

        let with_message = ApiResponse::success_with_message("done", "payload");
        assert!(with_message.is_success());
        assert_eq!(with_message.message(), Some("done"));

        let no_data: ApiResponse<()> = ApiResponse::success_message("deleted");
        assert!(no_data.is_success());
        assert!(no_data.data().is_none());
    }

    #[test]
    fn error_factories_clear_flag() {
        let err: ApiResponse<String> = ApiResponse::error("boom");
        assert!(!err.is_success());
        assert_eq!(err.message(), Some("boom"));
        assert!(err.data().is_none());

        let with_data = ApiResponse::error_with_data("invalid", json!({ "name": "required" }));
        assert!(!with_data.is_success());
        assert_eq!(with_data.data(), Some(&json!({ "name": "required" })));
    }

    #[test]
    fn serializes_timestamp_without_fraction_or_zone() {
        let envelope: ApiResponse<()> = ApiResponse::error("missing");
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["success"], Value::Bool(false));
        assert_eq!(value["message"], "missing");
        assert_eq!(value["data"], Value::Null);

        let rendered = value["timestamp"].as_str().unwrap();
        assert_eq!(rendered.len(), "2024-01-31 23:59:59".len());
        assert!(NaiveDateTime::parse_from_str(rendered, TIMESTAMP_FORMAT).is_ok());
    }
}
