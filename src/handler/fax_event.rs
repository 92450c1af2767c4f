// Inbound fax webhook event.

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::core::delivery::UploadRequest;
use crate::core::naming::fax_filename;

/// The fields of the provider's fax-received callback this handler
/// consumes. The real payload carries plenty more; serde drops whatever we
/// do not read.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FaxEvent {
    /// URL of the rendered fax document.
    pub media_url: String,
    /// Sending fax number, `+` and country code included.
    pub from: String,
    /// Receiving fax number; decides the destination folder.
    pub to: String,
}

impl FaxEvent {
    /// Derive the per-invocation upload request. `received_at` becomes the
    /// filename timestamp; the destination keeps the `To` number verbatim
    /// so it matches the routing table keys exactly.
    pub fn into_request(self, received_at: DateTime<Utc>) -> UploadRequest {
        let filename = fax_filename(received_at, &self.from, &self.to);
        UploadRequest {
            source_url: self.media_url,
            filename,
            destination: self.to,
        }
    }
}

/// Parse the raw event JSON handed over by the invocation wrapper.
pub fn parse_event(raw: &str) -> anyhow::Result<FaxEvent> {
    serde_json::from_str(raw).context("fax event is not valid JSON with MediaUrl/From/To")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn event_fields_deserialize_from_pascal_case() {
        let event = parse_event(
            r#"{
                "FaxSid": "FXabc123",
                "MediaUrl": "https://media.example/fax/doc",
                "From": "+10123456789",
                "To": "+11234567890",
                "NumPages": "2",
                "Status": "received"
            }"#,
        )
        .unwrap();

        assert_eq!(event.media_url, "https://media.example/fax/doc");
        assert_eq!(event.from, "+10123456789");
        assert_eq!(event.to, "+11234567890");
    }

    #[test]
    fn request_derivation_keeps_the_destination_verbatim() {
        let event = FaxEvent {
            media_url: "https://media.example/fax/doc".to_string(),
            from: "+10123456789".to_string(),
            to: "+11234567890".to_string(),
        };
        let received_at = Utc.with_ymd_and_hms(2023, 7, 14, 9, 30, 5).unwrap();

        let request = event.into_request(received_at);

        assert_eq!(request.source_url, "https://media.example/fax/doc");
        assert_eq!(request.destination, "+11234567890");
        assert_eq!(
            request.filename,
            "2023-07-14-09-30-05-from-0123456789-to-1234567890.pdf"
        );
    }

    #[test]
    fn garbage_and_incomplete_events_are_rejected() {
        assert!(parse_event("not json").is_err());
        assert!(parse_event(r#"{"MediaUrl": "https://x", "From": "+1"}"#).is_err());

        let err = parse_event("{}").unwrap_err();
        assert!(err.to_string().contains("MediaUrl/From/To"));
    }
}
