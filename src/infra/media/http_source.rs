// Fetches the rendered fax document over plain HTTP.

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::Client;

use crate::core::delivery::{DeliveryError, MediaSource, MediaStream};

/// Streams the fax document from the webhook's media URL. The URL is
/// already authorized, so the request carries no credentials.
pub struct HttpMediaSource {
    client: Client,
}

impl HttpMediaSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MediaSource for HttpMediaSource {
    async fn open(&self, url: &str) -> Result<MediaStream, DeliveryError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let stream = response.bytes_stream().map_err(std::io::Error::other);
        Ok(Box::pin(stream))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    #[tokio::test]
    async fn open_streams_the_document_bytes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/fax/doc.pdf")
            .with_status(200)
            .with_header("content-type", "application/pdf")
            .with_body("%PDF-1.4 payload")
            .create_async()
            .await;

        let source = HttpMediaSource::new(Client::new());
        let stream = source
            .open(&format!("{}/fax/doc.pdf", server.url()))
            .await
            .unwrap();

        let collected: Vec<u8> = stream
            .try_fold(Vec::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk);
                Ok(acc)
            })
            .await
            .unwrap();

        assert_eq!(collected, b"%PDF-1.4 payload");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_document_is_a_transport_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/fax/missing.pdf")
            .with_status(404)
            .with_body("gone")
            .create_async()
            .await;

        let source = HttpMediaSource::new(Client::new());
        let result = source
            .open(&format!("{}/fax/missing.pdf", server.url()))
            .await;

        assert!(matches!(result, Err(DeliveryError::Transport(_))));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let source = HttpMediaSource::new(Client::new());
        let result = source.open("http://127.0.0.1:9/fax/doc.pdf").await;

        assert!(matches!(result, Err(DeliveryError::Transport(_))));
    }
}
