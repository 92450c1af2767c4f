// Microsoft Graph drive client.
//
// The storage side of a delivery: site lookup by path, drive listing, root
// children listing and the streamed content upload. URL shapes and status
// expectations follow the Graph v1.0 drive API.

use async_trait::async_trait;
use reqwest::{Body, Client, StatusCode};
use serde::Deserialize;

use super::GraphSettings;
use crate::core::delivery::{
    DeliveryError, DocumentStore, DriveChild, DriveSummary, MediaStream,
};

const DEFAULT_GRAPH_BASE: &str = "https://graph.microsoft.com/v1.0";

pub struct GraphDriveClient {
    client: Client,
    graph_base: String,
    tenant: String,
    site_name: String,
}

impl GraphDriveClient {
    pub fn new(client: Client, settings: &GraphSettings) -> Self {
        Self {
            client,
            graph_base: DEFAULT_GRAPH_BASE.to_string(),
            tenant: settings.tenant.clone(),
            site_name: settings.site_name.clone(),
        }
    }

    /// Point the client at a different Graph host. Tests use this to swap
    /// in a local server.
    pub fn with_graph_base(mut self, base: impl Into<String>) -> Self {
        self.graph_base = base.into();
        self
    }

    /// `my-company.onmicrosoft.com` serves its SharePoint sites from
    /// `my-company.sharepoint.com`; only the first tenant label survives.
    fn sharepoint_host(tenant: &str) -> String {
        let prefix = tenant.split('.').next().unwrap_or(tenant);
        format!("{prefix}.sharepoint.com")
    }

    /// GET with bearer auth. Anything but 200 is an `Http` error; on 200
    /// the raw body is handed back for field extraction.
    async fn get_ok(&self, url: String, token: &str) -> Result<String, DeliveryError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        if status != StatusCode::OK {
            return Err(DeliveryError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl DocumentStore for GraphDriveClient {
    async fn resolve_site(&self, token: &str) -> Result<String, DeliveryError> {
        let url = format!(
            "{}/sites/{}:/sites/{}",
            self.graph_base,
            Self::sharepoint_host(&self.tenant),
            self.site_name
        );
        let body = self.get_ok(url, token).await?;

        let site: ApiSite =
            serde_json::from_str(&body).map_err(|e| DeliveryError::Parse(e.to_string()))?;
        site.id
            .ok_or_else(|| DeliveryError::Parse("site lookup response has no id".to_string()))
    }

    async fn list_drives(
        &self,
        token: &str,
        site_id: &str,
    ) -> Result<Vec<DriveSummary>, DeliveryError> {
        let url = format!("{}/sites/{}/drives", self.graph_base, site_id);
        let body = self.get_ok(url, token).await?;

        let listing: ApiDriveList =
            serde_json::from_str(&body).map_err(|e| DeliveryError::Parse(e.to_string()))?;
        Ok(listing
            .value
            .into_iter()
            .filter_map(|drive| {
                drive.id.map(|id| DriveSummary {
                    id,
                    name: drive.name.unwrap_or_default(),
                    drive_type: drive.drive_type.unwrap_or_default(),
                })
            })
            .collect())
    }

    async fn list_root_children(
        &self,
        token: &str,
        drive_id: &str,
    ) -> Result<Vec<DriveChild>, DeliveryError> {
        let url = format!("{}/drives/{}/root/children", self.graph_base, drive_id);
        let body = self.get_ok(url, token).await?;

        let listing: ApiChildList =
            serde_json::from_str(&body).map_err(|e| DeliveryError::Parse(e.to_string()))?;
        Ok(listing
            .value
            .into_iter()
            .filter_map(|child| {
                child.id.map(|id| DriveChild {
                    id,
                    name: child.name.unwrap_or_default(),
                })
            })
            .collect())
    }

    async fn put_content(
        &self,
        token: &str,
        drive_id: &str,
        folder_id: &str,
        filename: &str,
        body: MediaStream,
    ) -> Result<String, DeliveryError> {
        let url = format!(
            "{}/drives/{}/items/{}:/{}:/content",
            self.graph_base, drive_id, folder_id, filename
        );

        tracing::debug!(drive_id = %drive_id, folder_id = %folder_id, filename = %filename, "uploading fax content");

        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .header("Content-Type", "application/pdf")
            .body(Body::wrap_stream(body))
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        // A fresh upload answers 201. Anything else, including the 200 an
        // overwrite produces, is a failure here.
        if status != StatusCode::CREATED {
            return Err(DeliveryError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        let stored: ApiUploadedItem =
            serde_json::from_str(&text).map_err(|e| DeliveryError::Parse(e.to_string()))?;
        stored
            .web_url
            .ok_or_else(|| DeliveryError::Parse("upload response has no webUrl".to_string()))
    }
}

// ============================================================================
// API RESPONSE TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiSite {
    id: Option<String>,
}

// `value` stays required: a listing body without it is malformed, not empty.

#[derive(Debug, Deserialize)]
struct ApiDriveList {
    value: Vec<ApiDrive>,
}

#[derive(Debug, Deserialize)]
struct ApiDrive {
    id: Option<String>,
    name: Option<String>,
    #[serde(rename = "driveType")]
    drive_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiChildList {
    value: Vec<ApiChild>,
}

#[derive(Debug, Deserialize)]
struct ApiChild {
    id: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUploadedItem {
    #[serde(rename = "webUrl")]
    web_url: Option<String>,
}

// ============================================================================
// TESTS
// ============================================================================
