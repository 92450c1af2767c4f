// Microsoft Graph adapters: the identity token endpoint and the SharePoint
// drive API, plus the settings both clients are constructed from.

pub mod drive_client;
pub mod identity_client;

pub use drive_client::GraphDriveClient;
pub use identity_client::GraphIdentityClient;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
}

/// Process-lifetime Graph configuration. Every field is required; a missing
/// variable is a startup defect, not a per-fax error.
#[derive(Debug, Clone)]
pub struct GraphSettings {
    /// Application (client) id of the registered Graph app.
    pub app_id: String,
    /// Client secret of the registered Graph app.
    pub app_secret: String,
    /// Office 365 tenant, e.g. `my-company.onmicrosoft.com`.
    pub tenant: String,
    /// SharePoint site faxes are filed under.
    pub site_name: String,
    /// Document library inside that site.
    pub library_name: String,
}

impl GraphSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Ok(Self {
            app_id: required("MS_GRAPH_APP_ID")?,
            app_secret: required("MS_GRAPH_APP_SECRET")?,
            tenant: required("OFFICE_365_TENANT")?,
            site_name: required("SHAREPOINT_FAX_SITE")?,
            library_name: required("SHAREPOINT_FAX_LIBRARY")?,
        })
    }
}

// Empty values count as missing; an empty client secret is never intended.
fn required(name: &'static str) -> Result<String, SettingsError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(SettingsError::Missing(name)),
    }
}
