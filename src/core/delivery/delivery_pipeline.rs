// The delivery pipeline.
//
// A delivery is a fixed chain of dependent remote lookups: authenticate,
// resolve the site, pick the document library drive, pick the destination
// folder, then stream the fax into it. Each step consumes the previous
// step's output, so the chain runs strictly in order and stops at the
// first failure. The remote services sit behind the ports below; this
// module owns the ordering, the match rules and the error surface, and
// nothing HTTP-shaped leaks into it.

use async_trait::async_trait;

use super::delivery_models::{
    DeliveryError, DeliveryReceipt, DriveChild, DriveSummary, MediaStream, PipelineContext,
    PipelineStage, UploadRequest,
};
use crate::core::routing::RoutingTable;

// ============================================================================
// PORTS
// ============================================================================
// The three opaque collaborators of a delivery. Infra provides the real
// implementations; tests provide fakes.

/// Exchanges the fixed application credentials for a bearer token.
/// One attempt per call; the pipeline never retries.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self) -> Result<String, DeliveryError>;
}

/// The remote document store, reduced to the four calls a delivery needs.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Resolve the configured site to its identifier.
    async fn resolve_site(&self, token: &str) -> Result<String, DeliveryError>;

    /// List every drive under a site.
    async fn list_drives(
        &self,
        token: &str,
        site_id: &str,
    ) -> Result<Vec<DriveSummary>, DeliveryError>;

    /// List the immediate children of a drive's root.
    async fn list_root_children(
        &self,
        token: &str,
        drive_id: &str,
    ) -> Result<Vec<DriveChild>, DeliveryError>;

    /// Store `filename` inside the folder with the streamed body and return
    /// the stored file's web URL.
    async fn put_content(
        &self,
        token: &str,
        drive_id: &str,
        folder_id: &str,
        filename: &str,
        body: MediaStream,
    ) -> Result<String, DeliveryError>;
}

/// Opens the fax document as a byte stream. The URL arrives
/// pre-authorized, so no credentials are involved.
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn open(&self, url: &str) -> Result<MediaStream, DeliveryError>;
}

// ============================================================================
// SELECTION RULES
// ============================================================================

/// Pick the document library drive: the first drive whose name equals the
/// configured library name and whose type is `documentLibrary`. Exact
/// comparisons, first match wins, later matches are ignored.
pub fn select_drive<'a>(
    drives: &'a [DriveSummary],
    library_name: &str,
) -> Option<&'a DriveSummary> {
    drives
        .iter()
        .find(|drive| drive.name == library_name && drive.drive_type == "documentLibrary")
}

/// Pick the destination folder: the first root child whose name equals the
/// routed folder name. Same first-match rule as the drive scan.
pub fn select_folder<'a>(children: &'a [DriveChild], folder_name: &str) -> Option<&'a DriveChild> {
    children.iter().find(|child| child.name == folder_name)
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Orchestrates one fax delivery across the three ports.
pub struct FaxDeliveryPipeline<I, S, M>
where
    I: IdentityProvider,
    S: DocumentStore,
    M: MediaSource,
{
    identity: I,
    store: S,
    source: M,
    routes: RoutingTable,
    library_name: String,
}

impl<I, S, M> FaxDeliveryPipeline<I, S, M>
where
    I: IdentityProvider,
    S: DocumentStore,
    M: MediaSource,
{
    pub fn new(
        identity: I,
        store: S,
        source: M,
        routes: RoutingTable,
        library_name: impl Into<String>,
    ) -> Self {
        Self {
            identity,
            store,
            source,
            routes,
            library_name: library_name.into(),
        }
    }

    /// Run the full chain for one request.
    ///
    /// Returns the stored file's web URL, or the first error a step raised,
    /// untouched. Nothing after a failed step runs.
    pub async fn deliver(&self, request: &UploadRequest) -> Result<DeliveryReceipt, DeliveryError> {
        self.enter(PipelineStage::Validating);
        let route = self
            .routes
            .lookup(&request.destination)
            .ok_or_else(|| DeliveryError::Validation(request.destination.clone()))?;
        tracing::info!(
            destination = %request.destination,
            line = %route.description,
            folder = %route.folder_name,
            "fax routed"
        );

        let context = self.resolve_destination(&route.folder_name).await?;
        tracing::info!(
            site_id = %context.site_id,
            drive_id = %context.drive_id,
            folder_id = %context.folder_id,
            "destination resolved"
        );

        self.enter(PipelineStage::Uploading);
        let body = self.source.open(&request.source_url).await?;
        let web_url = self
            .store
            .put_content(
                &context.token,
                &context.drive_id,
                &context.folder_id,
                &request.filename,
                body,
            )
            .await?;

        Ok(DeliveryReceipt { web_url })
    }

    /// Walk token, site, drive, folder. Each value feeds the next lookup;
    /// the finished context only exists once all four are known.
    async fn resolve_destination(
        &self,
        folder_name: &str,
    ) -> Result<PipelineContext, DeliveryError> {
        self.enter(PipelineStage::Authenticating);
        let token = self.identity.authenticate().await?;

        self.enter(PipelineStage::ResolvingSite);
        let site_id = self.store.resolve_site(&token).await?;

        self.enter(PipelineStage::ResolvingDrive);
        let drives = self.store.list_drives(&token, &site_id).await?;
        let drive_id = select_drive(&drives, &self.library_name)
            .map(|drive| drive.id.clone())
            .ok_or_else(|| {
                DeliveryError::NotFound(format!(
                    "document library '{}' not found",
                    self.library_name
                ))
            })?;

        self.enter(PipelineStage::ResolvingFolder);
        let children = self.store.list_root_children(&token, &drive_id).await?;
        let folder_id = select_folder(&children, folder_name)
            .map(|child| child.id.clone())
            .ok_or_else(|| {
                DeliveryError::NotFound(format!(
                    "folder '{}' not found in '{}' library",
                    folder_name, self.library_name
                ))
            })?;

        Ok(PipelineContext {
            token,
            site_id,
            drive_id,
            folder_id,
        })
    }

    fn enter(&self, stage: PipelineStage) {
        tracing::debug!(stage = stage.label(), "pipeline stage");
    }
}

// ============================================================================
// TESTS
// ============================================================================
