// Data that flows through one fax delivery.
//
// Everything here is a plain value type: the pipeline and its ports trade
// these records, the infra layer maps its wire formats into them, and none
// of them outlive the invocation that created them.

use std::io;
use std::pin::Pin;

use bytes::Bytes;
use futures::Stream;
use thiserror::Error;

/// What the handler derives from one inbound fax event.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Where the rendered fax document can be fetched from.
    pub source_url: String,
    /// Name the document will be stored under.
    pub filename: String,
    /// The number the fax was sent to; key into the routing table.
    pub destination: String,
}

/// Identifiers accumulated while resolving the destination hierarchy.
///
/// Each field is produced by exactly one pipeline step, in declaration
/// order, and the record is only assembled once the last of them is known.
/// There is no partially-resolved state to observe.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub token: String,
    pub site_id: String,
    pub drive_id: String,
    pub folder_id: String,
}

/// Success outcome handed back to the invocation wrapper.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    /// Canonical web URL of the stored document.
    pub web_url: String,
}

/// The stages of one delivery, in execution order. The pipeline advances
/// through them strictly left to right and stops at the first failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Validating,
    Authenticating,
    ResolvingSite,
    ResolvingDrive,
    ResolvingFolder,
    Uploading,
}

impl PipelineStage {
    pub fn label(self) -> &'static str {
        match self {
            PipelineStage::Validating => "validating",
            PipelineStage::Authenticating => "authenticating",
            PipelineStage::ResolvingSite => "resolving-site",
            PipelineStage::ResolvingDrive => "resolving-drive",
            PipelineStage::ResolvingFolder => "resolving-folder",
            PipelineStage::Uploading => "uploading",
        }
    }
}

/// Everything that can go wrong during a delivery.
///
/// Steps raise these directly and the pipeline passes them through
/// unchanged, so the first failure is exactly what the wrapper sees.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The destination number has no routing entry. Raised before any
    /// network traffic happens.
    #[error("fax number {0} is not configured in the routing table")]
    Validation(String),

    /// A collaborator could not be reached at the network level.
    #[error("transport error: {0}")]
    Transport(String),

    /// The identity endpoint explicitly rejected the credential exchange.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A storage call answered with an unexpected status code.
    #[error("unexpected HTTP status {status}: {body}")]
    Http { status: u16, body: String },

    /// A response body could not be decoded or lacked a required field.
    #[error("malformed response: {0}")]
    Parse(String),

    /// A listing scan found no matching drive or folder.
    #[error("{0}")]
    NotFound(String),
}

/// One drive under a site, as reported by the storage listing.
#[derive(Debug, Clone)]
pub struct DriveSummary {
    pub id: String,
    pub name: String,
    pub drive_type: String,
}

/// One immediate child of a drive root.
#[derive(Debug, Clone)]
pub struct DriveChild {
    pub id: String,
    pub name: String,
}

/// Byte stream flowing from the media fetch into the upload body. The
/// pipeline never buffers the document whole; chunks pass straight through.
pub type MediaStream = Pin<Box<dyn Stream<Item = Result<Bytes, io::Error>> + Send>>;

// ============================================================================
// TESTS
// ============================================================================
