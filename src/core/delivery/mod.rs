pub mod delivery_models;
pub mod delivery_pipeline;

pub use delivery_models::{DeliveryError, DriveChild, DriveSummary, MediaStream, UploadRequest};
pub use delivery_pipeline::{DocumentStore, FaxDeliveryPipeline, IdentityProvider, MediaSource};
