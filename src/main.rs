// This is the entry point of the fax delivery handler.
//
// **Architecture Overview:**
// - `core/` = Business logic (routing, naming, the delivery pipeline)
// - `infra/` = Implementations of core traits (identity, Graph drive, media)
// - `handler/` = Webhook-specific adapters (the inbound event shape)
//
// This file's job is to:
// 1. Load configuration
// 2. Read the inbound fax event
// 3. Initialize the adapters (dependency injection)
// 4. Run one delivery and report the stored web URL
//
// One invocation handles exactly one fax. Exit code 0 means the document
// was stored, 1 means the delivery failed, 2 means the configuration or
// the event itself was unusable.

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "handler/handler_layer.rs"]
mod handler;
#[path = "infra/infra_layer.rs"]
mod infra;

use std::io::Read;

use anyhow::Context;

use crate::core::delivery::FaxDeliveryPipeline;
use crate::core::routing::{RoutingError, RoutingTable};
use crate::handler::fax_event::{parse_event, FaxEvent};
use crate::infra::graph::{GraphDriveClient, GraphIdentityClient, GraphSettings};
use crate::infra::media::HttpMediaSource;

#[tokio::main]
async fn main() {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let settings = match GraphSettings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!("configuration error: {err}");
            std::process::exit(2);
        }
    };

    let routes = match load_routes() {
        Ok(routes) => routes,
        Err(err) => {
            tracing::error!("routing table error: {err}");
            std::process::exit(2);
        }
    };
    if routes.is_empty() {
        tracing::warn!("routing table is empty; every fax will be rejected");
    }

    let event = match read_event() {
        Ok(event) => event,
        Err(err) => {
            tracing::error!("event error: {err:#}");
            std::process::exit(2);
        }
    };

    tracing::info!(
        routes = routes.len(),
        site = %settings.site_name,
        library = %settings.library_name,
        "fax delivery starting"
    );

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // One reqwest client shared by all three adapters; the pipeline owns the
    // adapters for the lifetime of this single delivery.

    let http = reqwest::Client::new();
    let identity = GraphIdentityClient::new(http.clone(), &settings);
    let store = GraphDriveClient::new(http.clone(), &settings);
    let source = HttpMediaSource::new(http);

    let pipeline = FaxDeliveryPipeline::new(
        identity,
        store,
        source,
        routes,
        settings.library_name.clone(),
    );

    let request = event.into_request(chrono::Utc::now());
    tracing::info!(filename = %request.filename, source = %request.source_url, "handling fax");

    match pipeline.deliver(&request).await {
        Ok(receipt) => {
            tracing::info!(web_url = %receipt.web_url, "fax stored");
            println!("{}", receipt.web_url);
        }
        Err(err) => {
            tracing::error!("delivery failed: {err}");
            std::process::exit(1);
        }
    }
}

/// Routing table for this process: the builtin one, or a JSON override when
/// `FAX_ROUTES_FILE` points at a file.
fn load_routes() -> Result<RoutingTable, RoutingError> {
    match std::env::var("FAX_ROUTES_FILE") {
        Ok(path) => {
            tracing::info!(path = %path, "loading routing table override");
            RoutingTable::from_json_file(path)
        }
        Err(_) => Ok(RoutingTable::builtin()),
    }
}

/// One event per invocation: a JSON file named as the first argument, or
/// the raw JSON on stdin.
fn read_event() -> anyhow::Result<FaxEvent> {
    let raw = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("could not read event file {path}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("could not read event from stdin")?;
            buf
        }
    };
    parse_event(&raw)
}
