// The infra module contains implementations of core traits.
// Each adapter goes in its own submodule.

#[path = "graph/mod.rs"]
pub mod graph;

#[path = "media/http_source.rs"]
pub mod media;
