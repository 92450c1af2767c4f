// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "delivery/mod.rs"]
pub mod delivery;

#[path = "naming/fax_naming.rs"]
pub mod naming;

#[path = "routing/routing_table.rs"]
pub mod routing;
