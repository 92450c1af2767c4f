// The handler module adapts the webhook transport: the inbound event shape
// and its translation into core requests.

#[path = "fax_event.rs"]
pub mod fax_event;
