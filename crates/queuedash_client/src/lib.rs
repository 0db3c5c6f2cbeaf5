//! Queuedash client: backend HTTP access, request engine and polling driver.
mod endpoints;
mod engine;
mod fetch;
mod poller;
mod types;

pub use endpoints::Endpoints;
pub use engine::{EngineCommand, EngineHandle};
pub use fetch::{DashboardApi, FetchSettings, ReqwestApi};
pub use poller::{PollState, PollTick, PollingDriver, DEFAULT_POLL_INTERVAL};
pub use types::{EngineEvent, FailureKind, FetchError};
