//! Project synchronization.
//!
//! - [`Project`]: handle holding the last fetched snapshot and the cached
//!   configuration document
//! - [`ProjectSnapshot`]: immutable per-refresh view
//! - [`PendingWrite`]: background document write started by a setter
//! - [`PollOptions`]: cadence and deadline for `refresh_until_completed`

mod pending;
mod polling;
mod snapshot;
mod sync;

pub use pending::PendingWrite;
pub use polling::PollOptions;
pub use snapshot::ProjectSnapshot;
pub use sync::Project;
