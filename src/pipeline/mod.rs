//! Pipeline entry points for watcher operations.
//!
//! - `Orchestrator::run_cycle`: one fetch → extract → classify → dedup pass
//! - `Watcher`: eager + periodic cycles with skip-if-running
//! - `SnapshotHandle`: read-only view of the latest completed cycle

pub mod cycle;
pub mod state;
pub mod watch;

pub use cycle::Orchestrator;
pub use state::{Health, Snapshot, SnapshotHandle};
pub use watch::Watcher;
