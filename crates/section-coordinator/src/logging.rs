//! Logging targets for the section coordinator.
//!
//! The crate instruments structural edits with the `tracing` crate and never
//! installs a subscriber itself. To see the events, install one in the host
//! application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("section_coordinator=trace")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Single-section edits.
    pub const SECTION: &str = "section_coordinator::section";
    /// Sectioned model edits, including cross-section moves.
    pub const GLOBAL: &str = "section_coordinator::global";
    /// Shared-handle swaps and copy-on-write updates.
    pub const SHARED: &str = "section_coordinator::shared";
    /// Rejected index arguments.
    pub const BOUNDS: &str = "section_coordinator::bounds";
}
