//! Mask-driven passphrase search
//!
//! Generates candidate passphrases from a hashcat-style mask and tests each
//! one against an external unlock command (gpg secret-key export, LUKS via
//! cryptsetup), stopping at the first success. An optional increment mask
//! grows the search space cumulatively across rounds.

pub mod charset;
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod mask;
pub mod monitor;
pub mod verifier;

pub use charset::CharsetTable;
pub use config::SearchConfig;
pub use engine::{run_search, Outcome, SearchEngine};
pub use error::*;
pub use generator::Candidates;
pub use mask::{parse_mask, Slot, Template};
pub use monitor::{MonitorConfig, SearchMonitor};
pub use verifier::{CommandVerifier, Profile, Verify};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::charset::CharsetTable;
    pub use crate::config::SearchConfig;
    pub use crate::engine::{run_search, Outcome, SearchEngine};
    pub use crate::error::*;
    pub use crate::mask::{parse_mask, Slot, Template};
    pub use crate::monitor::{MonitorConfig, SearchMonitor};
    pub use crate::verifier::{CommandVerifier, Profile, Verify};
}

#[cfg(test)]
mod tests;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default number of escalation rounds after round 0
pub const DEFAULT_INCREMENT_COUNT: u32 = 10;

/// Per-test timeout for the external verifier, in seconds
pub const VERIFY_TIMEOUT_SECS: u64 = 30;
