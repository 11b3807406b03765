//! External verifier invocation
//!
//! A verifier is an external command that accepts a candidate passphrase on
//! stdin and signals success through its exit status. The engine only cares
//! about the [`Verify`] seam; [`CommandVerifier`] is the production
//! implementation, with built-in [`Profile`]s for gpg and LUKS.

use crate::error::VerifierError;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

const GPG: &str = "/usr/bin/gpg";
const CRYPTSETUP: &str = "/usr/bin/cryptsetup";

/// Placeholder in profile argument vectors replaced by the bound resource
const PARAM_PLACEHOLDER: &str = "%1";

/// An opaque predicate deciding whether a candidate is the secret.
///
/// Implementations must be callable concurrently from multiple workers.
pub trait Verify: Send + Sync {
    /// Returns `Ok(true)` iff the candidate unlocks the resource. Execution
    /// faults (timeout, launch failure) are hard errors, not `Ok(false)`.
    fn test(&self, candidate: &str) -> std::result::Result<bool, VerifierError>;
}

impl<V: Verify + ?Sized> Verify for std::sync::Arc<V> {
    fn test(&self, candidate: &str) -> std::result::Result<bool, VerifierError> {
        (**self).test(candidate)
    }
}

/// Verifier backed by an external command.
///
/// The candidate is written to the child's stdin (optionally followed by a
/// newline), stdout/stderr are discarded, the environment is cleared, and
/// the child is killed if it outlives the timeout.
#[derive(Debug, Clone)]
pub struct CommandVerifier {
    program: String,
    args: Vec<String>,
    write_linefeed: bool,
    timeout: Duration,
}

impl CommandVerifier {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        write_linefeed: bool,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            write_linefeed,
            timeout: Duration::from_secs(crate::VERIFY_TIMEOUT_SECS),
        }
    }

    /// Substitute the `%1` placeholder with the bound resource parameter
    /// (key name, device path, ...)
    pub fn bind(mut self, param: &str) -> Self {
        for arg in &mut self.args {
            if arg.contains(PARAM_PLACEHOLDER) {
                *arg = arg.replace(PARAM_PLACEHOLDER, param);
            }
        }
        self
    }

    /// Override the per-test timeout (tests only need sub-second values)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Verify for CommandVerifier {
    fn test(&self, candidate: &str) -> std::result::Result<bool, VerifierError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .env_clear()
            .spawn()
            .map_err(|source| VerifierError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let mut input = candidate.as_bytes().to_vec();
            if self.write_linefeed {
                input.push(b'\n');
            }
            if let Err(source) = stdin.write_all(&input) {
                // a fast-failing child may close its stdin before we write
                if source.kind() != std::io::ErrorKind::BrokenPipe {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(VerifierError::Io {
                        candidate: candidate.to_string(),
                        source,
                    });
                }
            }
            // dropping stdin closes the pipe so the child sees EOF
        }

        match child.wait_timeout(self.timeout) {
            Ok(Some(status)) => Ok(status.success()),
            Ok(None) => {
                let _ = child.kill();
                let _ = child.wait();
                Err(VerifierError::Timeout {
                    candidate: candidate.to_string(),
                    secs: self.timeout.as_secs(),
                })
            }
            Err(source) => {
                let _ = child.kill();
                let _ = child.wait();
                Err(VerifierError::Io {
                    candidate: candidate.to_string(),
                    source,
                })
            }
        }
    }
}

/// Built-in verifier command profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    /// Try to export a gpg secret key with the candidate passphrase
    GpgKey,
    /// Test the candidate against a LUKS container via cryptsetup
    Luks,
}

impl Profile {
    /// Build the verifier for this profile, bound to its resource parameter
    /// (gpg key name, or LUKS device)
    pub fn verifier(&self, param: &str) -> CommandVerifier {
        let (program, args, write_linefeed): (&str, &[&str], bool) = match self {
            Profile::GpgKey => (
                GPG,
                &[
                    "--default-key",
                    "%1",
                    "--passphrase-fd",
                    "0",
                    "--pinentry-mode",
                    "loopback",
                    "--batch",
                    "--no-tty",
                    "--dry-run",
                    "--export-secret-keys",
                    "-o",
                    "/dev/null",
                ],
                true,
            ),
            Profile::Luks => (
                CRYPTSETUP,
                &[
                    "--test-passphrase",
                    "--key-file",
                    "/dev/fd/0",
                    "open",
                    "--type",
                    "luks",
                    "%1",
                ],
                false,
            ),
        };

        CommandVerifier::new(
            program,
            args.iter().map(|a| a.to_string()).collect(),
            write_linefeed,
        )
        .bind(param)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::GpgKey => "gpg-key",
            Profile::Luks => "luks",
        }
    }
}
