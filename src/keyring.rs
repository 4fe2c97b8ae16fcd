use std::path::PathBuf;

use tokio::process::Command;

use crate::error::{Error, Result};
use crate::keyid::validate_fingerprint;
use crate::parse::parse_keys;
use crate::types::KeyRecord;

/// Outcome of a single key deletion.
///
/// Deleting a public key that still has a secret key is refused by gpg;
/// the scan treats that as a skip and moves on to the next key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    SecretKeySkipped,
}

/// Interface to a GPG keyring.
///
/// Spawns `gpg` with an explicit homedir and `LC_ALL=C` so output stays
/// parseable regardless of locale. Enumeration is a sequential cursor:
/// the scan fetches, tests and (maybe) deletes one key before the next.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> keywarden::Result<()> {
/// use keywarden::Keyring;
///
/// let keyring = Keyring::new();
/// for key in keyring.list_keys().await? {
///     println!("{}", key.summary());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Keyring {
    gpg_homedir: PathBuf,
}

impl Default for Keyring {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyring {
    /// Opens the user's default keyring (`~/.gnupg`).
    #[must_use]
    pub fn new() -> Self {
        let homedir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".gnupg");
        Self {
            gpg_homedir: homedir,
        }
    }

    /// Opens a keyring in a custom GPG home directory.
    #[must_use]
    pub fn with_homedir(path: impl Into<PathBuf>) -> Self {
        Self {
            gpg_homedir: path.into(),
        }
    }

    pub fn homedir(&self) -> &PathBuf {
        &self.gpg_homedir
    }

    fn gpg_command(&self) -> Command {
        let mut cmd = Command::new("gpg");
        cmd.env("LC_ALL", "C")
            .arg(format!("--homedir={}", self.gpg_homedir.display()));
        cmd
    }

    /// Lists all public keys in the keyring.
    pub async fn list_keys(&self) -> Result<Vec<KeyRecord>> {
        let output = self
            .gpg_command()
            .args(["--list-keys", "--with-colons"])
            .output()
            .await?;

        if !output.status.success() {
            return Err(self.check_gpg_error(output.status, &output.stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_keys(&stdout)
    }

    /// Deletes a public key from the keyring.
    ///
    /// Keys with a matching secret key are refused by gpg and reported as
    /// [`DeleteOutcome::SecretKeySkipped`] so the caller can continue.
    pub async fn delete_key(&self, key: &KeyRecord) -> Result<DeleteOutcome> {
        let fingerprint = validate_fingerprint(&key.fingerprint)?;
        let output = self
            .gpg_command()
            .args(["--batch", "--yes", "--delete-keys", &fingerprint])
            .output()
            .await?;

        if output.status.success() {
            return Ok(DeleteOutcome::Deleted);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("secret key") {
            return Ok(DeleteOutcome::SecretKeySkipped);
        }
        Err(self.check_gpg_error(output.status, &output.stderr))
    }

    /// Reports the gpg engine version, e.g. `gpg (GnuPG) 2.4.5`.
    pub async fn engine_version(&self) -> Result<String> {
        let output = Command::new("gpg")
            .env("LC_ALL", "C")
            .arg("--version")
            .output()
            .await?;

        if !output.status.success() {
            return Err(self.check_gpg_error(output.status, &output.stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or_default().to_string())
    }

    fn check_gpg_error(&self, status: std::process::ExitStatus, stderr: &[u8]) -> Error {
        let msg = String::from_utf8_lossy(stderr);

        if msg.contains("Permission denied") || msg.contains("permission denied") {
            return Error::PermissionDenied;
        }

        let homedir = self.gpg_homedir.display().to_string();
        if msg.contains("No such file or directory") && msg.contains(&homedir) {
            return Error::KeyringNotInitialized;
        }

        Error::Gpg {
            status: status.code().unwrap_or(-1),
            stderr: msg.to_string(),
        }
    }
}
