use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("command execution failed: {0}")]
    Command(#[from] io::Error),

    #[error("gpg exited with status {status}: {stderr}")]
    Gpg { status: i32, stderr: String },

    #[error("invalid key ID '{keyid}': {reason}")]
    InvalidKeyId { keyid: String, reason: String },

    #[error("failed to read key list '{}': {source}", path.display())]
    ListFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("backup of '{}' failed: {reason}", path.display())]
    Backup { path: PathBuf, reason: String },

    #[error("keyring not initialized")]
    KeyringNotInitialized,

    #[error("permission denied")]
    PermissionDenied,
}

pub type Result<T> = std::result::Result<T, Error>;
