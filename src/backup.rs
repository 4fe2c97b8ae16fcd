use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// The public ring files worth saving before a destructive scan.
const RING_FILES: [&str; 2] = ["pubring.gpg", "pubring.kbx"];

#[derive(Debug, Clone)]
pub struct BackupOptions {
    /// Directory the ring files are copied into. A leading `~` expands to
    /// the home directory.
    pub destination: PathBuf,
    /// Create directories and overwrite files without asking.
    pub assume_yes: bool,
}

/// Copies the public ring files out of the GPG home directory.
///
/// The destination directory is created after confirmation if it does not
/// exist; existing files are only overwritten after confirmation. The
/// library never prompts itself; `confirm` is supplied by the caller and
/// consulted unless `assume_yes` is set. Returns the paths written.
pub async fn backup_keyring<F>(
    gpg_homedir: &Path,
    options: &BackupOptions,
    confirm: F,
) -> Result<Vec<PathBuf>>
where
    F: Fn(&str) -> bool,
{
    let destination = expand_home(&options.destination);

    match tokio::fs::metadata(&destination).await {
        Ok(meta) if !meta.is_dir() => {
            return Err(Error::Backup {
                path: destination,
                reason: "destination is not a directory".to_string(),
            });
        }
        Ok(_) => {}
        Err(_) => {
            if !options.assume_yes && !confirm("Directory does not exist. Create?") {
                return Err(Error::Backup {
                    path: destination,
                    reason: "cancelled by user".to_string(),
                });
            }
            tokio::fs::create_dir_all(&destination)
                .await
                .map_err(|e| Error::Backup {
                    path: destination.clone(),
                    reason: format!("cannot create directory: {e}"),
                })?;
        }
    }

    let mut copied = Vec::new();
    for filename in RING_FILES {
        let source = gpg_homedir.join(filename);
        let target = destination.join(filename);

        if tokio::fs::metadata(&source).await.is_err() {
            return Err(Error::Backup {
                path: source,
                reason: "failed to open file".to_string(),
            });
        }

        if tokio::fs::metadata(&target).await.is_ok()
            && !options.assume_yes
            && !confirm(&format!(
                "File {} already exists, overwrite?",
                target.display()
            ))
        {
            return Err(Error::Backup {
                path: target,
                reason: "cancelled by user".to_string(),
            });
        }

        tokio::fs::copy(&source, &target)
            .await
            .map_err(|e| Error::Backup {
                path: source.clone(),
                reason: format!("copy failed: {e}"),
            })?;
        debug!(source = %source.display(), target = %target.display(), "copied ring file");
        copied.push(target);
    }

    Ok(copied)
}

fn expand_home(path: &Path) -> PathBuf {
    let Some(home) = dirs::home_dir() else {
        return path.to_path_buf();
    };
    if path == Path::new("~") {
        return home;
    }
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
