//! Short-lived private key files
//!
//! `ssh` only accepts identities from files, so keys held in the keyring or
//! pasted into a profile are written to owner-only temp files for the life of
//! a monitoring session.

use std::io::Write;
use std::path::Path;

use tempfile::{Builder, TempPath};
use zeroize::Zeroizing;

use crate::error::CredentialResult;

const FILE_PREFIX: &str = "hostpulse-key-";

/// Normalizes key text for OpenSSH.
///
/// CRLF and lone CR become LF and the result ends with exactly one newline.
#[must_use]
pub fn normalize_key(raw: &[u8]) -> Zeroizing<Vec<u8>> {
    let mut out = Zeroizing::new(Vec::with_capacity(raw.len() + 1));
    let mut bytes = raw.iter().copied().peekable();
    while let Some(b) = bytes.next() {
        if b == b'\r' {
            if bytes.peek() == Some(&b'\n') {
                bytes.next();
            }
            out.push(b'\n');
        } else {
            out.push(b);
        }
    }
    while out.last() == Some(&b'\n') {
        out.pop();
    }
    out.push(b'\n');
    out
}

/// A key file removed on [`close`](Self::close) or drop
#[derive(Debug)]
pub struct EphemeralKeyFile {
    path: TempPath,
}

impl EphemeralKeyFile {
    /// Writes `key` to a new owner-only file in `dir`
    ///
    /// # Errors
    /// Returns an error if the file cannot be created, restricted or written.
    /// Nothing is left on disk in that case.
    pub fn write(dir: &Path, key: &[u8]) -> CredentialResult<Self> {
        let content = normalize_key(key);

        let mut file = Builder::new()
            .prefix(FILE_PREFIX)
            .suffix(".key")
            .tempfile_in(dir)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(&content)?;
        file.as_file().sync_all()?;
        let path = file.into_temp_path();

        #[cfg(windows)]
        restrict_to_current_user(&path)?;

        Ok(Self { path })
    }

    /// Location of the key file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the file now
    ///
    /// # Errors
    /// Returns the I/O error if removal fails.
    pub fn close(self) -> std::io::Result<()> {
        self.path.close()
    }
}

#[cfg(windows)]
fn restrict_to_current_user(path: &Path) -> std::io::Result<()> {
    let user = std::env::var("USERNAME").unwrap_or_default();
    let status = std::process::Command::new("icacls")
        .arg(path)
        .args(["/inheritance:r", "/grant:r", &format!("{user}:(R,W)")])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other(format!(
            "icacls exited with {status}"
        )))
    }
}
