//! Zip extraction for downloaded release archives

use std::fs::{self, File};
use std::io::{self, Cursor};
use std::path::Path;

use crate::version::error::ExtractError;

/// Extract every entry of the zip archive in `data` below `dest`.
///
/// `dest` is created when missing. Entries whose path would leave `dest`
/// are rejected. Unix permission bits stored in the archive are restored.
pub fn unzip_to_dir(data: &[u8], dest: &Path) -> Result<(), ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    fs::create_dir_all(dest)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(ExtractError::UnsafePath(entry.name().to_string()));
        };
        let target = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&target)?;
        io::copy(&mut entry, &mut file)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&target, fs::Permissions::from_mode(mode))?;
            }
        }
    }

    Ok(())
}
