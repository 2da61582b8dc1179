//! Atomic file output shared by both codecs.

use std::fs::File;
use std::path::Path;

/// Write `path` through a temporary file in the same directory.
///
/// The target only appears, or is replaced, once `write` succeeded and the
/// data is synced. On any error the temporary file is removed and the target
/// is left untouched.
pub(crate) fn write_atomically<E, F>(path: &Path, write: F) -> Result<(), E>
where
    E: From<std::io::Error>,
    F: FnOnce(&mut File) -> Result<(), E>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    write(tmp.as_file_mut())?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}
