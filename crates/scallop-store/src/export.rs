//! Local `.scl` file export/import.
//!
//! The exported file carries the program source text only; relation tables
//! live in the stored project record, not in the `.scl` file.

use std::fs;
use std::path::Path;

use crate::error::StoreError;

/// Write the program source to `path`, which must end in `.scl`.
pub fn export_program(program: &str, path: &Path) -> Result<(), StoreError> {
    require_scl(path)?;
    fs::write(path, program)?;
    tracing::debug!(path = %path.display(), bytes = program.len(), "exported program");
    Ok(())
}

/// Read a `.scl` file back into a program string.
pub fn import_program(path: &Path) -> Result<String, StoreError> {
    require_scl(path)?;
    Ok(fs::read_to_string(path)?)
}

fn require_scl(path: &Path) -> Result<(), StoreError> {
    if path.extension().map_or(false, |ext| ext == "scl") {
        Ok(())
    } else {
        Err(StoreError::NotSclFile {
            path: path.to_path_buf(),
        })
    }
}
