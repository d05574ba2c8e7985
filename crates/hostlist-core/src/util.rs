//! Small helpers used around the codec: reading host files and formatting
//! byte counts for humans.

use std::fs;
use std::path::Path;

use crate::{HostlistError, Result};

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;

/// Read a whole file into a string.
///
/// The returned error keeps the offending path in its message.
pub fn read_file_into_string<P: AsRef<Path>>(path: P) -> Result<String> {
    let path_ref = path.as_ref();
    fs::read_to_string(path_ref).map_err(|err| {
        HostlistError::Io(std::io::Error::new(
            err.kind(),
            format!("failed to read '{}': {}", path_ref.display(), err),
        ))
    })
}

/// Format a byte count with a single binary unit suffix, rounding down.
///
/// ```rust
/// use hostlist_core::readable_memory;
///
/// assert_eq!(readable_memory(512), "512B");
/// assert_eq!(readable_memory(3 * 1024 * 1024 + 1), "3M");
/// ```
pub fn readable_memory(bytes: u64) -> String {
    match bytes {
        b if b < KIB => format!("{}B", b),
        b if b < MIB => format!("{}K", b / KIB),
        b if b < GIB => format!("{}M", b / MIB),
        b => format!("{}G", b / GIB),
    }
}
