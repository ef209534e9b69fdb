// Document and library file I/O

pub mod character;
pub mod error;
pub mod library;
pub mod list;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

pub use character::{load_character, save_character, Character};
pub use error::DocumentError;
pub use library::scan_library;
pub use list::{load_list, peek_kind, reload_table, save_list, ListEntity};

/// Document format version
/// Increment when the schema changes in a way old versions can't read
pub const FORMAT_VERSION: u32 = 1;

/// Pretty-print `value` to a sibling temp file, then rename it over `path`
pub(crate) fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), DocumentError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    let file = File::create(tmp).map_err(|e| DocumentError::io(tmp, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| DocumentError::Encode(e.to_string()))?;
    writer.flush().map_err(|e| DocumentError::io(tmp, e))?;
    drop(writer);

    fs::rename(tmp, path).map_err(|e| DocumentError::io(path, e))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}
