//! CLI exit codes
//!
//! Scripts rely on these; never renumber an existing code.
//!
//! | Code | Meaning                                         |
//! |------|-------------------------------------------------|
//! | 0    | Success                                         |
//! | 1    | General error                                   |
//! | 2    | Usage error (bad arguments, unknown action)     |
//! | 3    | File could not be read or written               |
//! | 4    | File is not valid for its kind                  |
//! | 5    | Page reference names a book with no PDF mapped  |
//! | 6    | Search found nothing                            |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unknown action or key chord.
pub const EXIT_USAGE: u8 = 2;

/// I/O error - missing file, permission denied, unwritable settings.
pub const EXIT_IO: u8 = 3;

/// Parse error - malformed document or settings file, wrong document kind,
/// unsupported format version.
pub const EXIT_PARSE: u8 = 4;

/// `ref resolve` hit a book code with no mapping.
pub const EXIT_MISSING_BOOK: u8 = 5;

/// `find` matched no rows. Like grep(1), not an error message.
pub const EXIT_NO_MATCHES: u8 = 6;
