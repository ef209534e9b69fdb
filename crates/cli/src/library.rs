// library and recent: browsing for files

use std::io;
use std::path::Path;

use charsheet_config::{settings, SettingsContext};
use charsheet_core::Table;
use charsheet_io::scan_library;
use charsheet_model::{LibraryEntry, LibraryProvider};

use crate::render::{write_table, TextRenderer};
use crate::{ensure_loaded, CliError};

pub fn cmd_library(dir: &Path) -> Result<(), CliError> {
    let rows = scan_library(dir)?;
    let files: usize = rows.iter().map(LibraryEntry::file_count).sum();

    let mut table: Table<LibraryProvider, String> = Table::new(LibraryProvider::list(rows));
    table.set_all_open(true);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_table(&mut table, &mut TextRenderer::default(), &mut out, &[], None)?;
    log::info!("{files} files under {}", dir.display());
    Ok(())
}

pub fn cmd_recent(ctx: &mut SettingsContext, clear: bool, prune: bool) -> Result<(), CliError> {
    if clear || prune {
        ensure_loaded(ctx, settings::FILE_NAME)?;
        if clear {
            ctx.general.recent_files.clear();
        } else {
            let removed = ctx.general.recent_files.remove_missing();
            log::info!("forgot {removed} missing files");
        }
        ctx.save()?;
        return Ok(());
    }
    for path in ctx.general.recent_files.paths() {
        println!("{}", path.display());
    }
    Ok(())
}
