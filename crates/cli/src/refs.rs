// ref: page reference resolution and book mappings

use std::path::Path;

use charsheet_config::page_refs::{self, Resolution};
use charsheet_config::SettingsContext;

use crate::exit_codes::EXIT_MISSING_BOOK;
use crate::{ensure_loaded, CliError};

/// Prints `<pdf>\t<zero-based page>`
pub fn cmd_resolve(ctx: &SettingsContext, reference: &str) -> Result<(), CliError> {
    match page_refs::resolve_first(&ctx.page_refs, reference) {
        Resolution::Page { path, page } => {
            println!("{}\t{}", path.display(), page);
            Ok(())
        }
        Resolution::MissingBook(book) => Err(CliError::new(
            EXIT_MISSING_BOOK,
            format!("no PDF set for book '{book}'"),
        )
        .with_hint(format!("csheet ref set {book} <PDF> [--offset N]"))),
        Resolution::Invalid(text) => Err(CliError::args(format!("'{text}' is not a page reference"))
            .with_hint("references are a book code and page, e.g. B22 or MA105")),
    }
}

pub fn cmd_set(ctx: &mut SettingsContext, book: &str, pdf: &Path, offset: i32) -> Result<(), CliError> {
    let book = book.trim();
    if book.is_empty() || book.chars().any(|c| c.is_ascii_digit()) {
        return Err(CliError::args(format!("'{book}' is not a book code")));
    }
    ensure_loaded(ctx, page_refs::FILE_NAME)?;
    page_refs::set_book(&mut ctx.page_refs, book, pdf, offset);
    ctx.save()?;
    println!("{book} -> {} (offset {offset})", pdf.display());
    Ok(())
}

pub fn cmd_remove(ctx: &mut SettingsContext, book: &str) -> Result<(), CliError> {
    ensure_loaded(ctx, page_refs::FILE_NAME)?;
    if ctx.page_refs.remove(book).is_none() {
        return Err(CliError::args(format!("no mapping for book '{book}'")));
    }
    ctx.save()?;
    Ok(())
}

pub fn cmd_list(ctx: &SettingsContext) -> Result<(), CliError> {
    for (book, mapping) in ctx.page_refs.iter() {
        println!("{book}\t{:+}\t{}", mapping.offset, mapping.path.display());
    }
    Ok(())
}
