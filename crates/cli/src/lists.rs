// show, find, new, add: list and character files

use std::io::{self, Write};
use std::path::Path;

use charsheet_config::SettingsContext;
use charsheet_core::{Finder, ItemVariant, Table, TableProvider, ViewContext};
use charsheet_io::{load_character, load_list, peek_kind, save_character, save_list, Character, ListEntity};
use charsheet_model::common::format_number;
use charsheet_model::{Equipment, Kind, ListKind, ListProvider, Note, Skill, Spell, Trait, TraitModifier};

use crate::exit_codes::EXIT_NO_MATCHES;
use crate::render::{write_table, TextRenderer};
use crate::CliError;

/// Run a generic function for the entity type a list kind holds. Character
/// files are handled by `$character`.
macro_rules! by_kind {
    ($kind:expr, $character:expr, $func:ident($($arg:expr),*)) => {
        match $kind {
            ListKind::Traits => $func::<Trait>($($arg),*),
            ListKind::TraitModifiers => $func::<TraitModifier>($($arg),*),
            ListKind::Skills => $func::<Skill>($($arg),*),
            ListKind::Spells => $func::<Spell>($($arg),*),
            ListKind::Equipment => $func::<Equipment>($($arg),*),
            ListKind::Notes => $func::<Note>($($arg),*),
            ListKind::Character => $character,
        }
    };
}

/// Sections of a character file, in sheet order. Stored equipment has no
/// equipped toggle, so it uses the list columns.
fn sections(character: Character) -> [(&'static str, ViewContext, Section); 6] {
    use ViewContext::{List, Sheet};
    [
        ("Traits", Sheet, Section::Traits(character.traits)),
        ("Skills", Sheet, Section::Skills(character.skills)),
        ("Spells", Sheet, Section::Spells(character.spells)),
        ("Equipment", Sheet, Section::Equipment(character.equipment)),
        ("Other Equipment", List, Section::Equipment(character.other_equipment)),
        ("Notes", Sheet, Section::Notes(character.notes)),
    ]
}

enum Section {
    Traits(Vec<Trait>),
    Skills(Vec<Skill>),
    Spells(Vec<Spell>),
    Equipment(Vec<Equipment>),
    Notes(Vec<Note>),
}

impl Section {
    fn is_empty(&self) -> bool {
        match self {
            Section::Traits(rows) => rows.is_empty(),
            Section::Skills(rows) => rows.is_empty(),
            Section::Spells(rows) => rows.is_empty(),
            Section::Equipment(rows) => rows.is_empty(),
            Section::Notes(rows) => rows.is_empty(),
        }
    }
}

fn sheet_table<E: Kind>(rows: Vec<E>, context: ViewContext) -> Table<ListProvider<E>, String> {
    Table::new(ListProvider::new(rows, context))
}

// ============================================================================
// show
// ============================================================================

pub fn cmd_show(ctx: &mut SettingsContext, path: &Path, sheet: bool, open: bool) -> Result<(), CliError> {
    let kind = peek_kind(path)?;
    let context = if sheet { ViewContext::Sheet } else { ViewContext::List };
    let stdout = io::stdout();
    let mut out = stdout.lock();

    by_kind!(
        kind,
        show_character(path, open, &mut out),
        show_file(path, context, open, &mut out)
    )?;

    ctx.general.note_opened(path);
    if let Err(e) = ctx.save() {
        log::warn!("unable to remember recent file: {e}");
    }
    Ok(())
}

fn show_file<E: ListEntity>(path: &Path, context: ViewContext, open: bool, out: &mut dyn Write) -> Result<(), CliError> {
    show_rows(load_list::<E>(path)?, context, open, out)
}

fn show_rows<E: Kind>(rows: Vec<E>, context: ViewContext, open: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let mut table = sheet_table(rows, context);
    if open {
        table.set_all_open(true);
    }
    write_table(&mut table, &mut TextRenderer::default(), out, &[], None)?;
    Ok(())
}

fn show_character(path: &Path, open: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let character = load_character(path)?;
    let (value, weight) = character.carried_totals();
    writeln!(out, "{}", display_name(&character))?;

    for (title, context, section) in sections(character) {
        if section.is_empty() {
            continue;
        }
        writeln!(out, "\n{title}")?;
        match section {
            Section::Traits(rows) => show_rows(rows, context, open, out)?,
            Section::Skills(rows) => show_rows(rows, context, open, out)?,
            Section::Spells(rows) => show_rows(rows, context, open, out)?,
            Section::Equipment(rows) => show_rows(rows, context, open, out)?,
            Section::Notes(rows) => show_rows(rows, context, open, out)?,
        }
    }

    writeln!(out, "\nCarried: ${} / {} lb", format_number(value), format_number(weight))?;
    Ok(())
}

fn display_name(character: &Character) -> &str {
    if character.name.is_empty() {
        "(unnamed)"
    } else {
        &character.name
    }
}

// ============================================================================
// find
// ============================================================================

pub fn cmd_find(path: &Path, query: &str, next: usize, previous: usize) -> Result<(), CliError> {
    if query.trim().is_empty() {
        return Err(CliError::args("empty search"));
    }
    let kind = peek_kind(path)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let steps = (next, previous);

    let found = by_kind!(
        kind,
        find_character(path, query, steps, &mut out),
        find_file(path, query, steps, &mut out)
    )?;

    if found == 0 {
        return Err(CliError::silent(EXIT_NO_MATCHES));
    }
    Ok(())
}

fn find_file<E: ListEntity>(path: &Path, query: &str, steps: (usize, usize), out: &mut dyn Write) -> Result<usize, CliError> {
    find_rows(load_list::<E>(path)?, ViewContext::List, query, steps, None, out)
}

fn find_character(path: &Path, query: &str, steps: (usize, usize), out: &mut dyn Write) -> Result<usize, CliError> {
    let mut found = 0;
    for (title, context, section) in sections(load_character(path)?) {
        if section.is_empty() {
            continue;
        }
        let title = Some(title);
        found += match section {
            Section::Traits(rows) => find_rows(rows, context, query, steps, title, out)?,
            Section::Skills(rows) => find_rows(rows, context, query, steps, title, out)?,
            Section::Spells(rows) => find_rows(rows, context, query, steps, title, out)?,
            Section::Equipment(rows) => find_rows(rows, context, query, steps, title, out)?,
            Section::Notes(rows) => find_rows(rows, context, query, steps, title, out)?,
        };
    }
    Ok(found)
}

/// Print the match counter, then the table with matches marked and their
/// ancestors opened. Returns the match count.
fn find_rows<E: Kind>(
    rows: Vec<E>,
    context: ViewContext,
    query: &str,
    (next, previous): (usize, usize),
    title: Option<&str>,
    out: &mut dyn Write,
) -> Result<usize, CliError> {
    let mut table = sheet_table(rows, context);
    let mut finder = Finder::new();
    finder.set_query(&mut table, query);
    for _ in 0..next {
        if !finder.next_match(&mut table) {
            break;
        }
    }
    for _ in 0..previous {
        if !finder.previous_match(&mut table) {
            break;
        }
    }

    match title {
        Some(title) => writeln!(out, "{title}: {}", finder.match_counter())?,
        None => writeln!(out, "{}", finder.match_counter())?,
    }
    let matches = finder.results().to_vec();
    if !matches.is_empty() {
        write_table(&mut table, &mut TextRenderer::default(), out, &matches, finder.current())?;
    }
    Ok(matches.len())
}

// ============================================================================
// new / add
// ============================================================================

pub fn cmd_new(path: &Path, name: &str) -> Result<(), CliError> {
    let kind = ListKind::from_path(path).ok_or_else(|| {
        CliError::args(format!("unknown file type: {}", path.display()))
            .with_hint("use one of .adq .adm .skl .spl .eqp .not .gcs")
    })?;
    if path.exists() {
        return Err(CliError::args(format!("{} already exists", path.display())));
    }
    by_kind!(
        kind,
        save_character(path, &Character::new(name)).map_err(CliError::from),
        new_file(path)
    )?;
    println!("created {} ({})", path.display(), kind.title());
    Ok(())
}

fn new_file<E: ListEntity>(path: &Path) -> Result<(), CliError> {
    save_list::<E>(path, &[])?;
    Ok(())
}

pub fn cmd_add(path: &Path, variant: ItemVariant, into: Option<usize>) -> Result<(), CliError> {
    let kind = peek_kind(path)?;
    let label = by_kind!(
        kind,
        Err(CliError::args("rows can only be added to list files")
            .with_hint("character files are edited section by section in the app")),
        add_to_file(path, variant, into)
    )?;
    println!("added {label} to {}", path.display());
    Ok(())
}

/// Returns the label of the created variant
fn add_to_file<E: ListEntity>(path: &Path, variant: ItemVariant, into: Option<usize>) -> Result<&'static str, CliError> {
    let mut table: Table<ListProvider<E>, String> = Table::new(ListProvider::list(load_list::<E>(path)?));
    let label = table.provider().variant_label(variant);

    let parent = match into {
        Some(row) => {
            let id = row
                .checked_sub(1)
                .and_then(|i| table.roots().get(i).copied())
                .ok_or_else(|| CliError::args(format!("no top-level row {row}")))?;
            Some(id)
        }
        None => None,
    };
    table.create(variant, parent)?;

    save_list(path, table.provider().rows())?;
    Ok(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn equipment() -> Vec<Equipment> {
        vec![
            Equipment::container(
                "Backpack",
                60.0,
                3.0,
                vec![Equipment::container("Pouch", 10.0, 0.2, vec![Equipment::new("Short Sword", 400.0, 2.0)])],
            ),
            Equipment::new("Broadsword", 500.0, 3.0),
        ]
    }

    #[test]
    fn test_find_reveals_nested_match() {
        let mut out = Vec::new();
        let found = find_rows(equipment(), ViewContext::List, "SWORD", (0, 0), None, &mut out).unwrap();
        assert_eq!(found, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "1/2");
        // Ancestors of the first match were opened
        assert!(lines.iter().any(|l| l.starts_with("> ") && l.contains("Short Sword")));
        assert!(lines.iter().any(|l| l.starts_with("* ") && l.contains("Broadsword")));
        assert!(lines.iter().any(|l| l.contains("- Pouch")));
    }

    #[test]
    fn test_find_navigation_clamps() {
        let mut out = Vec::new();
        find_rows(equipment(), ViewContext::List, "sword", (5, 0), None, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("2/2\n"));

        let mut out = Vec::new();
        find_rows(equipment(), ViewContext::List, "sword", (1, 3), None, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("1/2\n"));
    }

    #[test]
    fn test_find_nothing() {
        let mut out = Vec::new();
        let found = find_rows(equipment(), ViewContext::List, "axe", (0, 0), Some("Equipment"), &mut out).unwrap();
        assert_eq!(found, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "Equipment: -\n");
    }

    #[test]
    fn test_add_alternate_and_into_container() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Skills.skl");
        save_list(&path, &[Skill::container("Combat", Vec::new())]).unwrap();

        assert_eq!(add_to_file::<Skill>(&path, ItemVariant::Alternate, Some(1)).unwrap(), "New Technique");
        let rows: Vec<Skill> = load_list(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].children[0].is_technique());

        assert!(add_to_file::<Skill>(&path, ItemVariant::Item, Some(2)).is_err());
    }

    #[test]
    fn test_add_rejects_unsupported_variant() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Notes.not");
        save_list::<Note>(&path, &[]).unwrap();
        let err = add_to_file::<Note>(&path, ItemVariant::Alternate, None).unwrap_err();
        assert_eq!(err.code, crate::exit_codes::EXIT_USAGE);
    }
}
