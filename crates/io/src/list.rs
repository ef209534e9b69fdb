// List files: one entity collection per file
//
// {"version": 1, "type": "skills", "rows": [...]}

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use charsheet_core::{Table, TableProvider};
use charsheet_model::{Equipment, Kind, ListKind, Note, Skill, Spell, Trait, TraitModifier};

use crate::error::DocumentError;
use crate::FORMAT_VERSION;

/// Entity kinds that have a list file of their own
pub trait ListEntity: Kind + Serialize + DeserializeOwned {
    const LIST_KIND: ListKind;
}

impl ListEntity for Trait {
    const LIST_KIND: ListKind = ListKind::Traits;
}

impl ListEntity for TraitModifier {
    const LIST_KIND: ListKind = ListKind::TraitModifiers;
}

impl ListEntity for Skill {
    const LIST_KIND: ListKind = ListKind::Skills;
}

impl ListEntity for Spell {
    const LIST_KIND: ListKind = ListKind::Spells;
}

impl ListEntity for Equipment {
    const LIST_KIND: ListKind = ListKind::Equipment;
}

impl ListEntity for Note {
    const LIST_KIND: ListKind = ListKind::Notes;
}

/// Leading fields every document shares
#[derive(Debug, Deserialize)]
struct Header {
    version: u32,
    #[serde(rename = "type")]
    kind: ListKind,
}

#[derive(Serialize)]
struct ListFileOut<'a, E> {
    version: u32,
    #[serde(rename = "type")]
    kind: ListKind,
    rows: &'a [E],
}

#[derive(Deserialize)]
struct ListFileIn<E> {
    rows: Vec<E>,
}

pub(crate) fn read_text(path: &Path) -> Result<String, DocumentError> {
    fs::read_to_string(path).map_err(|e| DocumentError::io(path, e))
}

pub(crate) fn parse_err(path: &Path, err: serde_json::Error) -> DocumentError {
    DocumentError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

pub(crate) fn check_header(path: &Path, text: &str) -> Result<ListKind, DocumentError> {
    let header: Header = serde_json::from_str(text).map_err(|e| parse_err(path, e))?;
    if header.version == 0 || header.version > FORMAT_VERSION {
        return Err(DocumentError::UnsupportedVersion {
            path: path.to_path_buf(),
            version: header.version,
        });
    }
    Ok(header.kind)
}

/// Which list a document holds, without decoding its rows
pub fn peek_kind(path: &Path) -> Result<ListKind, DocumentError> {
    let text = read_text(path)?;
    check_header(path, &text)
}

/// Load the rows of a list file. The file must hold `E`'s kind.
pub fn load_list<E: ListEntity>(path: &Path) -> Result<Vec<E>, DocumentError> {
    let text = read_text(path)?;
    let found = check_header(path, &text)?;
    if found != E::LIST_KIND {
        return Err(DocumentError::WrongKind {
            path: path.to_path_buf(),
            expected: E::LIST_KIND,
            found,
        });
    }
    let file: ListFileIn<E> = serde_json::from_str(&text).map_err(|e| parse_err(path, e))?;
    log::debug!("loaded {} {} rows from {}", file.rows.len(), found.title(), path.display());
    Ok(file.rows)
}

pub fn save_list<E: ListEntity>(path: &Path, rows: &[E]) -> Result<(), DocumentError> {
    let file = ListFileOut {
        version: FORMAT_VERSION,
        kind: E::LIST_KIND,
        rows,
    };
    crate::write_atomic(path, &file)
}

/// Reload a table's rows from `path`. On error the table keeps what it had.
pub fn reload_table<E, Pr, P>(table: &mut Table<Pr, P>, path: &Path) -> Result<usize, DocumentError>
where
    E: ListEntity,
    Pr: TableProvider<Entity = E>,
{
    let rows = load_list::<E>(path)?;
    let count = rows.len();
    table.replace_rows(rows);
    Ok(count)
}
