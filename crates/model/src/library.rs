//! Library navigator rows
//!
//! A library is a directory tree of list and character files. Directories are
//! containers; files are leaves. Rows are built by scanning and never
//! persisted, so identities are fresh on every scan.

use std::path::{Path, PathBuf};

use charsheet_core::{CellData, ColumnHeader, ColumnMapper, ColumnSet, Entity, EntityId, ItemVariant, ViewContext};
use serde::{Deserialize, Serialize};

use crate::common::new_id;
use crate::provider::{Kind, ListProvider};

/// What a document file holds, named by its `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Traits,
    TraitModifiers,
    Skills,
    Spells,
    Equipment,
    Notes,
    Character,
}

impl ListKind {
    pub const ALL: &'static [ListKind] = &[
        ListKind::Traits,
        ListKind::TraitModifiers,
        ListKind::Skills,
        ListKind::Spells,
        ListKind::Equipment,
        ListKind::Notes,
        ListKind::Character,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            ListKind::Traits => "adq",
            ListKind::TraitModifiers => "adm",
            ListKind::Skills => "skl",
            ListKind::Spells => "spl",
            ListKind::Equipment => "eqp",
            ListKind::Notes => "not",
            ListKind::Character => "gcs",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.extension().eq_ignore_ascii_case(ext))
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn title(self) -> &'static str {
        match self {
            ListKind::Traits => "Traits",
            ListKind::TraitModifiers => "Trait Modifiers",
            ListKind::Skills => "Skills",
            ListKind::Spells => "Spells",
            ListKind::Equipment => "Equipment",
            ListKind::Notes => "Notes",
            ListKind::Character => "Character Sheet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File(ListKind),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LibraryEntry {
    pub id: EntityId,
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
    pub open: bool,
    pub children: Vec<LibraryEntry>,
}

impl LibraryEntry {
    pub fn directory(path: &Path, children: Vec<LibraryEntry>) -> Self {
        Self {
            id: new_id(),
            name: display_name(path, path.file_name()),
            path: path.to_path_buf(),
            kind: EntryKind::Directory,
            open: false,
            children,
        }
    }

    pub fn file(path: &Path, kind: ListKind) -> Self {
        Self {
            id: new_id(),
            name: display_name(path, path.file_stem()),
            path: path.to_path_buf(),
            kind: EntryKind::File(kind),
            open: false,
            children: Vec::new(),
        }
    }

    pub fn list_kind(&self) -> Option<ListKind> {
        match self.kind {
            EntryKind::File(kind) => Some(kind),
            EntryKind::Directory => None,
        }
    }

    /// Number of files at or under this entry
    pub fn file_count(&self) -> usize {
        match self.kind {
            EntryKind::File(_) => 1,
            EntryKind::Directory => self.children.iter().map(LibraryEntry::file_count).sum(),
        }
    }
}

fn display_name(path: &Path, name: Option<&std::ffi::OsStr>) -> String {
    name.map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LibraryColumn {
    Name,
}

impl ColumnSet for LibraryColumn {
    const ALL: &'static [Self] = &[LibraryColumn::Name];
    const DESCRIPTION: Self = LibraryColumn::Name;

    fn header(self, _ctx: ViewContext) -> ColumnHeader {
        ColumnHeader::new("Library", "Library files and folders")
    }
}

const LIBRARY_VIEW: &[LibraryColumn] = &[LibraryColumn::Name];

pub static LIBRARY_COLUMNS: ColumnMapper<LibraryColumn> = ColumnMapper::new(LIBRARY_VIEW, LIBRARY_VIEW);

impl Entity for LibraryEntry {
    type Column = LibraryColumn;

    fn id(&self) -> EntityId {
        self.id
    }

    fn is_container(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    fn cell_data(&self, _column: LibraryColumn) -> CellData {
        let cell = CellData::text(&self.name).with_tooltip(self.path.display().to_string());
        match self.kind {
            EntryKind::File(kind) => cell.with_secondary(kind.title()),
            EntryKind::Directory => cell,
        }
    }
}

impl Kind for LibraryEntry {
    fn mapper() -> &'static ColumnMapper<LibraryColumn> {
        &LIBRARY_COLUMNS
    }

    fn variants() -> &'static [ItemVariant] {
        &[]
    }

    fn variant_label(_variant: ItemVariant) -> &'static str {
        ""
    }

    fn new_item(_variant: ItemVariant) -> Option<Self> {
        None
    }
}

pub type LibraryProvider = ListProvider<LibraryEntry>;
