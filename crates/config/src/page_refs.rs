//! Page references
//!
//! A page reference is a book code followed by a page number (`B22`,
//! `MA105`). `page_refs.json` maps each book code to the PDF that holds it,
//! plus an offset for books whose printed page numbers don't match the PDF's
//! page order:
//! ```json
//! { "B": { "offset": -1, "path": "/books/Basic Set.pdf" } }
//! ```
//! There are no built-in entries; every key is a user key.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::overridable::{KeyPolicy, OverridableSet};

pub const FILE_NAME: &str = "page_refs.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    #[serde(default)]
    pub offset: i32,
    pub path: PathBuf,
}

pub type PageRefs = OverridableSet<PageRef>;

/// No built-in entries
pub fn factory() -> Arc<BTreeMap<String, PageRef>> {
    Arc::new(BTreeMap::new())
}

pub fn empty_page_refs() -> PageRefs {
    OverridableSet::shared(factory(), KeyPolicy::Open)
}

/// One parsed reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReference {
    pub book: String,
    pub page: u32,
}

/// Split `B22` into book code and printed page number. The book code is
/// everything before the trailing digit run.
pub fn parse_reference(text: &str) -> Option<PageReference> {
    let text = text.trim();
    let digits_start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    let book = text[..digits_start].trim();
    if book.is_empty() {
        return None;
    }
    let page = text[digits_start..].parse().ok()?;
    Some(PageReference {
        book: book.to_string(),
        page,
    })
}

/// Every reference in a cell's comma-separated list, skipping junk entries
pub fn parse_references(text: &str) -> Vec<PageReference> {
    text.split(',').filter_map(parse_reference).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Zero-based page index into the book's PDF
    Page { path: PathBuf, page: u32 },
    /// Book code has no mapping yet; the caller should ask for a file
    MissingBook(String),
    /// Text is not a page reference
    Invalid(String),
}

/// Zero-based PDF page for a printed page: `page + offset - 1`, never
/// below the first page
pub fn pdf_page(page: u32, offset: i32) -> u32 {
    let index = i64::from(page) + i64::from(offset) - 1;
    index.clamp(0, i64::from(u32::MAX)) as u32
}

pub fn resolve(refs: &PageRefs, reference: &str) -> Resolution {
    let Some(parsed) = parse_reference(reference) else {
        return Resolution::Invalid(reference.trim().to_string());
    };
    match refs.get(&parsed.book) {
        Some(mapping) => Resolution::Page {
            path: mapping.path.clone(),
            page: pdf_page(parsed.page, mapping.offset),
        },
        None => Resolution::MissingBook(parsed.book),
    }
}

/// Resolve the first usable reference in a comma-separated cell
pub fn resolve_first(refs: &PageRefs, cell: &str) -> Resolution {
    let mut parts = cell.split(',').map(str::trim).filter(|p| !p.is_empty()).peekable();
    let Some(first) = parts.peek().copied() else {
        return Resolution::Invalid(String::new());
    };
    for part in parts {
        if let resolved @ Resolution::Page { .. } = resolve(refs, part) {
            return resolved;
        }
    }
    resolve(refs, first)
}

/// Remember which file holds `book`
pub fn set_book(refs: &mut PageRefs, book: &str, path: &Path, offset: i32) {
    // Open set: `set` cannot fail
    let _ = refs.set(
        book,
        PageRef {
            offset,
            path: path.to_path_buf(),
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_set_with_negative_offset() {
        let mut refs = empty_page_refs();
        set_book(&mut refs, "B", Path::new("/books/basic.pdf"), -1);
        assert_eq!(
            resolve(&refs, "B22"),
            Resolution::Page {
                path: PathBuf::from("/books/basic.pdf"),
                page: 20
            }
        );
    }

    #[test]
    fn test_parse_reference() {
        assert_eq!(
            parse_reference(" MA105 "),
            Some(PageReference {
                book: "MA".to_string(),
                page: 105
            })
        );
        assert_eq!(parse_reference("B"), None);
        assert_eq!(parse_reference("22"), None);
        assert_eq!(parse_reference(""), None);
        assert_eq!(parse_reference("B2x").map(|r| r.page), None);
    }

    #[test]
    fn test_parse_reference_list() {
        let refs = parse_references("B22, MA105,,junk");
        let books: Vec<_> = refs.iter().map(|r| r.book.as_str()).collect();
        assert_eq!(books, ["B", "MA"]);
    }

    #[test]
    fn test_page_clamped_at_zero() {
        assert_eq!(pdf_page(1, 0), 0);
        assert_eq!(pdf_page(3, -10), 0);
        assert_eq!(pdf_page(10, 4), 13);
    }

    #[test]
    fn test_missing_book() {
        let refs = empty_page_refs();
        assert_eq!(resolve(&refs, "DF12"), Resolution::MissingBook("DF".to_string()));
        assert_eq!(resolve(&refs, "12"), Resolution::Invalid("12".to_string()));
    }

    #[test]
    fn test_resolve_first_prefers_mapped_book() {
        let mut refs = empty_page_refs();
        set_book(&mut refs, "MA", Path::new("ma.pdf"), 0);
        assert_eq!(
            resolve_first(&refs, "B22, MA105"),
            Resolution::Page {
                path: PathBuf::from("ma.pdf"),
                page: 104
            }
        );
        assert_eq!(resolve_first(&refs, "B22, X1"), Resolution::MissingBook("B".to_string()));
        assert_eq!(resolve_first(&refs, " "), Resolution::Invalid(String::new()));
    }

    #[test]
    fn test_user_keys_always_saved() {
        let mut refs = empty_page_refs();
        set_book(&mut refs, "B", Path::new("b.pdf"), 0);
        let json: serde_json::Value = serde_json::from_str(&refs.to_json().unwrap()).unwrap();
        assert_eq!(json["B"]["offset"], 0);
        assert_eq!(json["B"]["path"], "b.pdf");
    }
}
