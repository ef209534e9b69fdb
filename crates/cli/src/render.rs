// Plain-text table output
//
// Cells go through the table's panel cache like they would in a window; the
// "panel" here is the padded cell text.

use std::io::{self, Write};

use charsheet_core::{Alignment, CellData, CellKind, CellRenderer, HeaderIcon, NodeId, Table, TableProvider};

/// Widest a column may get before its cells are cut
pub const MAX_COLUMN_WIDTH: usize = 40;

const INDENT: usize = 2;

/// Turns cell data into fixed-width text
#[derive(Debug, Default)]
pub struct TextRenderer {
    /// Panels built so far; cache hits don't count
    pub rendered: usize,
}

impl CellRenderer for TextRenderer {
    type Panel = String;

    fn render(&mut self, data: &CellData, width: f32) -> String {
        self.rendered += 1;
        fit(&cell_text(data), width as usize, data.alignment)
    }
}

/// Unpadded text for a cell
pub fn cell_text(data: &CellData) -> String {
    match data.kind {
        CellKind::Toggle => (if data.checked { "[x]" } else { "[ ]" }).to_string(),
        CellKind::PageRef => data.primary.clone(),
        CellKind::Text if data.secondary.is_empty() => data.primary.clone(),
        CellKind::Text => format!("{} ({})", data.primary, data.secondary),
    }
}

fn icon_title(icon: HeaderIcon) -> &'static str {
    match icon {
        HeaderIcon::PageRef => "Ref",
        HeaderIcon::Equipped => "E",
        HeaderIcon::Enabled => "On",
    }
}

/// Pad or cut `text` to exactly `width` characters
pub fn fit(text: &str, width: usize, alignment: Alignment) -> String {
    let len = text.chars().count();
    if len > width {
        if width == 0 {
            return String::new();
        }
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('~');
        return cut;
    }
    let gap = width - len;
    match alignment {
        Alignment::Start => format!("{text}{}", " ".repeat(gap)),
        Alignment::End => format!("{}{text}", " ".repeat(gap)),
        Alignment::Middle => {
            let left = gap / 2;
            format!("{}{text}{}", " ".repeat(left), " ".repeat(gap - left))
        }
    }
}

/// Disclosure marker and indent drawn before the hierarchy cell
fn row_prefix<Pr: TableProvider>(table: &Table<Pr, String>, id: NodeId) -> String {
    let marker = if !table.is_container(id) {
        "  "
    } else if table.is_open(id) {
        "- "
    } else {
        "+ "
    };
    format!("{}{marker}", " ".repeat(table.depth(id) * INDENT))
}

/// Print the header line and every visible row. Rows in `marked` get a `*`
/// gutter, `current` gets `>`.
pub fn write_table<Pr: TableProvider>(
    table: &mut Table<Pr, String>,
    renderer: &mut TextRenderer,
    out: &mut dyn Write,
    marked: &[NodeId],
    current: Option<NodeId>,
) -> io::Result<()> {
    let headers = table.headers();
    let hierarchy = table.hierarchy_column_index();
    let rows = table.visible_rows().to_vec();

    let mut widths: Vec<usize> = headers
        .iter()
        .map(|h| match h.icon {
            Some(icon) => icon_title(icon).len(),
            None => h.title.chars().count(),
        })
        .collect();
    for &id in &rows {
        let prefix = row_prefix(table, id).len();
        for (column, width) in widths.iter_mut().enumerate() {
            let mut len = cell_text(&table.cell_data_for_column(id, column)).chars().count();
            if Some(column) == hierarchy {
                len += prefix;
            }
            *width = (*width).max(len);
        }
    }
    for width in &mut widths {
        *width = (*width).min(MAX_COLUMN_WIDTH);
    }

    let mut line = String::from("  ");
    for (header, &width) in headers.iter().zip(&widths) {
        let title = header.icon.map(icon_title).unwrap_or(header.title.as_str());
        line.push_str(&fit(title, width, header.alignment));
        line.push_str("  ");
    }
    writeln!(out, "{}", line.trim_end())?;

    for id in rows {
        let gutter = if Some(id) == current {
            "> "
        } else if marked.contains(&id) {
            "* "
        } else {
            "  "
        };
        let mut line = String::from(gutter);
        for (column, &width) in widths.iter().enumerate() {
            if Some(column) == hierarchy {
                let prefix = row_prefix(table, id);
                let inner = width.saturating_sub(prefix.len());
                line.push_str(&prefix);
                if let Some(panel) = table.cell_panel(id, column, inner as f32, renderer) {
                    line.push_str(&panel);
                }
            } else if let Some(panel) = table.cell_panel(id, column, width as f32, renderer) {
                line.push_str(&panel);
            }
            line.push_str("  ");
        }
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use charsheet_model::{Equipment, EquipmentProvider, Trait, TraitProvider};

    fn to_string<Pr: TableProvider>(table: &mut Table<Pr, String>, renderer: &mut TextRenderer) -> String {
        let mut out = Vec::new();
        write_table(table, renderer, &mut out, &[], None).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit("ab", 4, Alignment::Start), "ab  ");
        assert_eq!(fit("ab", 4, Alignment::End), "  ab");
        assert_eq!(fit("ab", 5, Alignment::Middle), " ab  ");
        assert_eq!(fit("abcdef", 4, Alignment::Start), "abc~");
        assert_eq!(fit("abc", 0, Alignment::Start), "");
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&CellData::toggle(true)), "[x]");
        assert_eq!(cell_text(&CellData::text("Luck").with_secondary("3 uses")), "Luck (3 uses)");
        assert_eq!(cell_text(&CellData::page_ref("B110")), "B110");
    }

    #[test]
    fn test_nested_rows_indented() {
        let mut root = Trait::container("Mental", vec![Trait::new("Luck", 15)]);
        root.open = true;
        let mut table = Table::new(TraitProvider::list(vec![root]));
        let text = to_string(&mut table, &mut TextRenderer::default());
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].starts_with("  Trait"));
        assert!(lines[1].starts_with("  - Mental"));
        assert!(lines[2].starts_with("      Luck"));
        assert!(lines[2].contains("15"));
    }

    #[test]
    fn test_second_pass_hits_cache() {
        let mut table = Table::new(EquipmentProvider::sheet(vec![Equipment::new("Rope", 1.0, 4.5)]));
        let mut renderer = TextRenderer::default();
        let first = to_string(&mut table, &mut renderer);
        let built = renderer.rendered;
        let second = to_string(&mut table, &mut renderer);
        assert_eq!(first, second);
        assert_eq!(renderer.rendered, built);
        assert!(first.lines().nth(1).unwrap().contains("[x]"));
    }
}
