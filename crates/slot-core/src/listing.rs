//! Table and TSV renderings of a slot listing.

use crate::slot::Slot;
use std::io::{self, Write};

pub const HEADERS: [&str; 4] = ["NAME", "TAGS", "CMD", "DESCRIPTION"];

/// Commands longer than this are cut in the human table unless `wide`.
pub const DEFAULT_CMD_WIDTH: usize = 60;

/// Caret markers for control characters inside a table cell.
const NEWLINE_MARKER: &str = "^J";
const CARRIAGE_RETURN_MARKER: &str = "^M";
const TAB_MARKER: &str = "^I";
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy)]
pub struct TableOptions {
    /// Maximum command width in characters; `None` disables truncation.
    pub max_cmd_width: Option<usize>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            max_cmd_width: Some(DEFAULT_CMD_WIDTH),
        }
    }
}

// ---------------------------------------------------------------------------
// Human table
// ---------------------------------------------------------------------------

pub fn table_row(slot: &Slot, opts: TableOptions) -> Vec<String> {
    let cmd = mark_controls(&slot.cmd);
    let cmd = match opts.max_cmd_width {
        Some(width) => truncate(&cmd, width),
        None => cmd,
    };
    vec![
        slot.name.clone(),
        slot.tags.join(","),
        cmd,
        mark_controls(slot.description.as_deref().unwrap_or_default()),
    ]
}

/// Keep a cell on one line and its width honest. A CRLF pair counts as a
/// single newline.
fn mark_controls(s: &str) -> String {
    s.replace("\r\n", "\n")
        .replace('\n', NEWLINE_MARKER)
        .replace('\r', CARRIAGE_RETURN_MARKER)
        .replace('\t', TAB_MARKER)
}

/// Aligned columns separated by two spaces, header first.
pub fn write_table<W: Write>(out: &mut W, slots: &[&Slot], opts: TableOptions) -> io::Result<()> {
    let rows: Vec<Vec<String>> = slots.iter().map(|s| table_row(s, opts)).collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    write_aligned(out, &header, &widths)?;
    for row in &rows {
        write_aligned(out, row, &widths)?;
    }
    Ok(())
}

fn write_aligned<W: Write>(out: &mut W, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let last = cells.len().saturating_sub(1);
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        line.push_str(cell);
        if i < last {
            let pad = widths[i].saturating_sub(cell.chars().count()) + 2;
            line.push_str(&" ".repeat(pad));
        }
    }
    writeln!(out, "{}", line.trim_end())
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let keep = width.saturating_sub(ELLIPSIS.len());
    let mut cut: String = s.chars().take(keep).collect();
    cut.push_str(ELLIPSIS);
    cut
}

// ---------------------------------------------------------------------------
// TSV
// ---------------------------------------------------------------------------

/// Escape a field so it never contains a real tab or line break.
pub fn escape_field(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str(r"\\"),
            '\n' => out.push_str(r"\n"),
            '\r' => out.push_str(r"\r"),
            '\t' => out.push_str(r"\t"),
            other => out.push(other),
        }
    }
    out
}

/// Header line plus exactly one line per slot.
pub fn write_tsv<W: Write>(out: &mut W, slots: &[&Slot]) -> io::Result<()> {
    writeln!(out, "{}", HEADERS.join("\t"))?;
    for slot in slots {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            escape_field(&slot.name),
            escape_field(&slot.tags.join(",")),
            escape_field(&slot.cmd),
            escape_field(slot.description.as_deref().unwrap_or_default()),
        )?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
