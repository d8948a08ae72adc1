// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Packing of a group's cells into a bordered, terminal-width grid.
//!
//! Cells fill columns top to bottom before moving right, so neighbouring
//! node names stay together when a group wraps onto several rows.

use std::io::{self, Write};

use crossterm::style::{style, Stylize};

use super::highlight::Highlight;

/// Border and padding characters reserved around each cell: " " + cell + " |"
const CELL_OVERHEAD: usize = 3;

/// One cell of the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub text: String,
    pub highlight: Highlight,
}

impl Field {
    pub fn new(text: String, highlight: Highlight) -> Self {
        Self { text, highlight }
    }

    /// Filler cell used to square off the last column
    pub fn blank(width: usize) -> Self {
        Self {
            text: " ".repeat(width),
            highlight: Highlight::Plain,
        }
    }

    pub fn width(&self) -> usize {
        self.text.chars().count()
    }
}

/// Heading of a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTitle {
    pub partition: String,
    pub is_default: bool,
    /// Capacity, e.g. "32 cores, 187.5Gi"
    pub capacity: String,
}

/// Output styling switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Styling {
    pub ansi: bool,
}

/// Cells per printed row: as many as fit in `width`, at least one, at most `count`
pub fn fields_per_row(width: usize, field_width: usize, count: usize) -> usize {
    (width / (field_width + CELL_OVERHEAD)).clamp(1, count.max(1))
}

/// Append blank cells until `fields` fills whole rows of `per_row`
pub fn pad_to_rectangle(fields: &mut Vec<Field>, per_row: usize, field_width: usize) {
    while fields.len() % per_row != 0 {
        fields.push(Field::blank(field_width));
    }
}

/// Print order of a column-major list: row `r` holds items `r, r + rows, r + 2 * rows, ...`
pub fn column_major<T>(items: &[T], rows: usize) -> Vec<Vec<&T>> {
    if rows == 0 {
        return Vec::new();
    }
    (0..rows)
        .map(|r| items.iter().skip(r).step_by(rows).collect())
        .collect()
}

/// Dashed border for `columns` cells of `field_width`
pub fn border(columns: usize, field_width: usize) -> String {
    let mut line = String::from("+");
    for _ in 0..columns {
        line.push_str(&"-".repeat(field_width + 2));
        line.push('+');
    }
    line
}

/// A group's cells laid out for a given terminal width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub field_width: usize,
    pub per_row: usize,
    pub rows: usize,
    /// Padded cells, still in column-major order
    pub cells: Vec<Field>,
}

impl Grid {
    pub fn new(fields: Vec<Field>, width: usize) -> Self {
        let field_width = fields.iter().map(Field::width).max().unwrap_or(0);
        let per_row = fields_per_row(width, field_width, fields.len());

        let mut cells: Vec<Field> = fields
            .into_iter()
            .map(|f| Field::new(format!("{:<w$}", f.text, w = field_width), f.highlight))
            .collect();
        pad_to_rectangle(&mut cells, per_row, field_width);

        Self {
            field_width,
            per_row,
            rows: cells.len() / per_row,
            cells,
        }
    }

    pub fn print_rows(&self) -> Vec<Vec<&Field>> {
        column_major(&self.cells, self.rows)
    }

    pub fn write<W: Write>(&self, out: &mut W, title: &BlockTitle, styling: Styling) -> io::Result<()> {
        write_title(out, title, styling)?;
        let rule = border(self.per_row, self.field_width);
        writeln!(out, "{}", rule)?;
        for row in self.print_rows() {
            write!(out, "|")?;
            for cell in row {
                write!(out, " ")?;
                match (cell.highlight, styling.ansi) {
                    (Highlight::Matched, true) => write!(out, "{}", style(&cell.text).reverse())?,
                    _ => write!(out, "{}", cell.text)?,
                }
                write!(out, " |")?;
            }
            writeln!(out)?;
        }
        writeln!(out, "{}", rule)
    }
}

fn write_title<W: Write>(out: &mut W, title: &BlockTitle, styling: Styling) -> io::Result<()> {
    match (title.is_default, styling.ansi) {
        (true, true) => write!(out, "{}", style(&title.partition).bold())?,
        (true, false) => write!(out, "{}*", title.partition)?,
        (false, _) => write!(out, "{}", title.partition)?,
    }
    writeln!(out, " ({})", title.capacity)
}

/// Lay out `fields` for `width` columns and write the bordered block
pub fn write_block<W: Write>(
    out: &mut W,
    title: &BlockTitle,
    fields: Vec<Field>,
    width: usize,
    styling: Styling,
) -> io::Result<()> {
    if fields.is_empty() {
        return Ok(());
    }
    Grid::new(fields, width).write(out, title, styling)
}
