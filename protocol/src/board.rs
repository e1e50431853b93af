use std::io::BufRead;

use ndarray::Array2;
use sweepduel_core::*;

use crate::{Result, *};

/// Map input character for a mine.
pub const MINE_CHAR: char = 'X';
/// Map input character for a safe cell.
pub const SAFE_CHAR: char = '.';

fn dimensions(rows: i64, columns: i64) -> Result<Coord2> {
    match (Coord::try_from(rows), Coord::try_from(columns)) {
        (Ok(r), Ok(c)) if r > 0 && c > 0 => Ok((r, c)),
        _ => Err(ProtocolError::InvalidDimensions { rows, columns }),
    }
}

/// Reads `rows` lines of exactly `columns` characters, mapping each one.
fn read_grid<R, T, F>(
    reader: &mut LineReader<R>,
    size: Coord2,
    expected: &'static str,
    mut cell: F,
) -> Result<Array2<T>>
where
    R: BufRead,
    F: FnMut(char) -> Option<T>,
{
    let (rows, columns) = (usize::from(size.0), usize::from(size.1));
    let mut cells = Vec::with_capacity(rows * columns);

    for _ in 0..rows {
        let (line, text) = reader.expect_line(expected)?;
        parse_row(line, &text, columns, &mut cell, &mut cells)?;
    }

    Ok(Array2::from_shape_vec([rows, columns], cells).map_err(|_| GameError::InvalidBoardShape)?)
}

fn parse_row<T>(
    line: usize,
    text: &str,
    columns: usize,
    cell: &mut impl FnMut(char) -> Option<T>,
    out: &mut Vec<T>,
) -> Result<()> {
    let found = text.chars().count();
    if found != columns {
        return Err(ProtocolError::ColumnCountMismatch {
            line,
            expected: columns,
            found,
        });
    }

    for c in text.chars() {
        out.push(cell(c).ok_or(ProtocolError::InvalidChar { line, found: c })?);
    }
    Ok(())
}

/// Reads the initial map: a `rows columns` line, then one line per row of
/// `.` and `X`.
pub fn read_map<R: BufRead>(reader: &mut LineReader<R>) -> Result<MineLayout> {
    let [rows, columns] = reader.expect_ints("board dimensions")?;
    let size = dimensions(rows, columns)?;

    let mask = read_grid(reader, size, "map row", |c| match c {
        MINE_CHAR => Some(true),
        SAFE_CHAR => Some(false),
        _ => None,
    })?;

    let layout = MineLayout::from_mine_mask(mask)?;
    log::debug!(
        "read {}x{} map with {} mines",
        size.0,
        size.1,
        layout.mine_count()
    );
    Ok(layout)
}

pub fn parse_map(text: &str) -> Result<MineLayout> {
    read_map(&mut LineReader::new(text.as_bytes()))
}

/// Map input for a layout, header included.
pub fn render_map(layout: &MineLayout) -> String {
    let (rows, columns) = layout.size();
    let mut out = format!("{rows} {columns}\n");
    for row in 0..rows {
        out.extend((0..columns).map(|column| {
            if layout.contains_mine((row, column)) {
                MINE_CHAR
            } else {
                SAFE_CHAR
            }
        }));
        out.push('\n');
    }
    out
}

/// One line per row in the disclosure alphabet.
pub fn render_board(board: &Array2<Glyph>) -> String {
    let mut out = String::with_capacity(board.len() + board.nrows());
    for row in board.rows() {
        out.extend(row.iter().map(|glyph| glyph.to_char()));
        out.push('\n');
    }
    out
}

/// Reads one disclosed board of the given size.
pub fn read_board<R: BufRead>(reader: &mut LineReader<R>, size: Coord2) -> Result<Array2<Glyph>> {
    read_grid(reader, size, "board row", Glyph::from_char)
}

/// Parses the remaining rows of a board whose first row was already read.
pub fn read_board_after<R: BufRead>(
    reader: &mut LineReader<R>,
    size: Coord2,
    (line, first): (usize, &str),
) -> Result<Array2<Glyph>> {
    let (rows, columns) = (usize::from(size.0), usize::from(size.1));
    let mut cells = Vec::with_capacity(rows * columns);
    parse_row(line, first, columns, &mut Glyph::from_char, &mut cells)?;

    for _ in 1..rows {
        let (line, text) = reader.expect_line("board row")?;
        parse_row(line, &text, columns, &mut Glyph::from_char, &mut cells)?;
    }

    Ok(Array2::from_shape_vec([rows, columns], cells).map_err(|_| GameError::InvalidBoardShape)?)
}

pub fn parse_board(size: Coord2, text: &str) -> Result<Array2<Glyph>> {
    read_board(&mut LineReader::new(text.as_bytes()), size)
}

/// Reads the `rows columns` header the client receives.
pub fn read_dimensions<R: BufRead>(reader: &mut LineReader<R>) -> Result<Coord2> {
    let [rows, columns] = reader.expect_ints("board dimensions")?;
    dimensions(rows, columns)
}
