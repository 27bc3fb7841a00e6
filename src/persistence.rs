//! Text files for saving and replaying solutions.
//!
//! Format (UTF-8):
//! - `puzzle: <name>`
//! - `moves: <count>`
//! - one line with the moves in notation, e.g. `D3↓ C1→`
//! - a blank line, then every frame of the solution (ignored when loading)

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::geometry::Direction;
use crate::grid::{format_moves, Grid, Move};
use crate::pieces::PieceTag;
use crate::solver::replay;

/// A solution read back from disk. Moves stay in notation until they are
/// resolved against the puzzle's initial grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedSolution {
    pub puzzle: String,
    pub notation: Vec<String>,
}

impl SavedSolution {
    /// Resolves the saved notation into moves for `grid`.
    pub fn moves(&self, grid: &Grid) -> Result<Vec<Move>> {
        self.notation
            .iter()
            .map(|token| {
                parse_move(grid, token).map_err(|message| Error::Parse { line: 3, message })
            })
            .collect()
    }
}

/// Writes `path` as a solution of `puzzle` starting from `initial`.
pub fn save(file: &Path, puzzle: &str, initial: &Grid, path: &[Move]) -> Result<()> {
    let frames = replay(initial, path)?;
    let mut out = BufWriter::new(File::create(file)?);

    writeln!(out, "puzzle: {puzzle}")?;
    writeln!(out, "moves: {}", path.len())?;
    writeln!(out, "{}", format_moves(initial, path)?)?;

    for (i, frame) in frames.iter().enumerate() {
        writeln!(out)?;
        match i {
            0 => writeln!(out, "initial grid:")?,
            _ => writeln!(out, "after move {} ({}):", i, path[i - 1].notation(initial)?)?,
        }
        writeln!(out, "{frame}")?;
    }

    out.flush()?;
    Ok(())
}

/// Reads the header and move line of a solution file.
pub fn load(file: &Path) -> Result<SavedSolution> {
    let reader = BufReader::new(File::open(file)?);
    let mut lines = reader.lines();

    let mut header = |line: usize, field: &str| -> Result<String> {
        let text = lines.next().transpose()?.unwrap_or_default();
        text.strip_prefix(field)
            .and_then(|rest| rest.strip_prefix(':'))
            .map(|value| value.trim().to_string())
            .ok_or_else(|| Error::Parse {
                line,
                message: format!("expected `{field}: ...`, found {text:?}"),
            })
    };

    let puzzle = header(1, "puzzle")?;
    let count_text = header(2, "moves")?;
    let count: usize = count_text.parse().map_err(|_| Error::Parse {
        line: 2,
        message: format!("invalid move count {count_text:?}"),
    })?;

    let move_line = lines.next().transpose()?.unwrap_or_default();
    let notation: Vec<String> = move_line.split_whitespace().map(str::to_string).collect();
    if notation.len() != count {
        return Err(Error::Parse {
            line: 3,
            message: format!("expected {count} moves, found {}", notation.len()),
        });
    }

    Ok(SavedSolution { puzzle, notation })
}

/// Parses one move such as `B2←` against the pieces of `grid`.
pub fn parse_move(grid: &Grid, token: &str) -> std::result::Result<Move, String> {
    let mut chars = token.chars();
    let arrow = chars.next_back().ok_or("empty move")?;
    let direction = Direction::from_symbol(arrow)
        .ok_or_else(|| format!("unknown direction {arrow:?} in {token:?}"))?;

    let symbol = chars.next().ok_or_else(|| format!("missing piece in {token:?}"))?;
    let number: u32 = chars
        .as_str()
        .parse()
        .map_err(|_| format!("invalid piece number in {token:?}"))?;

    let piece_index = grid
        .piece_index(PieceTag::new(symbol, number))
        .ok_or_else(|| format!("no piece {symbol}{number} in grid"))?;

    Ok(Move::new(piece_index, direction))
}
