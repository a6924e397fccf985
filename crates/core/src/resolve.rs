//! Resolve module - locking pieces and running the clear/gravity cascade
//!
//! After a piece locks, floating blobs fall first. The board is then
//! repeatedly scanned for same-colored groups (4-directional adjacency).
//! Every group at or above the configured size pops, the remaining blobs
//! fall, and the scan repeats until a pass pops nothing. Each popping pass removes at least one cell, so the loop ends
//! after at most `width * height` passes.

use log::{debug, trace};

use crate::board::Board;
use crate::pieces::Piece;
use crate::scoring::group_score;
use crate::types::{Cell, Color, GameConfig};

/// A connected run of same-colored cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub color: Color,
    /// (x, y) positions in discovery order
    pub cells: Vec<(i16, i16)>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A group removed during a chain step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearedGroup {
    pub color: Color,
    pub size: usize,
}

/// One popping pass of the cascade
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChainStep {
    pub groups: Vec<ClearedGroup>,
    pub cleared: u32,
    pub score: u32,
}

/// Outcome of a full cascade
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolveReport {
    /// Popping passes, in order
    pub steps: Vec<ChainStep>,
    /// Cells removed across all passes
    pub cleared: u32,
    /// Points earned across all passes
    pub score: u32,
}

impl ResolveReport {
    /// Number of popping passes
    pub fn chains(&self) -> u32 {
        self.steps.len() as u32
    }
}

/// Write the piece's blobs into the board.
///
/// Blobs above the top row are dropped. Returns how many blobs landed.
pub fn lock_piece(board: &mut Board, piece: &Piece) -> usize {
    let mut landed = 0;
    for (x, y, color) in piece.cells() {
        if y >= 0 && board.set(x, y, color) {
            landed += 1;
        }
    }
    landed
}

/// Find every same-colored group with at least `min_size` cells.
///
/// Groups are reported in row-major order of their first cell.
pub fn find_groups(board: &Board, min_size: usize) -> Vec<Group> {
    let width = board.width() as usize;
    let height = board.height() as usize;
    let cells = board.cells();
    let mut visited = vec![false; cells.len()];
    let mut stack: Vec<usize> = Vec::new();
    let mut groups = Vec::new();

    for start in 0..cells.len() {
        let Cell::Colored(color) = cells[start] else {
            continue;
        };
        if visited[start] {
            continue;
        }

        let mut group = Group {
            color,
            cells: Vec::new(),
        };
        visited[start] = true;
        stack.push(start);

        while let Some(idx) = stack.pop() {
            let (x, y) = (idx % width, idx / width);
            group.cells.push((x as i16, y as i16));

            let neighbors = [
                (y + 1 < height).then(|| idx + width),
                (y > 0).then(|| idx - width),
                (x + 1 < width).then(|| idx + 1),
                (x > 0).then(|| idx - 1),
            ];
            for n in neighbors.into_iter().flatten() {
                if !visited[n] && cells[n] == Cell::Colored(color) {
                    visited[n] = true;
                    stack.push(n);
                }
            }
        }

        if group.len() >= min_size {
            groups.push(group);
        }
    }

    groups
}

/// Pop every qualifying group once.
///
/// Returns `None` when nothing popped.
pub fn clear_pass(board: &mut Board, config: &GameConfig) -> Option<ChainStep> {
    let groups = find_groups(board, config.min_group_size as usize);
    if groups.is_empty() {
        return None;
    }

    let mut step = ChainStep::default();
    for group in &groups {
        for &(x, y) in &group.cells {
            board.clear_cell(x, y);
        }
        step.cleared += group.len() as u32;
        step.score = step.score.saturating_add(group_score(group.len(), config));
        step.groups.push(ClearedGroup {
            color: group.color,
            size: group.len(),
        });
    }

    Some(step)
}

/// Shift floating blobs down by at most one row per pass.
///
/// Scans each column bottom-up; returns true if anything moved.
pub fn gravity_step(board: &mut Board) -> bool {
    let width = board.width() as usize;
    let height = board.height() as usize;
    let cells = board.cells_mut();
    let mut moved = false;

    for x in 0..width {
        for y in (0..height.saturating_sub(1)).rev() {
            let here = y * width + x;
            let below = here + width;
            if cells[here].is_colored() && cells[below].is_empty() {
                cells[below] = cells[here];
                cells[here] = Cell::Empty;
                moved = true;
            }
        }
    }

    moved
}

/// Run gravity passes until nothing moves; returns the number of moving passes
pub fn settle(board: &mut Board) -> u32 {
    let mut passes = 0;
    while gravity_step(board) {
        passes += 1;
    }
    trace!("gravity settled after {passes} passes");
    passes
}

/// Run the clear/gravity loop to its fixed point.
///
/// The board is settled first: a freshly locked blob may hang over a gap and
/// only joins its group once it has landed.
pub fn resolve(board: &mut Board, config: &GameConfig) -> ResolveReport {
    let mut report = ResolveReport::default();
    settle(board);

    loop {
        let step = clear_pass(board, config);
        settle(board);

        let Some(step) = step else {
            break;
        };

        debug!(
            "chain {}: {} groups, {} cells, +{}",
            report.steps.len() + 1,
            step.groups.len(),
            step.cleared,
            step.score
        );
        report.cleared += step.cleared;
        report.score = report.score.saturating_add(step.score);
        report.steps.push(step);
    }

    report
}
