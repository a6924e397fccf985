//! Game state module - manages the complete game session
//!
//! This module ties together all core components: board, pieces, generator,
//! cascade resolution and scoring. The session is a small state machine:
//!
//! - **Falling**: `tick`/`soft_drop` move the piece down one row if it fits,
//!   otherwise the session enters Locking.
//! - **Locking**: the piece is written to the board. If its anchor is on the
//!   spawn row or above, the game ends; otherwise the clear/gravity cascade
//!   runs, the preview piece becomes current and a new preview is drawn.
//! - **GameOver**: every command is a no-op until [`GameState::new_game`].
//!
//! There is no internal clock. Callers pump [`GameState::tick`] at whatever
//! cadence they like and apply input between ticks; `&mut self` on every
//! command keeps them from interleaving.

use log::{debug, info};
use rand::Rng;
use rand_pcg::Pcg32;

use crate::board::Board;
use crate::pieces::{drop_distance, try_rotate_ccw, try_rotate_cw, Piece};
use crate::resolve::{lock_piece, resolve};
use crate::rng::PieceGenerator;
use crate::scoring::level_for_score;
use crate::snapshot::{GameSnapshot, PieceSnapshot};
use crate::types::*;

/// Result of a single gravity step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game is over; nothing happened
    Ignored,
    /// The piece moved down one row
    Fell,
    /// The piece could not descend and was locked
    Locked(LockEvent),
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameState<R = Pcg32> {
    config: GameConfig,
    board: Board,
    current: Option<Piece>,
    next: Piece,
    generator: PieceGenerator<R>,
    phase: Phase,
    score: u32,
    /// Monotonic episode id (increments on new game).
    episode_id: u32,
    pieces_locked: u32,
    total_cleared: u32,
    max_chain: u32,
    /// Last lock event (consumed by observers).
    last_event: Option<LockEvent>,
}

impl GameState<Pcg32> {
    /// Create a new game with the default rules and the given RNG seed
    pub fn new(seed: u64) -> Self {
        let config = GameConfig::default();
        Self::start(config, PieceGenerator::new(&config, seed))
    }

    /// Create a new game with custom rules
    pub fn with_config(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::start(config, PieceGenerator::new(&config, seed)))
    }
}

impl<R: Rng> GameState<R> {
    /// Create a new game drawing piece colors from `rng`
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::start(config, PieceGenerator::with_rng(&config, rng)))
    }

    fn start(config: GameConfig, mut generator: PieceGenerator<R>) -> Self {
        let current = generator.generate();
        let next = generator.generate();

        Self {
            config,
            board: Board::from_config(&config),
            current: Some(current),
            next,
            generator,
            phase: Phase::Falling,
            score: 0,
            episode_id: 0,
            pieces_locked: 0,
            total_cleared: 0,
            max_chain: 0,
            last_event: None,
        }
    }

    /// Clear the board and score and deal fresh pieces.
    ///
    /// The random stream continues from where the previous game stopped.
    pub fn new_game(&mut self) {
        self.board.reset();
        self.current = Some(self.generator.generate());
        self.next = self.generator.generate();
        self.phase = Phase::Falling;
        self.score = 0;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.pieces_locked = 0;
        self.total_cleared = 0;
        self.max_chain = 0;
        self.last_event = None;
        info!("new game (episode {})", self.episode_id);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Piece under player control (`None` once the game is over)
    pub fn current(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    /// Preview piece
    pub fn next(&self) -> &Piece {
        &self.next
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        level_for_score(self.score)
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    pub fn total_cleared(&self) -> u32 {
        self.total_cleared
    }

    /// Longest cascade seen this game
    pub fn max_chain(&self) -> u32 {
        self.max_chain
    }

    /// Where the current piece would rest after a hard drop
    pub fn landing_position(&self) -> Option<Piece> {
        let piece = self.current.as_ref()?;
        Some(piece.translated(0, drop_distance(&self.board, piece)))
    }

    /// Random source shared with the generator
    pub fn rng_mut(&mut self) -> &mut R {
        self.generator.rng_mut()
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// One gravity step
    pub fn tick(&mut self) -> TickOutcome {
        self.advance(0)
    }

    /// Player-requested gravity step; identical to [`GameState::tick`]
    pub fn soft_drop(&mut self) -> TickOutcome {
        self.advance(0)
    }

    /// Drop the current piece to its resting row and lock it.
    ///
    /// Returns `None` if the game is already over.
    pub fn hard_drop(&mut self) -> Option<LockEvent> {
        let mut fallen = 0;
        loop {
            match self.advance(fallen) {
                TickOutcome::Fell => fallen += 1,
                TickOutcome::Locked(event) => return Some(event),
                TickOutcome::Ignored => return None,
            }
        }
    }

    /// Shift the current piece one column if it fits
    pub fn move_horizontal(&mut self, dir: Direction) -> bool {
        if self.phase != Phase::Falling {
            return false;
        }
        let Some(piece) = self.current.as_mut() else {
            return false;
        };

        if piece.fits(&self.board, dir.dx(), 0) {
            piece.x += dir.dx();
            return true;
        }
        false
    }

    /// Rotate the current piece clockwise if the turned shape fits
    pub fn rotate(&mut self) -> bool {
        self.try_rotate(try_rotate_cw)
    }

    /// Rotate the current piece counter-clockwise if the turned shape fits
    pub fn rotate_ccw(&mut self) -> bool {
        self.try_rotate(try_rotate_ccw)
    }

    fn try_rotate(&mut self, rotate: fn(&Board, &Piece) -> Option<Piece>) -> bool {
        if self.phase != Phase::Falling {
            return false;
        }
        let Some(piece) = self.current.as_ref() else {
            return false;
        };

        match rotate(&self.board, piece) {
            Some(rotated) => {
                self.current = Some(rotated);
                true
            }
            None => false,
        }
    }

    /// Apply a game action; returns whether it had any effect
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_horizontal(Direction::Left),
            GameAction::MoveRight => self.move_horizontal(Direction::Right),
            GameAction::RotateCw => self.rotate(),
            GameAction::RotateCcw => self.rotate_ccw(),
            GameAction::SoftDrop => self.soft_drop() != TickOutcome::Ignored,
            GameAction::Tick => self.tick() != TickOutcome::Ignored,
            GameAction::HardDrop => self.hard_drop().is_some(),
            GameAction::NewGame => {
                self.new_game();
                true
            }
        }
    }

    /// Run the state machine until one step has been taken.
    ///
    /// `fallen` is how many rows the piece already fell in the current
    /// command; it is recorded on the lock event.
    fn advance(&mut self, fallen: u32) -> TickOutcome {
        loop {
            match self.phase {
                Phase::GameOver => return TickOutcome::Ignored,
                Phase::Falling => {
                    let Some(piece) = self.current.as_mut() else {
                        return TickOutcome::Ignored;
                    };
                    if piece.fits(&self.board, 0, 1) {
                        piece.y += 1;
                        return TickOutcome::Fell;
                    }
                    self.phase = Phase::Locking;
                }
                Phase::Locking => return TickOutcome::Locked(self.lock_current(fallen)),
            }
        }
    }

    /// Lock the current piece, resolve the board and promote the preview
    fn lock_current(&mut self, fallen: u32) -> LockEvent {
        let mut event = LockEvent {
            drop_distance: fallen,
            ..LockEvent::default()
        };

        let Some(piece) = self.current.take() else {
            self.phase = Phase::Falling;
            return event;
        };

        lock_piece(&mut self.board, &piece);
        self.pieces_locked += 1;

        if piece.y <= 0 {
            self.phase = Phase::GameOver;
            event.game_over = true;
            self.last_event = Some(event);
            info!(
                "game over after {} pieces, score {}",
                self.pieces_locked, self.score
            );
            return event;
        }

        let report = resolve(&mut self.board, &self.config);
        self.score = self.score.saturating_add(report.score);
        self.total_cleared += report.cleared;
        self.max_chain = self.max_chain.max(report.chains());

        event.chains = report.chains();
        event.cleared = report.cleared;
        event.score_gained = report.score;

        debug!(
            "locked piece {} at ({}, {}): {} chains, +{}",
            self.pieces_locked,
            piece.x,
            piece.y,
            event.chains,
            event.score_gained
        );

        let fresh = self.generator.generate();
        self.current = Some(std::mem::replace(&mut self.next, fresh));
        self.phase = Phase::Falling;
        self.last_event = Some(event);
        event
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.width = self.board.width();
        out.height = self.board.height();
        out.board.clear();
        out.board.extend_from_slice(self.board.cells());
        out.current = self.current.as_ref().map(PieceSnapshot::from);
        out.landing = self.landing_position().as_ref().map(PieceSnapshot::from);
        out.next = Some(PieceSnapshot::from(&self.next));
        out.phase = self.phase;
        out.game_over = self.is_game_over();
        out.episode_id = self.episode_id;
        out.score = self.score;
        out.level = self.level();
        out.pieces_locked = self.pieces_locked;
        out.total_cleared = self.total_cleared;
        out.max_chain = self.max_chain;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub(crate) fn set_current(&mut self, piece: Piece) {
        self.current = Some(piece);
    }
}

impl Default for GameState<Pcg32> {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> GameState {
        GameState::new(12345)
    }

    /// Fill column `x` from row `from` to the floor with alternating colors
    fn fill_column(state: &mut GameState, x: i16, from: i16) {
        for y in from..state.board().height() as i16 {
            let color = if y % 2 == 0 { Color::Green } else { Color::Blue };
            state.board_mut().set(x, y, color);
        }
    }

    #[test]
    fn test_new_game_state() {
        let state = seeded();

        assert_eq!(state.phase(), Phase::Falling);
        assert!(!state.is_game_over());
        assert_eq!(state.score(), 0);
        assert_eq!(state.episode_id(), 0);
        assert!(state.board().is_empty());

        let current = state.current().unwrap();
        assert_eq!((current.x, current.y), (3, 0));
        assert_eq!((state.next().x, state.next().y), (3, 0));
    }

    #[test]
    fn test_tick_moves_piece_down() {
        let mut state = seeded();
        assert_eq!(state.tick(), TickOutcome::Fell);
        assert_eq!(state.current().unwrap().y, 1);
        assert_eq!(state.soft_drop(), TickOutcome::Fell);
        assert_eq!(state.current().unwrap().y, 2);
    }

    #[test]
    fn test_tick_locks_at_floor_and_promotes_next() {
        let mut state = seeded();
        let next = state.next().clone();

        // Anchor row 0 -> 10 takes ten falls.
        for _ in 0..10 {
            assert_eq!(state.tick(), TickOutcome::Fell);
        }
        let TickOutcome::Locked(event) = state.tick() else {
            panic!("expected a lock");
        };

        assert!(!event.game_over);
        assert_eq!(event.drop_distance, 0);
        assert_eq!(state.pieces_locked(), 1);
        assert_eq!(state.current(), Some(&next));
        assert_eq!(state.board().occupied_count(), 2);
    }

    #[test]
    fn test_hard_drop_red_pair_in_spawn_column() {
        let mut state = seeded();
        state.set_current(Piece::pair(3, 0, Color::Red, Color::Red));

        let event = state.hard_drop().unwrap();

        assert_eq!(event.drop_distance, 10);
        assert_eq!(event.chains, 0);
        assert_eq!(state.board().get(3, 10), Some(Cell::Colored(Color::Red)));
        assert_eq!(state.board().get(3, 11), Some(Cell::Colored(Color::Red)));
        assert_eq!(state.board().occupied_count(), 2);
        assert_eq!(state.score(), 0);
        assert!(!state.is_game_over());
    }

    #[test]
    fn test_tick_lock_pops_group_across_two_rows() {
        let mut state = seeded();
        {
            let board = state.board_mut();
            board.set(1, 10, Color::Green);
            board.set(1, 11, Color::Red);
            board.set(2, 11, Color::Red);
            board.set(5, 11, Color::Blue);
        }
        // Partner already on the floor, so the next tick locks.
        state.set_current(Piece::pair(3, 10, Color::Red, Color::Red));

        let TickOutcome::Locked(event) = state.tick() else {
            panic!("expected a lock");
        };

        assert_eq!(event.chains, 1);
        assert_eq!(event.cleared, 4);
        assert_eq!(event.score_gained, 40);
        assert_eq!(state.score(), 40);

        let board = state.board();
        assert_eq!(board.get(1, 11), Some(Cell::Colored(Color::Green)));
        assert_eq!(board.get(1, 10), Some(Cell::Empty));
        assert_eq!(board.get(2, 11), Some(Cell::Empty));
        assert_eq!(board.get(3, 11), Some(Cell::Empty));
        assert_eq!(board.get(3, 10), Some(Cell::Empty));
        assert_eq!(board.get(5, 11), Some(Cell::Colored(Color::Blue)));
        assert_eq!(board.occupied_count(), 2);
    }

    #[test]
    fn test_cascade_scores_every_group() {
        let mut state = seeded();
        {
            let board = state.board_mut();
            // RRYYY. with a lone yellow resting on the second red
            board.set(0, 11, Color::Red);
            board.set(1, 11, Color::Red);
            board.set(2, 11, Color::Yellow);
            board.set(3, 11, Color::Yellow);
            board.set(4, 11, Color::Yellow);
            board.set(1, 10, Color::Yellow);
        }
        state.set_current(Piece::pair(0, 9, Color::Red, Color::Red));
        let event = state.hard_drop().unwrap();

        // Four reds pop, the lone yellow falls into the row and completes
        // the yellow four.
        assert_eq!(event.chains, 2);
        assert_eq!(event.cleared, 8);
        assert_eq!(state.score(), 80);
        assert_eq!(state.max_chain(), 2);
        assert!(state.board().is_empty());
    }

    #[test]
    fn test_hanging_partner_falls_and_pops() {
        let mut state = seeded();
        fill_column(&mut state, 3, 6);
        {
            let board = state.board_mut();
            board.set(2, 9, Color::Yellow);
            board.set(2, 10, Color::Yellow);
            board.set(2, 11, Color::Yellow);
        }
        // Anchor rests on the column 3 stack, the yellow partner hangs over
        // column 2 three rows above the yellows.
        state.set_current(Piece::pair(3, 5, Color::Red, Color::Yellow).rotated_cw());

        let TickOutcome::Locked(event) = state.tick() else {
            panic!("expected a lock");
        };

        assert_eq!(event.chains, 1);
        assert_eq!(event.cleared, 4);
        assert_eq!(event.score_gained, 40);
        let board = state.board();
        for y in 0..12 {
            assert_eq!(board.get(2, y), Some(Cell::Empty));
        }
        assert_eq!(board.get(3, 5), Some(Cell::Colored(Color::Red)));
        assert!(crate::resolve::find_groups(board, 4).is_empty());
    }

    #[test]
    fn test_lock_on_spawn_row_ends_game_before_clearing() {
        let mut state = seeded();
        fill_column(&mut state, 3, 3);
        {
            let board = state.board_mut();
            board.set(3, 2, Color::Red);
            board.set(4, 1, Color::Red);
        }
        state.set_current(Piece::pair(3, 0, Color::Red, Color::Red));

        let TickOutcome::Locked(event) = state.tick() else {
            panic!("expected a lock");
        };

        assert!(event.game_over);
        assert!(state.is_game_over());
        assert_eq!(state.phase(), Phase::GameOver);
        assert_eq!(state.score(), 0);
        assert!(state.current().is_none());
        // The would-be group of four is still there.
        assert_eq!(state.board().get(3, 2), Some(Cell::Colored(Color::Red)));
        assert_eq!(state.board().get(3, 0), Some(Cell::Colored(Color::Red)));
    }

    #[test]
    fn test_game_over_rejects_commands() {
        let mut state = seeded();
        fill_column(&mut state, 3, 2);
        state.hard_drop();
        assert!(state.is_game_over());

        let board = state.board().clone();
        assert_eq!(state.tick(), TickOutcome::Ignored);
        assert_eq!(state.soft_drop(), TickOutcome::Ignored);
        assert!(state.hard_drop().is_none());
        assert!(!state.move_horizontal(Direction::Left));
        assert!(!state.rotate());
        assert!(!state.rotate_ccw());
        for action in [
            GameAction::MoveRight,
            GameAction::RotateCw,
            GameAction::SoftDrop,
            GameAction::HardDrop,
            GameAction::Tick,
        ] {
            assert!(!state.apply_action(action));
        }
        assert_eq!(state.board(), &board);
    }

    #[test]
    fn test_new_game_resets_session() {
        let mut state = seeded();
        fill_column(&mut state, 3, 2);
        state.hard_drop();
        assert!(state.is_game_over());

        assert!(state.apply_action(GameAction::NewGame));

        assert_eq!(state.phase(), Phase::Falling);
        assert!(state.board().is_empty());
        assert_eq!(state.score(), 0);
        assert_eq!(state.pieces_locked(), 0);
        assert_eq!(state.episode_id(), 1);
        assert!(state.current().is_some());
        assert!(state.take_last_event().is_none());
    }

    #[test]
    fn test_move_horizontal_stops_at_walls() {
        let mut state = seeded();

        let mut moved = 0;
        while state.move_horizontal(Direction::Left) {
            moved += 1;
        }
        assert_eq!(moved, 3);
        assert_eq!(state.current().unwrap().x, 0);

        let mut moved = 0;
        while state.move_horizontal(Direction::Right) {
            moved += 1;
        }
        assert_eq!(moved, 5);
        assert_eq!(state.current().unwrap().x, 5);
    }

    #[test]
    fn test_move_blocked_by_stack() {
        let mut state = seeded();
        state.board_mut().set(2, 1, Color::Purple);
        assert!(!state.move_horizontal(Direction::Left));
        assert!(state.move_horizontal(Direction::Right));
    }

    #[test]
    fn test_rotate_fails_silently_against_wall() {
        let mut state = seeded();
        while state.move_horizontal(Direction::Left) {}
        let before = state.current().unwrap().clone();

        assert!(!state.rotate());
        assert_eq!(state.current(), Some(&before));

        assert!(state.rotate_ccw());
        assert_eq!(state.current().unwrap().rotation(), Rotation::West);
    }

    #[test]
    fn test_four_rotations_restore_piece() {
        let mut state = seeded();
        state.tick();
        state.tick();
        let before = state.current().unwrap().clone();

        for _ in 0..4 {
            assert!(state.rotate());
        }
        assert_eq!(state.current(), Some(&before));
        assert_eq!(state.current().unwrap().rotation().index(), 0);
    }

    #[test]
    fn test_landing_position() {
        let mut state = seeded();
        fill_column(&mut state, 3, 8);
        let landing = state.landing_position().unwrap();
        assert_eq!((landing.x, landing.y), (3, 6));
    }

    #[test]
    fn test_last_event_set_on_hard_drop() {
        let mut state = seeded();

        assert!(state.apply_action(GameAction::HardDrop));
        let ev = state.take_last_event().unwrap();
        assert_eq!(ev.drop_distance, 10);
        assert!(state.take_last_event().is_none());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = seeded();
        state.hard_drop();

        let snap = state.snapshot();
        assert_eq!((snap.width, snap.height), (6, 12));
        assert_eq!(snap.board.as_slice(), state.board().cells());
        assert_eq!(snap.pieces_locked, 1);
        assert!(!snap.game_over);
        assert!(snap.playable());

        let current = snap.current.unwrap();
        assert_eq!((current.x, current.y), (3, 0));
        assert_eq!(current.blobs.len(), 2);
        assert_eq!(snap.landing.unwrap().y, 8);
    }
}
