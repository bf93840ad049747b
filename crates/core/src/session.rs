//! Session module - manages the complete state of one game
//!
//! This module ties together the arena, pieces, RNG, and scoring.
//! It handles drop timing, piece movement, rotation, line clears, the
//! shrinking boundaries, and the game lifecycle.

use log::{debug, info};

use crate::arena::Arena;
use crate::pieces::{spawn_x, try_rotate, Matrix};
use crate::rng::PieceQueue;
use crate::scoring::line_clear_score;
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::*;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Player {
    pub kind: PieceKind,
    /// Working copy of the template, rotated in place
    pub matrix: Matrix,
    pub x: i8,
    pub y: i8,
}

impl Player {
    /// Create a piece at the top of the arena, centred between the boundaries
    pub fn spawn(kind: PieceKind, arena: &Arena) -> Self {
        let matrix = Matrix::template(kind);
        Self {
            kind,
            matrix,
            x: spawn_x(arena.left(), arena.right(), matrix.size()),
            y: 0,
        }
    }

    pub fn collides(&self, arena: &Arena) -> bool {
        arena.collides(&self.matrix, self.x, self.y)
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameSession {
    arena: Arena,
    player: Option<Player>,
    queue: PieceQueue,
    phase: Phase,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    score: u32,
    high_score: u32,
    /// Pieces locked since the last restart.
    pieces_placed: u32,
    shrink_count: u32,
    drop_counter_ms: u32,
    /// Last lock event (consumed by observers).
    last_event: Option<CoreLastEvent>,
}

impl GameSession {
    /// Create a new session with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self {
            arena: Arena::new(),
            player: None,
            queue: PieceQueue::new(seed),
            phase: Phase::NotStarted,
            episode_id: 0,
            score: 0,
            high_score: 0,
            pieces_placed: 0,
            shrink_count: 0,
            drop_counter_ms: 0,
            last_event: None,
        }
    }

    /// Seed the high score with a previously persisted value
    pub fn with_high_score(mut self, high_score: u32) -> Self {
        self.high_score = self.high_score.max(high_score);
        self
    }

    /// Leave the start screen and spawn the first piece
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::NotStarted {
            return false;
        }
        self.phase = Phase::Playing;
        info!("session started (episode {})", self.episode_id);
        self.spawn_piece();
        true
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn pieces_placed(&self) -> u32 {
        self.pieces_placed
    }

    pub fn shrink_count(&self) -> u32 {
        self.shrink_count
    }

    pub fn drop_counter_ms(&self) -> u32 {
        self.drop_counter_ms
    }

    pub fn next_piece(&self) -> PieceKind {
        self.queue.peek()
    }

    pub fn player(&self) -> Option<Player> {
        self.player
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Direct arena access for scripted setups (tests, benchmarks).
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.arena.write_tag_grid(&mut out.arena);

        out.left = self.arena.left();
        out.right = self.arena.right();
        out.active = self.player.map(ActiveSnapshot::from);
        out.ghost_y = self.ghost_y();
        out.next = self.queue.peek();
        out.phase = self.phase;
        out.episode_id = self.episode_id;
        out.score = self.score;
        out.high_score = self.high_score;
        out.pieces_placed = self.pieces_placed;
        out.shrink_count = self.shrink_count;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Spawn the previewed piece. Returns false (and ends the game) if it collides.
    fn spawn_piece(&mut self) -> bool {
        let piece = Player::spawn(self.queue.draw(), &self.arena);
        self.player = Some(piece);

        if piece.collides(&self.arena) {
            self.phase = Phase::GameOver;
            info!(
                "game over: score {} after {} pieces (high score {})",
                self.score, self.pieces_placed, self.high_score
            );
            return false;
        }

        true
    }

    /// Try to move the active piece sideways
    fn try_move(&mut self, dx: i8) -> bool {
        let Some(active) = self.player else {
            return false;
        };

        let moved = Player {
            x: active.x + dx,
            ..active
        };
        if moved.collides(&self.arena) {
            return false;
        }

        self.player = Some(moved);
        true
    }

    /// Try to rotate the active piece, nudging it sideways if needed
    fn try_rotate(&mut self, dir: RotateDir) -> bool {
        let Some(active) = self.player else {
            return false;
        };

        let arena = &self.arena;
        let result = try_rotate(&active.matrix, active.x, dir, |matrix, x| {
            arena.collides(matrix, x, active.y)
        });

        match result {
            Some((matrix, x)) => {
                self.player = Some(Player { matrix, x, ..active });
                true
            }
            None => false,
        }
    }

    /// Move the active piece down one row, locking it if it cannot fall
    fn drop_one(&mut self) {
        let Some(active) = self.player else {
            return;
        };

        let fallen = Player {
            y: active.y + 1,
            ..active
        };
        if fallen.collides(&self.arena) {
            self.lock_piece();
        } else {
            self.player = Some(fallen);
        }

        self.drop_counter_ms = 0;
    }

    /// Move the active piece to its ghost row and lock it
    fn hard_drop(&mut self) {
        let Some(mut active) = self.player else {
            return;
        };

        if let Some(ghost_y) = self.ghost_y() {
            active.y = ghost_y;
        }
        self.player = Some(active);

        self.lock_piece();
        self.drop_counter_ms = 0;
    }

    /// Lock the active piece: merge, shrink, sweep, score, then spawn the next piece
    ///
    /// The shrink runs before the sweep, so rows completed by the new walls are
    /// cleared and scored by this same lock.
    fn lock_piece(&mut self) {
        let Some(active) = self.player.take() else {
            return;
        };

        self.arena.merge(&active.matrix, active.x, active.y);
        self.pieces_placed += 1;
        let shrunk = self.maybe_shrink();

        let lines_cleared = self.arena.sweep();
        let line_clear_score = line_clear_score(lines_cleared);
        self.score = self.score.saturating_add(line_clear_score);
        if self.score > self.high_score {
            self.high_score = self.score;
        }

        debug!(
            "locked {:?} at ({}, {}): {} line(s), +{} points, {} placed",
            active.kind, active.x, active.y, lines_cleared, line_clear_score, self.pieces_placed
        );

        let spawned = self.spawn_piece();

        self.last_event = Some(CoreLastEvent {
            lines_cleared,
            line_clear_score,
            shrunk,
            game_over: !spawned,
        });
    }

    /// Tighten the boundaries once every `SHRINK_EVERY` locked pieces
    fn maybe_shrink(&mut self) -> bool {
        if self.pieces_placed / SHRINK_EVERY <= self.shrink_count {
            return false;
        }
        if !self.arena.shrink() {
            return false;
        }

        self.shrink_count += 1;
        info!(
            "arena shrunk to columns {}..={} after {} pieces",
            self.arena.left(),
            self.arena.right(),
            self.pieces_placed
        );
        true
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<CoreLastEvent> {
        self.last_event.take()
    }

    /// Calculate the ghost piece row (where the active piece would land)
    ///
    /// Returns None without an active piece, or if the active piece is already
    /// in a colliding placement (a blocked spawn).
    pub fn ghost_y(&self) -> Option<i8> {
        let active = self.player?;
        if active.collides(&self.arena) {
            return None;
        }

        let mut y = active.y;
        while !self.arena.collides(&active.matrix, active.x, y + 1) {
            y += 1;
        }
        Some(y)
    }

    /// Advance the drop timer. Returns true when the piece dropped.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.phase.is_playing() {
            return false;
        }

        self.drop_counter_ms = self.drop_counter_ms.saturating_add(elapsed_ms);
        if self.drop_counter_ms > DROP_INTERVAL_MS {
            self.drop_one();
            return true;
        }

        false
    }

    /// Clear the arena and all counters and start a fresh episode
    pub fn restart(&mut self) {
        self.arena.reset();
        self.player = None;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.score = 0;
        self.pieces_placed = 0;
        self.shrink_count = 0;
        self.drop_counter_ms = 0;
        self.last_event = None;
        self.phase = Phase::Playing;

        info!("restarted (episode {})", self.episode_id);
        self.spawn_piece();
    }

    /// Apply a game action
    ///
    /// Returns true if the action changed the session.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match (self.phase, action) {
            (Phase::NotStarted, GameAction::Pause) => self.start(),
            (Phase::Playing, GameAction::Pause) => {
                self.phase = Phase::Paused;
                true
            }
            (Phase::Paused, GameAction::Pause) => {
                self.phase = Phase::Playing;
                true
            }
            (Phase::GameOver, GameAction::Pause | GameAction::Restart) => {
                self.restart();
                true
            }
            (Phase::Playing, _) => self.apply_piece_action(action),
            _ => false,
        }
    }

    fn apply_piece_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.try_move(-1),
            GameAction::MoveRight => self.try_move(1),
            GameAction::SoftDrop => {
                self.drop_one();
                true
            }
            GameAction::HardDrop => {
                self.hard_drop();
                true
            }
            GameAction::RotateCw => self.try_rotate(RotateDir::Cw),
            GameAction::RotateCcw => self.try_rotate(RotateDir::Ccw),
            GameAction::Pause | GameAction::Restart => false,
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing(seed: u32) -> GameSession {
        let mut session = GameSession::new(seed);
        assert!(session.start());
        session
    }

    /// Replace the active piece with a known kind at a known spot.
    fn place(session: &mut GameSession, kind: PieceKind, x: i8, y: i8) {
        session.player = Some(Player {
            kind,
            matrix: Matrix::template(kind),
            x,
            y,
        });
    }

    fn fill_row_except(session: &mut GameSession, y: i8, gaps: &[i8]) {
        for x in 0..ARENA_WIDTH as i8 {
            if !gaps.contains(&x) {
                session.arena.set(x, y, Cell::Block(PieceKind::Z));
            }
        }
    }

    #[test]
    fn test_new_session() {
        let session = GameSession::new(12345);

        assert_eq!(session.phase, Phase::NotStarted);
        assert_eq!(session.score, 0);
        assert_eq!(session.pieces_placed, 0);
        assert_eq!(session.shrink_count, 0);
        assert!(session.player.is_none());
        assert_eq!((session.arena.left(), session.arena.right()), (-1, 30));
    }

    #[test]
    fn test_start_spawns_previewed_piece() {
        let mut session = GameSession::new(12345);
        let next = session.next_piece();

        assert!(session.start());
        assert_eq!(session.phase, Phase::Playing);
        let player = session.player.unwrap();
        assert_eq!(player.kind, next);
        assert_eq!(player.y, 0);
        assert_eq!(player.matrix, Matrix::template(next));

        // Starting twice is a no-op.
        assert!(!session.start());
    }

    #[test]
    fn test_not_started_ignores_piece_input() {
        let mut session = GameSession::new(1);
        assert!(!session.apply_action(GameAction::MoveLeft));
        assert!(!session.apply_action(GameAction::HardDrop));
        assert!(!session.tick(5000));
        assert_eq!(session.phase, Phase::NotStarted);
    }

    #[test]
    fn test_pause_toggles() {
        let mut session = playing(1);

        assert!(session.apply_action(GameAction::Pause));
        assert_eq!(session.phase, Phase::Paused);
        assert!(!session.apply_action(GameAction::MoveLeft));
        assert!(!session.tick(5000));

        assert!(session.apply_action(GameAction::Pause));
        assert_eq!(session.phase, Phase::Playing);
    }

    #[test]
    fn test_move_blocked_by_wall() {
        let mut session = playing(1);
        place(&mut session, PieceKind::O, 0, 5);

        assert!(!session.apply_action(GameAction::MoveLeft));
        assert_eq!(session.player.unwrap().x, 0);
        assert!(session.apply_action(GameAction::MoveRight));
        assert_eq!(session.player.unwrap().x, 1);
    }

    #[test]
    fn test_move_blocked_by_block() {
        let mut session = playing(1);
        place(&mut session, PieceKind::O, 10, 5);
        session.arena.set(12, 5, Cell::Block(PieceKind::I));

        assert!(!session.apply_action(GameAction::MoveRight));
        assert_eq!(session.player.unwrap().x, 10);
    }

    #[test]
    fn test_rotate_in_open_space() {
        let mut session = playing(1);
        place(&mut session, PieceKind::T, 10, 5);

        assert!(session.apply_action(GameAction::RotateCw));
        let player = session.player.unwrap();
        assert_eq!(player.x, 10);
        assert_eq!(player.matrix, Matrix::template(PieceKind::T).rotated(RotateDir::Cw));
    }

    #[test]
    fn test_rotate_kicks_off_left_edge() {
        let mut session = playing(1);
        // Vertical I in column 1 of its matrix, hugging the left edge.
        place(&mut session, PieceKind::I, -1, 5);
        session.player = session.player.map(|mut p| {
            p.matrix = p.matrix.rotated(RotateDir::Ccw);
            p
        });
        assert!(!session.player.unwrap().collides(&session.arena));

        assert!(session.apply_action(GameAction::RotateCw));
        let player = session.player.unwrap();
        assert_eq!(player.x, 0);
        assert!(!player.collides(&session.arena));
    }

    #[test]
    fn test_rotate_rejected_restores_player() {
        let mut session = playing(1);
        place(&mut session, PieceKind::I, 13, 10);
        // Walls of blocks left and right leave only a horizontal tunnel.
        for y in 0..ARENA_HEIGHT as i8 {
            if y != 11 {
                for x in 0..ARENA_WIDTH as i8 {
                    session.arena.set(x, y, Cell::Block(PieceKind::Z));
                }
            }
        }
        let before = session.player;

        assert!(!session.apply_action(GameAction::RotateCw));
        assert_eq!(session.player, before);
        assert!(!session.apply_action(GameAction::RotateCcw));
        assert_eq!(session.player, before);
    }

    #[test]
    fn test_ghost_lands_on_floor() {
        let mut session = playing(1);
        place(&mut session, PieceKind::O, 10, 0);

        assert_eq!(session.ghost_y(), Some(18));
    }

    #[test]
    fn test_ghost_lands_on_stack() {
        let mut session = playing(1);
        place(&mut session, PieceKind::O, 10, 0);
        session.arena.set(11, 12, Cell::Block(PieceKind::L));

        assert_eq!(session.ghost_y(), Some(10));
    }

    #[test]
    fn test_ghost_is_pure() {
        let mut session = playing(7);
        place(&mut session, PieceKind::S, 4, 2);
        let arena_before = session.arena.clone();
        let player_before = session.player;

        let first = session.ghost_y();
        let second = session.ghost_y();

        assert_eq!(first, second);
        assert_eq!(session.arena, arena_before);
        assert_eq!(session.player, player_before);
    }

    #[test]
    fn test_soft_drop_moves_then_locks() {
        let mut session = playing(1);
        place(&mut session, PieceKind::O, 10, 17);

        assert!(session.apply_action(GameAction::SoftDrop));
        assert_eq!(session.player.unwrap().y, 18);
        assert_eq!(session.pieces_placed, 0);

        assert!(session.apply_action(GameAction::SoftDrop));
        assert_eq!(session.pieces_placed, 1);
        assert_eq!(session.arena.get(10, 19), Some(Cell::Block(PieceKind::O)));
        assert_eq!(session.arena.get(11, 18), Some(Cell::Block(PieceKind::O)));
        assert_eq!(session.player.unwrap().y, 0);
    }

    #[test]
    fn test_hard_drop_locks_at_ghost() {
        let mut session = playing(1);
        place(&mut session, PieceKind::I, 5, 0);

        assert!(session.apply_action(GameAction::HardDrop));
        for x in 5..9 {
            assert_eq!(session.arena.get(x, 19), Some(Cell::Block(PieceKind::I)));
        }
        assert_eq!(session.pieces_placed, 1);
        let ev = session.take_last_event().unwrap();
        assert_eq!(ev.lines_cleared, 0);
        assert!(!ev.game_over);
        assert!(session.take_last_event().is_none());
    }

    #[test]
    fn test_single_line_clear_scores_100() {
        let mut session = playing(1);
        fill_row_except(&mut session, 19, &[5, 6, 7, 8]);
        place(&mut session, PieceKind::I, 5, 0);

        session.apply_action(GameAction::HardDrop);

        assert_eq!(session.score, 100);
        assert_eq!(session.high_score, 100);
        assert!(session.arena.cells()[19 * 30..].iter().all(|c| c.is_empty()));
        let ev = session.take_last_event().unwrap();
        assert_eq!(ev.lines_cleared, 1);
        assert_eq!(ev.line_clear_score, 100);
    }

    #[test]
    fn test_four_line_clear_scores_800() {
        let mut session = playing(1);
        for y in 16..20 {
            fill_row_except(&mut session, y, &[20]);
        }
        // Vertical I: rotate clockwise puts the blocks in matrix column 2.
        place(&mut session, PieceKind::I, 18, 0);
        session.player = session.player.map(|mut p| {
            p.matrix = p.matrix.rotated(RotateDir::Cw);
            p
        });

        session.apply_action(GameAction::HardDrop);

        assert_eq!(session.score, 800);
        assert!(session.arena.cells().iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_timed_drop_after_interval() {
        let mut session = playing(1);
        place(&mut session, PieceKind::T, 10, 0);

        assert!(!session.tick(DROP_INTERVAL_MS));
        assert_eq!(session.player.unwrap().y, 0);

        assert!(session.tick(FRAME_MS));
        assert_eq!(session.player.unwrap().y, 1);
        assert_eq!(session.drop_counter_ms, 0);
    }

    #[test]
    fn test_shrink_after_25_locks() {
        let mut session = playing(1);
        session.pieces_placed = 24;
        place(&mut session, PieceKind::O, 10, 0);

        session.apply_action(GameAction::HardDrop);

        assert_eq!(session.pieces_placed, 25);
        assert_eq!(session.shrink_count, 1);
        assert_eq!((session.arena.left(), session.arena.right()), (0, 29));
        assert!(session.take_last_event().unwrap().shrunk);
        for y in 0..ARENA_HEIGHT as i8 {
            assert_eq!(session.arena.get(0, y), Some(Cell::Wall));
            assert_eq!(session.arena.get(29, y), Some(Cell::Wall));
        }

        // No further shrink until 25 more locks.
        for _ in 0..5 {
            session.apply_action(GameAction::HardDrop);
        }
        assert_eq!(session.pieces_placed, 30);
        assert_eq!(session.shrink_count, 1);

        session.pieces_placed = 49;
        session.apply_action(GameAction::HardDrop);
        assert_eq!(session.shrink_count, 2);
        assert_eq!((session.arena.left(), session.arena.right()), (1, 28));
    }

    #[test]
    fn test_shrink_respects_minimum_span() {
        let mut session = playing(1);
        while session.arena.shrink() {}
        let bounds = (session.arena.left(), session.arena.right());
        session.pieces_placed = 24;
        place(&mut session, PieceKind::O, bounds.0 + 1, 0);

        session.apply_action(GameAction::HardDrop);

        assert_eq!((session.arena.left(), session.arena.right()), bounds);
        assert_eq!(session.shrink_count, 0);
    }

    #[test]
    fn test_shrink_completes_rows_in_same_lock() {
        let mut session = playing(1);
        // Only the columns the new walls will cover are missing.
        fill_row_except(&mut session, 19, &[0, 29]);
        session.pieces_placed = 24;
        place(&mut session, PieceKind::O, 10, 0);

        session.apply_action(GameAction::HardDrop);

        let ev = session.take_last_event().unwrap();
        assert!(ev.shrunk);
        assert_eq!(ev.lines_cleared, 1);
        assert_eq!(session.score, 100);
        assert!(!session.arena.is_row_full(19));
        // The O landed on row 18 and shifted down with it.
        assert_eq!(session.arena.get(10, 19), Some(Cell::Block(PieceKind::O)));
        assert_eq!(session.arena.get(0, 19), Some(Cell::Wall));
    }

    #[test]
    fn test_shrink_sweeps_more_than_four_rows() {
        let mut session = playing(1);
        for y in 14..20 {
            fill_row_except(&mut session, y, &[0, 29]);
        }
        session.pieces_placed = 24;
        place(&mut session, PieceKind::O, 10, 0);

        session.apply_action(GameAction::HardDrop);

        let ev = session.take_last_event().unwrap();
        assert!(ev.shrunk);
        assert_eq!(ev.lines_cleared, 6);
        assert_eq!(ev.line_clear_score, 6 * OVERFLOW_LINE_SCORE);
        assert_eq!(session.score, 1200);
        for y in 14..20 {
            assert!(!session.arena.is_row_full(y));
        }
    }

    #[test]
    fn test_blocked_spawn_is_game_over() {
        let mut session = playing(1);
        for y in 0..3 {
            fill_row_except(&mut session, y, &[0]);
        }
        place(&mut session, PieceKind::O, 0, 17);

        session.apply_action(GameAction::HardDrop);

        assert_eq!(session.phase, Phase::GameOver);
        assert!(session.take_last_event().unwrap().game_over);
        assert_eq!(session.ghost_y(), None);

        // Drops and movement are ignored.
        let arena_before = session.arena.clone();
        assert!(!session.apply_action(GameAction::MoveLeft));
        assert!(!session.apply_action(GameAction::HardDrop));
        assert!(!session.tick(5000));
        assert_eq!(session.arena, arena_before);
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut session = playing(3);
        session.score = 1500;
        session.high_score = 1500;
        session.pieces_placed = 60;
        session.shrink_count = 2;
        session.arena.shrink();
        session.arena.shrink();
        session.arena.set(5, 19, Cell::Block(PieceKind::J));
        session.phase = Phase::GameOver;

        assert!(session.apply_action(GameAction::Restart));

        assert_eq!(session.phase, Phase::Playing);
        assert_eq!(session.score, 0);
        assert_eq!(session.high_score, 1500);
        assert_eq!(session.pieces_placed, 0);
        assert_eq!(session.shrink_count, 0);
        assert_eq!(session.episode_id, 1);
        assert_eq!((session.arena.left(), session.arena.right()), (-1, 30));
        assert!(session.arena.cells().iter().all(|c| c.is_empty()));
        assert!(session.player.is_some());
    }

    #[test]
    fn test_restart_ignored_while_playing() {
        let mut session = playing(3);
        assert!(!session.apply_action(GameAction::Restart));
        assert_eq!(session.episode_id, 0);
    }

    #[test]
    fn test_with_high_score_never_lowers() {
        let session = GameSession::new(1).with_high_score(900);
        assert_eq!(session.high_score(), 900);
        let session = session.with_high_score(100);
        assert_eq!(session.high_score(), 900);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut session = playing(5);
        place(&mut session, PieceKind::O, 10, 0);
        let snap = session.snapshot();

        assert_eq!(snap.phase, Phase::Playing);
        assert_eq!(snap.left, -1);
        assert_eq!(snap.right, 30);
        assert_eq!(snap.active.unwrap().kind, PieceKind::O);
        assert_eq!(snap.ghost_y, Some(18));
        assert_eq!(snap.next, session.next_piece());
    }
}
