use crate::pieces::Matrix;
use crate::session::Player;
use crate::types::{PieceKind, Phase, ARENA_HEIGHT, ARENA_WIDTH};

pub type TagGrid = [[u8; ARENA_WIDTH as usize]; ARENA_HEIGHT as usize];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub matrix: Matrix,
    pub x: i8,
    pub y: i8,
}

impl From<Player> for ActiveSnapshot {
    fn from(value: Player) -> Self {
        Self {
            kind: value.kind,
            matrix: value.matrix,
            x: value.x,
            y: value.y,
        }
    }
}

/// Read-only view of a session, as consumed by renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    /// Cell tags: 0 empty, 1-7 blocks, 8 walls.
    pub arena: TagGrid,
    pub left: i8,
    pub right: i8,
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub next: PieceKind,
    pub phase: Phase,
    pub episode_id: u32,
    pub score: u32,
    pub high_score: u32,
    pub pieces_placed: u32,
    pub shrink_count: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.arena = [[0u8; ARENA_WIDTH as usize]; ARENA_HEIGHT as usize];
        self.left = -1;
        self.right = ARENA_WIDTH as i8;
        self.active = None;
        self.ghost_y = None;
        self.next = PieceKind::T;
        self.phase = Phase::NotStarted;
        self.episode_id = 0;
        self.score = 0;
        self.high_score = 0;
        self.pieces_placed = 0;
        self.shrink_count = 0;
    }

    /// Number of open columns strictly between the boundaries.
    pub fn playable_width(&self) -> u8 {
        let lo = (self.left + 1).max(0);
        let hi = (self.right - 1).min(ARENA_WIDTH as i8 - 1);
        (hi - lo + 1).max(0) as u8
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            arena: [[0u8; ARENA_WIDTH as usize]; ARENA_HEIGHT as usize],
            left: 0,
            right: 0,
            active: None,
            ghost_y: None,
            next: PieceKind::T,
            phase: Phase::NotStarted,
            episode_id: 0,
            score: 0,
            high_score: 0,
            pieces_placed: 0,
            shrink_count: 0,
        };
        s.clear();
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playable_width_tracks_boundaries() {
        let mut snap = GameSnapshot::default();
        assert_eq!(snap.playable_width(), 30);

        snap.left = 0;
        snap.right = 29;
        assert_eq!(snap.playable_width(), 28);

        snap.left = 13;
        snap.right = 16;
        assert_eq!(snap.playable_width(), 2);
    }
}
