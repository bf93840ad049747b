//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, Matrix};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Phase, ARENA_HEIGHT, ARENA_WIDTH, WALL_TAG};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Columns reserved right of the frame for the score/next panel.
const PANEL_W: u16 = 14;
const PANEL_GAP: u16 = 2;

const PLAY_BG: Rgb = Rgb::new(0, 0, 0);
const DEAD_BG: Rgb = Rgb::new(18, 18, 22);

/// A lightweight terminal renderer for the game.
pub struct GameView {
    /// Arena cell width in terminal columns.
    cell_w: u16,
    /// Arena cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

/// Layout of one frame, computed from the viewport.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render a snapshot into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(crate::fb::Cell::default());

        let frame = self.frame(viewport);

        fb.fill_rect(
            frame.x + 1,
            frame.y + 1,
            frame.w - 2,
            frame.h - 2,
            ' ',
            CellStyle::plain(PLAY_BG, PLAY_BG),
        );
        self.draw_border(fb, frame);

        match snap.phase {
            Phase::NotStarted => {
                self.draw_overlay(fb, frame, &[("SHRINKTRIS", None), ("Press SPACE to Start", None)]);
            }
            Phase::Playing | Phase::Paused => {
                self.draw_arena(fb, frame, snap);
                self.draw_pieces(fb, frame, snap);
                if snap.phase == Phase::Paused {
                    self.draw_overlay(fb, frame, &[("PAUSED", None)]);
                }
            }
            Phase::GameOver => {
                self.draw_arena(fb, frame, snap);
                self.draw_overlay(
                    fb,
                    frame,
                    &[
                        ("GAME OVER", None),
                        ("Score ", Some(snap.score)),
                        ("High Score ", Some(snap.high_score)),
                        ("Press SPACE to Restart", None),
                    ],
                );
            }
        }

        self.draw_side_panel(fb, snap, viewport, frame);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn frame(&self, viewport: Viewport) -> Frame {
        let w = ARENA_WIDTH as u16 * self.cell_w + 2;
        let h = ARENA_HEIGHT as u16 * self.cell_h + 2;
        let total_w = w + PANEL_GAP + PANEL_W;

        let x = viewport.width.saturating_sub(total_w) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(h) / 2,
            AnchorY::Top => 0,
        };
        Frame { x, y, w, h }
    }

    fn draw_border(&self, fb: &mut FrameBuffer, f: Frame) {
        let style = CellStyle::plain(Rgb::new(200, 200, 200), PLAY_BG);

        fb.put_char(f.x, f.y, '┌', style);
        fb.put_char(f.x + f.w - 1, f.y, '┐', style);
        fb.put_char(f.x, f.y + f.h - 1, '└', style);
        fb.put_char(f.x + f.w - 1, f.y + f.h - 1, '┘', style);

        for dx in 1..f.w - 1 {
            fb.put_char(f.x + dx, f.y, '─', style);
            fb.put_char(f.x + dx, f.y + f.h - 1, '─', style);
        }
        for dy in 1..f.h - 1 {
            fb.put_char(f.x, f.y + dy, '│', style);
            fb.put_char(f.x + f.w - 1, f.y + dy, '│', style);
        }
    }

    fn draw_arena(&self, fb: &mut FrameBuffer, f: Frame, snap: &GameSnapshot) {
        for y in 0..ARENA_HEIGHT as u16 {
            for x in 0..ARENA_WIDTH as u16 {
                let tag = snap.arena[y as usize][x as usize];
                let outside = (x as i8) < snap.left || (x as i8) > snap.right;
                match tag {
                    0 if outside => {
                        let style = CellStyle::plain(DEAD_BG, DEAD_BG);
                        self.fill_cell(fb, f, x, y, ' ', style);
                    }
                    0 => {
                        let style = CellStyle::plain(Rgb::new(60, 60, 70), PLAY_BG).dim();
                        self.fill_cell(fb, f, x, y, '·', style);
                    }
                    WALL_TAG => {
                        let style = CellStyle::plain(tag_color(tag), PLAY_BG);
                        self.fill_cell(fb, f, x, y, '▓', style);
                    }
                    _ => {
                        let style = CellStyle::plain(tag_color(tag), PLAY_BG).bold();
                        self.fill_cell(fb, f, x, y, '█', style);
                    }
                }
            }
        }
    }

    fn draw_pieces(&self, fb: &mut FrameBuffer, f: Frame, snap: &GameSnapshot) {
        let Some(active) = snap.active else {
            return;
        };
        let color = tag_color(active.kind.tag());

        if let Some(ghost_y) = snap.ghost_y {
            let style = CellStyle::plain(color.mix(Rgb::new(40, 40, 40)), PLAY_BG).dim();
            self.draw_matrix(fb, f, &active.matrix, active.x, ghost_y, '░', style);
        }

        let style = CellStyle::plain(color, PLAY_BG).bold();
        self.draw_matrix(fb, f, &active.matrix, active.x, active.y, '█', style);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_matrix(
        &self,
        fb: &mut FrameBuffer,
        f: Frame,
        matrix: &Matrix,
        x: i8,
        y: i8,
        ch: char,
        style: CellStyle,
    ) {
        for &(dx, dy, _) in matrix.occupied().iter() {
            let cx = x + dx;
            let cy = y + dy;
            if cx >= 0 && cx < ARENA_WIDTH as i8 && cy >= 0 && cy < ARENA_HEIGHT as i8 {
                self.fill_cell(fb, f, cx as u16, cy as u16, ch, style);
            }
        }
    }

    fn fill_cell(&self, fb: &mut FrameBuffer, f: Frame, x: u16, y: u16, ch: char, style: CellStyle) {
        let px = f.x + 1 + x * self.cell_w;
        let py = f.y + 1 + y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, viewport: Viewport, f: Frame) {
        let panel_x = f.x.saturating_add(f.w).saturating_add(PANEL_GAP);
        if panel_x >= viewport.width || viewport.width - panel_x < 10 {
            return;
        }

        let label = CellStyle::plain(Rgb::new(220, 220, 220), PLAY_BG).bold();
        let value = CellStyle::plain(Rgb::new(200, 200, 200), PLAY_BG);

        let mut y = f.y;
        fb.put_str(panel_x, y, "SCORE", label);
        fb.put_u32(panel_x, y + 1, snap.score, value);
        y += 3;

        fb.put_str(panel_x, y, "HIGH", label);
        fb.put_u32(panel_x, y + 1, snap.high_score, value);
        y += 3;

        fb.put_str(panel_x, y, "NEXT", label);
        y += 1;
        let preview = Matrix::template(snap.next);
        let size = preview.size() as u16;
        let off = (4 - size) / 2;
        let style = CellStyle::plain(tag_color(snap.next.tag()), PLAY_BG).bold();
        for &(dx, dy, _) in preview.occupied().iter() {
            let px = panel_x + (off + dx as u16) * self.cell_w;
            let py = y + (off + dy as u16) * self.cell_h;
            fb.fill_rect(px, py, self.cell_w, self.cell_h, '█', style);
        }
        y += 4 * self.cell_h + 1;

        fb.put_str(panel_x, y, "PIECES", label);
        fb.put_u32(panel_x, y + 1, snap.pieces_placed, value);
        y += 3;

        fb.put_str(panel_x, y, "WIDTH", label);
        fb.put_u32(panel_x, y + 1, snap.playable_width() as u32, value);
    }

    /// Centre lines of text (with optional trailing numbers) over the arena.
    fn draw_overlay(&self, fb: &mut FrameBuffer, f: Frame, lines: &[(&str, Option<u32>)]) {
        let style = CellStyle::plain(Rgb::new(255, 255, 255), PLAY_BG).bold();
        let top = f.y + f.h / 2 - (lines.len() as u16) / 2;

        for (i, &(text, number)) in lines.iter().enumerate() {
            let y = top + i as u16 * 2;
            let text_w = text.chars().count() as u16;
            let w = text_w + number.map_or(0, digit_count);
            let x = f.x + f.w.saturating_sub(w) / 2;
            fb.put_str(x, y, text, style);
            if let Some(n) = number {
                fb.put_u32(x + text_w, y, n, style);
            }
        }
    }
}

fn digit_count(mut n: u32) -> u16 {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

/// Palette by cell tag.
pub fn tag_color(tag: u8) -> Rgb {
    match tag {
        1 => Rgb::new(255, 13, 114),
        2 => Rgb::new(13, 194, 255),
        3 => Rgb::new(13, 255, 114),
        4 => Rgb::new(245, 56, 255),
        5 => Rgb::new(255, 142, 13),
        6 => Rgb::new(255, 225, 56),
        7 => Rgb::new(56, 119, 255),
        _ => Rgb::new(136, 136, 136),
    }
}
