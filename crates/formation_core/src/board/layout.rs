//! Pitch geometry
//!
//! Landscape pitch, own goal on the left:
//! - x: 0 = own goal line, 100 = opponent goal line (horizontal, pixels grow right)
//! - y: 0 = left touchline, 100 = right touchline (vertical, pixels grow down)
//!
//! The bench is a strip of equal cells below the pitch, separated by a gap.
//! Cells are inset by half the gap, so the strip has margins that belong to no
//! cell.

use serde::Serialize;

use crate::config::BoardConfig;
use crate::models::Location;
use crate::presets::Slot;

/// Pitch height over width
pub const ASPECT_RATIO: f32 = 9.0 / 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn contains(&self, point: Point) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PitchLayout {
    width: f32,
    bench_capacity: usize,
    chip_radius_ratio: f32,
    bench_height_ratio: f32,
    bench_gap: f32,
}

impl PitchLayout {
    pub fn new(width: f32, config: &BoardConfig) -> Self {
        let mut layout = Self {
            width: 0.0,
            bench_capacity: config.bench_capacity,
            chip_radius_ratio: config.chip_radius_ratio,
            bench_height_ratio: config.bench_height_ratio,
            bench_gap: config.bench_gap_px,
        };
        layout.resize(width);
        layout
    }

    /// Container was measured again. Everything derived follows from the width.
    pub fn resize(&mut self, width: f32) {
        self.width = if width.is_finite() { width.max(0.0) } else { 0.0 };
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.width * ASPECT_RATIO
    }

    /// Pitch, gap and bench strip together
    pub fn total_height(&self) -> f32 {
        let bench = self.bench_rect();
        bench.y + bench.height
    }

    pub fn chip_radius(&self) -> f32 {
        self.width * self.chip_radius_ratio
    }

    pub fn pitch_rect(&self) -> Rect {
        Rect { x: 0.0, y: 0.0, width: self.width, height: self.height() }
    }

    pub fn to_pixels(&self, x_norm: f32, y_norm: f32) -> Point {
        Point::new(x_norm / 100.0 * self.width, y_norm / 100.0 * self.height())
    }

    /// Inverse of `to_pixels`; `None` off the pitch or before the first measure
    pub fn to_norm(&self, point: Point) -> Option<(f32, f32)> {
        if !self.pitch_rect().contains(point) {
            return None;
        }
        Some((point.x / self.width * 100.0, point.y / self.height() * 100.0))
    }

    pub fn slot_point(&self, slot: &Slot) -> Point {
        self.to_pixels(slot.x_norm, slot.y_norm)
    }

    /// Closest slot marker whose chip circle contains `point`
    pub fn slot_at<'a>(&self, slots: &'a [Slot], point: Point) -> Option<&'a Slot> {
        let radius = self.chip_radius();
        if radius <= 0.0 {
            return None;
        }
        slots
            .iter()
            .map(|slot| (slot, self.slot_point(slot).distance(point)))
            .filter(|(_, distance)| *distance <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(slot, _)| slot)
    }

    pub fn bench_rect(&self) -> Rect {
        Rect {
            x: 0.0,
            y: self.height() + self.bench_gap,
            width: self.width,
            height: self.width * self.bench_height_ratio,
        }
    }

    pub fn bench_cell(&self, index: usize) -> Option<Rect> {
        if index >= self.bench_capacity {
            return None;
        }
        let strip = self.bench_rect();
        let cell_width = strip.width / self.bench_capacity as f32;
        let inset = self.bench_gap / 2.0;
        Some(Rect {
            x: strip.x + cell_width * index as f32 + inset,
            y: strip.y + inset,
            width: (cell_width - 2.0 * inset).max(0.0),
            height: (strip.height - 2.0 * inset).max(0.0),
        })
    }

    pub fn bench_cell_at(&self, point: Point) -> Option<usize> {
        (0..self.bench_capacity).find(|&index| {
            self.bench_cell(index).map_or(false, |cell| cell.contains(point))
        })
    }

    pub fn in_bench(&self, point: Point) -> bool {
        self.bench_rect().contains(point)
    }

    /// Where a chip is drawn; unassigned players have no place on the board
    pub fn chip_point(&self, slots: &[Slot], location: &Location) -> Option<Point> {
        match location {
            Location::Slot(position) => slots
                .iter()
                .find(|slot| &slot.position_id == position)
                .map(|slot| self.slot_point(slot)),
            Location::Bench(index) => self.bench_cell(*index).map(|cell| cell.center()),
            Location::Unassigned => None,
        }
    }
}
