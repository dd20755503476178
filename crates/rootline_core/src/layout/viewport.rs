//! Zoom and auto-fit scaling.
//!
//! # Invariants
//! - Zoom stays within `MIN_ZOOM..=MAX_ZOOM` percent.
//! - Auto-fit only ever shrinks; it never enlarges a tree past 1.0.

use super::geometry::{Point, Size};

pub const MIN_ZOOM: u16 = 50;
pub const MAX_ZOOM: u16 = 200;
pub const ZOOM_STEP: u16 = 10;
pub const DEFAULT_ZOOM: u16 = 100;

/// User zoom in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zoom(u16);

impl Default for Zoom {
    fn default() -> Self {
        Self(DEFAULT_ZOOM)
    }
}

impl Zoom {
    /// Clamped into the allowed range.
    pub fn new(percent: u16) -> Self {
        Self(percent.clamp(MIN_ZOOM, MAX_ZOOM))
    }

    pub fn percent(self) -> u16 {
        self.0
    }

    pub fn factor(self) -> f32 {
        f32::from(self.0) / 100.0
    }

    pub fn zoom_in(&mut self) -> u16 {
        self.0 = (self.0 + ZOOM_STEP).min(MAX_ZOOM);
        self.0
    }

    pub fn zoom_out(&mut self) -> u16 {
        self.0 = self.0.saturating_sub(ZOOM_STEP).max(MIN_ZOOM);
        self.0
    }

    pub fn reset(&mut self) {
        self.0 = DEFAULT_ZOOM;
    }
}

/// `min(viewport.w / natural.w, viewport.h / natural.h, 1.0)`.
///
/// A non-positive dimension on either side contributes a ratio of 1.
pub fn auto_fit_scale(natural: Size, viewport: Size) -> f32 {
    let ratio = |view: f32, content: f32| {
        if view <= 0.0 || content <= 0.0 {
            1.0
        } else {
            view / content
        }
    };
    ratio(viewport.width, natural.width)
        .min(ratio(viewport.height, natural.height))
        .min(1.0)
}

/// Visible area plus user zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub size: Size,
    pub zoom: Zoom,
}

impl Viewport {
    pub fn new(size: Size, zoom: Zoom) -> Self {
        Self { size, zoom }
    }

    /// Zoom factor times auto-fit for a tree of `natural` size.
    pub fn effective_scale(&self, natural: Size) -> f32 {
        self.zoom.factor() * auto_fit_scale(natural, self.size)
    }

    /// Maps a screen point back into layout coordinates.
    pub fn to_layout(&self, screen: Point, natural: Size) -> Point {
        let scale = self.effective_scale(natural);
        Point::new(screen.x / scale, screen.y / scale)
    }
}
