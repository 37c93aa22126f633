//! Viewport module for pan/zoom transforms and background grid weighting.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Coarse grid fades in below this scale.
pub const COARSE_THRESHOLD: f64 = 0.3;
/// Medium grid fades in below this scale.
pub const MEDIUM_THRESHOLD: f64 = 0.6;
/// Fine grid fades in above this scale.
pub const FINE_THRESHOLD: f64 = 1.5;

/// Step multiplier of the coarse grid layer.
pub const COARSE_MULTIPLIER: f64 = 20.0;
/// Step multiplier of the medium grid layer.
pub const MEDIUM_MULTIPLIER: f64 = 4.0;
/// Step multiplier of the fine grid layer.
pub const FINE_MULTIPLIER: f64 = 0.5;

/// Blend weights of the four background grid densities, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridWeights {
    pub coarse: f64,
    pub medium: f64,
    pub base: f64,
    pub fine: f64,
}

/// One background grid layer to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayer {
    /// Spacing between lines in scene units.
    pub step: f64,
    /// Opacity weight, `0.0` means skip.
    pub weight: f64,
}

/// Viewport manages the scene-to-screen transform.
///
/// `screen = scene * scale + origin`. The scale is clamped to
/// `[min_scale, max_scale]`; the origin is unbounded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    scale: f64,
    /// Scene-to-screen translation in device-independent pixels.
    origin: Vec2,
    min_scale: f64,
    max_scale: f64,
    /// Grid spacing at scale 1.
    base_step: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.1, 2.0, 40.0)
    }
}

impl Viewport {
    /// Create a viewport at scale 1 (clamped into bounds) with zero origin.
    pub fn new(min_scale: f64, max_scale: f64, base_step: f64) -> Self {
        let (min_scale, max_scale) = if min_scale <= max_scale {
            (min_scale, max_scale)
        } else {
            (max_scale, min_scale)
        };
        Self {
            scale: 1.0_f64.clamp(min_scale, max_scale),
            origin: Vec2::ZERO,
            min_scale,
            max_scale,
            base_step,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }

    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }

    pub fn base_step(&self) -> f64 {
        self.base_step
    }

    /// Set scale (clamped) and origin (unclamped).
    pub fn set_transform(&mut self, scale: f64, origin_x: f64, origin_y: f64) {
        self.scale = if scale.is_nan() {
            self.scale
        } else {
            scale.clamp(self.min_scale, self.max_scale)
        };
        self.origin = Vec2::new(origin_x, origin_y);
    }

    /// Get the affine transform for rendering (scene to screen).
    pub fn transform(&self) -> Affine {
        Affine::translate(self.origin) * Affine::scale(self.scale)
    }

    /// Convert a screen point to scene coordinates.
    pub fn to_scene(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.origin.x) / self.scale,
            (screen.y - self.origin.y) / self.scale,
        )
    }

    /// Convert a scene point to screen coordinates.
    pub fn to_screen(&self, scene: Point) -> Point {
        Point::new(
            scene.x * self.scale + self.origin.x,
            scene.y * self.scale + self.origin.y,
        )
    }

    /// Pan the viewport by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.origin += delta;
    }

    /// Zoom by `factor`, keeping the scene point under `screen_point` fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let anchor = self.to_scene(screen_point);
        let new_scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return;
        }
        self.set_transform(
            new_scale,
            screen_point.x - anchor.x * new_scale,
            screen_point.y - anchor.y * new_scale,
        );
    }

    /// Center `bounds` in a viewport of `size` without changing the scale.
    pub fn focus_on(&mut self, bounds: Rect, size: Size) {
        let center = bounds.center();
        let scale = self.scale;
        self.set_transform(
            scale,
            size.width / 2.0 - center.x * scale,
            size.height / 2.0 - center.y * scale,
        );
    }

    /// Rounded zoom level for the indicator ("100%").
    pub fn zoom_percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }

    /// Cross-fade weights of the grid densities at the current scale.
    ///
    /// Each zoomed-out layer ramps linearly from 0 at its threshold to 1 at the
    /// next threshold down (the minimum scale for the coarsest); the fine layer
    /// ramps from 0 at its threshold to 1 at the maximum scale. The base layer
    /// takes whatever weight remains.
    pub fn grid_weights(&self) -> GridWeights {
        let s = self.scale;
        let medium = fade_below(s, MEDIUM_THRESHOLD, COARSE_THRESHOLD);
        let coarse = fade_below(s, COARSE_THRESHOLD, self.min_scale);
        let fine = fade_above(s, FINE_THRESHOLD, self.max_scale);
        let base = (1.0 - (coarse + medium + fine)).max(0.0);
        GridWeights {
            coarse,
            medium,
            base,
            fine,
        }
    }

    /// Grid layers from coarsest to finest with their weights.
    pub fn grid_layers(&self) -> [GridLayer; 4] {
        let w = self.grid_weights();
        [
            GridLayer {
                step: self.base_step * COARSE_MULTIPLIER,
                weight: w.coarse,
            },
            GridLayer {
                step: self.base_step * MEDIUM_MULTIPLIER,
                weight: w.medium,
            },
            GridLayer {
                step: self.base_step,
                weight: w.base,
            },
            GridLayer {
                step: self.base_step * FINE_MULTIPLIER,
                weight: w.fine,
            },
        ]
    }

    /// Visible scene rectangle for a screen of `size`.
    pub fn visible_scene_rect(&self, size: Size) -> Rect {
        Rect::from_points(
            self.to_scene(Point::ZERO),
            self.to_scene(Point::new(size.width, size.height)),
        )
    }
}

/// 0 at `threshold`, rising linearly to 1 at `full` (`full < threshold`).
fn fade_below(scale: f64, threshold: f64, full: f64) -> f64 {
    if scale > threshold {
        return 0.0;
    }
    let span = threshold - full;
    if span <= 0.0 {
        return 1.0;
    }
    ((threshold - scale) / span).min(1.0)
}

/// 0 at `threshold`, rising linearly to 1 at `full` (`full > threshold`).
fn fade_above(scale: f64, threshold: f64, full: f64) -> f64 {
    if scale < threshold {
        return 0.0;
    }
    let span = full - threshold;
    if span <= 0.0 {
        return 1.0;
    }
    ((scale - threshold) / span).min(1.0)
}
