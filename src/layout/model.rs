use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAIN_WINDOW: &str = "main";
pub const OVERLAY_WINDOW: &str = "overlay";
pub const DETAIL_POPUP_WINDOW: &str = "detail-popup";

/// Screen position of a window's top-left corner as reported by the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhysicalPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

/// Position in the layout coordinate space (physical divided by scale factor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogicalPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogicalSize {
    pub width: u32,
    pub height: u32,
}

impl PhysicalPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl PhysicalSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl LogicalPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl LogicalSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Physical-pixel geometry of one window. This is the shape persisted per label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub window_id: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowGeometry {
    pub fn from_parts(window_id: &str, position: PhysicalPosition, size: PhysicalSize) -> Self {
        Self {
            window_id: window_id.to_string(),
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn position(&self) -> PhysicalPosition {
        PhysicalPosition::new(self.x, self.y)
    }

    pub fn size(&self) -> PhysicalSize {
        PhysicalSize::new(self.width, self.height)
    }
}

/// Screen rectangle in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhysicalRect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl PhysicalRect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, point: (i32, i32)) -> bool {
        let right = self.x as i64 + self.w as i64;
        let bottom = self.y as i64 + self.h as i64;
        (point.0 as i64) >= self.x as i64
            && (point.0 as i64) < right
            && (point.1 as i64) >= self.y as i64
            && (point.1 as i64) < bottom
    }
}

/// Window-local rectangle as measured by layout. Fractional because layout
/// measurement is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LogicalRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl LogicalRect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_empty(&self) -> bool {
        !(self.w > 0.0 && self.h > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonitorInfo {
    pub origin_x: i32,
    pub origin_y: i32,
    pub width_physical: u32,
    pub height_physical: u32,
    pub scale_factor: f64,
}

impl Default for MonitorInfo {
    fn default() -> Self {
        Self {
            origin_x: 0,
            origin_y: 0,
            width_physical: 1920,
            height_physical: 1080,
            scale_factor: 1.0,
        }
    }
}

impl MonitorInfo {
    pub fn has_valid_scale(&self) -> bool {
        self.scale_factor.is_finite() && self.scale_factor > 0.0
    }

    pub fn physical_rect(&self) -> PhysicalRect {
        PhysicalRect::new(
            self.origin_x,
            self.origin_y,
            self.width_physical,
            self.height_physical,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Version/splash screen shown at startup, centered on the monitor.
    #[default]
    Splash,
    Expanded,
    /// Same width and position as expanded, reduced to the collapsed bar height.
    Collapsed,
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutMode::Splash => write!(f, "splash"),
            LayoutMode::Expanded => write!(f, "expanded"),
            LayoutMode::Collapsed => write!(f, "collapsed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRole {
    /// Control panel; follows the layout mode and the user's drag/resize.
    Panel,
    /// Transparent click-through overlay covering the game.
    Overlay,
    /// Floating detail popup; keeps whatever geometry the user gave it.
    DetailPopup,
}

impl WindowRole {
    pub fn default_label(self) -> &'static str {
        match self {
            WindowRole::Panel => MAIN_WINDOW,
            WindowRole::Overlay => OVERLAY_WINDOW,
            WindowRole::DetailPopup => DETAIL_POPUP_WINDOW,
        }
    }
}

/// Last user-confirmed geometry. Never written from reconciliation output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RememberedGeometry {
    pub position: Option<PhysicalPosition>,
    pub size: LogicalSize,
    /// False when neither storage nor the legacy cache knew a height and the
    /// default was derived from the monitor.
    pub has_saved_height: bool,
}

impl RememberedGeometry {
    pub fn new(position: Option<PhysicalPosition>, size: LogicalSize) -> Self {
        Self {
            position,
            size,
            has_saved_height: true,
        }
    }
}
