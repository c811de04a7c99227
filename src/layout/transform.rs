//! Conversions between physical pixels (what the window system reports) and
//! logical pixels (what layout math uses).
//!
//! Every conversion in the crate goes through [`round_half_up`] so repeated
//! round-trips stay within one pixel. Callers are responsible for rejecting a
//! non-positive scale factor before getting here.

use crate::layout::model::{
    LogicalPosition, LogicalRect, LogicalSize, MonitorInfo, PhysicalPosition, PhysicalRect,
    PhysicalSize,
};

pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn to_logical(physical: i64, scale_factor: f64) -> i64 {
    round_half_up(physical as f64 / scale_factor)
}

pub fn to_physical(logical: i64, scale_factor: f64) -> i64 {
    round_half_up(logical as f64 * scale_factor)
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

fn clamp_u32(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

pub fn position_to_logical(position: PhysicalPosition, scale_factor: f64) -> LogicalPosition {
    LogicalPosition::new(
        clamp_i32(to_logical(position.x as i64, scale_factor)),
        clamp_i32(to_logical(position.y as i64, scale_factor)),
    )
}

pub fn position_to_physical(position: LogicalPosition, scale_factor: f64) -> PhysicalPosition {
    PhysicalPosition::new(
        clamp_i32(to_physical(position.x as i64, scale_factor)),
        clamp_i32(to_physical(position.y as i64, scale_factor)),
    )
}

pub fn size_to_logical(size: PhysicalSize, scale_factor: f64) -> LogicalSize {
    LogicalSize::new(
        clamp_u32(to_logical(size.width as i64, scale_factor)),
        clamp_u32(to_logical(size.height as i64, scale_factor)),
    )
}

pub fn size_to_physical(size: LogicalSize, scale_factor: f64) -> PhysicalSize {
    PhysicalSize::new(
        clamp_u32(to_physical(size.width as i64, scale_factor)),
        clamp_u32(to_physical(size.height as i64, scale_factor)),
    )
}

/// Monitor area in logical pixels as `(origin, size)`.
pub fn monitor_logical_bounds(monitor: &MonitorInfo) -> (LogicalPosition, LogicalSize) {
    let scale = monitor.scale_factor;
    (
        position_to_logical(
            PhysicalPosition::new(monitor.origin_x, monitor.origin_y),
            scale,
        ),
        size_to_logical(
            PhysicalSize::new(monitor.width_physical, monitor.height_physical),
            scale,
        ),
    )
}

/// Map a window-local logical rect to a physical screen rect, given the
/// window's physical origin.
pub fn local_rect_to_screen(
    rect: LogicalRect,
    scale_factor: f64,
    window_origin: PhysicalPosition,
) -> PhysicalRect {
    PhysicalRect::new(
        clamp_i32(window_origin.x as i64 + round_half_up(rect.x * scale_factor)),
        clamp_i32(window_origin.y as i64 + round_half_up(rect.y * scale_factor)),
        clamp_u32(round_half_up(rect.w * scale_factor)),
        clamp_u32(round_half_up(rect.h * scale_factor)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCALES: [f64; 4] = [1.0, 1.25, 1.5, 2.0];

    #[test]
    fn physical_logical_round_trip_stays_within_one_pixel() {
        for scale in SCALES {
            for p in 1..=4096i64 {
                let back = to_physical(to_logical(p, scale), scale);
                assert!(
                    (back - p).abs() <= 1,
                    "p={p} scale={scale} came back as {back}"
                );
            }
        }
    }

    #[test]
    fn rounding_is_half_up_for_negative_coordinates_too() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
        assert_eq!(to_logical(-1920, 1.5), -1280);
        assert_eq!(to_logical(3, 2.0), 2);
    }

    #[test]
    fn monitor_bounds_scale_origin_and_size() {
        let monitor = MonitorInfo {
            origin_x: 2560,
            origin_y: 0,
            width_physical: 3840,
            height_physical: 2160,
            scale_factor: 1.5,
        };
        let (origin, size) = monitor_logical_bounds(&monitor);
        assert_eq!(origin, LogicalPosition::new(1707, 0));
        assert_eq!(size, LogicalSize::new(2560, 1440));
    }

    #[test]
    fn local_rect_maps_to_screen_with_origin_offset() {
        let rect = local_rect_to_screen(
            LogicalRect::new(10.0, 10.0, 300.0, 200.0),
            1.5,
            PhysicalPosition::new(100, 50),
        );
        assert_eq!(rect, PhysicalRect::new(115, 65, 450, 300));
    }
}
