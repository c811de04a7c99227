use crate::layout::host::WindowHost;
use crate::layout::model::{MonitorInfo, PhysicalRect};

/// Resolve the monitor for `label`, degrading to [`MonitorInfo::default`]
/// whenever the window system cannot answer. Never fails.
pub fn current_monitor<H: WindowHost + ?Sized>(host: &H, label: &str) -> MonitorInfo {
    match host.current_monitor_info(label) {
        Ok(Some(monitor)) if monitor.has_valid_scale() => monitor,
        Ok(Some(monitor)) => {
            tracing::warn!(
                label = %label,
                scale_factor = monitor.scale_factor,
                "monitor reported an invalid scale factor; using default monitor"
            );
            MonitorInfo::default()
        }
        Ok(None) => {
            tracing::debug!(label = %label, "no monitor available yet; using default monitor");
            MonitorInfo::default()
        }
        Err(err) => {
            tracing::debug!(label = %label, error = %err, "monitor query failed; using default monitor");
            MonitorInfo::default()
        }
    }
}

/// Scale factor for `label`, preferring the window's own answer and falling
/// back to the monitor query.
pub fn current_scale_factor<H: WindowHost + ?Sized>(host: &H, label: &str) -> f64 {
    match host.scale_factor(label) {
        Ok(scale) if scale.is_finite() && scale > 0.0 => scale,
        Ok(scale) => {
            tracing::warn!(label = %label, scale_factor = scale, "window reported an invalid scale factor");
            current_monitor(host, label).scale_factor
        }
        Err(err) => {
            tracing::debug!(label = %label, error = %err, "scale factor query failed");
            current_monitor(host, label).scale_factor
        }
    }
}

pub fn monitor_contains_point(monitor: &MonitorInfo, point: (i32, i32)) -> bool {
    monitor.physical_rect().contains(point)
}

pub fn select_monitor_for_point(
    monitors: &[MonitorInfo],
    point: (i32, i32),
) -> Option<MonitorInfo> {
    monitors
        .iter()
        .copied()
        .find(|monitor| monitor_contains_point(monitor, point))
}

/// Monitor holding the centre of `rect`, else the first monitor.
pub fn select_monitor_for_rect(monitors: &[MonitorInfo], rect: PhysicalRect) -> Option<MonitorInfo> {
    let centre = (
        rect.x.saturating_add((rect.w / 2) as i32),
        rect.y.saturating_add((rect.h / 2) as i32),
    );
    select_monitor_for_point(monitors, centre).or_else(|| monitors.first().copied())
}

/// Monitor under the overlay anchor, so a game window on a secondary display
/// is covered with that display's scale. Falls back to the window's monitor.
pub fn anchor_monitor<H: WindowHost + ?Sized>(
    host: &H,
    label: &str,
    anchor: PhysicalRect,
) -> MonitorInfo {
    let monitors = match host.available_monitors() {
        Ok(monitors) => monitors,
        Err(err) => {
            tracing::debug!(label = %label, error = %err, "monitor enumeration failed");
            Vec::new()
        }
    };
    select_monitor_for_rect(&monitors, anchor)
        .filter(MonitorInfo::has_valid_scale)
        .unwrap_or_else(|| current_monitor(host, label))
}

/// Monitors reported by the operating system. Empty where no platform
/// enumeration exists.
pub fn system_monitors() -> Vec<MonitorInfo> {
    #[cfg(target_os = "windows")]
    {
        platform::enumerate_monitors()
    }
    #[cfg(not(target_os = "windows"))]
    {
        Vec::new()
    }
}

#[cfg(target_os = "windows")]
pub mod platform {
    use crate::layout::model::MonitorInfo;

    /// Every attached monitor with its effective DPI scale.
    pub fn enumerate_monitors() -> Vec<MonitorInfo> {
        use std::mem;
        use windows::Win32::Foundation::{BOOL, LPARAM, RECT};
        use windows::Win32::Graphics::Gdi::{
            EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFOEXW,
        };
        use windows::Win32::UI::HiDpi::{GetDpiForMonitor, MDT_EFFECTIVE_DPI};

        extern "system" fn monitor_enum_proc(
            monitor: HMONITOR,
            _hdc: HDC,
            _rc_clip: *mut RECT,
            data: LPARAM,
        ) -> BOOL {
            let monitors = unsafe { &mut *(data.0 as *mut Vec<MonitorInfo>) };
            let mut info = MONITORINFOEXW::default();
            info.monitorInfo.cbSize = mem::size_of::<MONITORINFOEXW>() as u32;
            if unsafe { GetMonitorInfoW(monitor, &mut info.monitorInfo as *mut _ as *mut _) }
                .as_bool()
            {
                let rc = info.monitorInfo.rcMonitor;
                let mut dpi_x = 96u32;
                let mut dpi_y = 96u32;
                if unsafe { GetDpiForMonitor(monitor, MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y) }
                    .is_err()
                {
                    dpi_x = 96;
                }
                monitors.push(MonitorInfo {
                    origin_x: rc.left,
                    origin_y: rc.top,
                    width_physical: (rc.right - rc.left).max(0) as u32,
                    height_physical: (rc.bottom - rc.top).max(0) as u32,
                    scale_factor: dpi_x as f64 / 96.0,
                });
            }
            BOOL(1)
        }

        let mut monitors = Vec::new();
        unsafe {
            let _ = EnumDisplayMonitors(
                HDC::default(),
                None,
                Some(monitor_enum_proc),
                LPARAM(&mut monitors as *mut Vec<MonitorInfo> as isize),
            );
        }
        monitors
    }
}
