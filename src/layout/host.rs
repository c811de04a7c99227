use crate::layout::model::{
    LogicalPosition, LogicalSize, MonitorInfo, PhysicalPosition, PhysicalRect, PhysicalSize,
};
use crate::layout::monitor::system_monitors;
use anyhow::Result;

/// Window control owned by the host application. Every call may fail, for
/// example when the window was already destroyed.
pub trait WindowHost: Send + Sync {
    fn set_position(&self, label: &str, position: LogicalPosition) -> Result<()>;
    fn set_size(&self, label: &str, size: LogicalSize) -> Result<()>;
    fn inner_size(&self, label: &str) -> Result<PhysicalSize>;
    fn outer_position(&self, label: &str) -> Result<PhysicalPosition>;
    fn scale_factor(&self, label: &str) -> Result<f64>;
    /// Monitor currently associated with the window, if the window system can
    /// enumerate one yet.
    fn current_monitor_info(&self, label: &str) -> Result<Option<MonitorInfo>>;
    /// Every attached monitor. Used to find the display under the overlay
    /// anchor.
    fn available_monitors(&self) -> Result<Vec<MonitorInfo>> {
        Ok(system_monitors())
    }
    fn update_click_through_regions(&self, label: &str, rects: &[PhysicalRect]) -> Result<()>;
    fn show(&self, label: &str) -> Result<()>;
    fn set_always_on_top(&self, label: &str, on_top: bool) -> Result<()>;
}

/// Notifications from the window system, delivered per window in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Moved { position: PhysicalPosition },
    Resized { size: PhysicalSize },
}
