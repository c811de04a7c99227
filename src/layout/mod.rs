//! Geometry reconciliation for the companion windows.
//!
//! Positions live in physical pixels, sizes and layout targets in logical
//! pixels; [`transform`] is the only place the two meet.

pub mod click_through;
pub mod controller;
pub mod file_store;
pub mod gesture;
pub mod host;
pub mod model;
pub mod monitor;
pub mod reconciler;
pub mod service;
pub mod state;
pub mod store;
pub mod timer;
pub mod transform;

pub use click_through::{ClickThroughRegion, ContentBlock, ContentSource, SharedContent};
pub use controller::WindowController;
pub use file_store::JsonGeometryStore;
pub use host::{HostEvent, WindowHost};
pub use model::{
    LayoutMode, LogicalPosition, LogicalRect, LogicalSize, MonitorInfo, PhysicalPosition,
    PhysicalRect, PhysicalSize, WindowGeometry, WindowRole, DETAIL_POPUP_WINDOW, MAIN_WINDOW,
    OVERLAY_WINDOW,
};
pub use reconciler::ApplyOutcome;
pub use service::{CompanionRuntime, RuntimeParts, WindowEventSenders};
pub use store::{GeometryPatch, GeometryPersistence, LegacyCache, StoredGeometry};
pub use timer::{Clock, ManualClock, SystemClock};
