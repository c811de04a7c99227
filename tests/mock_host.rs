#![allow(dead_code)]

use anyhow::{anyhow, Result};
use overlay_geometry::layout::store::{GeometryPatch, GeometryPersistence, LegacyCache, StoredGeometry};
use overlay_geometry::layout::transform::{position_to_physical, size_to_physical};
use overlay_geometry::layout::{
    CompanionRuntime, HostEvent, LogicalPosition, LogicalSize, ManualClock, MonitorInfo,
    PhysicalPosition, PhysicalRect, PhysicalSize, RuntimeParts, SharedContent,
    WindowEventSenders, WindowHost,
};
use overlay_geometry::settings::EngineSettings;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    SetPosition(String, LogicalPosition),
    SetSize(String, LogicalSize),
    Show(String),
    AlwaysOnTop(String, bool),
    ClickThrough(String, Vec<PhysicalRect>),
}

#[derive(Debug, Clone, Copy)]
pub struct MockWindow {
    pub position: PhysicalPosition,
    pub size: PhysicalSize,
}

impl Default for MockWindow {
    fn default() -> Self {
        Self {
            position: PhysicalPosition::new(100, 100),
            size: PhysicalSize::new(800, 600),
        }
    }
}

#[derive(Default)]
pub struct MockState {
    pub windows: HashMap<String, MockWindow>,
    pub monitor: Option<MonitorInfo>,
    pub calls: Vec<HostCall>,
    pub fail_set_size: bool,
    pub fail_set_position: bool,
    pub fail_outer_position: bool,
    /// Every attached monitor; empty means the host cannot enumerate them.
    pub monitors: Vec<MonitorInfo>,
    /// When set, applied moves and resizes are reported back like a real
    /// window system would.
    pub echo: Option<WindowEventSenders>,
}

/// Records every command and applies moves/resizes to an in-memory window.
/// Echo notifications are off until [`MockHost::echo_to`] is called.
#[derive(Default)]
pub struct MockHost {
    pub state: Mutex<MockState>,
}

impl MockHost {
    pub fn with_monitor(monitor: MonitorInfo) -> Self {
        let host = Self::default();
        host.state.lock().unwrap().monitor = Some(monitor);
        host
    }

    fn scale(state: &MockState) -> f64 {
        state.monitor.map(|m| m.scale_factor).unwrap_or(1.0)
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn size_calls(&self, label: &str) -> Vec<LogicalSize> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::SetSize(l, size) if l == label => Some(size),
                _ => None,
            })
            .collect()
    }

    pub fn position_calls(&self, label: &str) -> Vec<LogicalPosition> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::SetPosition(l, position) if l == label => Some(position),
                _ => None,
            })
            .collect()
    }

    pub fn show_count(&self, label: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, HostCall::Show(l) if l == label))
            .count()
    }

    pub fn click_through_reports(&self, label: &str) -> Vec<Vec<PhysicalRect>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::ClickThrough(l, rects) if l == label => Some(rects),
                _ => None,
            })
            .collect()
    }

    pub fn window(&self, label: &str) -> MockWindow {
        self.state
            .lock()
            .unwrap()
            .windows
            .get(label)
            .copied()
            .unwrap_or_default()
    }

    pub fn place(&self, label: &str, position: PhysicalPosition, size: PhysicalSize) {
        self.state
            .lock()
            .unwrap()
            .windows
            .insert(label.to_string(), MockWindow { position, size });
    }

    pub fn set_fail_set_size(&self, fail: bool) {
        self.state.lock().unwrap().fail_set_size = fail;
    }

    pub fn set_fail_outer_position(&self, fail: bool) {
        self.state.lock().unwrap().fail_outer_position = fail;
    }

    pub fn set_monitors(&self, monitors: Vec<MonitorInfo>) {
        self.state.lock().unwrap().monitors = monitors;
    }

    pub fn echo_to(&self, senders: WindowEventSenders) {
        self.state.lock().unwrap().echo = Some(senders);
    }

    fn echo(state: &MockState, label: &str, event: HostEvent) {
        if let Some(senders) = state.echo.as_ref() {
            // The controller may already be torn down.
            let _ = senders.send(label, event);
        }
    }
}

impl WindowHost for MockHost {
    fn set_position(&self, label: &str, position: LogicalPosition) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(HostCall::SetPosition(label.to_string(), position));
        if state.fail_set_position {
            return Err(anyhow!("set_position failed"));
        }
        let physical = position_to_physical(position, Self::scale(&state));
        state.windows.entry(label.to_string()).or_default().position = physical;
        Self::echo(&state, label, HostEvent::Moved { position: physical });
        Ok(())
    }

    fn set_size(&self, label: &str, size: LogicalSize) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(HostCall::SetSize(label.to_string(), size));
        if state.fail_set_size {
            return Err(anyhow!("set_size failed"));
        }
        let physical = size_to_physical(size, Self::scale(&state));
        state.windows.entry(label.to_string()).or_default().size = physical;
        Self::echo(&state, label, HostEvent::Resized { size: physical });
        Ok(())
    }

    fn inner_size(&self, label: &str) -> Result<PhysicalSize> {
        Ok(self.window(label).size)
    }

    fn outer_position(&self, label: &str) -> Result<PhysicalPosition> {
        if self.state.lock().unwrap().fail_outer_position {
            return Err(anyhow!("outer_position failed"));
        }
        Ok(self.window(label).position)
    }

    fn scale_factor(&self, _label: &str) -> Result<f64> {
        Ok(Self::scale(&self.state.lock().unwrap()))
    }

    fn current_monitor_info(&self, _label: &str) -> Result<Option<MonitorInfo>> {
        Ok(self.state.lock().unwrap().monitor)
    }

    fn available_monitors(&self) -> Result<Vec<MonitorInfo>> {
        Ok(self.state.lock().unwrap().monitors.clone())
    }

    fn update_click_through_regions(&self, label: &str, rects: &[PhysicalRect]) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(HostCall::ClickThrough(label.to_string(), rects.to_vec()));
        Ok(())
    }

    fn show(&self, label: &str) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(HostCall::Show(label.to_string()));
        Ok(())
    }

    fn set_always_on_top(&self, label: &str, on_top: bool) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(HostCall::AlwaysOnTop(label.to_string(), on_top));
        Ok(())
    }
}

/// Persistence service that keeps records in memory and logs every write.
#[derive(Default)]
pub struct MemoryPersistence {
    pub records: Mutex<HashMap<String, StoredGeometry>>,
    pub writes: Mutex<Vec<(String, GeometryPatch)>>,
}

impl MemoryPersistence {
    pub fn seed(&self, label: &str, stored: StoredGeometry) {
        self.records
            .lock()
            .unwrap()
            .insert(label.to_string(), stored);
    }

    pub fn writes_for(&self, label: &str) -> Vec<GeometryPatch> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| l == label)
            .map(|(_, patch)| *patch)
            .collect()
    }

    pub fn record(&self, label: &str) -> Option<StoredGeometry> {
        self.records.lock().unwrap().get(label).copied()
    }
}

impl GeometryPersistence for MemoryPersistence {
    fn get_window_geometry(&self, label: &str) -> Result<Option<StoredGeometry>> {
        Ok(self.record(label))
    }

    fn save_window_geometry(&self, label: &str, patch: &GeometryPatch) -> Result<()> {
        self.writes
            .lock()
            .unwrap()
            .push((label.to_string(), *patch));
        self.records
            .lock()
            .unwrap()
            .entry(label.to_string())
            .or_default()
            .merge(patch);
        Ok(())
    }
}

pub struct Harness {
    pub runtime: CompanionRuntime,
    pub senders: WindowEventSenders,
    pub host: Arc<MockHost>,
    pub persistence: Arc<MemoryPersistence>,
    pub legacy: Arc<LegacyCache>,
    pub clock: Arc<ManualClock>,
    pub content: SharedContent,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(
            MockHost::with_monitor(MonitorInfo::default()),
            MemoryPersistence::default(),
            LegacyCache::in_memory(),
        )
    }

    pub fn build(host: MockHost, persistence: MemoryPersistence, legacy: LegacyCache) -> Self {
        let host = Arc::new(host);
        let persistence = Arc::new(persistence);
        let legacy = Arc::new(legacy);
        let clock = Arc::new(ManualClock::new(0));
        let content = SharedContent::new();
        let (runtime, senders) = CompanionRuntime::new(RuntimeParts {
            host: host.clone(),
            persistence: persistence.clone(),
            legacy: legacy.clone(),
            settings: Arc::new(EngineSettings::default()),
            clock: clock.clone(),
            content: Some(Box::new(content.clone())),
        });
        Self {
            runtime,
            senders,
            host,
            persistence,
            legacy,
            clock,
            content,
        }
    }

    pub fn with_legacy(values: &[(&str, &str)]) -> Self {
        let legacy = LegacyCache::in_memory();
        for (key, value) in values {
            legacy.set(key, value.to_string()).unwrap();
        }
        Self::build(
            MockHost::with_monitor(MonitorInfo::default()),
            MemoryPersistence::default(),
            legacy,
        )
    }

    /// Start and run past both grace periods.
    pub fn started() -> Self {
        let harness = Self::new();
        harness.start();
        harness
    }

    pub fn start(&self) {
        self.runtime.start().unwrap();
        self.advance(1000);
    }

    /// Panel with a remembered 400x700 size, expanded and settled.
    pub fn expanded() -> Self {
        let harness = Self::with_legacy(&[("main-height", "700")]);
        harness.start();
        harness
            .runtime
            .set_layout_mode(overlay_geometry::layout::LayoutMode::Expanded)
            .unwrap();
        harness.advance(1500);
        harness.host.clear_calls();
        harness
    }

    /// Report every applied move and resize back through the event channels.
    pub fn with_echoes(self) -> Self {
        self.host.echo_to(self.senders.clone());
        self
    }

    /// Move the clock forward, firing timers at their deadlines.
    pub fn advance(&self, ms: u64) {
        use overlay_geometry::layout::Clock;
        let target = self.clock.now_ms() + ms;
        loop {
            self.runtime.pump_events().unwrap();
            match self.runtime.next_deadline().unwrap() {
                Some(deadline) if deadline <= target => {
                    self.clock.set(deadline.max(self.clock.now_ms()));
                    self.runtime.tick().unwrap();
                }
                _ => break,
            }
        }
        self.clock.set(target);
        self.runtime.tick().unwrap();
    }

    pub fn send(&self, label: &str, event: HostEvent) {
        self.senders.send(label, event).unwrap();
        self.runtime.pump_events().unwrap();
    }

    pub fn user_move(&self, label: &str, x: i32, y: i32) {
        let position = PhysicalPosition::new(x, y);
        self.host
            .place(label, position, self.host.window(label).size);
        self.send(label, HostEvent::Moved { position });
    }

    pub fn user_resize(&self, label: &str, width: u32, height: u32) {
        let size = PhysicalSize::new(width, height);
        self.host
            .place(label, self.host.window(label).position, size);
        self.send(label, HostEvent::Resized { size });
    }
}
