//! One reconciliation loop per window.
//!
//! A [`WindowController`] owns everything a window needs to decide its own
//! geometry: remembered geometry, gesture flags, the store adapter, and a
//! private timer queue. Controllers never share state, so the panel, overlay
//! and popup loops run independently.

use crate::layout::click_through::{ClickThroughRegion, ClickThroughReporter};
use crate::layout::gesture::{
    classify_move, classify_resize, GestureContext, GestureState, MoveDecision, ResizeDecision,
};
use crate::layout::host::{HostEvent, WindowHost};
use crate::layout::model::{
    LayoutMode, LogicalSize, PhysicalPosition, PhysicalRect, PhysicalSize, RememberedGeometry,
    WindowGeometry, WindowRole,
};
use crate::layout::monitor::{anchor_monitor, current_monitor, current_scale_factor};
use crate::layout::reconciler::{overlay_target, panel_target, ApplyOutcome, Reconciler};
use crate::layout::store::{GeometryPatch, GeometryStoreAdapter};
use crate::layout::timer::{Clock, Millis, TimerHandle, TimerQueue};
use crate::layout::transform::{monitor_logical_bounds, position_to_logical, size_to_logical};
use crate::settings::EngineSettings;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowTimer {
    InitGrace,
    GeometryLoadGrace,
    PersistPosition {
        position: PhysicalPosition,
    },
    DragRelease,
    PersistSize {
        physical: PhysicalSize,
        logical: LogicalSize,
        include_height: bool,
    },
    ResizeRelease,
    ProgrammaticRelease,
    ProgrammaticMoveRelease,
    PeriodicReconcile,
    ClickThroughTick,
    PopupSave,
    PopupShrink,
}

#[derive(Debug, Default)]
struct TimerSlots {
    move_persist: Option<TimerHandle>,
    drag_release: Option<TimerHandle>,
    size_persist: Option<TimerHandle>,
    resize_release: Option<TimerHandle>,
    programmatic_release: Option<TimerHandle>,
    programmatic_move_release: Option<TimerHandle>,
    popup_save: Option<TimerHandle>,
    popup_shrink: Option<TimerHandle>,
}

pub struct WindowController {
    label: String,
    role: WindowRole,
    host: Arc<dyn WindowHost>,
    store: GeometryStoreAdapter,
    settings: Arc<EngineSettings>,
    clock: Arc<dyn Clock>,
    events: Option<Receiver<HostEvent>>,
    timers: TimerQueue<WindowTimer>,
    slots: TimerSlots,
    gesture: GestureState,
    reconciler: Reconciler,
    remembered: RememberedGeometry,
    mode: LayoutMode,
    initialized: bool,
    geometry_loaded: bool,
    started: bool,
    torn_down: bool,
    overlay_anchor: Option<PhysicalRect>,
    click_through: Option<ClickThroughReporter>,
    popup_visible: bool,
    /// Size to give back to the popup when it is shown after a shrink.
    popup_restore_size: Option<LogicalSize>,
    last_outcome: Option<ApplyOutcome>,
}

impl WindowController {
    pub fn new(
        role: WindowRole,
        host: Arc<dyn WindowHost>,
        store: GeometryStoreAdapter,
        settings: Arc<EngineSettings>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (width, height) = settings.default_panel_size;
        let mode = match role {
            WindowRole::Panel => LayoutMode::Splash,
            _ => LayoutMode::Expanded,
        };
        Self {
            label: store.label().to_string(),
            role,
            host,
            store,
            settings,
            clock,
            events: None,
            timers: TimerQueue::new(),
            slots: TimerSlots::default(),
            gesture: GestureState::default(),
            reconciler: Reconciler::new(),
            remembered: RememberedGeometry::new(None, LogicalSize::new(width, height)),
            mode,
            initialized: false,
            geometry_loaded: false,
            started: false,
            torn_down: false,
            overlay_anchor: None,
            click_through: None,
            popup_visible: false,
            popup_restore_size: None,
            last_outcome: None,
        }
    }

    pub fn with_events(mut self, events: Receiver<HostEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_click_through(mut self, reporter: ClickThroughReporter) -> Self {
        self.click_through = Some(reporter);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn role(&self) -> WindowRole {
        self.role
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn remembered(&self) -> &RememberedGeometry {
        &self.remembered
    }

    pub fn last_outcome(&self) -> Option<ApplyOutcome> {
        self.last_outcome
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_geometry_loaded(&self) -> bool {
        self.geometry_loaded
    }

    pub fn is_popup_visible(&self) -> bool {
        self.popup_visible
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    pub fn last_click_through(&self) -> Option<&ClickThroughRegion> {
        self.click_through
            .as_ref()
            .and_then(|reporter| reporter.last_reported())
    }

    fn now(&self) -> Millis {
        self.clock.now_ms()
    }

    fn schedule(&mut self, after_ms: Millis, timer: WindowTimer) -> TimerHandle {
        let now = self.now();
        self.timers.schedule(now, after_ms, timer)
    }

    fn reschedule(
        &mut self,
        previous: Option<TimerHandle>,
        after_ms: Millis,
        timer: WindowTimer,
    ) -> TimerHandle {
        let now = self.now();
        self.timers.reschedule(previous, now, after_ms, timer)
    }

    fn schedule_programmatic_release(&mut self, after_ms: Millis) {
        let previous = self.slots.programmatic_release.take();
        self.slots.programmatic_release =
            Some(self.reschedule(previous, after_ms, WindowTimer::ProgrammaticRelease));
    }

    fn schedule_programmatic_move_release(&mut self) {
        let previous = self.slots.programmatic_move_release.take();
        self.slots.programmatic_move_release = Some(self.reschedule(
            previous,
            self.settings.programmatic_release_ms,
            WindowTimer::ProgrammaticMoveRelease,
        ));
    }

    /// Load remembered geometry and arm the grace and periodic timers.
    /// Calling it twice has no effect.
    pub fn start(&mut self) {
        if self.started || self.torn_down {
            return;
        }
        self.started = true;
        self.schedule(self.settings.init_grace_ms, WindowTimer::InitGrace);

        match self.role {
            WindowRole::Panel => {
                self.load_remembered();
                self.schedule(
                    self.settings.geometry_load_grace_ms,
                    WindowTimer::GeometryLoadGrace,
                );
                self.schedule(
                    self.settings.reconcile_period_ms,
                    WindowTimer::PeriodicReconcile,
                );
            }
            WindowRole::Overlay => {
                self.geometry_loaded = true;
                self.reconcile();
                self.schedule(
                    self.settings.reconcile_period_ms,
                    WindowTimer::PeriodicReconcile,
                );
            }
            WindowRole::DetailPopup => {
                self.geometry_loaded = true;
                self.restore_popup_geometry();
            }
        }

        if self.click_through.is_some() {
            self.run_click_through_tick();
            self.schedule(
                self.settings.click_through_period_ms,
                WindowTimer::ClickThroughTick,
            );
        }
        tracing::debug!(label = %self.label, role = ?self.role, "window controller started");
    }

    fn load_remembered(&mut self) {
        let monitor = current_monitor(&*self.host, &self.label);
        let scale = monitor.scale_factor;
        let stored = self.store.load();
        let floor = self.settings.stored_size_floor;

        let position = stored
            .and_then(|stored| stored.stored_position())
            .or_else(|| self.store.legacy_position());

        let stored_size = stored
            .and_then(|stored| stored.stored_size())
            .filter(|size| size.width > floor && size.height > floor);

        let (default_width, _) = self.settings.default_panel_size;
        let (size, has_saved_height) = match stored_size {
            Some(physical) => {
                let size = size_to_logical(physical, scale);
                tracing::info!(
                    label = %self.label,
                    physical = ?physical,
                    logical = ?size,
                    "restoring saved window size"
                );
                self.store.mirror_logical_size(size);
                (size, true)
            }
            None => {
                let width = self
                    .store
                    .legacy_width()
                    .filter(|width| *width > floor)
                    .unwrap_or(default_width);
                let height = self.store.legacy_height().filter(|height| *height > floor);
                let derived = || {
                    let (_, area) = monitor_logical_bounds(&monitor);
                    area.height
                        .saturating_sub(self.settings.derived_height_inset)
                        .max(self.settings.min_derived_height)
                };
                (
                    LogicalSize::new(width, height.unwrap_or_else(derived)),
                    height.is_some(),
                )
            }
        };

        if let Some(position) = position {
            tracing::info!(label = %self.label, ?position, "restoring saved window position");
        }
        self.remembered = RememberedGeometry {
            position,
            size,
            has_saved_height,
        };
    }

    fn restore_popup_geometry(&mut self) {
        let Some(stored) = self.store.load() else {
            return;
        };
        let (Some(position), Some(size)) = (stored.stored_position(), stored.stored_size()) else {
            tracing::debug!(label = %self.label, ?stored, "incomplete popup geometry; not restoring");
            return;
        };
        let size = self.above_stored_floor(size).then_some(size);
        if size.is_none() {
            tracing::debug!(label = %self.label, ?stored, "stored popup size too small; restoring position only");
        }
        let scale = current_scale_factor(&*self.host, &self.label);

        self.gesture.begin_programmatic_move();
        self.schedule_programmatic_move_release();
        let mut result = self
            .host
            .set_position(&self.label, position_to_logical(position, scale));
        if let Some(size) = size.filter(|_| result.is_ok()) {
            self.gesture.begin_programmatic_resize();
            self.schedule_programmatic_release(self.settings.programmatic_release_ms);
            result = self.host.set_size(&self.label, size_to_logical(size, scale));
        }
        match result {
            Ok(()) => {
                tracing::info!(label = %self.label, ?position, ?size, "restored popup geometry")
            }
            Err(err) => {
                tracing::warn!(label = %self.label, error = %err, "failed to restore popup geometry")
            }
        }
    }

    fn above_stored_floor(&self, size: PhysicalSize) -> bool {
        let floor = self.settings.stored_size_floor;
        size.width > floor && size.height > floor
    }

    /// Drain queued window-system notifications in arrival order.
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let next = match self.events.as_ref() {
                Some(events) => events.try_recv(),
                None => break,
            };
            match next {
                Ok(event) => {
                    self.handle_event(event);
                    handled += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::debug!(label = %self.label, "window event stream closed");
                    self.events = None;
                    break;
                }
            }
        }
        handled
    }

    pub fn handle_event(&mut self, event: HostEvent) {
        if self.torn_down {
            return;
        }
        match event {
            HostEvent::Moved { position } => self.on_moved(position),
            HostEvent::Resized { size } => self.on_resized(size),
        }
    }

    fn gesture_context(&self) -> GestureContext {
        GestureContext {
            initialized: self.initialized,
            splash_active: self.role == WindowRole::Panel && self.mode == LayoutMode::Splash,
        }
    }

    fn on_moved(&mut self, position: PhysicalPosition) {
        if self.role == WindowRole::Overlay {
            return;
        }
        let context = self.gesture_context();
        match classify_move(&mut self.gesture, context, position) {
            MoveDecision::ProgrammaticEcho => self.schedule_programmatic_move_release(),
            MoveDecision::Ignore(reason) => {
                tracing::debug!(label = %self.label, ?reason, ?position, "ignoring move");
            }
            MoveDecision::UserDrag { position } => match self.role {
                WindowRole::Panel => {
                    let previous = self.slots.move_persist.take();
                    self.slots.move_persist = Some(self.reschedule(
                        previous,
                        self.settings.move_debounce_ms,
                        WindowTimer::PersistPosition { position },
                    ));
                }
                _ => self.schedule_popup_save(),
            },
        }
    }

    fn on_resized(&mut self, size: PhysicalSize) {
        if self.role == WindowRole::Overlay && !self.gesture.is_programmatic_resize {
            return;
        }
        let context = self.gesture_context();
        let scale = current_scale_factor(&*self.host, &self.label);
        let floor = self.settings.user_size_floor;
        let floor = match (self.role, self.mode) {
            (WindowRole::Panel, LayoutMode::Collapsed) => LogicalSize::new(floor, 0),
            (WindowRole::Panel, _) => LogicalSize::new(floor, floor),
            _ => LogicalSize::new(0, 0),
        };
        let now = self.now();

        match classify_resize(&mut self.gesture, context, size, scale, floor, now) {
            ResizeDecision::ProgrammaticEcho => {
                self.schedule_programmatic_release(self.settings.programmatic_release_ms);
            }
            ResizeDecision::Ignore(reason) => {
                tracing::debug!(label = %self.label, ?reason, ?size, "ignoring resize");
            }
            ResizeDecision::UserResize { physical, logical } => {
                if let Some(pending) = self.slots.resize_release.take() {
                    self.timers.cancel(pending);
                }
                if self.role != WindowRole::Panel {
                    self.schedule_popup_save();
                    return;
                }

                let include_height = self.mode != LayoutMode::Collapsed;
                self.remembered.size.width = logical.width;
                if include_height {
                    self.remembered.size.height = logical.height;
                    self.remembered.has_saved_height = true;
                }
                tracing::debug!(label = %self.label, ?physical, ?logical, "user resize");

                let previous = self.slots.size_persist.take();
                self.slots.size_persist = Some(self.reschedule(
                    previous,
                    self.settings.resize_debounce_ms,
                    WindowTimer::PersistSize {
                        physical,
                        logical,
                        include_height,
                    },
                ));
            }
            ResizeDecision::BelowFloor { logical } => {
                tracing::debug!(label = %self.label, ?logical, "user resize below size floor; not remembered");
                // The window no longer matches the last applied target.
                self.reconciler.reset();
                let previous = self.slots.resize_release.take();
                self.slots.resize_release = Some(self.reschedule(
                    previous,
                    self.settings.resize_release_ms,
                    WindowTimer::ResizeRelease,
                ));
            }
        }
    }

    fn schedule_popup_save(&mut self) {
        let previous = self.slots.popup_save.take();
        self.slots.popup_save = Some(self.reschedule(
            previous,
            self.settings.popup_save_debounce_ms,
            WindowTimer::PopupSave,
        ));
    }

    /// Dispatch every timer that is due at the current clock time.
    pub fn run_due_timers(&mut self) -> usize {
        let mut fired = 0;
        loop {
            let now = self.now();
            let due = self.timers.take_due(now);
            if due.is_empty() || self.torn_down {
                break;
            }
            for (handle, timer) in due {
                if self.torn_down {
                    break;
                }
                self.forget_slot(handle);
                self.fire(timer);
                fired += 1;
            }
        }
        fired
    }

    fn forget_slot(&mut self, handle: TimerHandle) {
        let slots = [
            &mut self.slots.move_persist,
            &mut self.slots.drag_release,
            &mut self.slots.size_persist,
            &mut self.slots.resize_release,
            &mut self.slots.programmatic_release,
            &mut self.slots.programmatic_move_release,
            &mut self.slots.popup_save,
            &mut self.slots.popup_shrink,
        ];
        for slot in slots {
            if *slot == Some(handle) {
                *slot = None;
            }
        }
    }

    fn fire(&mut self, timer: WindowTimer) {
        match timer {
            WindowTimer::InitGrace => {
                self.initialized = true;
                tracing::debug!(label = %self.label, "gesture tracking enabled");
            }
            WindowTimer::GeometryLoadGrace => {
                self.geometry_loaded = true;
                tracing::debug!(label = %self.label, "geometry load settled; layout sync enabled");
                self.reconcile();
            }
            WindowTimer::PersistPosition { position } => {
                self.store.save(&GeometryPatch::position(position));
                self.store.mirror_position(position);
                self.remembered.position = Some(position);
                let previous = self.slots.drag_release.take();
                self.slots.drag_release = Some(self.reschedule(
                    previous,
                    self.settings.drag_release_ms,
                    WindowTimer::DragRelease,
                ));
                self.reconcile();
            }
            WindowTimer::DragRelease => {
                self.gesture.is_user_dragging = false;
            }
            WindowTimer::PersistSize {
                physical,
                logical,
                include_height,
            } => {
                let patch = GeometryPatch {
                    width: Some(physical.width),
                    height: include_height.then_some(physical.height),
                    ..GeometryPatch::default()
                };
                self.store.save(&patch);
                self.store
                    .mirror_size(logical.width, include_height.then_some(logical.height));
                let previous = self.slots.resize_release.take();
                self.slots.resize_release = Some(self.reschedule(
                    previous,
                    self.settings.resize_release_ms,
                    WindowTimer::ResizeRelease,
                ));
            }
            WindowTimer::ResizeRelease => {
                self.gesture.is_user_resizing = false;
            }
            WindowTimer::ProgrammaticRelease => {
                self.gesture.is_programmatic_resize = false;
            }
            WindowTimer::ProgrammaticMoveRelease => {
                self.gesture.is_programmatic_move = false;
            }
            WindowTimer::PeriodicReconcile => {
                self.reconcile();
                self.schedule(
                    self.settings.reconcile_period_ms,
                    WindowTimer::PeriodicReconcile,
                );
            }
            WindowTimer::ClickThroughTick => {
                self.run_click_through_tick();
                self.schedule(
                    self.settings.click_through_period_ms,
                    WindowTimer::ClickThroughTick,
                );
            }
            WindowTimer::PopupSave => self.save_popup_geometry(),
            WindowTimer::PopupShrink => self.shrink_popup(),
        }
    }

    fn run_click_through_tick(&mut self) {
        if let Some(reporter) = self.click_through.as_mut() {
            reporter.tick(&*self.host, &self.label);
        }
    }

    fn save_popup_geometry(&mut self) {
        self.gesture.is_user_dragging = false;
        self.gesture.is_user_resizing = false;
        let position = self.host.outer_position(&self.label);
        let size = self.host.inner_size(&self.label);
        match (position, size) {
            (Ok(position), Ok(size)) if self.above_stored_floor(size) => {
                self.store.save(&GeometryPatch::full(position, size));
            }
            (Ok(position), Ok(size)) => {
                tracing::debug!(label = %self.label, ?size, "popup size too small to persist; saving position only");
                self.store.save(&GeometryPatch::position(position));
            }
            (Err(err), _) | (_, Err(err)) => {
                tracing::warn!(label = %self.label, error = %err, "failed to read popup geometry for saving");
            }
        }
    }

    fn shrink_popup(&mut self) {
        if self.popup_visible {
            return;
        }
        self.gesture.begin_programmatic_resize();
        self.schedule_programmatic_release(self.settings.programmatic_release_ms);
        if let Some(pending) = self.slots.popup_save.take() {
            self.timers.cancel(pending);
        }
        match self.host.inner_size(&self.label) {
            Ok(size) if self.above_stored_floor(size) => {
                let scale = current_scale_factor(&*self.host, &self.label);
                self.popup_restore_size = Some(size_to_logical(size, scale));
            }
            Ok(_) => {}
            Err(err) => {
                tracing::debug!(label = %self.label, error = %err, "could not read popup size before shrinking");
            }
        }
        match self.host.set_size(&self.label, LogicalSize::new(1, 1)) {
            Ok(()) => tracing::debug!(label = %self.label, "popup shrunk after hide"),
            Err(err) => tracing::warn!(label = %self.label, error = %err, "failed to shrink hidden popup"),
        }
    }

    /// Compute the target for this window and apply it if it changed.
    pub fn reconcile(&mut self) -> ApplyOutcome {
        if self.torn_down || !self.geometry_loaded {
            return ApplyOutcome::Skipped;
        }
        let monitor = match (self.role, self.overlay_anchor) {
            (WindowRole::Overlay, Some(anchor)) => anchor_monitor(&*self.host, &self.label, anchor),
            _ => current_monitor(&*self.host, &self.label),
        };
        let target = match self.role {
            WindowRole::Panel => {
                panel_target(self.mode, &self.remembered, &monitor, &self.settings)
            }
            WindowRole::Overlay => overlay_target(self.overlay_anchor, &monitor),
            WindowRole::DetailPopup => return ApplyOutcome::Skipped,
        };

        let now = self.now();
        let outcome = self.reconciler.apply(
            &*self.host,
            &self.label,
            &target,
            monitor.scale_factor,
            &mut self.gesture,
            now,
            &self.settings,
        );
        if matches!(
            outcome,
            ApplyOutcome::Applied { resized: true, .. }
                | ApplyOutcome::Failed {
                    resize_attempted: true
                }
        ) {
            self.schedule_programmatic_release(self.settings.programmatic_release_ms);
        }
        let move_attempted = match outcome {
            ApplyOutcome::Applied { moved, .. } => moved,
            ApplyOutcome::Failed { .. } => self.gesture.is_programmatic_move,
            _ => false,
        };
        if move_attempted {
            self.schedule_programmatic_move_release();
        }
        self.last_outcome = Some(outcome);
        outcome
    }

    pub fn set_layout_mode(&mut self, mode: LayoutMode) -> ApplyOutcome {
        if self.role != WindowRole::Panel {
            return ApplyOutcome::Skipped;
        }
        if mode != self.mode {
            tracing::debug!(label = %self.label, from = %self.mode, to = %mode, "layout mode changed");
            self.mode = mode;
            self.gesture.is_user_resizing = false;
        }
        self.reconcile()
    }

    /// Collapse or expand the panel from a user action. The new size is
    /// applied immediately while the programmatic flag is held, then the
    /// mode change runs the regular reconciliation.
    pub fn toggle_collapsed(&mut self) -> ApplyOutcome {
        if self.role != WindowRole::Panel || self.mode == LayoutMode::Splash {
            return ApplyOutcome::Skipped;
        }
        let next = match self.mode {
            LayoutMode::Collapsed => LayoutMode::Expanded,
            _ => LayoutMode::Collapsed,
        };
        if self.remembered.size.height <= self.settings.stored_size_floor {
            self.remembered.size.height = self.settings.default_panel_size.1;
        }
        let height = match next {
            LayoutMode::Collapsed => self.settings.collapsed_height,
            _ => self.remembered.size.height,
        };

        self.gesture.is_user_resizing = false;
        self.gesture.begin_programmatic_resize();
        self.schedule_programmatic_release(self.settings.collapse_programmatic_release_ms);
        if let Err(err) = self
            .host
            .set_size(&self.label, LogicalSize::new(self.remembered.size.width, height))
        {
            tracing::warn!(label = %self.label, error = %err, "failed to resize on collapse toggle");
        }
        self.set_layout_mode(next)
    }

    /// The user asked to reset the panel; forget where they put it.
    pub fn notify_user_repositioned(&mut self) -> ApplyOutcome {
        self.remembered.position = None;
        self.store.forget_legacy_position();
        if let Some(pending) = self.slots.move_persist.take() {
            self.timers.cancel(pending);
        }
        self.gesture.is_user_dragging = false;
        self.reconciler.reset();
        self.reconcile()
    }

    pub fn set_overlay_anchor(&mut self, anchor: Option<PhysicalRect>) -> ApplyOutcome {
        if self.role != WindowRole::Overlay {
            return ApplyOutcome::Skipped;
        }
        self.overlay_anchor = anchor;
        self.reconcile()
    }

    pub fn show_popup(&mut self) {
        if let Some(pending) = self.slots.popup_shrink.take() {
            self.timers.cancel(pending);
        }
        self.popup_visible = true;
        if let Some(size) = self.popup_restore_size.take() {
            self.gesture.begin_programmatic_resize();
            self.schedule_programmatic_release(self.settings.programmatic_release_ms);
            match self.host.set_size(&self.label, size) {
                Ok(()) => tracing::debug!(label = %self.label, ?size, "popup size restored after shrink"),
                Err(err) => tracing::warn!(label = %self.label, error = %err, "failed to restore popup size"),
            }
        }
        if let Err(err) = self.host.show(&self.label) {
            tracing::warn!(label = %self.label, error = %err, "failed to show popup");
        }
    }

    pub fn hide_popup(&mut self) {
        self.popup_visible = false;
        let previous = self.slots.popup_shrink.take();
        self.slots.popup_shrink = Some(self.reschedule(
            previous,
            self.settings.popup_shrink_delay_ms,
            WindowTimer::PopupShrink,
        ));
    }

    /// Live physical geometry, for diagnostics.
    pub fn current_geometry(&self) -> Option<WindowGeometry> {
        let position = self.host.outer_position(&self.label).ok()?;
        let size = self.host.inner_size(&self.label).ok()?;
        Some(WindowGeometry::from_parts(&self.label, position, size))
    }

    /// Cancel every timer and stop reacting to events.
    pub fn teardown(&mut self) {
        self.timers.clear();
        self.slots = TimerSlots::default();
        self.gesture.clear();
        self.events = None;
        self.torn_down = true;
        tracing::debug!(label = %self.label, "window controller torn down");
    }
}
