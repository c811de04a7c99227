//! The three window loops behind one handle.
//!
//! [`CompanionRuntime`] owns a controller for the panel, the overlay and the
//! detail popup. The host forwards window notifications through
//! [`WindowEventSenders`] and calls [`CompanionRuntime::tick`] from its event
//! loop; each tick drains queued notifications and fires due timers.

use crate::layout::click_through::{ClickThroughRegion, ClickThroughReporter, ContentSource};
use crate::layout::controller::WindowController;
use crate::layout::gesture::GestureState;
use crate::layout::host::{HostEvent, WindowHost};
use crate::layout::model::{
    LayoutMode, PhysicalRect, RememberedGeometry, WindowGeometry, WindowRole,
    DETAIL_POPUP_WINDOW, MAIN_WINDOW, OVERLAY_WINDOW,
};
use crate::layout::reconciler::ApplyOutcome;
use crate::layout::state::{can_transition, RuntimeLifecycle};
use crate::layout::store::{GeometryPersistence, GeometryStoreAdapter, LegacyCache};
use crate::layout::timer::{Clock, Millis};
use crate::settings::EngineSettings;
use anyhow::{anyhow, bail, Result};
use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

/// Collaborators supplied by the host application.
pub struct RuntimeParts {
    pub host: Arc<dyn WindowHost>,
    pub persistence: Arc<dyn GeometryPersistence>,
    pub legacy: Arc<LegacyCache>,
    pub settings: Arc<EngineSettings>,
    pub clock: Arc<dyn Clock>,
    /// Overlay content used for click-through reporting. Without one the
    /// overlay never reports regions.
    pub content: Option<Box<dyn ContentSource>>,
}

/// Per-window notification channels, handed to the window system glue.
#[derive(Clone)]
pub struct WindowEventSenders {
    panel: Sender<HostEvent>,
    overlay: Sender<HostEvent>,
    popup: Sender<HostEvent>,
}

impl WindowEventSenders {
    pub fn send(&self, label: &str, event: HostEvent) -> Result<()> {
        let sender = match label {
            MAIN_WINDOW => &self.panel,
            OVERLAY_WINDOW => &self.overlay,
            DETAIL_POPUP_WINDOW => &self.popup,
            other => bail!("unknown window label {other}"),
        };
        sender
            .send(event)
            .map_err(|_| anyhow!("event channel for {label} closed"))
    }
}

pub struct CompanionRuntime {
    lifecycle: Mutex<RuntimeLifecycle>,
    panel: Mutex<WindowController>,
    overlay: Mutex<WindowController>,
    popup: Mutex<WindowController>,
}

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>> {
    mutex.lock().map_err(|_| anyhow!("{what} lock poisoned"))
}

impl CompanionRuntime {
    pub fn new(parts: RuntimeParts) -> (Self, WindowEventSenders) {
        let RuntimeParts {
            host,
            persistence,
            legacy,
            settings,
            clock,
            content,
        } = parts;

        let build = |role: WindowRole| {
            let store =
                GeometryStoreAdapter::new(role.default_label(), persistence.clone(), legacy.clone());
            let (tx, rx) = channel();
            let controller = WindowController::new(
                role,
                host.clone(),
                store,
                settings.clone(),
                clock.clone(),
            )
            .with_events(rx);
            (controller, tx)
        };

        let (panel, panel_tx) = build(WindowRole::Panel);
        let (mut overlay, overlay_tx) = build(WindowRole::Overlay);
        let (popup, popup_tx) = build(WindowRole::DetailPopup);
        if let Some(content) = content {
            overlay = overlay.with_click_through(ClickThroughReporter::new(content));
        }

        let runtime = Self {
            lifecycle: Mutex::new(RuntimeLifecycle::Idle),
            panel: Mutex::new(panel),
            overlay: Mutex::new(overlay),
            popup: Mutex::new(popup),
        };
        let senders = WindowEventSenders {
            panel: panel_tx,
            overlay: overlay_tx,
            popup: popup_tx,
        };
        (runtime, senders)
    }

    fn controllers(&self) -> [&Mutex<WindowController>; 3] {
        [&self.panel, &self.overlay, &self.popup]
    }

    fn controller(&self, label: &str) -> Result<MutexGuard<'_, WindowController>> {
        let mutex = match label {
            MAIN_WINDOW => &self.panel,
            OVERLAY_WINDOW => &self.overlay,
            DETAIL_POPUP_WINDOW => &self.popup,
            other => bail!("unknown window label {other}"),
        };
        lock(mutex, label)
    }

    /// Lock one window for a runtime operation; fails after teardown.
    fn operate(&self, label: &str) -> Result<MutexGuard<'_, WindowController>> {
        if self.lifecycle() == RuntimeLifecycle::TornDown {
            bail!("companion runtime was torn down");
        }
        self.controller(label)
    }

    fn transition(&self, to: RuntimeLifecycle) -> Result<bool> {
        let mut lifecycle = lock(&self.lifecycle, "runtime lifecycle")?;
        if *lifecycle == to {
            return Ok(false);
        }
        if !can_transition(*lifecycle, to) {
            bail!("invalid runtime transition from {:?} to {:?}", *lifecycle, to);
        }
        *lifecycle = to;
        Ok(true)
    }

    pub fn lifecycle(&self) -> RuntimeLifecycle {
        self.lifecycle
            .lock()
            .map(|l| *l)
            .unwrap_or(RuntimeLifecycle::TornDown)
    }

    pub fn start(&self) -> Result<()> {
        if !self.transition(RuntimeLifecycle::Running)? {
            return Ok(());
        }
        for mutex in self.controllers() {
            lock(mutex, "window controller")?.start();
        }
        tracing::info!("companion window runtime started");
        Ok(())
    }

    /// Drain queued notifications for every window. Returns how many were handled.
    pub fn pump_events(&self) -> Result<usize> {
        if !self.lifecycle().is_running() {
            return Ok(0);
        }
        let mut handled = 0;
        for mutex in self.controllers() {
            handled += lock(mutex, "window controller")?.pump_events();
        }
        Ok(handled)
    }

    /// Pump notifications, then fire every due timer. Returns the number of
    /// timers fired.
    pub fn tick(&self) -> Result<usize> {
        if !self.lifecycle().is_running() {
            return Ok(0);
        }
        let mut fired = 0;
        for mutex in self.controllers() {
            let mut controller = lock(mutex, "window controller")?;
            controller.pump_events();
            fired += controller.run_due_timers();
        }
        Ok(fired)
    }

    /// Earliest pending deadline across all windows.
    pub fn next_deadline(&self) -> Result<Option<Millis>> {
        let mut next: Option<Millis> = None;
        for mutex in self.controllers() {
            if let Some(deadline) = lock(mutex, "window controller")?.next_deadline() {
                next = Some(next.map_or(deadline, |n| n.min(deadline)));
            }
        }
        Ok(next)
    }

    pub fn layout_mode(&self) -> Result<LayoutMode> {
        Ok(self.controller(MAIN_WINDOW)?.mode())
    }

    pub fn set_layout_mode(&self, mode: LayoutMode) -> Result<ApplyOutcome> {
        Ok(self.operate(MAIN_WINDOW)?.set_layout_mode(mode))
    }

    pub fn toggle_collapsed(&self) -> Result<ApplyOutcome> {
        Ok(self.operate(MAIN_WINDOW)?.toggle_collapsed())
    }

    pub fn notify_user_repositioned(&self) -> Result<ApplyOutcome> {
        Ok(self.operate(MAIN_WINDOW)?.notify_user_repositioned())
    }

    pub fn set_overlay_anchor(&self, anchor: Option<PhysicalRect>) -> Result<ApplyOutcome> {
        Ok(self.operate(OVERLAY_WINDOW)?.set_overlay_anchor(anchor))
    }

    pub fn show_popup(&self) -> Result<()> {
        self.operate(DETAIL_POPUP_WINDOW)?.show_popup();
        Ok(())
    }

    pub fn hide_popup(&self) -> Result<()> {
        self.operate(DETAIL_POPUP_WINDOW)?.hide_popup();
        Ok(())
    }

    pub fn current_geometry(&self, label: &str) -> Result<Option<WindowGeometry>> {
        Ok(self.controller(label)?.current_geometry())
    }

    pub fn gesture(&self, label: &str) -> Result<GestureState> {
        Ok(*self.controller(label)?.gesture())
    }

    pub fn remembered(&self, label: &str) -> Result<RememberedGeometry> {
        Ok(*self.controller(label)?.remembered())
    }

    pub fn last_outcome(&self, label: &str) -> Result<Option<ApplyOutcome>> {
        Ok(self.controller(label)?.last_outcome())
    }

    pub fn last_click_through(&self) -> Result<Option<ClickThroughRegion>> {
        Ok(self.controller(OVERLAY_WINDOW)?.last_click_through().cloned())
    }

    pub fn pending_timers(&self, label: &str) -> Result<usize> {
        Ok(self.controller(label)?.pending_timers())
    }

    /// Cancel every pending timer. Later calls are no-ops.
    pub fn teardown(&self) -> Result<()> {
        if !self.transition(RuntimeLifecycle::TornDown)? {
            return Ok(());
        }
        for mutex in self.controllers() {
            lock(mutex, "window controller")?.teardown();
        }
        tracing::info!("companion window runtime torn down");
        Ok(())
    }
}
