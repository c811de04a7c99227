use crate::layout::gesture::GestureState;
use crate::layout::host::WindowHost;
use crate::layout::model::{
    LayoutMode, LogicalPosition, LogicalSize, MonitorInfo, PhysicalPosition, PhysicalRect,
    PhysicalSize, RememberedGeometry,
};
use crate::layout::timer::Millis;
use crate::layout::transform::{
    monitor_logical_bounds, position_to_logical, round_half_up, size_to_logical,
};
use crate::settings::EngineSettings;
use anyhow::{Context, Result};

/// Where a window should be, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetGeometry {
    pub position: LogicalPosition,
    pub size: LogicalSize,
}

impl TargetGeometry {
    pub fn layout_key(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.size.width, self.size.height, self.position.x, self.position.y
        )
    }
}

pub fn panel_target(
    mode: LayoutMode,
    remembered: &RememberedGeometry,
    monitor: &MonitorInfo,
    settings: &EngineSettings,
) -> TargetGeometry {
    let (origin, area) = monitor_logical_bounds(monitor);

    if mode == LayoutMode::Splash {
        let (width, height) = settings.splash_size;
        let x = origin.x as i64 + round_half_up((area.width as f64 - width as f64) / 2.0);
        let y = origin.y as i64 + round_half_up((area.height as f64 - height as f64) / 2.0);
        return TargetGeometry {
            position: LogicalPosition::new(x as i32, y as i32),
            size: LogicalSize::new(width, height),
        };
    }

    let (margin_w, margin_h) = settings.monitor_margin;
    let max_width = area.width.saturating_sub(margin_w).max(1);
    let max_height = area.height.saturating_sub(margin_h).max(1);
    let wanted_height = match mode {
        LayoutMode::Collapsed => settings.collapsed_height,
        _ => remembered.size.height,
    };
    let size = LogicalSize::new(
        remembered.size.width.min(max_width),
        wanted_height.min(max_height),
    );

    let position = match remembered.position {
        Some(position) => position_to_logical(position, monitor.scale_factor),
        None => LogicalPosition::new(
            (origin.x as i64 + area.width as i64 - size.width as i64) as i32,
            origin.y,
        ),
    };

    TargetGeometry { position, size }
}

/// The overlay covers the tracked game window when one is known, otherwise
/// the whole monitor.
pub fn overlay_target(anchor: Option<PhysicalRect>, monitor: &MonitorInfo) -> TargetGeometry {
    let rect = anchor.unwrap_or_else(|| monitor.physical_rect());
    let scale = monitor.scale_factor;
    TargetGeometry {
        position: position_to_logical(PhysicalPosition::new(rect.x, rect.y), scale),
        size: size_to_logical(PhysicalSize::new(rect.w, rect.h), scale),
    }
}

/// Which commands an apply should issue, given the live logical geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyPlan {
    pub resize: Option<LogicalSize>,
    pub movement: Option<LogicalPosition>,
    /// A needed command was held back by an active gesture.
    pub deferred: bool,
}

pub fn plan_apply(
    target: &TargetGeometry,
    current_position: LogicalPosition,
    current_size: LogicalSize,
    gesture: &GestureState,
    now: Millis,
    settings: &EngineSettings,
) -> ApplyPlan {
    let width_diff = (current_size.width as i64 - target.size.width as i64).unsigned_abs();
    let height_diff = (current_size.height as i64 - target.size.height as i64).unsigned_abs();
    let resize_threshold = settings.resize_threshold as u64;
    let needs_resize = width_diff > resize_threshold || height_diff > resize_threshold;
    let resize = (needs_resize
        && !gesture.blocks_resize(now, settings.user_resize_cooldown_ms))
    .then_some(target.size);

    let dx = (current_position.x as i64 - target.position.x as i64).unsigned_abs();
    let dy = (current_position.y as i64 - target.position.y as i64).unsigned_abs();
    let move_threshold = settings.move_threshold as u64;
    let needs_move = dx > move_threshold || dy > move_threshold;
    let movement = (needs_move && !gesture.blocks_move()).then_some(target.position);

    ApplyPlan {
        resize,
        movement,
        deferred: (needs_resize && resize.is_none()) || (needs_move && movement.is_none()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Reconciliation is not enabled for this window yet.
    Skipped,
    /// Target identical to the last fully applied one.
    Unchanged,
    Applied { moved: bool, resized: bool },
    /// A window-system call failed; the key was reset so the next trigger retries.
    Failed { resize_attempted: bool },
}

/// Idempotence guard plus the apply sequence for one window.
#[derive(Debug, Default)]
pub struct Reconciler {
    last_layout_key: Option<String>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_layout_key(&self) -> Option<&str> {
        self.last_layout_key.as_deref()
    }

    /// Forget the last applied target so the next trigger applies again.
    pub fn reset(&mut self) {
        self.last_layout_key = None;
    }

    #[allow(clippy::too_many_arguments)]
    pub fn apply<H: WindowHost + ?Sized>(
        &mut self,
        host: &H,
        label: &str,
        target: &TargetGeometry,
        scale_factor: f64,
        gesture: &mut GestureState,
        now: Millis,
        settings: &EngineSettings,
    ) -> ApplyOutcome {
        let key = target.layout_key();
        if self.last_layout_key.as_deref() == Some(key.as_str()) {
            return ApplyOutcome::Unchanged;
        }
        self.last_layout_key = Some(key);

        let mut resize_attempted = false;
        match self.apply_commands(
            host,
            label,
            target,
            scale_factor,
            gesture,
            now,
            settings,
            &mut resize_attempted,
        ) {
            Ok(plan) => {
                if plan.deferred {
                    self.last_layout_key = None;
                }
                ApplyOutcome::Applied {
                    moved: plan.movement.is_some(),
                    resized: plan.resize.is_some(),
                }
            }
            Err(err) => {
                tracing::warn!(label = %label, error = %err, "layout sync failed");
                self.last_layout_key = None;
                if let Err(err) = host.show(label) {
                    tracing::warn!(label = %label, error = %err, "failed to show window after layout failure");
                }
                ApplyOutcome::Failed { resize_attempted }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_commands<H: WindowHost + ?Sized>(
        &self,
        host: &H,
        label: &str,
        target: &TargetGeometry,
        scale_factor: f64,
        gesture: &mut GestureState,
        now: Millis,
        settings: &EngineSettings,
        resize_attempted: &mut bool,
    ) -> Result<ApplyPlan> {
        let size = host
            .inner_size(label)
            .with_context(|| format!("read inner size of {label}"))?;
        let position = host
            .outer_position(label)
            .with_context(|| format!("read outer position of {label}"))?;
        let current_size = size_to_logical(size, scale_factor);
        let current_position = position_to_logical(position, scale_factor);

        let plan = plan_apply(
            target,
            current_position,
            current_size,
            gesture,
            now,
            settings,
        );

        if let Some(size) = plan.resize {
            gesture.begin_programmatic_resize();
            *resize_attempted = true;
            tracing::info!(
                label = %label,
                from = ?current_size,
                to = ?size,
                "resizing window"
            );
            host.set_size(label, size)
                .with_context(|| format!("resize {label}"))?;
        }

        if let Some(position) = plan.movement {
            tracing::info!(
                label = %label,
                from = ?current_position,
                to = ?position,
                "moving window"
            );
            gesture.begin_programmatic_move();
            host.set_position(label, position)
                .with_context(|| format!("move {label}"))?;
        }

        host.set_always_on_top(label, true)
            .with_context(|| format!("keep {label} on top"))?;
        host.show(label).with_context(|| format!("show {label}"))?;

        Ok(plan)
    }
}
