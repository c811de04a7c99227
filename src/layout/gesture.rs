//! Classification of window-system move/resize notifications into user
//! gestures versus echoes of our own programmatic changes.
//!
//! The functions here only mutate [`GestureState`] and report a decision. The
//! window controller owns the timers that persist and later clear the flags.

use crate::layout::model::{LogicalSize, PhysicalPosition, PhysicalSize};
use crate::layout::timer::Millis;
use crate::layout::transform::size_to_logical;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GestureState {
    pub is_user_dragging: bool,
    pub is_user_resizing: bool,
    pub is_programmatic_resize: bool,
    pub is_programmatic_move: bool,
    pub last_user_resize_at: Option<Millis>,
}

impl GestureState {
    pub fn recently_user_resized(&self, now: Millis, cooldown_ms: Millis) -> bool {
        self.last_user_resize_at
            .is_some_and(|at| now.saturating_sub(at) < cooldown_ms)
    }

    /// Reconciliation must not resize while any of these hold.
    pub fn blocks_resize(&self, now: Millis, cooldown_ms: Millis) -> bool {
        self.is_user_resizing
            || self.is_programmatic_resize
            || self.recently_user_resized(now, cooldown_ms)
    }

    pub fn blocks_move(&self) -> bool {
        self.is_user_dragging
    }

    pub fn begin_programmatic_resize(&mut self) {
        self.is_programmatic_resize = true;
    }

    pub fn begin_programmatic_move(&mut self) {
        self.is_programmatic_move = true;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// What the classifier needs to know about the window at event time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureContext {
    /// False during the grace period after window creation.
    pub initialized: bool,
    /// True while the splash screen owns the window's geometry.
    pub splash_active: bool,
}

impl GestureContext {
    fn ignore_reason(self) -> Option<IgnoreReason> {
        if !self.initialized {
            Some(IgnoreReason::NotInitialized)
        } else if self.splash_active {
            Some(IgnoreReason::Splash)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NotInitialized,
    Splash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDecision {
    /// The move was caused by our own `set_position`.
    ProgrammaticEcho,
    Ignore(IgnoreReason),
    UserDrag { position: PhysicalPosition },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeDecision {
    /// The resize was caused by our own `set_size`; schedule the flag release
    /// and do nothing else.
    ProgrammaticEcho,
    Ignore(IgnoreReason),
    UserResize {
        physical: PhysicalSize,
        logical: LogicalSize,
    },
    /// A user resize whose logical size is not above the floor.
    BelowFloor { logical: LogicalSize },
}

pub fn classify_move(
    state: &mut GestureState,
    context: GestureContext,
    position: PhysicalPosition,
) -> MoveDecision {
    if state.is_programmatic_move {
        return MoveDecision::ProgrammaticEcho;
    }
    if let Some(reason) = context.ignore_reason() {
        return MoveDecision::Ignore(reason);
    }
    state.is_user_dragging = true;
    MoveDecision::UserDrag { position }
}

pub fn classify_resize(
    state: &mut GestureState,
    context: GestureContext,
    physical: PhysicalSize,
    scale_factor: f64,
    size_floor: LogicalSize,
    now: Millis,
) -> ResizeDecision {
    if state.is_programmatic_resize {
        return ResizeDecision::ProgrammaticEcho;
    }
    if let Some(reason) = context.ignore_reason() {
        return ResizeDecision::Ignore(reason);
    }

    state.is_user_resizing = true;
    state.last_user_resize_at = Some(now);

    let logical = size_to_logical(physical, scale_factor);
    if logical.width > size_floor.width && logical.height > size_floor.height {
        ResizeDecision::UserResize { physical, logical }
    } else {
        ResizeDecision::BelowFloor { logical }
    }
}
