#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeLifecycle {
    Idle,
    Running,
    TornDown,
}

impl RuntimeLifecycle {
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

pub fn can_transition(from: RuntimeLifecycle, to: RuntimeLifecycle) -> bool {
    matches!(
        (from, to),
        (RuntimeLifecycle::Idle, RuntimeLifecycle::Running)
            | (RuntimeLifecycle::Running, RuntimeLifecycle::TornDown)
            | (RuntimeLifecycle::Idle, RuntimeLifecycle::TornDown)
    ) || from == to
}
