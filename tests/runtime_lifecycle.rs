use overlay_geometry::layout::state::RuntimeLifecycle;
use overlay_geometry::layout::{
    HostEvent, LayoutMode, PhysicalPosition, WindowGeometry, DETAIL_POPUP_WINDOW, MAIN_WINDOW,
    OVERLAY_WINDOW,
};

#[path = "mock_host.rs"]
mod mock_host;
use mock_host::Harness;

#[test]
fn start_is_idempotent() {
    let h = Harness::new();
    assert_eq!(h.runtime.lifecycle(), RuntimeLifecycle::Idle);
    h.runtime.start().unwrap();
    let pending = h.runtime.pending_timers(MAIN_WINDOW).unwrap();
    h.runtime.start().unwrap();
    assert_eq!(h.runtime.pending_timers(MAIN_WINDOW).unwrap(), pending);
    assert_eq!(h.runtime.lifecycle(), RuntimeLifecycle::Running);
}

#[test]
fn teardown_cancels_every_timer() {
    let h = Harness::started();
    h.runtime.hide_popup().unwrap();
    assert!(h.runtime.pending_timers(OVERLAY_WINDOW).unwrap() > 0);

    h.runtime.teardown().unwrap();
    for label in [MAIN_WINDOW, OVERLAY_WINDOW, DETAIL_POPUP_WINDOW] {
        assert_eq!(h.runtime.pending_timers(label).unwrap(), 0);
    }

    h.host.clear_calls();
    h.advance(5000);
    assert!(h.host.calls().is_empty());

    assert!(h.runtime.set_layout_mode(LayoutMode::Expanded).is_err());
    assert!(h.runtime.start().is_err());
    h.runtime.teardown().unwrap();
    assert_eq!(h.runtime.lifecycle(), RuntimeLifecycle::TornDown);
}

#[test]
fn current_geometry_reports_physical_pixels() {
    let h = Harness::expanded();
    assert_eq!(
        h.runtime.current_geometry(MAIN_WINDOW).unwrap(),
        Some(WindowGeometry {
            window_id: MAIN_WINDOW.to_string(),
            x: 1520,
            y: 0,
            width: 400,
            height: 700,
        })
    );
}

#[test]
fn unknown_labels_are_rejected() {
    let h = Harness::new();
    assert!(h.runtime.current_geometry("settings").is_err());
    assert!(h
        .senders
        .send(
            "settings",
            HostEvent::Moved {
                position: PhysicalPosition::new(0, 0)
            }
        )
        .is_err());
}

#[test]
fn events_before_start_are_handled_after_start() {
    let h = Harness::new();
    h.senders
        .send(
            MAIN_WINDOW,
            HostEvent::Moved {
                position: PhysicalPosition::new(1, 1),
            },
        )
        .unwrap();
    assert_eq!(h.runtime.pump_events().unwrap(), 0);

    h.runtime.start().unwrap();
    assert_eq!(h.runtime.pump_events().unwrap(), 1);
    assert!(!h.runtime.gesture(MAIN_WINDOW).unwrap().is_user_dragging);
}
