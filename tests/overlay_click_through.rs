use overlay_geometry::layout::store::LegacyCache;
use overlay_geometry::layout::{
    ApplyOutcome, ContentBlock, LogicalPosition, LogicalRect, LogicalSize, MonitorInfo,
    PhysicalPosition, PhysicalRect, PhysicalSize, OVERLAY_WINDOW,
};

#[path = "mock_host.rs"]
mod mock_host;
use mock_host::{Harness, MemoryPersistence, MockHost};

fn hidpi_harness() -> Harness {
    let monitor = MonitorInfo {
        width_physical: 2880,
        height_physical: 1620,
        scale_factor: 1.5,
        ..MonitorInfo::default()
    };
    Harness::build(
        MockHost::with_monitor(monitor),
        MemoryPersistence::default(),
        LegacyCache::in_memory(),
    )
}

#[test]
fn overlay_covers_the_monitor_on_start() {
    let h = Harness::started();
    let overlay = h.host.window(OVERLAY_WINDOW);
    assert_eq!(overlay.position, PhysicalPosition::new(0, 0));
    assert_eq!(overlay.size, PhysicalSize::new(1920, 1080));
}

#[test]
fn overlay_follows_the_game_window() {
    let h = Harness::started();
    let outcome = h
        .runtime
        .set_overlay_anchor(Some(PhysicalRect::new(200, 100, 1280, 720)))
        .unwrap();
    assert_eq!(
        outcome,
        ApplyOutcome::Applied {
            moved: true,
            resized: true
        }
    );
    let overlay = h.host.window(OVERLAY_WINDOW);
    assert_eq!(overlay.position, PhysicalPosition::new(200, 100));
    assert_eq!(overlay.size, PhysicalSize::new(1280, 720));
}

#[test]
fn overlay_uses_the_scale_of_the_monitor_under_the_game() {
    let h = Harness::started();
    let secondary = MonitorInfo {
        origin_x: 1920,
        origin_y: 0,
        width_physical: 3840,
        height_physical: 2160,
        scale_factor: 2.0,
    };
    h.host.set_monitors(vec![MonitorInfo::default(), secondary]);
    h.host.clear_calls();

    h.runtime
        .set_overlay_anchor(Some(PhysicalRect::new(2120, 100, 1600, 900)))
        .unwrap();
    assert_eq!(
        h.host.position_calls(OVERLAY_WINDOW),
        vec![LogicalPosition::new(1060, 50)]
    );
    assert_eq!(
        h.host.size_calls(OVERLAY_WINDOW),
        vec![LogicalSize::new(800, 450)]
    );
}

#[test]
fn overlay_ignores_user_gestures() {
    let h = Harness::started();
    h.user_move(OVERLAY_WINDOW, 50, 50);
    h.user_resize(OVERLAY_WINDOW, 640, 480);
    h.advance(3000);

    assert!(h.persistence.writes_for(OVERLAY_WINDOW).is_empty());
    let gesture = h.runtime.gesture(OVERLAY_WINDOW).unwrap();
    assert!(!gesture.is_user_dragging);
    assert!(!gesture.is_user_resizing);
}

#[test]
fn empty_overlay_reports_no_regions() {
    let h = Harness::started();
    let reports = h.host.click_through_reports(OVERLAY_WINDOW);
    assert!(!reports.is_empty());
    assert!(reports.iter().all(|rects| rects.is_empty()));
    assert!(h.runtime.last_click_through().unwrap().unwrap().is_empty());
}

#[test]
fn visible_card_is_reported_in_screen_pixels() {
    let h = hidpi_harness();
    h.start();
    h.host.place(
        OVERLAY_WINDOW,
        PhysicalPosition::new(100, 50),
        PhysicalSize::new(2880, 1620),
    );
    h.content
        .show(ContentBlock::DetailCard, LogicalRect::new(10.0, 10.0, 300.0, 200.0));
    h.advance(200);

    let region = h.runtime.last_click_through().unwrap().unwrap();
    assert_eq!(region.rects(), &[PhysicalRect::new(115, 65, 450, 300)]);
    assert!(!region.should_pass_through((300, 200)));
    assert!(region.should_pass_through((90, 40)));

    h.content.hide_all();
    h.advance(200);
    assert_eq!(
        h.host.click_through_reports(OVERLAY_WINDOW).last(),
        Some(&Vec::new())
    );
}

#[test]
fn unreadable_origin_skips_the_tick() {
    let h = Harness::started();
    h.content
        .show(ContentBlock::DiagnosticPanel, LogicalRect::new(0.0, 0.0, 50.0, 50.0));
    h.host.set_fail_outer_position(true);
    let before = h.host.click_through_reports(OVERLAY_WINDOW).len();

    h.advance(200);
    assert_eq!(h.host.click_through_reports(OVERLAY_WINDOW).len(), before);

    h.host.set_fail_outer_position(false);
    h.advance(200);
    assert_eq!(
        h.host.click_through_reports(OVERLAY_WINDOW).last(),
        Some(&vec![PhysicalRect::new(0, 0, 50, 50)])
    );
}
