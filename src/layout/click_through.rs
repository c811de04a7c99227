//! Hit-test regions for the transparent overlay.
//!
//! The overlay is click-through everywhere except inside the rectangles
//! reported here. The list is recomputed on every tick and shrinks to empty as
//! soon as content disappears, so pass-through is restored without a separate
//! signal.

use crate::layout::host::WindowHost;
use crate::layout::model::{LogicalRect, PhysicalPosition, PhysicalRect};
use crate::layout::monitor::current_scale_factor;
use crate::layout::transform::local_rect_to_screen;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Independently interactive blocks the overlay can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContentBlock {
    DetailCard,
    DiagnosticPanel,
}

pub trait ContentSource: Send {
    /// Window-local logical bounds of every visible block, in report order.
    fn visible_blocks(&self) -> Vec<(ContentBlock, LogicalRect)>;
}

/// Content state written by the renderer and read by the reporter.
#[derive(Debug, Clone, Default)]
pub struct SharedContent {
    blocks: Arc<Mutex<BTreeMap<ContentBlock, LogicalRect>>>,
}

impl SharedContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&self, block: ContentBlock, bounds: LogicalRect) {
        if let Ok(mut blocks) = self.blocks.lock() {
            blocks.insert(block, bounds);
        }
    }

    pub fn hide(&self, block: ContentBlock) {
        if let Ok(mut blocks) = self.blocks.lock() {
            blocks.remove(&block);
        }
    }

    pub fn hide_all(&self) {
        if let Ok(mut blocks) = self.blocks.lock() {
            blocks.clear();
        }
    }
}

impl ContentSource for SharedContent {
    fn visible_blocks(&self) -> Vec<(ContentBlock, LogicalRect)> {
        self.blocks
            .lock()
            .map(|blocks| blocks.iter().map(|(block, rect)| (*block, *rect)).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickThroughRegion {
    rects: Vec<PhysicalRect>,
}

impl ClickThroughRegion {
    pub fn from_rects(rects: Vec<PhysicalRect>) -> Self {
        Self { rects }
    }

    pub fn rects(&self) -> &[PhysicalRect] {
        &self.rects
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Host-side decision: mouse input at `point` goes to the game beneath
    /// unless it lands inside a reported rect.
    pub fn should_pass_through(&self, point: (i32, i32)) -> bool {
        !self.rects.iter().any(|rect| rect.contains(point))
    }
}

pub fn measure_region(
    blocks: &[(ContentBlock, LogicalRect)],
    scale_factor: f64,
    window_origin: PhysicalPosition,
) -> ClickThroughRegion {
    let rects = blocks
        .iter()
        .filter(|(_, rect)| !rect.is_empty())
        .map(|(_, rect)| local_rect_to_screen(*rect, scale_factor, window_origin))
        .filter(|rect| rect.w > 0 && rect.h > 0)
        .collect();
    ClickThroughRegion::from_rects(rects)
}

pub struct ClickThroughReporter {
    source: Box<dyn ContentSource>,
    last_reported: Option<ClickThroughRegion>,
}

impl ClickThroughReporter {
    pub fn new(source: Box<dyn ContentSource>) -> Self {
        Self {
            source,
            last_reported: None,
        }
    }

    pub fn last_reported(&self) -> Option<&ClickThroughRegion> {
        self.last_reported.as_ref()
    }

    /// Measure and hand the region to the host. Returns the reported region,
    /// or `None` when the window origin could not be read this tick.
    pub fn tick<H: WindowHost + ?Sized>(
        &mut self,
        host: &H,
        label: &str,
    ) -> Option<ClickThroughRegion> {
        let blocks = self.source.visible_blocks();
        let region = if blocks.is_empty() {
            ClickThroughRegion::default()
        } else {
            let origin = match host.outer_position(label) {
                Ok(origin) => origin,
                Err(err) => {
                    tracing::debug!(label = %label, error = %err, "overlay origin unavailable; skipping click-through tick");
                    return None;
                }
            };
            let scale = current_scale_factor(host, label);
            measure_region(&blocks, scale, origin)
        };

        if let Err(err) = host.update_click_through_regions(label, region.rects()) {
            tracing::warn!(label = %label, error = %err, "failed to report click-through regions");
            return None;
        }
        if self.last_reported.as_ref() != Some(&region) {
            tracing::debug!(label = %label, rects = ?region.rects(), "click-through region changed");
        }
        self.last_reported = Some(region.clone());
        Some(region)
    }
}
