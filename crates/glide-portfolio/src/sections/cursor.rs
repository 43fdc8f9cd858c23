//! Custom cursor: a lagging ring, a dot pinned to the pointer and a slow
//! glow. Grows the ring over links and buttons, fades out while the pointer is
//! outside the page. Inert on touch devices.

use glide_motion::{
    Easing, ElementId, FrameReport, PointerMode, Property, PropertyValue, Rect, Result, ScopeId,
    Stage,
};
use tracing::debug;

use super::{MountContext, Section, hide};
use crate::content::Content;
use crate::layout::PageBuilder;

const RING_SIZE: f64 = 32.0;
const DOT_SIZE: f64 = 8.0;
const GLOW_SIZE: f64 = 600.0;

const FADE: f64 = 0.3;
const HOVER_TWEEN: f64 = 0.2;
const HOVER_RING_SCALE: f64 = 1.5;

#[derive(Debug, Default)]
pub struct Cursor {
    ring: Option<ElementId>,
    dot: Option<ElementId>,
    glow: Option<ElementId>,
    /// Interactive elements laid out before the overlay.
    watch: Vec<ElementId>,
    scope: Option<ScopeId>,
    hovering: bool,
}

impl Cursor {
    pub fn is_hovering(&self) -> bool {
        self.hovering
    }
}

impl Section for Cursor {
    fn name(&self) -> &'static str {
        "cursor"
    }

    fn layout(&mut self, page: &mut PageBuilder, _content: &Content) {
        self.watch = page.interactive().to_vec();
        self.ring = Some(page.element("cursor-ring", Rect::new(0.0, 0.0, RING_SIZE, RING_SIZE)));
        self.dot = Some(page.element("cursor-dot", Rect::new(0.0, 0.0, DOT_SIZE, DOT_SIZE)));
        self.glow = Some(page.element("cursor-glow", Rect::new(0.0, 0.0, GLOW_SIZE, GLOW_SIZE)));
    }

    fn mount(&mut self, stage: &mut Stage, scope: ScopeId, ctx: &MountContext) -> Result<()> {
        let (Some(ring), Some(dot), Some(glow)) = (self.ring, self.dot, self.glow) else {
            return Ok(());
        };
        hide(stage, &[ring, dot, glow]);

        if !stage.pointer().is_listening() {
            debug!("coarse pointer, cursor overlay stays hidden");
            return Ok(());
        }
        self.scope = Some(scope);

        let sink = stage.sink(scope);
        stage.subscribe_pointer(
            scope,
            PointerMode::Smoothed {
                time_constant: ctx.pointer_time_constant,
            },
            move |sample| {
                sink.set(ring, Property::X, sample.x - RING_SIZE / 2.0);
                sink.set(ring, Property::Y, sample.y - RING_SIZE / 2.0);
            },
        );

        let sink = stage.sink(scope);
        stage.subscribe_presence(scope, move |inside| {
            let opacity = if inside { 1.0 } else { 0.0 };
            for target in [ring, dot, glow] {
                sink.tween_to(
                    target,
                    [(Property::Opacity, PropertyValue::number(opacity))],
                    FADE,
                    Easing::default(),
                );
            }
        });

        let sink = stage.sink(scope);
        stage.subscribe_pointer(scope, PointerMode::Raw, move |sample| {
            sink.set(dot, Property::X, sample.x - DOT_SIZE / 2.0);
            sink.set(dot, Property::Y, sample.y - DOT_SIZE / 2.0);
        });

        let sink = stage.sink(scope);
        stage.subscribe_pointer(
            scope,
            PointerMode::Smoothed {
                time_constant: ctx.glow_time_constant,
            },
            move |sample| {
                sink.set(glow, Property::X, sample.x - GLOW_SIZE / 2.0);
                sink.set(glow, Property::Y, sample.y - GLOW_SIZE / 2.0);
            },
        );

        for &element in &self.watch {
            stage.watch_hover(scope, element);
        }
        Ok(())
    }

    fn on_frame(&mut self, stage: &mut Stage, report: &FrameReport) {
        let (Some(scope), Some(ring), Some(dot)) = (self.scope, self.ring, self.dot) else {
            return;
        };
        if report.hover_changes.is_empty() {
            return;
        }

        let hovering = stage.hover().is_any_hovered();
        if hovering == self.hovering {
            return;
        }
        self.hovering = hovering;

        let (ring_scale, dot_scale) = if hovering { (HOVER_RING_SCALE, 0.0) } else { (1.0, 1.0) };
        let sink = stage.sink(scope);
        let ease = Easing::default();
        sink.tween_to(ring, [(Property::Scale, PropertyValue::number(ring_scale))], HOVER_TWEEN, ease);
        sink.tween_to(dot, [(Property::Scale, PropertyValue::number(dot_scale))], HOVER_TWEEN, ease);
    }

    fn elements(&self) -> Vec<ElementId> {
        [self.ring, self.dot, self.glow].into_iter().flatten().collect()
    }
}
