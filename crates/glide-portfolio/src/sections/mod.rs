use glide_motion::{
    Anchor, AnimationStep, ElementId, FrameReport, MotionError, Property, Result, ScopeId, Stage,
    TriggerHandle, TriggerMode,
};

use crate::content::Content;
use crate::layout::{PageBuilder, Viewport, anchor_threshold};

pub mod about;
pub mod contact;
pub mod cursor;
pub mod hero;
pub mod leadership;
pub mod navigation;
pub mod projects;

/// Settings every section may need while mounting.
#[derive(Debug, Clone, Copy)]
pub struct MountContext {
    pub viewport: Viewport,
    pub pointer_time_constant: f64,
    pub glow_time_constant: f64,
}

pub trait Section {
    fn name(&self) -> &'static str;

    /// Insert this section's elements into the page.
    fn layout(&mut self, page: &mut PageBuilder, content: &Content);

    /// Register triggers, progress callbacks and pointer subscriptions, and
    /// start any on-mount animations.
    fn mount(&mut self, stage: &mut Stage, scope: ScopeId, ctx: &MountContext) -> Result<()>;

    /// Called after every frame. Default no-op.
    fn on_frame(&mut self, _stage: &mut Stage, _report: &FrameReport) {}

    /// Called when any element on the page is clicked.
    fn on_click(&mut self, _stage: &mut Stage, _element: ElementId) {}

    /// Elements reported in the run summary.
    fn elements(&self) -> Vec<ElementId>;
}

/// Every section of the page, in document order, plus the cursor overlay.
pub fn all_sections() -> Vec<Box<dyn Section>> {
    vec![
        Box::new(navigation::Navigation::default()),
        Box::new(hero::Hero::default()),
        Box::new(about::About::default()),
        Box::new(projects::Projects::default()),
        Box::new(leadership::Leadership::default()),
        Box::new(contact::Contact::default()),
        Box::new(cursor::Cursor::default()),
    ]
}

/// `{opacity: 0, <property>: offset}` to `{opacity: 1, <property>: 0}`.
pub(crate) fn fade_in(
    targets: impl IntoIterator<Item = ElementId>,
    property: Property,
    offset: f64,
    duration: f64,
    delay: f64,
) -> Result<AnimationStep> {
    AnimationStep::builder(targets)
        .from_to(Property::Opacity, 0.0, 1.0)
        .from_to(property, offset, 0.0)
        .duration(duration)
        .delay(delay)
        .ease_named("power3.out")
        .build()
}

/// Play `step` when `trigger` reaches `anchor`, and rewind it when scrolled
/// back above (`play none none reverse`).
pub(crate) fn reveal(
    stage: &mut Stage,
    scope: ScopeId,
    ctx: &MountContext,
    trigger: ElementId,
    anchor: &str,
    step: AnimationStep,
) -> Result<TriggerHandle> {
    let anchor: Anchor = anchor.parse()?;
    let rect = stage
        .document()
        .rect(trigger)
        .ok_or(MotionError::UnknownElement(trigger))?;
    let threshold = anchor_threshold(anchor, &rect, ctx.viewport.height);
    stage.entrance(scope, trigger, threshold, TriggerMode::Repeat, step)
}

/// Hide targets until their entrance plays.
pub(crate) fn hide(stage: &mut Stage, targets: &[ElementId]) {
    let doc = stage.document_mut();
    for &target in targets {
        doc.set_property(target, Property::Opacity, 0.0.into());
    }
}
