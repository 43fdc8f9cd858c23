//! Headless page driver.
//!
//! Lays out the page, mounts every section in its own scope, then feeds the
//! stage a synthetic scroll and pointer path one frame at a time. At the end
//! all scopes are disposed and the trackers are checked for leftovers.

use std::collections::BTreeMap;

use anyhow::Context as _;
use glide_config::GlideConfig;
use glide_motion::{
    ElementId, FrameReport, FrameSnapshot, HoverChange, PlaybackEvent, PointerCapabilities,
    ScopeId, Stage,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::actions::{ActionHandler, OutboundAction};
use crate::content::Content;
use crate::layout::{Page, PageBuilder, Viewport};
use crate::sections::{MountContext, Section, all_sections};

/// Knobs for a headless run.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverOptions {
    pub viewport: Viewport,
    pub frames: u32,
    pub frame_rate: f64,
    /// Scroll speed in px per second.
    pub scroll_speed: f64,
    pub coarse_pointer: bool,
    pub pointer_time_constant: f64,
    pub glow_time_constant: f64,
    /// Treat every hover on a link as a click.
    pub clicks: bool,
}

impl DriverOptions {
    pub fn from_config(config: &GlideConfig) -> Self {
        Self {
            viewport: Viewport::new(config.viewport.width, config.viewport.height),
            frames: config.demo.frames,
            frame_rate: config.engine.frame_rate,
            scroll_speed: config.demo.scroll_speed,
            coarse_pointer: config.demo.coarse_pointer,
            pointer_time_constant: config.engine.pointer_time_constant,
            glow_time_constant: config.engine.glow_time_constant,
            clicks: false,
        }
    }

    fn frame_interval(&self) -> f64 {
        if self.frame_rate > 0.0 { 1.0 / self.frame_rate } else { 1.0 / 60.0 }
    }

    fn capabilities(&self) -> PointerCapabilities {
        if self.coarse_pointer {
            PointerCapabilities::coarse()
        } else {
            PointerCapabilities::fine()
        }
    }
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self::from_config(&GlideConfig::default())
    }
}

/// A mounted page.
pub struct Portfolio {
    stage: Stage,
    sections: Vec<(ScopeId, Box<dyn Section>)>,
    actions: BTreeMap<ElementId, OutboundAction>,
    viewport: Viewport,
    height: f64,
    clock: f64,
}

impl Portfolio {
    /// Lay out `content` and mount every section.
    pub fn mount(content: &Content, options: &DriverOptions) -> anyhow::Result<Self> {
        let mut sections = all_sections();
        let mut builder = PageBuilder::new(options.viewport);
        for section in &mut sections {
            section.layout(&mut builder, content);
        }
        let Page {
            document,
            height,
            interactive,
            actions,
        } = builder.finish();
        debug!(
            elements = document.len(),
            interactive = interactive.len(),
            height,
            "page laid out"
        );

        let mut stage = Stage::new(document, options.capabilities());
        let ctx = MountContext {
            viewport: options.viewport,
            pointer_time_constant: options.pointer_time_constant,
            glow_time_constant: options.glow_time_constant,
        };

        let mut mounted = Vec::with_capacity(sections.len());
        for mut section in sections {
            let scope = stage.open_scope(section.name());
            section
                .mount(&mut stage, scope, &ctx)
                .with_context(|| format!("mounting section `{}`", section.name()))?;
            mounted.push((scope, section));
        }
        info!(sections = mounted.len(), "page mounted");

        Ok(Self {
            stage,
            sections: mounted,
            actions,
            viewport: options.viewport,
            height,
            clock: 0.0,
        })
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn max_scroll(&self) -> f64 {
        (self.height - self.viewport.height).max(0.0)
    }

    pub fn action_for(&self, element: ElementId) -> Option<&OutboundAction> {
        self.actions.get(&element)
    }

    /// Click `element`: sections react first, then its outbound action (if
    /// any) is returned for dispatch.
    pub fn click(&mut self, element: ElementId) -> Option<OutboundAction> {
        for (_, section) in &mut self.sections {
            section.on_click(&mut self.stage, element);
        }
        self.actions.get(&element).cloned()
    }

    /// Record a pointer move at the current clock.
    pub fn pointer_moved(&mut self, x: f64, y: f64) -> bool {
        self.stage.pointer_moved(x, y, self.clock)
    }

    pub fn pointer_entered(&mut self) -> bool {
        self.stage.pointer_entered()
    }

    pub fn pointer_left(&mut self) -> bool {
        self.stage.pointer_left()
    }

    /// Advance by `dt` with the viewport at `scroll_y`.
    pub fn frame(&mut self, scroll_y: f64, dt: f64) -> FrameReport {
        self.clock += dt;
        let scroll_y = scroll_y.clamp(0.0, self.max_scroll());
        let snapshot = FrameSnapshot::new(self.clock, scroll_y, self.viewport.width, self.viewport.height);
        let report = self.stage.frame(snapshot, dt);
        for (_, section) in &mut self.sections {
            section.on_frame(&mut self.stage, &report);
        }
        report
    }

    /// Registrations still held by the trackers and player.
    pub fn live_registrations(&self) -> usize {
        self.stage.intersection().len()
            + self.stage.scroll().len()
            + self.stage.pointer().len()
            + self.stage.hover().len()
            + self.stage.player().active_count()
    }

    /// Current property values of every element a section reports.
    pub fn element_summary(&self) -> BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>> {
        let doc = self.stage.document();
        self.sections
            .iter()
            .map(|(_, section)| {
                let elements = section
                    .elements()
                    .into_iter()
                    .filter_map(|id| {
                        let name = doc.name(id)?.to_string();
                        let properties = doc
                            .properties(id)
                            .map(|props| {
                                props
                                    .iter()
                                    .map(|(property, value)| (property.to_string(), value.render()))
                                    .collect()
                            })
                            .unwrap_or_default();
                        Some((name, properties))
                    })
                    .collect();
                (section.name().to_string(), elements)
            })
            .collect()
    }

    /// Dispose every section's scope, last mounted first.
    pub fn unmount(&mut self) {
        for (scope, section) in self.sections.iter().rev() {
            if !self.stage.dispose(*scope) {
                debug!(section = section.name(), "already unmounted");
            }
        }
        // Scopes opened outside the section list.
        self.stage.dispose_all();
    }
}

/// Summary of a headless run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub frames: u32,
    pub final_scroll: f64,
    pub max_scroll: f64,
    pub commands_applied: usize,
    pub started: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub reversed: usize,
    pub repeated: usize,
    pub hover_enters: usize,
    pub actions: Vec<OutboundAction>,
    /// Section name to element name to rendered property values, captured
    /// before unmounting.
    pub elements: BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>,
    /// Registrations left after unmounting. Zero for a clean run.
    pub leaked: usize,
}

impl RunReport {
    fn record(&mut self, report: &FrameReport) {
        self.commands_applied += report.commands_applied;
        for event in &report.events {
            match event {
                PlaybackEvent::Started { .. } => self.started += 1,
                PlaybackEvent::Completed { .. } => self.completed += 1,
                PlaybackEvent::Cancelled { .. } => self.cancelled += 1,
                PlaybackEvent::Reversed { .. } => self.reversed += 1,
                PlaybackEvent::Repeated { .. } => self.repeated += 1,
            }
        }
        self.hover_enters += report
            .hover_changes
            .iter()
            .filter(|change| matches!(change, HoverChange::Entered(_)))
            .count();
    }
}

/// Synthetic pointer path: a Lissajous figure around the viewport centre.
pub fn pointer_path(viewport: Viewport, t: f64) -> (f64, f64) {
    let cx = viewport.width / 2.0;
    let cy = viewport.height / 2.0;
    (cx + cx * 0.8 * (t * 0.7).sin(), cy + cy * 0.8 * (t * 1.1).sin())
}

/// Mount the page, run `options.frames` frames and unmount.
pub fn run(
    content: &Content,
    options: &DriverOptions,
    actions: &mut dyn ActionHandler,
) -> anyhow::Result<RunReport> {
    let mut portfolio = Portfolio::mount(content, options)?;
    let dt = options.frame_interval();
    let max_scroll = portfolio.max_scroll();

    let mut report = RunReport {
        max_scroll,
        ..RunReport::default()
    };
    let mut scroll = 0.0;
    let mut direction = 1.0;

    for frame in 0..options.frames {
        let t = f64::from(frame) * dt;
        let (x, y) = pointer_path(options.viewport, t);
        portfolio.pointer_moved(x, y);

        let frame_report = portfolio.frame(scroll, dt);
        report.record(&frame_report);

        if options.clicks {
            for change in &frame_report.hover_changes {
                let HoverChange::Entered(element) = change else {
                    continue;
                };
                if let Some(action) = portfolio.click(*element) {
                    if let Err(err) = actions.dispatch(&action) {
                        warn!(?action, error = %err, "action failed");
                    }
                    report.actions.push(action);
                }
            }
        }

        scroll += direction * options.scroll_speed * dt;
        if scroll >= max_scroll {
            scroll = max_scroll;
            direction = -1.0;
        } else if scroll <= 0.0 {
            scroll = 0.0;
            direction = 1.0;
        }
        report.frames += 1;
    }

    report.final_scroll = portfolio.stage().last_snapshot().scroll_y;
    report.elements = portfolio.element_summary();
    portfolio.unmount();
    report.leaked = portfolio.live_registrations();
    if report.leaked > 0 {
        warn!(leaked = report.leaked, "registrations survived unmount");
    }

    info!(
        frames = report.frames,
        started = report.started,
        completed = report.completed,
        hover_enters = report.hover_enters,
        actions = report.actions.len(),
        "run finished"
    );
    Ok(report)
}
