//! Fixed top navigation bar. Narrow viewports get a toggleable menu panel
//! in place of the inline links.

use std::rc::Rc;

use glide_motion::{
    AnimationStep, ElementId, FrameReport, Property, PropertyValue, Rect, Result, ScopeId, Stage,
};
use tracing::debug;

use super::{MountContext, Section, hide};
use crate::actions::{OutboundAction, mailto};
use crate::content::Content;
use crate::layout::PageBuilder;

/// Scroll offset past which the bar gets its backdrop.
pub const SCROLLED_OFFSET: f64 = 100.0;

/// Viewports narrower than this collapse the links into the menu.
pub const MENU_BREAKPOINT: f64 = 768.0;

const MENU_ITEM_HEIGHT: f64 = 56.0;

#[derive(Debug, Default)]
pub struct Navigation {
    bar: Option<ElementId>,
    links: Vec<ElementId>,
    menu: Option<Menu>,
    scope: Option<ScopeId>,
    scrolled: bool,
}

#[derive(Debug)]
struct Menu {
    toggle: ElementId,
    panel: ElementId,
    links: Vec<ElementId>,
    open: bool,
    /// Panel and link entrances, built on mount.
    steps: Option<(Rc<AnimationStep>, Rc<AnimationStep>)>,
}

impl Navigation {
    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu.as_ref().is_some_and(|m| m.open)
    }

    /// Open or close the menu. No-op on wide viewports.
    pub fn toggle_menu(&mut self, stage: &mut Stage) {
        if self.is_menu_open() {
            self.close_menu(stage);
        } else {
            self.open_menu(stage);
        }
    }

    pub fn open_menu(&mut self, stage: &mut Stage) {
        let (Some(scope), Some(menu)) = (self.scope, self.menu.as_mut()) else {
            return;
        };
        if menu.open {
            return;
        }
        let Some((panel_in, links_in)) = menu.steps.clone() else {
            return;
        };
        menu.open = true;
        debug!("menu opened");

        let sink = stage.sink(scope);
        sink.set(menu.toggle, Property::Custom("icon".to_string()), PropertyValue::keyword("close"));
        sink.play(&panel_in);
        sink.play(&links_in);
    }

    /// Close the menu and hide its panel right away.
    pub fn close_menu(&mut self, stage: &mut Stage) {
        let (Some(scope), Some(menu)) = (self.scope, self.menu.as_mut()) else {
            return;
        };
        if !menu.open {
            return;
        }
        menu.open = false;
        debug!("menu closed");

        let sink = stage.sink(scope);
        if let Some((panel_in, links_in)) = &menu.steps {
            sink.cancel(panel_in.id());
            sink.cancel(links_in.id());
        }
        sink.set(menu.toggle, Property::Custom("icon".to_string()), PropertyValue::keyword("menu"));
        for &target in std::iter::once(&menu.panel).chain(&menu.links) {
            sink.set(target, Property::Opacity, 0.0);
        }
    }
}

impl Section for Navigation {
    fn name(&self) -> &'static str {
        "navigation"
    }

    fn layout(&mut self, page: &mut PageBuilder, content: &Content) {
        let viewport = page.viewport();
        let height = if viewport.width >= 1024.0 { 80.0 } else { 64.0 };
        let gutter = viewport.gutter();

        self.bar = Some(page.element("nav", Rect::new(0.0, 0.0, viewport.width, height)));
        self.links.push(page.link(
            "nav-logo",
            Rect::new(gutter, 20.0, 48.0, 32.0),
            OutboundAction::ScrollTo("#".to_string()),
        ));

        let email = content.contact.email;
        if viewport.width < MENU_BREAKPOINT {
            let toggle = page.hoverable(
                "menu-toggle",
                Rect::new(viewport.width - gutter - 40.0, (height - 40.0) / 2.0, 40.0, 40.0),
            );
            let rows = content.nav.len() + 1;
            let panel = page.element(
                "menu-panel",
                Rect::new(0.0, height, viewport.width, 24.0 + MENU_ITEM_HEIGHT * rows as f64),
            );
            let mut links = Vec::with_capacity(rows);
            let mut y = height + 24.0;
            for item in &content.nav {
                links.push(page.link(
                    format!("menu-{}", item.label.to_lowercase()),
                    Rect::new(gutter, y, viewport.content_width(), 40.0),
                    OutboundAction::ScrollTo(item.href.to_string()),
                ));
                y += MENU_ITEM_HEIGHT;
            }
            links.push(page.link(
                "menu-cta",
                Rect::new(gutter, y, viewport.content_width(), 44.0),
                OutboundAction::MailTo(mailto(email, None, None)),
            ));
            self.menu = Some(Menu {
                toggle,
                panel,
                links,
                open: false,
                steps: None,
            });
            return;
        }

        let mut x = viewport.width - gutter - 140.0 - 100.0 * content.nav.len() as f64;
        for item in &content.nav {
            self.links.push(page.link(
                format!("nav-{}", item.label.to_lowercase()),
                Rect::new(x, 24.0, 80.0, 32.0),
                OutboundAction::ScrollTo(item.href.to_string()),
            ));
            x += 100.0;
        }
        self.links.push(page.link(
            "nav-cta",
            Rect::new(x, 18.0, 140.0, 44.0),
            OutboundAction::MailTo(mailto(email, None, None)),
        ));
    }

    fn mount(&mut self, stage: &mut Stage, scope: ScopeId, _ctx: &MountContext) -> Result<()> {
        let Some(bar) = self.bar else {
            return Ok(());
        };

        let slide_in = AnimationStep::builder([bar])
            .from_to(Property::Y, -100.0, 0.0)
            .from_to(Property::Opacity, 0.0, 1.0)
            .duration(1.0)
            .delay(1.5)
            .ease_named("power3.out")
            .build()?;
        stage.play(scope, &slide_in);
        self.scope = Some(scope);

        if let Some(menu) = self.menu.as_mut() {
            let panel_in = AnimationStep::builder([menu.panel])
                .from_to(Property::Opacity, 0.0, 1.0)
                .from_to(Property::Y, -20.0, 0.0)
                .duration(0.3)
                .ease_named("power2.out")
                .build()?;
            let links_in = AnimationStep::builder(menu.links.iter().copied())
                .from_to(Property::Opacity, 0.0, 1.0)
                .from_to(Property::X, -20.0, 0.0)
                .duration(0.3)
                .stagger(0.05)
                .delay(0.1)
                .build()?;
            menu.steps = Some((Rc::new(panel_in), Rc::new(links_in)));

            let mut closed = vec![menu.panel];
            closed.extend(&menu.links);
            hide(stage, &closed);
            stage.document_mut().set_property(
                menu.toggle,
                Property::Custom("icon".to_string()),
                PropertyValue::keyword("menu"),
            );
        }
        Ok(())
    }

    fn on_click(&mut self, stage: &mut Stage, element: ElementId) {
        let Some(menu) = &self.menu else {
            return;
        };
        let toggled = element == menu.toggle;
        let followed = menu.links.contains(&element);
        if toggled {
            self.toggle_menu(stage);
        } else if followed {
            self.close_menu(stage);
        }
    }

    fn on_frame(&mut self, stage: &mut Stage, _report: &FrameReport) {
        let scrolled = stage.last_snapshot().scroll_y > SCROLLED_OFFSET;
        if scrolled == self.scrolled {
            return;
        }
        self.scrolled = scrolled;
        debug!(scrolled, "navigation backdrop toggled");

        if let Some(bar) = self.bar {
            let backdrop = if scrolled { "blur(24px)" } else { "none" };
            stage.document_mut().set_property(
                bar,
                Property::Custom("backdrop".to_string()),
                PropertyValue::keyword(backdrop),
            );
        }
    }

    fn elements(&self) -> Vec<ElementId> {
        let mut elements: Vec<_> = self.bar.into_iter().collect();
        if let Some(menu) = &self.menu {
            elements.push(menu.toggle);
            elements.push(menu.panel);
        }
        elements
    }
}
