//! Full-screen introduction with name, role, call to action and socials.
//!
//! On mount every element plays its entrance. While the hero scrolls out,
//! the name lines drift up at different rates and the role blurs. The name
//! lines also follow the pointer.

use glide_motion::{
    Anchor, AnimationStep, Easing, ElementId, PointerMode, Property, PropertyValue, Rect, Result,
    ScopeId, ScrollRange, Stage,
};

use super::{MountContext, Section, hide};
use crate::actions::{OutboundAction, mailto};
use crate::content::Content;
use crate::layout::{Column, PageBuilder};

/// Scroll drift of each name line at full progress.
const FIRST_NAME_DRIFT: f64 = -200.0;
const LAST_NAME_DRIFT: f64 = -400.0;
/// Role blur at full progress, in px.
const ROLE_BLUR: f64 = 10.0;

/// Pointer parallax amplitude (x, y) per name line.
const FIRST_NAME_SWAY: (f64, f64) = (20.0, 10.0);
const LAST_NAME_SWAY: (f64, f64) = (40.0, 20.0);

#[derive(Debug, Default, Clone)]
struct HeroElements {
    section: Option<ElementId>,
    background: Option<ElementId>,
    first_name: Option<ElementId>,
    last_name: Option<ElementId>,
    role: Option<ElementId>,
    cta: Option<ElementId>,
    socials: Option<ElementId>,
}

#[derive(Debug, Default)]
pub struct Hero {
    el: HeroElements,
}

impl Section for Hero {
    fn name(&self) -> &'static str {
        "hero"
    }

    fn layout(&mut self, page: &mut PageBuilder, content: &Content) {
        let viewport = page.viewport();
        let (section, rect) = page.section("hero", viewport.height);
        self.el.section = Some(section);
        self.el.background = Some(page.element("hero-bg", rect));

        let mut column = Column::new(
            viewport.content_left(),
            viewport.content_width(),
            rect.top() + rect.height * 0.25,
            16.0,
        );
        self.el.first_name = Some(page.element("hero-first-name", column.next(160.0)));
        self.el.last_name = Some(page.element("hero-last-name", column.next(160.0)));
        self.el.role = Some(page.element("hero-role", column.next(40.0)));
        let cta = column.next(56.0);
        self.el.cta = Some(page.link(
            "hero-cta",
            Rect::new(cta.x, cta.y, 200.0, cta.height),
            OutboundAction::ScrollTo("#projects".to_string()),
        ));

        let socials = Rect::new(viewport.gutter(), rect.bottom() - 200.0, 40.0, 150.0);
        self.el.socials = Some(page.element("hero-socials", socials));
        for (i, social) in content.socials.iter().take(2).enumerate() {
            page.link(
                format!("hero-social-{}", social.name.to_lowercase()),
                Rect::new(socials.x, socials.y + i as f64 * 50.0, 40.0, 40.0),
                OutboundAction::OpenLink(social.url.to_string()),
            );
        }
        page.link(
            "hero-social-mail",
            Rect::new(socials.x, socials.y + 100.0, 40.0, 40.0),
            OutboundAction::MailTo(mailto(content.contact.email, None, None)),
        );
    }

    fn mount(&mut self, stage: &mut Stage, scope: ScopeId, ctx: &MountContext) -> Result<()> {
        let HeroElements {
            section: Some(section),
            background: Some(background),
            first_name: Some(first_name),
            last_name: Some(last_name),
            role: Some(role),
            cta: Some(cta),
            socials: Some(socials),
        } = self.el.clone()
        else {
            return Ok(());
        };

        hide(stage, &[background, first_name, last_name, role, cta, socials]);

        let background_zoom = AnimationStep::builder([background])
            .from_to(Property::Scale, 1.2, 1.0)
            .from_to(Property::Opacity, 0.0, 1.0)
            .duration(1.8)
            .ease_named("power2.out")
            .build()?;
        let first_line = name_rise(first_name, 0.2)?;
        let last_line = name_rise(last_name, 0.3)?;
        let role_in = AnimationStep::builder([role])
            .from_to(Property::Opacity, 0.0, 1.0)
            .from_to(Property::Y, 20.0, 0.0)
            .duration(1.0)
            .delay(0.8)
            .ease_named("power2.out")
            .build()?;
        let cta_pop = AnimationStep::builder([cta])
            .from_to(Property::Scale, 0.0, 1.0)
            .from_to(Property::Opacity, 0.0, 1.0)
            .duration(0.6)
            .delay(1.0)
            .ease_named("back.out(1.7)")
            .build()?;
        let socials_in = AnimationStep::builder([socials])
            .from_to(Property::Opacity, 0.0, 1.0)
            .from_to(Property::X, -20.0, 0.0)
            .duration(0.8)
            .delay(1.2)
            .ease_named("power2.out")
            .build()?;

        for step in [&background_zoom, &first_line, &last_line, &role_in, &cta_pop, &socials_in] {
            stage.play(scope, step);
        }

        let sink = stage.sink(scope);
        let range = ScrollRange::new("top top".parse::<Anchor>()?, "bottom top".parse::<Anchor>()?);
        stage.track_progress(scope, section, range, move |progress| {
            sink.set(first_name, Property::Y, progress * FIRST_NAME_DRIFT);
            sink.set(last_name, Property::Y, progress * LAST_NAME_DRIFT);
            sink.set(role, Property::Filter, PropertyValue::blur(progress * ROLE_BLUR));
        });

        let sink = stage.sink(scope);
        let viewport = ctx.viewport;
        stage.subscribe_pointer(scope, PointerMode::Raw, move |sample| {
            let center_x = viewport.width / 2.0;
            let center_y = viewport.height / 2.0;
            let move_x = (sample.x - center_x) / center_x;
            let move_y = (sample.y - center_y) / center_y;
            let ease = Easing::power(2, Default::default());

            for (line, (sway_x, sway_y)) in [(first_name, FIRST_NAME_SWAY), (last_name, LAST_NAME_SWAY)] {
                sink.tween_to(
                    line,
                    [
                        (Property::X, PropertyValue::number(move_x * sway_x)),
                        (Property::Y, PropertyValue::number(move_y * sway_y)),
                    ],
                    0.5,
                    ease,
                );
            }
        });

        Ok(())
    }

    fn elements(&self) -> Vec<ElementId> {
        [
            self.el.background,
            self.el.first_name,
            self.el.last_name,
            self.el.role,
            self.el.cta,
            self.el.socials,
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn name_rise(line: ElementId, delay: f64) -> Result<AnimationStep> {
    AnimationStep::builder([line])
        .from_to(Property::Y, PropertyValue::percent(100.0), PropertyValue::percent(0.0))
        .from_to(Property::Opacity, 0.0, 1.0)
        .duration(1.2)
        .delay(delay)
        .ease_named("power3.out")
        .build()
}
