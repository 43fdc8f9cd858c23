//! Bio, portrait, skill chips and education.

use glide_motion::{AnimationStep, ElementId, Property, Rect, Result, ScopeId, Stage};

use super::{MountContext, Section, fade_in, hide, reveal};
use crate::content::Content;
use crate::layout::{Column, PageBuilder};

const SKILL_CHIP_HEIGHT: f64 = 40.0;
const SKILLS_PER_ROW: usize = 5;

#[derive(Debug, Default)]
pub struct About {
    heading: Option<ElementId>,
    bio: Option<ElementId>,
    portrait: Option<ElementId>,
    skills: Option<ElementId>,
    chips: Vec<ElementId>,
    education: Option<ElementId>,
}

impl Section for About {
    fn name(&self) -> &'static str {
        "about"
    }

    fn layout(&mut self, page: &mut PageBuilder, content: &Content) {
        let viewport = page.viewport();
        let top = page.cursor();
        let rows = content.skills.len().div_ceil(SKILLS_PER_ROW);
        let height = 760.0 + rows as f64 * (SKILL_CHIP_HEIGHT + 12.0);
        page.section("about", height);

        let half = viewport.content_width() / 2.0 - 32.0;
        let mut text = Column::new(viewport.content_left(), half, top + 128.0, 24.0);
        self.heading = Some(page.element("about-heading", text.next(120.0)));
        self.bio = Some(page.element("about-bio", text.next(180.0)));

        let skills_rect = text.next(40.0 + rows as f64 * (SKILL_CHIP_HEIGHT + 12.0));
        self.skills = Some(page.element("about-skills", skills_rect));
        let mut chips = Column::new(skills_rect.x, skills_rect.width, skills_rect.y + 40.0, 12.0);
        for row in content.skills.chunks(SKILLS_PER_ROW) {
            for (skill, rect) in row.iter().zip(chips.row(SKILLS_PER_ROW, SKILL_CHIP_HEIGHT)) {
                let name = format!("skill-{}", skill.name.to_lowercase().replace(' ', "-"));
                self.chips.push(page.hoverable(name, rect));
            }
        }

        self.education = Some(page.element("about-education", text.next(120.0)));

        let portrait = Rect::new(viewport.content_left() + half + 64.0, top + 128.0, half, half * 1.25);
        self.portrait = Some(page.element("about-portrait", portrait));
    }

    fn mount(&mut self, stage: &mut Stage, scope: ScopeId, ctx: &MountContext) -> Result<()> {
        let (Some(heading), Some(bio), Some(portrait), Some(skills), Some(education)) =
            (self.heading, self.bio, self.portrait, self.skills, self.education)
        else {
            return Ok(());
        };

        hide(stage, &[heading, bio, portrait, education]);
        hide(stage, &self.chips);

        reveal(stage, scope, ctx, heading, "top 80%", fade_in([heading], Property::Y, 50.0, 0.8, 0.0)?)?;
        reveal(stage, scope, ctx, bio, "top 80%", fade_in([bio], Property::Y, 30.0, 0.6, 0.2)?)?;

        let portrait_in = AnimationStep::builder([portrait])
            .from_to(Property::Opacity, 0.0, 1.0)
            .from_to(Property::Scale, 0.8, 1.0)
            .from_to(Property::RotateY, -15.0, 0.0)
            .duration(1.0)
            .delay(0.1)
            .ease_named("power3.out")
            .build()?;
        reveal(stage, scope, ctx, portrait, "top 80%", portrait_in)?;

        if !self.chips.is_empty() {
            let chips_in = AnimationStep::builder(self.chips.iter().copied())
                .from_to(Property::Opacity, 0.0, 1.0)
                .from_to(Property::Y, 20.0, 0.0)
                .from_to(Property::Scale, 0.9, 1.0)
                .duration(0.5)
                .stagger(0.05)
                .ease_named("power2.out")
                .build()?;
            reveal(stage, scope, ctx, skills, "top 80%", chips_in)?;
        }

        reveal(
            stage,
            scope,
            ctx,
            education,
            "top 80%",
            fade_in([education], Property::X, -30.0, 0.6, 0.4)?,
        )?;

        Ok(())
    }

    fn elements(&self) -> Vec<ElementId> {
        let mut elements: Vec<_> = [self.heading, self.bio, self.portrait, self.education]
            .into_iter()
            .flatten()
            .collect();
        elements.extend(&self.chips);
        elements
    }
}
