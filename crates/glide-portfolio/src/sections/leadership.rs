//! Experience timeline. The connecting line draws itself as the section
//! scrolls through the viewport.

use glide_motion::{
    Anchor, AnimationStep, ElementId, Property, Rect, Result, ScopeId, ScrollRange, Stage,
};

use super::{MountContext, Section, fade_in, hide, reveal};
use crate::content::Content;
use crate::layout::{Column, PageBuilder};

const CARD_HEIGHT: f64 = 360.0;
const CARD_SWING: f64 = 50.0;

#[derive(Debug, Default)]
pub struct Leadership {
    heading: Option<ElementId>,
    timeline: Option<ElementId>,
    path: Option<ElementId>,
    path_length: f64,
    cards: Vec<ElementId>,
}

impl Leadership {
    /// Length of the drawn line, in px.
    pub fn path_length(&self) -> f64 {
        self.path_length
    }
}

impl Section for Leadership {
    fn name(&self) -> &'static str {
        "leadership"
    }

    fn layout(&mut self, page: &mut PageBuilder, content: &Content) {
        let viewport = page.viewport();
        let top = page.cursor();
        let timeline_height = content.experiences.len() as f64 * (CARD_HEIGHT + 64.0);
        page.section("leadership", 400.0 + timeline_height);

        let mut column = Column::new(viewport.content_left(), viewport.content_width(), top + 128.0, 64.0);
        self.heading = Some(page.element("leadership-heading", column.next(120.0)));

        let timeline = column.next(timeline_height);
        self.timeline = Some(page.element("leadership-timeline", timeline));
        let centre = timeline.x + timeline.width / 2.0;
        self.path = Some(page.element(
            "leadership-path",
            Rect::new(centre - 1.0, timeline.y, 2.0, timeline.height),
        ));
        self.path_length = timeline.height;

        let half = timeline.width / 2.0 - 48.0;
        let mut y = timeline.y;
        for (index, experience) in content.experiences.iter().enumerate() {
            let x = if index % 2 == 0 { timeline.x } else { centre + 48.0 };
            let slug = experience.organization.to_lowercase().replace(' ', "-");
            self.cards.push(page.element(
                format!("experience-{slug}"),
                Rect::new(x, y, half, CARD_HEIGHT),
            ));
            y += CARD_HEIGHT + 64.0;
        }
    }

    fn mount(&mut self, stage: &mut Stage, scope: ScopeId, ctx: &MountContext) -> Result<()> {
        let (Some(heading), Some(timeline), Some(path)) = (self.heading, self.timeline, self.path)
        else {
            return Ok(());
        };

        hide(stage, &[heading]);
        hide(stage, &self.cards);
        reveal(stage, scope, ctx, heading, "top 80%", fade_in([heading], Property::Y, 50.0, 0.8, 0.0)?)?;

        stage
            .document_mut()
            .set_property(path, Property::StrokeDashoffset, self.path_length.into());
        let draw = AnimationStep::builder([path])
            .from_to(Property::StrokeDashoffset, self.path_length, 0.0)
            .duration(2.0)
            .ease_named("none")
            .build()?;
        let range = ScrollRange::new("top 70%".parse::<Anchor>()?, "bottom 30%".parse::<Anchor>()?);
        stage.scrub(scope, timeline, range, draw);

        for (index, &card) in self.cards.iter().enumerate() {
            let swing = if index % 2 == 0 { -CARD_SWING } else { CARD_SWING };
            let card_in = AnimationStep::builder([card])
                .from_to(Property::Opacity, 0.0, 1.0)
                .from_to(Property::X, swing, 0.0)
                .from_to(Property::Scale, 0.9, 1.0)
                .duration(0.8)
                .ease_named("back.out(1.2)")
                .build()?;
            reveal(stage, scope, ctx, card, "top 80%", card_in)?;
        }

        Ok(())
    }

    fn elements(&self) -> Vec<ElementId> {
        [self.heading, self.path]
            .into_iter()
            .flatten()
            .chain(self.cards.iter().copied())
            .collect()
    }
}
