//! Project cards with source and demo links.

use glide_motion::{AnimationStep, ElementId, Property, Rect, Result, ScopeId, Stage};

use super::{MountContext, Section, fade_in, hide, reveal};
use crate::actions::OutboundAction;
use crate::content::Content;
use crate::layout::{Column, PageBuilder};

const CARD_HEIGHT: f64 = 480.0;
const CARD_STAGGER: f64 = 0.15;

#[derive(Debug, Default)]
pub struct Projects {
    heading: Option<ElementId>,
    cards: Vec<ElementId>,
}

impl Section for Projects {
    fn name(&self) -> &'static str {
        "projects"
    }

    fn layout(&mut self, page: &mut PageBuilder, content: &Content) {
        let viewport = page.viewport();
        let top = page.cursor();
        let rows = content.projects.len().div_ceil(2);
        page.section("projects", 400.0 + rows as f64 * (CARD_HEIGHT + 32.0));

        let mut column = Column::new(viewport.content_left(), viewport.content_width(), top + 128.0, 64.0);
        self.heading = Some(page.element("projects-heading", column.next(120.0)));

        column.gap = 32.0;
        for pair in content.projects.chunks(2) {
            for (project, rect) in pair.iter().zip(column.row(2, CARD_HEIGHT)) {
                let slug = project.title.to_lowercase().replace(' ', "-");
                self.cards.push(page.hoverable(format!("project-{slug}"), rect));

                let links_y = rect.bottom() - 64.0;
                page.link(
                    format!("project-{slug}-source"),
                    Rect::new(rect.x + 32.0, links_y, 120.0, 40.0),
                    OutboundAction::OpenLink(project.links.source.to_string()),
                );
                if let Some(live) = project.links.live {
                    page.link(
                        format!("project-{slug}-live"),
                        Rect::new(rect.x + 168.0, links_y, 120.0, 40.0),
                        OutboundAction::OpenLink(live.to_string()),
                    );
                }
            }
        }
    }

    fn mount(&mut self, stage: &mut Stage, scope: ScopeId, ctx: &MountContext) -> Result<()> {
        let Some(heading) = self.heading else {
            return Ok(());
        };

        hide(stage, &[heading]);
        hide(stage, &self.cards);

        reveal(stage, scope, ctx, heading, "top 80%", fade_in([heading], Property::Y, 50.0, 0.8, 0.0)?)?;

        for (index, &card) in self.cards.iter().enumerate() {
            let card_in = AnimationStep::builder([card])
                .from_to(Property::Opacity, 0.0, 1.0)
                .from_to(Property::Y, 80.0, 0.0)
                .from_to(Property::RotateX, 15.0, 0.0)
                .duration(0.8)
                .delay(index as f64 * CARD_STAGGER)
                .ease_named("power3.out")
                .build()?;
            reveal(stage, scope, ctx, card, "top 85%", card_in)?;
        }

        Ok(())
    }

    fn elements(&self) -> Vec<ElementId> {
        self.heading.into_iter().chain(self.cards.iter().copied()).collect()
    }
}
