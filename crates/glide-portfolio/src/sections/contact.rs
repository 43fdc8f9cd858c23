//! Contact details, copy buttons, message form and the drifting star field.

use glide_motion::{AnimationStep, ElementId, Property, Rect, Repeat, Result, ScopeId, Stage};

use super::{MountContext, Section, fade_in, hide, reveal};
use crate::actions::{OutboundAction, contact_form_mailto, mailto};
use crate::content::Content;
use crate::layout::{Column, PageBuilder};

pub const STAR_COUNT: usize = 20;

/// What the form would submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDraft {
    pub name: String,
    pub message: String,
}

impl Default for FormDraft {
    fn default() -> Self {
        Self {
            name: "Visitor".to_string(),
            message: "Hello! I'd like to get in touch.".to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Contact {
    draft: FormDraft,
    heading: Option<ElementId>,
    content: Option<ElementId>,
    stars: Vec<ElementId>,
}

impl Contact {
    pub fn with_draft(draft: FormDraft) -> Self {
        Self {
            draft,
            ..Self::default()
        }
    }

    pub fn stars(&self) -> &[ElementId] {
        &self.stars
    }
}

impl Section for Contact {
    fn name(&self) -> &'static str {
        "contact"
    }

    fn layout(&mut self, page: &mut PageBuilder, content: &Content) {
        let viewport = page.viewport();
        let (_, rect) = page.section("contact", viewport.height.max(900.0));

        // Spread stars on a fixed lattice so runs are reproducible.
        for i in 0..STAR_COUNT {
            let x = ((i * 37) % 100) as f64 / 100.0 * rect.width;
            let y = rect.top() + ((i * 53) % 100) as f64 / 100.0 * rect.height;
            self.stars.push(page.element(format!("star-{i}"), Rect::new(x, y, 4.0, 4.0)));
        }

        let mut column = Column::new(viewport.content_left(), viewport.content_width(), rect.top() + 128.0, 48.0);
        self.heading = Some(page.element("contact-heading", column.next(120.0)));
        let body = column.next(520.0);
        self.content = Some(page.element("contact-content", body));

        let email = content.contact.email;
        let phone = content.contact.phone;
        let mut details = Column::new(body.x, body.width / 2.0 - 24.0, body.y, 16.0);

        let row = details.next(48.0);
        page.link(
            "contact-email",
            Rect::new(row.x, row.y, row.width - 64.0, row.height),
            OutboundAction::MailTo(mailto(email, None, None)),
        );
        page.link(
            "contact-email-copy",
            Rect::new(row.right() - 48.0, row.y, 48.0, row.height),
            OutboundAction::CopyToClipboard(email.to_string()),
        );

        let row = details.next(48.0);
        page.link(
            "contact-phone",
            Rect::new(row.x, row.y, row.width - 64.0, row.height),
            OutboundAction::Call(format!("tel:{}", phone.replace(' ', ""))),
        );
        page.link(
            "contact-phone-copy",
            Rect::new(row.right() - 48.0, row.y, 48.0, row.height),
            OutboundAction::CopyToClipboard(phone.to_string()),
        );

        let socials = details.row(content.socials.len(), 48.0);
        for (social, rect) in content.socials.iter().zip(socials) {
            page.link(
                format!("contact-social-{}", social.name.to_lowercase()),
                rect,
                OutboundAction::OpenLink(social.url.to_string()),
            );
        }

        let form = Rect::new(body.x + body.width / 2.0 + 24.0, body.y, body.width / 2.0 - 24.0, body.height);
        page.link(
            "contact-submit",
            Rect::new(form.x, form.bottom() - 56.0, form.width, 56.0),
            OutboundAction::MailTo(contact_form_mailto(email, &self.draft.name, &self.draft.message)),
        );
    }

    fn mount(&mut self, stage: &mut Stage, scope: ScopeId, ctx: &MountContext) -> Result<()> {
        let (Some(heading), Some(content)) = (self.heading, self.content) else {
            return Ok(());
        };

        hide(stage, &[heading, content]);
        reveal(stage, scope, ctx, heading, "top 80%", fade_in([heading], Property::Y, 50.0, 0.8, 0.0)?)?;
        reveal(stage, scope, ctx, content, "top 80%", fade_in([content], Property::Y, 30.0, 0.8, 0.2)?)?;

        for (i, &star) in self.stars.iter().enumerate() {
            let drift = AnimationStep::builder([star])
                .from_to(Property::Y, 0.0, -ctx.viewport.height)
                .duration(10.0 + i as f64 * 2.0)
                .delay(i as f64 * 0.5)
                .ease_named("none")
                .repeat(Repeat::Forever)
                .build()?;
            stage.play(scope, &drift);
        }

        Ok(())
    }

    fn elements(&self) -> Vec<ElementId> {
        [self.heading, self.content].into_iter().flatten().collect()
    }
}
