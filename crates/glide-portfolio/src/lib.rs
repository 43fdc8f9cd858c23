//! Single-page developer portfolio built on `glide-motion`.
//!
//! Each page section lays out its elements into a shared document and then
//! mounts its animations into its own stage scope:
//!
//! ```text
//!   Content ──► Section::layout ──► Page (Document + links)
//!                                      │
//!                                      ▼
//!                Section::mount ──► Stage scope per section
//!                                      │
//!            driver::run ──► frame loop (scroll, pointer) ──► RunReport
//! ```
//!
//! Outbound actions (links, mail-to, clipboard) go through an
//! [`ActionHandler`] so the host decides what actually happens.

pub mod actions;
pub mod content;
pub mod driver;
pub mod layout;
pub mod sections;

pub use actions::{ActionHandler, OutboundAction, RecordingActions, contact_form_mailto, mailto};
pub use content::Content;
pub use driver::{DriverOptions, Portfolio, RunReport, pointer_path, run};
pub use layout::{Page, PageBuilder, Viewport};
pub use sections::{MountContext, Section, all_sections};
