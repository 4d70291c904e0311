//! scriptaudit-report — terminal rendering of the evaluation form.
//!
//! Stage panels are plain text; summary and rubric overviews are
//! `comfy-table` tables. Every function returns a `String` so callers decide
//! where it goes.

pub mod panel;
pub mod table;

pub use panel::{render_session, render_stage_card, Expansion};
pub use table::{progress_bar, render_rubric, render_summary};
