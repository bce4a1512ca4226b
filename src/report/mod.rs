//! Human-facing rendering: display names, icons and the text dashboard.

pub mod icons;
pub mod names;
pub mod text;

pub use icons::{equipment_emoji, equipment_icon_url, placement_emoji};
pub use names::{display_equipment_name, display_synergy_name};
pub use text::{render_empty, render_report, ReportContext};
