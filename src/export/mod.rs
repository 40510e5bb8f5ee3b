//! CSV, PDF and chart outputs for a [`SchoolReport`](crate::analytics::SchoolReport).

pub mod chart;
pub mod csv;
pub mod pdf;

pub use chart::{ChartBitmap, ChartOptions, render_monthly_recycling};
pub use self::csv::{neutralize_formula, report_to_csv};
pub use pdf::report_to_pdf;
