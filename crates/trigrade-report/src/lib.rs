//! trigrade-report: CSV exports and the HTML analytics report.

pub mod export;
pub mod html;
