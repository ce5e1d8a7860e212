// netload-report: wire payload and HTTP delivery for throughput reports.

pub mod client;
pub mod error;
pub mod payload;

pub use client::{DeliveryConfig, ReportClient};
pub use error::Error;
pub use payload::MetricReport;
