pub mod dashboard;
pub mod domain;
pub mod filter;
pub mod normalizer;
pub mod ranking;
pub mod rates;
pub mod report;
pub mod source;
pub mod wire;

mod service;

pub use service::{AnalyticsService, Listing};
