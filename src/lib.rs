//! Campaign brief client for the brand research workflow service.
//!
//! A brief becomes a [`transport::BrandResearchInput`]; a run is started
//! after a health probe and then driven stage by stage through the fixed
//! research pipeline, with one progress record per stage and exactly one
//! terminal notification.
pub mod brief;
pub mod config;
pub mod error;
pub mod report;
pub mod transport;
pub mod util;
pub mod workflow;

pub use error::ResearchError;
