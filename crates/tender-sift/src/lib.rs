//! Discovery and qualification of accessibility-works procurement notices.
//!
//! Notices are fetched per jurisdiction from the upstream search service,
//! normalized into [`workflows::discovery::Tender`] records, screened for
//! duplicates, relevance and open deadlines, and then scored against contractor
//! capability profiles by [`workflows::qualification`].

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
