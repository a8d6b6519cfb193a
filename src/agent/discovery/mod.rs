//! Matching and ranking over job listings: criteria search, recommendations
//! derived from a profile's skills, saved searches, and CSV ingest.

pub mod criteria;
pub mod ingest;
pub mod service;

#[cfg(test)]
mod tests;

pub use criteria::{Page, SearchCriteria};
pub use ingest::{import_listings, ImportSummary, IngestError};
pub use service::{DiscoveryError, JobDiscoveryService};
