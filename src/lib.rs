//! Job matching, recommendation, and application lifecycle engine.
//!
//! The engine is exposed as two synchronous services: [`agent::JobDiscoveryService`]
//! for search and recommendation over job listings, and
//! [`agent::ApplicationLifecycleService`] for tracking a candidate's journey
//! through application statuses. Storage and AI generation are collaborators
//! behind traits; the binary wires in-memory adapters and a scripted gateway.

pub mod agent;
pub mod config;
pub mod error;
pub mod telemetry;
