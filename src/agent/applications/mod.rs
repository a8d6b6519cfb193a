//! Application lifecycle tracking: the status state machine, the append-only
//! note log, derived statistics, follow-up queues, and generated-content
//! versioning.

pub mod domain;
pub mod notes;
pub mod service;
pub mod status;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationStatistics, ApplicationView, DocumentKind, GeneratedDocument,
};
pub use notes::{render_notes, NoteEntry};
pub use service::{
    ApplicationLifecycleService, Clock, LifecycleConfig, LifecycleError, NoopSubmitter,
    PlatformSubmitter, SubmissionError, SystemClock,
};
pub use status::{
    AnyTransition, ApplicationStatus, NoReopenPolicy, TransitionDenied, TransitionPolicy,
    UnknownStatus,
};
