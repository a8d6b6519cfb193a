use std::time::Duration;

use serde_json::{json, Value};

/// Operations the AI collaborator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOperation {
    ParseResume,
    MatchJobs,
    GenerateCoverLetter,
    TailorResume,
    PrepareInterview,
}

impl GatewayOperation {
    pub const fn name(self) -> &'static str {
        match self {
            GatewayOperation::ParseResume => "parse_resume",
            GatewayOperation::MatchJobs => "match_jobs",
            GatewayOperation::GenerateCoverLetter => "generate_cover_letter",
            GatewayOperation::TailorResume => "tailor_resume",
            GatewayOperation::PrepareInterview => "prepare_interview",
        }
    }
}

/// Failure from the AI collaborator. Always recoverable: callers surface it
/// as a generation failure and keep running.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("ai gateway timed out after {0:?}")]
    Timeout(Duration),
    #[error("ai gateway failed: {0}")]
    Failed(String),
}

/// Text/JSON transformation collaborator.
///
/// The gateway is constructed explicitly and injected into the services that
/// need it; there is no process-wide interpreter state. Implementations must
/// respect the caller-supplied timeout, and callers persist nothing when an
/// invocation fails.
pub trait AiGateway: Send + Sync {
    fn invoke(
        &self,
        operation: GatewayOperation,
        payload: &Value,
        timeout: Duration,
    ) -> Result<String, GatewayError>;
}

/// Canned gateway used by the demo binary and tests.
///
/// Stands in for the external scripting runtime: each operation returns a
/// deterministic payload shaped like the real collaborator's output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptedGateway;

impl AiGateway for ScriptedGateway {
    fn invoke(
        &self,
        operation: GatewayOperation,
        payload: &Value,
        _timeout: Duration,
    ) -> Result<String, GatewayError> {
        let company = payload
            .pointer("/listing/company")
            .and_then(Value::as_str)
            .unwrap_or("the company");
        let title = payload
            .pointer("/listing/title")
            .and_then(Value::as_str)
            .unwrap_or("the role");

        let body = match operation {
            GatewayOperation::ParseResume => json!({
                "summary": "Experienced engineer with a full-stack background.",
                "skills": [
                    { "name": "Rust", "category": "Languages", "proficiency": 5 },
                    { "name": "SQL", "category": "Data", "proficiency": 4 },
                ],
            })
            .to_string(),
            GatewayOperation::MatchJobs => json!({ "matches": [] }).to_string(),
            GatewayOperation::GenerateCoverLetter => format!(
                "Dear {company} hiring team,\n\nI am excited to apply for the {title} position.\n"
            ),
            GatewayOperation::TailorResume => format!(
                "Resume tailored toward the {title} posting at {company}.\n"
            ),
            GatewayOperation::PrepareInterview => format!(
                "Preparation notes for the {title} interview at {company}:\n- review the posted requirements\n- prepare questions about the team\n"
            ),
        };
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_names_match_the_collaborator_contract() {
        assert_eq!(GatewayOperation::ParseResume.name(), "parse_resume");
        assert_eq!(GatewayOperation::MatchJobs.name(), "match_jobs");
        assert_eq!(
            GatewayOperation::GenerateCoverLetter.name(),
            "generate_cover_letter"
        );
        assert_eq!(GatewayOperation::PrepareInterview.name(), "prepare_interview");
    }

    #[test]
    fn scripted_cover_letter_mentions_the_listing() {
        let payload = json!({
            "listing": { "company": "Initech", "title": "Staff Engineer" },
        });
        let letter = ScriptedGateway
            .invoke(
                GatewayOperation::GenerateCoverLetter,
                &payload,
                Duration::from_secs(1),
            )
            .expect("scripted gateway never fails");
        assert!(letter.contains("Initech"));
        assert!(letter.contains("Staff Engineer"));
    }
}
