use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::domain::{Education, Profile, ProfileId, Skill, WorkExperience};
use super::gateway::{AiGateway, GatewayError, GatewayOperation};
use super::store::{ProfileStore, StoreError};

/// Error raised by the profile service.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("skill '{0}' already present on this profile")]
    DuplicateSkill(String),
    #[error("generation failed: {0}")]
    Generation(#[from] GatewayError),
    #[error("malformed resume parse result: {0}")]
    MalformedParse(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Manages profiles and their owned child collections.
///
/// Skills, experience, and education are mutated only here, which is where
/// the per-profile invariants live: skill names are unique per profile,
/// case-insensitively.
pub struct ProfileService<P> {
    profiles: Arc<P>,
    gateway: Arc<dyn AiGateway>,
    generation_timeout: Duration,
}

impl<P: ProfileStore> ProfileService<P> {
    pub fn new(profiles: Arc<P>, gateway: Arc<dyn AiGateway>, generation_timeout: Duration) -> Self {
        Self {
            profiles,
            gateway,
            generation_timeout,
        }
    }

    pub fn profile(&self, id: ProfileId) -> Result<Profile, ProfileError> {
        self.profiles
            .get(id)?
            .ok_or(ProfileError::NotFound("profile"))
    }

    pub fn create(&self, profile: Profile) -> Result<Profile, ProfileError> {
        Ok(self.profiles.add(profile)?)
    }

    pub fn update(&self, mut profile: Profile) -> Result<Profile, ProfileError> {
        profile.last_updated = Utc::now();
        match self.profiles.update(profile.clone()) {
            Ok(()) => Ok(profile),
            Err(StoreError::NotFound) => Err(ProfileError::NotFound("profile")),
            Err(err) => Err(err.into()),
        }
    }

    pub fn add_skill(&self, profile_id: ProfileId, skill: Skill) -> Result<Profile, ProfileError> {
        let mut profile = self.profile(profile_id)?;
        if profile
            .skills
            .iter()
            .any(|existing| existing.name.eq_ignore_ascii_case(&skill.name))
        {
            return Err(ProfileError::DuplicateSkill(skill.name));
        }
        profile.skills.push(skill);
        self.update(profile)
    }

    pub fn remove_skill(&self, profile_id: ProfileId, name: &str) -> Result<Profile, ProfileError> {
        let mut profile = self.profile(profile_id)?;
        let before = profile.skills.len();
        profile
            .skills
            .retain(|skill| !skill.name.eq_ignore_ascii_case(name));
        if profile.skills.len() == before {
            return Err(ProfileError::NotFound("skill"));
        }
        self.update(profile)
    }

    pub fn add_experience(
        &self,
        profile_id: ProfileId,
        experience: WorkExperience,
    ) -> Result<Profile, ProfileError> {
        let mut profile = self.profile(profile_id)?;
        profile.experience.push(experience);
        self.update(profile)
    }

    pub fn add_education(
        &self,
        profile_id: ProfileId,
        education: Education,
    ) -> Result<Profile, ProfileError> {
        let mut profile = self.profile(profile_id)?;
        profile.education.push(education);
        self.update(profile)
    }

    /// Parse a raw resume through the AI gateway and merge the result into
    /// the profile: the summary fills in when empty, parsed skills are added,
    /// and skills already on the profile are skipped rather than duplicated.
    pub fn import_resume(
        &self,
        profile_id: ProfileId,
        resume_text: &str,
    ) -> Result<Profile, ProfileError> {
        let mut profile = self.profile(profile_id)?;

        let payload = json!({ "resume_text": resume_text });
        let raw = self.gateway.invoke(
            GatewayOperation::ParseResume,
            &payload,
            self.generation_timeout,
        )?;
        let parsed: ParsedResume =
            serde_json::from_str(&raw).map_err(|err| ProfileError::MalformedParse(err.to_string()))?;

        if profile.summary.trim().is_empty() {
            if let Some(summary) = parsed.summary {
                profile.summary = summary;
            }
        }

        let mut imported = 0usize;
        for skill in parsed.skills {
            if profile
                .skills
                .iter()
                .any(|existing| existing.name.eq_ignore_ascii_case(&skill.name))
            {
                continue;
            }
            profile.skills.push(Skill {
                name: skill.name,
                category: skill.category.unwrap_or_default(),
                proficiency: skill.proficiency.clamp(1, 5),
                years_experience: 0.0,
                highlighted: false,
            });
            imported += 1;
        }
        info!(%profile_id, imported, "resume parsed into profile");
        self.update(profile)
    }
}

#[derive(Debug, Deserialize)]
struct ParsedResume {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    skills: Vec<ParsedSkill>,
}

#[derive(Debug, Deserialize)]
struct ParsedSkill {
    name: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default = "default_proficiency")]
    proficiency: u8,
}

fn default_proficiency() -> u8 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::gateway::ScriptedGateway;
    use crate::agent::memory::MemoryProfileStore;

    fn service() -> ProfileService<MemoryProfileStore> {
        ProfileService::new(
            Arc::new(MemoryProfileStore::default()),
            Arc::new(ScriptedGateway),
            Duration::from_secs(1),
        )
    }

    fn blank_profile() -> Profile {
        Profile {
            id: ProfileId(0),
            first_name: "Casey".to_string(),
            last_name: "Reed".to_string(),
            email: "casey.reed@example.com".to_string(),
            phone: String::new(),
            location: String::new(),
            summary: String::new(),
            last_updated: Utc::now(),
            skills: Vec::new(),
            experience: Vec::new(),
            education: Vec::new(),
            credentials: Vec::new(),
        }
    }

    fn skill(name: &str) -> Skill {
        Skill {
            name: name.to_string(),
            category: String::new(),
            proficiency: 3,
            years_experience: 1.0,
            highlighted: false,
        }
    }

    #[test]
    fn skill_names_are_unique_per_profile_case_insensitively() {
        let service = service();
        let profile = service.create(blank_profile()).expect("create succeeds");

        service
            .add_skill(profile.id, skill("Rust"))
            .expect("first skill accepted");
        let err = service
            .add_skill(profile.id, skill("rust"))
            .expect_err("duplicate name rejected");
        assert!(matches!(err, ProfileError::DuplicateSkill(name) if name == "rust"));
    }

    #[test]
    fn removing_a_missing_skill_is_not_found() {
        let service = service();
        let profile = service.create(blank_profile()).expect("create succeeds");

        let err = service
            .remove_skill(profile.id, "Rust")
            .expect_err("nothing to remove");
        assert!(matches!(err, ProfileError::NotFound("skill")));

        service
            .add_skill(profile.id, skill("Rust"))
            .expect("skill accepted");
        let updated = service
            .remove_skill(profile.id, "RUST")
            .expect("remove matches case-insensitively");
        assert!(updated.skills.is_empty());
    }

    #[test]
    fn resume_import_merges_without_duplicating_existing_skills() {
        let service = service();
        let mut seeded = blank_profile();
        seeded.skills.push(skill("rust"));
        let profile = service.create(seeded).expect("create succeeds");

        let updated = service
            .import_resume(profile.id, "ten years of systems programming")
            .expect("import succeeds");

        // The canned parse yields Rust and SQL; only SQL is new.
        assert_eq!(updated.skills.len(), 2);
        assert!(updated
            .skills
            .iter()
            .any(|skill| skill.name == "SQL" && skill.proficiency == 4));
        assert!(!updated.summary.trim().is_empty());
    }

    #[test]
    fn resume_import_keeps_an_existing_summary() {
        let service = service();
        let mut seeded = blank_profile();
        seeded.summary = "Hand-written summary.".to_string();
        let profile = service.create(seeded).expect("create succeeds");

        let updated = service
            .import_resume(profile.id, "resume text")
            .expect("import succeeds");
        assert_eq!(updated.summary, "Hand-written summary.");
    }
}
