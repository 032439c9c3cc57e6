//! Three-step profile wizard.

use frivolo_core::error::ValidationError;
use frivolo_core::user::{JOB_SUGGESTIONS, ProfileDraft, ProfileField, UserProfile};

/// One page of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Personal,
    Job,
    Schedule,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [WizardStep::Personal, WizardStep::Job, WizardStep::Schedule];

    pub fn index(&self) -> usize {
        match self {
            WizardStep::Personal => 0,
            WizardStep::Job => 1,
            WizardStep::Schedule => 2,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Personal => "¡Hola! Comencemos",
            WizardStep::Job => "¿A qué te dedicas?",
            WizardStep::Schedule => "Cuéntanos sobre tu trabajo",
        }
    }

    /// Fields collected on this page, in display order.
    pub fn fields(&self) -> &'static [ProfileField] {
        match self {
            WizardStep::Personal => &[ProfileField::Name, ProfileField::Email, ProfileField::Age],
            WizardStep::Job => &[ProfileField::Job],
            WizardStep::Schedule => &[
                ProfileField::MonthlySalary,
                ProfileField::HoursPerDay,
                ProfileField::DaysPerWeek,
            ],
        }
    }

    fn next(&self) -> Option<WizardStep> {
        WizardStep::ALL.get(self.index() + 1).copied()
    }

    fn previous(&self) -> Option<WizardStep> {
        self.index().checked_sub(1).map(|i| WizardStep::ALL[i])
    }
}

/// Result of pressing "next".
#[derive(Debug, Clone, PartialEq)]
pub enum WizardOutcome {
    /// Moved on to the given step.
    Advanced(WizardStep),
    /// The last step validated; the profile is ready to persist.
    Complete(UserProfile),
}

/// Form state across the wizard pages.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileWizard {
    draft: ProfileDraft,
    step: WizardStep,
}

impl Default for ProfileWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileWizard {
    pub fn new() -> Self {
        Self::from_draft(ProfileDraft::new())
    }

    /// Pre-filled for editing an existing profile.
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self::from_draft(ProfileDraft::from_profile(profile))
    }

    /// Resumes from partial input, e.g. a profile cached by an older release.
    pub fn from_draft(draft: ProfileDraft) -> Self {
        Self {
            draft,
            step: WizardStep::Personal,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    pub fn value(&self, field: ProfileField) -> Option<&str> {
        self.draft.get(field)
    }

    /// True when every field of the current step has a non-blank value.
    pub fn can_proceed(&self) -> bool {
        self.step.fields().iter().all(|f| !self.draft.is_blank(*f))
    }

    /// Validates the current step and moves on.
    ///
    /// On the last step the whole draft is validated and converted.
    pub fn next(&mut self) -> Result<WizardOutcome, ValidationError> {
        self.draft.validate_fields(self.step.fields())?;

        match self.step.next() {
            Some(next) => {
                self.step = next;
                Ok(WizardOutcome::Advanced(next))
            }
            None => self.draft.complete().map(WizardOutcome::Complete),
        }
    }

    /// Steps back. Returns false on the first step.
    pub fn previous(&mut self) -> bool {
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                true
            }
            None => false,
        }
    }

    pub fn is_last_step(&self) -> bool {
        self.step.next().is_none()
    }

    /// `round((step + 1) / steps * 100)`.
    pub fn progress_percent(&self) -> u8 {
        let ratio = (self.step.index() + 1) as f64 / WizardStep::ALL.len() as f64;
        (ratio * 100.0).round() as u8
    }

    /// Suggested job titles containing `query`, case-insensitively.
    pub fn job_suggestions(query: &str) -> Vec<&'static str> {
        let needle = query.trim().to_lowercase();
        JOB_SUGGESTIONS
            .iter()
            .copied()
            .filter(|job| needle.is_empty() || job.to_lowercase().contains(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frivolo_core::user::DEFAULT_COUNTRY;

    fn fill_personal(wizard: &mut ProfileWizard) {
        wizard.set(ProfileField::Name, "Ana");
        wizard.set(ProfileField::Email, "ana@x.com");
        wizard.set(ProfileField::Age, "30");
    }

    #[test]
    fn test_walk_through_all_steps() {
        let mut wizard = ProfileWizard::new();
        assert_eq!(wizard.progress_percent(), 33);
        assert!(!wizard.can_proceed());

        fill_personal(&mut wizard);
        assert!(wizard.can_proceed());
        assert_eq!(wizard.next().unwrap(), WizardOutcome::Advanced(WizardStep::Job));
        assert_eq!(wizard.progress_percent(), 67);

        wizard.set(ProfileField::Job, "Diseñador Gráfico");
        assert_eq!(
            wizard.next().unwrap(),
            WizardOutcome::Advanced(WizardStep::Schedule)
        );
        assert_eq!(wizard.progress_percent(), 100);
        assert!(wizard.is_last_step());

        wizard.set(ProfileField::MonthlySalary, "20000");
        wizard.set(ProfileField::HoursPerDay, "8");
        wizard.set(ProfileField::DaysPerWeek, "5");

        match wizard.next().unwrap() {
            WizardOutcome::Complete(profile) => {
                assert_eq!(profile.name, "Ana");
                assert_eq!(profile.country, DEFAULT_COUNTRY);
                assert_eq!(profile.monthly_salary, 20000.0);
            }
            other => panic!("expected completion, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_email_blocks_first_step() {
        let mut wizard = ProfileWizard::new();
        fill_personal(&mut wizard);
        wizard.set(ProfileField::Email, "ana@x");

        assert!(wizard.can_proceed());
        let err = wizard.next().unwrap_err();
        assert_eq!(err.field, ProfileField::Email);
        assert_eq!(wizard.step(), WizardStep::Personal);
    }

    #[test]
    fn test_schedule_limits() {
        let mut wizard = ProfileWizard::new();
        fill_personal(&mut wizard);
        wizard.next().unwrap();
        wizard.set(ProfileField::Job, "Contador");
        wizard.next().unwrap();

        wizard.set(ProfileField::MonthlySalary, "0");
        wizard.set(ProfileField::HoursPerDay, "8");
        wizard.set(ProfileField::DaysPerWeek, "5");
        assert_eq!(wizard.next().unwrap_err().field, ProfileField::MonthlySalary);

        wizard.set(ProfileField::MonthlySalary, "15000");
        wizard.set(ProfileField::HoursPerDay, "25");
        assert_eq!(wizard.next().unwrap_err().field, ProfileField::HoursPerDay);

        wizard.set(ProfileField::HoursPerDay, "24");
        wizard.set(ProfileField::DaysPerWeek, "7.5");
        assert_eq!(wizard.next().unwrap_err().field, ProfileField::DaysPerWeek);
    }

    #[test]
    fn test_previous_keeps_input() {
        let mut wizard = ProfileWizard::new();
        assert!(!wizard.previous());

        fill_personal(&mut wizard);
        wizard.next().unwrap();
        assert!(wizard.previous());
        assert_eq!(wizard.step(), WizardStep::Personal);
        assert_eq!(wizard.value(ProfileField::Name), Some("Ana"));
    }

    #[test]
    fn test_from_profile_prefills() {
        let profile = UserProfile {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            age: 30,
            country: DEFAULT_COUNTRY.to_string(),
            job: "Contador".to_string(),
            monthly_salary: 20000.0,
            hours_per_day: 8.0,
            days_per_week: 5.0,
        };
        let mut wizard = ProfileWizard::from_profile(&profile);
        assert!(wizard.can_proceed());
        wizard.next().unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.next().unwrap(), WizardOutcome::Complete(profile));
    }

    #[test]
    fn test_job_suggestions_filter() {
        assert_eq!(ProfileWizard::job_suggestions("").len(), 12);
        assert_eq!(
            ProfileWizard::job_suggestions("diseñ"),
            vec!["Diseñador Gráfico"]
        );
        assert!(ProfileWizard::job_suggestions("xyz").is_empty());
    }
}
