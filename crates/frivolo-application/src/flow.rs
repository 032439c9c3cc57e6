//! Application flow controller.
//!
//! ```text
//! Uninitialized ──start──▶ AwaitingProfile ⇄ ViewingCalculator ⇄ EditingProfile
//!        └──────start (cached profile)──────▶ ViewingCalculator
//! ```
//!
//! Profile writes follow one rule: persist remotely first, then cache
//! locally and switch state. A remote failure leaves everything as it was.

use std::sync::Arc;

use frivolo_core::error::{FrivoloError, Result};
use frivolo_core::identity::{Identity, IdentityProvider};
use frivolo_core::search::{NewSearch, SearchRecord, SearchRepository};
use frivolo_core::user::{CachedProfile, ProfileCache, ProfileRepository, UserProfile};
use frivolo_core::wage::{Calculation, hourly_wage};
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::animation::{AnimationFrame, PriceAnimator};
use crate::history::SearchHistory;
use crate::wizard::{ProfileWizard, WizardOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Uninitialized,
    AwaitingProfile,
    ViewingCalculator,
    EditingProfile,
}

/// Owns the session: identity, current profile, wizard and calculator.
pub struct FlowController {
    identity_provider: IdentityProvider,
    profiles: Arc<dyn ProfileRepository>,
    searches: Arc<dyn SearchRepository>,
    cache: Arc<dyn ProfileCache>,
    state: FlowState,
    identity: Option<Identity>,
    profile: Option<UserProfile>,
    wizard: Option<ProfileWizard>,
    calculation: Option<Calculation>,
    animator: PriceAnimator,
}

impl FlowController {
    pub fn new(
        identity_provider: IdentityProvider,
        profiles: Arc<dyn ProfileRepository>,
        searches: Arc<dyn SearchRepository>,
        cache: Arc<dyn ProfileCache>,
    ) -> Self {
        Self {
            identity_provider,
            profiles,
            searches,
            cache,
            state: FlowState::Uninitialized,
            identity: None,
            profile: None,
            wizard: None,
            calculation: None,
            animator: PriceAnimator::new(),
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn wizard(&self) -> Option<&ProfileWizard> {
        self.wizard.as_ref()
    }

    pub fn wizard_mut(&mut self) -> Option<&mut ProfileWizard> {
        self.wizard.as_mut()
    }

    pub fn calculation(&self) -> Option<&Calculation> {
        self.calculation.as_ref()
    }

    pub fn hourly_wage(&self) -> Option<f64> {
        self.profile.as_ref().and_then(|p| hourly_wage(p).ok())
    }

    pub fn animation(&self) -> watch::Receiver<AnimationFrame> {
        self.animator.subscribe()
    }

    pub fn animation_frame(&self) -> AnimationFrame {
        self.animator.current()
    }

    fn require(&self, allowed: &[FlowState], action: &str) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(FrivoloError::invalid_state(format!(
                "cannot {} while {:?}",
                action, self.state
            )))
        }
    }

    fn transition(&mut self, next: FlowState) {
        info!("[FlowController] {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn current_identity(&self) -> Result<&Identity> {
        self.identity
            .as_ref()
            .ok_or_else(|| FrivoloError::invalid_state("identity not loaded"))
    }

    /// Resolves the identity and the cached profile.
    pub fn start(&mut self) -> Result<FlowState> {
        self.require(&[FlowState::Uninitialized], "start")?;
        self.identity = Some(self.identity_provider.get_or_create()?);

        match self.cache.load() {
            Some(CachedProfile::Complete(profile)) => {
                self.profile = Some(profile);
                self.transition(FlowState::ViewingCalculator);
            }
            Some(CachedProfile::Incomplete(draft)) => {
                self.wizard = Some(ProfileWizard::from_draft(draft));
                self.transition(FlowState::AwaitingProfile);
            }
            None => {
                self.wizard = Some(ProfileWizard::new());
                self.transition(FlowState::AwaitingProfile);
            }
        }
        Ok(self.state)
    }

    /// Presses "next" on the wizard; persists the profile on the last step.
    pub async fn advance_wizard(&mut self) -> Result<WizardOutcome> {
        self.require(
            &[FlowState::AwaitingProfile, FlowState::EditingProfile],
            "advance the wizard",
        )?;
        let wizard = self
            .wizard
            .as_mut()
            .ok_or_else(|| FrivoloError::invalid_state("no wizard open"))?;

        let outcome = wizard.next()?;
        if let WizardOutcome::Complete(profile) = &outcome {
            self.submit_profile(profile.clone()).await?;
        }
        Ok(outcome)
    }

    /// Persist remotely, then cache and show the calculator.
    ///
    /// On a remote failure the state, the wizard and the cache are left
    /// untouched so the user can retry.
    pub async fn submit_profile(&mut self, profile: UserProfile) -> Result<()> {
        self.require(
            &[FlowState::AwaitingProfile, FlowState::EditingProfile],
            "submit a profile",
        )?;
        let identity = self.current_identity()?.clone();

        if let Err(e) = self.profiles.upsert_profile(&identity, &profile).await {
            error!("[FlowController] Failed to save profile: {}", e);
            return Err(e);
        }

        if let Err(e) = self.cache.save(&profile) {
            // the remote copy is authoritative
            warn!("[FlowController] Failed to cache profile locally: {}", e);
        }

        self.profile = Some(profile);
        self.wizard = None;
        self.transition(FlowState::ViewingCalculator);

        if let Some(price) = self.calculation.as_ref().map(|c| c.price) {
            self.enter_price(price)?;
        }
        Ok(())
    }

    pub fn begin_edit(&mut self) -> Result<()> {
        self.require(&[FlowState::ViewingCalculator], "edit the profile")?;
        let profile = self
            .profile
            .as_ref()
            .ok_or_else(|| FrivoloError::invalid_state("no profile to edit"))?;
        self.wizard = Some(ProfileWizard::from_profile(profile));
        self.transition(FlowState::EditingProfile);
        Ok(())
    }

    /// Discards the edits and keeps the previous profile.
    pub fn cancel_edit(&mut self) -> Result<()> {
        self.require(&[FlowState::EditingProfile], "cancel editing")?;
        self.wizard = None;
        self.transition(FlowState::ViewingCalculator);
        Ok(())
    }

    /// Forgets the local profile and goes back to the wizard.
    ///
    /// The remote row and the identity are kept.
    pub fn reset_profile(&mut self) -> Result<()> {
        self.require(
            &[FlowState::ViewingCalculator, FlowState::EditingProfile],
            "reset the profile",
        )?;
        self.cache.clear()?;
        self.clear_price();
        self.profile = None;
        self.wizard = Some(ProfileWizard::new());
        self.transition(FlowState::AwaitingProfile);
        Ok(())
    }

    /// Computes the result for `price` and restarts the animation.
    pub fn enter_price(&mut self, price: f64) -> Result<&Calculation> {
        self.require(&[FlowState::ViewingCalculator], "enter a price")?;
        let profile = self
            .profile
            .as_ref()
            .ok_or_else(|| FrivoloError::invalid_state("no profile loaded"))?;

        let calculation = Calculation::compute(profile, price)?;
        self.animator.set_target(calculation.hours_needed);
        Ok(self.calculation.insert(calculation))
    }

    pub fn clear_price(&mut self) {
        self.calculation = None;
        self.animator.clear();
    }

    /// Saves the current price under `name`.
    ///
    /// Rejected before any remote call when the name is blank or there is
    /// no positive price on screen.
    pub async fn save_search(&self, name: &str) -> Result<SearchRecord> {
        self.require(&[FlowState::ViewingCalculator], "save a search")?;
        let calculation = self
            .calculation
            .as_ref()
            .filter(|c| c.is_saveable())
            .ok_or_else(|| FrivoloError::invalid_state("enter a price before saving"))?;

        let search = NewSearch::new(
            name,
            calculation.price,
            calculation.hours_needed,
            calculation.hourly_wage,
        )?;
        let identity = self.current_identity()?;

        match self.searches.create_search(identity, &search).await {
            Ok(record) => Ok(record),
            Err(e) => {
                error!("[FlowController] Failed to save search: {}", e);
                Err(e)
            }
        }
    }

    /// History view bound to the current identity.
    pub fn history(&self) -> Result<SearchHistory> {
        Ok(SearchHistory::new(
            self.searches.clone(),
            self.current_identity()?.clone(),
        ))
    }
}
