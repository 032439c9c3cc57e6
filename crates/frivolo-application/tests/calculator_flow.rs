//! End-to-end session through the application layer with in-memory stores.

use std::sync::Arc;
use std::time::Duration;

use frivolo_application::{FlowController, FlowState, HistoryState, WizardOutcome, WizardStep};
use frivolo_core::identity::IdentityProvider;
use frivolo_core::user::ProfileField;
use frivolo_infrastructure::{
    LocalProfileCache, MemoryKeyValueStore, MemoryProfileRepository, MemorySearchRepository,
};

fn controller(
    store: Arc<MemoryKeyValueStore>,
    profiles: &MemoryProfileRepository,
    searches: &MemorySearchRepository,
) -> FlowController {
    FlowController::new(
        IdentityProvider::new(store.clone()),
        Arc::new(profiles.clone()),
        Arc::new(searches.clone()),
        Arc::new(LocalProfileCache::new(store)),
    )
}

#[tokio::test(start_paused = true)]
async fn test_full_session() {
    let store = Arc::new(MemoryKeyValueStore::new());
    let profiles = MemoryProfileRepository::new();
    let searches = MemorySearchRepository::new();
    let mut flow = controller(store.clone(), &profiles, &searches);

    assert_eq!(flow.start().unwrap(), FlowState::AwaitingProfile);

    // step 1 refuses to advance until its fields are valid
    {
        let wizard = flow.wizard_mut().unwrap();
        wizard.set(ProfileField::Name, "Ana");
        wizard.set(ProfileField::Email, "ana@x");
        wizard.set(ProfileField::Age, "30");
    }
    assert!(flow.advance_wizard().await.unwrap_err().is_validation());
    flow.wizard_mut()
        .unwrap()
        .set(ProfileField::Email, "ana@x.com");
    assert!(matches!(
        flow.advance_wizard().await.unwrap(),
        WizardOutcome::Advanced(WizardStep::Job)
    ));

    flow.wizard_mut()
        .unwrap()
        .set(ProfileField::Job, "Diseñador Gráfico");
    flow.advance_wizard().await.unwrap();

    {
        let wizard = flow.wizard_mut().unwrap();
        wizard.set(ProfileField::MonthlySalary, "20000");
        wizard.set(ProfileField::HoursPerDay, "8");
        wizard.set(ProfileField::DaysPerWeek, "5");
    }
    flow.advance_wizard().await.unwrap();
    assert_eq!(flow.state(), FlowState::ViewingCalculator);

    let mut frames = flow.animation();
    let calc = flow.enter_price(2500.0).unwrap().clone();
    assert_eq!(calc.hours_needed, 20.0);
    assert_eq!(calc.progress, 50.0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    let frame = *frames.borrow_and_update();
    assert_eq!(frame.displayed_hours, 20.0);
    assert_eq!(frame.progress, 50.0);
    assert!(frame.save_visible);

    flow.save_search("Audífonos").await.unwrap();
    flow.enter_price(500.0).unwrap();
    flow.save_search("Libro").await.unwrap();

    let history = flow.history().unwrap();
    history.refresh().await.unwrap();
    let names: Vec<String> = history
        .records()
        .into_iter()
        .map(|r| r.product_name)
        .collect();
    assert_eq!(names, vec!["Libro", "Audífonos"]);

    // a later session reuses identity and profile
    drop(flow);
    let mut next = controller(store, &profiles, &searches);
    assert_eq!(next.start().unwrap(), FlowState::ViewingCalculator);
    let history = next.history().unwrap();
    history.refresh().await.unwrap();
    assert_eq!(history.records().len(), 2);
}

#[tokio::test]
async fn test_history_failure_is_not_an_empty_list() {
    let store = Arc::new(MemoryKeyValueStore::new());
    let profiles = MemoryProfileRepository::new();
    let searches = MemorySearchRepository::new();
    let mut flow = controller(store, &profiles, &searches);
    flow.start().unwrap();

    searches.set_unavailable(true);
    let history = flow.history().unwrap();

    assert!(history.refresh().await.is_err());
    assert!(matches!(history.state(), HistoryState::Failed(_)));
}
