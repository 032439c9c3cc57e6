use frivolo_core::user::{ProfileDraft, ProfileField};
use frivolo_core::wage::{
    Calculation, format_duration, format_percentage, hourly_wage, hourly_wage_for_draft,
};

fn ana_draft() -> ProfileDraft {
    let mut draft = ProfileDraft::new();
    draft.set(ProfileField::Name, "Ana");
    draft.set(ProfileField::Email, "ana@x.com");
    draft.set(ProfileField::Age, "30");
    draft.set(ProfileField::Job, "Diseñador Gráfico");
    draft.set(ProfileField::MonthlySalary, "20000");
    draft.set(ProfileField::HoursPerDay, "8");
    draft.set(ProfileField::DaysPerWeek, "5");
    draft
}

#[test]
fn new_user_sees_hours_for_a_price() {
    let profile = ana_draft().complete().expect("draft is complete");
    assert_eq!(hourly_wage(&profile).unwrap(), 125.0);

    let calc = Calculation::compute(&profile, 250.0).unwrap();
    assert_eq!(calc.hours_needed, 2.0);
    assert_eq!(format_duration(calc.hours_needed).unwrap(), "2.0 horas");
    assert_eq!(format_percentage(calc.weekly_percentage), "5.0%");
}

#[test]
fn draft_and_profile_agree_on_wage() {
    let draft = ana_draft();
    let profile = draft.complete().unwrap();
    assert_eq!(
        hourly_wage_for_draft(&draft).unwrap(),
        hourly_wage(&profile).unwrap()
    );
}

#[test]
fn incomplete_draft_never_reaches_the_formatter() {
    let mut draft = ana_draft();
    draft.unset(ProfileField::HoursPerDay);

    assert!(draft.complete().is_err());
    let err = hourly_wage_for_draft(&draft).unwrap_err();
    assert!(err.to_string().contains("Incomplete profile"));
}
