//! Integration tests for recommendation policies behind the service.
//!
//! Covers the untrained/trained switch of the energy/difficulty policy and
//! range properties of both policies over arbitrary levels.

use atena_ml_core::bootstrap::sample_records;
use atena_ml_core::policy::{BREAK_OPTIONS, POMODORO_OPTIONS};
use atena_ml_core::{
    ForestParams, LoggingFeedbackSink, PolicyKind, Predictor, Recommendation,
    RecommendationService, UserContext,
};
use proptest::prelude::*;

fn service(kind: PolicyKind) -> RecommendationService {
    RecommendationService::new(
        Predictor::with_params(ForestParams {
            n_estimators: 8,
            ..ForestParams::default()
        }),
        kind.build(),
        Box::new(LoggingFeedbackSink::new()),
    )
}

fn trained(kind: PolicyKind) -> RecommendationService {
    let svc = service(kind);
    svc.train(&sample_records()).unwrap();
    svc
}

#[test]
fn test_untrained_then_trained_workflow() {
    let svc = service(PolicyKind::EnergyDifficulty);
    let ctx = UserContext {
        time_of_day: Some(9),
        day_of_week: Some(2),
        subject: Some("math".into()),
        difficulty: Some(1),
        energy_level: Some(5),
    };

    assert_eq!(svc.recommend(&ctx), Recommendation::classic(0.5));

    svc.train(&sample_records()).unwrap();
    let rec = svc.recommend(&ctx);
    assert_eq!(rec.pomodoro_minutes, 45);
    assert_eq!(rec.break_minutes, 10);
    assert_eq!(rec.long_break_minutes, 20);
    assert_eq!(rec.sessions_until_long_break, 4);
    assert_eq!(rec.confidence, 0.7);
}

#[test]
fn test_hard_task_low_energy_gets_short_interval() {
    let svc = trained(PolicyKind::EnergyDifficulty);
    let rec = svc.recommend(&UserContext::with_levels(5, 1));
    assert_eq!(rec.pomodoro_minutes, 15);
    assert_eq!(rec.sessions_until_long_break, 3);
}

#[test]
fn test_subject_does_not_change_the_answer() {
    let svc = trained(PolicyKind::EnergyDifficulty);
    let mut a = UserContext::with_levels(2, 4);
    a.subject = Some("math".into());
    let mut b = a.clone();
    b.subject = Some("underwater basket weaving".into());
    assert_eq!(svc.recommend(&a), svc.recommend(&b));
}

#[test]
fn test_mock_policy_example() {
    let svc = service(PolicyKind::DefaultAdjustment);
    let rec = svc.recommend(&UserContext::with_levels(4, 5));
    assert_eq!(rec.pomodoro_minutes, 30);
    assert_eq!(rec.break_minutes, 5);
    assert_eq!(rec.confidence, 0.8);
}

proptest! {
    #[test]
    fn trained_energy_policy_picks_from_the_ladders(
        difficulty in -1000i32..1000,
        energy in -1000i32..1000,
    ) {
        let rec = atena_ml_core::EnergyDifficultyPolicy
            .try_recommend(&UserContext::with_levels(difficulty, energy))
            .unwrap();
        prop_assert!(POMODORO_OPTIONS.contains(&rec.pomodoro_minutes));
        prop_assert!(BREAK_OPTIONS.contains(&rec.break_minutes));
        prop_assert_eq!(rec.long_break_minutes, (rec.break_minutes * 2).max(15));
        prop_assert!(rec.sessions_until_long_break == 3 || rec.sessions_until_long_break == 4);
        prop_assert_eq!(rec.confidence, 0.7);
    }

    #[test]
    fn more_energy_never_shortens_the_interval(
        difficulty in 1i32..=5,
        energy in 1i32..5,
    ) {
        let policy = atena_ml_core::EnergyDifficultyPolicy;
        let low = policy.try_recommend(&UserContext::with_levels(difficulty, energy)).unwrap();
        let high = policy.try_recommend(&UserContext::with_levels(difficulty, energy + 1)).unwrap();
        prop_assert!(high.pomodoro_minutes >= low.pomodoro_minutes);
    }

    #[test]
    fn any_extreme_levels_still_recommend(
        difficulty in any::<i32>(),
        energy in any::<i32>(),
    ) {
        use atena_ml_core::RecommendationPolicy;
        let rec = atena_ml_core::EnergyDifficultyPolicy
            .recommend(&UserContext::with_levels(difficulty, energy), true);
        prop_assert!(rec.confidence == 0.7 || rec == Recommendation::classic(0.5));
    }

    #[test]
    fn mock_policy_stays_in_range(
        difficulty in any::<i32>(),
        energy in any::<i32>(),
    ) {
        use atena_ml_core::RecommendationPolicy;
        let rec = atena_ml_core::DefaultAdjustmentPolicy
            .recommend(&UserContext::with_levels(difficulty, energy), false);
        prop_assert!((15..=35).contains(&rec.pomodoro_minutes));
        prop_assert!(rec.break_minutes == 5 || rec.break_minutes == 7);
        prop_assert_eq!(rec.long_break_minutes, 15);
        prop_assert_eq!(rec.sessions_until_long_break, 4);
    }
}
