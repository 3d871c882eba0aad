use chrono::{TimeZone, Utc};
use lemonstand_game::{
    DayCycle, FixedClock, FixedDemand, MemoryStore, PurchaseOutcome, PurchaseRejection,
    RestockAvailability, RestockOutcome, SequenceSource, SimulationState, StandConfig,
    StandSession, Upgrade, Weather, market_price, purchase, restock, score_value,
};

type ScriptedSession = StandSession<MemoryStore, FixedClock, SequenceSource, FixedDemand>;

fn scripted(demand: u32) -> ScriptedSession {
    let clock = FixedClock(Utc.with_ymd_and_hms(2024, 8, 1, 17, 0, 0).unwrap());
    let cycle = DayCycle::new(SequenceSource::constant(0.1), FixedDemand(demand));
    StandSession::with_parts(StandConfig::default(), MemoryStore::new(), clock, cycle, 77).unwrap()
}

#[test]
fn opening_day_with_seventeen_customers() {
    let mut session = scripted(17);
    let outcome = session.run_day();
    let state = session.state();
    assert_eq!(outcome.sold, 17);
    assert_eq!(outcome.waste, 1);
    assert!((outcome.revenue - 17.0).abs() < 1e-9);
    assert_eq!(state.stock, 8);
    assert!((state.cash - 31.55).abs() < 1e-9);
    assert_eq!(state.day, 3);
    assert_eq!(state.weather, Weather::Sunny);
    assert!(!outcome.collapsed);
}

#[test]
fn restock_ten_on_day_three() {
    let mut state = SimulationState::default();
    state.day = 3;
    state.pressure = 1.06;
    let unit = market_price(&state);
    assert!((unit - 0.2465).abs() < 1e-3);
    let outcome = restock(&mut state, 10);
    assert!(outcome.is_restocked());
    assert_eq!(state.stock, 36);
    assert!((state.cash - (14.55 - 10.0 * unit)).abs() < 1e-9);
    assert!((state.cash - 12.08).abs() < 0.01);
}

#[test]
fn stand_rejected_on_day_three_regardless_of_cash() {
    for cash in [0.0, 39.0, 10_000.0] {
        let mut state = SimulationState::default();
        state.day = 3;
        state.cash = cash;
        let before = state.clone();
        let outcome = purchase(&mut state, Upgrade::Stand);
        assert_eq!(
            outcome,
            PurchaseOutcome::Rejected(PurchaseRejection::TooEarly {
                unlocks_after_day: 3
            })
        );
        assert_eq!(state, before);
    }
}

#[test]
fn stand_unlock_then_cash_gate() {
    let mut session = scripted(10);
    session.set_price(0.5);
    session.run_day();
    assert_eq!(
        session.buy_stand(),
        PurchaseOutcome::Rejected(PurchaseRejection::TooEarly {
            unlocks_after_day: 3
        })
    );
    session.run_day();
    // Two days of ten cups at $0.50 leave $24.55, short of the $39 stand.
    assert_eq!(session.state().day, 4);
    assert!((session.state().cash - 24.55).abs() < 1e-9);
    assert!(matches!(
        session.buy_stand(),
        PurchaseOutcome::Rejected(PurchaseRejection::InsufficientCash { .. })
    ));
}

#[test]
fn oversized_restock_is_a_no_op() {
    let mut session = scripted(0);
    let before = session.state().clone();
    assert_eq!(
        session.restock(100),
        RestockOutcome::Rejected(RestockAvailability::ExceedsCapacity)
    );
    assert_eq!(session.restock(0), RestockOutcome::Empty);
    assert_eq!(session.state(), &before);
}

#[test]
fn saved_score_matches_the_live_score() {
    let mut session = scripted(17);
    session.run_day();
    let expected = score_value(session.state());
    let board = session.save_score().unwrap();
    assert_eq!(board.best().map(|e| e.score), Some(expected));
    assert_eq!(board.best().map(|e| e.day), Some(3));
    assert_eq!(session.snapshot().score, expected);
}
