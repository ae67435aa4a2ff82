use roundstake::{
    Account, Asset, InMemoryCustody, ManualClock, RoleBook, RoundState, StakingError,
    StakingFacade, Timestamp, Wad,
};
use std::sync::Arc;

fn account(name: &str) -> Account {
    Account::new(name)
}

fn setup(start_secs: u64) -> (StakingFacade<InMemoryCustody>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::at(start_secs));
    let mut custody = InMemoryCustody::new(account("vault"));
    for who in ["admin", "manager", "alice"] {
        custody.credit(&account(who), &Asset::new("STK"), Wad::from_units(1_000_000));
        custody.credit(&account(who), &Asset::new("RWD"), Wad::from_units(1_000_000));
    }
    let roles = RoleBook::new(account("admin"), [account("manager")]);
    let facade = StakingFacade::new(
        custody,
        roles,
        clock.clone(),
        Asset::new("STK"),
        Asset::new("RWD"),
        Wad::ZERO,
    );
    (facade, clock)
}

#[test]
fn round_states_follow_the_schedule() {
    let (mut facade, clock) = setup(0);
    facade
        .init_round(
            &account("admin"),
            Wad::from_units(1),
            Timestamp::new(100),
            50,
        )
        .unwrap();

    assert_eq!(facade.get_pool_data(None).unwrap().state, RoundState::Scheduled);
    clock.set(100);
    assert_eq!(facade.get_pool_data(None).unwrap().state, RoundState::Active);
    clock.set(150);
    assert_eq!(facade.get_pool_data(None).unwrap().state, RoundState::Finished);
}

#[test]
fn close_freezes_accrual_at_the_close_instant() {
    // Scenario: close at start+11, advance to start+20, claim pays the
    // reward accrued up to the close only.
    let (mut facade, clock) = setup(0);
    facade
        .init_round(&account("admin"), Wad::from_units(1), Timestamp::new(0), 100)
        .unwrap();
    facade.stake(&account("alice"), Wad::from_units(10)).unwrap();

    clock.set(11);
    assert_eq!(
        facade.close_pool(&account("alice")),
        Err(StakingError::OnlyAdmin)
    );
    facade.close_pool(&account("admin")).unwrap();
    let index_at_close = facade.get_reward_index(None).unwrap();

    clock.set(20);
    assert_eq!(facade.get_reward_index(None).unwrap(), index_at_close);
    assert_eq!(index_at_close, Wad(1_100_000_000_000_000_000));
    let view = facade.get_user_data(&account("alice"), None).unwrap();
    assert_eq!(view.pending_reward, Wad(11_000_000_000_000_000_000));

    let paid = facade.claim(&account("alice"), None).unwrap();
    assert_eq!(paid, Wad(11_000_000_000_000_000_000));
}

#[test]
fn closed_round_rejects_new_stake_and_allows_withdraw() {
    let (mut facade, clock) = setup(0);
    facade
        .init_round(&account("admin"), Wad::from_units(1), Timestamp::new(0), 100)
        .unwrap();
    facade.stake(&account("alice"), Wad::from_units(10)).unwrap();

    clock.set(10);
    facade.close_pool(&account("admin")).unwrap();
    assert_eq!(
        facade.stake(&account("alice"), Wad::from_units(1)),
        Err(StakingError::Closed)
    );
    let out = facade
        .withdraw(&account("alice"), roundstake::Amount::All, None)
        .unwrap();
    assert_eq!(out, Wad::from_units(10));
}

#[test]
fn close_then_init_next_round() {
    let (mut facade, clock) = setup(0);
    facade
        .init_round(&account("admin"), Wad::from_units(1), Timestamp::new(0), 100)
        .unwrap();
    clock.set(10);
    facade.close_pool(&account("admin")).unwrap();

    // closure finished round 1, so a new round may start immediately
    let round2 = facade
        .init_round(&account("admin"), Wad::from_units(2), Timestamp::new(10), 50)
        .unwrap();
    assert_eq!(round2.as_u64(), 2);
    assert_eq!(facade.current_round(), Some(round2));
}

#[test]
fn extend_checkpoints_old_rate_before_switching() {
    // Scenario: raise the rate mid-round; pre-switch earnings unchanged.
    let (mut facade, clock) = setup(0);
    facade
        .init_round(&account("admin"), Wad::from_units(1), Timestamp::new(0), 100)
        .unwrap();
    facade.stake(&account("alice"), Wad::from_units(10)).unwrap();

    clock.set(10);
    let earned_before = facade
        .get_user_data(&account("alice"), None)
        .unwrap()
        .pending_reward;
    assert_eq!(earned_before, Wad::from_units(10));

    facade
        .extend_pool(&account("manager"), Wad::from_units(5), 50)
        .unwrap();

    // schedule reset: 50s from now, not appended to the old end
    let pool = facade.get_pool_data(None).unwrap();
    assert_eq!(pool.end_timestamp, Timestamp::new(60));
    assert_eq!(pool.reward_per_second, Wad::from_units(5));
    // reserve topped up by new_rate * duration
    assert_eq!(pool.reward_reserve, Wad::from_units(350));

    // pre-switch reward is exactly what it was
    let at_switch = facade
        .get_user_data(&account("alice"), None)
        .unwrap()
        .pending_reward;
    assert_eq!(at_switch, earned_before);

    clock.set(12);
    // two more seconds at the new rate: 2 * 5 over 10 staked
    let after = facade
        .get_user_data(&account("alice"), None)
        .unwrap()
        .pending_reward;
    assert_eq!(after, Wad::from_units(20));
}

#[test]
fn extend_requires_manager_and_a_live_round() {
    let (mut facade, clock) = setup(0);
    facade
        .init_round(&account("admin"), Wad::from_units(1), Timestamp::new(0), 10)
        .unwrap();

    assert_eq!(
        facade.extend_pool(&account("alice"), Wad::from_units(1), 10),
        Err(StakingError::OnlyManager)
    );

    clock.set(10);
    assert_eq!(
        facade.extend_pool(&account("manager"), Wad::from_units(1), 10),
        Err(StakingError::Finished)
    );
}

#[test]
fn extend_by_admin_is_allowed() {
    let (mut facade, _clock) = setup(0);
    facade
        .init_round(&account("admin"), Wad::from_units(1), Timestamp::new(0), 10)
        .unwrap();
    facade
        .extend_pool(&account("admin"), Wad::from_units(2), 10)
        .unwrap();
}

#[test]
fn finished_round_index_is_frozen_forever() {
    let (mut facade, clock) = setup(0);
    facade
        .init_round(&account("admin"), Wad::from_units(1), Timestamp::new(0), 10)
        .unwrap();
    facade.stake(&account("alice"), Wad::from_units(10)).unwrap();

    clock.set(10);
    let frozen = facade.get_reward_index(None).unwrap();
    clock.set(1_000_000);
    assert_eq!(facade.get_reward_index(None).unwrap(), frozen);
    assert_eq!(frozen, Wad::ONE);
}

#[test]
fn index_monotonic_while_principal_staked() {
    let (mut facade, clock) = setup(0);
    facade
        .init_round(&account("admin"), Wad::from_units(1), Timestamp::new(0), 100)
        .unwrap();
    facade.stake(&account("alice"), Wad::from_units(10)).unwrap();

    let mut last = facade.get_reward_index(None).unwrap();
    for t in [1, 2, 5, 30, 99, 100] {
        clock.set(t);
        let idx = facade.get_reward_index(None).unwrap();
        assert!(idx >= last, "index decreased at t={t}");
        last = idx;
    }
}

#[test]
fn empty_pool_accrues_no_index() {
    let (mut facade, clock) = setup(0);
    facade
        .init_round(&account("admin"), Wad::from_units(1), Timestamp::new(0), 100)
        .unwrap();

    clock.set(50);
    assert_eq!(facade.get_reward_index(None).unwrap(), Wad::ZERO);

    // principal arriving late earns nothing retroactively
    facade.stake(&account("alice"), Wad::from_units(10)).unwrap();
    let view = facade.get_user_data(&account("alice"), None).unwrap();
    assert_eq!(view.pending_reward, Wad::ZERO);

    clock.set(60);
    let view = facade.get_user_data(&account("alice"), None).unwrap();
    assert_eq!(view.pending_reward, Wad::from_units(10));
}
