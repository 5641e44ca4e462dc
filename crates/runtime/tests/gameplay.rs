//! Scenario tests for the four game events, run against both guards.

mod common;

use std::sync::Arc;
use std::time::Duration;

use game_core::{HitPoints, LootTable, LootTier, PcgRng, PlayerRecord};
use runtime::{
    ErrorKind, GuardStrategy, InMemoryKvStore, OptimisticGuard, PlayerRepository, Runtime,
    RuntimeError,
};

use common::{
    ConflictingStore, KeyFailingStore, record, runtime_over, seed, stored, total_money,
};

const GUARDS: [GuardStrategy; 2] = [GuardStrategy::Optimistic, GuardStrategy::Serial];

#[tokio::test]
async fn register_issues_fresh_full_health_records() {
    for guard in GUARDS {
        let store = Arc::new(InMemoryKvStore::new());
        let runtime = runtime_over(Arc::clone(&store), guard);

        let first = runtime.register().await.expect("register should succeed");
        let second = runtime.register().await.expect("register should succeed");
        assert_ne!(first.token, second.token);

        let record = stored(&store, first.token.as_str()).await.unwrap();
        assert_eq!(record.hp, HitPoints::full());
        assert_eq!(record.money, 0);
        assert!(record.alive);
        assert_eq!(store.len(), 2);
    }
}

#[tokio::test]
async fn default_tokens_are_unique_uuids() {
    let runtime = Runtime::builder().build();
    let a = runtime.register().await.unwrap().token;
    let b = runtime.register().await.unwrap().token;

    assert_ne!(a, b);
    assert_eq!(a.as_str().len(), 36);
    assert_eq!(runtime.player(a.as_str()).await.unwrap(), Some(PlayerRecord::new()));
}

#[tokio::test]
async fn loot_pays_within_tier_and_accumulates() {
    let table = LootTable::default();
    for guard in GUARDS {
        let store = Arc::new(InMemoryKvStore::new());
        let runtime = runtime_over(Arc::clone(&store), guard);
        let token = runtime.register().await.unwrap().token;

        let mut expected_total = 0;
        for point in ["1", "60", "61", "120", "7", "99"] {
            let receipt = runtime.loot(token.as_str(), point).await.unwrap();
            let tier = table.tier(point);
            assert!(table.range(tier).contains(&receipt.gain), "{point}: {receipt:?}");
            assert_eq!(LootTier::of_reward(receipt.gain, &table), Some(tier));

            expected_total += receipt.gain;
            assert_eq!(receipt.total, expected_total);
        }

        let record = stored(&store, token.as_str()).await.unwrap();
        assert_eq!(record.money, expected_total);
    }
}

#[tokio::test]
async fn loot_rejects_unknown_and_retired_players() {
    for guard in GUARDS {
        let store = Arc::new(InMemoryKvStore::new());
        let runtime = runtime_over(Arc::clone(&store), guard);
        seed(&store, "gone", PlayerRecord { alive: false, ..record(0, 100, 100, 500) }).await;

        let err = runtime.loot("ghost", "5").await.unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidPlayer));
        assert_eq!(store.len(), 1);

        let err = runtime.loot("gone", "70").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPlayer);
        assert_eq!(stored(&store, "gone").await.unwrap().money, 500);
        assert!(stored(&store, "ghost").await.is_none());
    }
}

#[tokio::test]
async fn missing_parameters_fail_before_touching_the_store() {
    let store = Arc::new(InMemoryKvStore::new());
    let runtime = runtime_over(Arc::clone(&store), GuardStrategy::Optimistic);
    // Any store access would trip this.
    store.fail_next(usize::MAX);

    let cases = [
        runtime.loot("", "5").await.unwrap_err(),
        runtime.loot("p-1", "").await.unwrap_err(),
        runtime.attack("", "t", "head").await.unwrap_err(),
        runtime.attack("a", "", "head").await.unwrap_err(),
        runtime.attack("a", "t", "").await.unwrap_err(),
        runtime.evacuate("").await.unwrap_err(),
    ];
    for err in cases {
        assert_eq!(err.kind(), ErrorKind::MissingParams, "{err}");
    }

    let err = runtime.attack("a", "t", "leg").await.unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownLocation(ref loc) if loc == "leg"));
}

#[tokio::test]
async fn hit_disables_only_the_scanned_location() {
    for guard in GUARDS {
        let store = Arc::new(InMemoryKvStore::new());
        let runtime = runtime_over(Arc::clone(&store), guard);
        seed(&store, "a", record(100, 100, 100, 0)).await;
        seed(&store, "t", record(100, 100, 100, 3_000)).await;

        let report = runtime.attack("a", "t", "chest").await.unwrap();
        assert!(report.success);
        assert_eq!(report.target, record(100, 0, 100, 3_000));
        assert!(report.bounty.is_none());
        assert_eq!(stored(&store, "t").await.unwrap(), record(100, 0, 100, 3_000));
    }
}

#[tokio::test]
async fn elimination_moves_target_money_to_attacker() {
    for guard in GUARDS {
        let store = Arc::new(InMemoryKvStore::new());
        let runtime = runtime_over(Arc::clone(&store), guard);
        seed(&store, "a", record(100, 100, 100, 5_000)).await;
        seed(&store, "t", record(0, 0, 100, 12_000)).await;

        let report = runtime.attack("a", "t", "back").await.unwrap();

        assert!(!report.target.alive);
        assert_eq!(report.target.money, 0);
        let bounty = report.bounty.expect("elimination reports a bounty");
        assert_eq!(bounty.amount, 12_000);
        assert_eq!(bounty.credited_to.as_ref().map(|t| t.as_str()), Some("a"));

        let target = stored(&store, "t").await.unwrap();
        assert!(!target.alive);
        assert_eq!(target.money, 0);
        assert_eq!(stored(&store, "a").await.unwrap().money, 17_000);
        assert_eq!(total_money(&store), 17_000);
    }
}

#[tokio::test]
async fn elimination_by_unknown_attacker_destroys_the_bounty() {
    for guard in GUARDS {
        let store = Arc::new(InMemoryKvStore::new());
        let runtime = runtime_over(Arc::clone(&store), guard);
        seed(&store, "t", record(0, 0, 100, 9_000)).await;

        let report = runtime.attack("nobody", "t", "back").await.unwrap();

        assert!(!report.target.alive);
        assert_eq!(report.target.money, 0);
        let bounty = report.bounty.unwrap();
        assert_eq!(bounty.amount, 9_000);
        assert!(bounty.credited_to.is_none());

        assert_eq!(total_money(&store), 0);
        assert!(stored(&store, "nobody").await.is_none());
    }
}

#[tokio::test]
async fn elimination_by_retired_attacker_destroys_the_bounty() {
    for guard in GUARDS {
        let store = Arc::new(InMemoryKvStore::new());
        let runtime = runtime_over(Arc::clone(&store), guard);
        let evacuated = PlayerRecord {
            alive: false,
            ..record(100, 100, 100, 40_000)
        };
        seed(&store, "a", evacuated).await;
        seed(&store, "t", record(100, 0, 0, 9_000)).await;

        let report = runtime.attack("a", "t", "head").await.unwrap();
        assert!(report.bounty.unwrap().credited_to.is_none());

        // Banked balance stays frozen.
        assert_eq!(stored(&store, "a").await.unwrap(), evacuated);
        assert_eq!(total_money(&store), 40_000);
    }
}

#[tokio::test]
async fn repeated_attack_is_refused_and_pays_once() {
    for guard in GUARDS {
        let store = Arc::new(InMemoryKvStore::new());
        let runtime = runtime_over(Arc::clone(&store), guard);
        seed(&store, "a", record(100, 100, 100, 0)).await;
        seed(&store, "t", record(100, 0, 100, 2_500)).await;

        runtime.attack("a", "t", "head").await.unwrap();
        let err = runtime.attack("a", "t", "head").await.unwrap_err();
        assert!(matches!(err, RuntimeError::AlreadyDisabled { .. }));
        assert_eq!(stored(&store, "t").await.unwrap(), record(0, 0, 100, 2_500));

        runtime.attack("a", "t", "back").await.unwrap();
        let err = runtime.attack("a", "t", "back").await.unwrap_err();
        // The target is out of play now, which takes precedence.
        assert_eq!(err.kind(), ErrorKind::InvalidTarget);
        assert_eq!(stored(&store, "a").await.unwrap().money, 2_500);
    }
}

#[tokio::test]
async fn attacks_on_missing_or_dead_targets_are_invalid() {
    for guard in GUARDS {
        let store = Arc::new(InMemoryKvStore::new());
        let runtime = runtime_over(Arc::clone(&store), guard);
        let dead = PlayerRecord {
            hp: HitPoints {
                head: 0,
                chest: 0,
                back: 0,
            },
            money: 0,
            alive: false,
        };
        seed(&store, "dead", dead).await;

        let err = runtime.attack("a", "ghost", "head").await.unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidTarget));
        let err = runtime.attack("a", "dead", "head").await.unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidTarget));

        assert_eq!(stored(&store, "dead").await.unwrap(), dead);
        assert_eq!(store.len(), 1);
    }
}

#[tokio::test]
async fn self_elimination_forfeits_own_balance() {
    for guard in GUARDS {
        let store = Arc::new(InMemoryKvStore::new());
        let runtime = runtime_over(Arc::clone(&store), guard);
        seed(&store, "me", record(0, 0, 100, 7_000)).await;

        let report = runtime.attack("me", "me", "back").await.unwrap();
        assert!(report.bounty.unwrap().credited_to.is_none());
        assert_eq!(total_money(&store), 0);
    }
}

#[tokio::test]
async fn evacuation_banks_money_and_ends_play() {
    for guard in GUARDS {
        let store = Arc::new(InMemoryKvStore::new());
        let runtime = runtime_over(Arc::clone(&store), guard);
        seed(&store, "p", record(0, 100, 100, 42_000)).await;

        let evacuation = runtime.evacuate("p").await.unwrap();
        assert!(evacuation.success);
        assert_eq!(evacuation.money, 42_000);

        let banked = stored(&store, "p").await.unwrap();
        assert!(!banked.alive);
        assert_eq!(banked.money, 42_000);

        assert!(matches!(
            runtime.evacuate("p").await.unwrap_err(),
            RuntimeError::InvalidPlayer
        ));
        assert!(matches!(
            runtime.loot("p", "80").await.unwrap_err(),
            RuntimeError::InvalidPlayer
        ));
        assert!(matches!(
            runtime.attack("x", "p", "chest").await.unwrap_err(),
            RuntimeError::InvalidTarget
        ));
        assert_eq!(stored(&store, "p").await.unwrap(), banked);
    }
}

#[tokio::test]
async fn store_outage_aborts_without_writing_and_can_be_retried() {
    for guard in GUARDS {
        let store = Arc::new(InMemoryKvStore::new());
        let runtime = runtime_over(Arc::clone(&store), guard);
        seed(&store, "p", record(100, 100, 100, 1_000)).await;

        store.fail_next(1);
        let err = runtime.loot("p", "3").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
        assert!(err.is_retryable());
        assert_eq!(stored(&store, "p").await.unwrap().money, 1_000);

        let receipt = runtime.loot("p", "3").await.unwrap();
        assert_eq!(receipt.total, 1_000 + receipt.gain);
    }
}

#[tokio::test]
async fn failed_payout_write_forfeits_the_bounty() {
    for guard in GUARDS {
        let store = Arc::new(KeyFailingStore::new());
        let runtime = runtime_over(Arc::clone(&store), guard);
        seed(&store, "a", record(100, 100, 100, 5_000)).await;
        seed(&store, "t", record(0, 0, 100, 12_000)).await;
        store.fail_key("player:a");

        let report = runtime
            .attack("a", "t", "back")
            .await
            .expect("the hit lands even when the payout fails");
        assert_eq!(
            report.target,
            PlayerRecord {
                alive: false,
                ..record(0, 0, 0, 0)
            }
        );
        let bounty = report.bounty.expect("elimination reports a bounty");
        assert_eq!(bounty.amount, 12_000);
        assert!(bounty.credited_to.is_none());

        store.recover();
        assert_eq!(stored(&store, "a").await.unwrap(), record(100, 100, 100, 5_000));
        assert_eq!(stored(&store, "t").await.unwrap(), report.target);
        assert_eq!(total_money(store.inner()), 5_000);
    }
}

#[tokio::test]
async fn optimistic_guard_gives_up_after_its_conflict_budget() {
    let store = Arc::new(ConflictingStore::new());
    seed(&store, "a", record(100, 100, 100, 700)).await;
    let guard = OptimisticGuard::new(PlayerRepository::new(Arc::clone(&store)))
        .with_max_attempts(3)
        .with_backoff(Duration::ZERO);
    let runtime = Runtime::builder()
        .guard(Arc::new(guard))
        .rng(PcgRng::new(7))
        .build();

    let err = runtime.loot("a", "5").await.unwrap_err();
    assert!(
        matches!(&err, RuntimeError::Contention { key, attempts: 3 } if key == "player:a"),
        "{err:?}"
    );
    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    assert!(err.is_retryable());
    assert_eq!(store.conditional_writes(), 3);
    assert_eq!(stored(&store, "a").await.unwrap().money, 700);
}

#[tokio::test]
async fn responses_serialize_like_the_http_bodies() {
    let store = Arc::new(InMemoryKvStore::new());
    let runtime = runtime_over(Arc::clone(&store), GuardStrategy::Optimistic);
    seed(&store, "a", record(100, 100, 100, 0)).await;
    seed(&store, "t", record(100, 100, 100, 0)).await;

    let registration = serde_json::to_value(runtime.register().await.unwrap()).unwrap();
    assert_eq!(registration, serde_json::json!({ "token": "p-1" }));

    let report = serde_json::to_value(runtime.attack("a", "t", "head").await.unwrap()).unwrap();
    assert_eq!(
        report,
        serde_json::json!({
            "success": true,
            "target": {
                "hp": { "head": 0, "chest": 100, "back": 100 },
                "money": 0,
                "alive": true,
            },
        })
    );

    let evacuation = serde_json::to_value(runtime.evacuate("a").await.unwrap()).unwrap();
    assert_eq!(evacuation, serde_json::json!({ "success": true, "money": 0 }));
}
