//! Invariant tests for void_health
//!
//! Properties that must hold for every request sequence

use parking_lot::Mutex;
use std::sync::Arc;
use void_ecs::Entity;
use void_event::{Modification, Priority};
use void_health::prelude::*;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn world_with(current: i32, max: i32) -> (HealthWorld, Entity) {
    init_logger();
    let mut world = HealthWorld::default();
    let entity = world.spawn();
    world
        .insert_vitality(entity, VitalityRecord::with_health(current, max).unwrap())
        .unwrap();
    (world, entity)
}

/// Counts every health notification
fn count_notifications(world: &mut HealthWorld) -> Arc<Mutex<usize>> {
    let count = Arc::new(Mutex::new(0));
    let sink = count.clone();
    world
        .events_mut()
        .subscribe(move |_: &OnDamaged| *sink.lock() += 1);
    let sink = count.clone();
    world
        .events_mut()
        .subscribe(move |_: &OnRestored| *sink.lock() += 1);
    let sink = count.clone();
    world
        .events_mut()
        .subscribe(move |_: &OnFullyHealed| *sink.lock() += 1);
    count
}

/// INVARIANT: 0 <= current <= max after every operation
#[test]
fn invariant_health_stays_in_bounds() {
    let (mut world, entity) = world_with(50, 100);
    let potion = ActionId::new("potion").unwrap();
    world
        .register_regen(entity, potion, GameDuration::Infinite)
        .unwrap();
    world
        .before_regen_mut()
        .subscribe(|_: &BeforeRegen| Modification::add(37.0));

    for step in 0..200i32 {
        let amount = (step * 7919) % 61;
        if step % 3 == 0 {
            world.apply_restore(DoRestore::new(entity, amount)).unwrap();
        } else {
            world.apply_damage(DoDamage::new(entity, amount)).unwrap();
        }
        if step % 17 == 0 {
            world.change_max_health(entity, 20 + amount).unwrap();
        }
        world.update(50);

        let record = world.vitality(entity).unwrap();
        assert!(record.current() >= 0);
        assert!(record.current() <= record.max());
        assert!(record.max() > 0);
    }
}

/// INVARIANT: zero-amount requests never change state or notify
#[test]
fn invariant_zero_requests_are_idempotent() {
    let (mut world, entity) = world_with(50, 100);
    let notifications = count_notifications(&mut world);
    world
        .before_damaged_mut()
        .subscribe(|_: &BeforeDamaged| Modification::add(100.0));
    world
        .before_restore_mut()
        .subscribe(|_: &BeforeRestore| Modification::add(100.0));

    world.apply_damage(DoDamage::new(entity, 0)).unwrap();
    world.apply_restore(DoRestore::new(entity, 0)).unwrap();

    assert_eq!(world.vitality(entity).unwrap().current(), 50);
    assert_eq!(*notifications.lock(), 0);
}

/// INVARIANT: a consumed chain leaves the record untouched and silent
#[test]
fn invariant_consume_cancels_everything() {
    let (mut world, entity) = world_with(50, 100);
    let notifications = count_notifications(&mut world);
    world
        .before_damaged_mut()
        .subscribe(|_: &BeforeDamaged| Modification::consume());
    world
        .before_restore_mut()
        .subscribe(|_: &BeforeRestore| Modification::consume());
    world
        .before_regen_mut()
        .subscribe(|_: &BeforeRegen| Modification::add(50.0));
    world
        .before_regen_mut()
        .subscribe_with_priority(|_: &BeforeRegen| Modification::consume(), Priority::Critical);
    world
        .register_regen(entity, ActionId::new("x").unwrap(), GameDuration::Infinite)
        .unwrap();

    world.apply_damage(DoDamage::new(entity, 10)).unwrap();
    world.apply_restore(DoRestore::new(entity, 10)).unwrap();
    for _ in 0..10 {
        world.update(200);
    }

    assert_eq!(world.vitality(entity).unwrap().current(), 50);
    assert_eq!(*notifications.lock(), 0);
}

/// INVARIANT: observers after a consuming observer never run
#[test]
fn invariant_consume_halts_lower_priorities() {
    let (mut world, entity) = world_with(50, 100);
    let ran = Arc::new(Mutex::new(Vec::new()));

    let log = ran.clone();
    world.before_damaged_mut().subscribe_with_priority(
        move |_: &BeforeDamaged| {
            log.lock().push("low");
            Modification::PASS
        },
        Priority::Low,
    );
    let log = ran.clone();
    world.before_damaged_mut().subscribe_with_priority(
        move |_: &BeforeDamaged| {
            log.lock().push("high");
            Modification::consume()
        },
        Priority::High,
    );

    world.apply_damage(DoDamage::new(entity, 10)).unwrap();

    assert_eq!(*ran.lock(), ["high"]);
}

/// INVARIANT: sign-flipping modifiers cannot recurse without bound
#[test]
fn invariant_redirects_are_bounded() {
    let (mut world, entity) = world_with(50, 100);
    let notifications = count_notifications(&mut world);
    world
        .before_damaged_mut()
        .subscribe(|_: &BeforeDamaged| Modification::multiply(-1.0));
    world
        .before_restore_mut()
        .subscribe(|_: &BeforeRestore| Modification::multiply(-1.0));

    assert_eq!(
        world.apply_damage(DoDamage::new(entity, 10)),
        Err(HealthError::RedirectLimit { depth: 2 })
    );
    assert_eq!(
        world.apply_restore(DoRestore::new(entity, 10)),
        Err(HealthError::RedirectLimit { depth: 2 })
    );
    assert_eq!(world.vitality(entity).unwrap().current(), 50);
    assert_eq!(*notifications.lock(), 0);
}

/// INVARIANT: negative restoration is rejected, never clamped
#[test]
fn invariant_negative_restore_fails_fast() {
    let (mut world, entity) = world_with(50, 100);
    assert_eq!(
        world.apply_restore(DoRestore::new(entity, -1)),
        Err(HealthError::NegativeRestore(-1))
    );
    assert_eq!(world.vitality(entity).unwrap().current(), 50);
}

/// INVARIANT: a registry without health data is skipped, others still regenerate
#[test]
fn invariant_missing_vitality_degrades_gracefully() {
    let (mut world, entity) = world_with(50, 100);
    let other = world.spawn();
    world
        .insert_vitality(other, VitalityRecord::with_health(50, 100).unwrap())
        .unwrap();
    let id = ActionId::new("x").unwrap();
    world
        .register_regen(entity, id.clone(), GameDuration::Infinite)
        .unwrap();
    world
        .register_regen(other, id, GameDuration::Infinite)
        .unwrap();
    world
        .before_regen_mut()
        .subscribe(|_: &BeforeRegen| Modification::add(5.0));

    world.remove_vitality(entity);
    let report = world.update(1000).unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(report.processed, 1);
    assert_eq!(world.vitality(other).unwrap().current(), 55);
    assert!(world.regen_registry(entity).is_some());
}

/// INVARIANT: full-heal notification fires once per transition
#[test]
fn invariant_fully_healed_once_per_transition() {
    let (mut world, entity) = world_with(90, 100);
    let heals = Arc::new(Mutex::new(0));
    let sink = heals.clone();
    world
        .events_mut()
        .subscribe(move |_: &OnFullyHealed| *sink.lock() += 1);

    world.apply_restore(DoRestore::new(entity, 50)).unwrap();
    world.apply_restore(DoRestore::new(entity, 50)).unwrap();
    assert_eq!(*heals.lock(), 1);

    world.apply_damage(DoDamage::new(entity, 1)).unwrap();
    world.apply_restore(DoRestore::new(entity, 1)).unwrap();
    assert_eq!(*heals.lock(), 2);
}

/// INVARIANT: requests for dead entities are rejected
#[test]
fn invariant_dead_entities_rejected() {
    let (mut world, entity) = world_with(50, 100);
    world.despawn(entity);

    assert_eq!(
        world.apply_damage(DoDamage::new(entity, 1)),
        Err(HealthError::DeadEntity(entity))
    );
    assert_eq!(
        world.apply_restore(DoRestore::new(entity, 1)),
        Err(HealthError::DeadEntity(entity))
    );
    assert_eq!(
        world.change_max_health(entity, 10),
        Err(HealthError::DeadEntity(entity))
    );

    // the slot is reused with a new generation
    let reborn = world.spawn();
    assert_eq!(reborn.index(), entity.index());
    assert!(!world.is_alive(entity));
    assert!(world.is_alive(reborn));
}

/// INVARIANT: tick reports count only health that was actually restored
#[test]
fn invariant_tick_report_matches_applied_health() {
    init_logger();
    let mut world = HealthWorld::default();
    let id = ActionId::new("surge").unwrap();
    let mut entities = Vec::new();
    for _ in 0..3 {
        let entity = world.spawn();
        world
            .insert_vitality(entity, VitalityRecord::with_health(0, 100).unwrap())
            .unwrap();
        world
            .register_regen(entity, id.clone(), GameDuration::Infinite)
            .unwrap();
        entities.push(entity);
    }
    world
        .before_regen_mut()
        .subscribe(|_: &BeforeRegen| Modification::add(1e12));

    let report = world.update(1000).unwrap();
    assert_eq!(report.restored, 300);
    for entity in &entities {
        assert_eq!(world.vitality(*entity).unwrap().current(), 100);
    }

    let report = world.update(1000).unwrap();
    assert_eq!(report.processed, 3);
    assert_eq!(report.restored, 0);
}

/// INVARIANT: a non-finite regen rate does not stop later regeneration
#[test]
fn invariant_non_finite_rate_recovers() {
    let (mut world, entity) = world_with(100, 100);
    let id = ActionId::new("flaky").unwrap();
    world
        .register_regen(entity, id, GameDuration::Infinite)
        .unwrap();
    let rate = Arc::new(Mutex::new(f32::INFINITY));
    let source = rate.clone();
    world
        .before_regen_mut()
        .subscribe(move |_: &BeforeRegen| Modification::add(*source.lock()));

    world.update(200);
    *rate.lock() = 5.0;
    world.apply_damage(DoDamage::new(entity, 50)).unwrap();
    for _ in 0..60 {
        world.update(200);
    }

    assert_eq!(world.vitality(entity).unwrap().current(), 100);
}
