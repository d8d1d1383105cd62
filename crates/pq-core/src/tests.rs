//! Unit tests for pq-core primitives.

#[cfg(test)]
mod ids {
    use crate::{BoothId, CategoryId, CustomerId, ServerId};

    #[test]
    fn index_roundtrip() {
        let id = ServerId(3);
        assert_eq!(id.index(), 3);
        assert_eq!(ServerId::try_from(3usize).unwrap(), id);
    }

    #[test]
    fn customer_ids_count_up_from_one() {
        assert_eq!(CustomerId::FIRST, CustomerId(1));
        assert_eq!(CustomerId::FIRST.next().next(), CustomerId(3));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(BoothId::INVALID.0, u32::MAX);
        assert_eq!(CategoryId::INVALID.0, u16::MAX);
        assert_eq!(BoothId::default(), BoothId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(BoothId(2).to_string(), "BoothId(2)");
    }
}

#[cfg(test)]
mod time {
    use std::time::{Duration, Instant};

    use crate::{SimClock, SimTime};

    #[test]
    fn sim_time_arithmetic() {
        let t = SimTime(10.0);
        assert_eq!(t + 2.5, SimTime(12.5));
        assert_eq!(SimTime(12.5) - t, 2.5);
        assert_eq!(SimTime(90.0).hours(), 1.5);
    }

    #[test]
    fn priming_poll_does_not_advance() {
        let mut clock = SimClock::new(20.0);
        assert!(!clock.is_primed());
        assert_eq!(clock.advance(Instant::now()), None);
        assert!(clock.is_primed());
        assert_eq!(clock.now, SimTime::ZERO);
        assert_eq!(clock.ticks, 0);
    }

    #[test]
    fn advance_applies_acceleration() {
        let t0 = Instant::now();
        let mut clock = SimClock::new(20.0);
        clock.advance(t0);
        // 3 real seconds at ×20 = 60 simulated seconds = 1 minute.
        let step = clock.advance(t0 + Duration::from_secs(3)).unwrap();
        assert!((step.delta_minutes - 1.0).abs() < 1e-9);
        assert!(!step.clamped);
        assert!((clock.now.minutes() - 1.0).abs() < 1e-9);
        assert_eq!(clock.ticks, 1);
    }

    #[test]
    fn backwards_wall_clock_is_clamped() {
        let t0 = Instant::now() + Duration::from_secs(10);
        let mut clock = SimClock::new(60.0);
        clock.advance(t0);
        let step = clock.advance(t0 - Duration::from_secs(5)).unwrap();
        assert_eq!(step.delta_minutes, 0.0);
        assert!(step.clamped);
        assert_eq!(clock.now, SimTime::ZERO);

        // Reference stayed at t0: one second past it is one minute at ×60.
        let step = clock.advance(t0 + Duration::from_secs(1)).unwrap();
        assert!((step.delta_minutes - 1.0).abs() < 1e-9);
    }

    #[test]
    fn reset_unprimes() {
        let t0 = Instant::now();
        let mut clock = SimClock::new(60.0);
        clock.advance(t0);
        clock.advance(t0 + Duration::from_secs(30));
        clock.reset();
        assert!(!clock.is_primed());
        assert_eq!(clock.now, SimTime::ZERO);
        assert_eq!(clock.ticks, 0);
    }

    #[test]
    fn elapsed_hms() {
        let mut clock = SimClock::new(1.0);
        clock.now = SimTime(61.5);
        assert_eq!(clock.elapsed_hms(), (1, 1, 30));
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            let a: f64 = r1.random();
            let b: f64 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn children_differ_by_offset() {
        let mut root_a = SimRng::new(7);
        let mut root_b = SimRng::new(7);
        let mut a = root_a.child(1);
        let mut b = root_b.child(2);
        let x: u64 = a.random();
        let y: u64 = b.random();
        assert_ne!(x, y);
    }

    #[test]
    fn gen_range_in_bounds() {
        let mut rng = SimRng::new(0);
        for _ in 0..1000 {
            let v = rng.gen_range(0.8..=1.2);
            assert!((0.8..=1.2).contains(&v));
        }
    }

    #[test]
    fn gen_bool_extremes_and_clamping() {
        let mut rng = SimRng::new(0);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
        assert!(rng.gen_bool(3.0));
        assert!(!rng.gen_bool(-1.0));
    }
}

#[cfg(test)]
mod category {
    use crate::{CategoryId, CategorySpec, CategoryTable, CoreError};

    fn specs() -> Vec<CategorySpec> {
        vec![
            CategorySpec::new("standard_post", 2.0),
            CategorySpec::new("passports", 5.0),
            CategorySpec::new("parcels", 3.0),
        ]
    }

    #[test]
    fn lookup_follows_configuration_order() {
        let table = CategoryTable::new(&specs(), &[]).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.lookup("passports"), Some(CategoryId(1)));
        assert_eq!(table.lookup("lottery"), None);
        assert_eq!(table.name(CategoryId(2)), "parcels");
        assert_eq!(table.service_minutes(CategoryId(0)), 2.0);
    }

    #[test]
    fn precedence_lists_unranked_categories_last() {
        let table = CategoryTable::new(&specs(), &["parcels".into()]).unwrap();
        assert_eq!(table.precedence(), &[CategoryId(2), CategoryId(0), CategoryId(1)]);
    }

    #[test]
    fn empty_priority_uses_stock_ranking_for_present_categories() {
        let table = CategoryTable::new(&specs(), &[]).unwrap();
        assert_eq!(table.precedence(), &[CategoryId(1), CategoryId(2), CategoryId(0)]);

        let custom = [
            CategorySpec::new("money_orders", 4.0),
            CategorySpec::new("parcels", 3.0),
            CategorySpec::new("bills", 1.0),
        ];
        let table = CategoryTable::new(&custom, &[]).unwrap();
        assert_eq!(table.precedence(), &[CategoryId(1), CategoryId(0), CategoryId(2)]);
    }

    #[test]
    fn unknown_priority_entry_rejected() {
        let err = CategoryTable::new(&specs(), &["lottery".into()]).unwrap_err();
        assert!(matches!(err, CoreError::UnknownCategory(name) if name == "lottery"));
    }

    #[test]
    fn duplicate_and_non_positive_rejected() {
        let mut dup = specs();
        dup.push(CategorySpec::new("parcels", 1.0));
        assert!(CategoryTable::new(&dup, &[]).is_err());

        let mut zero = specs();
        zero[0].service_minutes = 0.0;
        assert!(CategoryTable::new(&zero, &[]).is_err());

        assert!(CategoryTable::new(&[], &[]).is_err());
    }

    #[test]
    fn resolve_reports_unknown_name() {
        let table = CategoryTable::new(&specs(), &[]).unwrap();
        assert!(matches!(table.resolve("stamps"), Err(CoreError::UnknownCategory(_))));
    }
}

#[cfg(test)]
mod config {
    use crate::{CategoryId, CategorySpec, CoreError, DispatchPolicy, SimConfig};

    fn custom_categories() -> Vec<CategorySpec> {
        vec![CategorySpec::new("money_orders", 4.0), CategorySpec::new("bills", 1.5)]
    }

    #[test]
    fn default_is_stock_post_office() {
        let cfg = SimConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.servers, 5);
        assert_eq!(cfg.booths, 4);
        assert_eq!(cfg.service_minutes("passports"), Some(5.0));
        let table = cfg.category_table().unwrap();
        // passports > parcels > standard_post
        assert_eq!(table.precedence(), &[CategoryId(1), CategoryId(2), CategoryId(0)]);
    }

    #[test]
    fn rejects_zero_counts_and_bad_acceleration() {
        let mut cfg = SimConfig { servers: 0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
        cfg.servers = 1;
        cfg.booths = 0;
        assert!(cfg.validate().is_err());
        cfg.booths = 1;
        cfg.acceleration = 0.0;
        assert!(cfg.validate().is_err());
        cfg.acceleration = f64::NAN;
        assert!(cfg.validate().is_err());
        cfg.acceleration = 1.0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn custom_categories_need_no_priority_list() {
        let cfg = SimConfig {
            categories: custom_categories(),
            policy: DispatchPolicy::PriorityOrder,
            ..SimConfig::default()
        };
        cfg.validate().unwrap();
        let table = cfg.category_table().unwrap();
        assert_eq!(table.precedence(), &[CategoryId(0), CategoryId(1)]);
    }

    #[test]
    fn explicit_unknown_priority_still_rejected() {
        let cfg = SimConfig {
            categories: custom_categories(),
            priority: vec!["bills".into(), "passports".into()],
            ..SimConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(CoreError::UnknownCategory(name)) if name == "passports"));
    }

    #[test]
    fn set_service_minutes() {
        let mut cfg = SimConfig::default();
        cfg.set_service_minutes("parcels", 4.5).unwrap();
        assert_eq!(cfg.service_minutes("parcels"), Some(4.5));
        assert!(cfg.set_service_minutes("stamps", 1.0).is_err());
    }

    #[test]
    fn policy_names_round_trip_through_from_str() {
        for policy in DispatchPolicy::ALL {
            assert_eq!(policy.as_str().parse::<DispatchPolicy>().unwrap(), policy);
        }
        assert!("fastest_first".parse::<DispatchPolicy>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_partial_config_uses_defaults() {
        let json = r#"{ "servers": 3, "policy": "round_robin", "abandonment_enabled": false }"#;
        let cfg = SimConfig::from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(cfg.servers, 3);
        assert_eq!(cfg.booths, 4);
        assert_eq!(cfg.policy, DispatchPolicy::RoundRobin);
        assert!(!cfg.abandonment_enabled);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_custom_categories_without_priority() {
        let json = r#"{
            "policy": "priority_order",
            "categories": [
                { "name": "money_orders", "service_minutes": 4.0 },
                { "name": "bills",        "service_minutes": 1.5 }
            ]
        }"#;
        let cfg = SimConfig::from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(cfg.categories, custom_categories());
        assert!(cfg.priority.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_invalid_config_rejected() {
        let json = r#"{ "booths": 0 }"#;
        assert!(SimConfig::from_json_reader(json.as_bytes()).is_err());
    }
}
