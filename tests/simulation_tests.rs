#[cfg(test)]
mod tests {
    use reserve_engine::chart::{self, ChartModel, GaugeTone, ReserveGauge};
    use reserve_engine::{LoopState, ReserveSimulation, SimParams, SimulationError, ToggleOutcome};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn sim_at(reserve: Decimal) -> ReserveSimulation {
        ReserveSimulation::with_params(SimParams::with_initial_reserve(reserve))
    }

    // ========== Reserve Dynamics ==========

    #[test]
    fn test_idle_minute_refills_by_net_baseline() {
        let mut sim = sim_at(dec!(50));
        sim.tick_core().unwrap();
        assert_eq!(sim.reserve_level().value(), dec!(50.05));
        assert_eq!(sim.reserve_level().to_string(), "50.1%");
        assert!((sim.reserve() - 50.05).abs() < 1e-9);
    }

    #[test]
    fn test_full_reserve_stays_clamped_when_idle() {
        let mut sim = ReserveSimulation::default();
        for _ in 0..100 {
            sim.tick_core().unwrap();
        }
        assert_eq!(sim.reserve_level().value(), dec!(100));
    }

    #[test]
    fn test_amphetamine_drains_to_zero_and_clamps() {
        let mut sim = sim_at(dec!(1));
        assert!(matches!(
            sim.toggle_core("amphetamine", true).unwrap(),
            ToggleOutcome::Activated { .. }
        ));

        let first = sim.tick_core().unwrap();
        assert!((first.consumption - 0.55).abs() < 1e-12);
        assert!((first.delta + 0.45).abs() < 1e-12);
        assert_eq!(sim.reserve_level().value(), dec!(0.55));

        sim.tick_core().unwrap();
        assert_eq!(sim.reserve_level().value(), dec!(0.10));

        let third = sim.tick_core().unwrap();
        assert_eq!(sim.reserve_level().value(), dec!(0));
        assert_eq!(third.reserve_percent, 0.0);
        assert!(third.exhausted);

        for _ in 0..50 {
            let r = sim.tick_core().unwrap();
            assert_eq!(r.reserve_percent, 0.0);
        }
    }

    #[test]
    fn test_stacked_activities_sum_their_factors() {
        let mut sim = ReserveSimulation::default();
        sim.toggle_core("coffee", true).unwrap();
        sim.toggle_core("sugar", true).unwrap();
        let result = sim.tick_core().unwrap();
        // 0.05 + 0.05 * 1.5 + 0.05 * 2.5
        assert!((result.consumption - 0.25).abs() < 1e-12);
        assert_eq!(result.active_activities, vec!["coffee", "sugar"]);
    }

    #[test]
    fn test_oversized_baseline_clamps_instead_of_overflowing() {
        let params = SimParams {
            baseline_consumption: Decimal::MAX / dec!(2),
            ..SimParams::default()
        };
        let mut sim = ReserveSimulation::with_params(params);
        sim.toggle_core("amphetamine", true).unwrap();
        let result = sim.tick_core().unwrap();
        assert_eq!(sim.reserve_level().value(), dec!(0));
        assert!(result.exhausted);
    }

    // ========== Rolling Buffer ==========

    #[test]
    fn test_buffer_starts_full_with_baseline_history() {
        let sim = ReserveSimulation::default();
        let buffer = sim.buffer();
        assert_eq!(buffer.len(), 2_880);
        assert_eq!(buffer.oldest().unwrap().sequence_index, 0);
        assert_eq!(buffer.latest().unwrap().sequence_index, 2_879);
        assert!(buffer
            .iter()
            .all(|s| s.reserve_percent == 100.0 && (s.consumption - 0.05).abs() < 1e-12));
        assert_eq!(buffer.oldest().unwrap().clock_label, "08:00");
    }

    #[test]
    fn test_buffer_evicts_oldest_at_capacity() {
        let mut sim = ReserveSimulation::default();
        for _ in 0..100 {
            sim.tick_core().unwrap();
        }
        let k = sim.buffer().oldest().unwrap().sequence_index;
        assert_eq!(k, 100);

        let result = sim.tick_core().unwrap();
        assert_eq!(result.sequence_index, k + 2_880);
        assert_eq!(result.buffer_len, 2_880);
        assert_eq!(sim.buffer().oldest().unwrap().sequence_index, k + 1);
    }

    #[test]
    fn test_sequence_indices_strictly_increase() {
        let mut sim = ReserveSimulation::default();
        sim.run_batch(200);
        let indices: Vec<u64> = sim.buffer().iter().map(|s| s.sequence_index).collect();
        assert!(indices.windows(2).all(|w| w[1] == w[0] + 1));
    }

    // ========== Toggle Semantics ==========

    #[test]
    fn test_toggle_round_trip() {
        let mut sim = ReserveSimulation::default();
        let first = sim.toggle_core("coffee", true).unwrap();
        assert_eq!(first, ToggleOutcome::Activated { generation: 1, expires_at_ms: 120_000 });
        assert_eq!(sim.pending_deactivations().len(), 1);

        assert_eq!(sim.toggle_core("coffee", false).unwrap(), ToggleOutcome::Deactivated);
        assert!(sim.pending_deactivations().is_empty());
        assert_eq!(sim.toggle_core("coffee", false).unwrap(), ToggleOutcome::AlreadyInactive);

        let second = sim.toggle_core("coffee", true).unwrap();
        assert!(matches!(second, ToggleOutcome::Activated { generation: 2, .. }));
        assert_eq!(sim.pending_deactivations().len(), 1);
    }

    #[test]
    fn test_repeat_activation_keeps_deadline() {
        let mut sim = ReserveSimulation::default();
        sim.toggle_core("sugar", true).unwrap();
        sim.advance_clock_core(10_000);
        assert_eq!(sim.toggle_core("sugar", true).unwrap(), ToggleOutcome::AlreadyActive);
        assert_eq!(sim.active().get("sugar").unwrap().expires_at_ms, 45_000);
        assert_eq!(sim.pending_deactivations().len(), 1);
    }

    #[test]
    fn test_old_auto_off_does_not_end_new_activation() {
        let mut sim = ReserveSimulation::default();
        sim.toggle_core("nicotine", true).unwrap();
        sim.advance_clock_core(10_000);
        sim.toggle_core("nicotine", false).unwrap();
        sim.toggle_core("nicotine", true).unwrap();

        // First activation's deadline passes without effect.
        assert!(sim.advance_clock_core(30_000).is_empty());
        assert!(sim.active().contains("nicotine"));

        let fired = sim.advance_clock_core(40_000);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].generation, 2);
        assert!(!sim.active().contains("nicotine"));
        assert_eq!(sim.stats().stale_expiries, 0);
    }

    #[test]
    fn test_exhausted_reserve_refuses_but_allows_switch_off() {
        let mut sim = sim_at(dec!(1));
        sim.toggle_core("alcohol", true).unwrap();
        for _ in 0..5 {
            sim.tick_core().unwrap();
        }
        assert_eq!(sim.toggle_core("coffee", true).unwrap(), ToggleOutcome::Refused);
        assert_eq!(sim.toggle_core("alcohol", true).unwrap(), ToggleOutcome::AlreadyActive);
        assert_eq!(sim.toggle_core("alcohol", false).unwrap(), ToggleOutcome::Deactivated);
        assert_eq!(sim.stats().refusals, 1);
    }

    #[test]
    fn test_reserve_exactly_at_threshold_may_activate() {
        let mut sim = sim_at(dec!(1));
        assert!(matches!(sim.toggle_core("coffee", true).unwrap(), ToggleOutcome::Activated { .. }));
    }

    #[test]
    fn test_unknown_activity_rejected() {
        let mut sim = ReserveSimulation::default();
        let err = sim.toggle_core("jogging", true).unwrap_err();
        assert_eq!(err.to_string(), "unknown activity: jogging");
        assert!(sim.active().is_empty());
    }

    #[test]
    fn test_auto_off_through_stepping() {
        let mut sim = ReserveSimulation::default();
        sim.toggle_core("social_media", true).unwrap();
        let mut active_ticks = 0;
        for _ in 0..120 {
            let (result, _) = sim.step().unwrap();
            if result.active_activities.contains(&"social_media") {
                active_ticks += 1;
            }
        }
        // Deadline at 60s: the 60th step fires it before ticking.
        assert_eq!(active_ticks, 59);
        assert_eq!(sim.stats().expiries, 1);
    }

    // ========== Lifecycle ==========

    #[test]
    fn test_dispose_stops_everything() {
        let mut sim = ReserveSimulation::default();
        sim.toggle_core("video_games", true).unwrap();
        sim.dispose();

        assert!(!sim.is_running());
        assert_eq!(sim.loop_state(), LoopState::Stopped);
        assert!(sim.pending_deactivations().is_empty());
        assert_eq!(sim.tick_core().unwrap_err(), SimulationError::Disposed);
        assert_eq!(sim.toggle_core("coffee", true).unwrap_err(), SimulationError::Disposed);
        assert!(sim.advance_clock_core(1_000_000).is_empty());
        assert!(sim.step().is_err());

        // Second dispose is harmless.
        sim.dispose();
        assert_eq!(sim.loop_state(), LoopState::Stopped);
    }

    #[test]
    fn test_run_batch_after_dispose_is_noop() {
        let mut sim = ReserveSimulation::default();
        sim.dispose();
        let before = sim.buffer().latest().unwrap().sequence_index;
        sim.run_batch(10);
        assert_eq!(sim.buffer().latest().unwrap().sequence_index, before);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut sim = sim_at(dec!(30));
        sim.toggle_core("coffee", true).unwrap();
        sim.run_batch(20);
        sim.dispose();

        sim.reset();
        assert!(sim.is_running());
        assert_eq!(sim.reserve_level().value(), dec!(30));
        assert!(sim.active().is_empty());
        assert_eq!(sim.clock(), 0);
        assert_eq!(sim.stats().ticks, 0);
        assert_eq!(sim.buffer().latest().unwrap().sequence_index, 2_879);
    }

    #[test]
    fn test_run_batch_advances_clock_and_index() {
        let mut sim = ReserveSimulation::default();
        sim.run_batch(60);
        assert_eq!(sim.clock(), 60 * sim.tick_period_ms() as u64);
        assert_eq!(sim.buffer().latest().unwrap().sequence_index, 2_939);
        assert_eq!(sim.stats().ticks, 60);
    }

    // ========== Presentation Views ==========

    #[test]
    fn test_chart_marks_midnights() {
        let sim = ReserveSimulation::default();
        let model = ChartModel::from_buffer(sim.buffer());
        assert_eq!(model.points.len(), 2_880);
        assert_eq!(model.x_range(), Some((0, 2_879)));
        let marks: Vec<(u64, &str)> =
            model.midnights.iter().map(|m| (m.x, m.label.as_str())).collect();
        assert_eq!(marks, vec![(960, "Day 1"), (2_400, "Day 2")]);
    }

    #[test]
    fn test_gauge_tones() {
        assert_eq!(ReserveGauge::from_simulation(&ReserveSimulation::default()).tone, GaugeTone::Healthy);
        assert_eq!(ReserveGauge::from_simulation(&sim_at(dec!(10))).tone, GaugeTone::Low);

        let gauge = ReserveGauge::from_simulation(&sim_at(dec!(0.4)));
        assert_eq!(gauge.tone, GaugeTone::Exhausted);
        assert!(gauge.exhausted);
        assert_eq!(gauge.text, "0.4%");
    }

    #[test]
    fn test_controls_follow_reserve_and_activations() {
        let mut sim = sim_at(dec!(1));
        sim.toggle_core("coffee", true).unwrap();
        sim.advance_clock_core(500);

        let views = chart::controls(&sim);
        assert_eq!(views.len(), 7);
        let coffee = views.iter().find(|c| c.id == "coffee").unwrap();
        assert!(coffee.active);
        assert_eq!(coffee.remaining_secs, 120);

        for _ in 0..10 {
            sim.tick_core().unwrap();
        }
        let views = chart::controls(&sim);
        for view in &views {
            assert_eq!(view.enabled, view.id == "coffee", "{}", view.id);
        }
    }
}
