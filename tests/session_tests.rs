#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use matrix_workbench::clock::ManualClock;
    use matrix_workbench::correlation::compute_correlation_matrix;
    use matrix_workbench::matrix::MatrixStore;
    use matrix_workbench::projection::compute_future_value;
    use matrix_workbench::statistics::compute_basic;
    use matrix_workbench::*;

    const EPS: f64 = 1e-9;

    fn session_at(start_ms: u64) -> (AnalysisSession, ManualClock) {
        let clock = ManualClock::new(start_ms);
        let session = AnalysisSession::with_clock(WorkbenchConfig::default(), clock.clone());
        (session, clock)
    }

    /// Records every notification in order for assertions.
    #[derive(Clone, Default)]
    struct Recorder {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl SessionObserver for Recorder {
        fn on_matrix_changed(&mut self, snapshot: &StatsSnapshot) {
            self.log.borrow_mut().push(format!("matrix:{}", snapshot.basic.count));
        }
        fn on_change_logged(&mut self, event: &ChangeEvent) {
            self.log.borrow_mut().push(format!("change:{}", event.id));
        }
        fn on_threshold_evaluated(&mut self, state: ThresholdState) {
            self.log.borrow_mut().push(format!("threshold:{:?}", state));
        }
    }

    // ========== Reference Scenarios ==========

    #[test]
    fn test_two_by_two_basic_stats() {
        let (mut session, _) = session_at(0);
        session.set_cell(0, 0, 10.0).unwrap();
        session.set_cell(0, 1, 15.0).unwrap();
        session.set_cell(1, 0, 12.0).unwrap();
        session.set_cell(1, 1, 18.0).unwrap();

        let snap = session.current_snapshot().unwrap();
        assert!((snap.basic.mean - 13.75).abs() < EPS);
        assert!((snap.basic.variance - 9.1875).abs() < EPS);
        assert_eq!(snap.basic.count, 4);
    }

    #[test]
    fn test_reference_future_value() {
        let p = compute_future_value(1000.0, 0.07, 10, 0.0);
        assert!((p.adjusted_rate - 0.07).abs() < EPS);
        assert!((p.future_value - 1967.15).abs() < 0.01);
        assert!((p.compound_growth.unwrap() - 96.715).abs() < 0.001);
    }

    #[test]
    fn test_doubled_column_correlates_perfectly() {
        let mut m = MatrixStore::new();
        m.load(&[vec![3.0, 6.0], vec![1.0, 2.0], vec![4.0, 8.0], vec![9.0, 18.0]])
            .unwrap();
        let c = compute_correlation_matrix(&m).unwrap();
        assert!((c.get(0, 1).unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_threshold_below_when_weakly_correlated() {
        let (mut session, _) = session_at(0);
        // r = 1/sqrt(10), about 0.32.
        for (r, (a, b)) in [(1.0, 1.0), (2.0, 3.0), (3.0, 2.0), (4.0, 2.0)]
            .iter()
            .enumerate()
        {
            session.set_cell(r, 0, *a).unwrap();
            session.set_cell(r, 1, *b).unwrap();
        }
        let snap = session.current_snapshot().unwrap();
        let r = snap.correlation.as_ref().unwrap().get(0, 1).unwrap();
        assert!(r < 0.9, "expected weak correlation, got {}", r);
        assert_eq!(session.check_threshold(0.9), ThresholdState::Below);
        assert_eq!(session.last_threshold(), Some(ThresholdState::Below));
    }

    #[test]
    fn test_resize_boundaries() {
        let (mut session, _) = session_at(0);
        assert_eq!(
            session.generate(1, 4),
            Err(WorkbenchError::InvalidDimensions { rows: 1, cols: 4 })
        );
        assert!(session.generate(10, 8).is_ok());
        assert!(session.generate(11, 4).is_err());
        assert_eq!(session.current_matrix().rows(), 10);
        assert_eq!(session.current_matrix().cols(), 8);
    }

    // ========== Snapshot Semantics ==========

    #[test]
    fn test_recompute_idempotent() {
        let (mut session, clock) = session_at(0);
        session.generate(6, 5).unwrap();
        let first = session.current_snapshot().unwrap();
        clock.advance(1_000);
        assert_eq!(session.recompute(), RecomputeOutcome::Published);
        let second = session.current_snapshot().unwrap();
        assert!(first.same_values(&second));
        assert_ne!(first.last_updated, second.last_updated);
    }

    #[test]
    fn test_old_snapshot_untouched_by_new_one() {
        let (mut session, _) = session_at(0);
        session.load_sample().unwrap();
        let held = session.current_snapshot().unwrap();
        let mean_before = held.basic.mean;
        session.set_cell(0, 0, 1000.0).unwrap();
        assert_eq!(held.basic.mean, mean_before);
        assert!(session.current_snapshot().unwrap().basic.mean > mean_before);
    }

    #[test]
    fn test_ragged_edit_excludes_absent_cells() {
        let (mut session, _) = session_at(0);
        session.load_sample().unwrap();
        // Row 9 did not exist; only the written cell joins the aggregate.
        session.set_cell(9, 2, 100.0).unwrap();
        let snap = session.current_snapshot().unwrap();
        assert_eq!(snap.basic.count, 33);
        assert_eq!(session.current_matrix().rows(), 8);
        assert_eq!(session.current_matrix().row_count(), 10);
        // Column 2 now has 9 values, others 8: those pairs are undefined.
        let c = snap.correlation.as_ref().unwrap();
        assert_eq!(c.get(0, 2), Some(0.0));
        assert_eq!(c.get(2, 3), Some(0.0));
        assert!(c.get(0, 1).unwrap() > 0.5);
    }

    #[test]
    fn test_correlation_symmetric() {
        let (mut session, _) = session_at(0);
        session.generate(10, 8).unwrap();
        let snap = session.current_snapshot().unwrap();
        let c = snap.correlation.as_ref().unwrap();
        for i in 0..c.size() {
            assert_eq!(c.get(i, i), Some(1.0));
            for j in 0..c.size() {
                assert!((c.get(i, j).unwrap() - c.get(j, i).unwrap()).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_snapshot_matches_pure_engines() {
        let (mut session, _) = session_at(0);
        session.load_sample().unwrap();
        let snap = session.current_snapshot().unwrap();
        let basic = compute_basic(session.current_matrix().snapshot_flat()).unwrap();
        assert_eq!(snap.basic, basic);
        let fv = snap.future_value.as_ref().unwrap();
        assert_eq!(fv.present_value, basic.mean);
        assert!((fv.adjusted_rate - (0.07 + basic.variance / 10_000.0)).abs() < EPS);
    }

    // ========== Observer Wiring ==========

    #[test]
    fn test_observer_order() {
        let (mut session, _) = session_at(0);
        let recorder = Recorder::default();
        session.subscribe(recorder.clone());
        session.load_sample().unwrap();
        session.set_correlation_threshold(0.95);
        let log = recorder.log.borrow();
        assert_eq!(log[0], "change:1");
        assert_eq!(log[1], "matrix:32");
        assert!(log[2].starts_with("threshold:"));
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_no_matrix_notification_on_insufficient_data() {
        let (mut session, _) = session_at(0);
        let recorder = Recorder::default();
        session.subscribe(recorder.clone());
        assert_eq!(session.recompute(), RecomputeOutcome::InsufficientData);
        session.set_periods(12);
        assert!(recorder.log.borrow().is_empty());
        assert_eq!(session.financial().periods, 12);
    }

    // ========== Change Log ==========

    #[test]
    fn test_history_bounded_at_fifty() {
        let (mut session, _) = session_at(0);
        session.load_sample().unwrap();
        for i in 0..60 {
            session.set_cell(0, 0, i as f64).unwrap();
        }
        assert_eq!(session.change_count(), 50);
        let ids: Vec<u64> = session.history().iter().map(|e| e.id).collect();
        assert_eq!(ids.first(), Some(&12));
        assert_eq!(ids.last(), Some(&61));
        let recent: Vec<u64> = session.recent(5).iter().map(|e| e.id).collect();
        assert_eq!(recent, vec![61, 60, 59, 58, 57]);
    }

    // ========== Time Analysis ==========

    #[test]
    fn test_ticker_recomputes_every_fifth_tick() {
        let (mut session, clock) = session_at(10_000);
        let queue = EventQueue::new();
        session.subscribe(queue.clone());
        session.load_sample().unwrap();
        assert!(session.start_analysis());
        queue.drain();

        clock.advance(4_000);
        assert_eq!(session.pump(), 4);
        let events = queue.drain();
        assert!(events.iter().all(|e| matches!(e, SessionEvent::Tick(_))));
        assert_eq!(events.len(), 4);

        clock.advance(1_000);
        assert_eq!(session.pump(), 1);
        let events = queue.drain();
        assert!(matches!(events[0], SessionEvent::Tick(t) if t.index == 5));
        assert!(matches!(events[1], SessionEvent::MatrixChanged(_)));
        assert!(matches!(events[2], SessionEvent::ThresholdEvaluated(ThresholdState::Met)));
        assert_eq!(session.elapsed().unwrap().to_string(), "00:00:05");
    }

    #[test]
    fn test_pump_idle_is_noop() {
        let (mut session, clock) = session_at(0);
        clock.advance(60_000);
        assert_eq!(session.pump(), 0);
        assert_eq!(session.analysis_state(), AnalysisState::Idle);
        assert!(session.next_tick_in_ms().is_none());
    }

    #[test]
    fn test_cancel_handle_stops_ticks() {
        let (mut session, clock) = session_at(0);
        session.load_sample().unwrap();
        session.start_analysis();
        let handle = session.analysis_handle().unwrap();
        clock.advance(2_000);
        assert_eq!(session.pump(), 2);

        handle.cancel();
        assert_eq!(session.analysis_state(), AnalysisState::Idle);
        clock.advance(10_000);
        assert_eq!(session.pump(), 0);
        let last = session.recent(1)[0];
        assert_eq!(last.action, ChangeAction::AnalysisStopped);
        assert_eq!(last.details["duration"], 12_000);
        // Already retired.
        assert!(!session.stop_analysis());
        assert!(session.start_analysis());
    }

    #[test]
    fn test_next_tick_countdown() {
        let (mut session, clock) = session_at(0);
        session.start_analysis();
        clock.advance(300);
        assert_eq!(session.next_tick_in_ms(), Some(700));
    }

    // ========== Summary & Export ==========

    #[test]
    fn test_summary_and_export() {
        let (mut session, clock) = session_at(5_000);
        session.load_sample().unwrap();
        session.set_present_value(Some(1000.0));
        session.set_base_rate(0.07);
        clock.advance(1);

        let summary = session.summary();
        assert_eq!(summary.total_changes, 1);
        assert_eq!(summary.last_updated, Some(5_000));
        let pct = summary.correlation_strength_pct.unwrap();
        assert!(pct > rust_decimal::Decimal::from(50) && pct <= rust_decimal::Decimal::from(100));

        let doc = session.export_document();
        assert_eq!(doc.timestamp, 5_001);
        assert_eq!(doc.matrix.len(), 8);
        assert_eq!(doc.change_history.len(), 1);
        assert!(doc.current_stats.is_some());
    }
}
