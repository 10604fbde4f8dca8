// Session Driver — builds the matrix and runs the ticker to completion
// Simulated mode advances a manual clock; realtime mode sleeps between ticks

use matrix_workbench::clock::{Clock, ManualClock, SystemClock};
use matrix_workbench::ticker::Tick;
use matrix_workbench::*;

use std::time::Duration;

/// One `--edit row,col,value` request (0-based indices, raw value text).
#[derive(Debug, Clone, PartialEq)]
pub struct CellEdit {
    pub row: usize,
    pub col: usize,
    pub raw: String,
}

impl CellEdit {
    pub fn parse(spec: &str) -> Option<Self> {
        let mut parts = spec.splitn(3, ',');
        let row = parts.next()?.trim().parse().ok()?;
        let col = parts.next()?.trim().parse().ok()?;
        let raw = parts.next()?.to_string();
        Some(Self { row, col, raw })
    }
}

pub struct RunPlan {
    pub rows: usize,
    pub cols: usize,
    pub sample: bool,
    pub ticks: u64,
    pub realtime: bool,
    pub edits: Vec<CellEdit>,
}

// ─── Console View ───────────────────────────────────────────────────────────

/// Prints observer notifications as they arrive.
struct ConsoleView;

impl SessionObserver for ConsoleView {
    fn on_matrix_changed(&mut self, snapshot: &StatsSnapshot) {
        let b = &snapshot.basic;
        println!("  stats    mean {:>8.2}  var {:>8.2}  sd {:>6.2}  range {}-{}  n {}",
            b.mean, b.variance, b.std_dev, b.min, b.max, b.count);
    }

    fn on_change_logged(&mut self, event: &ChangeEvent) {
        println!("  change   #{:<3} {:<22} {}", event.id, event.action.label(), event.details);
    }

    fn on_threshold_evaluated(&mut self, state: ThresholdState) {
        let label = match state {
            ThresholdState::Met => "Threshold Met!",
            ThresholdState::Below => "Below Threshold",
        };
        println!("  check    {}", label);
    }

    fn on_tick(&mut self, tick: &Tick) {
        println!("  tick     {}", tick.elapsed);
    }
}

// ─── Run ────────────────────────────────────────────────────────────────────

pub fn run(config: WorkbenchConfig, plan: &RunPlan) -> Result<AnalysisSession> {
    if plan.realtime {
        let mut session = AnalysisSession::with_clock(config, SystemClock);
        prepare(&mut session, plan)?;
        session.start_analysis();
        let mut fired = 0;
        while fired < plan.ticks {
            let wait = session.next_tick_in_ms().unwrap_or(0);
            std::thread::sleep(Duration::from_millis(wait));
            fired += session.pump() as u64;
        }
        session.stop_analysis();
        Ok(session)
    } else {
        let clock = ManualClock::new(SystemClock.now_ms());
        let period = config.tick_period_ms;
        let mut session = AnalysisSession::with_clock(config, clock.clone());
        prepare(&mut session, plan)?;
        session.start_analysis();
        for _ in 0..plan.ticks {
            clock.advance(period);
            session.pump();
        }
        session.stop_analysis();
        Ok(session)
    }
}

fn prepare(session: &mut AnalysisSession, plan: &RunPlan) -> Result<()> {
    session.subscribe(ConsoleView);
    if plan.sample {
        session.load_sample()?;
    } else {
        session.generate(plan.rows, plan.cols)?;
    }
    for edit in &plan.edits {
        session.edit_cell(edit.row, edit.col, &edit.raw)?;
    }
    let threshold = session.correlation_threshold();
    session.check_threshold(threshold);
    Ok(())
}
