//! Determinism guardrail tests
//!
//! These tests are intended to detect accidental introduction of
//! non-determinism in event execution order for identical simulations.

use till_core::{
    Context, Execute, Executor, Process, ProcessId, ProcessStatus, RandomVariateSource, SimError,
    SimTime, Simulation,
};

#[derive(Debug, Clone)]
enum LogEvent {
    Push(usize),
}

struct Logger;

impl Process for Logger {
    type Event = LogEvent;
    type World = Vec<usize>;

    fn resume(
        &mut self,
        _self_id: ProcessId,
        event: LogEvent,
        ctx: &mut Context<'_, Self>,
    ) -> Result<ProcessStatus, SimError> {
        match event {
            LogEvent::Push(value) => ctx.world().push(value),
        }
        Ok(ProcessStatus::Suspended)
    }
}

fn run_same_time_events(event_count: usize) -> Vec<usize> {
    let mut sim = Simulation::new(Vec::new());
    let id = sim.spawn(Logger);

    for i in 0..event_count {
        // Delay is relative to current time (t=0 here), so all events land at the same timestamp.
        sim.schedule(SimTime::zero(), id, LogEvent::Push(i));
    }

    Executor::timed(SimTime::from_millis(1))
        .execute(&mut sim)
        .unwrap();

    let result = sim.world().clone();
    assert_eq!(result.len(), event_count);
    result
}

#[test]
fn same_time_events_run_in_scheduling_order() {
    let baseline = run_same_time_events(200);
    assert_eq!(baseline, (0..200).collect::<Vec<_>>());

    for _ in 0..20 {
        assert_eq!(baseline, run_same_time_events(200));
    }
}

/// Sleeps for a random exponential gap, logging its wake-up times.
struct Jitter {
    remaining: usize,
}

#[derive(Debug)]
struct Wake;

struct JitterWorld {
    variates: RandomVariateSource,
    wakes: Vec<(ProcessId, SimTime)>,
}

impl Process for Jitter {
    type Event = Wake;
    type World = JitterWorld;

    fn resume(
        &mut self,
        self_id: ProcessId,
        _event: Wake,
        ctx: &mut Context<'_, Self>,
    ) -> Result<ProcessStatus, SimError> {
        let now = ctx.now();
        let world = ctx.world();
        world.wakes.push((self_id, now));
        if self.remaining == 0 {
            return Ok(ProcessStatus::Terminated);
        }
        self.remaining -= 1;
        let gap = world.variates.exponential(1.0)?;
        ctx.sleep(self_id, SimTime::saturating_from_secs_f64(gap), Wake);
        Ok(ProcessStatus::Suspended)
    }
}

fn run_jitter(seed: u64) -> Vec<(ProcessId, SimTime)> {
    let mut sim = Simulation::new(JitterWorld {
        variates: RandomVariateSource::new(seed),
        wakes: Vec::new(),
    });
    for _ in 0..5 {
        let id = sim.spawn(Jitter { remaining: 50 });
        sim.schedule(SimTime::zero(), id, Wake);
    }
    sim.execute(Executor::unbound()).unwrap();
    assert_eq!(sim.processes().live(), 0);
    let (world, _) = sim.into_parts();
    world.wakes
}

#[test]
fn seeded_runs_replay_exactly() {
    let baseline = run_jitter(17);
    assert_eq!(baseline.len(), 5 * 51);
    assert!(baseline.windows(2).all(|w| w[0].1 <= w[1].1));

    for _ in 0..10 {
        assert_eq!(baseline, run_jitter(17));
    }
    assert_ne!(baseline, run_jitter(18));
}
