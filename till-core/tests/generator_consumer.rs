//! Integration test demonstrating a generator-consumer pattern
//!
//! A generator spawns a new consumer every second. Each consumer says hello
//! twice, half a second apart, and then terminates.

use till_core::{
    Context, Execute, Executor, Process, ProcessId, ProcessStatus, SimError, SimTime, Simulation,
};

#[derive(Debug, Default)]
struct SimulationLog {
    generated: Vec<SimTime>,
    hellos: Vec<(ProcessId, SimTime)>,
}

enum Actor {
    Generator { produced: usize, max: usize },
    Consumer { hellos: usize },
}

#[derive(Debug)]
enum Signal {
    Tick,
    Hello,
}

impl Process for Actor {
    type Event = Signal;
    type World = SimulationLog;

    fn resume(
        &mut self,
        self_id: ProcessId,
        event: Signal,
        ctx: &mut Context<'_, Self>,
    ) -> Result<ProcessStatus, SimError> {
        let now = ctx.now();
        match (self, event) {
            (Actor::Generator { produced, max }, Signal::Tick) => {
                ctx.world().generated.push(now);
                let consumer = ctx.spawn(Actor::Consumer { hellos: 0 });
                ctx.schedule_now(consumer, Signal::Hello);
                *produced += 1;
                if *produced < *max {
                    ctx.sleep(self_id, SimTime::from_secs(1), Signal::Tick);
                    Ok(ProcessStatus::Suspended)
                } else {
                    Ok(ProcessStatus::Terminated)
                }
            }
            (Actor::Consumer { hellos }, Signal::Hello) => {
                ctx.world().hellos.push((self_id, now));
                *hellos += 1;
                if *hellos < 2 {
                    ctx.sleep(self_id, SimTime::from_millis(500), Signal::Hello);
                    Ok(ProcessStatus::Suspended)
                } else {
                    Ok(ProcessStatus::Terminated)
                }
            }
            (_, event) => Err(SimError::UnexpectedEvent {
                id: self_id,
                state: "mismatched actor".to_string(),
                event: format!("{event:?}"),
            }),
        }
    }
}

#[test]
fn test_generator_consumer_pattern() {
    let mut sim = Simulation::new(SimulationLog::default());
    let generator = sim.spawn(Actor::Generator { produced: 0, max: 5 });
    sim.schedule(SimTime::from_secs(1), generator, Signal::Tick);

    Executor::timed(SimTime::from_secs(10))
        .execute(&mut sim)
        .unwrap();

    let log = sim.world();
    let expected: Vec<SimTime> = (1..=5).map(SimTime::from_secs).collect();
    assert_eq!(log.generated, expected);
    assert_eq!(log.hellos.len(), 10);

    // Consumer for the i-th tick says hello at i and i + 0.5.
    for (i, consumer) in (1..=5).enumerate() {
        let times: Vec<SimTime> = log
            .hellos
            .iter()
            .filter(|(id, _)| *id == ProcessId(consumer))
            .map(|(_, t)| *t)
            .collect();
        let tick = SimTime::from_secs(i as u64 + 1);
        assert_eq!(times, vec![tick, tick + SimTime::from_millis(500)]);
    }

    assert_eq!(sim.processes().live(), 0);
    assert_eq!(sim.processes().spawned(), 6);
    assert_eq!(sim.time(), SimTime::from_millis(5_500));
}

#[test]
fn test_horizon_leaves_processes_suspended() {
    let mut sim = Simulation::new(SimulationLog::default());
    let generator = sim.spawn(Actor::Generator { produced: 0, max: 5 });
    sim.schedule(SimTime::from_secs(1), generator, Signal::Tick);

    Executor::timed(SimTime::from_secs(2))
        .execute(&mut sim)
        .unwrap();

    // Ticks at 1 and 2; the second consumer's follow-up hello is past the horizon.
    assert_eq!(sim.world().generated.len(), 2);
    assert_eq!(sim.world().hellos.len(), 3);
    let live: Vec<ProcessId> = sim.processes().iter_live().map(|(id, _)| id).collect();
    assert_eq!(live, vec![generator, ProcessId(2)]);
    assert_eq!(sim.peek_next_event_time(), Some(SimTime::from_millis(2_500)));
}

#[test]
fn test_mismatched_event_aborts_run() {
    let mut sim = Simulation::new(SimulationLog::default());
    let generator = sim.spawn(Actor::Generator { produced: 0, max: 5 });
    sim.schedule(SimTime::zero(), generator, Signal::Hello);

    let err = sim.execute(Executor::unbound()).unwrap_err();
    assert!(matches!(err, SimError::UnexpectedEvent { id, .. } if id == generator));
}
