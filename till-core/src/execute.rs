use crate::error::SimError;
use crate::process::Process;
use crate::{SimTime, Simulation};

/// Simulation execution trait.
pub trait Execute<P: Process> {
    /// Executes the simulation until some stopping condition is reached.
    /// The condition is implementation-specific.
    ///
    /// # Errors
    ///
    /// Stops at the first [`SimError`] raised while processing an event.
    fn execute(self, sim: &mut Simulation<P>) -> Result<(), SimError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndCondition {
    Time(SimTime),
    NoEvents,
    Steps(usize),
}

/// Executor is used for simple execution of an entire simulation.
///
/// See the crate level documentation for examples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Executor {
    end_condition: EndCondition,
}

impl Executor {
    /// Simulation will end only once there is no available events in the queue.
    #[must_use]
    pub fn unbound() -> Self {
        Self {
            end_condition: EndCondition::NoEvents,
        }
    }

    /// Processes every event due at or before `horizon`, then stops.
    ///
    /// Events due later stay in the queue and their processes stay suspended.
    #[must_use]
    pub fn timed(horizon: SimTime) -> Self {
        Self {
            end_condition: EndCondition::Time(horizon),
        }
    }

    /// Simulation will execute exactly this many steps, unless we run out of events.
    #[must_use]
    pub fn steps(steps: usize) -> Self {
        Self {
            end_condition: EndCondition::Steps(steps),
        }
    }

    /// Registers a side effect that is called _after_ each simulation step.
    #[must_use]
    pub fn side_effect<F>(self, func: F) -> ExecutorWithSideEffect<F> {
        ExecutorWithSideEffect {
            end_condition: self.end_condition,
            side_effect: func,
        }
    }
}

impl<P: Process> Execute<P> for Executor {
    fn execute(self, sim: &mut Simulation<P>) -> Result<(), SimError> {
        run_with(sim, self.end_condition, |_: &Simulation<P>| {})
    }
}

pub struct ExecutorWithSideEffect<F> {
    end_condition: EndCondition,
    side_effect: F,
}

impl<P, F> Execute<P> for ExecutorWithSideEffect<F>
where
    P: Process,
    F: FnMut(&Simulation<P>),
{
    fn execute(self, sim: &mut Simulation<P>) -> Result<(), SimError> {
        run_with(sim, self.end_condition, self.side_effect)
    }
}

fn run_with<P, F>(
    sim: &mut Simulation<P>,
    end_condition: EndCondition,
    mut side_effect: F,
) -> Result<(), SimError>
where
    P: Process,
    F: FnMut(&Simulation<P>),
{
    let mut step = |sim: &mut Simulation<P>| -> Result<bool, SimError> {
        let stepped = sim.step()?;
        if stepped {
            side_effect(sim);
        }
        Ok(stepped)
    };
    match end_condition {
        EndCondition::Time(horizon) => {
            while sim.peek_next_event_time().is_some_and(|t| t <= horizon) {
                step(sim)?;
            }
        }
        EndCondition::NoEvents => while step(sim)? {},
        EndCondition::Steps(steps) => {
            for _ in 0..steps {
                if !step(sim)? {
                    break;
                }
            }
        }
    }
    Ok(())
}
