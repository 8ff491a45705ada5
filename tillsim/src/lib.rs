//! # tillsim - store checkout simulation
//!
//! A deterministic, seeded discrete-event simulation of shoppers queueing
//! for a cashier or a self-checkout terminal.
//!
//! ## Crates
//!
//! - [`core`]: the simulation kernel (clock, scheduler, processes, random variates)
//! - [`components`]: resource pools and configuration validation
//! - [`store`]: the store model, its configuration and run entry points
//!
//! ## Examples
//!
//! ```rust
//! use tillsim::prelude::*;
//!
//! let config = StoreConfig::default().with_seed(3);
//! let output = run_simulation(&config).unwrap();
//! println!("{} customers checked out", output.records.len());
//! ```
//!
//! See `examples/store_day.rs` for a full day and an arrival-rate sweep.

pub use till_components as components;
pub use till_core as core;
pub use till_store as store;

// Convenience re-exports of commonly used items
pub mod prelude {
    //! Commonly used types and traits

    pub use till_core::{
        init_simulation_logging, init_simulation_logging_with_level, Execute, Executor, SimError,
        SimTime, Simulation,
    };

    pub use till_components::{ResourcePool, Validate, ValidationError};

    pub use till_store::{
        build_simulation, finish, run_simulation, sweep_arrival_rates, ArrivalMode, CheckoutConfig,
        CheckoutType, DurationParams, HorizonPolicy, RunOutput, RunReport, StoreConfig,
        StoreError, SweepRun, TransactionRecord,
    };
}
