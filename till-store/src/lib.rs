//! Store checkout model
//!
//! Customers arrive at a store, shop for a while, pick either the cashier
//! line or the self-checkout line, wait for a free server, get served and
//! leave. Each completed visit produces one [`TransactionRecord`].
//!
//! The model is built on the `till-core` kernel: the arrival generator and
//! every customer are processes, and the two checkouts are
//! [`till_components::ResourcePool`]s with FIFO wait lists.
//!
//! ```rust
//! use till_store::{run_simulation, StoreConfig};
//!
//! let output = run_simulation(&StoreConfig::default().with_seed(7)).unwrap();
//! assert!(output.records.iter().all(|r| r.completed_at <= 480.0));
//! ```

pub mod arrivals;
pub mod config;
pub mod customer;
pub mod error;
pub mod record;
pub mod runner;
pub mod store;

pub use arrivals::ArrivalGenerator;
pub use config::{
    ArrivalMode, CheckoutConfig, DurationParams, HorizonPolicy, StoreConfig, MAX_ARRIVAL_RATE,
    MAX_HORIZON,
};
pub use customer::{CustomerProcess, CustomerStage, CustomerState, InProgressCustomer};
pub use error::StoreError;
pub use record::{CheckoutType, CustomerId, RecordSink, TransactionRecord};
pub use runner::{
    build_simulation, finish, horizon, run_simulation, sweep_arrival_rates, PoolReport, RunOutput,
    RunReport, SweepRun,
};
pub use store::{Store, StoreCounters, StoreEvent, StoreProcess};
