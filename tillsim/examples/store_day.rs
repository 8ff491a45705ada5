//! One default store day, then the same day at four arrival rates.
//!
//! ```bash
//! cargo run -p tillsim --example store_day
//! RUST_LOG=till_store=debug cargo run -p tillsim --example store_day
//! ```

use tillsim::prelude::*;
use tracing::info;

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn summarize(label: &str, output: &RunOutput) {
    println!("{label}");
    println!(
        "  arrived {:>4}  completed {:>4}  still in store {:>3}",
        output.report.customers_arrived, output.report.completed, output.report.in_progress
    );
    for checkout in [CheckoutType::Cashier, CheckoutType::SelfCheckout] {
        let waits = output
            .records
            .iter()
            .filter(|r| r.checkout == checkout)
            .map(|r| r.queue_wait_duration);
        let pool = output.report.pool(checkout);
        println!(
            "  {:<14} mean wait {:>7}  peak line {:>3}  utilization {:>5.1}%",
            checkout.to_string(),
            mean(waits).map_or_else(|| "-".to_string(), |w| format!("{w:.2}")),
            pool.peak_queue_len,
            pool.utilization * 100.0
        );
    }
}

fn main() -> Result<(), StoreError> {
    init_simulation_logging();

    let config = StoreConfig::default();
    info!(seed = config.seed, horizon = config.horizon, "Running default store day");
    let output = run_simulation(&config)?;
    summarize("Default day (one customer every 5 minutes)", &output);

    for record in output.records.iter().take(5) {
        println!(
            "    t={:>7.2}  shop {:>6.2}  wait {:>6.2}  service {:>6.2}  {}",
            record.completed_at,
            record.shopping_duration,
            record.queue_wait_duration,
            record.service_duration,
            record.checkout
        );
    }

    let rates = [1.0 / 10.0, 1.0 / 8.0, 1.0 / 6.0, 1.0 / 4.0];
    for run in sweep_arrival_rates(&config, &rates)? {
        summarize(
            &format!("One customer every {:.1} minutes", 1.0 / run.arrival_rate),
            &run.output,
        );
    }
    Ok(())
}
