//! Statistical and structural properties of full store runs

use till_core::{Execute, Executor, Simulation};
use till_store::{
    build_simulation, finish, horizon, run_simulation, sweep_arrival_rates, CheckoutConfig,
    CheckoutType, DurationParams, StoreConfig, StoreProcess, TransactionRecord, MAX_ARRIVAL_RATE,
};

const EPS: f64 = 1e-6;

/// Busier than the default day so that both lines build up queues.
fn rush_hour() -> StoreConfig {
    StoreConfig::default().with_arrival_rate(0.5)
}

#[test]
fn same_seed_same_output() {
    let config = rush_hour().with_seed(1234);
    let first = run_simulation(&config).unwrap();
    let second = run_simulation(&config).unwrap();
    assert!(!first.records.is_empty());
    assert_eq!(first, second);

    let other = run_simulation(&config.with_seed(1235)).unwrap();
    assert_ne!(first.records, other.records);
}

#[test]
fn pools_never_exceed_capacity() {
    let config = rush_hour();
    let mut sim = build_simulation(&config).unwrap();
    let mut steps = 0u64;
    Executor::timed(horizon(&config))
        .side_effect(|sim: &Simulation<StoreProcess>| {
            let store = sim.world();
            store.check_invariants().unwrap();
            for checkout in CheckoutType::ALL {
                let pool = store.pool(checkout);
                assert!(pool.in_service() <= pool.capacity());
            }
            steps += 1;
        })
        .execute(&mut sim)
        .unwrap();

    let output = finish(sim, &config);
    assert_eq!(steps, output.report.events_processed);
    assert!(output.report.cashier.peak_queue_len > 0);
}

fn join_and_start(record: &TransactionRecord) -> (f64, f64) {
    let start = record.completed_at - record.service_duration;
    (start - record.queue_wait_duration, start)
}

#[test]
fn checkout_lines_are_first_come_first_served() {
    for seed in [1, 2, 3] {
        let output = run_simulation(&rush_hour().with_seed(seed)).unwrap();
        for checkout in CheckoutType::ALL {
            let visits: Vec<(f64, f64)> = output
                .records
                .iter()
                .filter(|r| r.checkout == checkout)
                .map(join_and_start)
                .collect();
            for a in &visits {
                for b in &visits {
                    if a.0 < b.0 - EPS {
                        assert!(
                            a.1 <= b.1 + EPS,
                            "{checkout}: joined at {} but served after one who joined at {}",
                            a.0,
                            b.0
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn durations_are_never_negative() {
    // Shopping spread far larger than its mean, so many draws are clamped.
    let config = rush_hour().with_shopping(DurationParams::new(1.0, 5.0));
    let output = run_simulation(&config).unwrap();

    assert!(output.records.iter().any(|r| r.shopping_duration == 0.0));
    for record in &output.records {
        assert!(record.shopping_duration >= 0.0);
        assert!(record.queue_wait_duration >= 0.0);
        assert!(record.service_duration >= 0.0);
        assert!(record.completed_at <= config.horizon);
    }
    assert!(output
        .records
        .windows(2)
        .all(|w| w[0].completed_at <= w[1].completed_at));
}

#[test]
fn routing_share_matches_configuration() {
    let config = StoreConfig::default()
        .with_arrival_rate(10.0)
        .with_horizon(1_200.0)
        .with_shopping(DurationParams::fixed(0.0))
        .with_cashier(CheckoutConfig::new(1_000, DurationParams::fixed(1.0)))
        .with_self_checkout(CheckoutConfig::new(1_000, DurationParams::fixed(1.0)));

    for share in [0.6, 0.25] {
        let report = run_simulation(&config.clone().with_cashier_share(share))
            .unwrap()
            .report;
        let routed = report.routed_cashier + report.routed_self_checkout;
        assert!(routed >= 10_000, "only {routed} customers routed");
        let observed = report.routed_cashier as f64 / routed as f64;
        assert!(
            (observed - share).abs() < 0.02,
            "cashier share {observed} for configured {share}"
        );
    }
}

#[test]
fn arrivals_follow_a_poisson_process() {
    let config = StoreConfig::default().with_shopping(DurationParams::fixed(0.0));
    let expected = config.arrival_rate * config.horizon;

    let counts: Vec<f64> = (0..200)
        .map(|seed| {
            run_simulation(&config.clone().with_seed(seed))
                .unwrap()
                .report
                .customers_arrived as f64
        })
        .collect();
    let n = counts.len() as f64;
    let mean = counts.iter().sum::<f64>() / n;
    let variance = counts.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / (n - 1.0);

    assert!((mean - expected).abs() < 3.0, "mean count {mean}, expected {expected}");
    let dispersion = variance / expected;
    assert!(
        (0.6..1.4).contains(&dispersion),
        "variance {variance} for expected {expected}"
    );
}

#[test]
fn arrivals_stay_poisson_at_the_highest_rate() {
    // Mean gap of a thousand ticks; a thousand arrivals expected per run.
    let config = StoreConfig::default()
        .with_arrival_rate(MAX_ARRIVAL_RATE)
        .with_horizon(1000.0 / MAX_ARRIVAL_RATE)
        .with_shopping(DurationParams::fixed(0.0));
    let expected = 1000.0;

    let counts: Vec<f64> = (0..100)
        .map(|seed| {
            run_simulation(&config.clone().with_seed(seed))
                .unwrap()
                .report
                .customers_arrived as f64
        })
        .collect();
    let n = counts.len() as f64;
    let mean = counts.iter().sum::<f64>() / n;
    let variance = counts.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / (n - 1.0);

    assert!((mean - expected).abs() < 15.0, "mean count {mean}, expected {expected}");
    let dispersion = variance / expected;
    assert!(
        (0.6..1.4).contains(&dispersion),
        "variance {variance} for expected {expected}"
    );
}

#[test]
fn recorded_durations_match_the_clock() {
    let output = run_simulation(&rush_hour().with_seed(99)).unwrap();
    assert!(!output.records.is_empty());
    for record in &output.records {
        for duration in [record.shopping_duration, record.service_duration] {
            let ticks = duration * 1e9;
            assert!((ticks - ticks.round()).abs() < 1e-3, "{duration} is off the tick grid");
        }
    }
}

#[test]
fn sweep_preserves_rate_order_and_matches_single_runs() {
    let config = StoreConfig::default();
    let rates = [1.0 / 10.0, 1.0 / 8.0, 1.0 / 6.0, 1.0 / 4.0];
    let sweep = sweep_arrival_rates(&config, &rates).unwrap();

    assert_eq!(sweep.len(), rates.len());
    for (run, &rate) in sweep.iter().zip(&rates) {
        assert_eq!(run.arrival_rate, rate);
        assert_eq!(run.output.report.arrival_rate, rate);
        assert_eq!(run.output, run_simulation(&config.with_arrival_rate(rate)).unwrap());
    }
    // More shoppers arrive as the rate goes up, for this seed at least.
    assert!(sweep[0].output.report.customers_arrived < sweep[3].output.report.customers_arrived);
}
