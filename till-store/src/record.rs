//! Transaction records and the sink that collects them

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which checkout a customer used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckoutType {
    Cashier,
    SelfCheckout,
}

impl CheckoutType {
    pub const ALL: [CheckoutType; 2] = [CheckoutType::Cashier, CheckoutType::SelfCheckout];

    pub fn as_str(self) -> &'static str {
        match self {
            CheckoutType::Cashier => "Cashier",
            CheckoutType::SelfCheckout => "Self-Checkout",
        }
    }
}

impl fmt::Display for CheckoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sequence number of a customer, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CustomerId(pub u64);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Customer({})", self.0)
    }
}

/// One completed checkout. Times are in model time units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub customer: CustomerId,
    /// When the customer left the checkout.
    pub completed_at: f64,
    pub shopping_duration: f64,
    /// Time between joining the checkout line and reaching a server.
    pub queue_wait_duration: f64,
    pub service_duration: f64,
    pub checkout: CheckoutType,
}

/// Append-only list of records, in completion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSink {
    records: Vec<TransactionRecord>,
}

impl RecordSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: TransactionRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransactionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn by_checkout(&self, checkout: CheckoutType) -> impl Iterator<Item = &TransactionRecord> {
        self.records.iter().filter(move |r| r.checkout == checkout)
    }

    pub fn into_records(self) -> Vec<TransactionRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(customer: u64, completed_at: f64, checkout: CheckoutType) -> TransactionRecord {
        TransactionRecord {
            customer: CustomerId(customer),
            completed_at,
            shopping_duration: 1.0,
            queue_wait_duration: 0.0,
            service_duration: 2.0,
            checkout,
        }
    }

    #[test]
    fn test_sink_keeps_insertion_order() {
        let mut sink = RecordSink::new();
        assert!(sink.is_empty());
        sink.push(record(3, 5.0, CheckoutType::Cashier));
        sink.push(record(1, 7.0, CheckoutType::SelfCheckout));
        sink.push(record(2, 9.0, CheckoutType::Cashier));

        let customers: Vec<u64> = sink.iter().map(|r| r.customer.0).collect();
        assert_eq!(customers, vec![3, 1, 2]);
        assert_eq!(sink.by_checkout(CheckoutType::Cashier).count(), 2);
        assert_eq!(sink.len(), 3);
        assert_eq!(sink.into_records()[1].completed_at, 7.0);
    }

    #[test]
    fn test_checkout_labels() {
        assert_eq!(CheckoutType::Cashier.to_string(), "Cashier");
        assert_eq!(CheckoutType::SelfCheckout.to_string(), "Self-Checkout");
    }
}
