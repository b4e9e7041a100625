//! Stub implementations of service ports.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use puffs_common::{AqiProvider, AqiReading, Coordinates, FetchOutcome};

enum Behaviour {
    /// Hand out outcomes in order; the last one repeats.
    Outcomes(Mutex<VecDeque<FetchOutcome>>),
    /// Panic inside the call, simulating an unexpected pipeline failure.
    Panic(String),
}

/// An [`AqiProvider`] that returns canned outcomes and records its calls.
pub struct StubProvider {
    behaviour: Behaviour,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_coordinates: Mutex<Option<Coordinates>>,
}

impl StubProvider {
    /// Always return `outcome`.
    pub fn returning(outcome: FetchOutcome) -> Self {
        Self::sequence(vec![outcome])
    }

    /// Always succeed with the given AQI.
    pub fn with_aqi(aqi: i32) -> Self {
        Self::returning(FetchOutcome::Success(AqiReading::new(aqi, "1234")))
    }

    /// Return each outcome once, then keep returning the last one.
    pub fn sequence(outcomes: Vec<FetchOutcome>) -> Self {
        assert!(!outcomes.is_empty(), "stub needs at least one outcome");
        Self::with_behaviour(Behaviour::Outcomes(Mutex::new(outcomes.into())))
    }

    /// Panic on every call.
    pub fn panicking(message: impl Into<String>) -> Self {
        Self::with_behaviour(Behaviour::Panic(message.into()))
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn with_behaviour(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            delay: None,
            calls: AtomicUsize::new(0),
            last_coordinates: Mutex::new(None),
        }
    }

    /// Number of times `fetch_aqi` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Coordinates passed to the most recent call.
    pub fn last_coordinates(&self) -> Option<Coordinates> {
        *self.last_coordinates.lock().unwrap()
    }
}

#[async_trait]
impl AqiProvider for StubProvider {
    async fn fetch_aqi(&self, coordinates: Coordinates) -> FetchOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_coordinates.lock().unwrap() = Some(coordinates);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behaviour {
            Behaviour::Panic(message) => panic!("{}", message),
            Behaviour::Outcomes(queue) => {
                let mut queue = queue.lock().unwrap();
                if queue.len() > 1 {
                    queue.pop_front().unwrap()
                } else {
                    queue.front().cloned().unwrap()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn here() -> Coordinates {
        Coordinates::new(1.0, 2.0).unwrap()
    }

    #[tokio::test]
    async fn test_returning_counts_calls() {
        let stub = StubProvider::with_aqi(42);
        assert_eq!(stub.calls(), 0);

        let outcome = stub.fetch_aqi(here()).await;
        assert_eq!(outcome.reading().unwrap().aqi, 42);
        stub.fetch_aqi(here()).await;

        assert_eq!(stub.calls(), 2);
        assert_eq!(stub.last_coordinates(), Some(here()));
    }

    #[tokio::test]
    async fn test_sequence_repeats_last() {
        let stub = StubProvider::sequence(vec![FetchOutcome::rejected(), FetchOutcome::missing_credential()]);
        assert_eq!(stub.fetch_aqi(here()).await, FetchOutcome::rejected());
        assert_eq!(stub.fetch_aqi(here()).await, FetchOutcome::missing_credential());
        assert_eq!(stub.fetch_aqi(here()).await, FetchOutcome::missing_credential());
    }
}
