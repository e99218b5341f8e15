//! Availability poller
//!
//! Repeats availability checks until a snapshot shows up, the attempt budget
//! runs out, or the wall-clock deadline passes. The deadline is checked before
//! each attempt; an in-flight check is never cancelled by it.

use crate::archive::availability::AvailabilityCheck;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// Result of polling for one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The archive holds a snapshot at this HTTPS link
    Found(String),

    /// Every attempt completed without a snapshot
    NotFound,

    /// The deadline passed before the attempts were used up
    TimedOut,
}

/// Polls an availability endpoint with a fixed attempt budget and delay
pub struct Poller {
    checker: Arc<dyn AvailabilityCheck>,
    attempts: u32,
    delay: Duration,
}

impl Poller {
    /// Creates a poller
    ///
    /// # Arguments
    ///
    /// * `checker` - Performs a single availability check
    /// * `attempts` - Maximum number of checks per URL
    /// * `delay` - Pause between consecutive checks
    pub fn new(checker: Arc<dyn AvailabilityCheck>, attempts: u32, delay: Duration) -> Self {
        Self {
            checker,
            attempts,
            delay,
        }
    }

    /// Polls until a snapshot is found, attempts run out, or `deadline` elapses
    ///
    /// Failed checks (transport or protocol errors) are logged and count as an
    /// attempt without a snapshot.
    pub async fn poll(&self, url: &Url, deadline: Duration) -> PollOutcome {
        let started = Instant::now();

        for attempt in 1..=self.attempts {
            if started.elapsed() > deadline {
                tracing::debug!(
                    "Giving up on {} after {} attempt(s): deadline of {:?} passed",
                    url,
                    attempt - 1,
                    deadline
                );
                return PollOutcome::TimedOut;
            }

            match self.checker.check(url).await {
                Ok(Some(snapshot)) => {
                    tracing::debug!("Snapshot of {} found on attempt {}", url, attempt);
                    return PollOutcome::Found(snapshot);
                }
                Ok(None) => {
                    tracing::trace!(
                        "No snapshot of {} yet (attempt {}/{})",
                        url,
                        attempt,
                        self.attempts
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Availability check failed for {} (attempt {}/{}): {}",
                        url,
                        attempt,
                        self.attempts,
                        e
                    );
                }
            }

            if attempt < self.attempts {
                tokio::time::sleep(self.delay).await;
            }
        }

        PollOutcome::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArchiveError, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    enum Answer {
        Snapshot(&'static str),
        Missing,
        Broken,
    }

    /// Checker that answers from a script and records when each call started
    struct ScriptedChecker {
        answers: Mutex<Vec<Answer>>,
        latency: Duration,
        calls: Mutex<Vec<Instant>>,
    }

    impl ScriptedChecker {
        fn new(answers: Vec<Answer>, latency: Duration) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers.into_iter().rev().collect()),
                latency,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_times(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AvailabilityCheck for ScriptedChecker {
        async fn check(&self, url: &Url) -> Result<Option<String>> {
            self.calls.lock().unwrap().push(Instant::now());
            tokio::time::sleep(self.latency).await;

            let answer = self.answers.lock().unwrap().pop().unwrap_or(Answer::Missing);
            match answer {
                Answer::Snapshot(link) => Ok(Some(link.to_string())),
                Answer::Missing => Ok(None),
                Answer::Broken => Err(ArchiveError::Protocol {
                    url: url.to_string(),
                    message: "unexpected token".to_string(),
                }),
            }
        }
    }

    fn target() -> Url {
        Url::parse("https://example.org/paper").unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_found_stops_polling() {
        let checker = ScriptedChecker::new(
            vec![
                Answer::Missing,
                Answer::Broken,
                Answer::Snapshot("https://web.archive.org/web/2024/https://example.org/paper"),
            ],
            Duration::from_millis(200),
        );
        let poller = Poller::new(checker.clone(), 8, Duration::from_millis(3000));

        let outcome = poller.poll(&target(), Duration::from_millis(45_000)).await;

        assert_eq!(
            outcome,
            PollOutcome::Found("https://web.archive.org/web/2024/https://example.org/paper".into())
        );
        assert_eq!(checker.call_times().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_budget_and_spacing() {
        let checker = ScriptedChecker::new(vec![], Duration::ZERO);
        let poller = Poller::new(checker.clone(), 8, Duration::from_millis(3000));

        let outcome = poller.poll(&target(), Duration::from_millis(45_000)).await;

        assert_eq!(outcome, PollOutcome::NotFound);
        let calls = checker.call_times();
        assert_eq!(calls.len(), 8);
        for pair in calls.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(gap >= Duration::from_millis(3000), "gap too short: {:?}", gap);
            assert!(gap < Duration::from_millis(3010), "gap too long: {:?}", gap);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_stops_before_budget() {
        // Every check hangs until its own 8s timeout: 11s per attempt including the delay
        let checker = ScriptedChecker::new(vec![], Duration::from_millis(8000));
        let poller = Poller::new(checker.clone(), 8, Duration::from_millis(3000));

        let started = Instant::now();
        let outcome = poller.poll(&target(), Duration::from_millis(45_000)).await;

        assert_eq!(outcome, PollOutcome::TimedOut);
        assert_eq!(checker.call_times().len(), 5);
        assert!(started.elapsed() <= Duration::from_millis(45_000 + 11_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_do_not_end_polling() {
        let checker = ScriptedChecker::new(
            vec![Answer::Broken, Answer::Broken, Answer::Broken, Answer::Broken],
            Duration::ZERO,
        );
        let poller = Poller::new(checker.clone(), 4, Duration::from_millis(10));

        let outcome = poller.poll(&target(), Duration::from_millis(45_000)).await;

        assert_eq!(outcome, PollOutcome::NotFound);
        assert_eq!(checker.call_times().len(), 4);
    }
}
