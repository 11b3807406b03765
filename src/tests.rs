//! End-to-end tests for the search engine, driven by mock verifiers

use crate::prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VerifierError;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    /// In-process verifier: succeeds on `target`, faults on `fault_on`,
    /// optionally sleeps on wrong candidates to pin down cancellation timing
    struct MockVerifier {
        target: Option<String>,
        fault_on: Option<String>,
        miss_delay: Option<Duration>,
        calls: AtomicU64,
    }

    impl MockVerifier {
        fn succeeding_on(target: &str) -> Self {
            Self {
                target: Some(target.to_string()),
                fault_on: None,
                miss_delay: None,
                calls: AtomicU64::new(0),
            }
        }

        fn always_false() -> Self {
            Self {
                target: None,
                fault_on: None,
                miss_delay: None,
                calls: AtomicU64::new(0),
            }
        }

        fn faulting_on(candidate: &str) -> Self {
            Self {
                target: None,
                fault_on: Some(candidate.to_string()),
                miss_delay: None,
                calls: AtomicU64::new(0),
            }
        }

        fn with_miss_delay(mut self, delay: Duration) -> Self {
            self.miss_delay = Some(delay);
            self
        }

        fn calls(&self) -> u64 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Verify for MockVerifier {
        fn test(&self, candidate: &str) -> std::result::Result<bool, VerifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if self.fault_on.as_deref() == Some(candidate) {
                return Err(VerifierError::Timeout {
                    candidate: candidate.to_string(),
                    secs: 30,
                });
            }

            let hit = self.target.as_deref() == Some(candidate);
            if !hit {
                if let Some(delay) = self.miss_delay {
                    thread::sleep(delay);
                }
            }
            Ok(hit)
        }
    }

    fn engine(verifier: Arc<MockVerifier>, workers: usize) -> SearchEngine<Arc<MockVerifier>> {
        SearchEngine::new(verifier, workers)
    }

    fn template(mask: &str) -> Template {
        Template::parse(&CharsetTable::default(), mask).unwrap()
    }

    #[test]
    fn test_end_to_end_success() {
        let verifier = Arc::new(MockVerifier::succeeding_on("042"));
        let outcome = engine(verifier.clone(), 4)
            .run(template("?d?d?d"), None, 0)
            .unwrap();

        match outcome {
            Outcome::Success {
                passphrase,
                attempts,
                round,
            } => {
                assert_eq!(passphrase, "042");
                assert_eq!(round, 0);
                assert!(attempts <= 1000);
            }
            other => panic!("expected success, got {other:?}"),
        }
        assert!(verifier.calls() <= 1000);
    }

    #[test]
    fn test_single_literal_exhausts_after_one_test() {
        let verifier = Arc::new(MockVerifier::always_false());
        let outcome = engine(verifier.clone(), 4)
            .run(template("x"), None, 0)
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Exhausted {
                attempts: 1,
                rounds: 1
            }
        );
        assert_eq!(verifier.calls(), 1);
    }

    #[test]
    fn test_cancellation_bounds_extra_tests() {
        // the very first candidate succeeds; slow misses keep the other
        // workers occupied, so only the initially in-flight tests can run
        let workers = 4;
        let verifier = Arc::new(
            MockVerifier::succeeding_on("00").with_miss_delay(Duration::from_millis(25)),
        );
        let outcome = engine(verifier.clone(), workers)
            .run(template("?d?d"), None, 0)
            .unwrap();

        assert!(matches!(
            outcome,
            Outcome::Success { ref passphrase, .. } if passphrase.as_str() == "00"
        ));
        assert!(
            verifier.calls() <= workers as u64,
            "expected at most {} tests, saw {}",
            workers,
            verifier.calls()
        );
    }

    #[test]
    fn test_success_on_last_candidate() {
        let verifier = Arc::new(MockVerifier::succeeding_on("9"));
        let outcome = engine(verifier, 8).run(template("?d"), None, 0).unwrap();

        assert!(matches!(
            outcome,
            Outcome::Success { ref passphrase, .. } if passphrase.as_str() == "9"
        ));
    }

    #[test]
    fn test_escalation_is_cumulative() {
        // rounds: ?d (10), ?d?d (100), ?d?d?d (1000)
        let table = CharsetTable::default();
        let escalation = parse_mask(&table, "?d").unwrap();
        let verifier = Arc::new(MockVerifier::always_false());

        let outcome = engine(verifier.clone(), 2)
            .run(template("?d"), Some(&escalation), 2)
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Exhausted {
                attempts: 1110,
                rounds: 3
            }
        );
        assert_eq!(verifier.calls(), 1110);
    }

    #[test]
    fn test_escalation_finds_longer_passphrase() {
        let table = CharsetTable::default();
        let escalation = parse_mask(&table, "?d").unwrap();
        let verifier = Arc::new(MockVerifier::succeeding_on("a37"));

        let outcome = engine(verifier, 3)
            .run(template("a"), Some(&escalation), 5)
            .unwrap();

        match outcome {
            Outcome::Success {
                passphrase, round, ..
            } => {
                assert_eq!(passphrase, "a37");
                assert_eq!(round, 2);
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn test_max_rounds_caps_escalation() {
        let table = CharsetTable::default();
        let escalation = parse_mask(&table, "?d").unwrap();
        let verifier = Arc::new(MockVerifier::always_false());

        // max_rounds = 1: rounds 0 and 1 only
        let outcome = engine(verifier.clone(), 2)
            .run(template("?d"), Some(&escalation), 1)
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Exhausted {
                attempts: 110,
                rounds: 2
            }
        );
        assert_eq!(verifier.calls(), 110);
    }

    #[test]
    fn test_verifier_fault_aborts_run() {
        let verifier = Arc::new(MockVerifier::faulting_on("05"));
        let result = engine(verifier, 2).run(template("?d?d"), None, 0);

        match result {
            Err(SearchError::Verifier(VerifierError::Timeout { candidate, .. })) => {
                assert_eq!(candidate, "05");
            }
            other => panic!("expected verifier fault, got {other:?}"),
        }
    }

    #[test]
    fn test_run_search_with_config() {
        let config = SearchConfig {
            mask: "?d?d?d".to_string(),
            profile: Profile::Luks,
            param: "/dev/null".to_string(),
            custom_charsets: Default::default(),
            increment_mask: None,
            increment_count: 0,
            workers: 4,
        };
        let verifier = Arc::new(MockVerifier::succeeding_on("042"));

        let outcome = run_search(&config, verifier, None).unwrap();
        assert!(matches!(
            outcome,
            Outcome::Success { ref passphrase, .. } if passphrase.as_str() == "042"
        ));
    }

    #[test]
    fn test_run_search_rejects_bad_mask_before_testing() {
        let config = SearchConfig {
            mask: "?z".to_string(),
            profile: Profile::Luks,
            param: "/dev/null".to_string(),
            custom_charsets: Default::default(),
            increment_mask: None,
            increment_count: 0,
            workers: 4,
        };
        let verifier = Arc::new(MockVerifier::always_false());

        let result = run_search(&config, verifier.clone(), None);
        assert!(matches!(
            result,
            Err(SearchError::Mask(MaskError::UnknownCharset('z')))
        ));
        assert_eq!(verifier.calls(), 0);
    }

    #[test]
    fn test_run_search_rejects_bad_escalation_mask_before_testing() {
        let config = SearchConfig {
            mask: "?d".to_string(),
            profile: Profile::Luks,
            param: "/dev/null".to_string(),
            custom_charsets: Default::default(),
            increment_mask: Some("?-".to_string()),
            increment_count: 2,
            workers: 4,
        };
        let verifier = Arc::new(MockVerifier::always_false());

        let result = run_search(&config, verifier.clone(), None);
        assert!(matches!(
            result,
            Err(SearchError::Mask(MaskError::DanglingOptional))
        ));
        assert_eq!(verifier.calls(), 0);
    }

    #[test]
    fn test_monitor_sees_every_attempt() {
        let monitor = Arc::new(SearchMonitor::new(MonitorConfig {
            show_progress_bar: false,
        }));
        let verifier = Arc::new(MockVerifier::always_false());

        let outcome = engine(verifier, 2)
            .with_monitor(monitor.clone())
            .run(template("?d?d"), None, 0)
            .unwrap();

        assert!(matches!(outcome, Outcome::Exhausted { attempts: 100, .. }));
        assert_eq!(monitor.attempts(), 100);
        assert_eq!(monitor.matches(), 0);
    }
}
