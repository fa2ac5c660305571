use crate::domain::model::{AggregatedResults, DirectoryResultList, IdentifierSet};
use crate::domain::ports::DirectorySearch;
use crate::utils::error::{GatewayError, QueryFailure, Result};
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_MAX_CONCURRENT_QUERIES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanOutSettings {
    pub max_concurrent_queries: usize,
    /// Overall budget for all directory queries of one request.
    pub deadline: Option<Duration>,
}

impl Default for FanOutSettings {
    fn default() -> Self {
        Self {
            max_concurrent_queries: DEFAULT_MAX_CONCURRENT_QUERIES,
            deadline: None,
        }
    }
}

/// Result of querying a single identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Matched(DirectoryResultList),
    Empty,
    Failed(QueryFailure),
}

impl From<std::result::Result<DirectoryResultList, QueryFailure>> for QueryOutcome {
    fn from(result: std::result::Result<DirectoryResultList, QueryFailure>) -> Self {
        match result {
            Ok(list) if list.has_matches() => QueryOutcome::Matched(list),
            Ok(_) => QueryOutcome::Empty,
            Err(failure) => QueryOutcome::Failed(failure),
        }
    }
}

async fn query_one<D>(directory: &D, identifier: &str, deadline: Option<Instant>) -> QueryOutcome
where
    D: DirectorySearch + ?Sized,
{
    tracing::info!("Querying Directory for DocTypeID '{}'", identifier);

    let result = match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, directory.query(identifier))
            .await
            .unwrap_or(Err(QueryFailure::DeadlineExceeded)),
        None => directory.query(identifier).await,
    };
    QueryOutcome::from(result)
}

/// Queries every identifier with bounded concurrency and keeps the results that have matches.
///
/// Individual failures are logged and skipped. The call only fails if every identifier
/// failed with a fatal (configuration) failure.
pub async fn aggregate<D>(
    identifiers: &IdentifierSet,
    directory: &D,
    settings: &FanOutSettings,
) -> Result<AggregatedResults>
where
    D: DirectorySearch + ?Sized,
{
    let deadline = settings.deadline.map(|budget| Instant::now() + budget);

    // 必須是擁有所有權的 String，否則 handler 的 future 不是 Send
    let owned = identifiers.as_slice().iter().cloned();
    let outcomes: Vec<(String, QueryOutcome)> = stream::iter(owned)
        .map(|identifier: String| async move {
            let outcome = query_one(directory, &identifier, deadline).await;
            (identifier, outcome)
        })
        .buffer_unordered(settings.max_concurrent_queries.max(1))
        .collect()
        .await;

    merge_outcomes(outcomes)
}

/// Join point of the fan-out.
pub fn merge_outcomes<I>(outcomes: I) -> Result<AggregatedResults>
where
    I: IntoIterator<Item = (String, QueryOutcome)>,
{
    let mut results = AggregatedResults::new();
    let mut total = 0usize;
    let mut fatal = Vec::new();

    for (identifier, outcome) in outcomes {
        total += 1;
        match outcome {
            QueryOutcome::Matched(list) => {
                tracing::debug!(
                    "Directory returned {} match(es) for '{}'",
                    list.matches.len(),
                    identifier
                );
                results.insert(identifier, list);
            }
            QueryOutcome::Empty => {
                tracing::debug!("No Directory matches for '{}'", identifier);
            }
            QueryOutcome::Failed(failure) => {
                tracing::error!(
                    identifier = %identifier,
                    stage = failure.stage(),
                    "Directory query failed: {}",
                    failure
                );
                if failure.is_fatal() {
                    fatal.push(failure);
                }
            }
        }
    }

    if total > 0 && fatal.len() == total {
        return Err(GatewayError::ConfigError {
            message: format!("All {} Directory queries failed: {}", total, fatal[0]),
        });
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalizer::normalize_identifiers;
    use crate::domain::model::{MatchEntry, SchemedIdentifier};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn matches(count: usize) -> DirectoryResultList {
        DirectoryResultList {
            total_result_count: Some(count as u32),
            query_terms: None,
            matches: (0..count)
                .map(|i| MatchEntry {
                    participant_id: SchemedIdentifier::new("iso6523-actorid-upis", format!("9915:{}", i)),
                    doc_type_ids: vec![],
                    entities: vec![],
                })
                .collect(),
        }
    }

    struct ScriptedDirectory {
        answers: HashMap<String, std::result::Result<DirectoryResultList, QueryFailure>>,
        delays: HashMap<String, Duration>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    impl ScriptedDirectory {
        fn new() -> Self {
            Self {
                answers: HashMap::new(),
                delays: HashMap::new(),
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                calls: AtomicUsize::new(0),
            }
        }

        fn answer(
            mut self,
            id: &str,
            result: std::result::Result<DirectoryResultList, QueryFailure>,
        ) -> Self {
            self.answers.insert(id.to_string(), result);
            self
        }

        fn delay(mut self, id: &str, delay: Duration) -> Self {
            self.delays.insert(id.to_string(), delay);
            self
        }
    }

    #[async_trait]
    impl DirectorySearch for ScriptedDirectory {
        async fn query(
            &self,
            identifier: &str,
        ) -> std::result::Result<DirectoryResultList, QueryFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let delay = self
                .delays
                .get(identifier)
                .copied()
                .unwrap_or(Duration::from_millis(10));
            tokio::time::sleep(delay).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.answers
                .get(identifier)
                .cloned()
                .unwrap_or_else(|| Ok(DirectoryResultList::default()))
        }
    }

    #[tokio::test]
    async fn test_only_matching_identifiers_are_kept() {
        let ids = normalize_identifiers(Some("A,B,C,D")).unwrap();
        let directory = ScriptedDirectory::new()
            .answer("A", Ok(matches(2)))
            .answer("B", Ok(matches(0)))
            .answer(
                "C",
                Err(QueryFailure::Parse {
                    message: "unexpected EOF".into(),
                }),
            )
            .answer("D", Err(QueryFailure::Status { status: 503 }));

        let results = aggregate(&ids, &directory, &FanOutSettings::default())
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert!(results.contains("A"));
        assert!(!results.contains("B"));
        assert!(!results.contains("C"));
        assert!(!results.contains("D"));
        assert_eq!(directory.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let ids = normalize_identifiers(Some("a,b,c,d,e,f,g,h")).unwrap();
        let directory = ScriptedDirectory::new();
        let settings = FanOutSettings {
            max_concurrent_queries: 3,
            deadline: None,
        };

        aggregate(&ids, &directory, &settings).await.unwrap();

        assert_eq!(directory.calls.load(Ordering::SeqCst), 8);
        assert!(directory.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_result_does_not_depend_on_completion_order() {
        let ids = normalize_identifiers(Some("x,y,z")).unwrap();
        let fast_x = ScriptedDirectory::new()
            .answer("x", Ok(matches(1)))
            .answer("z", Ok(matches(3)))
            .delay("x", Duration::from_millis(1))
            .delay("z", Duration::from_millis(40));
        let slow_x = ScriptedDirectory::new()
            .answer("x", Ok(matches(1)))
            .answer("z", Ok(matches(3)))
            .delay("x", Duration::from_millis(40))
            .delay("z", Duration::from_millis(1));

        let settings = FanOutSettings {
            max_concurrent_queries: 3,
            deadline: None,
        };
        let first = aggregate(&ids, &fast_x, &settings).await.unwrap();
        let second = aggregate(&ids, &slow_x, &settings).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[tokio::test]
    async fn test_deadline_keeps_finished_results() {
        let ids = normalize_identifiers(Some("quick,slow")).unwrap();
        let directory = ScriptedDirectory::new()
            .answer("quick", Ok(matches(1)))
            .answer("slow", Ok(matches(1)))
            .delay("quick", Duration::from_millis(1))
            .delay("slow", Duration::from_secs(5));
        let settings = FanOutSettings {
            max_concurrent_queries: 2,
            deadline: Some(Duration::from_millis(200)),
        };

        let results = aggregate(&ids, &directory, &settings).await.unwrap();

        assert!(results.contains("quick"));
        assert!(!results.contains("slow"));
    }

    #[test]
    fn test_all_fatal_failures_stop_the_batch() {
        let fatal = || {
            QueryOutcome::Failed(QueryFailure::Configuration {
                message: "builder error".into(),
            })
        };
        let err = merge_outcomes(vec![("a".to_string(), fatal()), ("b".to_string(), fatal())])
            .unwrap_err();
        assert!(matches!(err, GatewayError::ConfigError { .. }));

        let mixed = merge_outcomes(vec![
            ("a".to_string(), fatal()),
            ("b".to_string(), QueryOutcome::Empty),
        ])
        .unwrap();
        assert!(mixed.is_empty());
    }

    #[test]
    fn test_non_fatal_failures_never_fail_the_batch() {
        let results = merge_outcomes(vec![(
            "a".to_string(),
            QueryOutcome::Failed(QueryFailure::Transport {
                message: "connection refused".into(),
            }),
        )])
        .unwrap();
        assert!(results.is_empty());
    }
}
