// src/services/sync_scheduler_tests.rs
//
// UNIT TESTS: Sync Job Scheduling
//
// PURPOSE:
// - Prove single-flight semantics: re-enqueueing a name cancels the old run
// - Prove the retry policy retries transient failures up to its cap
// - Prove job state is observable through to a terminal value

#[cfg(test)]
mod scheduler_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use crate::db::{create_test_pool, initialize_database};
    use crate::error::AppError;
    use crate::events::EventBus;
    use crate::integrations::catalog::{CardCatalogResponse, CardDto, MockCatalogApi};
    use crate::repositories::{CardRepository, SqliteCardRepository};
    use crate::services::{
        CatalogSyncService, JobState, RetryPolicy, SyncScheduler, INITIAL_SYNC_JOB,
    };
    use tokio::sync::watch;

    fn one_card_response() -> CardCatalogResponse {
        CardCatalogResponse {
            count: 1,
            cards: vec![CardDto {
                season: Some("2003-04".to_string()),
                card_number: Some("6".to_string()),
                player_name: Some("Thierry Henry".to_string()),
                team: Some("Arsenal".to_string()),
                card_image_url: None,
            }],
        }
    }

    fn scheduler_with(api: MockCatalogApi) -> (SyncScheduler, Arc<dyn CardRepository>) {
        let pool = create_test_pool().unwrap();
        {
            let conn = pool.get().unwrap();
            initialize_database(&conn).unwrap();
        }
        let repo: Arc<dyn CardRepository> =
            Arc::new(SqliteCardRepository::new(Arc::new(pool)));
        let sync_service = Arc::new(CatalogSyncService::new(
            Arc::clone(&repo),
            Arc::new(api),
            Arc::new(EventBus::new()),
        ));
        (SyncScheduler::new(sync_service), repo)
    }

    async fn wait_for_terminal(rx: &mut watch::Receiver<JobState>) -> JobState {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let state = rx.borrow().clone();
                if state.is_terminal() {
                    return state;
                }
                rx.changed().await.unwrap();
            }
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_job_runs_to_success() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_all_cards()
            .returning(|| Ok(one_card_response()));
        let (scheduler, repo) = scheduler_with(api);

        let mut rx = scheduler.enqueue_unique(INITIAL_SYNC_JOB, RetryPolicy::default());
        assert_eq!(wait_for_terminal(&mut rx).await, JobState::Succeeded);
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(
            scheduler.job_state(INITIAL_SYNC_JOB),
            Some(JobState::Succeeded)
        );
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut api = MockCatalogApi::new();
        api.expect_fetch_all_cards().returning(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(AppError::Http("connection refused".to_string()))
            } else {
                Ok(one_card_response())
            }
        });
        let (scheduler, repo) = scheduler_with(api);

        let policy = RetryPolicy {
            max_attempts: 3,
            backoff: Duration::from_millis(1),
        };
        let mut rx = scheduler.enqueue_unique(INITIAL_SYNC_JOB, policy);

        assert_eq!(wait_for_terminal(&mut rx).await, JobState::Succeeded);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_retries_end_in_failure() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_all_cards()
            .returning(|| Err(AppError::Http("connection refused".to_string())));
        let (scheduler, repo) = scheduler_with(api);

        let policy = RetryPolicy {
            max_attempts: 2,
            backoff: Duration::from_millis(1),
        };
        let mut rx = scheduler.enqueue_unique(INITIAL_SYNC_JOB, policy);

        assert!(matches!(
            wait_for_terminal(&mut rx).await,
            JobState::Failed(_)
        ));
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reenqueue_replaces_inflight_job() {
        // First run fails and then sits in a long backoff, so it is still
        // alive when the replacement arrives.
        let mut api = MockCatalogApi::new();
        api.expect_fetch_all_cards()
            .returning(|| Err(AppError::Http("connection refused".to_string())));
        let (scheduler, _) = scheduler_with(api);

        let slow_policy = RetryPolicy {
            max_attempts: 5,
            backoff: Duration::from_secs(60),
        };
        let mut first_rx = scheduler.enqueue_unique(INITIAL_SYNC_JOB, slow_policy);

        // Let the first attempt fail and enter its backoff sleep.
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if *first_rx.borrow() == JobState::Running {
                    return;
                }
                first_rx.changed().await.unwrap();
            }
        })
        .await
        .unwrap();

        let fast_policy = RetryPolicy {
            max_attempts: 1,
            backoff: Duration::from_millis(1),
        };
        let mut second_rx = scheduler.enqueue_unique(INITIAL_SYNC_JOB, fast_policy);

        assert_eq!(wait_for_terminal(&mut first_rx).await, JobState::Cancelled);
        assert!(matches!(
            wait_for_terminal(&mut second_rx).await,
            JobState::Failed(_)
        ));
    }

    #[tokio::test]
    async fn test_cancel_marks_job_cancelled() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_all_cards()
            .returning(|| Err(AppError::Http("connection refused".to_string())));
        let (scheduler, _) = scheduler_with(api);

        let slow_policy = RetryPolicy {
            max_attempts: 5,
            backoff: Duration::from_secs(60),
        };
        let mut rx = scheduler.enqueue_unique(INITIAL_SYNC_JOB, slow_policy);

        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if *rx.borrow() == JobState::Running {
                    return;
                }
                rx.changed().await.unwrap();
            }
        })
        .await
        .unwrap();

        assert!(scheduler.cancel(INITIAL_SYNC_JOB));
        assert_eq!(
            scheduler.job_state(INITIAL_SYNC_JOB),
            Some(JobState::Cancelled)
        );
        // Cancelling twice is a no-op.
        assert!(!scheduler.cancel(INITIAL_SYNC_JOB));
    }
}
