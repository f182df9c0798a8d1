use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use pantry_store::ProduceStore;
use pantry_types::{canonicalize_code, validate_and_canonicalize, Produce};

use crate::error::{ServiceError, ServiceResult};

/// How long a collector waits for its workers before failing the
/// still-unreported items closed.
pub const DEFAULT_BATCH_DEADLINE: Duration = Duration::from_secs(5);

/// Outcome of one batch-add item.
///
/// `code` is the canonical produce code when validation passed, the raw
/// input code otherwise, so every result remains attributable to its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddResult {
    pub code: String,
    pub outcome: ServiceResult<()>,
}

/// Produce service: validates candidate records and applies them to the
/// store, fanning batches out across concurrent worker tasks.
///
/// Cheap to clone; clones share the same underlying store.
#[derive(Clone)]
pub struct ProduceService {
    store: Arc<dyn ProduceStore>,
    deadline: Duration,
}

impl ProduceService {
    pub fn new(store: Arc<dyn ProduceStore>) -> Self {
        Self::with_deadline(store, DEFAULT_BATCH_DEADLINE)
    }

    pub fn with_deadline(store: Arc<dyn ProduceStore>, deadline: Duration) -> Self {
        Self { store, deadline }
    }

    /// Apply a batch of candidate records concurrently, one worker task per
    /// item, and return exactly one outcome per input position.
    ///
    /// `result[i]` always describes `items[i]`, regardless of the order the
    /// workers finish in. Items are isolated from each other: a validation
    /// failure or code conflict at one position never affects another.
    /// Duplicate codes within the batch race for the store's write lock --
    /// exactly one position wins, and which one is not defined.
    ///
    /// The call never hangs: once the batch deadline expires or `cancel`
    /// fires, any item whose worker has not reported yet fails closed
    /// (`Internal` or `Cancelled` respectively). Store operations that
    /// completed before that point stay reflected in the store.
    pub async fn add_batch(
        &self,
        items: Vec<Produce>,
        cancel: &CancellationToken,
    ) -> Vec<AddResult> {
        let total = items.len();
        if total == 0 {
            return Vec::new();
        }

        // Raw input codes label any slot whose worker never reports.
        let raw_codes: Vec<String> = items.iter().map(|item| item.code.clone()).collect();

        // Workers report (input position, outcome); the channel holds a full
        // batch so no worker ever blocks on a departed collector.
        let (tx, mut rx) = mpsc::channel::<(usize, AddResult)>(total);
        for (position, item) in items.into_iter().enumerate() {
            let store = Arc::clone(&self.store);
            let tx = tx.clone();
            tokio::spawn(async move {
                // If the collector stopped waiting the send fails; the store
                // mutation above already happened and stays valid.
                let _ = tx.send((position, apply_one(store.as_ref(), item))).await;
            });
        }
        drop(tx);

        // Fan in: each report lands in the slot addressed by its input
        // position, never appended in completion order.
        let mut slots: Vec<Option<AddResult>> = Vec::with_capacity(total);
        slots.resize_with(total, || None);
        let mut received = 0usize;
        let mut abort: Option<ServiceError> = None;

        let deadline = time::sleep(self.deadline);
        tokio::pin!(deadline);

        while received < total {
            tokio::select! {
                // Drain available reports before observing cancellation, so
                // an operation that did complete is never misreported.
                biased;
                report = rx.recv() => match report {
                    Some((position, result)) => {
                        slots[position] = Some(result);
                        received += 1;
                    }
                    None => {
                        warn!(expected = total, received, "worker exited without reporting");
                        abort = Some(ServiceError::Internal(
                            "worker exited without reporting".to_owned(),
                        ));
                        break;
                    }
                },
                _ = cancel.cancelled() => {
                    debug!(expected = total, received, "batch cancelled while collecting");
                    abort = Some(ServiceError::Cancelled);
                    break;
                }
                () = &mut deadline => {
                    warn!(expected = total, received, "batch deadline expired while collecting");
                    abort = Some(ServiceError::Internal("batch deadline expired".to_owned()));
                    break;
                }
            }
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(position, slot)| {
                slot.unwrap_or_else(|| AddResult {
                    code: raw_codes[position].clone(),
                    outcome: Err(abort.clone().unwrap_or_else(|| {
                        ServiceError::Internal("missing worker report".to_owned())
                    })),
                })
            })
            .collect()
    }

    /// Delete the record with the given code.
    ///
    /// The code is validated and canonicalized first; an invalid code never
    /// reaches the store. The single-item degenerate of the batch shape:
    /// same worker dispatch, same bounded wait.
    pub async fn delete(&self, code: &str, cancel: &CancellationToken) -> ServiceResult<()> {
        let canonical = canonicalize_code(code)
            .ok_or_else(|| ServiceError::InvalidFormat(format!("invalid code: '{code}'")))?;
        let store = Arc::clone(&self.store);
        self.run_bounded("delete", cancel, move || store.delete(&canonical))
            .await?
            .map_err(ServiceError::from)
    }

    /// Snapshot of all current records, order unspecified.
    pub async fn list_all(&self, cancel: &CancellationToken) -> ServiceResult<Vec<Produce>> {
        let store = Arc::clone(&self.store);
        self.run_bounded("list", cancel, move || store.list_all())
            .await?
            .map_err(ServiceError::from)
    }

    /// Discard every record. Intended for reset endpoints and tests.
    pub fn clear(&self) -> ServiceResult<()> {
        self.store.clear().map_err(ServiceError::from)
    }

    /// Run one store operation on a worker task, waiting at most the batch
    /// deadline and honoring the cancellation token. On either exit the
    /// worker keeps running to completion; only the wait is abandoned.
    async fn run_bounded<T, F>(
        &self,
        label: &'static str,
        cancel: &CancellationToken,
        op: F,
    ) -> ServiceResult<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let handle = tokio::spawn(async move { op() });
        tokio::select! {
            biased;
            joined = handle => joined.map_err(|err| {
                warn!(%label, %err, "worker task failed");
                ServiceError::Internal(format!("{label} worker failed: {err}"))
            }),
            _ = cancel.cancelled() => Err(ServiceError::Cancelled),
            _ = time::sleep(self.deadline) => {
                warn!(%label, "deadline expired waiting for worker");
                Err(ServiceError::Internal(format!("{label} deadline expired")))
            }
        }
    }
}

impl std::fmt::Debug for ProduceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProduceService")
            .field("deadline", &self.deadline)
            .finish()
    }
}

/// Validate one candidate and, if it passes, hand it to the store.
fn apply_one(store: &dyn ProduceStore, item: Produce) -> AddResult {
    match validate_and_canonicalize(&item) {
        Err(reason) => AddResult {
            code: item.code,
            outcome: Err(ServiceError::InvalidFormat(reason)),
        },
        Ok(canonical) => {
            let code = canonical.code.clone();
            let outcome = store.add(canonical).map_err(ServiceError::from);
            AddResult { code, outcome }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use pantry_store::{InMemoryProduceStore, StoreError, StoreResult};
    use pantry_types::Usd;

    fn lettuce() -> Produce {
        Produce::new("A12T-4GH7-QPL9-3N4M", "Lettuce", Usd::from_cents(346))
    }

    fn pepper() -> Produce {
        Produce::new("YRT6-72AS-K736-L4AR", "Green Pepper", Usd::from_cents(79))
    }

    fn gala() -> Produce {
        Produce::new("E5T6-9UI3-TH15-QR88", "Gala Apple", Usd::from_cents(259))
    }

    fn service() -> (ProduceService, Arc<InMemoryProduceStore>) {
        let store = Arc::new(InMemoryProduceStore::new());
        (
            ProduceService::new(Arc::clone(&store) as Arc<dyn ProduceStore>),
            store,
        )
    }

    // -----------------------------------------------------------------------
    // Batch add: happy paths and ordering
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn empty_batch_yields_empty_result() {
        let (service, store) = service();
        let results = service.add_batch(Vec::new(), &CancellationToken::new()).await;
        assert!(results.is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn distinct_codes_all_created() {
        let (service, store) = service();
        let results = service
            .add_batch(vec![lettuce(), pepper(), gala()], &CancellationToken::new())
            .await;

        assert_eq!(results.len(), 3);
        for result in &results {
            assert_eq!(result.outcome, Ok(()), "code {}", result.code);
        }
        assert_eq!(store.len(), 3);

        let listed = service.list_all(&CancellationToken::new()).await.unwrap();
        for item in [lettuce(), pepper(), gala()] {
            assert!(listed.contains(&item), "missing {}", item.code);
        }
    }

    #[tokio::test]
    async fn result_order_matches_input_order() {
        let (service, _) = service();
        let batch = vec![
            pepper(),
            Produce::new("bad", "Lettuce", Usd::from_cents(1)),
            lettuce(),
            Produce::new("e5t6-9ui3-th15-qr88", "gala apple", Usd::from_cents(259)),
        ];
        let results = service.add_batch(batch, &CancellationToken::new()).await;

        assert_eq!(results[0].code, "YRT6-72AS-K736-L4AR");
        assert_eq!(results[1].code, "bad");
        assert_eq!(results[2].code, "A12T-4GH7-QPL9-3N4M");
        // Canonical code comes back even when the input was lowercase.
        assert_eq!(results[3].code, "E5T6-9UI3-TH15-QR88");

        assert_eq!(results[0].outcome, Ok(()));
        assert_eq!(
            results[1].outcome,
            Err(ServiceError::InvalidFormat("invalid code: 'bad'".to_owned()))
        );
        assert_eq!(results[2].outcome, Ok(()));
        assert_eq!(results[3].outcome, Ok(()));
    }

    #[tokio::test]
    async fn duplicate_code_in_batch_admits_exactly_one() {
        let (service, store) = service();
        let results = service
            .add_batch(vec![lettuce(), lettuce()], &CancellationToken::new())
            .await;

        let created = results
            .iter()
            .filter(|r| r.outcome == Ok(()))
            .count();
        let conflicted = results
            .iter()
            .filter(|r| {
                matches!(
                    r.outcome,
                    Err(ServiceError::Store(StoreError::AlreadyExists(_)))
                )
            })
            .count();

        // Either position may win the race, but exactly one does.
        assert_eq!(created, 1);
        assert_eq!(conflicted, 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn invalid_item_never_reaches_store() {
        let (service, store) = service();
        let bad = Produce::new("A12T-4GH7-QP", "Lettuce", Usd::from_cents(346));
        let results = service
            .add_batch(vec![bad, pepper()], &CancellationToken::new())
            .await;

        assert_eq!(
            results[0].outcome,
            Err(ServiceError::InvalidFormat(
                "invalid code: 'A12T-4GH7-QP'".to_owned()
            ))
        );
        assert_eq!(results[1].outcome, Ok(()));

        let listed = store.list_all().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].code, "YRT6-72AS-K736-L4AR");
    }

    #[tokio::test]
    async fn invalid_name_is_reported_verbatim() {
        let (service, _) = service();
        let bad = Produce::new("YRT6-72AS-K736-L4AR", "Green-Pepper", Usd::from_cents(79));
        let results = service.add_batch(vec![bad], &CancellationToken::new()).await;
        assert_eq!(
            results[0].outcome,
            Err(ServiceError::InvalidFormat(
                "invalid name: 'Green-Pepper'".to_owned()
            ))
        );
    }

    #[tokio::test]
    async fn conflict_with_earlier_batch() {
        let (service, store) = service();
        let cancel = CancellationToken::new();

        let first = service.add_batch(vec![lettuce()], &cancel).await;
        assert_eq!(first[0].outcome, Ok(()));

        let second = service.add_batch(vec![lettuce()], &cancel).await;
        assert_eq!(
            second[0].outcome,
            Err(ServiceError::Store(StoreError::AlreadyExists(
                "A12T-4GH7-QPL9-3N4M".to_owned()
            )))
        );
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn batch_canonicalizes_before_store() {
        let (service, store) = service();
        let lower = Produce::new("yrt6-72as-k736-l4ar", "green pepper", Usd::from_cents(79));
        let results = service.add_batch(vec![lower], &CancellationToken::new()).await;

        assert_eq!(results[0].outcome, Ok(()));
        let listed = store.list_all().unwrap();
        assert_eq!(listed[0].code, "YRT6-72AS-K736-L4AR");
        assert_eq!(listed[0].name, "Green Pepper");
    }

    // -----------------------------------------------------------------------
    // Delete / list
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn delete_validates_code_first() {
        let (service, _) = service();
        let err = service
            .delete("badcode", &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::InvalidFormat("invalid code: 'badcode'".to_owned())
        );
    }

    #[tokio::test]
    async fn delete_missing_code_is_not_found() {
        let (service, _) = service();
        let err = service
            .delete("YRT6-72AS-K736-L4AR", &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::Store(StoreError::NotFound("YRT6-72AS-K736-L4AR".to_owned()))
        );
    }

    #[tokio::test]
    async fn delete_accepts_free_case_codes() {
        let (service, store) = service();
        let cancel = CancellationToken::new();
        service.add_batch(vec![pepper()], &cancel).await;

        service.delete("yrt6-72as-k736-l4ar", &cancel).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn list_all_returns_current_records() {
        let (service, _) = service();
        let cancel = CancellationToken::new();
        service.add_batch(vec![lettuce(), pepper()], &cancel).await;

        let listed = service.list_all(&cancel).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.contains(&lettuce()));
        assert!(listed.contains(&pepper()));
    }

    #[tokio::test]
    async fn clear_resets_the_store() {
        let (service, store) = service();
        let cancel = CancellationToken::new();
        service.add_batch(vec![lettuce(), pepper()], &cancel).await;

        service.clear().unwrap();
        assert!(store.is_empty());
        assert!(service.list_all(&cancel).await.unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // Bounded wait: cancellation, deadline, dead workers
    // -----------------------------------------------------------------------

    /// Store whose writes stall long enough for a deadline or cancellation
    /// to win the race.
    struct SlowStore {
        delay: Duration,
        inner: InMemoryProduceStore,
    }

    impl SlowStore {
        fn new(delay: Duration) -> Self {
            Self {
                delay,
                inner: InMemoryProduceStore::new(),
            }
        }
    }

    impl ProduceStore for SlowStore {
        fn add(&self, item: Produce) -> StoreResult<()> {
            std::thread::sleep(self.delay);
            self.inner.add(item)
        }

        fn delete(&self, code: &str) -> StoreResult<()> {
            std::thread::sleep(self.delay);
            self.inner.delete(code)
        }

        fn list_all(&self) -> StoreResult<Vec<Produce>> {
            std::thread::sleep(self.delay);
            self.inner.list_all()
        }

        fn clear(&self) -> StoreResult<()> {
            self.inner.clear()
        }
    }

    /// Store that panics on one specific code, killing that worker before
    /// it can report.
    struct PanicStore {
        poison_code: &'static str,
        inner: InMemoryProduceStore,
    }

    impl ProduceStore for PanicStore {
        fn add(&self, item: Produce) -> StoreResult<()> {
            assert_ne!(item.code, self.poison_code, "poisoned code");
            self.inner.add(item)
        }

        fn delete(&self, code: &str) -> StoreResult<()> {
            self.inner.delete(code)
        }

        fn list_all(&self) -> StoreResult<Vec<Produce>> {
            self.inner.list_all()
        }

        fn clear(&self) -> StoreResult<()> {
            self.inner.clear()
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn cancelled_batch_fails_unreported_items_closed() {
        let store = Arc::new(SlowStore::new(Duration::from_millis(500)));
        let service = ProduceService::new(store);

        let cancel = CancellationToken::new();
        cancel.cancel();

        let start = Instant::now();
        let results = service.add_batch(vec![lettuce(), pepper()], &cancel).await;
        // The collector must give up well before the workers finish.
        assert!(start.elapsed() < Duration::from_millis(400));

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].code, "A12T-4GH7-QPL9-3N4M");
        assert_eq!(results[1].code, "YRT6-72AS-K736-L4AR");
        for result in &results {
            assert_eq!(result.outcome, Err(ServiceError::Cancelled));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn deadline_expiry_fails_unreported_items_closed() {
        let store = Arc::new(SlowStore::new(Duration::from_millis(500)));
        let service = ProduceService::with_deadline(store, Duration::from_millis(50));

        let start = Instant::now();
        let results = service
            .add_batch(vec![lettuce()], &CancellationToken::new())
            .await;
        assert!(start.elapsed() < Duration::from_millis(400));

        assert_eq!(results.len(), 1);
        assert!(
            matches!(results[0].outcome, Err(ServiceError::Internal(_))),
            "got {:?}",
            results[0].outcome
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn dead_worker_fails_only_its_own_item() {
        let store = Arc::new(PanicStore {
            poison_code: "A12T-4GH7-QPL9-3N4M",
            inner: InMemoryProduceStore::new(),
        });
        let service = ProduceService::new(store);

        let results = service
            .add_batch(vec![lettuce(), pepper()], &CancellationToken::new())
            .await;

        assert_eq!(results.len(), 2);
        assert!(
            matches!(results[0].outcome, Err(ServiceError::Internal(_))),
            "got {:?}",
            results[0].outcome
        );
        assert_eq!(results[1].outcome, Ok(()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn delete_honors_deadline() {
        let store = Arc::new(SlowStore::new(Duration::from_millis(500)));
        let service = ProduceService::with_deadline(store, Duration::from_millis(50));

        let err = service
            .delete("A12T-4GH7-QPL9-3N4M", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Internal(_)), "got {err:?}");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn list_honors_cancellation() {
        let store = Arc::new(SlowStore::new(Duration::from_millis(500)));
        let service = ProduceService::new(store);

        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = service.list_all(&cancel).await.unwrap_err();
        assert_eq!(err, ServiceError::Cancelled);
    }
}
