//! Batch installer
//!
//! Installs an [`InstallPlan`] resource by resource:
//!
//! ```text
//! Pending -> Fetching -> Writing -> Succeeded | Failed
//!         \-> Skipped (already installed, overwrite off)
//! ```
//!
//! Fetches are the only suspension points. Up to `parallel_fetches` of them
//! run ahead concurrently, but results are consumed and written strictly in
//! plan order, so outcomes and writes always follow the topological order.
//!
//! Per-resource failures never fail the call; they land in the
//! [`InstallReport`]. Only a malformed plan is an error. With
//! `rollback_on_error`, the first failure undoes every write of the batch
//! (newest first) and the rest of the plan is not attempted.

pub mod destination;
pub mod report;
pub mod retry;
pub mod transport;
pub mod writer;


use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use futures::StreamExt;
use futures::stream;

pub use destination::{DestinationResolver, INSTALL_DIR, TypedLayout};
pub use report::{InstallReport, InstallState, ResourceOutcome};
pub use retry::RetryPolicy;
pub use transport::{FetchError, FileTransport, Transport};

use crate::cache::{Blob, TieredCache};
use crate::domain::Resource;
use crate::error::{RescatError, Result, fetch, plan as plan_error};
use crate::hash;
use crate::resolver::InstallPlan;
use crate::transaction::WriteJournal;

/// Namespace of fetched artifacts in the tiered cache
pub const ARTIFACT_NAMESPACE: &str = "artifacts";

const DEFAULT_PARALLEL_FETCHES: usize = 4;

/// Shared artifact cache, keyed by `location@checksum`
pub type ArtifactCache = TieredCache<Blob>;

/// Receives `(resource id, new state)` on every transition
pub type Observer = Arc<dyn Fn(&str, &InstallState) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Replace files that already exist at the destination
    pub overwrite: bool,
    /// Undo the whole batch on the first failure
    pub rollback_on_error: bool,
    /// Fetches allowed in flight at once
    pub parallel_fetches: usize,
    pub retry: RetryPolicy,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            rollback_on_error: false,
            parallel_fetches: DEFAULT_PARALLEL_FETCHES,
            retry: RetryPolicy::default(),
        }
    }
}

/// Cooperative cancellation, checked between resources
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What preparation decided for a resource before any fetch
enum Step {
    Fetch(PathBuf),
    Settled(InstallState),
}

struct Fetched {
    bytes: Vec<u8>,
    attempts: u32,
    from_cache: bool,
}

struct FetchFailure {
    error: FetchError,
    attempts: u32,
}

pub struct BatchInstaller {
    transport: Arc<dyn Transport>,
    destinations: Arc<dyn DestinationResolver>,
    artifacts: Option<Arc<ArtifactCache>>,
    options: InstallOptions,
    cancel: CancellationFlag,
    observer: Option<Observer>,
}

impl BatchInstaller {
    pub fn new(transport: Arc<dyn Transport>, destinations: Arc<dyn DestinationResolver>) -> Self {
        Self {
            transport,
            destinations,
            artifacts: None,
            options: InstallOptions::default(),
            cancel: CancellationFlag::new(),
            observer: None,
        }
    }

    pub fn with_options(mut self, options: InstallOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_artifact_cache(mut self, cache: Arc<ArtifactCache>) -> Self {
        self.artifacts = Some(cache);
        self
    }

    pub fn with_observer(mut self, observer: Observer) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn options(&self) -> &InstallOptions {
        &self.options
    }

    /// Handle that cancels this installer's batches
    pub fn cancellation(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    fn notify(&self, id: &str, state: &InstallState) {
        tracing::debug!(id, state = state.label(), "install transition");
        if let Some(observer) = &self.observer {
            observer(id, state);
        }
    }

    /// Install every resource of `plan`, in plan order
    ///
    /// # Errors
    ///
    /// `PlanContractViolation` for an empty plan or one listing an
    /// identifier twice. Everything else is reported per resource.
    pub async fn install(&self, plan: &InstallPlan) -> Result<InstallReport> {
        check_plan(plan)?;
        let started = Instant::now();

        let mut outcomes: Vec<ResourceOutcome> = plan
            .resources
            .iter()
            .map(|resource| ResourceOutcome::pending(&resource.id))
            .collect();

        let steps: Vec<Step> = plan
            .resources
            .iter()
            .zip(outcomes.iter_mut())
            .map(|(resource, outcome)| self.prepare(resource, outcome))
            .collect();

        let to_fetch: Vec<&Resource> = plan
            .resources
            .iter()
            .zip(&steps)
            .filter(|(_, step)| matches!(step, Step::Fetch(_)))
            .map(|(resource, _)| resource)
            .collect();
        let mut fetches = stream::iter(to_fetch)
            .map(|resource| self.fetch_with_retry(resource))
            .buffered(self.options.parallel_fetches.max(1));

        let mut journal = self.options.rollback_on_error.then(WriteJournal::new);
        let mut cancelled = false;
        let mut rolled_back = false;
        let mut halted = false;

        for (index, (resource, step)) in plan.resources.iter().zip(steps).enumerate() {
            if !halted && self.cancel.is_cancelled() {
                tracing::info!(at = %resource.id, "install cancelled");
                cancelled = true;
                halted = true;
            }
            if halted {
                outcomes[index].state = InstallState::NotAttempted;
                self.notify(&resource.id, &outcomes[index].state);
                continue;
            }

            let state = match step {
                Step::Settled(state) => state,
                Step::Fetch(destination) => {
                    let fetched = fetches.next().await.ok_or_else(|| {
                        plan_error::contract_violation("fetch stream ended before the plan")
                    })?;
                    match fetched {
                        Err(failure) => InstallState::Failed {
                            reason: failure.error.to_string(),
                            attempts: failure.attempts,
                        },
                        Ok(fetched) => {
                            outcomes[index].from_cache = fetched.from_cache;
                            self.notify(&resource.id, &InstallState::Writing);
                            match write_artifact(
                                &resource.id,
                                &destination,
                                &fetched.bytes,
                                journal.as_mut(),
                            ) {
                                Ok(()) => InstallState::Succeeded,
                                Err(e) => InstallState::Failed {
                                    reason: format!("write {}: {e}", destination.display()),
                                    attempts: fetched.attempts,
                                },
                            }
                        }
                    }
                }
            };

            let failed = matches!(state, InstallState::Failed { .. });
            if let InstallState::Failed { reason, .. } = &state {
                tracing::warn!(id = %resource.id, %reason, "install failed");
            }
            outcomes[index].state = state;
            self.notify(&resource.id, &outcomes[index].state);

            if let Some(journal) = journal.as_mut().filter(|_| failed) {
                let undone: HashSet<String> = journal.rollback().into_iter().collect();
                tracing::info!(count = undone.len(), "rolled back batch");
                for outcome in outcomes.iter_mut().filter(|o| undone.contains(&o.id)) {
                    outcome.state = InstallState::RolledBack;
                    self.notify(&outcome.id, &outcome.state);
                }
                rolled_back = true;
                halted = true;
            }
        }

        if let Some(journal) = journal {
            journal.commit();
        }

        let report = InstallReport {
            outcomes,
            elapsed: started.elapsed(),
            cancelled,
            rolled_back,
        };
        tracing::info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            skipped = report.skipped(),
            not_attempted = report.not_attempted(),
            rolled_back = report.rolled_back_count(),
            elapsed_ms = u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
            "install batch finished"
        );
        Ok(report)
    }

    /// Decide destination and skip before anything is fetched
    fn prepare(&self, resource: &Resource, outcome: &mut ResourceOutcome) -> Step {
        match self.destinations.destination(resource) {
            Err(e) => Step::Settled(InstallState::Failed {
                reason: e.to_string(),
                attempts: 0,
            }),
            Ok(destination) => {
                outcome.destination = Some(destination.clone());
                if destination.exists() && !self.options.overwrite {
                    tracing::debug!(id = %resource.id, path = %destination.display(), "already installed");
                    Step::Settled(InstallState::Skipped)
                } else {
                    Step::Fetch(destination)
                }
            }
        }
    }

    /// Cache key of a checksum-pinned artifact
    ///
    /// Sources without a checksum have no content identity the cache could
    /// check, so they are always fetched.
    fn artifact_key(resource: &Resource) -> Option<String> {
        resource
            .source
            .checksum
            .as_ref()
            .map(|checksum| format!("{}@{}", resource.source.location, checksum.trim().to_lowercase()))
    }

    /// Cached bytes for `resource`, dropping entries that fail its checksum
    fn cached_artifact(&self, resource: &Resource, key: &str) -> Option<Vec<u8>> {
        let cache = self.artifacts.as_ref()?;
        let expected = resource.source.checksum.as_ref()?;
        let bytes = cache.get(key)?.into_bytes();
        if !hash::verify_hash(expected, &hash::hash_bytes(&bytes)) {
            tracing::debug!(key, "cached artifact fails checksum, refetching");
            cache.invalidate(key);
            return None;
        }
        Some(bytes)
    }

    /// Fetch with retries on transient failures, then verify the checksum
    async fn fetch_with_retry(&self, resource: &Resource) -> std::result::Result<Fetched, FetchFailure> {
        self.notify(&resource.id, &InstallState::Fetching);

        let key = Self::artifact_key(resource);
        if let Some(bytes) = key.as_deref().and_then(|key| self.cached_artifact(resource, key)) {
            tracing::debug!(id = %resource.id, "artifact cache hit");
            return Ok(Fetched {
                bytes,
                attempts: 0,
                from_cache: true,
            });
        }

        let mut attempts = 0;
        let bytes = loop {
            attempts += 1;
            match self.transport.fetch(&resource.source).await {
                Ok(bytes) => break bytes,
                Err(error) if error.is_transient() && self.options.retry.allows_retry(attempts) => {
                    let delay = self.options.retry.delay_after(attempts);
                    tracing::debug!(id = %resource.id, attempts, %error, ?delay, "transient fetch failure, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(error) => return Err(FetchFailure { error, attempts }),
            }
        };

        if let Some(expected) = &resource.source.checksum {
            let actual = hash::hash_bytes(&bytes);
            if !hash::verify_hash(expected, &actual) {
                return Err(FetchFailure {
                    error: FetchError::ChecksumMismatch {
                        expected: expected.clone(),
                        actual,
                    },
                    attempts,
                });
            }
        }

        if let (Some(cache), Some(key)) = (&self.artifacts, &key) {
            cache.set(key, Blob::from(bytes.clone()));
        }
        Ok(Fetched {
            bytes,
            attempts,
            from_cache: false,
        })
    }

    /// Fetch a single resource's content outside of a batch
    ///
    /// # Errors
    ///
    /// `TransientFetchFailure` once the retry budget is spent,
    /// `PermanentFetchFailure` or `ChecksumMismatch` otherwise.
    pub async fn fetch(&self, resource: &Resource) -> Result<Vec<u8>> {
        self.fetch_with_retry(resource)
            .await
            .map(|fetched| fetched.bytes)
            .map_err(|failure| fetch_error(&resource.id, failure))
    }
}

fn fetch_error(id: &str, failure: FetchFailure) -> RescatError {
    match failure.error {
        FetchError::Transient(reason) => fetch::transient(id, failure.attempts, reason),
        FetchError::Permanent(reason) => fetch::permanent(id, reason),
        FetchError::ChecksumMismatch { expected, actual } => {
            fetch::checksum_mismatch(id, expected, actual)
        }
    }
}

fn check_plan(plan: &InstallPlan) -> Result<()> {
    if plan.is_empty() {
        return Err(plan_error::contract_violation("plan contains no resources"));
    }
    let mut seen = HashSet::new();
    for id in plan.ids() {
        if !seen.insert(id) {
            return Err(plan_error::contract_violation(format!(
                "resource '{id}' appears more than once"
            )));
        }
    }
    Ok(())
}

/// Atomically write `bytes`, journaling the previous content when asked
fn write_artifact(
    owner: &str,
    destination: &Path,
    bytes: &[u8],
    journal: Option<&mut WriteJournal>,
) -> io::Result<()> {
    let previous = match &journal {
        Some(_) if destination.exists() => Some(fs::read(destination)?),
        _ => None,
    };

    let created_dirs = writer::write_atomic(destination, bytes)?;

    if let Some(journal) = journal {
        journal.track_dirs_created(created_dirs);
        journal.record(owner, destination, previous);
    }
    Ok(())
}
