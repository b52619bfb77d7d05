//! Background delivery of task side effects.
//!
//! [`SideEffectDispatcher`] owns a tokio worker fed by an unbounded channel.
//! Each effect is split into independent jobs (one per invalidated user, one
//! per audit entry) which are retried with backoff on their own task, so a
//! slow audit sink never holds up cache invalidation or the request path.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, warn};

use super::RetryPolicy;
use crate::task::{
    domain::{AuditEntry, UserId},
    ports::{
        AuditSink, SideEffect, SideEffectQueue, SideEffectResult, TaskListCache,
        task_list_pattern,
    },
};

enum Command {
    Deliver(SideEffect),
    Flush(oneshot::Sender<()>),
}

enum Job {
    Invalidate(UserId),
    Audit(Box<AuditEntry>),
}

impl Job {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Invalidate(_) => "invalidate_task_lists",
            Self::Audit(_) => "audit",
        }
    }
}

/// Handle to the side-effect worker.
///
/// Cloning the handle shares the same worker. The worker stops once every
/// handle has been dropped and all in-flight jobs have finished.
#[derive(Debug, Clone)]
pub struct SideEffectDispatcher {
    sender: mpsc::UnboundedSender<Command>,
}

impl SideEffectDispatcher {
    /// Spawns the worker on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn spawn<K, A>(cache: Arc<K>, audit: Arc<A>, policy: RetryPolicy) -> (Self, JoinHandle<()>)
    where
        K: TaskListCache + 'static,
        A: AuditSink + 'static,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = Worker {
            cache,
            audit,
            policy,
        };
        let handle = tokio::spawn(worker.run(receiver));
        (Self { sender }, handle)
    }

    /// Waits until every effect enqueued before this call has been handled,
    /// delivered or given up on.
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.sender.send(Command::Flush(ack)).is_err() {
            warn!("side-effect worker stopped; nothing to flush");
            return;
        }
        if done.await.is_err() {
            warn!("side-effect worker stopped before acknowledging flush");
        }
    }
}

impl SideEffectQueue for SideEffectDispatcher {
    fn enqueue(&self, effect: SideEffect) {
        let kind = effect.kind();
        if self.sender.send(Command::Deliver(effect)).is_err() {
            warn!(effect = kind, "side-effect worker stopped; dropping effect");
        }
    }
}

struct Worker<K, A> {
    cache: Arc<K>,
    audit: Arc<A>,
    policy: RetryPolicy,
}

impl<K, A> Worker<K, A>
where
    K: TaskListCache + 'static,
    A: AuditSink + 'static,
{
    async fn run(self, mut receiver: mpsc::UnboundedReceiver<Command>) {
        let mut in_flight = JoinSet::new();
        while let Some(command) = receiver.recv().await {
            while let Some(finished) = in_flight.try_join_next() {
                log_join(finished);
            }
            match command {
                Command::Deliver(effect) => {
                    for job in split(effect) {
                        in_flight.spawn(deliver_with_retry(
                            Arc::clone(&self.cache),
                            Arc::clone(&self.audit),
                            self.policy,
                            job,
                        ));
                    }
                }
                Command::Flush(ack) => {
                    while let Some(finished) = in_flight.join_next().await {
                        log_join(finished);
                    }
                    if ack.send(()).is_err() {
                        debug!("flush requester went away");
                    }
                }
            }
        }
        while let Some(finished) = in_flight.join_next().await {
            log_join(finished);
        }
        debug!("side-effect worker stopped");
    }
}

fn split(effect: SideEffect) -> Vec<Job> {
    match effect {
        SideEffect::InvalidateTaskLists(users) => users.into_iter().map(Job::Invalidate).collect(),
        SideEffect::Audit(entry) => vec![Job::Audit(Box::new(entry))],
    }
}

fn log_join(result: Result<(), tokio::task::JoinError>) {
    if let Err(err) = result {
        warn!(error = %err, "side-effect job aborted");
    }
}

async fn deliver_with_retry<K, A>(cache: Arc<K>, audit: Arc<A>, policy: RetryPolicy, job: Job)
where
    K: TaskListCache,
    A: AuditSink,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match deliver(&*cache, &*audit, &job).await {
            Ok(()) => return,
            Err(err) if attempt < max_attempts => {
                let delay = policy.next_delay(attempt);
                warn!(
                    job = job.kind(),
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "side-effect delivery failed; retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                warn!(
                    job = job.kind(),
                    attempts = attempt,
                    error = %err,
                    "side-effect delivery failed; giving up"
                );
                return;
            }
        }
    }
}

async fn deliver<K, A>(cache: &K, audit: &A, job: &Job) -> SideEffectResult<()>
where
    K: TaskListCache,
    A: AuditSink,
{
    match job {
        Job::Invalidate(user) => {
            let pattern = task_list_pattern(*user);
            let removed = cache.delete_matching(&pattern).await?;
            debug!(%user, removed, "invalidated cached task lists");
            Ok(())
        }
        Job::Audit(entry) => audit.append(entry).await,
    }
}
