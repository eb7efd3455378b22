//! Background idle polling.
//!
//! [`AutoBackup`] owns a task that periodically asks the shared
//! [`Session`] whether the user has gone idle, capturing history when they
//! have. Failures are logged and polling carries on.

use crate::error::{ErrorKind, Result};
use crate::session::Session;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

pub type SharedSession = Arc<Mutex<Session>>;

const MIN_POLL: Duration = Duration::from_millis(1);

pub struct AutoBackup {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl AutoBackup {
    /// Restart idle tracking, capture the open book immediately, then poll
    /// at the session's configured interval until stopped or dropped.
    pub async fn start(session: SharedSession) -> Result<Self> {
        let poll = session.lock().await.poll_interval();
        Self::start_with_interval(session, poll).await
    }

    /// Like [`start`](Self::start), polling every `poll` instead.
    pub async fn start_with_interval(session: SharedSession, poll: Duration) -> Result<Self> {
        session.lock().await.start_auto_backup()?;
        let poll = poll.max(MIN_POLL);
        let (shutdown, signal) = oneshot::channel();
        let task = tokio::spawn(poll_idle(session, poll, signal));
        info!(?poll, "Auto-backup started");
        Ok(Self { shutdown: Some(shutdown), task: Some(task) })
    }

    /// Stop polling and wait for the task to finish.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take()
            && let Err(err) = task.await
        {
            warn!(error = %err, "Auto-backup task did not shut down cleanly");
        }
    }
}
impl Drop for AutoBackup {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn poll_idle(session: SharedSession, poll: Duration, mut shutdown: oneshot::Receiver<()>) {
    let mut ticker = interval_at(Instant::now() + poll, poll);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                let mut session = session.lock().await;
                match session.check_idle() {
                    Ok(Some(entry_id)) => debug!(entry_id = %entry_id, "Idle capture taken"),
                    Ok(None) => {},
                    Err(err) => {
                        let kind: &ErrorKind = &err;
                        warn!(error = %kind, retryable = kind.is_retryable(), "Idle capture failed");
                    },
                }
            },
        }
    }
    info!("Auto-backup stopped");
}
