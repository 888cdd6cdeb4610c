//! Client reconciliation loop.
//!
//! While a non-owner viewer shows a scheduled session, the poller reads
//! the remote status on a fixed interval and reports changes. Polls are
//! strictly sequential: the next tick is not taken until the previous
//! read has returned. The loop ends when local state leaves `scheduled`,
//! either because a poll observed the change or because the viewer set
//! it directly.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use classgate_core::types::RoomId;
use classgate_entity::live::LiveSessionStatus;

use crate::event::ViewerEvent;
use crate::source::StatusSource;

/// Spawns per-viewer polling tasks.
#[derive(Debug)]
pub struct StatusPoller {
    source: Arc<dyn StatusSource>,
    room_id: RoomId,
    interval: Duration,
    local: Arc<watch::Sender<LiveSessionStatus>>,
    events: mpsc::UnboundedSender<ViewerEvent>,
    cancel: CancellationToken,
}

impl StatusPoller {
    /// Start watching `room_id` for one viewer.
    ///
    /// No task is started for the session owner or when `initial_status`
    /// is not `scheduled`; the returned handle still tracks local status.
    pub fn spawn(
        source: Arc<dyn StatusSource>,
        room_id: RoomId,
        initial_status: LiveSessionStatus,
        is_owner: bool,
        interval: Duration,
    ) -> PollerHandle {
        let (local, _) = watch::channel(initial_status);
        let local = Arc::new(local);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let task = if is_owner || initial_status != LiveSessionStatus::Scheduled {
            debug!(room_id = %room_id, is_owner, status = %initial_status, "Status polling not needed");
            None
        } else {
            let poller = Self {
                source,
                room_id,
                interval,
                local: local.clone(),
                events: events_tx,
                cancel: cancel.clone(),
            };
            Some(tokio::spawn(poller.run()))
        };

        PollerHandle {
            local,
            events: events_rx,
            cancel,
            task,
        }
    }

    async fn run(self) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let result = self.source.fetch(&self.room_id).await;

            // An in-flight read that outlived the viewer is discarded.
            if self.cancel.is_cancelled() {
                debug!(room_id = %self.room_id, "Discarding poll result after cancellation");
                break;
            }

            let snapshot = match result {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    if *self.local.borrow() != LiveSessionStatus::Scheduled {
                        break;
                    }
                    warn!(room_id = %self.room_id, error = %e, "Status poll failed, retrying next tick");
                    continue;
                }
            };

            // Compare and apply under the watch lock: a transition the viewer
            // made while the read was in flight is never overwritten.
            let mut observed = Observed::Unchanged;
            self.local.send_if_modified(|status| {
                if *status != LiveSessionStatus::Scheduled {
                    observed = Observed::LeftLocally;
                    false
                } else if snapshot.status != *status {
                    observed = Observed::Changed(*status);
                    *status = snapshot.status;
                    true
                } else {
                    false
                }
            });
            let current = match observed {
                Observed::Unchanged => continue,
                Observed::LeftLocally => break,
                Observed::Changed(from) => from,
            };

            let _ = self.events.send(ViewerEvent::StatusChanged {
                from: current,
                to: snapshot.status,
            });
            if snapshot.status == LiveSessionStatus::Active {
                info!(room_id = %self.room_id, "Live session started");
                let _ = self.events.send(ViewerEvent::SessionStarted {
                    room_url: snapshot.room_url,
                    is_embeddable: snapshot.is_embeddable,
                });
            }
            if snapshot.status != LiveSessionStatus::Scheduled {
                break;
            }
        }
    }
}

/// What a poll result did to the local status.
enum Observed {
    Unchanged,
    LeftLocally,
    Changed(LiveSessionStatus),
}

/// Owned by the viewing surface. Dropping it stops polling.
#[derive(Debug)]
pub struct PollerHandle {
    local: Arc<watch::Sender<LiveSessionStatus>>,
    events: mpsc::UnboundedReceiver<ViewerEvent>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Status the viewer is currently showing.
    pub fn status(&self) -> LiveSessionStatus {
        *self.local.borrow()
    }

    /// Apply a transition made by this viewer, e.g. the instructor's own
    /// start or end. Polling stops once the status leaves `scheduled`.
    pub fn set_local_status(&self, status: LiveSessionStatus) {
        self.local.send_replace(status);
        if status != LiveSessionStatus::Scheduled {
            self.cancel.cancel();
        }
    }

    /// Next event, or `None` once the poller has finished and every
    /// event has been received.
    pub async fn next_event(&mut self) -> Option<ViewerEvent> {
        self.events.recv().await
    }

    /// Next event if one is already queued.
    pub fn try_next_event(&mut self) -> Option<ViewerEvent> {
        self.events.try_recv().ok()
    }

    /// Whether a polling task is still running.
    pub fn is_polling(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop polling. No further reads are issued.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the polling task to finish.
    pub async fn join(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Status poller task failed");
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
