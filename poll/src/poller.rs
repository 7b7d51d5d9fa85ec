//! Background refresh of the disabled-character set.
//!
//! The poller fetches once when mounted, then on a fixed interval while the
//! board is visible. Hiding the board drops the interval outright; showing
//! it again fetches immediately and starts a fresh interval, so at most one
//! timer is ever live. Visibility changes that arrive faster than the poller
//! wakes collapse into the latest state.

use std::collections::BTreeSet;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, warn};

use banpick_library::StatusMap;

use crate::StatusSource;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

pub fn disabled_ids(status: &StatusMap) -> BTreeSet<u8> {
    status.checked_ids().collect()
}

pub struct Poller {
    visibility: watch::Sender<Visibility>,
    disabled: watch::Receiver<BTreeSet<u8>>,
    task: JoinHandle<()>,
}

impl Poller {
    /// Repeating the current visibility is a no-op.
    pub fn set_visibility(&self, visibility: Visibility) {
        self.visibility.send_if_modified(|current| {
            if *current == visibility {
                false
            } else {
                *current = visibility;
                true
            }
        });
    }

    pub fn visibility(&self) -> Visibility {
        *self.visibility.borrow()
    }

    pub fn disabled(&self) -> watch::Receiver<BTreeSet<u8>> {
        self.disabled.clone()
    }

    pub fn unmount(self) {
        self.task.abort();
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn spawn_poller<S>(source: S, initial: Visibility, period: Duration) -> Poller
where
    S: StatusSource + 'static,
{
    let (visibility_tx, mut visibility_rx) = watch::channel(initial);
    let (disabled_tx, disabled_rx) = watch::channel(BTreeSet::new());

    let task = tokio::spawn(async move {
        refresh(&source, &disabled_tx).await;
        let mut ticker = (initial == Visibility::Visible).then(|| start_interval(period));

        loop {
            tokio::select! {
                changed = visibility_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let visibility = *visibility_rx.borrow_and_update();
                    match visibility {
                        Visibility::Hidden => {
                            debug!("Board hidden, pausing refresh");
                            ticker = None;
                        }
                        Visibility::Visible => {
                            debug!("Board visible, resuming refresh");
                            refresh(&source, &disabled_tx).await;
                            ticker = Some(start_interval(period));
                        }
                    }
                }
                _ = next_tick(&mut ticker) => {
                    refresh(&source, &disabled_tx).await;
                }
            }
        }
    });

    Poller {
        visibility: visibility_tx,
        disabled: disabled_rx,
        task,
    }
}

// First tick is one full period out; the immediate fetch happens separately.
fn start_interval(period: Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn refresh<S: StatusSource>(source: &S, disabled: &watch::Sender<BTreeSet<u8>>) {
    match source.fetch().await {
        Ok(status) => {
            let ids = disabled_ids(&status);
            disabled.send_if_modified(|current| {
                if *current == ids {
                    false
                } else {
                    debug!(disabled = ?ids, "Disabled characters changed");
                    *current = ids;
                    true
                }
            });
        }
        // Keep showing the last known state.
        Err(err) => warn!(error = %err, "Failed to fetch character status"),
    }
}
