//! Background write-through worker for settings.
//!
//! Setters enqueue writes and return immediately. The worker drains whatever
//! is queued, keeps only the newest value per key, and writes the survivors.
//! Failures are logged and dropped; there is no retry.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::SettingKey;
use crate::store::KeyValueStore;

pub(crate) enum PersistCmd {
    Write { key: SettingKey, value: String },
    Flush(oneshot::Sender<()>),
    Shutdown(oneshot::Sender<()>),
}

pub(crate) async fn run_writer(
    store: Arc<dyn KeyValueStore>,
    mut rx: mpsc::UnboundedReceiver<PersistCmd>,
) {
    while let Some(first) = rx.recv().await {
        let mut pending: BTreeMap<SettingKey, String> = BTreeMap::new();
        let mut acks: Vec<oneshot::Sender<()>> = Vec::new();
        let mut shutdown = false;

        let mut next = Some(first);
        while let Some(cmd) = next {
            match cmd {
                PersistCmd::Write { key, value } => {
                    pending.insert(key, value);
                }
                PersistCmd::Flush(ack) => acks.push(ack),
                PersistCmd::Shutdown(ack) => {
                    acks.push(ack);
                    shutdown = true;
                }
            }
            next = rx.try_recv().ok();
        }

        for (key, value) in pending {
            match store.set(key.as_ref(), &value).await {
                Ok(()) => debug!(key = %key, value = %value, "setting persisted"),
                Err(e) => warn!(key = %key, error = %e, "failed to persist setting"),
            }
        }

        for ack in acks {
            let _ = ack.send(());
        }

        if shutdown {
            debug!("settings writer stopped");
            break;
        }
    }
}
