//! Store sync actor forwarding task store changes into the update loop.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::store::SharedTaskStore;
use crate::tea::Message;
use crate::tlog_debug;

use super::ActorHandle;

/// Actor that watches the task store and forwards every published state
/// to the update loop as a `StoreUpdated` message.
pub struct StoreSyncActor {
    msg_tx: mpsc::UnboundedSender<Message>,
    store: SharedTaskStore,
}

impl StoreSyncActor {
    pub fn new(msg_tx: mpsc::UnboundedSender<Message>, store: SharedTaskStore) -> Self {
        Self { msg_tx, store }
    }

    pub fn spawn(self) -> ActorHandle {
        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();

        tlog_debug!("StoreSyncActor::spawn");

        tokio::spawn(async move {
            let mut rx = self.store.subscribe();

            loop {
                tokio::select! {
                    _ = cancel_clone.cancelled() => {
                        tlog_debug!("StoreSyncActor cancelled");
                        break;
                    }
                    changed = rx.changed() => {
                        if changed.is_err() {
                            tlog_debug!("StoreSyncActor: store dropped");
                            break;
                        }
                        let snapshot = rx.borrow_and_update().clone();
                        if self.msg_tx.send(Message::StoreUpdated(snapshot)).is_err() {
                            tlog_debug!("StoreSyncActor: message channel closed");
                            break;
                        }
                    }
                }
            }
        });

        ActorHandle::new(cancel)
    }
}
