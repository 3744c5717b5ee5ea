//! Bridge from the host's order snapshot channel into the store.

use crate::reducer::UpsellStore;
use crate::state::UpsellAction;
use crate::types::OrderLine;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Forward every order snapshot into `store` as `OrderLinesChanged`
///
/// The current snapshot is sent immediately. The task ends when the sender
/// is dropped or the store starts shutting down.
pub fn forward_order_lines(store: UpsellStore, mut lines: watch::Receiver<Vec<OrderLine>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let snapshot = lines.borrow_and_update().clone();
            if let Err(error) = store
                .send(UpsellAction::OrderLinesChanged { lines: snapshot })
                .await
            {
                tracing::debug!(%error, "Store stopped accepting order snapshots");
                return;
            }

            if lines.changed().await.is_err() {
                tracing::debug!("Order snapshot channel closed");
                return;
            }
        }
    })
}
