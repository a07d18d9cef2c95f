pub mod http;

pub use http::HttpCloudClient;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::JournalResult;
use crate::store::{JournalStore, Storage};
use crate::trading::trade_record::TradeRecord;

/// Remote journal store. Both directions move the whole collection and
/// overwrite the other side unconditionally.
#[async_trait]
pub trait CloudTransport: Send + Sync {
    async fn save(&self, trades: &[TradeRecord]) -> JournalResult<()>;
    async fn load(&self) -> JournalResult<Vec<TradeRecord>>;
    async fn user_profile(&self) -> JournalResult<Option<String>>;
}

pub async fn push<S: Storage, T: CloudTransport + ?Sized>(
    store: &JournalStore<S>,
    transport: &T,
) -> JournalResult<usize> {
    let trades = store.get();
    match transport.save(trades).await {
        Ok(()) => {
            info!("Journal saved to cloud ({} entries)", trades.len());
            Ok(trades.len())
        }
        Err(e) => {
            warn!("Cloud save failed: {}", e);
            Err(e)
        }
    }
}

/// Downloads the remote journal and replaces the local one. On failure the
/// local journal is left as it was.
pub async fn pull<S: Storage, T: CloudTransport + ?Sized>(
    store: &mut JournalStore<S>,
    transport: &T,
) -> JournalResult<usize> {
    let trades = match transport.load().await {
        Ok(trades) => trades,
        Err(e) => {
            warn!("Cloud load failed: {}", e);
            return Err(e);
        }
    };
    let count = trades.len();
    store.replace(trades)?;
    info!("Journal loaded from cloud ({} entries)", count);
    Ok(count)
}
