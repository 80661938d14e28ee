pub mod cache;
pub mod error;
pub mod ledger;
pub mod merge;
pub mod notify;
pub mod ranking;
pub mod remote;
pub mod search;
pub mod seed;
pub mod store;
pub mod suggestion;
pub mod sync;
pub mod table;

pub use cache::{FileCache, KeyValueCache, MemoryCache};
pub use error::StoreError;
pub use merge::MergeReport;
pub use notify::{Subscription, SubscriptionId};
pub use ranking::ReviewPick;
pub use remote::{Filter, OfflineGateway, RemoteError, RemoteGateway, Tables};
pub use store::{CacheKeys, DictionaryStore};
pub use suggestion::submit_suggestion;
pub use sync::{RemoteOp, SyncQueue, SyncWorker};
pub use table::{SortKey, TablePage, TableQuery};
