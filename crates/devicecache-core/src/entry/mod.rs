//! Cache entry model and its versioned on-disk codec.

mod codec;
mod types;

pub use codec::{decode_entry, encode_entry, FORMAT_VERSION};
pub use types::{BotInfo, CacheEntry, ClientHints, ClientInfo, OsInfo};
