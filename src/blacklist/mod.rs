// Blacklist gate: the first and strongest tier of the cascade.
//
// A URL is blacklisted if it appears (exact string match) in the local
// list loaded at startup or in the remote feed. The remote feed is fetched
// over HTTP; a failed fetch degrades that check to local-only instead of
// failing the classification.

pub mod gate;
pub mod remote;

pub use gate::{parse_entries, BlacklistConfig, BlacklistGate, BlacklistSource};
pub use remote::RemoteBlacklist;
