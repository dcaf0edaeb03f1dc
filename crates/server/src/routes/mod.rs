pub mod analysis;
pub mod export;
pub mod health;
pub mod parse;
pub mod usage;

/// Largest PGN accepted in one request.
pub const MAX_PGN_BYTES: usize = 50 * 1024 * 1024;
