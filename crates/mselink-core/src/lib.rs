//! mselink-core: shared types, control protocol, and configuration.
//! All other mselink crates depend on this one.

pub mod chunk;
pub mod codec;
pub mod config;
pub mod control;

pub use chunk::Chunk;
pub use codec::CodecSpec;
