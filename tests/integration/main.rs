//! mselink integration tests.
//!
//! These run entirely in-process: each test spins up a scripted WebSocket
//! server, then a real session with a real writer sink streams against it.
//! The output file is the observable append order.

mod failures;
mod harness;
mod streaming;

pub use harness::*;
