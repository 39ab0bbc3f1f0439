// Library target exists solely for the integration tests in tests/.
// The binary entry point is main.rs; this file re-declares the module tree so
// the tests can import types via `quizdr::bank::*` / `quizdr::session::*`.
// Most code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

// Public: used directly by integration tests
pub mod bank;
pub mod session;
pub mod store;

// Private: required transitively (won't compile without them)
mod app;
mod config;
mod event;
mod ui;
