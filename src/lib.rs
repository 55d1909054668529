//! Browser-side client for the classroom service: bearer-token session,
//! class/student CRUD, class-list route discovery and a race-tolerant
//! student-list read.
//!
//! The core is target-independent and talks to the outside world through
//! `HttpTransport`, `KeyValueStore` and `Sleeper`. The `bindings` module
//! wires those to `fetch`, Web Storage and `setTimeout` when compiled to WASM.

mod macros;

pub mod cache;
pub mod classroom;
pub mod constants;
pub mod errors;
pub mod network;
pub mod session;
pub mod storage;
pub mod utils;

#[cfg(target_arch = "wasm32")]
mod bindings;

#[cfg(test)]
mod tests;

pub use classroom::ClassroomApi;
pub use errors::{ApiError, HttpFailure};
pub use network::{ApiConfig, ClassList, RetryPolicy, SessionExpired};
pub use session::SessionStore;
pub use storage::{KeyValueStore, MemoryStore};

#[cfg(target_arch = "wasm32")]
pub use bindings::ClassroomClient;
