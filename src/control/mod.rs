//! Host-facing layer: stream lifecycle and the keypress-to-quit console.

/// Blocking wait for the operator to quit.
pub mod console;
/// cpal stream setup and teardown around a [`CallbackDriver`](crate::driver::CallbackDriver).
pub mod session;
