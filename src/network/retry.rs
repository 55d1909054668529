//! Delays for the student-list retry.

use futures::future::LocalBoxFuture;
use futures::FutureExt;

use crate::constants::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS};

/// Bounded retry for the student-list read-after-write race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            delay_ms: 0,
        }
    }
}

pub trait Sleeper {
    fn sleep(&self, delay_ms: u32) -> LocalBoxFuture<'static, ()>;
}

/// Completes immediately. For hosts and tests that must not wait.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

impl Sleeper for NoDelay {
    fn sleep(&self, _delay_ms: u32) -> LocalBoxFuture<'static, ()> {
        futures::future::ready(()).boxed_local()
    }
}

/// Browser timer backed by `setTimeout`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct GlooSleeper;

#[cfg(target_arch = "wasm32")]
impl Sleeper for GlooSleeper {
    fn sleep(&self, delay_ms: u32) -> LocalBoxFuture<'static, ()> {
        gloo_timers::future::TimeoutFuture::new(delay_ms).boxed_local()
    }
}
