//! Small crate-wide logging macros.
//!
//! Both forward to the browser console through `web_sys::console` when the
//! crate runs as WASM. On native targets (unit tests, tooling) the arguments
//! are still type-checked but nothing is printed.

/// Debug-level log line, compiled in for debug builds only.
///
/// ```rust,ignore
/// debug_log!("route {} answered {}", name, status);
/// ```
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{
        #[cfg(all(target_arch = "wasm32", debug_assertions))]
        web_sys::console::debug_1(&format!($($arg)*).into());
        #[cfg(not(all(target_arch = "wasm32", debug_assertions)))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}

/// Warning-level log line, always emitted in the browser.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        web_sys::console::warn_1(&format!($($arg)*).into());
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}
