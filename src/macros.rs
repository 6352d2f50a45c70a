//! `info!` and `error!` accept any mix of `Display` arguments.
//!
//! ```ignore
//! rlog::info!("listening on", port);
//! rlog::error!(db => "query failed:", err);
//! ```

/// Filtered informational emission. Prefix with `logger =>` to use a handle.
#[macro_export]
macro_rules! info {
    ($logger:expr => $($arg:expr),* $(,)?) => {{
        let args: &[&dyn ::std::fmt::Display] = &[$(&$arg),*];
        $logger.info(args)
    }};
    ($($arg:expr),* $(,)?) => {{
        let args: &[&dyn ::std::fmt::Display] = &[$(&$arg),*];
        $crate::info(args)
    }};
}

/// Unconditional error emission. Prefix with `logger =>` to use a handle.
#[macro_export]
macro_rules! error {
    ($logger:expr => $($arg:expr),* $(,)?) => {{
        let args: &[&dyn ::std::fmt::Display] = &[$(&$arg),*];
        $logger.error(args)
    }};
    ($($arg:expr),* $(,)?) => {{
        let args: &[&dyn ::std::fmt::Display] = &[$(&$arg),*];
        $crate::error(args)
    }};
}
