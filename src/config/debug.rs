//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet. They are only consulted under `cfg(debug_assertions)`.

pub struct DebugFlags {
    /// Emit every bucket of the freshly computed profile.
    pub print_profile_buckets: bool,
    /// Emit request/response summaries for market data fetches.
    pub print_market_fetch: bool,
    /// Emit a line whenever a row is appended to the signal log.
    pub print_signal_log: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_profile_buckets: false,
    print_market_fetch: false,
    print_signal_log: true,
};
