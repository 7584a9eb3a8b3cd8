//! Env-var helpers shared by service `from_env()` constructors.

/// Read a required env var.
///
/// # Panics
///
/// Panics with the variable name if it is missing. Services load config
/// once at startup, so a missing var should stop the process immediately.
pub fn required(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("missing required env var {name}"))
}

/// Read an optional env var.
pub fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Read an env var and parse it, falling back to `default` when the var is
/// missing or unparseable.
pub fn parsed_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
