use crate::config::LogConfig;

/// Installs the global logger. `RUST_LOG`, when set, wins over the
/// configured verbosity.
///
/// Logs go to stderr so they never interleave with the report.
pub fn init(config: &LogConfig) {
    let env = env_logger::Env::default().default_filter_or(config.filter());
    if env_logger::Builder::from_env(env)
        .target(env_logger::Target::Stderr)
        .format_timestamp_millis()
        .try_init()
        .is_err()
    {
        debug!("Logger already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_is_harmless() {
        init(&LogConfig::default());
        init(&LogConfig { verbosity: 3 });
    }
}
