//! Logging backend (ambient stack, SPEC_FULL.md "Logging"): a
//! `fern::Dispatch` to stderr, level controlled by `SYSDB_LOG`. Unlike the
//! one-shot lint CLI this is grounded on, `sysdbd` is a long-running
//! daemon, so it defaults to `Info` rather than `Off`.

/// `level_override` (from `--log-level` or the config file) wins over
/// `SYSDB_LOG`, which wins over the `Info` default.
pub fn init(level_override: Option<&str>) -> Result<(), log::SetLoggerError> {
    let level = level_override
        .and_then(|s| s.parse().ok())
        .or_else(|| std::env::var("SYSDB_LOG").ok().and_then(|s| s.parse().ok()))
        .unwrap_or(log::LevelFilter::Info);

    fern::Dispatch::new()
        .format(|out, message, record| out.finish(format_args!("[{}] {}", record.level(), message)))
        .level(level)
        .chain(std::io::stderr())
        .apply()
}
