use env_logger::Target;
use std::fs;
use std::io;
use std::path::Path;

/// Initialize the global logger.
///
/// `RUST_LOG` overrides the default level. When `log_file` cannot be opened
/// (permissions, readonly FS, etc.) logs fall back to stderr.
pub fn init(verbose: bool, log_file: Option<&Path>) {
    let default_level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let mut fallback = None;
    let target = match log_file {
        Some(path) => open_log_file(path).unwrap_or_else(|err| {
            fallback = Some(format!("cannot open log file {}: {err}", path.display()));
            Target::Stderr
        }),
        None => Target::Stderr,
    };

    let installed = env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .target(target)
        .try_init();
    if let Err(err) = installed {
        // An earlier logger stays in charge.
        log::warn!("logger already initialized, keeping existing one: {err}");
        return;
    }

    if let Some(msg) = fallback {
        log::warn!("{msg}; logging to stderr");
    }
}

fn open_log_file(path: &Path) -> io::Result<Target> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Target::Pipe(Box::new(file)))
}
