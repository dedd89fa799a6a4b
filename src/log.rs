use std::sync::Mutex;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::conf::Log;

/// Discard is a writer that discards all data written to it.
struct Discard;

impl std::io::Write for Discard {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// guards must outlive the subscriber, dropping them stops the writer threads
static LOG_WORKER_GUARDS: Mutex<Vec<WorkerGuard>> = Mutex::new(Vec::new());

/// Install the global subscriber from the `log` section of the settings.
/// Calling it again after a successful install does nothing.
pub fn logging_initialize() {
    let settings = crate::conf::settings_snapshot();
    logging_initialize_with(&settings.name, &settings.log_or_default());
}

pub fn logging_initialize_with(app_name: &str, log_conf: &Log) {
    let mut installed = match LOG_WORKER_GUARDS.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if !installed.is_empty() {
        return;
    }

    let (discard, discard_guard) = tracing_appender::non_blocking(Discard {});
    let (console, console_reload) = tracing_subscriber::reload::Layer::new(
        tracing_subscriber::fmt::layer().with_ansi(false).with_writer(discard.clone()),
    );
    let (persist, persist_reload) = tracing_subscriber::reload::Layer::new(
        tracing_subscriber::fmt::layer().with_ansi(false).with_writer(discard),
    );

    let mut guards: Vec<WorkerGuard> = vec![discard_guard];
    if log_conf.console {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        guards.push(guard);
        let layer = tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(true);
        if let Err(e) = console_reload.reload(layer) {
            eprintln!("console log layer reload failed: {}", e);
        }
    }

    if !log_conf.dirs.is_empty() {
        let prefix = format!("{}_client.log", app_name.to_lowercase());
        let appender = tracing_appender::rolling::daily(&log_conf.dirs, prefix);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        guards.push(guard);
        let layer = tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false);
        if let Err(e) = persist_reload.reload(layer) {
            eprintln!("persist log layer reload failed: {}", e);
        }
    }

    let filter = tracing_subscriber::EnvFilter::try_new(&log_conf.level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if tracing_subscriber::registry().with(console).with(persist).with(filter).try_init().is_err() {
        // another subscriber already owns the process, keep it
        return;
    }

    installed.extend(guards);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_is_idempotent() {
        let conf = Log { level: "not a [valid filter".into(), console: false, dirs: String::new() };
        logging_initialize_with("EduGlobal", &conf);
        logging_initialize_with("EduGlobal", &conf);
        tracing::info!("logging ready");
    }
}
