use color_print::ceprintln;
use log::{Level, LevelFilter, Log, Metadata, Record};

struct Logger;

static LOGGER: Logger = Logger;

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match record.level() {
            Level::Error => ceprintln!("<red,bold>error</>: {}", record.args()),
            Level::Warn => ceprintln!("<yellow,bold>warn</>: {}", record.args()),
            Level::Info => ceprintln!("<green,bold>note</>: {}", record.args()),
            Level::Debug => ceprintln!("<blue>debug</>: {}", record.args()),
            Level::Trace => ceprintln!("<dim>trace</>: {}", record.args()),
        }
    }

    fn flush(&self) {}
}

/// Diagnostics go to stderr so they never mix with the listing on stdout.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
