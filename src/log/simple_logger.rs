use std::io::Write;
use std::sync::Mutex;

#[cfg(feature = "dev")]
use std::path::Path;

use log::Log;

/// Writes every record on its own line to the wrapped writer, with a fixed
/// prefix. IO errors are swallowed: a shell must not die because its
/// diagnostics stream did.
pub struct SimpleLogger<W: Write + Send> {
    target: Mutex<W>,
    prefix: &'static str,
}

impl<W: Write + Send> SimpleLogger<W> {
    fn new(target: W, prefix: &'static str) -> Self {
        Self {
            target: Mutex::new(target),
            prefix,
        }
    }
}

impl SimpleLogger<std::io::Stderr> {
    pub fn to_stderr(prefix: &'static str) -> Self {
        Self::new(std::io::stderr(), prefix)
    }
}

#[cfg(feature = "dev")]
impl SimpleLogger<std::fs::File> {
    pub fn to_file<P: AsRef<Path>>(name: P, prefix: &'static str) -> std::io::Result<Self> {
        let target = std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(name)?;
        Ok(Self::new(target, prefix))
    }
}

impl<W: Write + Send> Log for SimpleLogger<W> {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level() && metadata.level() <= log::STATIC_MAX_LEVEL
    }

    fn log(&self, record: &log::Record) {
        if let Ok(mut target) = self.target.lock() {
            let _ = writeln!(target, "{}{}", self.prefix, record.args());
        }
    }

    fn flush(&self) {
        if let Ok(mut target) = self.target.lock() {
            let _ = target.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SimpleLogger;
    use log::{LevelFilter, Log};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Sink(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Sink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn respects_max_level() {
        let logger = SimpleLogger::to_stderr("test: ");
        let metadata = log::Metadata::builder().level(log::Level::Trace).build();

        log::set_max_level(LevelFilter::Trace);
        assert!(logger.enabled(&metadata));

        log::set_max_level(LevelFilter::Info);
        assert!(!logger.enabled(&metadata));
    }

    #[test]
    fn prefixes_each_record() {
        let sink = Sink::default();
        let logger = SimpleLogger::new(sink.clone(), "minsh: ");

        let record = log::Record::builder()
            .args(format_args!("no such directory"))
            .level(log::Level::Error)
            .build();
        logger.log(&record);

        let written = sink.0.lock().unwrap().clone();
        assert_eq!(String::from_utf8(written).unwrap(), "minsh: no such directory\n");
    }
}
