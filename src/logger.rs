use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::LevelFilter;

pub const LOG_FILENAME: &str = "umccrise.log";

/// Writes every log line to the log file and echoes it to stderr.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write_all(buf)?;
        io::stderr().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        io::stderr().flush()
    }
}

/// Move an existing log out of the way, to the first free `{name}.N`.
/// Returns where the old log went, if there was one.
pub fn save_previous(log_path: &Path) -> io::Result<Option<PathBuf>> {
    if !log_path.exists() {
        return Ok(None);
    }
    let mut n = 1;
    let rotated = loop {
        let candidate = PathBuf::from(format!("{}.{n}", log_path.display()));
        if !candidate.exists() {
            break candidate;
        }
        n += 1;
    };
    fs::rename(log_path, &rotated)?;
    Ok(Some(rotated))
}

/// Start logging to `{output_dir}/umccrise.log`, keeping any previous log.
///
/// Safe to call again, the backend swaps its sink for the new file.
pub fn init(output_dir: &Path, level: LevelFilter) -> io::Result<PathBuf> {
    let log_path = output_dir.join(LOG_FILENAME);
    let previous = save_previous(&log_path)?;
    let file = File::create(&log_path)?;
    simple_logging::log_to(Tee { file }, level);
    if let Some(previous) = previous {
        log::debug!("Previous log saved to {}", previous.display());
    }
    Ok(log_path)
}
