use chrono::Local;
use log::LevelFilter;
use std::io::{self, Write};

use env_logger::{Builder, Target};

/// Multi-writer for logging to both a file and the terminal
struct DualWriter<F, T> {
    file: F,
    terminal: T,
}

impl<F: Write, T: Write> Write for DualWriter<F, T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write_all(buf)?;
        self.terminal.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        self.terminal.flush()?;
        Ok(())
    }
}

/// Stdout carries `--json` output, so the terminal half is always stderr.
fn file_and_stderr(file: std::fs::File) -> DualWriter<std::fs::File, io::Stderr> {
    DualWriter {
        file,
        terminal: io::stderr(),
    }
}

/// Initialize logging: terminal only, or terminal plus `PYRSIM_LOG_FILE` when set.
pub fn init_common() {
    if let Ok(path) = std::env::var("PYRSIM_LOG_FILE") {
        if let Err(err) = init_dual_logger(&path) {
            eprintln!("Failed to initialize file logger at '{path}': {err}");
            init_terminal_logger();
        }
    } else {
        init_terminal_logger();
    }
}

fn base_builder() -> Builder {
    let mut builder = Builder::new();
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {:<5} {}",
                Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(LevelFilter::Info)
        .parse_default_env();
    builder
}

fn init_terminal_logger() {
    // Keep stdout free for --json output.
    base_builder().target(Target::Stderr).init();
}

/// Initialize dual logger (outputs to both file and terminal)
fn init_dual_logger(path: &str) -> io::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    base_builder()
        .target(Target::Pipe(Box::new(file_and_stderr(file))))
        .init();

    log::info!("Logging to file {path} and stderr");

    Ok(())
}
