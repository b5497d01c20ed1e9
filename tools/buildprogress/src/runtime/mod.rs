use crate::errors::ProgressError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Monotonic time source. Values are nanoseconds since an arbitrary origin
/// and are only meaningful relative to each other.
pub trait Clock: Send + Sync {
    fn now_nanos(&self) -> u64;
}

pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> Result<String, ProgressError>;
}

pub trait Terminal: Send + Sync {
    fn is_tty(&self) -> bool;
    fn write_line(&self, line: &str) -> Result<(), ProgressError>;
    fn draw(&self, frame: &str) -> Result<(), ProgressError>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct ProductionClock {
    origin: Instant,
}

impl ProductionClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for ProductionClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ProductionClock {
    fn now_nanos(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}

pub struct ProductionFileSystem;

impl FileSystem for ProductionFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, ProgressError> {
        std::fs::read_to_string(path)
            .map_err(|e| ProgressError::Io(format!("{}: {e}", path.display())))
    }
}

pub struct ProductionTerminal;

impl Terminal for ProductionTerminal {
    fn is_tty(&self) -> bool {
        std::io::IsTerminal::is_terminal(&std::io::stdout())
    }

    fn write_line(&self, line: &str) -> Result<(), ProgressError> {
        use std::io::Write;
        let mut out = std::io::stdout();
        writeln!(out, "{line}").map_err(|e| ProgressError::Io(e.to_string()))
    }

    fn draw(&self, frame: &str) -> Result<(), ProgressError> {
        self.write_line(frame)
    }
}

pub struct ProductionRuntime {
    pub clock: Arc<dyn Clock>,
    pub file_system: Arc<dyn FileSystem>,
    pub terminal: Arc<dyn Terminal>,
}

impl ProductionRuntime {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(ProductionClock::new()),
            file_system: Arc::new(ProductionFileSystem),
            terminal: Arc::new(ProductionTerminal),
        }
    }
}

impl Default for ProductionRuntime {
    fn default() -> Self {
        Self::new()
    }
}

/// Manually advanced clock. Clones share the same instant.
#[derive(Clone, Default)]
pub struct FakeClock {
    now: Arc<Mutex<u64>>,
}

impl FakeClock {
    pub fn new(now_nanos: u64) -> Self {
        Self {
            now: Arc::new(Mutex::new(now_nanos)),
        }
    }

    pub fn set_nanos(&self, now_nanos: u64) {
        *lock(&self.now) = now_nanos;
    }

    pub fn advance(&self, by: Duration) {
        let by = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        let mut now = lock(&self.now);
        *now = now.saturating_add(by);
    }

    pub fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }
}

impl Clock for FakeClock {
    fn now_nanos(&self) -> u64 {
        *lock(&self.now)
    }
}

#[derive(Default, Clone)]
pub struct FakeFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl FakeFileSystem {
    pub fn with_file(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        let fs = Self::default();
        fs.insert(path, contents);
        fs
    }

    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        lock(&self.files).insert(path.into(), contents.into());
    }
}

impl FileSystem for FakeFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, ProgressError> {
        lock(&self.files)
            .get(path)
            .cloned()
            .ok_or_else(|| ProgressError::Io(format!("missing file {}", path.display())))
    }
}

#[derive(Default, Clone)]
pub struct FakeTerminal {
    pub is_tty: bool,
    writes: Arc<Mutex<Vec<String>>>,
    draws: Arc<Mutex<Vec<String>>>,
}

impl FakeTerminal {
    pub fn new(is_tty: bool) -> Self {
        Self {
            is_tty,
            ..Self::default()
        }
    }

    pub fn written_lines(&self) -> Vec<String> {
        lock(&self.writes).clone()
    }

    pub fn drawn_frames(&self) -> Vec<String> {
        lock(&self.draws).clone()
    }
}

impl Terminal for FakeTerminal {
    fn is_tty(&self) -> bool {
        self.is_tty
    }

    fn write_line(&self, line: &str) -> Result<(), ProgressError> {
        lock(&self.writes).push(line.to_string());
        Ok(())
    }

    fn draw(&self, frame: &str) -> Result<(), ProgressError> {
        lock(&self.draws).push(frame.to_string());
        Ok(())
    }
}
