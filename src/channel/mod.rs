//! The command FIFO and the background thread that drains it.
//!
//! The FIFO's existence is what collaborators poll to see whether the hook
//! is live, so it is created before the reader starts and never removed.

mod lines;

pub use lines::{LineBuffer, MAX_LINE};

use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::{FileTypeExt, OpenOptionsExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::command::{Command, MAX_DELAY_MS};
use crate::context::HookContext;
use crate::error::HookError;
use crate::synth::Synthesizer;

const REOPEN_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct CommandChannel {
    path: PathBuf,
}

impl CommandChannel {
    /// Create the FIFO (mode 0666) if needed and check that it can be opened.
    pub fn create(path: &Path) -> Result<Self, HookError> {
        let create_err = |source| HookError::ChannelCreate {
            path: path.to_path_buf(),
            source,
        };

        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|e| create_err(io::Error::new(io::ErrorKind::InvalidInput, e)))?;
        // SAFETY: c_path is a valid NUL-terminated string for the call's duration.
        if unsafe { libc::mkfifo(c_path.as_ptr(), 0o666) } != 0 {
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::AlreadyExists {
                return Err(create_err(err));
            }
        }
        // mkfifo honours the umask; collaborators write as other users.
        // SAFETY: as above.
        if unsafe { libc::chmod(c_path.as_ptr(), 0o666) } != 0 {
            log::warn!(
                "Failed to chmod {}: {}, other users may not be able to write",
                path.display(),
                io::Error::last_os_error()
            );
        }

        let meta = std::fs::metadata(path).map_err(create_err)?;
        if !meta.file_type().is_fifo() {
            return Err(HookError::ChannelNotFifo {
                path: path.to_path_buf(),
            });
        }

        // Read-only non-blocking open succeeds on a FIFO without a writer.
        OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)
            .map_err(create_err)?;

        log::info!("Command channel ready at {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serve writers one after another, forever.
    pub fn run(self, mut handler: CommandHandler) {
        let mut lines = LineBuffer::new();
        loop {
            // Blocks until a writer opens the other end.
            let file = match File::open(&self.path) {
                Ok(file) => file,
                Err(e) => {
                    log::warn!("Failed to open {}: {}, retrying", self.path.display(), e);
                    thread::sleep(REOPEN_DELAY);
                    continue;
                }
            };

            log::debug!("Command writer connected");
            if let Err(e) = pump(file, &mut lines, &mut handler) {
                log::warn!("Command channel read failed: {}", e);
            }
            log::debug!("Command writer disconnected");
        }
    }
}

/// Read `reader` to EOF, handing each complete line to `handler`.
pub fn pump<R: Read>(
    mut reader: R,
    lines: &mut LineBuffer,
    handler: &mut CommandHandler,
) -> io::Result<()> {
    let mut buf = [0u8; 4096];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                lines.flush(|line| handler.handle_line(line));
                return Err(e);
            }
        };
        lines.push(&buf[..n], |line| handler.handle_line(line));
    }
    lines.flush(|line| handler.handle_line(line));
    Ok(())
}

/// Turns protocol lines into synthesizer input.
pub struct CommandHandler {
    ctx: Arc<HookContext>,
    synth: Synthesizer,
    accepted: u64,
    rejected: u64,
}

impl CommandHandler {
    pub fn new(ctx: Arc<HookContext>, synth: Synthesizer) -> Self {
        Self {
            ctx,
            synth,
            accepted: 0,
            rejected: 0,
        }
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    pub fn handle_line(&mut self, line: &str) {
        let command = match Command::parse_line(line) {
            Ok(Some(command)) => command,
            Ok(None) => return,
            Err(e) => {
                self.rejected += 1;
                log::warn!("Skipping command line '{}': {}", line.trim(), e);
                return;
            }
        };
        self.accepted += 1;
        self.handle(&command);
    }

    fn handle(&mut self, command: &Command) {
        match *command {
            Command::GetCursor => match self.ctx.cursor.position() {
                Some((x, y)) => log::info!("Pen cursor: X={} Y={}", x, y),
                None => log::info!("Pen cursor: no genuine pen input seen yet"),
            },
            Command::Delay(delay) => {
                let ms = delay.as_millis() as u64;
                if (1..=MAX_DELAY_MS).contains(&ms) {
                    thread::sleep(delay);
                } else {
                    log::warn!("Ignoring DELAY {}ms (allowed 1..={})", ms, MAX_DELAY_MS);
                }
            }
            _ => {
                self.synth.submit(command);
            }
        }
    }
}
