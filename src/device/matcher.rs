//! Decide whether a file descriptor refers to the pen digitizer.
//!
//! Identity is the character device number, so the host may reopen or dup
//! the node freely. When the configured node can't be resolved, evdev nodes
//! are classified once by their reported name.

use std::collections::HashMap;
use std::ffi::CStr;
use std::fs;
use std::os::fd::RawFd;
use std::os::unix::fs::{FileTypeExt, MetadataExt};
use std::path::Path;
use std::sync::Mutex;

/// Major number of the Linux input subsystem (`/dev/input/*`).
const INPUT_MAJOR: libc::c_uint = 13;

/// Length of the buffer handed to EVIOCGNAME.
const NAME_LEN: usize = 256;

pub struct DeviceMatcher {
    target: Target,
}

enum Target {
    Rdev(u64),
    Name {
        hint: String,
        verdicts: Mutex<HashMap<u64, bool>>,
    },
}

impl DeviceMatcher {
    /// Resolve `path` now; fall back to name matching against `name_hint`.
    pub fn new(path: &Path, name_hint: &str) -> Self {
        match char_device_of_path(path) {
            Some(rdev) => {
                log::info!("Watching {} (device {:#x})", path.display(), rdev);
                Self::by_rdev(rdev)
            }
            None => {
                log::warn!(
                    "{} is not a character device, matching input devices named *{}*",
                    path.display(),
                    name_hint
                );
                Self::by_name(name_hint)
            }
        }
    }

    pub fn by_rdev(rdev: u64) -> Self {
        Self {
            target: Target::Rdev(rdev),
        }
    }

    pub fn by_name(hint: &str) -> Self {
        Self {
            target: Target::Name {
                hint: hint.to_string(),
                verdicts: Mutex::new(HashMap::new()),
            },
        }
    }

    /// True when `fd` is an open handle on the digitizer.
    pub fn is_target(&self, fd: RawFd) -> bool {
        let Some(rdev) = char_device_of_fd(fd) else {
            return false;
        };

        match &self.target {
            Target::Rdev(want) => rdev == *want,
            Target::Name { hint, verdicts } => {
                if libc::major(rdev as libc::dev_t) != INPUT_MAJOR {
                    return false;
                }
                let mut verdicts = verdicts.lock().unwrap_or_else(|e| e.into_inner());
                *verdicts.entry(rdev).or_insert_with(|| {
                    let name = device_name(fd).unwrap_or_default();
                    let matched = name_matches(&name, hint);
                    if matched {
                        log::info!("Digitizer detected: '{}' (fd {}, device {:#x})", name, fd, rdev);
                    } else {
                        log::debug!("Ignoring input device '{}' (device {:#x})", name, rdev);
                    }
                    matched
                })
            }
        }
    }
}

/// Reported device name contains the configured hint.
pub fn name_matches(name: &str, hint: &str) -> bool {
    !hint.is_empty() && name.contains(hint)
}

fn char_device_of_path(path: &Path) -> Option<u64> {
    let meta = fs::metadata(path).ok()?;
    meta.file_type().is_char_device().then(|| meta.rdev())
}

fn char_device_of_fd(fd: RawFd) -> Option<u64> {
    // SAFETY: fstat only writes into the zeroed stat buffer we own.
    let mut st: libc::stat = unsafe { std::mem::zeroed() };
    if unsafe { libc::fstat(fd, &mut st) } != 0 {
        return None;
    }
    if st.st_mode & libc::S_IFMT != libc::S_IFCHR {
        return None;
    }
    Some(st.st_rdev as u64)
}

/// EVIOCGNAME(len): _IOC(_IOC_READ, 'E', 0x06, len).
const fn eviocgname(len: usize) -> u32 {
    (2 << 30) | ((len as u32) << 16) | ((b'E' as u32) << 8) | 0x06
}

fn device_name(fd: RawFd) -> Option<String> {
    let mut buf = [0u8; NAME_LEN];
    // SAFETY: the kernel writes at most NAME_LEN bytes into buf.
    let rc = unsafe { libc::ioctl(fd, eviocgname(NAME_LEN) as _, buf.as_mut_ptr()) };
    if rc < 0 {
        return None;
    }
    buf[NAME_LEN - 1] = 0;
    let name = CStr::from_bytes_until_nul(&buf).ok()?;
    Some(name.to_string_lossy().into_owned())
}
