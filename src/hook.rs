//! `LD_PRELOAD` entry point: the exported `read` symbol.
//!
//! The hook installs itself on the first `read` in the process. Reads made
//! while installing, and every read on the command thread, go straight to
//! the real implementation.

use std::cell::Cell;
use std::ffi::{c_int, c_void, CStr};
use std::os::fd::RawFd;
use std::sync::OnceLock;
use std::thread;

use libc::{size_t, ssize_t};

use crate::boundary::{InterceptionBoundary, RawDeviceReader};
use crate::channel::{CommandChannel, CommandHandler};
use crate::config::Config;
use crate::context::HookContext;
use crate::device::{DeviceMatcher, DeviceProfile};
use crate::error::HookError;

type ReadFn = unsafe extern "C" fn(c_int, *mut c_void, size_t) -> ssize_t;

static REAL_READ: OnceLock<Result<ReadFn, String>> = OnceLock::new();
static HOOK: OnceLock<Option<Hook>> = OnceLock::new();

thread_local! {
    static BYPASS: Cell<bool> = const { Cell::new(false) };
}

struct Hook {
    matcher: DeviceMatcher,
    boundary: InterceptionBoundary,
}

fn real_read() -> Result<ReadFn, HookError> {
    REAL_READ
        .get_or_init(|| {
            // SAFETY: RTLD_NEXT lookup of a NUL-terminated symbol name.
            let sym = unsafe { libc::dlsym(libc::RTLD_NEXT, c"read".as_ptr()) };
            if sym.is_null() {
                // SAFETY: dlerror returns NULL or a valid C string.
                let err = unsafe { libc::dlerror() };
                let msg = if err.is_null() {
                    "symbol not found".to_string()
                } else {
                    unsafe { CStr::from_ptr(err) }.to_string_lossy().into_owned()
                };
                return Err(msg);
            }
            // SAFETY: libc's read has exactly this signature.
            Ok(unsafe { std::mem::transmute::<*mut c_void, ReadFn>(sym) })
        })
        .clone()
        .map_err(HookError::Symbol)
}

/// Mark the current thread so its reads skip the hook.
pub fn bypass_current_thread() {
    let _ = BYPASS.try_with(|b| b.set(true));
}

/// Threads whose thread-locals are already torn down always bypass.
fn bypassed() -> bool {
    BYPASS.try_with(|b| b.get()).unwrap_or(true)
}

struct BypassGuard {
    previous: bool,
}

impl BypassGuard {
    fn enter() -> Self {
        Self {
            previous: BYPASS.try_with(|b| b.replace(true)).unwrap_or(true),
        }
    }
}

impl Drop for BypassGuard {
    fn drop(&mut self) {
        let _ = BYPASS.try_with(|b| b.set(self.previous));
    }
}

fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

fn install() -> Result<Hook, HookError> {
    init_logging();
    let profile = DeviceProfile::current();
    log::info!("rm-inject starting (profile={})", profile.name);
    install_with(Config::load(profile))
}

/// Validate `config`, open the command channel and start its reader.
fn install_with(config: Config) -> Result<Hook, HookError> {
    config.validate()?;

    log::info!(
        "Injecting on {} from {} (suppression={}ms)",
        config.device_path.display(),
        config.fifo_path.display(),
        config.suppression.as_millis()
    );

    let channel = CommandChannel::create(&config.fifo_path)?;
    let matcher = DeviceMatcher::new(&config.device_path, &config.device_name);

    let ctx = HookContext::new(config);
    let (synth, boundary) = ctx.split();
    let handler = CommandHandler::new(ctx, synth);

    thread::Builder::new()
        .name("rm-inject-cmd".into())
        .spawn(move || {
            bypass_current_thread();
            channel.run(handler);
        })
        .map_err(HookError::Spawn)?;

    log::info!("Injection hook active");
    Ok(Hook { matcher, boundary })
}

fn hook() -> Option<&'static Hook> {
    HOOK.get_or_init(|| match install() {
        Ok(hook) => Some(hook),
        Err(e) => {
            log::error!("Injection hook disabled: {}", e);
            None
        }
    })
    .as_ref()
}

impl Hook {
    /// # Safety
    ///
    /// `buf` must be valid for `count` bytes.
    unsafe fn read(&self, fd: c_int, buf: *mut c_void, count: size_t, real: ReadFn) -> ssize_t {
        if !self.matcher.is_target(fd) {
            return real(fd, buf, count);
        }
        let bytes = std::slice::from_raw_parts_mut(buf.cast::<u8>(), count);
        self.boundary.read(&mut FdReader { fd, real }, bytes)
    }
}

/// The host's own read on the digitizer descriptor.
struct FdReader {
    fd: RawFd,
    real: ReadFn,
}

impl RawDeviceReader for FdReader {
    fn read(&mut self, buf: &mut [u8]) -> isize {
        // SAFETY: buf is a valid writable region of buf.len() bytes.
        unsafe { (self.real)(self.fd, buf.as_mut_ptr().cast(), buf.len()) }
    }
}

/// Interposed `read(2)`.
///
/// # Safety
///
/// Same contract as libc `read`: `buf` must be valid for `count` bytes.
#[cfg_attr(not(test), no_mangle)]
pub unsafe extern "C" fn read(fd: c_int, buf: *mut c_void, count: size_t) -> ssize_t {
    let real = match real_read() {
        Ok(real) => real,
        Err(_) => {
            *libc::__errno_location() = libc::ENOSYS;
            return -1;
        }
    };

    if bypassed() || buf.is_null() || count == 0 {
        return real(fd, buf, count);
    }
    let _guard = BypassGuard::enter();

    let Some(hook) = hook() else {
        return real(fd, buf, count);
    };

    hook.read(fd, buf, count, real)
}
