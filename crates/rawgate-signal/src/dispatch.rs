//! Handler registry and the self-pipe dispatcher.
//!
//! The installed `sigaction` handler only writes the signal number to a
//! non-blocking pipe, which is async-signal-safe. A dedicated thread reads
//! the pipe and invokes the registered Rust handler, so handlers run in
//! ordinary thread context and may lock, allocate and log.
//!
//! Bursts of the same signal may be coalesced if the pipe is full; this
//! matches the kernel's own coalescing of pending standard signals.

#![allow(unsafe_code)]

use std::fs::File;
use std::io::{self, Read};
use std::os::fd::{FromRawFd, RawFd};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};
use std::thread;

use indexmap::IndexMap;
use log::{debug, warn};

use crate::error::SignalError;
use crate::names::{signal_name, signal_number};
use crate::Handler;

/// Write end of the self-pipe; -1 until the dispatcher starts.
static PIPE_WRITE: AtomicI32 = AtomicI32::new(-1);

static REGISTRY: LazyLock<Mutex<Registry>> = LazyLock::new(|| Mutex::new(Registry::default()));

#[derive(Default)]
struct Registry {
    handlers: IndexMap<i32, Handler>,
    started: bool,
}

fn registry() -> MutexGuard<'static, Registry> {
    // Handlers run outside the lock, so poisoning only means a registration
    // call panicked midway; the map itself stays consistent.
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

extern "C" fn on_signal(signum: libc::c_int) {
    let fd = PIPE_WRITE.load(Ordering::Relaxed);
    if fd < 0 {
        return;
    }
    let byte = signum as u8;
    let errno = io::Error::last_os_error().raw_os_error();
    // SAFETY: write(2) is async-signal-safe; `byte` outlives the call. A
    // full pipe (EAGAIN) drops the notification.
    unsafe {
        libc::write(fd, (&byte as *const u8).cast(), 1);
    }
    // The interrupted code must observe the errno it had before the signal.
    if let Some(errno) = errno {
        set_errno(errno);
    }
}

#[cfg(any(target_os = "linux", target_os = "emscripten"))]
use libc::__errno_location as errno_location;
#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
use libc::__error as errno_location;
#[cfg(any(target_os = "android", target_os = "netbsd", target_os = "openbsd"))]
use libc::__errno as errno_location;

#[cfg(any(
    target_os = "linux",
    target_os = "emscripten",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "android",
    target_os = "netbsd",
    target_os = "openbsd",
))]
fn set_errno(value: libc::c_int) {
    // SAFETY: the errno location is thread-local and always valid.
    unsafe { *errno_location() = value };
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "emscripten",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "android",
    target_os = "netbsd",
    target_os = "openbsd",
)))]
fn set_errno(_value: libc::c_int) {}

fn cvt(ret: libc::c_int) -> io::Result<libc::c_int> {
    if ret == -1 {
        Err(io::Error::last_os_error())
    } else {
        Ok(ret)
    }
}

fn set_flags(fd: RawFd, nonblocking: bool) -> io::Result<()> {
    // SAFETY: `fd` is an open descriptor owned by this module.
    unsafe {
        let fd_flags = cvt(libc::fcntl(fd, libc::F_GETFD))?;
        cvt(libc::fcntl(fd, libc::F_SETFD, fd_flags | libc::FD_CLOEXEC))?;
        if nonblocking {
            let fl = cvt(libc::fcntl(fd, libc::F_GETFL))?;
            cvt(libc::fcntl(fd, libc::F_SETFL, fl | libc::O_NONBLOCK))?;
        }
    }
    Ok(())
}

fn start_dispatcher() -> io::Result<()> {
    let mut fds = [0 as RawFd; 2];
    // SAFETY: `fds` has room for the two descriptors pipe(2) returns.
    cvt(unsafe { libc::pipe(fds.as_mut_ptr()) })?;
    let [read_fd, write_fd] = fds;
    // SAFETY: `read_fd` was just created and is owned by nobody else.
    let reader = unsafe { File::from_raw_fd(read_fd) };
    let setup = set_flags(read_fd, false).and_then(|()| set_flags(write_fd, true));
    if let Err(e) = setup {
        // SAFETY: closing the descriptor we just created.
        unsafe { libc::close(write_fd) };
        return Err(e);
    }

    thread::Builder::new()
        .name("rawgate-signal".into())
        .spawn(move || dispatch_loop(reader))
        .inspect_err(|_| {
            // SAFETY: as above; the reader closed when the closure dropped.
            unsafe { libc::close(write_fd) };
        })?;
    PIPE_WRITE.store(write_fd, Ordering::Release);
    Ok(())
}

fn dispatch_loop(mut reader: File) {
    let mut buf = [0u8; 64];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => {
                debug!("signal pipe closed, dispatcher exiting");
                return;
            }
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("signal pipe read failed, dispatcher exiting: {e}");
                return;
            }
        };
        for &byte in &buf[..n] {
            let signum = i32::from(byte);
            let handler = registry().handlers.get(&signum).cloned();
            match handler {
                Some(handler) => {
                    let name = signal_name(signum).unwrap_or("?");
                    debug!("dispatching SIG{name} ({signum})");
                    // One panicking handler must not take the dispatcher, and
                    // every other registration, down with it.
                    if panic::catch_unwind(AssertUnwindSafe(|| handler(signum, name))).is_err() {
                        warn!("handler for SIG{name} ({signum}) panicked");
                    }
                }
                None => debug!("signal {signum} arrived with no handler registered"),
            }
        }
    }
}

fn install(signum: i32, disposition: libc::sighandler_t) -> io::Result<()> {
    // SAFETY: a zeroed sigaction is a valid starting value; the mask is
    // initialised with sigemptyset before use.
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = disposition;
        action.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&mut action.sa_mask);
        cvt(libc::sigaction(signum, &action, std::ptr::null_mut()))?;
    }
    Ok(())
}

pub(crate) fn handle(name: &str, handler: Handler) -> Result<Option<Handler>, SignalError> {
    let signum = signal_number(name)?;
    let mut registry = registry();
    if !registry.started {
        start_dispatcher()?;
        registry.started = true;
    }
    if !registry.handlers.contains_key(&signum) {
        install(signum, on_signal as extern "C" fn(libc::c_int) as libc::sighandler_t)?;
    }
    debug!("registered handler for {name} ({signum})");
    Ok(registry.handlers.insert(signum, handler))
}

pub(crate) fn reset(name: &str) -> Result<Option<Handler>, SignalError> {
    let signum = signal_number(name)?;
    let mut registry = registry();
    let previous = registry.handlers.shift_remove(&signum);
    if previous.is_some() {
        install(signum, libc::SIG_DFL)?;
    }
    Ok(previous)
}

pub(crate) fn is_handled(name: &str) -> Result<bool, SignalError> {
    let signum = signal_number(name)?;
    Ok(registry().handlers.contains_key(&signum))
}
