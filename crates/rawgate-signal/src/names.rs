//! Signal name table.
//!
//! Names are the POSIX names without the `SIG` prefix (`"INT"`, `"USR1"`).
//! Lookups also accept the prefixed form.

use crate::error::SignalError;

#[cfg(unix)]
const HANDLEABLE: &[(&str, libc::c_int)] = &[
    ("HUP", libc::SIGHUP),
    ("INT", libc::SIGINT),
    ("QUIT", libc::SIGQUIT),
    ("TRAP", libc::SIGTRAP),
    ("ABRT", libc::SIGABRT),
    ("USR1", libc::SIGUSR1),
    ("USR2", libc::SIGUSR2),
    ("PIPE", libc::SIGPIPE),
    ("ALRM", libc::SIGALRM),
    ("TERM", libc::SIGTERM),
    ("CHLD", libc::SIGCHLD),
    ("CONT", libc::SIGCONT),
    ("TSTP", libc::SIGTSTP),
    ("TTIN", libc::SIGTTIN),
    ("TTOU", libc::SIGTTOU),
    ("URG", libc::SIGURG),
    ("XCPU", libc::SIGXCPU),
    ("XFSZ", libc::SIGXFSZ),
    ("VTALRM", libc::SIGVTALRM),
    ("PROF", libc::SIGPROF),
    ("WINCH", libc::SIGWINCH),
    ("IO", libc::SIGIO),
    ("SYS", libc::SIGSYS),
];

/// Uncatchable, or synchronous faults that must stay with the runtime.
#[cfg(unix)]
const RESERVED: &[(&str, libc::c_int)] = &[
    ("KILL", libc::SIGKILL),
    ("STOP", libc::SIGSTOP),
    ("SEGV", libc::SIGSEGV),
    ("BUS", libc::SIGBUS),
    ("FPE", libc::SIGFPE),
    ("ILL", libc::SIGILL),
];

#[cfg(not(unix))]
const HANDLEABLE: &[(&str, i32)] = &[];

#[cfg(not(unix))]
const RESERVED: &[(&str, i32)] = &[];

fn bare(name: &str) -> &str {
    name.strip_prefix("SIG").unwrap_or(name)
}

/// The number of the handleable signal called `name`.
pub fn signal_number(name: &str) -> Result<i32, SignalError> {
    let key = bare(name);
    if let Some(&(_, number)) = HANDLEABLE.iter().find(|(n, _)| *n == key) {
        return Ok(number);
    }
    if RESERVED.iter().any(|(n, _)| *n == key) {
        return Err(SignalError::Reserved {
            name: name.to_string(),
        });
    }
    Err(SignalError::Unknown {
        name: name.to_string(),
    })
}

/// The unprefixed name of a signal number, if it is known.
pub fn signal_name(number: i32) -> Option<&'static str> {
    HANDLEABLE
        .iter()
        .chain(RESERVED)
        .find(|(_, n)| *n == number)
        .map(|(name, _)| *name)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn prefixed_and_bare_names_agree() {
        assert_eq!(signal_number("USR1").unwrap(), libc::SIGUSR1);
        assert_eq!(signal_number("SIGUSR1").unwrap(), libc::SIGUSR1);
        assert_eq!(signal_number("INT").unwrap(), libc::SIGINT);
    }

    #[test]
    fn reserved_and_unknown_are_distinguished() {
        for name in ["KILL", "SIGSTOP", "SEGV", "BUS", "FPE", "ILL"] {
            assert!(
                matches!(signal_number(name), Err(SignalError::Reserved { .. })),
                "{name}"
            );
        }
        for name in ["", "SIG", "usr1", "BOGUS"] {
            assert!(
                matches!(signal_number(name), Err(SignalError::Unknown { .. })),
                "{name:?}"
            );
        }
    }

    #[test]
    fn names_round_trip() {
        for &(name, number) in HANDLEABLE {
            assert_eq!(signal_name(number), Some(name));
            assert_eq!(signal_number(name).unwrap(), number);
        }
        assert_eq!(signal_name(libc::SIGKILL), Some("KILL"));
    }
}
