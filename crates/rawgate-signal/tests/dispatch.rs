//! Integration test: raised signals reach the registered handler on the
//! dispatcher thread.
//!
//! Each test owns a distinct signal so the tests can run in parallel
//! within one process.

#![cfg(unix)]

use std::time::Duration;

use crossbeam_channel::{unbounded, RecvTimeoutError};
use rawgate_signal::{handle, is_handled, reset, SignalError};

const TIMEOUT: Duration = Duration::from_secs(5);

fn raise(signum: i32) {
    // SAFETY: raise(3) has no memory-safety preconditions; the signal has
    // a handler installed so the process is not terminated.
    let rc = unsafe { libc::raise(signum) };
    assert_eq!(rc, 0);
}

#[test]
fn handler_receives_number_and_name() {
    let (tx, rx) = unbounded();
    handle("USR1", move |number, name| {
        let thread = std::thread::current().name().map(str::to_string);
        tx.send((number, name.to_string(), thread)).unwrap();
    })
    .unwrap();

    raise(libc::SIGUSR1);
    let (number, name, thread) = rx.recv_timeout(TIMEOUT).unwrap();
    assert_eq!(number, libc::SIGUSR1);
    assert_eq!(name, "USR1");
    assert_eq!(thread.as_deref(), Some("rawgate-signal"));
}

#[test]
fn reregistering_returns_previous_handler() {
    let (first_tx, first_rx) = unbounded();
    let (second_tx, second_rx) = unbounded();

    let previous = handle("SIGUSR2", move |n, _| first_tx.send(n).unwrap()).unwrap();
    assert!(previous.is_none());
    let previous = handle("USR2", move |n, _| second_tx.send(n).unwrap()).unwrap();
    let previous = previous.expect("first handler returned");

    raise(libc::SIGUSR2);
    assert_eq!(second_rx.recv_timeout(TIMEOUT).unwrap(), libc::SIGUSR2);
    assert_eq!(
        first_rx.recv_timeout(Duration::from_millis(200)),
        Err(RecvTimeoutError::Timeout)
    );

    // The returned handler is still callable directly.
    previous(libc::SIGUSR2, "USR2");
    assert_eq!(first_rx.recv_timeout(TIMEOUT).unwrap(), libc::SIGUSR2);
}

#[test]
fn reset_removes_handler() {
    handle("WINCH", |_, _| {}).unwrap();
    assert!(is_handled("WINCH").unwrap());
    assert!(reset("WINCH").unwrap().is_some());
    assert!(!is_handled("WINCH").unwrap());
    assert!(reset("WINCH").unwrap().is_none());
}

#[test]
fn bad_names_are_rejected() {
    assert!(matches!(
        handle("SEGV", |_, _| {}),
        Err(SignalError::Reserved { .. })
    ));
    assert!(matches!(
        handle("NOPE", |_, _| {}),
        Err(SignalError::Unknown { .. })
    ));
}

#[test]
fn panicking_handler_does_not_stop_dispatch() {
    handle("HUP", |_, _| panic!("handler failure")).unwrap();
    let (tx, rx) = unbounded();
    handle("ALRM", move |n, _| tx.send(n).unwrap()).unwrap();

    raise(libc::SIGHUP);
    raise(libc::SIGALRM);
    assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), libc::SIGALRM);

    raise(libc::SIGALRM);
    assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), libc::SIGALRM);
}
