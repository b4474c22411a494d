//! Integration test: off-heap and relative writes stay inside their
//! allocation.
//!
//! Raw writes target the payload of a [`GuardedRegion`]; afterwards the
//! canary bytes on both sides must be intact.

use rawgate_core::Address;
use rawgate_probe::{Probe, ProbeConfig};
use rawgate_raw::{HostQuery, NativeLocator, OffHeapBuffer, RawAccess};
use rawgate_test_utils::{pattern, GuardedRegion};

fn raw() -> RawAccess {
    let (report, _) = Probe::new(ProbeConfig::new()).run(&NativeLocator, &HostQuery::host());
    assert!(report.is_available());
    // SAFETY: the probe reported the native provider available.
    unsafe { RawAccess::new_unchecked() }
}

#[test]
fn typed_writes_at_payload_edges_leave_guards_intact() {
    let raw = raw();
    let mut region = GuardedRegion::new(24, 32);
    let base = region.payload_ptr();
    // SAFETY: each write ends at or before byte 24 of the payload.
    unsafe {
        raw.put(base, 0, u8::MAX);
        raw.put(base, 1, i16::MIN);
        raw.put(base, 3, 0x1122_3344i32);
        raw.put(base, 7, f64::MAX);
        raw.put(base, 16, -1i64);
    }
    region.check().unwrap();
    assert_eq!(region.payload()[0], 0xFF);
    assert_eq!(&region.payload()[16..], &[0xFF; 8]);
}

#[test]
fn fill_and_copy_respect_lengths() {
    let raw = raw();
    let src = pattern(11, 48);
    let mut region = GuardedRegion::new(48, 16);
    let base = region.payload_ptr();
    // SAFETY: both operations cover exactly the 48-byte payload.
    unsafe {
        raw.set_memory(base, 0, 48, 0x3C);
        raw.copy_memory(src.as_ptr(), 8, base, 8, 40);
    }
    region.check().unwrap();
    assert_eq!(&region.payload()[..8], &[0x3C; 8]);
    assert_eq!(&region.payload()[8..], &src[8..]);
}

#[test]
fn absolute_copy_into_payload() {
    let raw = raw();
    let src = pattern(3, 32);
    let mut region = GuardedRegion::new(32, 8);
    let dst = Address::from_ptr(region.payload_ptr());
    // SAFETY: `src` and the payload are both 32 bytes.
    unsafe { raw.copy_memory_at(Address::from_ptr(src.as_ptr()), dst, 32) };
    region.check().unwrap();
    assert_eq!(region.payload(), src.as_slice());
}

#[test]
fn allocate_write_realloc_free_cycle() {
    let raw = raw();
    let data = pattern(42, 256);
    let addr = raw.allocate_memory(256).unwrap();
    // SAFETY: `addr` is live for 256 bytes, then `grown` for 1024 bytes,
    // and is freed exactly once.
    unsafe {
        for (i, b) in data.iter().enumerate() {
            raw.put_at(addr.add(i), *b);
        }
        let grown = raw.reallocate_memory(addr, 1024).unwrap();
        for (i, b) in data.iter().enumerate() {
            assert_eq!(raw.get_at::<u8>(grown.add(i)), *b, "byte {i}");
        }
        raw.set_memory_at(grown.add(256), 768, 0);
        raw.put_at(grown.add(1016), u64::MAX);
        assert_eq!(raw.get_at::<u64>(grown.add(1016)), u64::MAX);
        raw.free_memory(grown);
    }
}

#[test]
fn owned_buffer_round_trips_pattern_across_resizes() {
    let raw = raw();
    let data = pattern(9, 100);
    let mut buf = OffHeapBuffer::new(raw, 100).unwrap();
    buf.write_bytes(0, &data).unwrap();
    for len in [4096, 150, 100] {
        buf.resize(len).unwrap();
        assert_eq!(&buf.as_slice()[..100], data.as_slice());
    }
    buf.resize(10).unwrap();
    assert_eq!(buf.as_slice(), &data[..10]);
}
