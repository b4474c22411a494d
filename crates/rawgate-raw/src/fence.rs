//! Memory fences.
//!
//! Thin wrappers over [`std::sync::atomic::fence`]. They are safe: a fence
//! only constrains ordering, it never touches memory.

use std::sync::atomic::{fence, Ordering};

/// No load before the fence may be reordered with any load or store after
/// it (acquire).
#[inline]
pub fn load_fence() {
    fence(Ordering::Acquire);
}

/// No store after the fence may be reordered with any load or store before
/// it (release).
#[inline]
pub fn store_fence() {
    fence(Ordering::Release);
}

/// Sequentially consistent fence.
#[inline]
pub fn full_fence() {
    fence(Ordering::SeqCst);
}
