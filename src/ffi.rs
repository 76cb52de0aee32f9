//! C ABI over a `RingBuffer<u64>`.
//!
//! The single-writer rule cannot be enforced across the boundary: callers must
//! make sure only one thread calls `seqring_write` on a handle. Reads are safe
//! from any number of threads as long as each one passes its own cursor.

use crate::SPMC::Buffer::RingBuffer;
use crate::SPMC::Structs::{Cursor, ReadOutcome};
use std::ptr;

// Error codes
pub const SEQRING_SUCCESS: i32 = 0;
pub const SEQRING_ERROR_NULL_POINTER: i32 = -1;
pub const SEQRING_ERROR_INVALID_CAPACITY: i32 = -2;
pub const SEQRING_NOT_READY: i32 = -3;
pub const SEQRING_DATA_LOST: i32 = -4;

/// Handle to a ring buffer instance (opaque pointer)
pub struct RingHandle {
    inner: RingBuffer<u64>,
}

/// Create a new ring buffer.
///
/// # Arguments
/// * `capacity` - Number of slots (non-zero power of 2).
/// * `out` - Receives the handle on success; set to NULL on failure.
///
/// # Returns
/// * 0 on success, negative error code otherwise.
///
/// # Safety
/// `out` must be NULL or valid for a pointer-sized write.
#[no_mangle]
pub unsafe extern "C" fn seqring_new(capacity: u64, out: *mut *mut RingHandle) -> i32 {
    if out.is_null() {
        return SEQRING_ERROR_NULL_POINTER;
    }

    match RingBuffer::new(capacity) {
        Ok(inner) => {
            *out = Box::into_raw(Box::new(RingHandle { inner }));
            SEQRING_SUCCESS
        }
        Err(e) => {
            log::debug!("seqring_new: {}", e);
            *out = ptr::null_mut();
            SEQRING_ERROR_INVALID_CAPACITY
        }
    }
}

/// Publish a value and return its sequence number (0 if `handle` is NULL).
///
/// # Safety
/// `handle` must come from `seqring_new` and not be freed. Only one thread may
/// write to a handle at a time.
#[no_mangle]
pub unsafe extern "C" fn seqring_write(handle: *const RingHandle, value: u64) -> u64 {
    if handle.is_null() {
        return 0;
    }
    (*handle).inner.write(value)
}

/// Read the entry after `*cursor`.
///
/// # Returns
/// * 0 with `*out` set and `*cursor` advanced on success
/// * `SEQRING_NOT_READY` if nothing is available (including overwritten entries)
///
/// # Safety
/// `handle` must be live; `cursor` and `out` must be valid for reads/writes.
#[no_mangle]
pub unsafe extern "C" fn seqring_read(
    handle: *const RingHandle,
    cursor: *mut u64,
    out: *mut u64,
) -> i32 {
    if handle.is_null() || cursor.is_null() || out.is_null() {
        return SEQRING_ERROR_NULL_POINTER;
    }

    let mut position = Cursor::at(*cursor);
    match (*handle).inner.read(&mut position) {
        Some(value) => {
            *out = value;
            *cursor = position.position();
            SEQRING_SUCCESS
        }
        None => SEQRING_NOT_READY,
    }
}

/// Read the entry after `*cursor`, reporting overwritten ranges.
///
/// # Returns
/// * 0 with `*out` set and `*cursor` advanced on success
/// * `SEQRING_NOT_READY` if nothing new was published
/// * `SEQRING_DATA_LOST` with `[*gap_start, *gap_end]` set; `*cursor` is unchanged
///
/// # Safety
/// `handle` must be live; all other pointers must be valid for reads/writes.
#[no_mangle]
pub unsafe extern "C" fn seqring_read_with_gap(
    handle: *const RingHandle,
    cursor: *mut u64,
    out: *mut u64,
    gap_start: *mut u64,
    gap_end: *mut u64,
) -> i32 {
    if handle.is_null()
        || cursor.is_null()
        || out.is_null()
        || gap_start.is_null()
        || gap_end.is_null()
    {
        return SEQRING_ERROR_NULL_POINTER;
    }

    let mut position = Cursor::at(*cursor);
    match (*handle).inner.read_with_gap(&mut position) {
        ReadOutcome::Data(value) => {
            *out = value;
            *cursor = position.position();
            SEQRING_SUCCESS
        }
        ReadOutcome::NotReady => SEQRING_NOT_READY,
        ReadOutcome::Lost(gap) => {
            *gap_start = gap.start;
            *gap_end = gap.end;
            SEQRING_DATA_LOST
        }
    }
}

/// Slot count (0 if `handle` is NULL).
///
/// # Safety
/// `handle` must be NULL or live.
#[no_mangle]
pub unsafe extern "C" fn seqring_capacity(handle: *const RingHandle) -> u64 {
    if handle.is_null() {
        return 0;
    }
    (*handle).inner.capacity()
}

/// `capacity - 1` (0 if `handle` is NULL).
///
/// # Safety
/// `handle` must be NULL or live.
#[no_mangle]
pub unsafe extern "C" fn seqring_mask(handle: *const RingHandle) -> u64 {
    if handle.is_null() {
        return 0;
    }
    (*handle).inner.mask()
}

/// Free a ring buffer handle.
///
/// # Safety
/// `handle` must be NULL or come from `seqring_new`, and no other thread may
/// still be using it.
#[no_mangle]
pub unsafe extern "C" fn seqring_free(handle: *mut RingHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}
