/***************************************************************************************************
 * Copyright (c) 2024 The mini_cbor Authors.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all copies or
 * substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
//! Auxiliary error reporting.
//!
//! [`Writer`](crate::Writer) does not return `Result` from its hot-path methods: per the write-up
//! this crate implements, a writer that would overflow its buffer, over- or under-nest its
//! containers, or close a map with an odd number of items simply *poisons* - every further call
//! becomes a silent no-op, and only [`Writer::stop`](crate::Writer::stop) reports failure, as a
//! `None`. [`WriterError`] exists purely so a poisoned writer can explain itself after the fact,
//! via [`Writer::poison_reason`](crate::Writer::poison_reason), without disturbing that control
//! flow.
//!
//! The reader has no equivalent type: each reading method already reports its own failure as a
//! `None` (or a saturating count), and there is no latched state left to explain.

#[cfg(any(feature = "std", test))]
use thiserror::Error;

/// Why a [`Writer`](crate::Writer) latched into the poisoned state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(any(feature = "std", test), derive(Error))]
pub enum WriterError {
    /// The buffer had too few free bytes for the item's header and/or payload.
    #[cfg_attr(any(feature = "std", test), error("buffer exhausted while writing an item"))]
    BufferExhausted,
    /// `open_array`/`open_map` was called with no nesting slots remaining.
    #[cfg_attr(
        any(feature = "std", test),
        error("nesting limit reached; no more containers can be opened")
    )]
    NestingOverflow,
    /// `wrap_array`/`wrap_map` was called with no matching open container.
    #[cfg_attr(
        any(feature = "std", test),
        error("wrap called with no matching open container")
    )]
    NestingUnderflow,
    /// `wrap_map` was called with an odd number of items since the matching `open_map`.
    #[cfg_attr(
        any(feature = "std", test),
        error("map wrapped with an odd number of items")
    )]
    MapParity,
}
