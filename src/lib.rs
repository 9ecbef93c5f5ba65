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
//! A compact, deterministic [RFC 8949](https://www.rfc-editor.org/rfc/rfc8949) CBOR
//! encoder/decoder for memory-constrained environments.
//!
//! This crate has no allocator requirement and no AST: [`Writer`] prepends items into a
//! caller-owned buffer, and [`Reader`] walks a borrowed byte slice one item at a time, returning
//! borrowed slices and primitive values directly. It covers unsigned integers, byte strings,
//! text strings, definite-length arrays and maps, and the four simple values (`false`, `true`,
//! `null`, `undefined`). There is no support for negative integers, floats, tags, indefinite
//! length items, or COSE.
//!
//! # Writing
//!
//! [`Writer`] emits bytes from the tail of its buffer towards the front. Items inside a
//! container must be prepended in the reverse of their wire order, between a matching
//! `open_array`/`wrap_array` (or `open_map`/`wrap_map`) pair:
//!
//! ```
//! use mini_cbor::Writer;
//!
//! let mut buf = [0u8; 16];
//! let mut w: Writer = Writer::new(&mut buf);
//! w.open_array();
//! w.prepend_data(b"hi");
//! w.prepend_unsigned(1);
//! w.wrap_array();
//! assert_eq!(w.stop(), Some([0x82, 0x01, 0x42, b'h', b'i'].as_slice()));
//! ```
//!
//! A writer that runs out of room, over- or under-nests its containers, or closes a map with an
//! odd item count *poisons*: every further call becomes a no-op and [`Writer::stop`] returns
//! `None`.
//!
//! # Reading
//!
//! [`Reader`] walks forward over a byte slice. Every method either fully consumes one item and
//! advances, or reports `None` and leaves the cursor untouched:
//!
//! ```
//! use mini_cbor::Reader;
//!
//! let mut r = Reader::new(&[0x82, 0x01, 0x42, b'h', b'i']);
//! assert_eq!(r.read_array(), Some(2));
//! assert_eq!(r.read_unsigned().map(|(_, v)| v), Some(1));
//! assert_eq!(r.read_data(), Some(b"hi".as_slice()));
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(missing_docs)]
#![allow(clippy::needless_lifetimes)]

#[cfg(any(feature = "std", test))]
extern crate std;

mod error;
mod header;
mod reader;
mod writer;

#[cfg(feature = "std")]
pub mod debug;

pub use error::WriterError;
pub use header::{MajorType, SimpleValue, SizeClass};
pub use reader::Reader;
pub use writer::{Writer, DEFAULT_MAX_NESTING};
