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
/***************************************************************************************************
 * mini_cbor reverse writer
 *
 * Emits CBOR from the tail of a caller-owned buffer towards its head, so that a container's
 * length header can be prepended once its contents are known, without a second pass or a
 * placeholder. Callers drive this by emitting items in the REVERSE of the desired wire order
 * between a matching `open_*`/`wrap_*` pair - this is the single most important contract of this
 * module.
 **************************************************************************************************/
use crate::error::WriterError;
use crate::header::{self, MajorType, SIMPLE_FALSE, SIMPLE_NULL, SIMPLE_TRUE, SIMPLE_UNDEFINED};

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// Maximum simultaneously-open container depth used by [`Writer`] unless a different value is
/// requested via its const generic parameter.
pub const DEFAULT_MAX_NESTING: usize = 8;

/// A prepend-only CBOR writer over a caller-owned buffer.
///
/// `MAX_NESTING` bounds how many arrays/maps can be open (not yet wrapped) at once; it defaults
/// to [`DEFAULT_MAX_NESTING`] and corresponds to the `CBOR_CONF_MAX_NESTING` build-time knob of
/// the C original this crate's writer discipline is drawn from - here it is a compile-time
/// parameter rather than a preprocessor define, so a caller needing deeper nesting simply
/// instantiates `Writer::<'_, 16>::new(...)`.
///
/// A `Writer` starts empty and grows towards the front of the buffer as items are prepended.
/// Once any operation would overflow the buffer, overflow or underflow the container stack, or
/// close a map with an odd item count, the writer *poisons*: every subsequent call becomes a
/// silent no-op, and [`Writer::stop`] reports the failure as `None`. There is no way to
/// un-poison a writer.
#[derive(Debug)]
pub struct Writer<'buf, const MAX_NESTING: usize = DEFAULT_MAX_NESTING> {
    buf: &'buf mut [u8],
    /// Index of the first byte written so far; starts at `buf.len()` (nothing written).
    cursor: usize,
    poisoned: bool,
    poison_reason: Option<WriterError>,
    /// `MAX_NESTING` means "no container open"; opening one decrements it.
    depth: usize,
    counts: [usize; MAX_NESTING],
}

impl<'buf, const MAX_NESTING: usize> Writer<'buf, MAX_NESTING> {
    /// Begin a writing session over `buf`. The buffer's existing contents are irrelevant; bytes
    /// are only ever written starting from the end.
    #[cfg_attr(feature = "trace", trace)]
    pub fn new(buf: &'buf mut [u8]) -> Self {
        let cursor = buf.len();
        Writer {
            buf,
            cursor,
            poisoned: false,
            poison_reason: None,
            depth: MAX_NESTING,
            counts: [0usize; MAX_NESTING],
        }
    }

    /// `true` once the writer has latched into the poisoned state.
    #[cfg_attr(feature = "trace", trace)]
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// The reason the writer poisoned, if it has.
    #[cfg_attr(feature = "trace", trace)]
    pub fn poison_reason(&self) -> Option<WriterError> {
        self.poison_reason
    }

    /// Finish the writing session.
    ///
    /// Returns the written bytes, in wire order, iff every opened container has been wrapped and
    /// the writer never poisoned. Otherwise returns `None`; the buffer's contents are then
    /// unspecified beyond "may be partially clobbered".
    #[cfg_attr(feature = "trace", trace)]
    pub fn stop(self) -> Option<&'buf [u8]> {
        if self.poisoned || self.depth != MAX_NESTING {
            None
        } else {
            let Writer { buf, cursor, .. } = self;
            Some(&buf[cursor..])
        }
    }

    fn poison(&mut self, reason: WriterError) {
        self.poisoned = true;
        self.poison_reason = Some(reason);
        self.cursor = 0;
    }

    /// Only the innermost open container's counter is affected; at the top level (`depth ==
    /// MAX_NESTING`) this is a no-op, matching the "sequence of items with no enclosing
    /// container" use case.
    fn increment(&mut self) {
        if self.depth != MAX_NESTING {
            self.counts[self.depth] += 1;
        }
    }

    /// Copy `bytes` into the freshly exposed slot immediately before `cursor`, without touching
    /// any container counter. A zero-length copy is a deliberate no-op, matching
    /// `prepend_object`'s behaviour when `n == 0`.
    fn raw_copy(&mut self, bytes: &[u8]) {
        if self.poisoned || bytes.is_empty() {
            return;
        }
        if self.cursor < bytes.len() {
            self.poison(WriterError::BufferExhausted);
            return;
        }
        self.cursor -= bytes.len();
        self.buf[self.cursor..self.cursor + bytes.len()].copy_from_slice(bytes);
    }

    /// Write an unsigned-integer header (initial byte plus big-endian argument bytes) for
    /// `value`, without incrementing any counter and without setting the major-type bits beyond
    /// `Unsigned` (0 - a no-op on OR). Callers that need a different major type OR it into the
    /// initial byte afterwards with [`Self::tag_initial_byte`].
    ///
    /// The bound check here is deliberately `cursor <= trailing` rather than `cursor <
    /// trailing`, because a further initial byte still has to be written after the trailing
    /// bytes; preserving this by-one difference from the raw-copy bound is the single easiest
    /// place to introduce a silent off-by-one.
    fn write_unsigned_header(&mut self, value: u64) {
        if self.poisoned {
            return;
        }
        let (low_bits, trailing) = header::encode_argument(value);
        if self.cursor <= trailing {
            self.poison(WriterError::BufferExhausted);
            return;
        }
        if trailing > 0 {
            let be = value.to_be_bytes();
            self.cursor -= trailing;
            self.buf[self.cursor..self.cursor + trailing].copy_from_slice(&be[8 - trailing..]);
        }
        self.cursor -= 1;
        self.buf[self.cursor] = low_bits;
    }

    /// OR the major-type bits into the initial byte just written by
    /// [`Self::write_unsigned_header`] (which leaves `cursor` pointing at it).
    fn tag_initial_byte(&mut self, mt: MajorType) {
        if !self.poisoned {
            self.buf[self.cursor] |= mt.tag_bits();
        }
    }

    /// Prepend an unsigned integer item (major type 0), incrementing the enclosing container's
    /// item count.
    #[cfg_attr(feature = "trace", trace)]
    pub fn prepend_unsigned(&mut self, value: u64) {
        self.write_unsigned_header(value);
        self.increment();
    }

    /// Prepend an opaque, already-encoded CBOR fragment of exactly one item, incrementing the
    /// enclosing container's count by exactly one. The caller is responsible for the fragment
    /// being valid, self-contained CBOR.
    #[cfg_attr(feature = "trace", trace)]
    pub fn prepend_object(&mut self, object: &[u8]) {
        self.raw_copy(object);
        self.increment();
    }

    /// Prepend a byte-string header of length `data_size` to bytes already placed at the tail of
    /// the buffer by a previous [`Self::prepend_object`] call (or another writer session sharing
    /// the same tail region). Increments the enclosing counter by one, since the wrapped bytes
    /// count as a single item.
    #[cfg_attr(feature = "trace", trace)]
    pub fn wrap_data(&mut self, data_size: usize) {
        self.prepend_unsigned(data_size as u64);
        self.tag_initial_byte(MajorType::ByteString);
    }

    /// Prepend a byte string (major type 2). Exactly one increment occurs for the whole item:
    /// the raw bytes are placed without counting, and [`Self::wrap_data`] performs the single
    /// increment when it writes the length header.
    #[cfg_attr(feature = "trace", trace)]
    pub fn prepend_data(&mut self, data: &[u8]) {
        self.raw_copy(data);
        self.wrap_data(data.len());
    }

    /// Prepend a text string (major type 3). The bytes are copied verbatim; this writer does not
    /// validate UTF-8.
    #[cfg_attr(feature = "trace", trace)]
    pub fn prepend_text(&mut self, text: &str) {
        self.raw_copy(text.as_bytes());
        self.prepend_unsigned(text.len() as u64);
        self.tag_initial_byte(MajorType::TextString);
    }

    fn open_container(&mut self) -> Option<usize> {
        if self.poisoned {
            return None;
        }
        if self.depth == 0 {
            self.poison(WriterError::NestingOverflow);
            return None;
        }
        self.depth -= 1;
        self.counts[self.depth] = 0;
        Some(self.cursor)
    }

    /// Begin an array: subsequently prepended items are counted against this container until the
    /// matching [`Self::wrap_array`]. Poisons if `MAX_NESTING` containers are already open.
    #[cfg_attr(feature = "trace", trace)]
    pub fn open_array(&mut self) -> Option<usize> {
        self.open_container()
    }

    /// Begin a map. Identical to [`Self::open_array`]: the distinction between array and map is
    /// made only at [`Self::wrap_map`] time, by which major type header is written and by the
    /// parity check it applies to the item count.
    #[cfg_attr(feature = "trace", trace)]
    pub fn open_map(&mut self) -> Option<usize> {
        self.open_container()
    }

    /// Close the innermost open array, prepending its length header. The container itself then
    /// counts as one item in its parent (if any).
    #[cfg_attr(feature = "trace", trace)]
    pub fn wrap_array(&mut self) -> Option<usize> {
        if self.poisoned {
            return None;
        }
        if self.depth == MAX_NESTING {
            self.poison(WriterError::NestingUnderflow);
            return None;
        }
        let count = self.counts[self.depth];
        self.write_unsigned_header(count as u64);
        if self.poisoned {
            return None;
        }
        self.tag_initial_byte(MajorType::Array);
        self.depth += 1;
        self.increment();
        Some(self.cursor)
    }

    /// Close the innermost open map, prepending its pair-count header. The item count recorded
    /// since the matching `open_map` must be even (each key and each value counts as one item);
    /// an odd count poisons with [`WriterError::MapParity`].
    #[cfg_attr(feature = "trace", trace)]
    pub fn wrap_map(&mut self) -> Option<usize> {
        if self.poisoned {
            return None;
        }
        if self.depth == MAX_NESTING {
            self.poison(WriterError::NestingUnderflow);
            return None;
        }
        let count = self.counts[self.depth];
        if count & 1 != 0 {
            self.poison(WriterError::MapParity);
            return None;
        }
        self.write_unsigned_header((count >> 1) as u64);
        if self.poisoned {
            return None;
        }
        self.tag_initial_byte(MajorType::Map);
        self.depth += 1;
        self.increment();
        Some(self.cursor)
    }

    fn prepend_simple_byte(&mut self, byte: u8) {
        self.raw_copy(core::slice::from_ref(&byte));
        self.increment();
    }

    /// Prepend the simple value `null`.
    #[cfg_attr(feature = "trace", trace)]
    pub fn prepend_null(&mut self) {
        self.prepend_simple_byte(SIMPLE_NULL);
    }

    /// Prepend the simple value `undefined`.
    #[cfg_attr(feature = "trace", trace)]
    pub fn prepend_undefined(&mut self) {
        self.prepend_simple_byte(SIMPLE_UNDEFINED);
    }

    /// Prepend a boolean simple value.
    #[cfg_attr(feature = "trace", trace)]
    pub fn prepend_bool(&mut self, value: bool) {
        self.prepend_simple_byte(if value { SIMPLE_TRUE } else { SIMPLE_FALSE });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_array() {
        let mut buf = [0u8; 8];
        let mut w: Writer = Writer::new(&mut buf);
        w.open_array();
        w.wrap_array();
        assert_eq!(w.stop(), Some([0x80].as_slice()));
    }

    #[test]
    fn unsigned_in_one_element_array() {
        let mut buf = [0u8; 8];
        let mut w: Writer = Writer::new(&mut buf);
        w.open_array();
        w.prepend_unsigned(123);
        w.wrap_array();
        assert_eq!(w.stop(), Some([0x81, 0x18, 0x7B].as_slice()));
    }

    #[test]
    fn array_of_unsigned_and_bytes() {
        let mut buf = [0u8; 16];
        let mut w: Writer = Writer::new(&mut buf);
        w.open_array();
        w.prepend_unsigned(123);
        w.prepend_data(&[0x0A, 0x0B, 0x0C]);
        w.wrap_array();
        assert_eq!(
            w.stop(),
            Some([0x82, 0x43, 0x0A, 0x0B, 0x0C, 0x18, 0x7B].as_slice())
        );
    }

    #[test]
    fn empty_map() {
        let mut buf = [0u8; 8];
        let mut w: Writer = Writer::new(&mut buf);
        w.open_map();
        w.wrap_map();
        assert_eq!(w.stop(), Some([0xA0].as_slice()));
    }

    #[test]
    fn map_of_one_true() {
        let mut buf = [0u8; 8];
        let mut w: Writer = Writer::new(&mut buf);
        w.open_map();
        w.prepend_bool(true);
        w.prepend_unsigned(1);
        w.wrap_map();
        assert_eq!(w.stop(), Some([0xA1, 0x01, 0xF5].as_slice()));
    }

    #[test]
    fn exact_fit_buffer_succeeds() {
        let mut buf = [0u8; 3];
        let mut w: Writer = Writer::new(&mut buf);
        w.open_array();
        w.prepend_unsigned(123);
        w.wrap_array();
        assert!(w.stop().is_some());
    }

    #[test]
    fn off_by_one_short_buffer_poisons() {
        let mut buf = [0u8; 2];
        let mut w: Writer = Writer::new(&mut buf);
        w.open_array();
        w.prepend_unsigned(123);
        w.wrap_array();
        assert_eq!(w.stop(), None);
    }

    #[test]
    fn map_with_odd_item_count_poisons() {
        let mut buf = [0u8; 8];
        let mut w: Writer = Writer::new(&mut buf);
        w.open_map();
        w.prepend_unsigned(1);
        assert_eq!(w.wrap_map(), None);
        assert_eq!(w.poison_reason(), Some(WriterError::MapParity));
        assert_eq!(w.stop(), None);
    }

    #[test]
    fn nesting_bound_poisons_on_overflow() {
        let mut buf = [0u8; 64];
        let mut w: Writer<'_, 2> = Writer::new(&mut buf);
        assert!(w.open_array().is_some());
        assert!(w.open_array().is_some());
        assert_eq!(w.open_array(), None);
        assert_eq!(w.poison_reason(), Some(WriterError::NestingOverflow));
    }

    #[test]
    fn wrap_without_open_poisons() {
        let mut buf = [0u8; 8];
        let mut w: Writer = Writer::new(&mut buf);
        assert_eq!(w.wrap_array(), None);
        assert_eq!(w.poison_reason(), Some(WriterError::NestingUnderflow));
    }

    #[test]
    fn poison_is_monotonic() {
        let mut buf = [0u8; 1];
        let mut w: Writer = Writer::new(&mut buf);
        w.prepend_unsigned(123); // needs 2 bytes, buffer has 1: poisons
        assert!(w.is_poisoned());
        w.prepend_null();
        w.prepend_bool(false);
        assert!(w.stop().is_none());
    }

    #[test]
    fn nested_array_in_array() {
        let mut buf = [0u8; 16];
        let mut w: Writer = Writer::new(&mut buf);
        w.open_array();
        w.open_array();
        w.prepend_unsigned(1);
        w.prepend_unsigned(2);
        w.wrap_array();
        w.prepend_unsigned(3);
        w.wrap_array();
        assert_eq!(
            w.stop(),
            Some([0x82, 0x03, 0x82, 0x01, 0x02].as_slice())
        );
    }
}
