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
 * mini_cbor forward reader
 *
 * Walks a byte slice left to right, one item at a time. Every method either fully consumes the
 * bytes of one item and advances the cursor, or leaves the cursor untouched and reports `None`
 * (or, for `stop`, a saturating count). There is no latched failure state on the reader: each
 * call is independently a safe, retryable no-op on error, and the caller decides whether a
 * `None` is fatal to their parse.
 **************************************************************************************************/
use crate::header::{self, MajorType, SimpleValue};

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// A forward, bounds-checked CBOR reader over a borrowed byte slice.
#[derive(Debug)]
pub struct Reader<'buf> {
    bytes: &'buf [u8],
    cursor: usize,
}

/// Peek the unsigned-integer header (major-type bits ignored) starting at `at`, without
/// mutating any state. Returns the total header length (initial byte plus trailing bytes) and
/// the decoded value, or `None` if `at` is out of bounds, the size class is reserved, or there
/// are not enough trailing bytes available.
///
/// Centralising this as a non-mutating peek is what lets every caller (`read_unsigned`,
/// `read_data`, `read_text`, `read_array`, `read_map`) get fully atomic check-then-consume
/// behaviour: the cursor only ever advances once the whole item is known to be present.
fn peek_unsigned(bytes: &[u8], at: usize) -> Option<(usize, u64)> {
    let initial = *bytes.get(at)?;
    let size_class = header::size_class_from_ai(header::ai_bits(initial))?;
    let trailing = size_class.trailing_bytes();
    if trailing == 0 {
        return Some((1, header::ai_bits(initial) as u64));
    }
    let start = at + 1;
    let end = start.checked_add(trailing)?;
    let slice = bytes.get(start..end)?;
    let mut be = [0u8; 8];
    be[8 - trailing..].copy_from_slice(slice);
    Some((1 + trailing, u64::from_be_bytes(be)))
}

impl<'buf> Reader<'buf> {
    /// Begin reading `bytes` from the start.
    #[cfg_attr(feature = "trace", trace)]
    pub fn new(bytes: &'buf [u8]) -> Self {
        Reader { bytes, cursor: 0 }
    }

    /// Peek the major type of the next item without consuming anything. Returns `None` at end
    /// of input or if the initial byte names a major type this codec does not model (negative
    /// integer, tag).
    #[cfg_attr(feature = "trace", trace)]
    pub fn next(&self) -> Option<MajorType> {
        let byte = *self.bytes.get(self.cursor)?;
        MajorType::from_initial_byte(byte)
    }

    /// Read the argument of whatever item is next, returning its size class and value. The
    /// major-type bits of the initial byte are ignored entirely, not just for major type 0: a
    /// caller that needs to check the type first calls [`Self::next`]. Advances the cursor past
    /// the whole item iff it is present and well-formed; otherwise leaves the cursor untouched.
    #[cfg_attr(feature = "trace", trace)]
    pub fn read_unsigned(&mut self) -> Option<(header::SizeClass, u64)> {
        let initial = *self.bytes.get(self.cursor)?;
        let size_class = header::size_class_from_ai(header::ai_bits(initial))?;
        let (len, value) = peek_unsigned(self.bytes, self.cursor)?;
        self.cursor += len;
        Some((size_class, value))
    }

    fn read_length_prefixed(&mut self, expect: MajorType) -> Option<&'buf [u8]> {
        let initial = *self.bytes.get(self.cursor)?;
        if MajorType::from_initial_byte(initial) != Some(expect) {
            return None;
        }
        let (header_len, len) = peek_unsigned(self.bytes, self.cursor)?;
        let len = usize::try_from(len).ok()?;
        let start = self.cursor + header_len;
        let end = start.checked_add(len)?;
        let slice = self.bytes.get(start..end)?;
        self.cursor = end;
        Some(slice)
    }

    /// Read a byte string (major type 2), returning a borrowed slice of its payload.
    #[cfg_attr(feature = "trace", trace)]
    pub fn read_data(&mut self) -> Option<&'buf [u8]> {
        self.read_length_prefixed(MajorType::ByteString)
    }

    /// Read a text string (major type 3), returning its payload bytes verbatim. This reader does
    /// not validate UTF-8; the caller decides whether and how to do so.
    #[cfg_attr(feature = "trace", trace)]
    pub fn read_text(&mut self) -> Option<&'buf [u8]> {
        self.read_length_prefixed(MajorType::TextString)
    }

    fn read_count_prefixed(&mut self, expect: MajorType) -> Option<usize> {
        let initial = *self.bytes.get(self.cursor)?;
        if MajorType::from_initial_byte(initial) != Some(expect) {
            return None;
        }
        let (header_len, count) = peek_unsigned(self.bytes, self.cursor)?;
        self.cursor += header_len;
        usize::try_from(count).ok()
    }

    /// Read an array header (major type 4), returning its declared item count. The items
    /// themselves are read by subsequent calls; this reader does not validate that exactly that
    /// many items follow.
    #[cfg_attr(feature = "trace", trace)]
    pub fn read_array(&mut self) -> Option<usize> {
        self.read_count_prefixed(MajorType::Array)
    }

    /// Read a map header (major type 5), returning its declared pair count (not the raw doubled
    /// item count on the wire).
    #[cfg_attr(feature = "trace", trace)]
    pub fn read_map(&mut self) -> Option<usize> {
        self.read_count_prefixed(MajorType::Map)
    }

    /// Read a simple value. Consumes exactly one byte and returns it verbatim, including
    /// major types other than 7 and non-standard simple-value bytes - the only failure mode is
    /// running out of input.
    #[cfg_attr(feature = "trace", trace)]
    pub fn read_simple(&mut self) -> Option<SimpleValue> {
        let initial = *self.bytes.get(self.cursor)?;
        self.cursor += 1;
        Some(SimpleValue::from_byte(initial))
    }

    /// End the reading session, returning how many bytes were consumed. This is a saturating
    /// report only: it cannot distinguish a clean finish from a cursor parked partway through a
    /// malformed item, so a caller that needs that distinction must track the return value of
    /// each typed read as it goes.
    #[cfg_attr(feature = "trace", trace)]
    pub fn stop(self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::SizeClass;

    #[test]
    fn empty_array() {
        let mut r = Reader::new(&[0x80]);
        assert_eq!(r.read_array(), Some(0));
        assert_eq!(r.stop(), 1);
    }

    #[test]
    fn unsigned_in_one_element_array() {
        let mut r = Reader::new(&[0x81, 0x18, 0x7B]);
        assert_eq!(r.read_array(), Some(1));
        assert_eq!(r.read_unsigned(), Some((SizeClass::U8, 123)));
        assert_eq!(r.stop(), 3);
    }

    #[test]
    fn array_of_unsigned_and_bytes() {
        let mut r = Reader::new(&[0x82, 0x43, 0x0A, 0x0B, 0x0C, 0x18, 0x7B]);
        assert_eq!(r.read_array(), Some(2));
        assert_eq!(r.read_data(), Some([0x0A, 0x0B, 0x0C].as_slice()));
        assert_eq!(r.read_unsigned(), Some((SizeClass::U8, 123)));
    }

    #[test]
    fn map_of_one_true() {
        let mut r = Reader::new(&[0xA1, 0x01, 0xF5]);
        assert_eq!(r.read_map(), Some(1));
        assert_eq!(r.read_unsigned(), Some((SizeClass::Immediate, 1)));
        assert_eq!(r.read_simple(), Some(SimpleValue::True));
    }

    #[test]
    fn truncated_two_byte_argument_does_not_move_cursor() {
        let mut r = Reader::new(&[0x19, 0x01]); // claims a u16 but only one trailing byte present
        assert_eq!(r.read_unsigned(), None);
        assert_eq!(r.stop(), 0);
    }

    #[test]
    fn truncated_byte_string_does_not_move_cursor() {
        let mut r = Reader::new(&[0x44, 0x01, 0x02]); // claims 4 bytes, only 2 present
        assert_eq!(r.read_data(), None);
        assert_eq!(r.stop(), 0);
    }

    #[test]
    fn reserved_additional_info_is_rejected() {
        let mut r = Reader::new(&[0x1C]);
        assert_eq!(r.read_unsigned(), None);
        assert_eq!(r.stop(), 0);
    }

    #[test]
    fn read_unsigned_ignores_major_type_bits() {
        // 0x80 is an array header (major type 4), but read_unsigned only looks at the AI field.
        let mut r = Reader::new(&[0x80]);
        assert_eq!(r.read_unsigned(), Some((SizeClass::Immediate, 0)));
        assert_eq!(r.stop(), 1);
    }

    #[test]
    fn empty_input_reports_none() {
        let mut r = Reader::new(&[]);
        assert_eq!(r.next(), None);
        assert_eq!(r.read_unsigned(), None);
        assert_eq!(r.stop(), 0);
    }

    #[test]
    fn unknown_simple_value_is_returned_verbatim() {
        let mut r = Reader::new(&[0xE1]);
        assert_eq!(r.read_simple(), Some(SimpleValue::Other(0x01)));
    }

    #[test]
    fn negative_integer_major_type_is_not_modeled() {
        let r = Reader::new(&[0x20]);
        assert_eq!(r.next(), None);
    }
}
