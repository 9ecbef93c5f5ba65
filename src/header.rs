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
 * mini_cbor initial-byte codec
 *
 * Every CBOR data item begins with one initial byte: the high 3 bits carry the major type, the
 * low 5 bits carry either an immediate argument (0..23) or a marker for how many trailing
 * big-endian bytes hold the argument (24/25/26/27 -> 1/2/4/8 bytes). This module is the only
 * place that knows that layout; the writer and reader both build on it.
 **************************************************************************************************/

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

pub(crate) const MT_UNSIGNED: u8 = 0x00;
pub(crate) const MT_BYTE_STRING: u8 = 0x40;
pub(crate) const MT_TEXT_STRING: u8 = 0x60;
pub(crate) const MT_ARRAY: u8 = 0x80;
pub(crate) const MT_MAP: u8 = 0xA0;
pub(crate) const MT_SIMPLE: u8 = 0xE0;
const MT_MASK: u8 = 0xE0;
const AI_MASK: u8 = 0x1F;

const AI_ONE_BYTE: u8 = 24;
const AI_TWO_BYTES: u8 = 25;
const AI_FOUR_BYTES: u8 = 26;
const AI_EIGHT_BYTES: u8 = 27;

/// The major type of a CBOR data item (RFC 8949 §3.1).
///
/// Only the six major types this codec understands are represented. An initial byte whose top
/// three bits indicate negative integers (major type 1) or a tag (major type 6) has no
/// corresponding variant; [`MajorType::from_initial_byte`] returns `None` for those, matching the
/// reader's policy of refusing to model what it cannot safely round-trip.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MajorType {
    /// Unsigned integer (major type 0).
    Unsigned,
    /// Byte string (major type 2).
    ByteString,
    /// Text string (major type 3).
    TextString,
    /// Array (major type 4).
    Array,
    /// Map (major type 5).
    Map,
    /// Simple value or float (major type 7).
    Simple,
}

impl MajorType {
    /// Recover the major type from a CBOR initial byte, ignoring the argument bits.
    ///
    /// Returns `None` for major types 1 (negative integer) and 6 (tag), which this codec does
    /// not produce and does not model on read.
    #[cfg_attr(feature = "trace", trace)]
    pub(crate) fn from_initial_byte(byte: u8) -> Option<MajorType> {
        match byte & MT_MASK {
            MT_UNSIGNED => Some(MajorType::Unsigned),
            MT_BYTE_STRING => Some(MajorType::ByteString),
            MT_TEXT_STRING => Some(MajorType::TextString),
            MT_ARRAY => Some(MajorType::Array),
            MT_MAP => Some(MajorType::Map),
            MT_SIMPLE => Some(MajorType::Simple),
            _ => None,
        }
    }

    pub(crate) fn tag_bits(self) -> u8 {
        match self {
            MajorType::Unsigned => MT_UNSIGNED,
            MajorType::ByteString => MT_BYTE_STRING,
            MajorType::TextString => MT_TEXT_STRING,
            MajorType::Array => MT_ARRAY,
            MajorType::Map => MT_MAP,
            MajorType::Simple => MT_SIMPLE,
        }
    }
}

/// The size class of an integer argument: how many trailing bytes follow the initial byte.
///
/// `Immediate` means the argument is carried directly in the low 5 bits of the initial byte
/// (values 0..23); the others name the number of big-endian trailing bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SizeClass {
    /// Argument encoded in the low 5 bits of the initial byte (0..23).
    Immediate,
    /// One trailing byte.
    U8,
    /// Two trailing bytes.
    U16,
    /// Four trailing bytes.
    U32,
    /// Eight trailing bytes.
    U64,
}

impl SizeClass {
    /// Number of trailing argument bytes this size class carries (0 for `Immediate`).
    pub(crate) fn trailing_bytes(self) -> usize {
        match self {
            SizeClass::Immediate => 0,
            SizeClass::U8 => 1,
            SizeClass::U16 => 2,
            SizeClass::U32 => 4,
            SizeClass::U64 => 8,
        }
    }
}

/// The four simple values this codec produces, plus a catch-all for any other byte a reader may
/// encounter in major-type-7 position (the codec never produces these, but the reader returns
/// them verbatim rather than treating them as malformed, per spec).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SimpleValue {
    /// `false`, wire byte `0xF4`.
    False,
    /// `true`, wire byte `0xF5`.
    True,
    /// `null`, wire byte `0xF6`.
    Null,
    /// `undefined`, wire byte `0xF7`.
    Undefined,
    /// Any other byte value read in simple-value position, carried verbatim.
    Other(u8),
}

pub(crate) const SIMPLE_FALSE: u8 = 0xF4;
pub(crate) const SIMPLE_TRUE: u8 = 0xF5;
pub(crate) const SIMPLE_NULL: u8 = 0xF6;
pub(crate) const SIMPLE_UNDEFINED: u8 = 0xF7;

impl SimpleValue {
    pub(crate) fn from_byte(byte: u8) -> SimpleValue {
        match byte {
            SIMPLE_FALSE => SimpleValue::False,
            SIMPLE_TRUE => SimpleValue::True,
            SIMPLE_NULL => SimpleValue::Null,
            SIMPLE_UNDEFINED => SimpleValue::Undefined,
            other => SimpleValue::Other(other),
        }
    }
}

/// Choose the shortest size class able to carry `value`, per the shortest-form rule the encoder
/// must obey (decode does not enforce this - any valid class is accepted on read).
#[cfg_attr(feature = "trace", trace)]
pub(crate) fn size_class_for(value: u64) -> SizeClass {
    if value < AI_ONE_BYTE as u64 {
        SizeClass::Immediate
    } else if value <= u8::MAX as u64 {
        SizeClass::U8
    } else if value <= u16::MAX as u64 {
        SizeClass::U16
    } else if value <= u32::MAX as u64 {
        SizeClass::U32
    } else {
        SizeClass::U64
    }
}

/// Split `value` into the byte that goes in the initial byte's low 5 bits and the number of
/// big-endian trailing bytes that must follow it, selecting the shortest form.
#[cfg_attr(feature = "trace", trace)]
pub(crate) fn encode_argument(value: u64) -> (u8, usize) {
    match size_class_for(value) {
        SizeClass::Immediate => (value as u8, 0),
        SizeClass::U8 => (AI_ONE_BYTE, 1),
        SizeClass::U16 => (AI_TWO_BYTES, 2),
        SizeClass::U32 => (AI_FOUR_BYTES, 4),
        SizeClass::U64 => (AI_EIGHT_BYTES, 8),
    }
}

/// Decode the low 5 bits of an initial byte into a size class. Returns `None` for the reserved
/// range 28..31, which includes the indefinite-length marker this codec does not support.
#[cfg_attr(feature = "trace", trace)]
pub(crate) fn size_class_from_ai(ai: u8) -> Option<SizeClass> {
    match ai {
        0..=23 => Some(SizeClass::Immediate),
        AI_ONE_BYTE => Some(SizeClass::U8),
        AI_TWO_BYTES => Some(SizeClass::U16),
        AI_FOUR_BYTES => Some(SizeClass::U32),
        AI_EIGHT_BYTES => Some(SizeClass::U64),
        _ => None,
    }
}

pub(crate) fn ai_bits(byte: u8) -> u8 {
    byte & AI_MASK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortest_form_table() {
        assert_eq!(size_class_for(0), SizeClass::Immediate);
        assert_eq!(size_class_for(23), SizeClass::Immediate);
        assert_eq!(size_class_for(24), SizeClass::U8);
        assert_eq!(size_class_for(0xFF), SizeClass::U8);
        assert_eq!(size_class_for(0x100), SizeClass::U16);
        assert_eq!(size_class_for(0xFFFF), SizeClass::U16);
        assert_eq!(size_class_for(0x1_0000), SizeClass::U32);
        assert_eq!(size_class_for(0xFFFF_FFFF), SizeClass::U32);
        assert_eq!(size_class_for(0x1_0000_0000), SizeClass::U64);
        assert_eq!(size_class_for(u64::MAX), SizeClass::U64);
    }

    #[test]
    fn major_type_round_trips_through_tag_bits() {
        for mt in [
            MajorType::Unsigned,
            MajorType::ByteString,
            MajorType::TextString,
            MajorType::Array,
            MajorType::Map,
            MajorType::Simple,
        ] {
            assert_eq!(MajorType::from_initial_byte(mt.tag_bits()), Some(mt));
        }
    }

    #[test]
    fn negative_integer_and_tag_bytes_are_not_modeled() {
        assert_eq!(MajorType::from_initial_byte(0x20), None);
        assert_eq!(MajorType::from_initial_byte(0xC0), None);
    }

    #[test]
    fn reserved_ai_values_are_rejected() {
        assert_eq!(size_class_from_ai(28), None);
        assert_eq!(size_class_from_ai(29), None);
        assert_eq!(size_class_from_ai(30), None);
        assert_eq!(size_class_from_ai(31), None);
    }
}
