// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire codec integration tests.
//!
//! Tests cover:
//! - Bit-exact little-endian scalar encodings
//! - Cursor discipline of the memory buffer
//! - Array codecs at empty, single and large lengths
//! - Fixed-capacity STRING fields

use adscodec::encoding::{decode_scalar, encode_scalar, parse_scalar};
use adscodec::{
    AdsError, ArrayCodec, MemoryBuffer, MemorySizeCalculator, PlcValue, ReadVisitor, ScalarType,
    SizeCalculator, WriteVisitor,
};

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn test_uint_every_value() {
    for n in 0..=u16::MAX {
        let bytes = encode_scalar(&PlcValue::UInt(n)).unwrap();
        assert_eq!(bytes, n.to_le_bytes());
        assert_eq!(decode_scalar(ScalarType::UInt, &bytes).unwrap(), PlcValue::UInt(n));
    }
}

#[test]
fn test_udint_samples() {
    let samples = [0u32, 1, 0xFF, 0x100, 0x7FFF_FFFF, 0x8000_0000, 0xDEAD_BEEF, u32::MAX];
    for n in samples {
        let mut mem = MemoryBuffer::new(4);
        mem.set_udint(n).unwrap();
        assert_eq!(mem.as_bytes(), n.to_le_bytes());
        mem.rewind();
        assert_eq!(mem.get_udint().unwrap(), n);
    }
}

#[test]
fn test_signed_boundaries() {
    let cases = [
        (PlcValue::SInt(i8::MIN), vec![0x80u8]),
        (PlcValue::Int(i16::MIN), vec![0x00u8, 0x80]),
        (PlcValue::DInt(-1), vec![0xFFu8; 4]),
        (PlcValue::LInt(i64::MAX), {
            let mut v = vec![0xFFu8; 7];
            v.push(0x7F);
            v
        }),
    ];
    for (value, expected) in cases {
        assert_eq!(encode_scalar(&value).unwrap(), expected, "{value:?}");
    }
}

#[test]
fn test_ulint_full_range() {
    let bytes = encode_scalar(&PlcValue::ULInt(u64::MAX)).unwrap();
    assert_eq!(bytes, [0xFFu8; 8]);
    assert_eq!(
        decode_scalar(ScalarType::ULInt, &bytes).unwrap(),
        PlcValue::ULInt(u64::MAX)
    );
}

#[test]
fn test_floats_are_bit_exact() {
    for x in [0.0f64, -0.0, 1234215343.343, f64::MIN_POSITIVE, f64::INFINITY] {
        let bytes = encode_scalar(&PlcValue::LReal(x)).unwrap();
        assert_eq!(bytes, x.to_bits().to_le_bytes());
    }
    let nan = f32::from_bits(0x7FC0_0001);
    let bytes = encode_scalar(&PlcValue::Real(nan)).unwrap();
    assert_eq!(bytes, 0x7FC0_0001u32.to_le_bytes());
    match decode_scalar(ScalarType::Real, &bytes).unwrap() {
        PlcValue::Real(back) => assert_eq!(back.to_bits(), 0x7FC0_0001),
        other => panic!("unexpected value: {other:?}"),
    }
}

#[test]
fn test_parse_rejects_out_of_range() {
    assert!(matches!(
        parse_scalar(ScalarType::USInt, "256"),
        Err(AdsError::Parse { .. })
    ));
    assert!(matches!(
        parse_scalar(ScalarType::ULInt, "-1"),
        Err(AdsError::Parse { .. })
    ));
    assert_eq!(
        parse_scalar(ScalarType::SInt, "-128").unwrap(),
        PlcValue::SInt(-128)
    );
}

// ============================================================================
// Cursor discipline
// ============================================================================

#[test]
fn test_cursor_advances_by_width() {
    let mut mem = MemoryBuffer::new(8 + 4 + 2 + 1);
    mem.set_lreal(1.5).unwrap();
    assert_eq!(mem.position(), 8);
    mem.set_real(2.5).unwrap();
    assert_eq!(mem.position(), 12);
    mem.set_int(-3).unwrap();
    assert_eq!(mem.position(), 14);
    mem.set_usint(4).unwrap();
    assert!(mem.is_at_end());

    mem.rewind();
    assert_eq!(mem.get_lreal().unwrap(), 1.5);
    assert_eq!(mem.get_real().unwrap(), 2.5);
    assert_eq!(mem.get_int().unwrap(), -3);
    assert_eq!(mem.get_usint().unwrap(), 4);
    assert_eq!(mem.remaining(), 0);
}

#[test]
fn test_overflow_leaves_cursor() {
    let mut mem = MemoryBuffer::new(6);
    mem.set_dint(7).unwrap();
    let err = mem.set_lint(8).unwrap_err();
    assert_eq!(
        err,
        AdsError::BufferOverflow {
            requested: 8,
            available: 2,
            position: 4,
        }
    );
    assert_eq!(mem.position(), 4);
    mem.set_uint(9).unwrap();
    assert!(mem.is_at_end());
}

// ============================================================================
// Arrays
// ============================================================================

fn array_round_trip(values: Vec<i32>) {
    let codec = ArrayCodec::<i32>::new();
    let size = codec.calculate(&values).unwrap();
    assert_eq!(size, values.len() * 4);

    let mut mem = MemoryBuffer::new(size);
    codec.write(&mut mem, &values).unwrap();
    assert!(mem.is_at_end());

    let mut back = vec![0i32; values.len()];
    mem.rewind();
    codec.read(&mut mem, &mut back).unwrap();
    assert!(mem.is_at_end());
    assert_eq!(back, values);
}

#[test]
fn test_array_lengths() {
    array_round_trip(Vec::new());
    array_round_trip(vec![-42]);
    array_round_trip((0..10_000).map(|i| i * 7 - 35_000).collect());
}

#[test]
fn test_fixed_array_length_checked() {
    let codec = ArrayCodec::<u8>::with_len(4);
    let mut mem = MemoryBuffer::new(4);
    let err = codec.write(&mut mem, &[1u8, 2, 3][..]).unwrap_err();
    assert!(matches!(err, AdsError::TypeMismatch { .. }));
    assert_eq!(mem.position(), 0);

    let mut mem = MemoryBuffer::from_bytes(vec![9, 8, 7, 6]);
    let mut out: Vec<u8> = Vec::new();
    codec.bind(&mem, &mut out).unwrap();
    assert_eq!(out.len(), 4);
    codec.read(&mut mem, &mut out).unwrap();
    assert_eq!(out, vec![9, 8, 7, 6]);
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_string_field_padding() {
    // STRING(7) occupies eight bytes.
    let mut calc = SizeCalculator::new();
    calc.string(7);
    assert_eq!(calc.size(), 8);

    let mut mem = MemoryBuffer::new(8 + 2);
    mem.set_string("abc", 8).unwrap();
    mem.set_uint(0xBEEF).unwrap();
    assert_eq!(&mem.as_bytes()[..8], b"abc\0\0\0\0\0");

    mem.rewind();
    assert_eq!(mem.get_string(8).unwrap(), "abc");
    assert_eq!(mem.position(), 8);
    assert_eq!(mem.get_uint().unwrap(), 0xBEEF);
}

#[test]
fn test_string_too_long() {
    let mut mem = MemoryBuffer::new(8);
    let err = mem.set_string("12345678", 8).unwrap_err();
    assert!(matches!(err, AdsError::BufferOverflow { requested: 9, .. }));
    assert_eq!(mem.position(), 0);
    mem.set_string("1234567", 8).unwrap();
    assert!(mem.is_at_end());
}

#[test]
fn test_string_without_terminator() {
    let mut mem = MemoryBuffer::from_bytes(b"PLC".to_vec());
    assert_eq!(mem.get_string(3).unwrap(), "PLC");
    assert_eq!(
        decode_scalar(ScalarType::String, b"ok\0junk").unwrap(),
        PlcValue::String("ok".into())
    );
    assert_eq!(encode_scalar(&PlcValue::String("ok".into())).unwrap(), b"ok\0");
}
