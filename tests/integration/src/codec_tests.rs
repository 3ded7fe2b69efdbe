//! Codec Tests - NDR encoding of composite types
//!
//! Hand-written structures with nested unique pointers, conformant arrays
//! and strings, checked against their exact wire layout.

mod common;

use bytes::Bytes;
use common::init_logging;
use pla_ndr::{
    decode, decode_with_hook, encode, encode_with_hook, Bstr, ConformantArray, ConformantVaryingArray,
    FixedArray, NdrContext, NdrDecode, NdrEncode, NdrError, NdrLimits, NdrReader, NdrUuid, NdrWString,
    NdrWriter, Result, UniquePtr,
};

/// A counter entry: inline id, then two pointers whose bodies trail
#[derive(Debug, Clone, Default, PartialEq)]
struct Counter {
    id: u32,
    path: Option<Bstr>,
    samples: Option<ConformantArray<u16>>,
}

impl NdrEncode for Counter {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        w.write_align(4);
        w.write_data(self.id);
        w.write_pointer(self.path.as_ref());
        w.write_pointer(self.samples.as_ref());
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}

impl NdrDecode for Counter {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        r.read_align(4)?;
        self.id = r.read_data()?;
        r.read_pointer(&mut self.path)?;
        r.read_pointer(&mut self.samples)?;
        Ok(())
    }

    fn ndr_align() -> usize {
        4
    }
}

/// Two counters; the second is itself behind a pointer
#[derive(Debug, Clone, Default, PartialEq)]
struct CounterPair {
    first: Counter,
    second: Option<Counter>,
}

impl NdrEncode for CounterPair {
    fn ndr_encode<'a>(&'a self, w: &mut NdrWriter<'a>) -> Result<()> {
        self.first.ndr_encode(w)?;
        w.write_pointer(self.second.as_ref());
        Ok(())
    }
}

impl NdrDecode for CounterPair {
    fn ndr_decode<'a>(&'a mut self, r: &mut NdrReader<'a>) -> Result<()> {
        self.first.ndr_decode(r)?;
        r.read_pointer(&mut self.second)?;
        Ok(())
    }
}

fn ctx() -> NdrContext {
    NdrContext::new()
}

#[test]
fn test_counter_layout() {
    init_logging();
    let counter = Counter {
        id: 7,
        path: Some(Bstr::from("A")),
        samples: Some(ConformantArray::new(vec![1, 2])),
    };
    let bytes = encode(&counter, ctx()).unwrap();
    assert_eq!(
        &bytes[..],
        &[
            7, 0, 0, 0, // id
            0x00, 0x00, 0x02, 0x00, // path referent
            0x04, 0x00, 0x02, 0x00, // samples referent
            1, 0, 0, 0, // BSTR max count
            2, 0, 0, 0, // BSTR byte count
            1, 0, 0, 0, // BSTR unit count
            b'A', 0, // "A"
            0, 0, // pad to 4
            2, 0, 0, 0, // sample count
            1, 0, 2, 0, // samples
        ]
    );
    let decoded: Counter = decode(bytes, ctx()).unwrap();
    assert_eq!(decoded, counter);
}

#[test]
fn test_nested_pointer_bodies_come_after_outer_level() {
    init_logging();
    let pair = CounterPair {
        first: Counter { id: 1, path: Some(Bstr::from("x")), samples: None },
        second: Some(Counter { id: 2, path: None, samples: Some(ConformantArray::new(vec![9])) }),
    };
    let bytes = encode(&pair, ctx()).unwrap();

    // Outer level: first counter (12 bytes) and the pointer to the second
    assert_eq!(&bytes[12..16], &[0x04, 0x00, 0x02, 0x00]);
    // Level one: first.path body, then second counter body
    assert_eq!(&bytes[16..20], &[1, 0, 0, 0]);
    assert_eq!(&bytes[28..30], &[b'x', 0]);
    assert_eq!(&bytes[32..36], &[2, 0, 0, 0]);
    // Second counter's samples pointer gets the next referent ID
    assert_eq!(&bytes[40..44], &[0x08, 0x00, 0x02, 0x00]);
    // Level two: samples body
    assert_eq!(&bytes[44..], &[1, 0, 0, 0, 9, 0]);

    let decoded: CounterPair = decode(bytes, ctx()).unwrap();
    assert_eq!(decoded, pair);
}

#[test]
fn test_all_null_pointers() {
    init_logging();
    let pair = CounterPair::default();
    let bytes = encode(&pair, ctx()).unwrap();
    assert_eq!(bytes.len(), 16);
    assert!(bytes.iter().all(|&b| b == 0));
    assert_eq!(decode::<CounterPair>(bytes, ctx()).unwrap(), pair);
}

#[test]
fn test_array_limit_rejects_before_allocating() {
    init_logging();
    let counter = Counter {
        id: 1,
        path: None,
        samples: Some(ConformantArray::new(vec![0; 64])),
    };
    let bytes = encode(&counter, ctx()).unwrap();

    let tight = ctx().with_limits(NdrLimits::default().with_max_array_elements(16));
    let result: Result<Counter> = decode(bytes.clone(), tight);
    assert!(matches!(result, Err(NdrError::AllocationLimitExceeded { requested: 64, limit: 16 })));
    assert!(decode::<Counter>(bytes, ctx()).is_ok());
}

#[test]
fn test_huge_claimed_count_is_underflow() {
    init_logging();
    // samples pointer present, count claims 100000 elements, no data follows
    let bytes = Bytes::from_static(&[
        1, 0, 0, 0, //
        0, 0, 0, 0, //
        0x00, 0x00, 0x02, 0x00, //
        0xA0, 0x86, 0x01, 0x00,
    ]);
    let result: Result<Counter> = decode(bytes, ctx());
    assert!(matches!(result, Err(NdrError::BufferUnderflow { .. })));
}

#[test]
fn test_string_limit() {
    init_logging();
    let counter = Counter { id: 0, path: Some(Bstr::from("a longer path")), samples: None };
    let bytes = encode(&counter, ctx()).unwrap();
    let tight = ctx().with_limits(NdrLimits::default().with_max_string_len(4));
    assert!(matches!(
        decode::<Counter>(bytes, tight),
        Err(NdrError::AllocationLimitExceeded { .. })
    ));
}

#[test]
fn test_wide_string_and_fixed_array() {
    init_logging();
    let name = NdrWString::new("Perf");
    let bytes = encode(&name, ctx()).unwrap();
    // max, offset, actual, four units and the terminator
    assert_eq!(bytes.len(), 12 + 10);
    assert_eq!(decode::<NdrWString>(bytes, ctx()).unwrap(), name);

    let fixed = FixedArray::new([0x0102u16, 0x0304, 0x0506]);
    let bytes = encode(&fixed, ctx()).unwrap();
    assert_eq!(&bytes[..], &[2, 1, 4, 3, 6, 5]);
}

#[test]
fn test_conformant_varying_with_spare_capacity() {
    init_logging();
    let array = ConformantVaryingArray::with_max(8, vec![10u32, 20]);
    let bytes = encode(&array, ctx()).unwrap();
    assert_eq!(&bytes[..12], &[8, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0]);
    let decoded: ConformantVaryingArray<u32> = decode(bytes, ctx()).unwrap();
    assert_eq!(decoded.max_count, 8);
    assert_eq!(decoded.elements, vec![10, 20]);
}

#[test]
fn test_unique_ptr_wrapper() {
    init_logging();
    let present = UniquePtr::new(NdrUuid::NIL);
    assert_eq!(encode(&present, ctx()).unwrap().len(), 20);
    let null: UniquePtr<NdrUuid> = UniquePtr::null();
    assert_eq!(&encode(&null, ctx()).unwrap()[..], &[0, 0, 0, 0]);
}

#[test]
fn test_hooks() {
    init_logging();
    let counter = Counter { id: 0, ..Default::default() };
    let reject_zero = |c: &Counter| -> Result<()> {
        if c.id == 0 {
            return Err(NdrError::Rejected("counter id 0 is reserved".into()));
        }
        Ok(())
    };
    assert!(matches!(
        encode_with_hook(&counter, ctx(), Some(&reject_zero)),
        Err(NdrError::Rejected(_))
    ));

    let bytes = encode(&Counter { id: 5, ..Default::default() }, ctx()).unwrap();
    let preset = |c: &mut Counter| -> Result<()> {
        c.path = Some(Bstr::from("stale"));
        Ok(())
    };
    let decoded: Counter = decode_with_hook(bytes, ctx(), Some(&preset)).unwrap();
    assert_eq!(decoded.id, 5);
    assert_eq!(decoded.path, None);
}

#[test]
fn test_trailing_bytes_rejected() {
    init_logging();
    let mut raw = encode(&CounterPair::default(), ctx()).unwrap().to_vec();
    raw.extend_from_slice(&[0, 0]);
    assert!(matches!(
        decode::<CounterPair>(Bytes::from(raw), ctx()),
        Err(NdrError::TrailingData(2))
    ));
}
