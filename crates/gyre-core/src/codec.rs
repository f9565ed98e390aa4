//! Little-endian binary codec for persisted graphs.
//!
//! All integers are little-endian. Sequences are prefixed with a `u32`
//! element count; booleans are a single byte that must be 0 or 1. The
//! format has no alignment padding and no self-describing schema: the
//! reader must know the payload type it expects.

use std::io::{Read, Write};

use crate::error::FileFormatError;
use crate::id::NodeIndex;

/// Current graph record version. Only version 1 is defined.
pub const FORMAT_VERSION: i32 = 1;

/// Upper bound on speculative pre-allocation while decoding a sequence.
///
/// Length prefixes come from untrusted input, so decoders grow towards
/// the declared length instead of reserving it up front.
const MAX_PREALLOC: usize = 4096;

/// A value with a fixed binary representation.
///
/// Implemented for the primitive payloads used by the engine and by
/// reference rules. Cell-state types provide their own implementation
/// to make automata persistable.
pub trait Codec: Sized {
    /// Write `self` to `w`.
    fn encode(&self, w: &mut dyn Write) -> Result<(), FileFormatError>;

    /// Read a value previously written by [`encode`](Codec::encode).
    fn decode(r: &mut dyn Read) -> Result<Self, FileFormatError>;
}

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), FileFormatError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), FileFormatError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian i32.
pub fn write_i32_le(w: &mut dyn Write, v: i32) -> Result<(), FileFormatError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian u64.
pub fn write_u64_le(w: &mut dyn Write, v: u64) -> Result<(), FileFormatError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian f32.
pub fn write_f32_le(w: &mut dyn Write, v: f32) -> Result<(), FileFormatError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian f64.
pub fn write_f64_le(w: &mut dyn Write, v: f64) -> Result<(), FileFormatError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a sequence length as a `u32` prefix.
pub fn write_len(w: &mut dyn Write, len: usize) -> Result<(), FileFormatError> {
    let len = u32::try_from(len)
        .map_err(|_| FileFormatError::malformed(format!("sequence length {len} exceeds u32")))?;
    write_u32_le(w, len)
}

// ── Primitive readers ───────────────────────────────────────────

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, FileFormatError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> Result<u32, FileFormatError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a little-endian i32.
pub fn read_i32_le(r: &mut dyn Read) -> Result<i32, FileFormatError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

/// Read a little-endian u64.
pub fn read_u64_le(r: &mut dyn Read) -> Result<u64, FileFormatError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Read a little-endian f32.
pub fn read_f32_le(r: &mut dyn Read) -> Result<f32, FileFormatError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

/// Read a little-endian f64.
pub fn read_f64_le(r: &mut dyn Read) -> Result<f64, FileFormatError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

/// Read a `u32` sequence length prefix.
pub fn read_len(r: &mut dyn Read) -> Result<usize, FileFormatError> {
    Ok(read_u32_le(r)? as usize)
}

/// Write the format version tag.
pub fn write_version(w: &mut dyn Write) -> Result<(), FileFormatError> {
    write_i32_le(w, FORMAT_VERSION)
}

/// Read the format version tag and reject anything but [`FORMAT_VERSION`].
pub fn read_version(r: &mut dyn Read) -> Result<i32, FileFormatError> {
    let version = read_i32_le(r)?;
    if version != FORMAT_VERSION {
        return Err(FileFormatError::UnsupportedVersion { found: version });
    }
    Ok(version)
}

// ── Codec impls ─────────────────────────────────────────────────

impl Codec for bool {
    fn encode(&self, w: &mut dyn Write) -> Result<(), FileFormatError> {
        write_u8(w, u8::from(*self))
    }

    fn decode(r: &mut dyn Read) -> Result<Self, FileFormatError> {
        match read_u8(r)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(FileFormatError::malformed(format!(
                "invalid bool byte {other}"
            ))),
        }
    }
}

impl Codec for u8 {
    fn encode(&self, w: &mut dyn Write) -> Result<(), FileFormatError> {
        write_u8(w, *self)
    }

    fn decode(r: &mut dyn Read) -> Result<Self, FileFormatError> {
        read_u8(r)
    }
}

impl Codec for u32 {
    fn encode(&self, w: &mut dyn Write) -> Result<(), FileFormatError> {
        write_u32_le(w, *self)
    }

    fn decode(r: &mut dyn Read) -> Result<Self, FileFormatError> {
        read_u32_le(r)
    }
}

impl Codec for i32 {
    fn encode(&self, w: &mut dyn Write) -> Result<(), FileFormatError> {
        write_i32_le(w, *self)
    }

    fn decode(r: &mut dyn Read) -> Result<Self, FileFormatError> {
        read_i32_le(r)
    }
}

impl Codec for u64 {
    fn encode(&self, w: &mut dyn Write) -> Result<(), FileFormatError> {
        write_u64_le(w, *self)
    }

    fn decode(r: &mut dyn Read) -> Result<Self, FileFormatError> {
        read_u64_le(r)
    }
}

impl Codec for f32 {
    fn encode(&self, w: &mut dyn Write) -> Result<(), FileFormatError> {
        write_f32_le(w, *self)
    }

    fn decode(r: &mut dyn Read) -> Result<Self, FileFormatError> {
        read_f32_le(r)
    }
}

impl Codec for f64 {
    fn encode(&self, w: &mut dyn Write) -> Result<(), FileFormatError> {
        write_f64_le(w, *self)
    }

    fn decode(r: &mut dyn Read) -> Result<Self, FileFormatError> {
        read_f64_le(r)
    }
}

impl Codec for String {
    fn encode(&self, w: &mut dyn Write) -> Result<(), FileFormatError> {
        write_len(w, self.len())?;
        w.write_all(self.as_bytes())?;
        Ok(())
    }

    fn decode(r: &mut dyn Read) -> Result<Self, FileFormatError> {
        let len = read_len(r)?;
        let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC));
        Read::take(&mut *r, len as u64).read_to_end(&mut buf)?;
        if buf.len() != len {
            return Err(FileFormatError::malformed(format!(
                "string truncated: expected {len} bytes, got {}",
                buf.len()
            )));
        }
        String::from_utf8(buf)
            .map_err(|e| FileFormatError::malformed(format!("invalid UTF-8 string: {e}")))
    }
}

/// Node indices are stored as `u32`; a graph with more nodes cannot be encoded.
impl Codec for NodeIndex {
    fn encode(&self, w: &mut dyn Write) -> Result<(), FileFormatError> {
        let raw = u32::try_from(self.0).map_err(|_| {
            FileFormatError::malformed(format!("node index {} exceeds u32", self.0))
        })?;
        write_u32_le(w, raw)
    }

    fn decode(r: &mut dyn Read) -> Result<Self, FileFormatError> {
        Ok(NodeIndex(read_u32_le(r)? as usize))
    }
}

impl<T: Codec> Codec for Vec<T> {
    fn encode(&self, w: &mut dyn Write) -> Result<(), FileFormatError> {
        write_len(w, self.len())?;
        for item in self {
            item.encode(w)?;
        }
        Ok(())
    }

    fn decode(r: &mut dyn Read) -> Result<Self, FileFormatError> {
        let len = read_len(r)?;
        let mut out = Vec::with_capacity(len.min(MAX_PREALLOC));
        for _ in 0..len {
            out.push(T::decode(r)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn encode_to_vec<T: Codec>(v: &T) -> Vec<u8> {
        let mut buf = Vec::new();
        v.encode(&mut buf).unwrap();
        buf
    }

    #[test]
    fn integers_are_little_endian() {
        assert_eq!(encode_to_vec(&1u32), vec![1, 0, 0, 0]);
        assert_eq!(encode_to_vec(&-1i32), vec![0xff; 4]);
        assert_eq!(encode_to_vec(&NodeIndex(258)), vec![2, 1, 0, 0]);
    }

    #[test]
    fn bool_rejects_non_binary_byte() {
        let mut src: &[u8] = &[2];
        match bool::decode(&mut src) {
            Err(FileFormatError::Malformed { .. }) => {}
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn version_tag_is_checked() {
        let mut buf = Vec::new();
        write_version(&mut buf).unwrap();
        assert_eq!(read_version(&mut buf.as_slice()).unwrap(), FORMAT_VERSION);

        let mut bad: &[u8] = &2i32.to_le_bytes();
        match read_version(&mut bad) {
            Err(FileFormatError::UnsupportedVersion { found: 2 }) => {}
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn truncated_sequence_is_io_error() {
        // Declares three u32 elements but carries only one.
        let mut buf = Vec::new();
        write_u32_le(&mut buf, 3).unwrap();
        write_u32_le(&mut buf, 10).unwrap();
        match Vec::<u32>::decode(&mut buf.as_slice()) {
            Err(FileFormatError::Io(_)) => {}
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn huge_declared_length_does_not_preallocate() {
        let mut buf = Vec::new();
        write_u32_le(&mut buf, u32::MAX).unwrap();
        assert!(Vec::<u64>::decode(&mut buf.as_slice()).is_err());
        assert!(String::decode(&mut buf.as_slice()).is_err());
    }

    #[test]
    fn empty_input_is_io_error() {
        let mut src: &[u8] = &[];
        assert!(matches!(u64::decode(&mut src), Err(FileFormatError::Io(_))));
    }

    proptest! {
        #[test]
        fn nested_sequences_survive_encoding(v in prop::collection::vec(prop::collection::vec(any::<u32>(), 0..8), 0..8)) {
            let buf = encode_to_vec(&v);
            let back = Vec::<Vec<u32>>::decode(&mut buf.as_slice()).unwrap();
            prop_assert_eq!(back, v);
        }

        #[test]
        fn strings_survive_encoding(s in ".{0,32}") {
            let buf = encode_to_vec(&s);
            prop_assert_eq!(String::decode(&mut buf.as_slice()).unwrap(), s);
        }
    }
}
