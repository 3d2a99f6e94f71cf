use crate::{Codec, DecodeError};

/// Read exactly `n` bytes at `pos`, advancing it.
pub fn read_bytes<'a>(buf: &'a [u8], pos: &mut usize, n: usize) -> Result<&'a [u8], DecodeError> {
    let end = pos.checked_add(n).ok_or(DecodeError::LengthOverflow)?;
    if end > buf.len() {
        return Err(DecodeError::UnexpectedEof);
    }
    let slice = &buf[*pos..end];
    *pos = end;
    Ok(slice)
}

/// Write a u32 length prefix followed by the raw bytes.
///
/// Used for pixel buffers, where a per-element `Vec<u8>` encoding would be wasteful.
pub fn encode_blob(bytes: &[u8], buf: &mut Vec<u8>) {
    (bytes.len() as u32).encode(buf);
    buf.extend_from_slice(bytes);
}

pub fn decode_blob(buf: &[u8], pos: &mut usize) -> Result<Vec<u8>, DecodeError> {
    let len = u32::decode(buf, pos)? as usize;
    Ok(read_bytes(buf, pos, len)?.to_vec())
}

impl Codec for bool {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(u8::from(*self));
    }

    fn decode(buf: &[u8], pos: &mut usize) -> Result<Self, DecodeError> {
        match read_bytes(buf, pos, 1)?[0] {
            0 => Ok(false),
            1 => Ok(true),
            v => Err(DecodeError::InvalidBool(v)),
        }
    }
}

macro_rules! impl_codec_for_numeric {
    ($($ty:ty),*) => {
        $(
            impl Codec for $ty {
                fn encode(&self, buf: &mut Vec<u8>) {
                    buf.extend_from_slice(&self.to_le_bytes());
                }

                fn decode(buf: &[u8], pos: &mut usize) -> Result<Self, DecodeError> {
                    const SIZE: usize = std::mem::size_of::<$ty>();
                    let mut bytes = [0u8; SIZE];
                    bytes.copy_from_slice(read_bytes(buf, pos, SIZE)?);
                    Ok(<$ty>::from_le_bytes(bytes))
                }
            }
        )*
    };
}

impl_codec_for_numeric!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl Codec for String {
    fn encode(&self, buf: &mut Vec<u8>) {
        encode_blob(self.as_bytes(), buf);
    }

    fn decode(buf: &[u8], pos: &mut usize) -> Result<Self, DecodeError> {
        String::from_utf8(decode_blob(buf, pos)?).map_err(|_| DecodeError::InvalidUtf8)
    }
}

impl<T: Codec> Codec for Vec<T> {
    fn encode(&self, buf: &mut Vec<u8>) {
        (self.len() as u32).encode(buf);
        for item in self {
            item.encode(buf);
        }
    }

    fn decode(buf: &[u8], pos: &mut usize) -> Result<Self, DecodeError> {
        let len = u32::decode(buf, pos)? as usize;
        // never trust the prefix for the allocation size
        let mut vec = Vec::with_capacity(len.min(buf.len().saturating_sub(*pos)));
        for _ in 0..len {
            vec.push(T::decode(buf, pos)?);
        }
        Ok(vec)
    }
}

impl<T: Codec> Codec for Option<T> {
    fn encode(&self, buf: &mut Vec<u8>) {
        match self {
            None => buf.push(0),
            Some(value) => {
                buf.push(1);
                value.encode(buf);
            }
        }
    }

    fn decode(buf: &[u8], pos: &mut usize) -> Result<Self, DecodeError> {
        match read_bytes(buf, pos, 1)?[0] {
            0 => Ok(None),
            1 => Ok(Some(T::decode(buf, pos)?)),
            tag => Err(DecodeError::InvalidTag(tag)),
        }
    }
}
