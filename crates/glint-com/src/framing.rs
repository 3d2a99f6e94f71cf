use crate::ComError;
use glint_codec::Codec;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest body accepted from a peer. A 4K RGBA frame is about 33 MB.
pub const MAX_MESSAGE_SIZE: u32 = 64 * 1024 * 1024;

/// Encode `value` and write it with its length prefix.
pub async fn write_message<T, W>(writer: &mut W, value: &T) -> Result<(), ComError>
where
    T: Codec,
    W: AsyncWrite + Unpin,
{
    let body = value.to_bytes();
    let len = u32::try_from(body.len()).unwrap_or(u32::MAX);
    if len > MAX_MESSAGE_SIZE {
        return Err(ComError::MessageTooLarge(len));
    }

    let mut buf = Vec::with_capacity(4 + body.len());
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(&body);
    writer.write_all(&buf).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one length-prefixed message and decode it.
///
/// A clean close before the prefix and a close mid-message both yield
/// `ComError::ConnectionClosed`.
pub async fn read_message<T, R>(reader: &mut R) -> Result<T, ComError>
where
    T: Codec,
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await?;
    let len = u32::from_le_bytes(len_buf);
    if len > MAX_MESSAGE_SIZE {
        return Err(ComError::MessageTooLarge(len));
    }

    let mut body = vec![0u8; len as usize];
    reader.read_exact(&mut body).await?;
    Ok(T::from_bytes(&body)?)
}
