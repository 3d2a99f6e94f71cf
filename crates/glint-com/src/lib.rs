//! Length-prefixed message exchange over TCP.
//!
//! Each message is a little-endian `u32` byte count followed by the
//! [`Codec`](glint_codec::Codec) encoding of the value.

pub mod connection;
pub mod error;
pub mod framing;
pub mod listener;

pub use connection::{Connection, Reader, Writer};
pub use error::ComError;
pub use framing::MAX_MESSAGE_SIZE;
pub use listener::Listener;
