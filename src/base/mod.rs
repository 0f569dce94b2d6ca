mod bytes;
mod chunk;
mod encoding;
mod range;

pub use self::bytes::Bytes;
pub use self::chunk::Chunk;
pub use self::encoding::{AsciiCompatibleEncoding, EncodingError};
pub use self::range::Range;
