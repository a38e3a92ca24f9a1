//! PNG chunk framing.

use flate2::Crc;
use winnow::{
    Parser as _,
    binary::be_u32,
    error::EmptyError,
    token::take,
};

use super::PngError;

/// One chunk, borrowed from the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub len: u32,
    pub kind: [u8; 4],
    pub data: &'a [u8],
    pub crc: u32,
}

impl Chunk<'_> {
    /// Whether the stored CRC matches the chunk's type and data.
    pub fn crc_matches(&self) -> bool {
        let mut crc = Crc::new();
        crc.update(&self.kind);
        crc.update(self.data);
        crc.sum() == self.crc
    }
}

/// Parses out the chunk at the front of `input`.
///
/// `offset` is only used for error reporting.
pub fn chunk<'a>(input: &mut &'a [u8], offset: usize) -> Result<Chunk<'a>, PngError> {
    let head = |_: EmptyError| {
        log::error!("PNG ended inside a chunk head at `{offset}`.");
        PngError::TruncatedChunkHead { offset }
    };
    let len: u32 = be_u32.parse_next(input).map_err(head)?;
    let kind_slice: &[u8] = take(4_usize).parse_next(input).map_err(head)?;
    let kind: [u8; 4] = [kind_slice[0], kind_slice[1], kind_slice[2], kind_slice[3]];

    // the data and its CRC must both fit
    let remaining: usize = input.len();
    let too_long = || {
        log::error!(
            "Chunk `{}` at `{offset}` claims `{len}` bytes, but only `{remaining}` remain.",
            String::from_utf8_lossy(&kind)
        );
        PngError::ChunkTooLong {
            kind,
            len,
            remaining,
        }
    };
    let data: &'a [u8] = take(len as usize)
        .parse_next(input)
        .map_err(|_: EmptyError| too_long())?;
    let crc: u32 = be_u32.parse_next(input).map_err(|_: EmptyError| too_long())?;

    Ok(Chunk {
        len,
        kind,
        data,
        crc,
    })
}

/// Builds a complete chunk (length, type, data, and CRC).
pub fn build(kind: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut crc = Crc::new();
    crc.update(kind);
    crc.update(data);

    let mut v = Vec::with_capacity(data.len() + 12);
    v.extend_from_slice(&(data.len() as u32).to_be_bytes());
    v.extend_from_slice(kind);
    v.extend_from_slice(data);
    v.extend_from_slice(&crc.sum().to_be_bytes());
    v
}

#[cfg(test)]
mod tests {
    use flate2::Crc;

    use super::{PngError, build, chunk};
    use crate::util::logger;

    #[test]
    fn crc_of_iend() {
        logger();

        // every PNG ends with this exact chunk
        let mut crc = Crc::new();
        crc.update(b"IEND");
        assert_eq!(crc.sum(), 0xAE42_6082);
    }

    #[test]
    fn parses_a_built_chunk() {
        logger();

        let bytes = build(b"tEXt", b"Title\0Cat");
        let input = &mut bytes.as_slice();
        let c = chunk(input, 8).unwrap();

        assert_eq!(&c.kind, b"tEXt");
        assert_eq!(c.len, 9);
        assert_eq!(c.data, b"Title\0Cat");
        assert!(c.crc_matches());
        assert!(input.is_empty());
    }

    #[test]
    fn length_past_the_end_is_corruption() {
        logger();

        let mut bytes = build(b"tEXt", b"abc");
        bytes.truncate(bytes.len() - 1);
        assert!(matches!(
            chunk(&mut bytes.as_slice(), 8),
            Err(PngError::ChunkTooLong { len: 3, .. })
        ));

        assert_eq!(
            chunk(&mut [0_u8, 0, 0].as_slice(), 8),
            Err(PngError::TruncatedChunkHead { offset: 8 })
        );
    }
}
