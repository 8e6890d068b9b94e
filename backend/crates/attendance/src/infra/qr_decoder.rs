//! QR detection on greyscale frames

use crate::domain::device::CodeDecoder;
use crate::domain::value_objects::Frame;

/// How the decoder treats light-on-dark symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InversionAttempts {
    /// Only dark-on-light symbols are found
    #[default]
    DontInvert,
    /// Retry on the inverted frame when nothing was found
    AttemptBoth,
}

/// QR decoder backed by `rqrr`
#[derive(Debug, Clone, Copy, Default)]
pub struct QrDecoder {
    inversion: InversionAttempts,
}

impl QrDecoder {
    pub fn new(inversion: InversionAttempts) -> Self {
        Self { inversion }
    }

    fn decode_once(frame: &Frame) -> Option<String> {
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            frame.width() as usize,
            frame.height() as usize,
            |x, y| frame.luma_at(x as u32, y as u32),
        );

        prepared
            .detect_grids()
            .into_iter()
            .find_map(|grid| match grid.decode() {
                Ok((_, content)) => Some(content),
                Err(e) => {
                    tracing::trace!(error = %e, "QR grid found but not decodable");
                    None
                }
            })
    }
}

impl CodeDecoder for QrDecoder {
    fn try_decode(&self, frame: &Frame) -> Option<String> {
        Self::decode_once(frame).or_else(|| match self.inversion {
            InversionAttempts::DontInvert => None,
            InversionAttempts::AttemptBoth => Self::decode_once(&frame.inverted()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_frame_decodes_nothing() {
        let frame = Frame::new(64, 64, vec![255; 64 * 64]).unwrap();
        assert_eq!(QrDecoder::new(InversionAttempts::AttemptBoth).try_decode(&frame), None);
    }
}
