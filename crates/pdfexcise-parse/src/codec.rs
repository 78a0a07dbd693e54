//! Stream codec: filter-chain decoding and re-encoding of stream payloads.
//!
//! Only the identity chain and `FlateDecode` without a predictor can be
//! edited. Buffers are opaque bytes throughout; nothing here interprets them
//! as text.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use pdfexcise_core::Filter;

use crate::error::CodecError;

/// Check that every filter in `filters` can be decoded and re-encoded.
///
/// # Errors
///
/// Returns [`CodecError::UnsupportedFilter`] naming the first filter that
/// cannot be edited through.
pub fn check_supported(filters: &[Filter]) -> Result<(), CodecError> {
    for filter in filters {
        match filter {
            Filter::Flate { predictor } if *predictor <= 1 => {}
            other => return Err(CodecError::UnsupportedFilter(other.to_string())),
        }
    }
    Ok(())
}

/// Decode `raw` through `filters`, applied in declaration order.
///
/// An empty chain returns the input unchanged.
///
/// # Errors
///
/// [`CodecError::UnsupportedFilter`] if any filter is not editable, or
/// [`CodecError::Corrupt`] if a Flate payload does not inflate.
pub fn decode(raw: &[u8], filters: &[Filter]) -> Result<Vec<u8>, CodecError> {
    check_supported(filters)?;
    let mut data = raw.to_vec();
    for filter in filters {
        data = inflate(&data).map_err(|e| CodecError::Corrupt {
            filter: filter.name().to_string(),
            message: e.to_string(),
        })?;
    }
    Ok(data)
}

/// Encode `buffer` for storage under `filters`, applied in reverse
/// declaration order so that [`decode`] undoes it.
///
/// The result is verified by decoding it again.
///
/// # Errors
///
/// [`CodecError::UnsupportedFilter`] if any filter is not editable, or
/// [`CodecError::EncodingRoundtrip`] if the encoded payload does not decode
/// back to `buffer`.
pub fn encode(buffer: &[u8], filters: &[Filter]) -> Result<Vec<u8>, CodecError> {
    check_supported(filters)?;
    let mut data = buffer.to_vec();
    for filter in filters.iter().rev() {
        data = deflate(&data)
            .map_err(|_| CodecError::EncodingRoundtrip(filter.name().to_string()))?;
    }
    match decode(&data, filters) {
        Ok(check) if check == buffer => Ok(data),
        _ => Err(CodecError::EncodingRoundtrip(chain_name(filters))),
    }
}

fn chain_name(filters: &[Filter]) -> String {
    filters
        .iter()
        .map(Filter::name)
        .collect::<Vec<_>>()
        .join(" ")
}

fn inflate(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() * 4);
    ZlibDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}

fn deflate(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zlib(data: &[u8]) -> Vec<u8> {
        deflate(data).unwrap()
    }

    #[test]
    fn identity_chain_is_passthrough() {
        let raw = b"BT (caf\xe9) Tj ET\xff";
        assert_eq!(decode(raw, &[]).unwrap(), raw.to_vec());
        assert_eq!(encode(raw, &[]).unwrap(), raw.to_vec());
    }

    #[test]
    fn flate_decodes() {
        let raw = zlib(b"BT /F1 12 Tf (Hello) Tj ET");
        let decoded = decode(&raw, &[Filter::FLATE]).unwrap();
        assert_eq!(decoded, b"BT /F1 12 Tf (Hello) Tj ET".to_vec());
    }

    #[test]
    fn flate_encode_decodes_back() {
        let buffer = b"q 1 0 0 1 0 0 cm BT (x) Tj ET Q".to_vec();
        let encoded = encode(&buffer, &[Filter::FLATE]).unwrap();
        assert_ne!(encoded, buffer);
        assert_eq!(decode(&encoded, &[Filter::FLATE]).unwrap(), buffer);
    }

    #[test]
    fn double_flate_chain() {
        let buffer = b"BT (twice) Tj ET".to_vec();
        let chain = [Filter::FLATE, Filter::FLATE];
        let encoded = encode(&buffer, &chain).unwrap();
        assert_eq!(decode(&encoded, &chain).unwrap(), buffer);
        assert_eq!(decode(&encoded, &[Filter::FLATE]).unwrap(), zlib(&buffer));
    }

    #[test]
    fn binary_bytes_survive() {
        let buffer: Vec<u8> = (0..=255u8).collect();
        let encoded = encode(&buffer, &[Filter::FLATE]).unwrap();
        assert_eq!(decode(&encoded, &[Filter::FLATE]).unwrap(), buffer);
    }

    #[test]
    fn unknown_filter_is_unsupported() {
        let err = decode(b"xx", &[Filter::Other("DCTDecode".to_string())]).unwrap_err();
        assert_eq!(err, CodecError::UnsupportedFilter("DCTDecode".to_string()));
    }

    #[test]
    fn unsupported_anywhere_in_chain() {
        let chain = [Filter::FLATE, Filter::Other("ASCII85Decode".to_string())];
        assert!(matches!(
            decode(b"", &chain),
            Err(CodecError::UnsupportedFilter(_))
        ));
        assert!(matches!(
            encode(b"", &chain),
            Err(CodecError::UnsupportedFilter(_))
        ));
    }

    #[test]
    fn flate_with_predictor_is_unsupported() {
        let err = check_supported(&[Filter::Flate { predictor: 12 }]).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedFilter(name) if name.contains("12")));
    }

    #[test]
    fn predictor_one_is_supported() {
        assert!(check_supported(&[Filter::Flate { predictor: 1 }]).is_ok());
    }

    #[test]
    fn corrupt_flate_is_reported() {
        let err = decode(b"definitely not zlib", &[Filter::FLATE]).unwrap_err();
        assert!(matches!(err, CodecError::Corrupt { ref filter, .. } if filter == "FlateDecode"));
    }

    #[test]
    fn empty_buffer_encodes() {
        let encoded = encode(b"", &[Filter::FLATE]).unwrap();
        assert!(decode(&encoded, &[Filter::FLATE]).unwrap().is_empty());
    }
}
