use crate::constants::{EPHEMERAL_KEY_LEN, PUBLIC_KEY_FILE_LINES, SIGNATURE_NUMERIC_FIELDS};
use crate::crypto_utils::EphemeralKey;
use crate::error::RingError;
use crate::ring::{RingKeys, RingSignature};
use crate::rsa::{PublicKey, SecretKey};
use anyhow::{Context, Result};
use log::{debug, info};
use num_bigint::BigUint;
use num_traits::Zero;
use std::fs;
use std::path::Path;

/// Parses a non-empty run of ASCII digits as a base-10 integer.
fn parse_decimal(bytes: &[u8]) -> Option<BigUint> {
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    BigUint::parse_bytes(bytes, 10)
}

/// Encodes a signature as `v\ny1\ny2\n` followed by the 16 raw key bytes.
pub fn encode_signature(sig: &RingSignature) -> Vec<u8> {
    let mut out = format!("{}\n{}\n{}\n", sig.v, sig.y1, sig.y2).into_bytes();
    out.extend_from_slice(&sig.key);
    out
}

/// Decodes the layout produced by [`encode_signature`].
///
/// Everything after the third newline is the key segment, so key bytes that
/// happen to be `\n` are kept as-is.
pub fn decode_signature(bytes: &[u8]) -> Result<RingSignature> {
    let segments: Vec<&[u8]> = bytes
        .splitn(SIGNATURE_NUMERIC_FIELDS + 1, |&b| b == b'\n')
        .collect();
    if segments.len() <= SIGNATURE_NUMERIC_FIELDS {
        return Err(RingError::Parse(format!(
            "expected at least {} segments, found {}",
            SIGNATURE_NUMERIC_FIELDS + 1,
            segments.len()
        ))
        .into());
    }

    let field = |i: usize, name: &str| -> Result<BigUint> {
        parse_decimal(segments[i])
            .ok_or_else(|| RingError::Parse(format!("'{}' is not a decimal integer", name)).into())
    };
    let v = field(0, "v")?;
    let y1 = field(1, "y1")?;
    let y2 = field(2, "y2")?;

    let key_segment = segments[SIGNATURE_NUMERIC_FIELDS];
    let key: EphemeralKey = key_segment.try_into().map_err(|_| {
        RingError::Parse(format!(
            "key must be exactly {} bytes, found {}",
            EPHEMERAL_KEY_LEN,
            key_segment.len()
        ))
    })?;
    debug!(
        "Decoded signature: v bits = {}, y1 bits = {}, y2 bits = {}",
        v.bits(),
        y1.bits(),
        y2.bits()
    );
    Ok(RingSignature { v, y1, y2, key })
}

/// Parses the public key file: exactly 4 decimal lines `e1, n1, e2, n2`.
pub fn parse_public_keys(text: &str) -> Result<RingKeys> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() != PUBLIC_KEY_FILE_LINES {
        return Err(RingError::FileFormat(format!("found {} lines", lines.len())).into());
    }

    let mut values = Vec::with_capacity(PUBLIC_KEY_FILE_LINES);
    for (i, line) in lines.iter().enumerate() {
        let value = parse_decimal(line.trim().as_bytes()).ok_or_else(|| {
            RingError::FileFormat(format!("line {} is not a decimal integer", i + 1))
        })?;
        values.push(value);
    }
    let [e1, n1, e2, n2]: [BigUint; PUBLIC_KEY_FILE_LINES] = values
        .try_into()
        .map_err(|_| RingError::FileFormat("expected 4 values".to_string()))?;

    for (party, n) in [(1, &n1), (2, &n2)] {
        if n.is_zero() {
            return Err(RingError::FileFormat(format!("n{} must be non-zero", party)).into());
        }
    }
    Ok(RingKeys::new(
        PublicKey { e: e1, n: n1 },
        PublicKey { e: e2, n: n2 },
    ))
}

/// Formats keys in the layout read by [`parse_public_keys`].
pub fn format_public_keys(keys: &RingKeys) -> String {
    format!(
        "{}\n{}\n{}\n{}\n",
        keys.first.e, keys.first.n, keys.second.e, keys.second.n
    )
}

/// Parses a private scalar typed by the user.
pub fn parse_secret_key(text: &str) -> Result<SecretKey> {
    let d = parse_decimal(text.trim().as_bytes())
        .ok_or_else(|| RingError::Parse("private key must be a decimal integer".to_string()))?;
    Ok(SecretKey { d })
}

pub fn load_public_keys(path: &Path) -> Result<RingKeys> {
    info!("Loading public keys from {}", path.display());
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read public key file '{}'", path.display()))?;
    let keys = parse_public_keys(&text)
        .with_context(|| format!("Invalid public key file '{}'", path.display()))?;
    info!(
        "Public keys loaded: n1 bits = {}, n2 bits = {}",
        keys.first.n.bits(),
        keys.second.n.bits()
    );
    Ok(keys)
}

pub fn load_message(path: &Path) -> Result<Vec<u8>> {
    info!("Loading message from {}", path.display());
    let message = fs::read(path)
        .with_context(|| format!("Failed to read message file '{}'", path.display()))?;
    if message.is_empty() {
        return Err(RingError::EmptyInput(format!("message file '{}'", path.display())).into());
    }
    debug!("Message length: {} bytes", message.len());
    Ok(message)
}

pub fn load_signature_bytes(path: &Path) -> Result<Vec<u8>> {
    info!("Loading signature from {}", path.display());
    fs::read(path).with_context(|| format!("Failed to read signature file '{}'", path.display()))
}

pub fn save_signature(path: &Path, sig: &RingSignature) -> Result<()> {
    info!("Saving signature to {}", path.display());
    fs::write(path, encode_signature(sig))
        .with_context(|| format!("Failed to write signature file '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::env;

    fn sample_signature() -> RingSignature {
        RingSignature {
            v: BigUint::from(1234u32),
            y1: BigUint::from(0u32),
            y2: BigUint::parse_bytes(b"98765432109876543210987654321", 10).unwrap(),
            key: *b"0123456789abcdef",
        }
    }

    fn is_parse_error(err: &anyhow::Error) -> bool {
        matches!(err.downcast_ref::<RingError>(), Some(RingError::Parse(_)))
    }

    fn is_file_format_error(err: &anyhow::Error) -> bool {
        matches!(
            err.downcast_ref::<RingError>(),
            Some(RingError::FileFormat(_))
        )
    }

    #[test]
    fn test_encode_layout() {
        let encoded = encode_signature(&sample_signature());
        let expected = b"1234\n0\n98765432109876543210987654321\n0123456789abcdef";
        assert_eq!(encoded, expected.to_vec());
    }

    #[test]
    fn test_decode_key_with_newlines() -> Result<()> {
        let mut sig = sample_signature();
        sig.key = [b'\n'; 16];
        sig.key[5] = 0;
        let decoded = decode_signature(&encode_signature(&sig))?;
        assert_eq!(decoded, sig);
        Ok(())
    }

    #[test]
    fn test_decode_two_lines() {
        let err = decode_signature(b"123\n456").unwrap_err();
        assert!(is_parse_error(&err));
    }

    #[test]
    fn test_decode_non_numeric_fields() {
        for input in [
            &b"12x\n1\n2\n0123456789abcdef"[..],
            &b"1\n-1\n2\n0123456789abcdef"[..],
            &b"1\n1\n\n0123456789abcdef"[..],
            &b" 1\n1\n2\n0123456789abcdef"[..],
        ] {
            let err = decode_signature(input).unwrap_err();
            assert!(is_parse_error(&err), "input {:?}", input);
        }
    }

    #[test]
    fn test_decode_wrong_key_length() {
        let err = decode_signature(b"1\n2\n3\nshort").unwrap_err();
        assert!(is_parse_error(&err));
        // a trailing newline makes the key segment 17 bytes
        let err = decode_signature(b"1\n2\n3\n0123456789abcdef\n").unwrap_err();
        assert!(is_parse_error(&err));
    }

    #[test]
    fn test_parse_public_keys() -> Result<()> {
        let keys = parse_public_keys("17\n3233\n7\n33\n")?;
        assert_eq!(keys.first.e, BigUint::from(17u32));
        assert_eq!(keys.first.n, BigUint::from(3233u32));
        assert_eq!(keys.second.e, BigUint::from(7u32));
        assert_eq!(keys.second.n, BigUint::from(33u32));

        // CRLF and surrounding whitespace are accepted
        let crlf = parse_public_keys("17\r\n3233\r\n 7 \r\n33")?;
        assert_eq!(crlf, keys);

        assert_eq!(parse_public_keys(&format_public_keys(&keys))?, keys);
        Ok(())
    }

    #[test]
    fn test_parse_public_keys_wrong_line_count() {
        for text in ["", "17\n3233\n7", "17\n3233\n7\n33\n5\n"] {
            let err = parse_public_keys(text).unwrap_err();
            assert!(is_file_format_error(&err), "text {:?}", text);
        }
    }

    #[test]
    fn test_parse_public_keys_invalid_values() {
        let err = parse_public_keys("17\nabc\n7\n33").unwrap_err();
        assert!(is_file_format_error(&err));
        let err = parse_public_keys("17\n3233\n7\n0").unwrap_err();
        assert!(is_file_format_error(&err));
    }

    #[test]
    fn test_parse_secret_key() -> Result<()> {
        assert_eq!(parse_secret_key(" 2753\n")?.d, BigUint::from(2753u32));
        assert!(is_parse_error(&parse_secret_key("0x1f").unwrap_err()));
        Ok(())
    }

    #[test]
    fn test_file_helpers() -> Result<()> {
        let dir = env::temp_dir().join(format!("ring-signature-test-{}", std::process::id()));
        fs::create_dir_all(&dir)?;

        let key_path = dir.join("publickey.txt");
        fs::write(&key_path, "17\n3233\n7\n33\n")?;
        let keys = load_public_keys(&key_path)?;
        assert_eq!(keys.second.n, BigUint::from(33u32));

        let short_path = dir.join("short.txt");
        fs::write(&short_path, "17\n3233\n")?;
        let err = load_public_keys(&short_path).unwrap_err();
        assert!(is_file_format_error(&err));

        let empty_path = dir.join("empty.txt");
        fs::write(&empty_path, b"")?;
        let err = load_message(&empty_path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RingError>(),
            Some(RingError::EmptyInput(_))
        ));

        let sig_path = dir.join("signature.txt");
        save_signature(&sig_path, &sample_signature())?;
        let decoded = decode_signature(&load_signature_bytes(&sig_path)?)?;
        assert_eq!(decoded, sample_signature());

        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    proptest! {
        #[test]
        fn prop_codec_roundtrip(
            v in proptest::collection::vec(any::<u8>(), 0..64),
            y1 in proptest::collection::vec(any::<u8>(), 0..64),
            y2 in proptest::collection::vec(any::<u8>(), 0..64),
            key in any::<[u8; 16]>(),
        ) {
            let sig = RingSignature {
                v: BigUint::from_bytes_be(&v),
                y1: BigUint::from_bytes_be(&y1),
                y2: BigUint::from_bytes_be(&y2),
                key,
            };
            let decoded = decode_signature(&encode_signature(&sig)).unwrap();
            prop_assert_eq!(decoded, sig);
        }
    }
}
