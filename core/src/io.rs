//! Binary table persistence: header + chains, little-endian, with a
//! byte-exact signature check on load.

use std::io::{self, Read, Write};

use crate::chain::Chain;
use crate::error::{RainbowError, RainbowResult};

/// Writes `signature_len | signature | chain_count | (start,end)*` to
/// `writer`. Chains are expected to already be sorted and deduplicated.
pub(crate) fn save(writer: &mut impl Write, signature: &str, chains: &[Chain]) -> RainbowResult<()> {
    let sig_bytes = signature.as_bytes();
    writer.write_all(&(sig_bytes.len() as u64).to_le_bytes())?;
    writer.write_all(sig_bytes)?;
    writer.write_all(&(chains.len() as u64).to_le_bytes())?;
    for chain in chains {
        writer.write_all(&chain.start)?;
        writer.write_all(&chain.end)?;
    }
    Ok(())
}

/// The outcome of a [`load`] call: the chains successfully read, and whether
/// the stream ended before the declared chain count was reached.
pub(crate) struct LoadOutcome {
    pub chains: Vec<Chain>,
    pub truncated_after: Option<(u64, u64)>,
}

/// Reads the header, checks the signature against `expected_signature` for
/// byte equality, then reads as many `(start, end)` pairs as the declared
/// count allows before the stream ends. A clean end-of-stream exactly at the
/// declared count is success; anything short of that is reported via
/// `truncated_after`, with whatever whole chains were read kept.
pub(crate) fn load(
    reader: &mut impl Read,
    expected_signature: &str,
    digest_size: usize,
) -> RainbowResult<LoadOutcome> {
    let sig_len = read_u64(reader)? as usize;
    let mut sig_buf = vec![0u8; sig_len];
    read_exact_or_format_error(reader, &mut sig_buf)?;
    let signature = String::from_utf8(sig_buf)
        .map_err(|_| RainbowError::Format("signature bytes are not valid UTF-8".into()))?;

    if signature != expected_signature {
        return Err(RainbowError::SignatureMismatch);
    }

    let chain_count = read_u64(reader)?;

    let mut chains = Vec::new();
    let mut start = vec![0u8; digest_size];
    let mut end = vec![0u8; digest_size];
    let mut loaded = 0u64;
    let mut truncated = false;

    for _ in 0..chain_count {
        if !try_read_exact(reader, &mut start)? {
            truncated = true;
            break;
        }
        if !try_read_exact(reader, &mut end)? {
            truncated = true;
            break;
        }
        chains.push(Chain::new(start.clone(), end.clone()));
        loaded += 1;
    }

    Ok(LoadOutcome {
        chains,
        truncated_after: truncated.then_some((loaded, chain_count)),
    })
}

fn read_u64(reader: &mut impl Read) -> RainbowResult<u64> {
    let mut buf = [0u8; 8];
    read_exact_or_format_error(reader, &mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Reads the header fields strictly: any short read here means the stream
/// isn't even a well-formed table, which is a `FormatError`, not an IOError.
fn read_exact_or_format_error(reader: &mut impl Read, buf: &mut [u8]) -> RainbowResult<()> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            Err(RainbowError::Format("table header ended unexpectedly".into()))
        }
        Err(e) => Err(RainbowError::Io(e)),
    }
}

/// Reads a chain field. Returns `Ok(false)` on a short/clean EOF (the normal
/// "ran out of chains" case, handled by the caller), propagates any other
/// I/O error.
fn try_read_exact(reader: &mut impl Read, buf: &mut [u8]) -> RainbowResult<bool> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(RainbowError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chains(n: usize, d: usize) -> Vec<Chain> {
        (0..n)
            .map(|i| Chain::new(vec![i as u8; d], vec![(255 - i) as u8; d]))
            .collect()
    }

    #[test]
    fn round_trips_chains_exactly() {
        let chains = sample_chains(5, 4);
        let mut buf = Vec::new();
        save(&mut buf, "sig-a", &chains).unwrap();

        let mut cursor = &buf[..];
        let outcome = load(&mut cursor, "sig-a", 4).unwrap();
        assert!(outcome.truncated_after.is_none());
        assert_eq!(outcome.chains, chains);
    }

    #[test]
    fn mismatched_signature_is_rejected() {
        let chains = sample_chains(2, 4);
        let mut buf = Vec::new();
        save(&mut buf, "sig-a", &chains).unwrap();

        let mut cursor = &buf[..];
        let err = load(&mut cursor, "sig-b", 4).unwrap_err();
        assert!(matches!(err, RainbowError::SignatureMismatch));
    }

    #[test]
    fn truncated_stream_keeps_the_chains_read_so_far() {
        let chains = sample_chains(4, 4);
        let mut buf = Vec::new();
        save(&mut buf, "sig-a", &chains).unwrap();
        // cut the stream in the middle of the third chain
        buf.truncate(buf.len() - 6);

        let mut cursor = &buf[..];
        let outcome = load(&mut cursor, "sig-a", 4).unwrap();
        assert_eq!(outcome.chains.len(), 2);
        assert_eq!(outcome.truncated_after, Some((2, 4)));
    }

    #[test]
    fn clean_eof_exactly_at_declared_count_is_success() {
        let chains = sample_chains(3, 4);
        let mut buf = Vec::new();
        save(&mut buf, "sig-a", &chains).unwrap();

        let mut cursor = &buf[..];
        let outcome = load(&mut cursor, "sig-a", 4).unwrap();
        assert!(outcome.truncated_after.is_none());
        assert_eq!(outcome.chains.len(), 3);
    }
}
