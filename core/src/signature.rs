use crate::compiler::ReduceProgram;
use crate::hash::HashAlgo;
use crate::{VERSION_MAJOR, VERSION_MINOR, VERSION_PATCH};

/// The literal prefix is part of the on-disk compatibility contract and must
/// be preserved regardless of implementation language.
const SIGNATURE_PREFIX: &str = "go-rainbow";

/// Builds the canonical signature text for a table configuration. A
/// deterministic total function of (version, hash algorithm id, chain
/// length, module list in order with their parameters).
pub(crate) fn build(chain_length: usize, hash_algo: HashAlgo, reduce: &ReduceProgram) -> String {
    let mut text = format!(
        "{SIGNATURE_PREFIX} version_{VERSION_MAJOR}.{VERSION_MINOR}.{VERSION_PATCH}\n"
    );
    text.push_str(&format!("chain length {chain_length}\n"));
    text.push_str(&format!("hash algorithm : {}\n", hash_algo.id()));
    for fragment in reduce.signature_fragments() {
        text.push_str(&fragment);
        text.push('\n');
    }
    text.push_str(&format!("used bytes {}", reduce.used_bytes()));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduce::{AlphabetModule, ReduceModule};

    #[test]
    fn signature_has_the_required_literal_prefix() {
        let reduce = ReduceProgram::new(vec![ReduceModule::Alphabet(AlphabetModule {
            runes: vec!["a".into()],
            min: 1,
            max: 1,
        })]);
        let sig = build(10, HashAlgo::Md5, &reduce);
        assert!(sig.starts_with("go-rainbow version_"));
        assert!(sig.contains("chain length 10\n"));
        assert!(sig.contains("hash algorithm : 2\n"));
        assert!(sig.ends_with("used bytes 2"));
    }

    #[test]
    fn identical_configurations_produce_byte_equal_signatures() {
        let make = || {
            ReduceProgram::new(vec![ReduceModule::Alphabet(AlphabetModule {
                runes: vec!["a".into(), "b".into()],
                min: 2,
                max: 3,
            })])
        };
        let a = build(20, HashAlgo::Sha1, &make());
        let b = build(20, HashAlgo::Sha1, &make());
        assert_eq!(a, b);
    }

    #[test]
    fn differing_chain_length_changes_the_signature() {
        let make = || {
            ReduceProgram::new(vec![ReduceModule::Alphabet(AlphabetModule {
                runes: vec!["a".into()],
                min: 1,
                max: 1,
            })])
        };
        let a = build(20, HashAlgo::Md5, &make());
        let b = build(21, HashAlgo::Md5, &make());
        assert_ne!(a, b);
    }
}
