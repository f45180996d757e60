//! Reduce modules: the pluggable units a [`crate::Table`] is compiled from.
//! Each module consumes a fixed number of entropy bytes and appends bytes to
//! the password under construction. See [`crate::table::ReduceProgram`] for
//! how an ordered list of modules is assembled into a single reduce function.

/// A byte-wise password transform selected by a [`TransformModule`]. Mutates
/// the password buffer in place so applying a transform never allocates.
pub type TransformFn = fn(&mut Vec<u8>);

/// A handful of named transforms for the common cases, so callers building a
/// [`TransformModule`] rarely need to hand-write a closure.
pub mod transforms {
    /// Substitutes a fixed set of letters for look-alike digits (`e`→`3`,
    /// `a`→`4`, `o`→`0`, `s`→`5`); leaves every other byte untouched.
    pub fn leet(password: &mut Vec<u8>) {
        for b in password.iter_mut() {
            *b = match *b {
                b'e' => b'3',
                b'a' => b'4',
                b'o' => b'0',
                b's' => b'5',
                other => other,
            };
        }
    }

    /// Uppercases the first byte if it is an ASCII lowercase letter.
    pub fn upper_first(password: &mut Vec<u8>) {
        if let Some(first) = password.first_mut() {
            if first.is_ascii_lowercase() {
                *first = first.to_ascii_uppercase();
            }
        }
    }
}

#[derive(Clone)]
pub(crate) struct AlphabetModule {
    pub runes: Vec<String>,
    pub min: usize,
    pub max: usize,
}

impl AlphabetModule {
    fn entropy_bytes(&self) -> usize {
        self.max + 1
    }

    fn apply(&self, entropy: &[u8], password: &mut Vec<u8>) {
        let s = if self.max > self.min {
            let span = self.max - self.min + 1;
            self.min + (entropy[0] as usize % span)
        } else {
            self.min
        };
        for i in 0..s {
            let idx = entropy[i + 1] as usize % self.runes.len();
            password.extend_from_slice(self.runes[idx].as_bytes());
        }
    }

    fn signature_fragment(&self) -> String {
        format!("alphabet {} {} {}", self.min, self.max, self.runes.concat())
    }
}

#[derive(Clone)]
pub(crate) struct WordListModule {
    pub words: Vec<Vec<u8>>,
}

impl WordListModule {
    fn entropy_bytes(&self) -> usize {
        word_list_entropy_bytes(self.words.len())
    }

    fn apply(&self, entropy: &[u8], password: &mut Vec<u8>) {
        let mut v: u128 = 0;
        for &b in entropy {
            v = (v << 8) | b as u128;
        }
        let idx = (v % self.words.len() as u128) as usize;
        password.extend_from_slice(&self.words[idx]);
    }

    fn signature_fragment(&self) -> String {
        format!("wordlist {} {:016x}", self.words.len(), fnv1a64(&self.words))
    }
}

/// `ceil(log_256(n)) + 1`, with a floor of 2, as specified for the number of
/// entropy bytes a word-list module of `n` words needs per selection.
fn word_list_entropy_bytes(n: usize) -> usize {
    let mut bytes = 0usize;
    let mut cap: u128 = 1;
    while cap < n as u128 {
        cap *= 256;
        bytes += 1;
    }
    (bytes + 1).max(2)
}

/// A small, non-cryptographic fingerprint of a word list's contents, used
/// only so two word lists of equal length but different words produce
/// distinct signature fragments. Not a security property.
fn fnv1a64(words: &[Vec<u8>]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for word in words {
        for &b in word {
            hash ^= b as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        // separator so ["ab", "c"] and ["a", "bc"] don't collide
        hash ^= 0xff;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[derive(Clone)]
pub(crate) struct TransformModule {
    pub alternatives: Vec<Option<TransformFn>>,
}

impl TransformModule {
    fn entropy_bytes(&self) -> usize {
        1
    }

    fn apply(&self, entropy: &[u8], password: &mut Vec<u8>) {
        let k = entropy[0] as usize % self.alternatives.len();
        if let Some(f) = self.alternatives[k] {
            f(password);
        }
    }

    fn signature_fragment(&self) -> String {
        format!("transform {}", self.alternatives.len())
    }
}

#[derive(Clone)]
pub(crate) enum ReduceModule {
    Alphabet(AlphabetModule),
    WordList(WordListModule),
    Transform(TransformModule),
}

impl ReduceModule {
    pub(crate) fn entropy_bytes(&self) -> usize {
        match self {
            ReduceModule::Alphabet(m) => m.entropy_bytes(),
            ReduceModule::WordList(m) => m.entropy_bytes(),
            ReduceModule::Transform(m) => m.entropy_bytes(),
        }
    }

    pub(crate) fn apply(&self, entropy: &[u8], password: &mut Vec<u8>) {
        match self {
            ReduceModule::Alphabet(m) => m.apply(entropy, password),
            ReduceModule::WordList(m) => m.apply(entropy, password),
            ReduceModule::Transform(m) => m.apply(entropy, password),
        }
    }

    pub(crate) fn signature_fragment(&self) -> String {
        match self {
            ReduceModule::Alphabet(m) => m.signature_fragment(),
            ReduceModule::WordList(m) => m.signature_fragment(),
            ReduceModule::Transform(m) => m.signature_fragment(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_exact_length_when_min_equals_max() {
        let module = AlphabetModule {
            runes: vec!["a".into(), "b".into(), "c".into()],
            min: 2,
            max: 2,
        };
        let mut password = Vec::new();
        module.apply(&[0, 0, 1], &mut password);
        assert_eq!(password, b"ab");
    }

    #[test]
    fn alphabet_length_varies_with_first_entropy_byte() {
        let module = AlphabetModule {
            runes: vec!["a".into(), "b".into()],
            min: 1,
            max: 3,
        };
        let mut password = Vec::new();
        // span is 3 (1..=3); entropy[0] % 3 == 0 -> s = 1
        module.apply(&[0, 0, 0, 0], &mut password);
        assert_eq!(password.len(), 1);

        password.clear();
        // entropy[0] % 3 == 2 -> s = 3
        module.apply(&[2, 0, 0, 0], &mut password);
        assert_eq!(password.len(), 3);
    }

    #[test]
    fn word_list_picks_word_by_modulus() {
        let module = WordListModule {
            words: vec![b"foo".to_vec(), b"bar".to_vec(), b"baz".to_vec()],
        };
        let mut password = Vec::new();
        // big-endian 0x0001 = 1 -> words[1 % 3] = "bar"
        module.apply(&[0x00, 0x01], &mut password);
        assert_eq!(password, b"bar");
    }

    #[test]
    fn word_list_entropy_bytes_matches_spec_formula() {
        assert_eq!(word_list_entropy_bytes(1), 2);
        assert_eq!(word_list_entropy_bytes(2), 2);
        assert_eq!(word_list_entropy_bytes(256), 2);
        assert_eq!(word_list_entropy_bytes(257), 3);
    }

    #[test]
    fn transform_applies_selected_alternative() {
        let module = TransformModule {
            alternatives: vec![None, Some(transforms::leet)],
        };
        let mut password = b"eeeooo".to_vec();
        module.apply(&[1], &mut password);
        assert_eq!(password, b"333000");
    }

    #[test]
    fn transform_no_op_slot_leaves_password_untouched() {
        let module = TransformModule {
            alternatives: vec![Some(transforms::leet), None],
        };
        let mut password = b"eeeooo".to_vec();
        module.apply(&[1], &mut password);
        assert_eq!(password, b"eeeooo");
    }

    #[test]
    fn signature_fragments_are_deterministic() {
        let a = AlphabetModule {
            runes: vec!["a".into(), "b".into()],
            min: 1,
            max: 2,
        };
        let b = AlphabetModule {
            runes: vec!["a".into(), "b".into()],
            min: 1,
            max: 2,
        };
        assert_eq!(a.signature_fragment(), b.signature_fragment());
    }
}
