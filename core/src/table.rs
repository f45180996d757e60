use std::fs;
use std::io::{Read, Write};
use std::ops::Range;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info, trace, warn};

use crate::chain::Chain;
use crate::compiler::ReduceProgram;
use crate::error::{RainbowError, RainbowResult};
use crate::hash::{HashAdapter, HashAlgo};
use crate::io;
use crate::reduce::{AlphabetModule, ReduceModule, TransformFn, TransformModule, WordListModule};
use crate::signature;

/// How many chains `generate_chains` produces between progress log lines.
const GENERATION_LOG_BATCH: usize = 1000;

/// A rainbow table: configuration, compiled reduce function, chain array,
/// and the scratch buffers its inner loops reuse.
///
/// A `Table` starts in the *configuring* phase, accepting `compile_*`
/// calls. `build()` freezes the module list and moves it to the *built*
/// phase, which is the only phase that accepts chain generation, lookup,
/// and persistence.
pub struct Table {
    hash_algo: HashAlgo,
    chain_length: usize,
    digest_size: usize,
    modules: Vec<ReduceModule>,
    reduce: Option<ReduceProgram>,
    signature: String,
    built: bool,

    chains: Vec<Chain>,
    sorted: bool,

    rng: StdRng,
    hash_adapter: HashAdapter,
    password_buf: Vec<u8>,
    scratch_buf: Vec<u8>,
}

impl Table {
    /// Creates a new table in the configuring phase, seeded from the OS
    /// entropy source.
    pub fn new(hash_algo: HashAlgo, chain_length: usize) -> RainbowResult<Self> {
        Self::with_rng(hash_algo, chain_length, StdRng::from_entropy())
    }

    /// Creates a new table whose chain generation is driven by a
    /// reproducibly-seeded RNG. Used by tests and demos that need
    /// deterministic chains.
    pub fn with_seed(hash_algo: HashAlgo, chain_length: usize, seed: u64) -> RainbowResult<Self> {
        Self::with_rng(hash_algo, chain_length, StdRng::seed_from_u64(seed))
    }

    fn with_rng(hash_algo: HashAlgo, chain_length: usize, rng: StdRng) -> RainbowResult<Self> {
        if chain_length == 0 {
            return Err(RainbowError::Config("chain length must be at least 1".into()));
        }
        let digest_size = hash_algo.digest_size();
        Ok(Self {
            hash_algo,
            chain_length,
            digest_size,
            modules: Vec::new(),
            reduce: None,
            signature: String::new(),
            built: false,
            chains: Vec::new(),
            sorted: true,
            rng,
            hash_adapter: HashAdapter::new(hash_algo),
            password_buf: Vec::new(),
            scratch_buf: Vec::new(),
        })
    }

    fn ensure_configuring(&self) -> RainbowResult<()> {
        if self.built {
            return Err(RainbowError::State(
                "cannot add reduce modules after the table has been built".into(),
            ));
        }
        Ok(())
    }

    fn ensure_built(&self) -> RainbowResult<()> {
        if !self.built {
            return Err(RainbowError::State(
                "the table must be built before this operation".into(),
            ));
        }
        Ok(())
    }

    /// Registers an alphabet module: appends between `min` and `max`
    /// (inclusive) runes from `alphabet` per invocation.
    pub fn compile_alphabet(mut self, alphabet: &str, min: usize, max: usize) -> RainbowResult<Self> {
        self.ensure_configuring()?;

        let runes: Vec<String> = alphabet.chars().map(String::from).collect();
        if runes.is_empty() {
            return Err(RainbowError::Config("alphabet must not be empty".into()));
        }
        if runes.len() >= 255 {
            return Err(RainbowError::Config(
                "alphabet must have fewer than 255 runes".into(),
            ));
        }
        if max == 0 {
            return Err(RainbowError::Config("alphabet max must be greater than 0".into()));
        }
        if max < min {
            return Err(RainbowError::Config("alphabet max must be >= min".into()));
        }

        self.modules
            .push(ReduceModule::Alphabet(AlphabetModule { runes, min, max }));
        Ok(self)
    }

    /// Registers a word-list module whose words are read from a
    /// newline-delimited UTF-8 text file. The file is fully read into
    /// memory and closed before this call returns.
    pub fn compile_word_list(self, path: impl AsRef<Path>) -> RainbowResult<Self> {
        let text = fs::read_to_string(path.as_ref()).map_err(|e| {
            RainbowError::Config(format!(
                "word list file {:?} could not be read: {e}",
                path.as_ref()
            ))
        })?;
        let words: Vec<Vec<u8>> = text
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| line.as_bytes().to_vec())
            .collect();
        self.compile_word_list_from(words)
    }

    /// Registers a word-list module from an in-memory list of words.
    pub fn compile_word_list_from(mut self, words: Vec<Vec<u8>>) -> RainbowResult<Self> {
        self.ensure_configuring()?;
        if words.is_empty() {
            return Err(RainbowError::Config("word list must not be empty".into()));
        }
        self.modules.push(ReduceModule::WordList(WordListModule { words }));
        Ok(self)
    }

    /// Registers a transform module: one slot is selected per invocation and
    /// applied to the password built so far (or left unchanged for a `None`
    /// slot).
    pub fn compile_transform(mut self, alternatives: Vec<Option<TransformFn>>) -> RainbowResult<Self> {
        self.ensure_configuring()?;
        if alternatives.is_empty() {
            return Err(RainbowError::Config(
                "transform must have at least one alternative".into(),
            ));
        }
        if alternatives.len() > 255 {
            return Err(RainbowError::Config(
                "transform must have at most 255 alternatives".into(),
            ));
        }
        self.modules
            .push(ReduceModule::Transform(TransformModule { alternatives }));
        Ok(self)
    }

    /// Freezes the module list, computes the entropy budget and signature,
    /// and moves the table to the built phase.
    pub fn build(mut self) -> RainbowResult<Self> {
        if self.built {
            return Err(RainbowError::Config("build() was already called".into()));
        }
        if self.modules.is_empty() {
            return Err(RainbowError::Config(
                "cannot build a table with no reduce modules registered".into(),
            ));
        }

        let reduce = ReduceProgram::new(self.modules.clone());
        let sig = signature::build(self.chain_length, self.hash_algo, &reduce);

        self.scratch_buf
            .reserve(reduce.used_bytes().max(self.digest_size));

        info!(
            chain_length = self.chain_length,
            used_bytes = reduce.used_bytes(),
            hash_algo = self.hash_algo.id(),
            "table built"
        );

        self.signature = sig;
        self.reduce = Some(reduce);
        self.built = true;
        Ok(self)
    }

    /// The table's canonical signature text. Only meaningful once built.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// The digest width `D`, in bytes.
    pub fn digest_size(&self) -> usize {
        self.digest_size
    }

    /// The number of chains currently held.
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Generates one new chain: a random start, reduced/hashed `chain_length`
    /// times to produce its end. Does not add it to the table.
    pub fn new_chain(&mut self) -> RainbowResult<Chain> {
        self.ensure_built()?;

        let d = self.digest_size;
        let mut start = vec![0u8; d];
        self.rng.fill_bytes(&mut start);
        let mut end = start.clone();

        for step in 0..self.chain_length {
            self.reduce
                .as_ref()
                .expect("built table always carries a reduce program")
                .apply(step, &end, &mut self.password_buf, &mut self.scratch_buf);
            self.hash_adapter.hash(&self.password_buf, &mut end);
        }

        Ok(Chain::new(start, end))
    }

    /// Appends `chain` to the table, marking the chain array unsorted.
    pub fn add_chain(&mut self, chain: Chain) -> RainbowResult<()> {
        self.ensure_built()?;
        self.chains.push(chain);
        self.sorted = false;
        Ok(())
    }

    /// Generates and adds `n` chains, logging progress every
    /// [`GENERATION_LOG_BATCH`] chains. Returns the number of chains added.
    pub fn generate_chains(&mut self, n: usize) -> RainbowResult<usize> {
        self.ensure_built()?;
        for i in 0..n {
            let chain = self.new_chain()?;
            self.add_chain(chain)?;
            if (i + 1) % GENERATION_LOG_BATCH == 0 {
                debug!(generated = i + 1, total = n, "chain generation progress");
            }
        }
        Ok(n)
    }

    /// Sorts the chain array by `end` (ties broken by `start`, so exact
    /// duplicates become adjacent and sort remains stable for lookups). A
    /// no-op if already sorted.
    pub fn sort_chains(&mut self) -> RainbowResult<()> {
        self.ensure_built()?;
        if self.sorted {
            return Ok(());
        }
        self.chains
            .sort_unstable_by(|a, b| a.end.cmp(&b.end).then_with(|| a.start.cmp(&b.start)));
        self.sorted = true;
        Ok(())
    }

    /// Removes chains that are byte-identical on both endpoints via
    /// sort-then-adjacent-compare (never O(N^2)). Idempotent.
    pub fn dedup_chains(&mut self) -> RainbowResult<()> {
        self.ensure_built()?;
        self.sort_chains()?;
        self.chains.dedup();
        Ok(())
    }

    /// Returns the half-open range of chains whose `end` equals `cand`,
    /// found by binary search. The chain array must already be sorted.
    fn find_chain_range(&self, cand: &[u8]) -> Range<usize> {
        let start = self.chains.partition_point(|c| c.end.as_slice() < cand);
        let end = self.chains.partition_point(|c| c.end.as_slice() <= cand);
        start..end
    }

    /// Walks `chain` from its start, looking for the step whose hash equals
    /// `target`. Returns the recovered password, or `None` on a false
    /// positive (an `end` match whose walk never reaches `target`).
    fn walk_chain(&mut self, chain: &Chain, target: &[u8]) -> Option<Vec<u8>> {
        let reduce = self.reduce.as_ref().expect("built table always carries a reduce program");
        let mut buf = chain.start.clone();
        let mut password = Vec::new();
        let mut scratch = Vec::new();
        let mut candidate = Vec::with_capacity(target.len());

        for step in 0..self.chain_length {
            reduce.apply(step, &buf, &mut password, &mut scratch);
            self.hash_adapter.hash(&password, &mut candidate);
            if candidate.as_slice() == target {
                return Some(password);
            }
            buf.clear();
            buf.extend_from_slice(&candidate);
        }
        None
    }

    /// Walks `level` reduce/hash steps forward from `chain.start`, returning
    /// the password produced at that step and the hash it produces. This is
    /// the known-plaintext sample used to confirm that `lookup` recovers a
    /// preimage from an *intermediate* point on a chain, not only from a
    /// stored `end` (which would only ever exercise `lookup`'s `depth == 0`
    /// case). `level` must be between `1` and the table's chain length.
    pub fn sample(&mut self, chain: &Chain, level: usize) -> RainbowResult<(Vec<u8>, Vec<u8>)> {
        self.ensure_built()?;
        if level == 0 || level > self.chain_length {
            return Err(RainbowError::Config(format!(
                "sample level {level} must be between 1 and the chain length {}",
                self.chain_length
            )));
        }

        let reduce = self.reduce.as_ref().expect("built table always carries a reduce program");
        let mut cand = chain.start.clone();
        let mut password = Vec::new();
        let mut scratch = Vec::new();

        for step in 0..level {
            reduce.apply(step, &cand, &mut password, &mut scratch);
            self.hash_adapter.hash(&password, &mut cand);
        }

        Ok((password, cand))
    }

    /// Recovers a password hashing to `hash`, if the table covers it.
    ///
    /// For each of the `L` possible depths, recomputes the chain ending
    /// that `hash` would have produced at that depth, looks it up among
    /// stored endpoints (all ties tried in array order), and walks each
    /// matching chain from its start to confirm or reject it as a false
    /// positive.
    pub fn lookup(&mut self, hash: &[u8]) -> RainbowResult<Option<Vec<u8>>> {
        self.ensure_built()?;
        self.sort_chains()?;

        let l = self.chain_length;
        let mut cand = vec![0u8; hash.len()];
        let mut password = Vec::new();
        let mut scratch = Vec::new();

        for depth in 0..l {
            cand.clear();
            cand.extend_from_slice(hash);

            for step in (l - depth)..l {
                let reduce = self
                    .reduce
                    .as_ref()
                    .expect("built table always carries a reduce program");
                reduce.apply(step, &cand, &mut password, &mut scratch);
                self.hash_adapter.hash(&password, &mut cand);
            }

            trace!(depth, cand = %hex_preview(&cand), "lookup depth probe");

            let range = self.find_chain_range(&cand);
            if range.is_empty() {
                continue;
            }

            for idx in range {
                let chain = self.chains[idx].clone();
                if let Some(p) = self.walk_chain(&chain, hash) {
                    return Ok(Some(p));
                }
            }
        }

        Ok(None)
    }

    /// Sorts and deduplicates the chains, then writes them with the table's
    /// signature to `writer` (see [`crate::io`] for the on-disk format).
    pub fn save(&mut self, mut writer: impl Write) -> RainbowResult<()> {
        self.ensure_built()?;
        self.dedup_chains()?;
        io::save(&mut writer, &self.signature, &self.chains)
    }

    /// Loads chains from `reader`, appending them to this table. Fails with
    /// `SignatureMismatch` if the stream's signature doesn't byte-for-byte
    /// match this table's, leaving existing chains untouched. A truncated
    /// stream keeps whatever whole chains were read and reports
    /// `FormatError`.
    pub fn load(&mut self, mut reader: impl Read) -> RainbowResult<()> {
        self.ensure_built()?;
        let outcome = io::load(&mut reader, &self.signature, self.digest_size)?;

        let loaded = outcome.chains.len();
        self.chains.extend(outcome.chains);
        self.sorted = false;
        self.dedup_chains()?;

        if let Some((got, declared)) = outcome.truncated_after {
            warn!(loaded = got, declared, "table load ended before declared chain count");
            return Err(RainbowError::Format(format!(
                "loaded {loaded} chains before the stream ended, {declared} were declared"
            )));
        }

        Ok(())
    }
}

/// Cheap hex formatting for trace logs; `hex` itself stays a CLI-only
/// dependency since the library crate only needs this for diagnostics.
fn hex_preview(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
