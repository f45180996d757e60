//! Assembles an ordered list of [`ReduceModule`]s into a single
//! `reduce(step, hash, password)` function: the reduce compiler of the
//! engine's core triplet.

use crate::reduce::ReduceModule;

/// Perturbs `hash` by `step` so that successive positions in a chain never
/// reuse the same reduce output for equal hashes. Writes into `out`, leaving
/// `hash` untouched. This is the one mixing rule the engine commits to; an
/// on-disk table is only compatible between implementations using it.
fn mix_step(hash: &[u8], step: usize, out: &mut Vec<u8>) {
    out.clear();
    out.extend(hash.iter().enumerate().map(|(i, &b)| {
        let weight = (step.wrapping_mul(i + 1) % 256) as u8;
        b.wrapping_add(weight)
    }));
}

/// Extends `buf` by repeated doubling until it holds at least `needed`
/// bytes. `buf` must be non-empty. Grows in place by pushing bytes already
/// present, so repeated calls on a buffer whose capacity has already reached
/// `needed` do not reallocate.
fn extend_entropy(buf: &mut Vec<u8>, needed: usize) {
    debug_assert!(!buf.is_empty(), "entropy extension requires a non-empty seed");
    while buf.len() < needed {
        let to_copy = buf.len().min(needed - buf.len());
        for i in 0..to_copy {
            let b = buf[i];
            buf.push(b);
        }
    }
}

/// The compiled reduce function for a built [`crate::Table`]: a frozen,
/// ordered list of modules plus their cumulative entropy budget `U`.
#[derive(Clone)]
pub(crate) struct ReduceProgram {
    modules: Vec<ReduceModule>,
    used_bytes: usize,
}

impl ReduceProgram {
    pub(crate) fn new(modules: Vec<ReduceModule>) -> Self {
        let used_bytes = modules.iter().map(ReduceModule::entropy_bytes).sum();
        Self { modules, used_bytes }
    }

    pub(crate) fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    pub(crate) fn signature_fragments(&self) -> impl Iterator<Item = String> + '_ {
        self.modules.iter().map(ReduceModule::signature_fragment)
    }

    /// `reduce(step, hash, password)`. `scratch` is caller-owned working
    /// memory for the mixed-and-extended entropy stream; reusing it across
    /// calls is what keeps chain generation allocation-free in steady state.
    pub(crate) fn apply(&self, step: usize, hash: &[u8], password: &mut Vec<u8>, scratch: &mut Vec<u8>) {
        mix_step(hash, step, scratch);
        extend_entropy(scratch, self.used_bytes);

        password.clear();
        let mut cursor = 0;
        for module in &self.modules {
            let entropy_bytes = module.entropy_bytes();
            module.apply(&scratch[cursor..cursor + entropy_bytes], password);
            cursor += entropy_bytes;
        }
    }
}
