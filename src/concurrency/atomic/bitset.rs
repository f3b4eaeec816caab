//! Branded atomic bitsets.
//!
//! A dense alternative to `Vec<AtomicBool>`: 64 flags per word, and a flag is
//! claimed with a single `fetch_or`.

use core::sync::atomic::Ordering;

use super::GhostAtomicUsize;

/// A branded, word-packed atomic bitset.
pub struct GhostAtomicBitset<'brand> {
    bits: usize,
    words: Vec<GhostAtomicUsize<'brand>>,
}

impl<'brand> GhostAtomicBitset<'brand> {
    /// Creates a new bitset with `bits` bits, all cleared.
    pub fn new(bits: usize) -> Self {
        let words_len = bits.div_ceil(usize::BITS as usize);
        let words = (0..words_len).map(|_| GhostAtomicUsize::new(0)).collect();
        Self { bits, words }
    }

    /// Number of bits.
    pub fn len_bits(&self) -> usize {
        self.bits
    }

    /// Returns whether `bit` is set.
    ///
    /// # Panics
    /// Panics if `bit >= len_bits()`.
    #[inline]
    pub fn is_set(&self, bit: usize) -> bool {
        assert!(bit < self.bits, "bit {bit} out of range for {} bits", self.bits);
        let (word, mask) = bit_word_mask(bit);
        (self.words[word].load(Ordering::Relaxed) & mask) != 0
    }

    /// Sets `bit` and returns `true` iff this call observed it previously cleared.
    ///
    /// Exactly one of any number of concurrent callers for the same bit gets `true`.
    ///
    /// # Panics
    /// Panics if `bit >= len_bits()`.
    #[inline]
    pub fn test_and_set(&self, bit: usize, order: Ordering) -> bool {
        assert!(bit < self.bits, "bit {bit} out of range for {} bits", self.bits);
        let (word, mask) = bit_word_mask(bit);
        let prev = self.words[word].fetch_or(mask, order);
        (prev & mask) == 0
    }

    /// Number of set bits.
    ///
    /// Only meaningful once concurrent writers are quiescent.
    pub fn count_ones(&self) -> usize {
        self.words
            .iter()
            .map(|w| w.load(Ordering::Relaxed).count_ones() as usize)
            .sum()
    }
}

#[inline(always)]
fn bit_word_mask(bit: usize) -> (usize, usize) {
    // `usize::BITS` is a power of two, so division and modulo reduce to shifts.
    let word_bits = usize::BITS as usize;
    (bit / word_bits, 1usize << (bit % word_bits))
}
