use once_cell::sync::Lazy;
use std::collections::HashMap;

/// The character that maps to value 0.
pub const PLACEHOLDER: char = '_';

/// Value assigned to any character outside the 27-symbol alphabet.
pub const DEFAULT_VALUE: u64 = 1;

/// The measurement alphabet: a total mapping from characters to values.
///
/// The 26 lowercase Latin letters map to 1..=26 in alphabetical order, the
/// placeholder `'_'` maps to 0, and every other character falls back to
/// [`DEFAULT_VALUE`]. The symbol with the highest defined value is the
/// chaining symbol used by the decoder's size and slot rules.
#[derive(Debug, Clone)]
pub struct Alphabet {
    values: HashMap<char, u64>,
    chain: char,
    chain_value: u64,
}

impl Alphabet {
    /// Builds the fixed 27-symbol measurement alphabet.
    pub fn measurement() -> Self {
        let mut values: HashMap<char, u64> = ('a'..='z')
            .enumerate()
            .map(|(i, c)| (c, i as u64 + 1))
            .collect();
        values.insert(PLACEHOLDER, 0);

        // The chaining symbol is whichever defined symbol carries the
        // maximum value ('z' here).
        let (&chain, &chain_value) = values
            .iter()
            .max_by_key(|(_, &v)| v)
            .unwrap_or((&PLACEHOLDER, &0));

        Alphabet {
            values,
            chain,
            chain_value,
        }
    }

    /// Looks up the value of a character. Total: unmapped characters
    /// yield [`DEFAULT_VALUE`], never an error.
    pub fn value(&self, c: char) -> u64 {
        self.values.get(&c).copied().unwrap_or(DEFAULT_VALUE)
    }

    /// Whether `c` is the chaining symbol.
    pub fn is_chain(&self, c: char) -> bool {
        c == self.chain
    }

    /// The chaining symbol's value (26 for the measurement alphabet).
    pub fn chain_value(&self) -> u64 {
        self.chain_value
    }
}

static MEASUREMENT: Lazy<Alphabet> = Lazy::new(Alphabet::measurement);

/// The shared, immutable measurement alphabet, built once per process.
pub fn table() -> &'static Alphabet {
    &MEASUREMENT
}
