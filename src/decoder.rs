//! The package decoder.
//!
//! Consumes an input character sequence left to right exactly once and emits
//! one integer total per recognized package. Two sub-steps share a single
//! forward-only cursor: the size resolver decides how many value slots the
//! next package has, and the slot accumulator fills those slots. Both take
//! the cursor by value and return the updated cursor, so each can be tested
//! on its own.
//!
//! The decoder is total: every finite character sequence, including the
//! empty one, produces a well-defined result. There is no error path.

use crate::alphabet::{self, Alphabet};

/// Decodes `input` into its package totals using the shared measurement
/// alphabet. Deterministic and pure; repeated calls yield identical output.
pub fn decode(input: &str) -> Vec<u64> {
    decode_with(input, alphabet::table())
}

/// Decodes `input` against an explicit alphabet.
pub fn decode_with(input: &str, alphabet: &Alphabet) -> Vec<u64> {
    let chars: Vec<char> = input.chars().collect();
    let mut totals = Vec::new();
    let mut cursor = 0;
    while cursor < chars.len() {
        let (size, at_slots) = resolve_package_size(&chars, cursor, alphabet);
        let (total, at_boundary) = fill_slots(&chars, at_slots, size, alphabet);
        totals.push(total);
        cursor = at_boundary;
    }
    totals
}

/// Determines the next package's slot count.
///
/// A chaining symbol with a successor combines its value with the
/// successor's; a chaining symbol as the very last character falls through
/// to the plain branch, since the chain needs a following character to
/// trigger.
fn resolve_package_size(chars: &[char], cursor: usize, alphabet: &Alphabet) -> (u64, usize) {
    let c = chars[cursor];
    if alphabet.is_chain(c) && cursor + 1 < chars.len() {
        (alphabet.chain_value() + alphabet.value(chars[cursor + 1]), cursor + 2)
    } else {
        (alphabet.value(c), cursor + 1)
    }
}

/// Fills exactly `size` slots and returns the package total.
///
/// Each slot consumes a run of zero or more chaining symbols plus one
/// trailing character, if any input remains. Once the input is exhausted,
/// every unfilled slot pads the total by 1 without consuming anything.
fn fill_slots(chars: &[char], mut cursor: usize, size: u64, alphabet: &Alphabet) -> (u64, usize) {
    let mut total = 0;
    let mut filled = 0;
    while filled < size && cursor < chars.len() {
        let mut slot = 0;
        while cursor < chars.len() && alphabet.is_chain(chars[cursor]) {
            slot += alphabet.chain_value();
            cursor += 1;
        }
        if cursor < chars.len() {
            slot += alphabet.value(chars[cursor]);
            cursor += 1;
        }
        total += slot;
        filled += 1;
    }
    total += size - filled;
    (total, cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::table;

    #[test]
    fn size_resolver_plain_character() {
        let chars: Vec<char> = "bcd".chars().collect();
        assert_eq!(resolve_package_size(&chars, 0, table()), (2, 1));
    }

    #[test]
    fn size_resolver_chains_into_successor() {
        let chars: Vec<char> = "zc".chars().collect();
        assert_eq!(resolve_package_size(&chars, 0, table()), (29, 2));
    }

    #[test]
    fn size_resolver_trailing_chain_symbol_does_not_chain() {
        let chars: Vec<char> = "az".chars().collect();
        assert_eq!(resolve_package_size(&chars, 1, table()), (26, 2));
    }

    #[test]
    fn size_resolver_chain_over_unmapped_successor() {
        let chars: Vec<char> = "z!".chars().collect();
        assert_eq!(resolve_package_size(&chars, 0, table()), (27, 2));
    }

    #[test]
    fn size_resolver_placeholder_gives_zero() {
        let chars: Vec<char> = "_a".chars().collect();
        assert_eq!(resolve_package_size(&chars, 0, table()), (0, 1));
    }

    #[test]
    fn slots_consume_plain_characters() {
        let chars: Vec<char> = "cc".chars().collect();
        assert_eq!(fill_slots(&chars, 0, 2, table()), (6, 2));
    }

    #[test]
    fn slots_accumulate_chain_runs() {
        // One slot: z + z + a = 53.
        let chars: Vec<char> = "zza".chars().collect();
        assert_eq!(fill_slots(&chars, 0, 1, table()), (53, 3));
    }

    #[test]
    fn slot_chain_run_may_exhaust_input() {
        // The run itself ends the input; no trailing character is added.
        let chars: Vec<char> = "z".chars().collect();
        assert_eq!(fill_slots(&chars, 0, 1, table()), (26, 1));
    }

    #[test]
    fn exhausted_input_pads_each_slot_with_one() {
        let chars: Vec<char> = "b".chars().collect();
        assert_eq!(fill_slots(&chars, 0, 4, table()), (2 + 3, 1));
        assert_eq!(fill_slots(&chars, 1, 4, table()), (4, 1));
    }

    #[test]
    fn zero_size_fills_nothing() {
        let chars: Vec<char> = "abc".chars().collect();
        assert_eq!(fill_slots(&chars, 0, 0, table()), (0, 0));
    }
}
