//! Alphabet: the ordered symbol set a machine encrypts over.
//!
//! Maps each symbol to a contiguous index in `[0, size)` and back. Index
//! arithmetic anywhere in the crate is reduced through [`Alphabet::wrap`],
//! so negative offsets produced by rotor arithmetic land on valid symbols.

use std::collections::HashMap;
use std::fmt;

use crate::error::{EnigmaError, Result};

/// The 26 upper-case Latin letters.
pub const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// An ordered set of distinct symbols indexed from 0.
///
/// Immutable after construction. Machines, permutations and rotors share
/// one instance through an `Rc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    indices: HashMap<char, usize>,
}

impl Alphabet {
    /// Creates an alphabet whose `k`-th symbol has index `k`.
    ///
    /// # Parameters
    /// - `chars`: The symbols in index order.
    ///
    /// # Errors
    /// - [`EnigmaError::DuplicateSymbol`] if a symbol repeats.
    /// - [`EnigmaError::Config`] if `chars` is empty or contains whitespace
    ///   or parentheses, which are reserved by cycle notation.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::Alphabet;
    ///
    /// let alpha = Alphabet::new("ABCD").unwrap();
    /// assert_eq!(alpha.size(), 4);
    /// assert!(Alphabet::new("ABBA").is_err());
    /// ```
    pub fn new(chars: &str) -> Result<Self> {
        let symbols: Vec<char> = chars.chars().collect();
        if symbols.is_empty() {
            return Err(EnigmaError::config("alphabet must contain at least one symbol"));
        }
        let mut indices = HashMap::with_capacity(symbols.len());
        for (i, &symbol) in symbols.iter().enumerate() {
            if symbol.is_whitespace() || symbol == '(' || symbol == ')' {
                return Err(EnigmaError::config(format!(
                    "alphabet symbol {:?} is reserved",
                    symbol
                )));
            }
            if indices.insert(symbol, i).is_some() {
                return Err(EnigmaError::DuplicateSymbol { symbol });
            }
        }
        Ok(Alphabet { symbols, indices })
    }

    /// Returns the number of symbols.
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// Returns the symbols in index order.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Returns true if `symbol` belongs to this alphabet.
    pub fn contains(&self, symbol: char) -> bool {
        self.indices.contains_key(&symbol)
    }

    /// Returns the index of `symbol`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::AlphabetMismatch`] if `symbol` is absent.
    pub fn to_index(&self, symbol: char) -> Result<usize> {
        self.indices
            .get(&symbol)
            .copied()
            .ok_or(EnigmaError::AlphabetMismatch { symbol })
    }

    /// Returns the symbol at `index` reduced modulo the alphabet size.
    ///
    /// Any integer, including negatives, maps to a valid symbol.
    pub fn to_symbol(&self, index: i64) -> char {
        self.symbols[self.wrap(index)]
    }

    /// Reduces `index` into `[0, size)`.
    pub fn wrap(&self, index: i64) -> usize {
        index.rem_euclid(self.symbols.len() as i64) as usize
    }

    /// Converts every symbol of `text` to its index.
    ///
    /// # Errors
    /// Returns [`EnigmaError::AlphabetMismatch`] for the first symbol not in
    /// the alphabet.
    pub fn indices_of(&self, text: &str) -> Result<Vec<usize>> {
        text.chars().map(|c| self.to_index(c)).collect()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Alphabet {
            symbols: UPPER.chars().collect(),
            indices: UPPER.chars().enumerate().map(|(i, c)| (c, i)).collect(),
        }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_upper_case() {
        let alpha = Alphabet::default();
        assert_eq!(alpha.size(), 26);
        assert_eq!(alpha.to_index('A').unwrap(), 0);
        assert_eq!(alpha.to_index('Z').unwrap(), 25);
        assert_eq!(alpha, Alphabet::new(UPPER).unwrap());
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        assert_eq!(
            Alphabet::new("ABBCDEFGH"),
            Err(EnigmaError::DuplicateSymbol { symbol: 'B' })
        );
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(Alphabet::new(""), Err(EnigmaError::Config(_))));
    }

    #[test]
    fn test_reserved_symbols_rejected() {
        assert!(matches!(Alphabet::new("AB C"), Err(EnigmaError::Config(_))));
        assert!(matches!(Alphabet::new("AB(C"), Err(EnigmaError::Config(_))));
        assert!(matches!(Alphabet::new("AB)C"), Err(EnigmaError::Config(_))));
    }

    #[test]
    fn test_contains() {
        let alpha = Alphabet::new("ABCD").unwrap();
        assert!(alpha.contains('C'));
        assert!(!alpha.contains('E'));
        assert!(!alpha.contains('a'));
    }

    #[test]
    fn test_to_index_missing_symbol() {
        let alpha = Alphabet::new("ABCD").unwrap();
        assert_eq!(
            alpha.to_index('Q'),
            Err(EnigmaError::AlphabetMismatch { symbol: 'Q' })
        );
    }

    #[test]
    fn test_to_symbol_wraps_both_directions() {
        let alpha = Alphabet::default();
        let size = alpha.size() as i64;
        for c in UPPER.chars() {
            let i = alpha.to_index(c).unwrap() as i64;
            for k in -3..=3 {
                assert_eq!(alpha.to_symbol(i + k * size), c, "k = {}", k);
            }
        }
        assert_eq!(alpha.to_symbol(-1), 'Z');
        assert_eq!(alpha.to_symbol(26), 'A');
    }

    #[test]
    fn test_non_ascii_symbols() {
        let alpha = Alphabet::new("ÄÖÜß").unwrap();
        assert_eq!(alpha.size(), 4);
        assert_eq!(alpha.to_index('ß').unwrap(), 3);
        assert_eq!(alpha.to_symbol(-4), 'Ä');
    }

    #[test]
    fn test_indices_of() {
        let alpha = Alphabet::new("ABCD").unwrap();
        assert_eq!(alpha.indices_of("DAB").unwrap(), vec![3, 0, 1]);
        assert!(alpha.indices_of("DAX").is_err());
    }

    #[test]
    fn test_display_round_trips() {
        let alpha = Alphabet::new("XYZ.").unwrap();
        assert_eq!(alpha.to_string(), "XYZ.");
    }
}
