//! Permutation: a bijection over an alphabet's index space.
//!
//! Permutations are written in cycle notation, e.g. `"(AELTPHQXRU) (BKNW)"`.
//! Each symbol maps to the next symbol of its cycle, wrapping at the end of
//! the cycle; symbols that appear in no cycle map to themselves.
//!
//! The cycles are compiled once into a forward and an inverse lookup table,
//! so [`Permutation::permute`] and [`Permutation::invert`] are O(1).

use std::fmt;
use std::rc::Rc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};

/// A bijective mapping over `[0, alphabet.size())`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    alphabet: Rc<Alphabet>,
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// Builds a permutation from cycle notation over `alphabet`.
    ///
    /// Whitespace is ignored. An empty string yields the identity.
    ///
    /// # Parameters
    /// - `cycles`: Disjoint cycles such as `"(AELTPHQXRU) (BKNW)"`.
    /// - `alphabet`: Symbol set the cycles are written in.
    ///
    /// # Errors
    /// - [`EnigmaError::Config`] if a cycle references a symbol outside the
    ///   alphabet, or a symbol appears more than once across the cycles.
    /// - [`EnigmaError::Parse`] if the parentheses are unbalanced or nested,
    ///   or a symbol stands outside any cycle.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    /// use enigma::{Alphabet, Permutation};
    ///
    /// let alpha = Rc::new(Alphabet::new("ABCD").unwrap());
    /// let perm = Permutation::new("(BACD)", alpha).unwrap();
    /// assert_eq!(perm.permute_symbol('A').unwrap(), 'C');
    /// assert_eq!(perm.invert_symbol('A').unwrap(), 'B');
    /// ```
    pub fn new(cycles: &str, alphabet: Rc<Alphabet>) -> Result<Self> {
        let parsed = parse_cycles(cycles, &alphabet)?;
        let size = alphabet.size();

        let mut forward: Vec<usize> = (0..size).collect();
        let mut seen = vec![false; size];
        for cycle in &parsed {
            for (k, &from) in cycle.iter().enumerate() {
                if seen[from] {
                    return Err(EnigmaError::config(format!(
                        "symbol '{}' appears in more than one cycle position",
                        alphabet.to_symbol(from as i64)
                    )));
                }
                seen[from] = true;
                forward[from] = cycle[(k + 1) % cycle.len()];
            }
        }

        let mut inverse = vec![0usize; size];
        for (from, &to) in forward.iter().enumerate() {
            inverse[to] = from;
        }

        Ok(Permutation {
            alphabet,
            forward,
            inverse,
        })
    }

    /// Returns the identity permutation over `alphabet`.
    pub fn identity(alphabet: Rc<Alphabet>) -> Self {
        let forward: Vec<usize> = (0..alphabet.size()).collect();
        Permutation {
            alphabet,
            inverse: forward.clone(),
            forward,
        }
    }

    /// Returns the size of the alphabet this permutation acts on.
    pub fn size(&self) -> usize {
        self.forward.len()
    }

    /// Returns the alphabet this permutation was built over.
    pub fn alphabet(&self) -> &Rc<Alphabet> {
        &self.alphabet
    }

    /// Reduces `index` into `[0, size)`.
    pub fn wrap(&self, index: i64) -> usize {
        self.alphabet.wrap(index)
    }

    /// Applies the permutation to `index` taken modulo the alphabet size.
    pub fn permute(&self, index: i64) -> usize {
        self.forward[self.wrap(index)]
    }

    /// Applies the inverse permutation to `index` taken modulo the alphabet size.
    pub fn invert(&self, index: i64) -> usize {
        self.inverse[self.wrap(index)]
    }

    /// Applies the permutation to a symbol.
    ///
    /// # Errors
    /// Returns [`EnigmaError::AlphabetMismatch`] if `symbol` is not in the alphabet.
    pub fn permute_symbol(&self, symbol: char) -> Result<char> {
        let index = self.alphabet.to_index(symbol)?;
        Ok(self.alphabet.to_symbol(self.forward[index] as i64))
    }

    /// Applies the inverse permutation to a symbol.
    ///
    /// # Errors
    /// Returns [`EnigmaError::AlphabetMismatch`] if `symbol` is not in the alphabet.
    pub fn invert_symbol(&self, symbol: char) -> Result<char> {
        let index = self.alphabet.to_index(symbol)?;
        Ok(self.alphabet.to_symbol(self.inverse[index] as i64))
    }

    /// Returns true iff no index maps to itself.
    pub fn is_derangement(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &to)| i != to)
    }

    /// Returns the non-trivial cycles, each starting at its lowest index.
    pub fn cycles(&self) -> Vec<Vec<usize>> {
        let mut visited = vec![false; self.size()];
        let mut cycles = Vec::new();
        for start in 0..self.size() {
            if visited[start] || self.forward[start] == start {
                continue;
            }
            let mut cycle = Vec::new();
            let mut i = start;
            while !visited[i] {
                visited[i] = true;
                cycle.push(i);
                i = self.forward[i];
            }
            cycles.push(cycle);
        }
        cycles
    }
}

impl fmt::Display for Permutation {
    /// Writes the permutation in canonical cycle notation, fixed points omitted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, cycle) in self.cycles().iter().enumerate() {
            if n > 0 {
                write!(f, " ")?;
            }
            write!(f, "(")?;
            for &i in cycle {
                write!(f, "{}", self.alphabet.to_symbol(i as i64))?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Splits cycle notation into cycles of alphabet indices.
fn parse_cycles(cycles: &str, alphabet: &Alphabet) -> Result<Vec<Vec<usize>>> {
    let mut parsed = Vec::new();
    let mut current: Option<Vec<usize>> = None;

    for c in cycles.chars() {
        if c.is_whitespace() {
            continue;
        }
        match c {
            '(' => {
                if current.is_some() {
                    return Err(EnigmaError::parse(0, "nested '(' in cycle notation"));
                }
                current = Some(Vec::new());
            }
            ')' => match current.take() {
                Some(cycle) => parsed.push(cycle),
                None => return Err(EnigmaError::parse(0, "unmatched ')' in cycle notation")),
            },
            symbol => match current.as_mut() {
                Some(cycle) => {
                    let index = alphabet.to_index(symbol).map_err(|_| {
                        EnigmaError::config(format!(
                            "cycle symbol '{}' is not in the alphabet",
                            symbol
                        ))
                    })?;
                    cycle.push(index);
                }
                None => {
                    return Err(EnigmaError::parse(
                        0,
                        format!("symbol '{}' outside of any cycle", symbol),
                    ))
                }
            },
        }
    }

    if current.is_some() {
        return Err(EnigmaError::parse(0, "unclosed '(' in cycle notation"));
    }
    Ok(parsed)
}
