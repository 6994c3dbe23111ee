//! Machine description files.
//!
//! A description is a whitespace-separated token stream:
//!
//! ```text
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ      alphabet
//! 5 3                             rotor slots, pawls
//! I MQ (AELTPHQXRU) (BKNW) ...    name, type + notches, cycles
//! Beta N (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//! B R (AE) (BN) (CK) ...
//! ```
//!
//! The type is `M` (moving, followed by its notch symbols), `N` (fixed) or
//! `R` (reflector). Cycles may continue on following lines.

use std::rc::Rc;

use tracing::debug;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::permutation::Permutation;
use crate::rotor::{RotorCatalog, RotorDefinition};

/// A parsed machine description.
#[derive(Debug, Clone)]
pub struct MachineConfig {
    alphabet: Rc<Alphabet>,
    num_rotor_slots: usize,
    num_pawls: usize,
    catalog: RotorCatalog,
}

/// A token and the 1-based line it was read from.
#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    line: usize,
    text: &'a str,
}

struct Tokens<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    last_line: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        let tokens: Vec<Token<'a>> = text
            .lines()
            .enumerate()
            .flat_map(|(n, line)| {
                line.split_whitespace().map(move |text| Token { line: n + 1, text })
            })
            .collect();
        let last_line = text.lines().count().max(1);
        Tokens {
            tokens,
            pos: 0,
            last_line,
        }
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    /// Returns the next token or a `Parse` error naming `what` was missing.
    fn expect(&mut self, what: &str) -> Result<Token<'a>> {
        let last_line = self.last_line;
        self.bump().ok_or_else(|| {
            EnigmaError::parse(
                last_line,
                format!("configuration truncated: expected {}", what),
            )
        })
    }

    fn expect_count(&mut self, what: &str) -> Result<usize> {
        let token = self.expect(what)?;
        token.text.parse::<usize>().map_err(|_| {
            EnigmaError::parse(
                token.line,
                format!("{} must be a non-negative integer, got {:?}", what, token.text),
            )
        })
    }
}

impl MachineConfig {
    /// Parses a machine description.
    ///
    /// # Parameters
    /// - `text`: Full description text; line numbers in errors refer to it.
    ///
    /// # Errors
    /// - [`EnigmaError::Parse`] for truncated input, non-integer counts,
    ///   unknown rotor types or malformed cycle notation.
    /// - [`EnigmaError::DuplicateSymbol`] for a repeated alphabet symbol.
    /// - [`EnigmaError::Config`] for cycles or notches outside the alphabet
    ///   and duplicate rotor names.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::config::MachineConfig;
    ///
    /// let config = MachineConfig::parse("ABCD 3 1  R1 R (AB) (CD)  F N (ABC)  M1 MA (AD)").unwrap();
    /// assert_eq!(config.num_rotor_slots(), 3);
    /// assert_eq!(config.catalog().len(), 3);
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = Tokens::new(text);

        let alphabet_token = tokens.expect("alphabet")?;
        let alphabet = Rc::new(Alphabet::new(alphabet_token.text).map_err(|e| match e {
            EnigmaError::Config(message) => EnigmaError::parse(alphabet_token.line, message),
            other => other,
        })?);
        let num_rotor_slots = tokens.expect_count("number of rotor slots")?;
        let num_pawls = tokens.expect_count("number of pawls")?;

        let mut catalog = RotorCatalog::new(alphabet.clone());
        while tokens.peek().is_some() {
            let definition = read_rotor(&mut tokens, &alphabet)?;
            catalog.insert(definition)?;
        }

        debug!(
            alphabet = %alphabet,
            num_rotor_slots,
            num_pawls,
            rotors = catalog.len(),
            "machine description loaded"
        );
        Ok(MachineConfig {
            alphabet,
            num_rotor_slots,
            num_pawls,
            catalog,
        })
    }

    /// Returns the alphabet declared on the first line.
    pub fn alphabet(&self) -> &Rc<Alphabet> {
        &self.alphabet
    }

    /// Returns the number of rotor slots, reflector included.
    pub fn num_rotor_slots(&self) -> usize {
        self.num_rotor_slots
    }

    /// Returns the number of pawls.
    pub fn num_pawls(&self) -> usize {
        self.num_pawls
    }

    /// Returns the rotors described in the file, in file order.
    pub fn catalog(&self) -> &RotorCatalog {
        &self.catalog
    }

    /// Builds a fresh machine with no rotors inserted.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if the slot and pawl counts are invalid.
    pub fn build_machine(&self) -> Result<Machine> {
        Machine::new(
            self.alphabet.clone(),
            self.num_rotor_slots,
            self.num_pawls,
            self.catalog.clone(),
        )
    }
}

/// Reads one `NAME TYPE CYCLES...` rotor description.
fn read_rotor(tokens: &mut Tokens<'_>, alphabet: &Rc<Alphabet>) -> Result<RotorDefinition> {
    let name = tokens.expect("rotor name")?;
    if name.text.starts_with('(') {
        return Err(EnigmaError::parse(
            name.line,
            format!("expected a rotor name, got cycle {}", name.text),
        ));
    }
    let kind = tokens.expect(&format!("type of rotor {}", name.text))?;

    let mut cycles = Vec::new();
    while let Some(token) = tokens.peek() {
        if !token.text.starts_with('(') {
            break;
        }
        cycles.push(token.text);
        tokens.bump();
    }
    let permutation = Permutation::new(&cycles.join(" "), alphabet.clone())
        .map_err(|e| in_rotor(e, name))?;

    let mut kind_chars = kind.text.chars();
    let definition = match (kind_chars.next(), kind_chars.as_str()) {
        (Some('M'), notches) => RotorDefinition::moving(name.text, permutation, notches)
            .map_err(|e| in_rotor(e, name))?,
        (Some('N'), "") => RotorDefinition::fixed(name.text, permutation),
        (Some('R'), "") => RotorDefinition::reflector(name.text, permutation),
        (Some('N' | 'R'), _) => {
            return Err(EnigmaError::parse(
                kind.line,
                format!("rotor {}: only moving rotors have notches", name.text),
            ))
        }
        _ => {
            return Err(EnigmaError::parse(
                kind.line,
                format!(
                    "rotor {}: type must be M, N or R, got {:?}",
                    name.text, kind.text
                ),
            ))
        }
    };
    Ok(definition)
}

/// Tags an error raised while building rotor `name` with its location.
fn in_rotor(err: EnigmaError, name: Token<'_>) -> EnigmaError {
    match err {
        EnigmaError::Config(message) => EnigmaError::config(format!(
            "rotor {} (line {}): {}",
            name.text, name.line, message
        )),
        other => other.at_line(name.line),
    }
}
