//! Rotors: permutation wiring plus a rotational offset.
//!
//! The wiring of a rotor ([`RotorDefinition`]) is immutable and shared by
//! every machine that mounts it. The position of a mounted rotor
//! ([`Rotor`]) belongs to exactly one machine slot. Keeping the two apart
//! lets one [`RotorCatalog`] feed any number of machines without their
//! rotor positions interfering.
//!
//! ```text
//! RotorCatalog ── Rc<RotorDefinition> ──┬── Rotor (machine A, slot 3)
//!                                       └── Rotor (machine B, slot 2)
//! ```

use std::collections::HashMap;
use std::rc::Rc;

use tracing::warn;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;

/// The variant of a rotor, carrying only the state that variant needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Turns the signal around; sits in slot 0 and never moves.
    Reflector,
    /// Participates in both passes but never advances.
    Fixed,
    /// Advanced by a pawl. `notches` holds alphabet indices.
    Moving { notches: Vec<usize> },
}

/// Immutable rotor wiring as described in a machine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotorDefinition {
    name: String,
    kind: RotorKind,
    permutation: Permutation,
}

impl RotorDefinition {
    /// Creates a reflector named `name` wired as `permutation`.
    pub fn reflector(name: impl Into<String>, permutation: Permutation) -> Self {
        RotorDefinition {
            name: name.into(),
            kind: RotorKind::Reflector,
            permutation,
        }
    }

    /// Creates a non-moving rotor named `name` wired as `permutation`.
    pub fn fixed(name: impl Into<String>, permutation: Permutation) -> Self {
        RotorDefinition {
            name: name.into(),
            kind: RotorKind::Fixed,
            permutation,
        }
    }

    /// Creates a moving rotor whose notches are the symbols of `notches`.
    ///
    /// # Parameters
    /// - `name`: Catalog name.
    /// - `permutation`: Wiring; its alphabet also types the notches.
    /// - `notches`: Window symbols at which the rotor carries its left
    ///   neighbour along. Repeats are ignored.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if a notch symbol is not in the
    /// permutation's alphabet.
    pub fn moving(name: impl Into<String>, permutation: Permutation, notches: &str) -> Result<Self> {
        let name = name.into();
        let alphabet = permutation.alphabet();
        let mut indices = Vec::with_capacity(notches.len());
        for symbol in notches.chars() {
            let index = alphabet.to_index(symbol).map_err(|_| {
                EnigmaError::config(format!(
                    "notch '{}' of rotor {} is not in the alphabet",
                    symbol, name
                ))
            })?;
            if !indices.contains(&index) {
                indices.push(index);
            }
        }
        Ok(RotorDefinition {
            name,
            kind: RotorKind::Moving { notches: indices },
            permutation,
        })
    }

    /// Returns the catalog name, e.g. `"IV"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the variant with its variant-specific data.
    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    /// Returns the wiring.
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Returns the alphabet the wiring was built over.
    pub fn alphabet(&self) -> &Rc<Alphabet> {
        self.permutation.alphabet()
    }

    /// Returns true for rotors driven by a pawl.
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    /// Returns true for the rotor that sits in slot 0.
    pub fn is_reflector(&self) -> bool {
        matches!(self.kind, RotorKind::Reflector)
    }

    /// Returns the notch indices; empty unless the rotor moves.
    pub fn notches(&self) -> &[usize] {
        match &self.kind {
            RotorKind::Moving { notches } => notches,
            _ => &[],
        }
    }

    /// Returns the notch symbols in declaration order.
    pub fn notch_symbols(&self) -> String {
        let alphabet = self.alphabet();
        self.notches()
            .iter()
            .map(|&i| alphabet.to_symbol(i as i64))
            .collect()
    }
}

/// A rotor mounted in a machine slot.
///
/// `position` is the symbol shown in the machine window. The ring setting
/// (Ringstellung) turns the wiring against the lettered ring, so the offset
/// applied to the wiring is `setting = position - ring`, while the notches,
/// which are cut into the lettered ring, are compared with `position`.
#[derive(Debug, Clone)]
pub struct Rotor {
    definition: Rc<RotorDefinition>,
    position: usize,
    ring: usize,
}

impl Rotor {
    /// Mounts `definition` at position 0 with ring setting 0.
    pub fn new(definition: Rc<RotorDefinition>) -> Self {
        Rotor {
            definition,
            position: 0,
            ring: 0,
        }
    }

    /// Returns the name of the mounted definition.
    pub fn name(&self) -> &str {
        self.definition.name()
    }

    /// Returns the shared definition this rotor was mounted from.
    pub fn definition(&self) -> &Rc<RotorDefinition> {
        &self.definition
    }

    /// Returns the alphabet of the mounted definition.
    pub fn alphabet(&self) -> &Rc<Alphabet> {
        self.definition.alphabet()
    }

    /// Returns true if the mounted definition is a moving rotor.
    pub fn rotates(&self) -> bool {
        self.definition.rotates()
    }

    /// Returns the window position as an alphabet index.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the ring setting as an alphabet index.
    pub fn ring(&self) -> usize {
        self.ring
    }

    /// Returns the offset applied to the wiring: `wrap(position - ring)`.
    pub fn setting(&self) -> usize {
        self.alphabet()
            .wrap(self.position as i64 - self.ring as i64)
    }

    /// Sets the window position to `position` modulo the alphabet size.
    ///
    /// Reflectors stay at 0.
    pub fn set(&mut self, position: usize) {
        if !self.definition.is_reflector() {
            self.position = self.alphabet().wrap(position as i64);
        }
    }

    /// Sets the window position to `symbol`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if `symbol` is not in the alphabet.
    pub fn set_symbol(&mut self, symbol: char) -> Result<()> {
        let index = self.alphabet().to_index(symbol).map_err(|_| {
            EnigmaError::config(format!(
                "setting '{}' of rotor {} is not in the alphabet",
                symbol,
                self.name()
            ))
        })?;
        self.set(index);
        Ok(())
    }

    /// Sets the ring setting to `ring` modulo the alphabet size.
    ///
    /// Replaces any previous ring setting. Reflectors stay at 0.
    pub fn set_ring(&mut self, ring: usize) {
        if !self.definition.is_reflector() {
            self.ring = self.alphabet().wrap(ring as i64);
        }
    }

    /// Advances a moving rotor by one position. Other rotors do not move.
    pub fn advance(&mut self) {
        if self.rotates() {
            self.position = (self.position + 1) % self.alphabet().size();
        }
    }

    /// Returns true iff this is a moving rotor whose window shows a notch.
    pub fn at_notch(&self) -> bool {
        self.definition.notches().contains(&self.position)
    }

    /// Converts an index entering from the right (toward the reflector).
    ///
    /// # Parameters
    /// - `p`: Contact index on the right-hand side of the rotor.
    ///
    /// # Returns
    /// `wrap(permute(p + setting) - setting)`.
    pub fn convert_forward(&self, p: usize) -> usize {
        let setting = self.setting() as i64;
        let permutation = self.definition.permutation();
        permutation.wrap(permutation.permute(p as i64 + setting) as i64 - setting)
    }

    /// Converts an index entering from the left (away from the reflector).
    ///
    /// # Parameters
    /// - `e`: Contact index on the left-hand side of the rotor.
    ///
    /// # Returns
    /// `wrap(invert(e + setting) - setting)`.
    pub fn convert_backward(&self, e: usize) -> usize {
        let setting = self.setting() as i64;
        let permutation = self.definition.permutation();
        permutation.wrap(permutation.invert(e as i64 + setting) as i64 - setting)
    }
}

/// An ordered, name-indexed collection of rotor definitions over one alphabet.
///
/// Cloning a catalog shares the definitions.
#[derive(Debug, Clone)]
pub struct RotorCatalog {
    alphabet: Rc<Alphabet>,
    rotors: Vec<Rc<RotorDefinition>>,
    by_name: HashMap<String, usize>,
}

impl RotorCatalog {
    /// Creates an empty catalog over `alphabet`.
    pub fn new(alphabet: Rc<Alphabet>) -> Self {
        RotorCatalog {
            alphabet,
            rotors: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Adds `definition` to the catalog.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if the name is already taken or the
    /// definition was built over a different alphabet.
    pub fn insert(&mut self, definition: RotorDefinition) -> Result<()> {
        if self.by_name.contains_key(definition.name()) {
            return Err(EnigmaError::config(format!(
                "duplicate rotor name {}",
                definition.name()
            )));
        }
        if **definition.alphabet() != *self.alphabet {
            return Err(EnigmaError::config(format!(
                "rotor {} uses a different alphabet",
                definition.name()
            )));
        }
        match definition.kind() {
            RotorKind::Reflector if !definition.permutation().is_derangement() => {
                warn!(rotor = definition.name(), "reflector wiring has fixed points");
            }
            RotorKind::Moving { notches } if notches.is_empty() => {
                warn!(rotor = definition.name(), "moving rotor has no notches");
            }
            _ => {}
        }
        self.by_name
            .insert(definition.name().to_string(), self.rotors.len());
        self.rotors.push(Rc::new(definition));
        Ok(())
    }

    /// Looks up a definition by name.
    pub fn get(&self, name: &str) -> Option<&Rc<RotorDefinition>> {
        self.by_name.get(name).map(|&i| &self.rotors[i])
    }

    /// Returns the alphabet every definition in the catalog uses.
    pub fn alphabet(&self) -> &Rc<Alphabet> {
        &self.alphabet
    }

    /// Returns the number of definitions.
    pub fn len(&self) -> usize {
        self.rotors.len()
    }

    /// Returns true if the catalog holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.rotors.is_empty()
    }

    /// Iterates the definitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<RotorDefinition>> {
        self.rotors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::UPPER;

    fn upper() -> Rc<Alphabet> {
        Rc::new(Alphabet::new(UPPER).unwrap())
    }

    fn perm(cycles: &str, alphabet: &Rc<Alphabet>) -> Permutation {
        Permutation::new(cycles, alphabet.clone()).unwrap()
    }

    fn rotor_i(alphabet: &Rc<Alphabet>) -> RotorDefinition {
        RotorDefinition::moving(
            "I",
            perm("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)", alphabet),
            "Q",
        )
        .unwrap()
    }

    #[test]
    fn test_variants() {
        let a = upper();
        let reflector = RotorDefinition::reflector("B", perm("(AE) (BN)", &a));
        let fixed = RotorDefinition::fixed("Beta", perm("(HIX)", &a));
        let moving = rotor_i(&a);

        assert!(reflector.is_reflector());
        assert!(!reflector.rotates());
        assert!(!fixed.rotates());
        assert!(moving.rotates());
        assert!(fixed.notches().is_empty());
        assert_eq!(moving.notch_symbols(), "Q");
    }

    #[test]
    fn test_moving_rejects_foreign_notch() {
        let a = upper();
        let result = RotorDefinition::moving("X", perm("", &a), "Q7");
        assert!(matches!(result, Err(EnigmaError::Config(_))));
    }

    #[test]
    fn test_moving_deduplicates_notches() {
        let a = upper();
        let def = RotorDefinition::moving("VI", perm("", &a), "ZMZ").unwrap();
        assert_eq!(def.notches(), &[25, 12]);
    }

    #[test]
    fn test_forward_backward_at_zero_setting() {
        let a = upper();
        let rotor = Rotor::new(Rc::new(rotor_i(&a)));
        // Rotor I maps A to E at setting A.
        assert_eq!(rotor.convert_forward(0), 4);
        assert_eq!(rotor.convert_backward(4), 0);
    }

    #[test]
    fn test_forward_backward_with_offset() {
        let a = upper();
        let mut rotor = Rotor::new(Rc::new(rotor_i(&a)));
        rotor.set(1);
        // Entering at A with setting B: wiring sees B -> K, leaves at K - 1 = J.
        assert_eq!(rotor.convert_forward(0), 9);
        for i in 0..26 {
            assert_eq!(rotor.convert_backward(rotor.convert_forward(i)), i);
        }
    }

    #[test]
    fn test_advance_wraps() {
        let a = upper();
        let mut rotor = Rotor::new(Rc::new(rotor_i(&a)));
        rotor.set(25);
        rotor.advance();
        assert_eq!(rotor.position(), 0);
    }

    #[test]
    fn test_non_moving_never_advance() {
        let a = upper();
        let mut fixed = Rotor::new(Rc::new(RotorDefinition::fixed("Beta", perm("(HIX)", &a))));
        fixed.set(3);
        fixed.advance();
        assert_eq!(fixed.position(), 3);
        assert!(!fixed.at_notch());

        let mut reflector =
            Rotor::new(Rc::new(RotorDefinition::reflector("B", perm("(AE)", &a))));
        reflector.advance();
        reflector.set(5);
        reflector.set_ring(2);
        assert_eq!(reflector.setting(), 0);
    }

    #[test]
    fn test_at_notch() {
        let a = upper();
        let mut rotor = Rotor::new(Rc::new(rotor_i(&a)));
        rotor.set_symbol('P').unwrap();
        assert!(!rotor.at_notch());
        rotor.advance();
        assert!(rotor.at_notch());
    }

    #[test]
    fn test_set_symbol_outside_alphabet() {
        let a = upper();
        let mut rotor = Rotor::new(Rc::new(rotor_i(&a)));
        assert!(matches!(rotor.set_symbol('a'), Err(EnigmaError::Config(_))));
        assert_eq!(rotor.position(), 0);
    }

    #[test]
    fn test_ring_shifts_setting_not_notch() {
        let a = upper();
        let mut rotor = Rotor::new(Rc::new(rotor_i(&a)));
        rotor.set_symbol('Q').unwrap();
        rotor.set_ring(1);
        assert_eq!(rotor.setting(), 15);
        assert!(rotor.at_notch());

        // Replacing the ring setting does not accumulate.
        rotor.set_ring(1);
        assert_eq!(rotor.setting(), 15);
    }

    #[test]
    fn test_catalog_lookup_and_order() {
        let a = upper();
        let mut catalog = RotorCatalog::new(a.clone());
        catalog.insert(rotor_i(&a)).unwrap();
        catalog
            .insert(RotorDefinition::fixed("Beta", perm("(HIX)", &a)))
            .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("Beta").unwrap().name(), "Beta");
        assert!(catalog.get("beta").is_none());
        let names: Vec<&str> = catalog.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["I", "Beta"]);
    }

    #[test]
    fn test_catalog_rejects_duplicate_name() {
        let a = upper();
        let mut catalog = RotorCatalog::new(a.clone());
        catalog.insert(rotor_i(&a)).unwrap();
        assert!(matches!(
            catalog.insert(rotor_i(&a)),
            Err(EnigmaError::Config(_))
        ));
    }

    #[test]
    fn test_catalog_rejects_foreign_alphabet() {
        let a = upper();
        let other = Rc::new(Alphabet::new("ABC").unwrap());
        let mut catalog = RotorCatalog::new(a);
        let def = RotorDefinition::fixed("X", perm("(AB)", &other));
        assert!(matches!(catalog.insert(def), Err(EnigmaError::Config(_))));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_catalog_clones_share_definitions() {
        let a = upper();
        let mut catalog = RotorCatalog::new(a.clone());
        catalog.insert(rotor_i(&a)).unwrap();
        let copy = catalog.clone();
        assert!(Rc::ptr_eq(
            catalog.get("I").unwrap(),
            copy.get("I").unwrap()
        ));
    }
}
