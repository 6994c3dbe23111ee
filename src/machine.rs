//! Machine: an ordered stack of rotors plus a plugboard.
//!
//! Slot 0 holds the reflector and slot `num_rotor_slots - 1` the fastest
//! rotor. Before every character the rotors step (see
//! [`Machine::advance_rotors`]), then the signal travels
//!
//! ```text
//! plugboard → slots n-1 … 0 (forward) → slots 1 … n-1 (backward) → plugboard
//! ```
//!
//! The reflector in slot 0 is only passed once, where the signal turns.

use std::rc::Rc;

use tracing::debug;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::observer::{window, NoopObserver, SignalObserver, Stage};
use crate::permutation::Permutation;
use crate::rotor::{Rotor, RotorCatalog};

/// A configured rotor cipher machine.
///
/// Every conversion mutates the rotor positions, so a `Machine` models one
/// operator session. Machines built from clones of the same
/// [`RotorCatalog`] share wiring but never rotor positions.
#[derive(Debug, Clone)]
pub struct Machine {
    alphabet: Rc<Alphabet>,
    num_rotor_slots: usize,
    num_pawls: usize,
    catalog: RotorCatalog,
    slots: Vec<Rotor>,
    plugboard: Permutation,
    /// Positions of slots `1..` restored by [`Machine::reset`].
    start_positions: Vec<usize>,
}

impl Machine {
    /// Creates a machine with `num_rotor_slots` slots and `num_pawls` pawls
    /// that mounts rotors from `catalog`.
    ///
    /// The plugboard starts as the identity and no rotors are inserted.
    ///
    /// # Parameters
    /// - `alphabet`: Symbol set shared with every rotor in `catalog`.
    /// - `num_rotor_slots`: Slot count, reflector included (at least 2).
    /// - `num_pawls`: Number of rightmost slots driven by pawls.
    /// - `catalog`: Rotors available to [`Machine::insert_rotors`].
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if `num_rotor_slots < 2`,
    /// `num_pawls >= num_rotor_slots`, or the catalog uses another alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    /// use enigma::{Alphabet, Machine, RotorCatalog};
    ///
    /// let alphabet = Rc::new(Alphabet::default());
    /// let catalog = RotorCatalog::new(alphabet.clone());
    /// assert!(Machine::new(alphabet.clone(), 5, 3, catalog.clone()).is_ok());
    /// assert!(Machine::new(alphabet, 3, 3, catalog).is_err());
    /// ```
    pub fn new(
        alphabet: Rc<Alphabet>,
        num_rotor_slots: usize,
        num_pawls: usize,
        catalog: RotorCatalog,
    ) -> Result<Self> {
        if num_rotor_slots < 2 {
            return Err(EnigmaError::config(format!(
                "a machine needs at least 2 rotor slots, got {}",
                num_rotor_slots
            )));
        }
        if num_pawls >= num_rotor_slots {
            return Err(EnigmaError::config(format!(
                "number of pawls ({}) must be less than the number of rotor slots ({})",
                num_pawls, num_rotor_slots
            )));
        }
        if **catalog.alphabet() != *alphabet {
            return Err(EnigmaError::config(
                "rotor catalog uses a different alphabet than the machine",
            ));
        }
        Ok(Machine {
            plugboard: Permutation::identity(alphabet.clone()),
            alphabet,
            num_rotor_slots,
            num_pawls,
            catalog,
            slots: Vec::with_capacity(num_rotor_slots),
            start_positions: Vec::new(),
        })
    }

    /// Returns the number of rotor slots, reflector included.
    pub fn num_rotor_slots(&self) -> usize {
        self.num_rotor_slots
    }

    /// Returns the number of pawls, i.e. of moving rotors.
    pub fn num_pawls(&self) -> usize {
        self.num_pawls
    }

    /// Returns the alphabet shared by the machine, its rotors and plugboard.
    pub fn alphabet(&self) -> &Rc<Alphabet> {
        &self.alphabet
    }

    /// Returns the catalog rotors are inserted from.
    pub fn catalog(&self) -> &RotorCatalog {
        &self.catalog
    }

    /// Returns the rotor in slot `k`, or `None` before insertion.
    pub fn rotor(&self, k: usize) -> Option<&Rotor> {
        self.slots.get(k)
    }

    /// Returns the mounted rotors, reflector first.
    pub fn rotors(&self) -> &[Rotor] {
        &self.slots
    }

    /// Returns the plugboard; the identity until one is set.
    pub fn plugboard(&self) -> &Permutation {
        &self.plugboard
    }

    /// Returns the window symbols of slots `1..`, leftmost first.
    pub fn positions(&self) -> String {
        window(&self.alphabet, &self.slots)
    }

    /// Mounts the rotors named by `names`, `names[0]` being the reflector.
    ///
    /// Every rotor starts at position 0 with ring setting 0; the plugboard
    /// is kept.
    ///
    /// # Parameters
    /// - `names`: One catalog name per slot, reflector first.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] without changing the machine if
    /// - the number of names differs from `num_rotor_slots`,
    /// - a name is unknown or repeated,
    /// - slot 0 is not a reflector, or a reflector appears in another slot,
    /// - the number of moving rotors differs from `num_pawls`, or they do not
    ///   occupy the rightmost `num_pawls` slots.
    pub fn insert_rotors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        if names.len() > self.num_rotor_slots {
            return Err(EnigmaError::config(format!(
                "{} rotors named but the machine has only {} slots",
                names.len(),
                self.num_rotor_slots
            )));
        }
        if names.len() < self.num_rotor_slots {
            return Err(EnigmaError::config(format!(
                "{} rotors named but the machine needs {}",
                names.len(),
                self.num_rotor_slots
            )));
        }

        let mut definitions = Vec::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            let name = name.as_ref();
            if names[..i].iter().any(|other| other.as_ref() == name) {
                return Err(EnigmaError::config(format!(
                    "rotor {} inserted more than once",
                    name
                )));
            }
            let definition = self
                .catalog
                .get(name)
                .ok_or_else(|| EnigmaError::config(format!("unknown rotor {}", name)))?;
            definitions.push(definition.clone());
        }

        let moving = definitions.iter().filter(|d| d.rotates()).count();
        if moving != self.num_pawls {
            return Err(EnigmaError::config(format!(
                "{} moving rotors named but the machine has {} pawls",
                moving, self.num_pawls
            )));
        }
        let first_moving = self.num_rotor_slots - self.num_pawls;
        for (slot, definition) in definitions.iter().enumerate() {
            if definition.is_reflector() != (slot == 0) {
                return Err(EnigmaError::config(format!(
                    "rotor {} in slot {}: the reflector must be in slot 0 and only there",
                    definition.name(),
                    slot
                )));
            }
            if definition.rotates() != (slot >= first_moving) {
                return Err(EnigmaError::config(format!(
                    "rotor {} in slot {}: moving rotors must fill the rightmost {} slots",
                    definition.name(),
                    slot,
                    self.num_pawls
                )));
            }
        }

        self.slots = definitions.into_iter().map(Rotor::new).collect();
        self.start_positions = vec![0; self.num_rotor_slots - 1];
        debug!(
            rotors = ?names.iter().map(|n| n.as_ref()).collect::<Vec<_>>(),
            "rotors inserted"
        );
        Ok(())
    }

    /// Sets the window positions from `setting`, one symbol per slot after
    /// the reflector, leftmost first.
    ///
    /// These positions are the ones [`Machine::reset`] returns to. Ring
    /// settings are kept, so the wiring offset becomes `position - ring`
    /// whichever of the two was set first.
    ///
    /// # Parameters
    /// - `setting`: `num_rotor_slots - 1` window symbols, e.g. `"AXLE"`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] without changing the machine if no
    /// rotors are inserted, `setting` does not have `num_rotor_slots - 1`
    /// symbols, or a symbol is outside the alphabet.
    pub fn set_rotors(&mut self, setting: &str) -> Result<()> {
        let positions = self.parse_slot_string("rotor setting", setting)?;
        for (rotor, &position) in self.slots.iter_mut().skip(1).zip(&positions) {
            rotor.set(position);
        }
        self.start_positions = positions;
        debug!(setting, "rotor positions set");
        Ok(())
    }

    /// Sets the ring settings (Ringstellung) from `ring`, one symbol per slot
    /// after the reflector, leftmost first.
    ///
    /// The ring offset is held apart from the window position, so the
    /// effective setting of each rotor is `position - ring` while notches
    /// still trip at their window symbols. Calling this again replaces the
    /// previous ring settings instead of accumulating them.
    ///
    /// # Errors
    /// Same conditions as [`Machine::set_rotors`].
    pub fn set_ringstellung(&mut self, ring: &str) -> Result<()> {
        let rings = self.parse_slot_string("ring setting", ring)?;
        for (rotor, &offset) in self.slots.iter_mut().skip(1).zip(&rings) {
            rotor.set_ring(offset);
        }
        debug!(ring, "ring settings set");
        Ok(())
    }

    /// Replaces the plugboard.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if `plugboard` uses another alphabet.
    pub fn set_plugboard(&mut self, plugboard: Permutation) -> Result<()> {
        if **plugboard.alphabet() != *self.alphabet {
            return Err(EnigmaError::config(
                "plugboard uses a different alphabet than the machine",
            ));
        }
        debug!(plugboard = %plugboard, "plugboard set");
        self.plugboard = plugboard;
        Ok(())
    }

    /// Returns every rotor to the positions last given to
    /// [`Machine::set_rotors`], or to 0 if none were given since insertion.
    ///
    /// Ring settings and the plugboard are kept, so converting the
    /// ciphertext after a reset recovers the plaintext.
    pub fn reset(&mut self) {
        for (rotor, &position) in self.slots.iter_mut().skip(1).zip(&self.start_positions) {
            rotor.set(position);
        }
    }

    /// Steps the rotors once.
    ///
    /// Scanning slots left to right: the rightmost slot always advances; any
    /// other moving rotor advances together with its right neighbour when
    /// that neighbour sits at a notch, and the scan then skips the
    /// neighbour. A middle rotor at its own notch therefore moves on two
    /// consecutive key presses (the double step).
    pub fn advance_rotors(&mut self) {
        let last = self.slots.len().saturating_sub(1);
        let mut i = 0;
        while i < self.slots.len() {
            if i == last {
                self.slots[i].advance();
                i += 1;
            } else if self.slots[i + 1].at_notch() && self.slots[i].rotates() {
                self.slots[i].advance();
                self.slots[i + 1].advance();
                i += 2;
            } else {
                i += 1;
            }
        }
    }

    /// Steps the machine and converts one alphabet index.
    ///
    /// # Parameters
    /// - `index`: Alphabet index of the key pressed.
    ///
    /// # Returns
    /// Alphabet index of the lamp that lights.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if no rotors are inserted.
    pub fn convert_index(&mut self, index: usize) -> Result<usize> {
        self.convert_index_with(index, &mut NoopObserver)
    }

    /// Like [`Machine::convert_index`], reporting every stage to `observer`.
    pub fn convert_index_with(
        &mut self,
        index: usize,
        observer: &mut dyn SignalObserver,
    ) -> Result<usize> {
        self.ensure_rotors()?;
        Ok(self.convert_one(index, observer))
    }

    /// Converts `message`, dropping whitespace.
    ///
    /// Each remaining symbol steps the machine and is converted; the result
    /// has no grouping.
    ///
    /// # Errors
    /// - [`EnigmaError::Config`] if no rotors are inserted.
    /// - [`EnigmaError::AlphabetMismatch`] for a symbol outside the alphabet;
    ///   the rotors are not stepped in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::config::MachineConfig;
    ///
    /// let config = MachineConfig::parse(enigma::config::NAVAL_CONFIG).unwrap();
    /// let mut machine = config.build_machine().unwrap();
    /// machine.insert_rotors(&["B", "Beta", "III", "IV", "I"]).unwrap();
    /// machine.set_rotors("AXLE").unwrap();
    ///
    /// let cipher = machine.convert_message("HELLO WORLD").unwrap();
    /// machine.reset();
    /// assert_eq!(machine.convert_message(&cipher).unwrap(), "HELLOWORLD");
    /// ```
    pub fn convert_message(&mut self, message: &str) -> Result<String> {
        self.convert_message_with(message, &mut NoopObserver)
    }

    /// Like [`Machine::convert_message`], reporting every stage to `observer`.
    pub fn convert_message_with(
        &mut self,
        message: &str,
        observer: &mut dyn SignalObserver,
    ) -> Result<String> {
        self.ensure_rotors()?;
        let indices = message
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| self.alphabet.to_index(c))
            .collect::<Result<Vec<usize>>>()?;

        let mut output = String::with_capacity(indices.len());
        for index in indices {
            let converted = self.convert_one(index, observer);
            output.push(self.alphabet.to_symbol(converted as i64));
        }
        Ok(output)
    }

    fn convert_one(&mut self, index: usize, observer: &mut dyn SignalObserver) -> usize {
        self.advance_rotors();
        observer.stepped(&self.slots);
        observer.observe(Stage::Stepped, index);

        let mut c = self.plugboard.permute(index as i64);
        observer.observe(Stage::PlugboardIn, c);

        for slot in (0..self.slots.len()).rev() {
            c = self.slots[slot].convert_forward(c);
            observer.observe(Stage::Forward { slot }, c);
        }
        for slot in 1..self.slots.len() {
            c = self.slots[slot].convert_backward(c);
            observer.observe(Stage::Backward { slot }, c);
        }

        c = self.plugboard.permute(c as i64);
        observer.observe(Stage::PlugboardOut, c);
        c
    }

    fn ensure_rotors(&self) -> Result<()> {
        if self.slots.is_empty() {
            return Err(EnigmaError::config("no rotors inserted"));
        }
        Ok(())
    }

    /// Validates a per-slot string (reflector excluded) into indices.
    fn parse_slot_string(&self, what: &str, text: &str) -> Result<Vec<usize>> {
        self.ensure_rotors()?;
        let expected = self.num_rotor_slots - 1;
        let count = text.chars().count();
        if count != expected {
            return Err(EnigmaError::config(format!(
                "{} {:?} must have {} symbols, got {}",
                what, text, expected, count
            )));
        }
        self.alphabet.indices_of(text).map_err(|e| match e {
            EnigmaError::AlphabetMismatch { symbol } => EnigmaError::config(format!(
                "{} symbol '{}' is not in the alphabet",
                what, symbol
            )),
            other => other,
        })
    }
}
