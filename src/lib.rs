//! Rotor cipher machine simulator.
//!
//! Simulates the Enigma family of rotor machines: each character passes
//! through a plugboard, a stack of substitution rotors, a reflector, and
//! back, while the rotors advance like an odometer between characters
//! (including the double step of the middle rotor).
//!
//! # Architecture
//!
//! ```text
//! Alphabet     (symbol ↔ index, modular wrap)
//!     ↓
//! Permutation  (cycle notation compiled to forward/inverse tables)
//!     ↓
//! RotorDefinition ── shared through RotorCatalog
//!     ↓ mounted as
//! Rotor        (position + ring setting, per machine slot)
//!     ↓ N slots
//! Machine      (stepping + plugboard → rotors → reflector → rotors → plugboard)
//! ```
//!
//! [`config`] reads machine descriptions and settings lines; the `enigma`
//! binary wraps it in a command-line tool.
//!
//! # Examples
//!
//! Encrypt with the naval four-rotor machine and decrypt again:
//!
//! ```
//! use enigma::config::{MachineConfig, Settings, NAVAL_CONFIG};
//!
//! let config = MachineConfig::parse(NAVAL_CONFIG).unwrap();
//! let mut machine = config.build_machine().unwrap();
//! let settings = Settings::parse("* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)", 5).unwrap();
//! settings.apply(&mut machine).unwrap();
//!
//! let cipher = machine.convert_message("FROM HIS SHOULDER HIAWATHA").unwrap();
//! assert_eq!(cipher, "QVPQSOKOILPUBKJZPISFXDW");
//!
//! machine.reset();
//! assert_eq!(machine.convert_message(&cipher).unwrap(), "FROMHISSHOULDERHIAWATHA");
//! ```
//!
//! Build a machine by hand over a small alphabet:
//!
//! ```
//! use std::rc::Rc;
//! use enigma::{Alphabet, Machine, Permutation, RotorCatalog, RotorDefinition};
//!
//! let alphabet = Rc::new(Alphabet::new("ABCDEF").unwrap());
//! let perm = |cycles: &str| Permutation::new(cycles, alphabet.clone()).unwrap();
//!
//! let mut catalog = RotorCatalog::new(alphabet.clone());
//! catalog.insert(RotorDefinition::reflector("R", perm("(AD) (BE) (CF)"))).unwrap();
//! catalog.insert(RotorDefinition::moving("M", perm("(ABC) (DEF)"), "C").unwrap()).unwrap();
//!
//! let mut machine = Machine::new(alphabet.clone(), 2, 1, catalog).unwrap();
//! machine.insert_rotors(&["R", "M"]).unwrap();
//! machine.set_rotors("A").unwrap();
//! let cipher = machine.convert_message("FACADE").unwrap();
//! machine.reset();
//! assert_eq!(machine.convert_message(&cipher).unwrap(), "FACADE");
//! ```

#![deny(clippy::all)]

pub mod config;
pub mod error;
pub mod observer;
pub mod utils;

mod alphabet;
mod machine;
mod permutation;
mod rotor;

pub use alphabet::{Alphabet, UPPER};
pub use error::{EnigmaError, Result};
pub use machine::Machine;
pub use observer::{NoopObserver, SignalObserver, Stage, TracingObserver};
pub use permutation::Permutation;
pub use rotor::{Rotor, RotorCatalog, RotorDefinition, RotorKind};
