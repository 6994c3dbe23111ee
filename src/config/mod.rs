//! Loading machines from text: machine descriptions and settings lines.

pub mod catalog;
pub mod settings;

pub use catalog::MachineConfig;
pub use settings::{Settings, SETTINGS_MARKER};

/// Four-rotor naval machine with rotors I-VIII, Beta, Gamma and the thin
/// reflectors B and C.
pub const NAVAL_CONFIG: &str = include_str!("../../conf/naval.conf");

/// Three-rotor army machine with rotors I-V and the wide reflectors B and C.
pub const ENIGMA_I_CONFIG: &str = include_str!("../../conf/enigma_i.conf");
