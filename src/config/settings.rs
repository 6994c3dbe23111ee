//! Settings lines.
//!
//! A settings line selects and positions the rotors of a machine:
//!
//! ```text
//! * B Beta III IV I AXLE BCDE (HQ) (EX) (IP) (TR) (BY)
//! │ └── rotor names ─┘ │    │    └─ plugboard cycles (optional)
//! marker          setting  ring setting (optional)
//! ```

use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::permutation::Permutation;

/// Marker token that starts a settings line.
pub const SETTINGS_MARKER: &str = "*";

/// One parsed settings line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Rotor names, reflector first.
    pub rotors: Vec<String>,
    /// Window positions of the slots after the reflector.
    pub positions: String,
    /// Ring settings of the slots after the reflector.
    pub ring: Option<String>,
    /// Plugboard in cycle notation; empty for no plugs.
    pub plugboard: String,
}

impl Settings {
    /// Parses `line` for a machine with `num_rotor_slots` slots.
    ///
    /// # Parameters
    /// - `line`: One settings line, starting with [`SETTINGS_MARKER`].
    /// - `num_rotor_slots`: How many rotor names to read before the setting.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Parse`] (line 0) if the marker is missing or
    /// the line ends before the rotor names and setting are complete.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::config::Settings;
    ///
    /// let s = Settings::parse("* B Beta III IV I AXLE (YF) (ZH)", 5).unwrap();
    /// assert_eq!(s.rotors, ["B", "Beta", "III", "IV", "I"]);
    /// assert_eq!(s.positions, "AXLE");
    /// assert_eq!(s.ring, None);
    /// assert_eq!(s.plugboard, "(YF) (ZH)");
    /// ```
    pub fn parse(line: &str, num_rotor_slots: usize) -> Result<Self> {
        let mut tokens = line.split_whitespace().peekable();
        if tokens.next() != Some(SETTINGS_MARKER) {
            return Err(EnigmaError::parse(
                0,
                format!("settings must start with '{}'", SETTINGS_MARKER),
            ));
        }

        let rotors: Vec<String> = tokens
            .by_ref()
            .take(num_rotor_slots)
            .map(str::to_string)
            .collect();
        if rotors.len() != num_rotor_slots {
            return Err(EnigmaError::parse(
                0,
                format!(
                    "settings name {} rotors, the machine needs {}",
                    rotors.len(),
                    num_rotor_slots
                ),
            ));
        }

        let positions = tokens
            .next()
            .ok_or_else(|| EnigmaError::parse(0, "settings lack the rotor setting"))?
            .to_string();
        let ring = tokens
            .next_if(|token| !token.starts_with('('))
            .map(str::to_string);
        let plugboard = tokens.collect::<Vec<_>>().join(" ");

        Ok(Settings {
            rotors,
            positions,
            ring,
            plugboard,
        })
    }

    /// Returns true if `line` looks like a settings line.
    pub fn is_settings_line(line: &str) -> bool {
        line.trim_start().starts_with(SETTINGS_MARKER)
    }

    /// Inserts the rotors, sets positions and rings, and installs the
    /// plugboard, in that order.
    ///
    /// Everything is validated before `machine` is touched: on error the
    /// machine keeps its previous configuration.
    pub fn apply(&self, machine: &mut Machine) -> Result<()> {
        let plugboard = Permutation::new(&self.plugboard, machine.alphabet().clone())?;

        let mut staged = machine.clone();
        staged.insert_rotors(&self.rotors)?;
        staged.set_rotors(&self.positions)?;
        if let Some(ring) = &self.ring {
            staged.set_ringstellung(ring)?;
        }
        staged.set_plugboard(plugboard)?;

        *machine = staged;
        Ok(())
    }
}
