//! Signal-path observation.
//!
//! [`Machine::convert_index_with`](crate::Machine::convert_index_with) reports
//! every stage a signal passes through to a [`SignalObserver`], and the
//! rotor window right after the rotors step. The default conversions use
//! [`NoopObserver`]; [`TracingObserver`] turns each report into a `trace!`
//! event and a closure can collect the path in tests.

use tracing::{enabled, trace, Level};

use crate::alphabet::Alphabet;
use crate::rotor::Rotor;

/// A point on the signal path of one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The rotors have stepped; the index is the machine input.
    Stepped,
    /// After the plugboard on the way in.
    PlugboardIn,
    /// After the rotor in `slot` on the pass toward the reflector.
    Forward { slot: usize },
    /// After the rotor in `slot` on the pass back from the reflector.
    Backward { slot: usize },
    /// After the plugboard on the way out; the index is the machine output.
    PlugboardOut,
}

/// Receives the index of a signal at each [`Stage`].
pub trait SignalObserver {
    /// Called once per stage, in signal order.
    ///
    /// # Parameters
    /// - `stage`: The point on the signal path just passed.
    /// - `index`: The alphabet index of the signal at that point.
    fn observe(&mut self, stage: Stage, index: usize);

    /// Called after the rotors step and before the signal enters, with the
    /// mounted rotors, reflector first.
    fn stepped(&mut self, _rotors: &[Rotor]) {}
}

/// Ignores every stage.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SignalObserver for NoopObserver {
    #[inline]
    fn observe(&mut self, _stage: Stage, _index: usize) {}
}

impl<F: FnMut(Stage, usize)> SignalObserver for F {
    fn observe(&mut self, stage: Stage, index: usize) {
        self(stage, index)
    }
}

/// Emits a `trace!` event per stage, rendering indices as symbols.
#[derive(Debug, Clone, Copy)]
pub struct TracingObserver<'a> {
    alphabet: &'a Alphabet,
}

impl<'a> TracingObserver<'a> {
    /// Creates an observer rendering indices as symbols of `alphabet`.
    pub fn new(alphabet: &'a Alphabet) -> Self {
        TracingObserver { alphabet }
    }
}

impl SignalObserver for TracingObserver<'_> {
    fn observe(&mut self, stage: Stage, index: usize) {
        let symbol = self.alphabet.to_symbol(index as i64);
        trace!(?stage, %symbol, "signal");
    }

    fn stepped(&mut self, rotors: &[Rotor]) {
        if enabled!(Level::TRACE) {
            trace!(window = %window(self.alphabet, rotors), "rotors stepped");
        }
    }
}

/// Renders the window symbols of every rotor after the reflector.
pub fn window(alphabet: &Alphabet, rotors: &[Rotor]) -> String {
    rotors
        .iter()
        .skip(1)
        .map(|rotor| alphabet.to_symbol(rotor.position() as i64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_observer_collects() {
        let mut seen = Vec::new();
        {
            let mut observer = |stage: Stage, index: usize| seen.push((stage, index));
            observer.observe(Stage::PlugboardIn, 3);
            observer.observe(Stage::Forward { slot: 2 }, 7);
        }
        assert_eq!(
            seen,
            vec![(Stage::PlugboardIn, 3), (Stage::Forward { slot: 2 }, 7)]
        );
    }

    #[test]
    fn test_noop_and_tracing_accept_any_stage() {
        let alphabet = Alphabet::default();
        let mut noop = NoopObserver;
        let mut tracing = TracingObserver::new(&alphabet);
        tracing.stepped(&[]);
        for stage in [
            Stage::Stepped,
            Stage::PlugboardIn,
            Stage::Forward { slot: 0 },
            Stage::Backward { slot: 1 },
            Stage::PlugboardOut,
        ] {
            noop.observe(stage, 25);
            tracing.observe(stage, 25);
        }
    }

    #[test]
    fn test_window_skips_reflector() {
        use crate::permutation::Permutation;
        use crate::rotor::RotorDefinition;
        use std::rc::Rc;

        let alphabet = Rc::new(Alphabet::new("ABCD").unwrap());
        let perm = |cycles: &str| Permutation::new(cycles, alphabet.clone()).unwrap();
        let mut rotors = vec![
            Rotor::new(Rc::new(RotorDefinition::reflector("R", perm("(AB) (CD)")))),
            Rotor::new(Rc::new(RotorDefinition::moving("M1", perm("(ABC)"), "A").unwrap())),
            Rotor::new(Rc::new(RotorDefinition::moving("M2", perm("(BD)"), "B").unwrap())),
        ];
        rotors[1].set(3);
        rotors[2].set(1);
        assert_eq!(window(&alphabet, &rotors), "DB");
        assert_eq!(window(&alphabet, &rotors[..1]), "");
    }
}
