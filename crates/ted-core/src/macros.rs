//! Macro registers: recorded key runes, replayed on demand.
//!
//! A macro is the sequence of runes typed while recording was on. Each of
//! the 94 printable ASCII characters `!` through `~` names a register.
//! Recording into a register replaces what it held.
//!
//! Registers only store runes. Replaying is the caller's job: feed the
//! runes from [`MacroRegisters::get`] back through the same entry point
//! that handles typed keys, so a macro can do nothing a user could not.

use thiserror::Error;

use crate::rune::Rune;

/// First register name.
pub const FIRST_REGISTER: char = '!';
/// Last register name.
pub const LAST_REGISTER: char = '~';

const REGISTER_COUNT: usize = LAST_REGISTER as usize - FIRST_REGISTER as usize + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MacroError {
    #[error("invalid register {0:?}")]
    InvalidRegister(char),

    #[error("already recording into register {0:?}")]
    AlreadyRecording(char),

    #[error("not recording")]
    NotRecording,
}

/// Index of a register name, or `None` outside `'!'..='~'`.
const fn slot(name: char) -> Option<usize> {
    if name >= FIRST_REGISTER && name <= LAST_REGISTER {
        Some(name as usize - FIRST_REGISTER as usize)
    } else {
        None
    }
}

/// Every macro register plus the in-progress recording, if any.
#[derive(Debug, Clone)]
pub struct MacroRegisters {
    registers: [Vec<Rune>; REGISTER_COUNT],
    recording: Option<(char, Vec<Rune>)>,
}

impl MacroRegisters {
    /// All registers empty, not recording.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registers: std::array::from_fn(|_| Vec::new()),
            recording: None,
        }
    }

    /// Start recording into `name`.
    ///
    /// # Errors
    ///
    /// An invalid register name, or a recording already in progress.
    pub fn start(&mut self, name: char) -> Result<(), MacroError> {
        if slot(name).is_none() {
            return Err(MacroError::InvalidRegister(name));
        }
        if let Some((current, _)) = &self.recording {
            return Err(MacroError::AlreadyRecording(*current));
        }
        self.recording = Some((name, Vec::new()));
        Ok(())
    }

    /// Append a rune to the recording. Ignored when not recording.
    pub fn record(&mut self, rune: Rune) {
        if let Some((_, runes)) = &mut self.recording {
            runes.push(rune);
        }
    }

    /// Finish recording and store it. Returns the register written.
    ///
    /// # Errors
    ///
    /// [`MacroError::NotRecording`] if no recording is in progress.
    pub fn stop(&mut self) -> Result<char, MacroError> {
        let (name, runes) = self.recording.take().ok_or(MacroError::NotRecording)?;
        // `start` only accepts valid names.
        if let Some(i) = slot(name) {
            self.registers[i] = runes;
        }
        Ok(name)
    }

    /// The runes stored in `name`. Empty for a register never recorded.
    ///
    /// # Errors
    ///
    /// [`MacroError::InvalidRegister`] for a name outside `'!'..='~'`.
    pub fn get(&self, name: char) -> Result<&[Rune], MacroError> {
        slot(name)
            .map(|i| self.registers[i].as_slice())
            .ok_or(MacroError::InvalidRegister(name))
    }

    /// The register being recorded into, if any.
    #[must_use]
    pub fn recording(&self) -> Option<char> {
        self.recording.as_ref().map(|(name, _)| *name)
    }

    #[must_use]
    pub const fn is_recording(&self) -> bool {
        self.recording.is_some()
    }
}

impl Default for MacroRegisters {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn runes(s: &str) -> Vec<Rune> {
        s.chars().map(Rune::from).collect()
    }

    #[test]
    fn new_registers_are_empty() {
        let regs = MacroRegisters::new();
        assert!(!regs.is_recording());
        assert_eq!(regs.recording(), None);
        assert_eq!(regs.get('a'), Ok(&[][..]));
    }

    #[test]
    fn record_and_get() {
        let mut regs = MacroRegisters::new();
        regs.start('q').unwrap();
        assert!(regs.is_recording());
        assert_eq!(regs.recording(), Some('q'));
        for r in runes("hi\n") {
            regs.record(r);
        }
        assert_eq!(regs.stop(), Ok('q'));
        assert!(!regs.is_recording());
        assert_eq!(regs.get('q').unwrap(), runes("hi\n").as_slice());
    }

    #[test]
    fn recording_replaces_register() {
        let mut regs = MacroRegisters::new();
        regs.start('a').unwrap();
        regs.record(Rune::from('x'));
        regs.stop().unwrap();
        regs.start('a').unwrap();
        regs.record(Rune::from('y'));
        regs.stop().unwrap();
        assert_eq!(regs.get('a').unwrap(), &[Rune::from('y')]);
    }

    #[test]
    fn registers_are_independent() {
        let mut regs = MacroRegisters::new();
        regs.start('a').unwrap();
        regs.record(Rune::from('1'));
        regs.stop().unwrap();
        regs.start('b').unwrap();
        regs.record(Rune::from('2'));
        regs.stop().unwrap();
        assert_eq!(regs.get('a').unwrap(), &[Rune::from('1')]);
        assert_eq!(regs.get('b').unwrap(), &[Rune::from('2')]);
    }

    #[test]
    fn record_without_start_is_ignored() {
        let mut regs = MacroRegisters::new();
        regs.record(Rune::from('z'));
        assert_eq!(regs.stop(), Err(MacroError::NotRecording));
    }

    #[test]
    fn cannot_nest_recordings() {
        let mut regs = MacroRegisters::new();
        regs.start('a').unwrap();
        assert_eq!(regs.start('b'), Err(MacroError::AlreadyRecording('a')));
    }

    #[test]
    fn register_range_bounds() {
        let mut regs = MacroRegisters::new();
        assert!(regs.get('!').is_ok());
        assert!(regs.get('~').is_ok());
        assert_eq!(regs.get(' '), Err(MacroError::InvalidRegister(' ')));
        assert_eq!(regs.get('\u{7f}'), Err(MacroError::InvalidRegister('\u{7f}')));
        assert_eq!(regs.start('é'), Err(MacroError::InvalidRegister('é')));
        assert!(!regs.is_recording());
    }

    #[test]
    fn all_printable_registers_are_distinct() {
        let mut regs = MacroRegisters::new();
        for name in FIRST_REGISTER..=LAST_REGISTER {
            regs.start(name).unwrap();
            regs.record(Rune::from(name));
            regs.stop().unwrap();
        }
        for name in FIRST_REGISTER..=LAST_REGISTER {
            assert_eq!(regs.get(name).unwrap(), &[Rune::from(name)]);
        }
        assert_eq!(REGISTER_COUNT, 94);
    }
}
