use std::{
    fmt,
    fmt::{Display, Formatter},
};

/// Models the program counter, i.e. the offset of an instruction in the bytecode of a method.
/// Code arrays are shorter than 65536 bytes, so an offset always fits in 16 bits.
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash, Default)]
pub struct ProgramCounter(pub u16);

impl ProgramCounter {
    /// Applies a relative branch offset, as found in jump instructions.
    /// Returns `None` if the target falls outside of the range of valid offsets.
    pub fn offset_by(self, delta: i32) -> Option<ProgramCounter> {
        i64::from(self.0)
            .checked_add(i64::from(delta))
            .and_then(|target| u16::try_from(target).ok())
            .map(ProgramCounter)
    }

    pub fn as_usize(self) -> usize {
        usize::from(self.0)
    }
}

impl Display for ProgramCounter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
