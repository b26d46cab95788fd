use std::ops::Range;

use crate::program_counter::ProgramCounter;

/// Exception handlers of a method's code, in the order they are declared
#[derive(Debug, PartialEq, Default)]
pub struct ExceptionTable {
    entries: Vec<ExceptionTableEntry>,
}

impl ExceptionTable {
    pub fn new(entries: Vec<ExceptionTableEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ExceptionTableEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First handler covering the given offset
    pub fn lookup(&self, pc: ProgramCounter) -> Option<&ExceptionTableEntry> {
        // We expect exception tables to be relatively small, so we'll just do a linear search
        self.entries.iter().find(|entry| entry.range.contains(&pc))
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ExceptionTableEntry {
    pub range: Range<ProgramCounter>,
    pub handler_pc: ProgramCounter,
    /// Constant pool index of the caught class; `None` catches everything (i.e. `finally`)
    pub catch_type: Option<u16>,
}
