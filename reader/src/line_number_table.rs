use std::{cmp::Ordering, fmt};

use itertools::Itertools;

use crate::program_counter::ProgramCounter;

/// A line of the source file a class was compiled from
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
pub struct LineNumber(pub u16);

impl fmt::Display for LineNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content of the `LineNumberTable` attribute of a method's code
#[derive(Debug, PartialEq)]
pub struct LineNumberTable {
    entries: Vec<LineNumberTableEntry>,
}

impl LineNumberTable {
    pub fn new(entries: Vec<LineNumberTableEntry>) -> Self {
        Self {
            entries: entries.into_iter().sorted().collect(),
        }
    }

    pub fn entries(&self) -> &[LineNumberTableEntry] {
        &self.entries
    }

    /// Finds the source line of the instruction at the given offset.
    /// Instructions before the first entry have no known line.
    pub fn lookup_pc(&self, pc: ProgramCounter) -> Option<LineNumber> {
        let best_matching_entry_index = match self
            .entries
            .binary_search_by(|e| e.program_counter.cmp(&pc))
        {
            Ok(index) => index,
            Err(0) => return None,
            Err(index) => index - 1,
        };
        Some(self.entries[best_matching_entry_index].line_number)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct LineNumberTableEntry {
    pub program_counter: ProgramCounter,
    pub line_number: LineNumber,
}

impl PartialOrd for LineNumberTableEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LineNumberTableEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.program_counter.cmp(&other.program_counter)
    }
}

impl LineNumberTableEntry {
    pub fn new(program_counter: ProgramCounter, line_number: LineNumber) -> Self {
        Self {
            program_counter,
            line_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        line_number_table::{LineNumber, LineNumberTable, LineNumberTableEntry},
        program_counter::ProgramCounter,
    };

    #[test]
    fn can_lookup_line_number() {
        let table = LineNumberTable::new(vec![
            LineNumberTableEntry::new(ProgramCounter(12), LineNumber(5)),
            LineNumberTableEntry::new(ProgramCounter(4), LineNumber(4)),
            LineNumberTableEntry::new(ProgramCounter(20), LineNumber(6)),
        ]);

        assert_eq!(None, table.lookup_pc(ProgramCounter(0)));
        assert_eq!(Some(LineNumber(4)), table.lookup_pc(ProgramCounter(4)));
        assert_eq!(Some(LineNumber(4)), table.lookup_pc(ProgramCounter(11)));
        assert_eq!(Some(LineNumber(5)), table.lookup_pc(ProgramCounter(12)));
        assert_eq!(Some(LineNumber(6)), table.lookup_pc(ProgramCounter(20)));
        assert_eq!(Some(LineNumber(6)), table.lookup_pc(ProgramCounter(21)));
    }
}
