use std::{fmt, fmt::Formatter};

use itertools::Itertools;

use crate::{opcodes::OpCode, program_counter::ProgramCounter};

/// A single operand of a decoded instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// A literal value, such as the argument of `bipush` or the increment of `iinc`
    Immediate(i32),
    ConstantIndex(u16),
    LocalVariable(u16),
    /// Offset relative to the instruction that contains it
    BranchOffset(i32),
    /// Element type code of `newarray`
    ArrayType(u8),
}

/// Jump table of `tableswitch` and `lookupswitch`.
/// Offsets are relative to the switch instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchTable {
    pub default: i32,
    /// Pairs of (key, offset), in the order they appear in the code
    pub targets: Vec<(i32, i32)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operands {
    None,
    One(Operand),
    Two(Operand, Operand),
    Switch(SwitchTable),
    /// Operands of an instruction modified by the `wide` prefix
    Wide {
        op_code: OpCode,
        local: u16,
        increment: Option<i16>,
    },
}

/// A decoded instruction, with its position in the code array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytecodeCommand {
    pub offset: ProgramCounter,
    pub op_code: OpCode,
    pub operands: Operands,
    /// Number of bytes taken by the instruction, op code and padding included
    pub length: usize,
}

impl BytecodeCommand {
    pub fn mnemonic(&self) -> &'static str {
        self.op_code.mnemonic()
    }

    pub fn op_code_byte(&self) -> u8 {
        u8::from(self.op_code)
    }

    pub fn next_offset(&self) -> usize {
        self.offset.as_usize() + self.length
    }

    /// The constant pool entry referenced by the instruction, if any
    pub fn constant_index(&self) -> Option<u16> {
        match self.operands {
            Operands::One(Operand::ConstantIndex(index))
            | Operands::Two(Operand::ConstantIndex(index), _) => Some(index),
            _ => None,
        }
    }

    /// Absolute target of a jump instruction
    pub fn branch_target(&self) -> Option<ProgramCounter> {
        match self.operands {
            Operands::One(Operand::BranchOffset(offset)) => self.offset.offset_by(offset),
            _ => None,
        }
    }

    fn absolute(&self, relative: i32) -> i64 {
        i64::from(self.offset.0) + i64::from(relative)
    }

    fn fmt_operand(&self, operand: &Operand) -> String {
        match operand {
            Operand::Immediate(value) => value.to_string(),
            Operand::ConstantIndex(index) => format!("#{index}"),
            Operand::LocalVariable(index) => index.to_string(),
            Operand::BranchOffset(offset) => self.absolute(*offset).to_string(),
            Operand::ArrayType(code) => match array_type_name(*code) {
                Some(name) => name.to_string(),
                None => code.to_string(),
            },
        }
    }
}

/// Element types of `newarray`, by their `atype` code
pub fn array_type_name(code: u8) -> Option<&'static str> {
    match code {
        4 => Some("boolean"),
        5 => Some("char"),
        6 => Some("float"),
        7 => Some("double"),
        8 => Some("byte"),
        9 => Some("short"),
        10 => Some("int"),
        11 => Some("long"),
        _ => None,
    }
}

impl fmt::Display for BytecodeCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.offset, self.mnemonic())?;
        match &self.operands {
            Operands::None => Ok(()),
            Operands::One(operand) => write!(f, " {}", self.fmt_operand(operand)),
            Operands::Two(first, second) => write!(
                f,
                " {}, {}",
                self.fmt_operand(first),
                self.fmt_operand(second)
            ),
            Operands::Switch(table) => {
                let targets = table
                    .targets
                    .iter()
                    .map(|(key, offset)| format!("{key}: {}", self.absolute(*offset)))
                    .chain(std::iter::once(format!(
                        "default: {}",
                        self.absolute(table.default)
                    )))
                    .join(", ");
                write!(f, " {{ {targets} }}")
            }
            Operands::Wide {
                op_code,
                local,
                increment,
            } => {
                write!(f, " {op_code} {local}")?;
                if let Some(increment) = increment {
                    write!(f, ", {increment}")?;
                }
                Ok(())
            }
        }
    }
}
