use log::{trace, warn};

use minijvm_utils::buffer::Buffer;

use crate::{
    bytecode_command::{BytecodeCommand, Operand, Operands, SwitchTable},
    class_reader_error::{ClassReaderError, Result},
    opcodes::{OpCode, OperandKind},
    program_counter::ProgramCounter,
};

/// Largest code array allowed by the class file format
pub const MAX_CODE_LENGTH: usize = 65535;

/// Decodes the code array of a method into its instructions, in order.
/// The returned commands cover the input exactly: each one starts where the previous one ends.
pub fn decode(code: &[u8]) -> Result<Vec<BytecodeCommand>> {
    if code.len() > MAX_CODE_LENGTH {
        return Err(ClassReaderError::InvalidClassData(format!(
            "code array is {} bytes long, the maximum is {MAX_CODE_LENGTH}",
            code.len()
        )));
    }

    let mut buffer = Buffer::new(code);
    let mut commands = Vec::new();
    while buffer.has_more_data() {
        let command = decode_command(&mut buffer)?;
        trace!("decoded {command}");
        commands.push(command);
    }
    Ok(commands)
}

fn decode_command(buffer: &mut Buffer) -> Result<BytecodeCommand> {
    let start = buffer.position();
    let op_code = read_op_code(buffer)?;

    let operands = match op_code.operand_kind() {
        OperandKind::NoOperands => Operands::None,
        OperandKind::SignedByte => {
            Operands::One(Operand::Immediate(i32::from(buffer.read_i8()?)))
        }
        OperandKind::SignedShort => {
            Operands::One(Operand::Immediate(i32::from(buffer.read_i16()?)))
        }
        OperandKind::ConstantIndexByte => {
            Operands::One(Operand::ConstantIndex(u16::from(buffer.read_u8()?)))
        }
        OperandKind::ConstantIndexShort => {
            Operands::One(Operand::ConstantIndex(buffer.read_u16()?))
        }
        OperandKind::LocalVariable => {
            Operands::One(Operand::LocalVariable(u16::from(buffer.read_u8()?)))
        }
        OperandKind::BranchOffset => {
            Operands::One(Operand::BranchOffset(i32::from(buffer.read_i16()?)))
        }
        OperandKind::BranchOffsetWide => Operands::One(Operand::BranchOffset(buffer.read_i32()?)),
        OperandKind::ArrayType => Operands::One(Operand::ArrayType(buffer.read_u8()?)),
        OperandKind::LocalIncrement => {
            let local = buffer.read_u8()?;
            let increment = buffer.read_i8()?;
            Operands::Two(
                Operand::LocalVariable(u16::from(local)),
                Operand::Immediate(i32::from(increment)),
            )
        }
        OperandKind::InterfaceCall => {
            let index = buffer.read_u16()?;
            let count = buffer.read_u8()?;
            // Reserved, always zero
            buffer.read_u8()?;
            Operands::Two(
                Operand::ConstantIndex(index),
                Operand::Immediate(i32::from(count)),
            )
        }
        OperandKind::DynamicCall => {
            let index = buffer.read_u16()?;
            // Two reserved zero bytes
            buffer.read_u16()?;
            Operands::One(Operand::ConstantIndex(index))
        }
        OperandKind::MultiArray => {
            let index = buffer.read_u16()?;
            let dimensions = buffer.read_u8()?;
            Operands::Two(
                Operand::ConstantIndex(index),
                Operand::Immediate(i32::from(dimensions)),
            )
        }
        OperandKind::TableSwitch => {
            skip_switch_padding(buffer)?;
            Operands::Switch(read_table_switch(buffer, start)?)
        }
        OperandKind::LookupSwitch => {
            skip_switch_padding(buffer)?;
            Operands::Switch(read_lookup_switch(buffer, start)?)
        }
        OperandKind::Wide => read_wide(buffer)?,
    };

    Ok(BytecodeCommand {
        offset: program_counter_at(start)?,
        op_code,
        operands,
        length: buffer.position() - start,
    })
}

fn read_op_code(buffer: &mut Buffer) -> Result<OpCode> {
    let offset = buffer.position();
    let byte = buffer.peek_u8()?;
    let op_code = OpCode::try_from(byte).map_err(|_| {
        warn!("unknown op code {byte:#04x} at offset {offset}");
        ClassReaderError::UnknownOpcode {
            opcode: byte,
            offset,
        }
    })?;
    buffer.read_u8()?;
    Ok(op_code)
}

fn program_counter_at(position: usize) -> Result<ProgramCounter> {
    u16::try_from(position)
        .map(ProgramCounter)
        .map_err(|_| ClassReaderError::InvalidClassData(format!("offset {position} out of range")))
}

/// Switch operands start at the next offset multiple of four, counting from the start of the code
fn skip_switch_padding(buffer: &mut Buffer) -> Result<()> {
    let padding = (4 - buffer.position() % 4) % 4;
    buffer.read_bytes(padding)?;
    Ok(())
}

fn read_table_switch(buffer: &mut Buffer, start: usize) -> Result<SwitchTable> {
    let default = buffer.read_i32()?;
    let low = buffer.read_i32()?;
    let high = buffer.read_i32()?;
    if low > high {
        warn!("tableswitch at offset {start} has low {low} greater than high {high}");
        return Err(ClassReaderError::InvalidClassData(format!(
            "invalid tableswitch bounds {low}..{high} at offset {start}"
        )));
    }

    let targets = (low..=high)
        .map(|key| Ok((key, buffer.read_i32()?)))
        .collect::<Result<Vec<(i32, i32)>>>()?;
    Ok(SwitchTable { default, targets })
}

fn read_lookup_switch(buffer: &mut Buffer, start: usize) -> Result<SwitchTable> {
    let default = buffer.read_i32()?;
    let pairs_count = buffer.read_i32()?;
    if pairs_count < 0 {
        warn!("lookupswitch at offset {start} has a negative number of pairs");
        return Err(ClassReaderError::InvalidClassData(format!(
            "invalid lookupswitch pairs count {pairs_count} at offset {start}"
        )));
    }

    let targets = (0..pairs_count)
        .map(|_| {
            let key = buffer.read_i32()?;
            let offset = buffer.read_i32()?;
            Ok((key, offset))
        })
        .collect::<Result<Vec<(i32, i32)>>>()?;
    Ok(SwitchTable { default, targets })
}

fn read_wide(buffer: &mut Buffer) -> Result<Operands> {
    let offset = buffer.position();
    let op_code = read_op_code(buffer)?;
    if !op_code.is_widenable() {
        warn!("wide applied to {op_code} at offset {offset}");
        return Err(ClassReaderError::InvalidClassData(format!(
            "{op_code} at offset {offset} cannot be modified by wide"
        )));
    }

    let local = buffer.read_u16()?;
    let increment = if op_code == OpCode::Iinc {
        Some(buffer.read_i16()?)
    } else {
        None
    };
    Ok(Operands::Wide {
        op_code,
        local,
        increment,
    })
}
