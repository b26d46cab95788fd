use int_enum::IntEnum;

/// Op codes of the JVM instruction set, named after their mnemonic.
#[allow(non_camel_case_types)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    IntEnum,
    strum_macros::Display,
    strum_macros::IntoStaticStr,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum OpCode {
    Nop = 0x00,
    Aconst_null = 0x01,
    Iconst_m1 = 0x02,
    Iconst_0 = 0x03,
    Iconst_1 = 0x04,
    Iconst_2 = 0x05,
    Iconst_3 = 0x06,
    Iconst_4 = 0x07,
    Iconst_5 = 0x08,
    Lconst_0 = 0x09,
    Lconst_1 = 0x0a,
    Fconst_0 = 0x0b,
    Fconst_1 = 0x0c,
    Fconst_2 = 0x0d,
    Dconst_0 = 0x0e,
    Dconst_1 = 0x0f,
    Bipush = 0x10,
    Sipush = 0x11,
    Ldc = 0x12,
    Ldc_w = 0x13,
    Ldc2_w = 0x14,
    Iload = 0x15,
    Lload = 0x16,
    Fload = 0x17,
    Dload = 0x18,
    Aload = 0x19,
    Iload_0 = 0x1a,
    Iload_1 = 0x1b,
    Iload_2 = 0x1c,
    Iload_3 = 0x1d,
    Lload_0 = 0x1e,
    Lload_1 = 0x1f,
    Lload_2 = 0x20,
    Lload_3 = 0x21,
    Fload_0 = 0x22,
    Fload_1 = 0x23,
    Fload_2 = 0x24,
    Fload_3 = 0x25,
    Dload_0 = 0x26,
    Dload_1 = 0x27,
    Dload_2 = 0x28,
    Dload_3 = 0x29,
    Aload_0 = 0x2a,
    Aload_1 = 0x2b,
    Aload_2 = 0x2c,
    Aload_3 = 0x2d,
    Iaload = 0x2e,
    Laload = 0x2f,
    Faload = 0x30,
    Daload = 0x31,
    Aaload = 0x32,
    Baload = 0x33,
    Caload = 0x34,
    Saload = 0x35,
    Istore = 0x36,
    Lstore = 0x37,
    Fstore = 0x38,
    Dstore = 0x39,
    Astore = 0x3a,
    Istore_0 = 0x3b,
    Istore_1 = 0x3c,
    Istore_2 = 0x3d,
    Istore_3 = 0x3e,
    Lstore_0 = 0x3f,
    Lstore_1 = 0x40,
    Lstore_2 = 0x41,
    Lstore_3 = 0x42,
    Fstore_0 = 0x43,
    Fstore_1 = 0x44,
    Fstore_2 = 0x45,
    Fstore_3 = 0x46,
    Dstore_0 = 0x47,
    Dstore_1 = 0x48,
    Dstore_2 = 0x49,
    Dstore_3 = 0x4a,
    Astore_0 = 0x4b,
    Astore_1 = 0x4c,
    Astore_2 = 0x4d,
    Astore_3 = 0x4e,
    Iastore = 0x4f,
    Lastore = 0x50,
    Fastore = 0x51,
    Dastore = 0x52,
    Aastore = 0x53,
    Bastore = 0x54,
    Castore = 0x55,
    Sastore = 0x56,
    Pop = 0x57,
    Pop2 = 0x58,
    Dup = 0x59,
    Dup_x1 = 0x5a,
    Dup_x2 = 0x5b,
    Dup2 = 0x5c,
    Dup2_x1 = 0x5d,
    Dup2_x2 = 0x5e,
    Swap = 0x5f,
    Iadd = 0x60,
    Ladd = 0x61,
    Fadd = 0x62,
    Dadd = 0x63,
    Isub = 0x64,
    Lsub = 0x65,
    Fsub = 0x66,
    Dsub = 0x67,
    Imul = 0x68,
    Lmul = 0x69,
    Fmul = 0x6a,
    Dmul = 0x6b,
    Idiv = 0x6c,
    Ldiv = 0x6d,
    Fdiv = 0x6e,
    Ddiv = 0x6f,
    Irem = 0x70,
    Lrem = 0x71,
    Frem = 0x72,
    Drem = 0x73,
    Ineg = 0x74,
    Lneg = 0x75,
    Fneg = 0x76,
    Dneg = 0x77,
    Ishl = 0x78,
    Lshl = 0x79,
    Ishr = 0x7a,
    Lshr = 0x7b,
    Iushr = 0x7c,
    Lushr = 0x7d,
    Iand = 0x7e,
    Land = 0x7f,
    Ior = 0x80,
    Lor = 0x81,
    Ixor = 0x82,
    Lxor = 0x83,
    Iinc = 0x84,
    I2l = 0x85,
    I2f = 0x86,
    I2d = 0x87,
    L2i = 0x88,
    L2f = 0x89,
    L2d = 0x8a,
    F2i = 0x8b,
    F2l = 0x8c,
    F2d = 0x8d,
    D2i = 0x8e,
    D2l = 0x8f,
    D2f = 0x90,
    I2b = 0x91,
    I2c = 0x92,
    I2s = 0x93,
    Lcmp = 0x94,
    Fcmpl = 0x95,
    Fcmpg = 0x96,
    Dcmpl = 0x97,
    Dcmpg = 0x98,
    Ifeq = 0x99,
    Ifne = 0x9a,
    Iflt = 0x9b,
    Ifge = 0x9c,
    Ifgt = 0x9d,
    Ifle = 0x9e,
    If_icmpeq = 0x9f,
    If_icmpne = 0xa0,
    If_icmplt = 0xa1,
    If_icmpge = 0xa2,
    If_icmpgt = 0xa3,
    If_icmple = 0xa4,
    If_acmpeq = 0xa5,
    If_acmpne = 0xa6,
    Goto = 0xa7,
    Jsr = 0xa8,
    Ret = 0xa9,
    Tableswitch = 0xaa,
    Lookupswitch = 0xab,
    Ireturn = 0xac,
    Lreturn = 0xad,
    Freturn = 0xae,
    Dreturn = 0xaf,
    Areturn = 0xb0,
    Return = 0xb1,
    Getstatic = 0xb2,
    Putstatic = 0xb3,
    Getfield = 0xb4,
    Putfield = 0xb5,
    Invokevirtual = 0xb6,
    Invokespecial = 0xb7,
    Invokestatic = 0xb8,
    Invokeinterface = 0xb9,
    Invokedynamic = 0xba,
    New = 0xbb,
    Newarray = 0xbc,
    Anewarray = 0xbd,
    Arraylength = 0xbe,
    Athrow = 0xbf,
    Checkcast = 0xc0,
    Instanceof = 0xc1,
    Monitorenter = 0xc2,
    Monitorexit = 0xc3,
    Wide = 0xc4,
    Multianewarray = 0xc5,
    Ifnull = 0xc6,
    Ifnonnull = 0xc7,
    Goto_w = 0xc8,
    Jsr_w = 0xc9,
}

/// Layout of the operands that follow an op code in the code array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    NoOperands,
    /// Signed 8-bit literal (`bipush`)
    SignedByte,
    /// Signed 16-bit literal (`sipush`)
    SignedShort,
    /// Unsigned 8-bit constant pool index (`ldc`)
    ConstantIndexByte,
    /// Unsigned 16-bit constant pool index
    ConstantIndexShort,
    /// Unsigned 8-bit index of a local variable
    LocalVariable,
    /// Signed 16-bit offset, relative to the instruction
    BranchOffset,
    /// Signed 32-bit offset, relative to the instruction
    BranchOffsetWide,
    /// Primitive element type code (`newarray`)
    ArrayType,
    /// Local variable index and signed 8-bit increment (`iinc`)
    LocalIncrement,
    /// Constant pool index, argument count and a zero byte (`invokeinterface`)
    InterfaceCall,
    /// Constant pool index and two zero bytes (`invokedynamic`)
    DynamicCall,
    /// Constant pool index and number of dimensions (`multianewarray`)
    MultiArray,
    TableSwitch,
    LookupSwitch,
    /// Another op code, with widened operands
    Wide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionLength {
    Fixed(usize),
    Variable,
}

impl OperandKind {
    /// Number of bytes of operands following the op code
    pub fn operands_length(self) -> InstructionLength {
        match self {
            OperandKind::NoOperands => InstructionLength::Fixed(0),
            OperandKind::SignedByte
            | OperandKind::ConstantIndexByte
            | OperandKind::LocalVariable
            | OperandKind::ArrayType => InstructionLength::Fixed(1),
            OperandKind::SignedShort
            | OperandKind::ConstantIndexShort
            | OperandKind::BranchOffset
            | OperandKind::LocalIncrement => InstructionLength::Fixed(2),
            OperandKind::MultiArray => InstructionLength::Fixed(3),
            OperandKind::BranchOffsetWide
            | OperandKind::InterfaceCall
            | OperandKind::DynamicCall => InstructionLength::Fixed(4),
            OperandKind::TableSwitch | OperandKind::LookupSwitch | OperandKind::Wide => {
                InstructionLength::Variable
            }
        }
    }
}

impl OpCode {
    pub fn mnemonic(self) -> &'static str {
        self.into()
    }

    /// The operand layout of every instruction
    pub fn operand_kind(self) -> OperandKind {
        match self {
            OpCode::Bipush => OperandKind::SignedByte,
            OpCode::Sipush => OperandKind::SignedShort,
            OpCode::Ldc => OperandKind::ConstantIndexByte,
            OpCode::Ldc_w
            | OpCode::Ldc2_w
            | OpCode::Getstatic
            | OpCode::Putstatic
            | OpCode::Getfield
            | OpCode::Putfield
            | OpCode::Invokevirtual
            | OpCode::Invokespecial
            | OpCode::Invokestatic
            | OpCode::New
            | OpCode::Anewarray
            | OpCode::Checkcast
            | OpCode::Instanceof => OperandKind::ConstantIndexShort,
            OpCode::Iload
            | OpCode::Lload
            | OpCode::Fload
            | OpCode::Dload
            | OpCode::Aload
            | OpCode::Istore
            | OpCode::Lstore
            | OpCode::Fstore
            | OpCode::Dstore
            | OpCode::Astore
            | OpCode::Ret => OperandKind::LocalVariable,
            OpCode::Ifeq
            | OpCode::Ifne
            | OpCode::Iflt
            | OpCode::Ifge
            | OpCode::Ifgt
            | OpCode::Ifle
            | OpCode::If_icmpeq
            | OpCode::If_icmpne
            | OpCode::If_icmplt
            | OpCode::If_icmpge
            | OpCode::If_icmpgt
            | OpCode::If_icmple
            | OpCode::If_acmpeq
            | OpCode::If_acmpne
            | OpCode::Goto
            | OpCode::Jsr
            | OpCode::Ifnull
            | OpCode::Ifnonnull => OperandKind::BranchOffset,
            OpCode::Goto_w | OpCode::Jsr_w => OperandKind::BranchOffsetWide,
            OpCode::Newarray => OperandKind::ArrayType,
            OpCode::Iinc => OperandKind::LocalIncrement,
            OpCode::Invokeinterface => OperandKind::InterfaceCall,
            OpCode::Invokedynamic => OperandKind::DynamicCall,
            OpCode::Multianewarray => OperandKind::MultiArray,
            OpCode::Tableswitch => OperandKind::TableSwitch,
            OpCode::Lookupswitch => OperandKind::LookupSwitch,
            OpCode::Wide => OperandKind::Wide,
            _ => OperandKind::NoOperands,
        }
    }

    /// Whether the instruction can follow a `wide` prefix
    pub fn is_widenable(self) -> bool {
        matches!(self.operand_kind(), OperandKind::LocalVariable)
            || self == OpCode::Iinc
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use strum::IntoEnumIterator;

    use crate::opcodes::{InstructionLength, OpCode, OperandKind};

    #[test]
    fn every_op_code_round_trips_through_its_byte() {
        let op_codes: Vec<OpCode> = OpCode::iter().collect();
        assert_eq!(0xca, op_codes.len());
        for (expected_byte, op_code) in op_codes.into_iter().enumerate() {
            let byte = u8::from(op_code);
            assert_eq!(expected_byte, byte as usize);
            assert!(matches!(OpCode::try_from(byte), Ok(decoded) if decoded == op_code));
        }
    }

    #[test]
    fn reserved_and_unassigned_bytes_are_not_op_codes() {
        for byte in 0xca..=0xffu8 {
            assert!(OpCode::try_from(byte).is_err(), "{byte:#04x}");
        }
    }

    #[test]
    fn mnemonics_are_lowercase_instruction_names() {
        assert_eq!("aload_0", OpCode::Aload_0.mnemonic());
        assert_eq!("iconst_m1", OpCode::Iconst_m1.mnemonic());
        assert_eq!("invokespecial", OpCode::Invokespecial.mnemonic());
        assert_eq!("if_icmpge", OpCode::If_icmpge.mnemonic());
        assert_eq!("ldc2_w", OpCode::Ldc2_w.mnemonic());
        assert_eq!("goto_w", OpCode::Goto_w.mnemonic());
        assert_eq!("return", OpCode::Return.to_string());

        let mnemonics: HashSet<&str> = OpCode::iter().map(OpCode::mnemonic).collect();
        assert_eq!(0xca, mnemonics.len());
    }

    #[test]
    fn operand_widths_match_the_instruction_set() {
        let fixed = |op_code: OpCode| match op_code.operand_kind().operands_length() {
            InstructionLength::Fixed(len) => Some(len),
            InstructionLength::Variable => None,
        };
        assert_eq!(Some(0), fixed(OpCode::Aload_0));
        assert_eq!(Some(1), fixed(OpCode::Bipush));
        assert_eq!(Some(1), fixed(OpCode::Ldc));
        assert_eq!(Some(2), fixed(OpCode::Ldc_w));
        assert_eq!(Some(2), fixed(OpCode::Invokevirtual));
        assert_eq!(Some(2), fixed(OpCode::Iinc));
        assert_eq!(Some(3), fixed(OpCode::Multianewarray));
        assert_eq!(Some(4), fixed(OpCode::Invokeinterface));
        assert_eq!(Some(4), fixed(OpCode::Invokedynamic));
        assert_eq!(Some(4), fixed(OpCode::Goto_w));
        assert_eq!(None, fixed(OpCode::Tableswitch));
        assert_eq!(None, fixed(OpCode::Wide));
    }

    #[test]
    fn only_local_variable_instructions_can_be_widened() {
        let widenable: Vec<OpCode> = OpCode::iter().filter(|op| op.is_widenable()).collect();
        assert_eq!(12, widenable.len());
        assert!(widenable.contains(&OpCode::Iinc));
        assert!(widenable.contains(&OpCode::Ret));
        assert!(!widenable.contains(&OpCode::Aload_0));
        assert_eq!(OperandKind::LocalVariable, OpCode::Astore.operand_kind());
    }
}
