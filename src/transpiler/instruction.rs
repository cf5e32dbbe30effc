use std::fmt::Display;

use super::register::Reg;

/// The MIPS instructions the transpiler emits. Formatting pads every mnemonic
/// to six columns so operands line up in the generated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Label(String),
    Li(Reg, i32),
    Move(Reg, Reg),
    Add(Reg, Reg, Reg),
    Addi(Reg, Reg, i32),
    Sub(Reg, Reg, Reg),
    Subu(Reg, Reg, Reg),
    Mult(Reg, Reg),
    Mflo(Reg),
    Lw(Reg, i32, Reg),
    Sw(Reg, i32, Reg),
    Slt(Reg, Reg, Reg),
    Sltu(Reg, Reg, Reg),
    Xori(Reg, Reg, i32),
    Beq(Reg, Reg, String),
    J(String),
    Jr(Reg),
    Syscall,
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::Label(label) => write!(f, "{label}:"),
            Instruction::Li(rd, value) => write!(f, "{:<6}{rd}, {value}", "li"),
            Instruction::Move(rd, rs) => write!(f, "{:<6}{rd}, {rs}", "move"),
            Instruction::Add(rd, rs, rt) => write!(f, "{:<6}{rd}, {rs}, {rt}", "add"),
            Instruction::Addi(rd, rs, value) => write!(f, "{:<6}{rd}, {rs}, {value}", "addi"),
            Instruction::Sub(rd, rs, rt) => write!(f, "{:<6}{rd}, {rs}, {rt}", "sub"),
            Instruction::Subu(rd, rs, rt) => write!(f, "{:<6}{rd}, {rs}, {rt}", "subu"),
            Instruction::Mult(rs, rt) => write!(f, "{:<6}{rs}, {rt}", "mult"),
            Instruction::Mflo(rd) => write!(f, "{:<6}{rd}", "mflo"),
            Instruction::Lw(rt, offset, base) => write!(f, "{:<6}{rt}, {offset}({base})", "lw"),
            Instruction::Sw(rt, offset, base) => write!(f, "{:<6}{rt}, {offset}({base})", "sw"),
            Instruction::Slt(rd, rs, rt) => write!(f, "{:<6}{rd}, {rs}, {rt}", "slt"),
            Instruction::Sltu(rd, rs, rt) => write!(f, "{:<6}{rd}, {rs}, {rt}", "sltu"),
            Instruction::Xori(rt, rs, value) => write!(f, "{:<6}{rt}, {rs}, {value}", "xori"),
            Instruction::Beq(rs, rt, label) => write!(f, "{:<6}{rs}, {rt}, {label}", "beq"),
            Instruction::J(label) => write!(f, "{:<6}{label}", "j"),
            Instruction::Jr(rs) => write!(f, "{:<6}{rs}", "jr"),
            Instruction::Syscall => f.write_str("syscall"),
        }
    }
}
