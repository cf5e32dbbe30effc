use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
    T0,
    T1,
    T2,
    T3,
    T4,
    T5,
    T6,
    T7,
    T8,
    T9,
    S0,
    S1,
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
    A0,
    V0,
    Sp,
    Zero,
    Ra,
}

impl Display for Reg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Reg::T0 => "$t0",
            Reg::T1 => "$t1",
            Reg::T2 => "$t2",
            Reg::T3 => "$t3",
            Reg::T4 => "$t4",
            Reg::T5 => "$t5",
            Reg::T6 => "$t6",
            Reg::T7 => "$t7",
            Reg::T8 => "$t8",
            Reg::T9 => "$t9",
            Reg::S0 => "$s0",
            Reg::S1 => "$s1",
            Reg::S2 => "$s2",
            Reg::S3 => "$s3",
            Reg::S4 => "$s4",
            Reg::S5 => "$s5",
            Reg::S6 => "$s6",
            Reg::S7 => "$s7",
            Reg::A0 => "$a0",
            Reg::V0 => "$v0",
            Reg::Sp => "$sp",
            Reg::Zero => "$zero",
            Reg::Ra => "$ra",
        })
    }
}

/// The temporaries expression evaluation may claim, in allocation order.
pub const TEMPORARIES: [Reg; 18] = [
    Reg::T0,
    Reg::T1,
    Reg::T2,
    Reg::T3,
    Reg::T4,
    Reg::T5,
    Reg::T6,
    Reg::T7,
    Reg::T8,
    Reg::T9,
    Reg::S0,
    Reg::S1,
    Reg::S2,
    Reg::S3,
    Reg::S4,
    Reg::S5,
    Reg::S6,
    Reg::S7,
];

/// Bitset over [`TEMPORARIES`]. A set bit means the register is allocated;
/// allocation always hands out the lowest-numbered free register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterPool {
    used: u32,
}

impl RegisterPool {
    pub fn find_register(&mut self) -> Option<Reg> {
        for (position, reg) in TEMPORARIES.iter().enumerate() {
            if self.used & (1 << position) == 0 {
                self.used |= 1 << position;
                return Some(*reg);
            }
        }
        None
    }

    pub fn release_register(&mut self, reg: Reg) {
        if let Some(position) = TEMPORARIES.iter().position(|&temporary| temporary == reg) {
            self.used &= !(1 << position);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.used == 0
    }
}
