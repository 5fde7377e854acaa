//! The 16x16 opcode matrix.
//!
//! Every opcode pairs an instruction with an addressing mode and a base
//! cycle count. Unofficial-but-stable opcodes (LAX, SAX, DCP, ISC, SLO,
//! RLA, SRE, RRA, the NOP families, SBC $EB) are listed at their measured
//! cycle counts; holes with no defined behavior are marked `XXX` and carry
//! zero cycles.
//!
//! Reference: <http://archive.6502.org/datasheets/rockwell_r650x_r651x.pdf>
//! (page 10) and <https://www.nesdev.org/wiki/Programming_with_unofficial_opcodes>.

/// Instruction mnemonics, including the accumulator-operand variants of the
/// shift/rotate group (distinct entries because they pair with IMP instead
/// of a memory mode) and the undocumented instructions.
#[rustfmt::skip]
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    ADC, AND, ASL, ASLA, BCC, BCS, BEQ, BIT, BMI, BNE, BPL, BRK, BVC, BVS,
    CLC, CLD, CLI, CLV, CMP, CPX, CPY, DEC, DEX, DEY, EOR, INC, INX, INY,
    JMP, JSR, LDA, LDX, LDY, LSR, LSRA, NOP, ORA, PHA, PHP, PLA, PLP,
    ROL, ROLA, ROR, RORA, RTI, RTS, SBC, SEC, SED, SEI, STA, STX, STY,
    TAX, TAY, TSX, TXA, TXS, TYA,
    // Unofficial
    LAX, SAX, DCP, ISC, SLO, RLA, SRE, RRA,
    // No defined behavior
    XXX,
}

impl Mnemonic {
    /// Assembler name. The accumulator shift variants disassemble under
    /// their memory-form name.
    pub fn name(self) -> &'static str {
        use Mnemonic::*;
        match self {
            ADC => "ADC", AND => "AND", ASL | ASLA => "ASL", BCC => "BCC",
            BCS => "BCS", BEQ => "BEQ", BIT => "BIT", BMI => "BMI",
            BNE => "BNE", BPL => "BPL", BRK => "BRK", BVC => "BVC",
            BVS => "BVS", CLC => "CLC", CLD => "CLD", CLI => "CLI",
            CLV => "CLV", CMP => "CMP", CPX => "CPX", CPY => "CPY",
            DEC => "DEC", DEX => "DEX", DEY => "DEY", EOR => "EOR",
            INC => "INC", INX => "INX", INY => "INY", JMP => "JMP",
            JSR => "JSR", LDA => "LDA", LDX => "LDX", LDY => "LDY",
            LSR | LSRA => "LSR", NOP => "NOP", ORA => "ORA", PHA => "PHA",
            PHP => "PHP", PLA => "PLA", PLP => "PLP", ROL | ROLA => "ROL",
            ROR | RORA => "ROR", RTI => "RTI", RTS => "RTS", SBC => "SBC",
            SEC => "SEC", SED => "SED", SEI => "SEI", STA => "STA",
            STX => "STX", STY => "STY", TAX => "TAX", TAY => "TAY",
            TSX => "TSX", TXA => "TXA", TXS => "TXS", TYA => "TYA",
            LAX => "LAX", SAX => "SAX", DCP => "DCP", ISC => "ISC",
            SLO => "SLO", RLA => "RLA", SRE => "SRE", RRA => "RRA",
            XXX => "XXX",
        }
    }
}

/// The 13 addressing modes.
#[rustfmt::skip]
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrMode {
    /// Implied: no operand.
    IMP,
    /// Accumulator: the operand is A.
    ACC,
    /// Immediate: the operand is the next byte.
    IMM,
    /// Zero page.
    ZP0,
    /// Zero page indexed by X, wrapping within the page.
    ZPX,
    /// Zero page indexed by Y, wrapping within the page.
    ZPY,
    /// Relative: signed 8-bit branch displacement.
    REL,
    /// Absolute 16-bit.
    ABS,
    /// Absolute indexed by X; +1 cycle on page cross.
    ABX,
    /// Absolute indexed by Y; +1 cycle on page cross.
    ABY,
    /// Indirect (JMP only), with the page-wrap hardware bug.
    IND,
    /// Indexed indirect: ($nn,X).
    IZX,
    /// Indirect indexed: ($nn),Y; +1 cycle on page cross.
    IZY,
}

/// One opcode table entry.
#[derive(Debug, Clone, Copy)]
pub struct Opcode {
    pub mnemonic: Mnemonic,
    pub mode: AddrMode,
    /// Base cycle count; extra cycles come from the addressing/instruction
    /// AND rule.
    pub cycles: u8,
}

const fn op(mnemonic: Mnemonic, mode: AddrMode, cycles: u8) -> Opcode {
    Opcode {
        mnemonic,
        mode,
        cycles,
    }
}

use AddrMode::*;
use Mnemonic::*;

/// Opcode lookup table, indexed by the opcode byte.
#[rustfmt::skip]
pub const OPCODES: [Opcode; 256] = [
    op(BRK, IMP, 7), op(ORA, IZX, 6), op(XXX, IMP, 0), op(SLO, IZX, 8), // 00
    op(NOP, ZP0, 3), op(ORA, ZP0, 3), op(ASL, ZP0, 5), op(SLO, ZP0, 5), // 04
    op(PHP, IMP, 3), op(ORA, IMM, 2), op(ASLA, ACC, 2), op(XXX, IMP, 0), // 08
    op(NOP, ABS, 4), op(ORA, ABS, 4), op(ASL, ABS, 6), op(SLO, ABS, 6), // 0C
    op(BPL, REL, 2), op(ORA, IZY, 5), op(XXX, IMP, 0), op(SLO, IZY, 8), // 10
    op(NOP, ZPX, 4), op(ORA, ZPX, 4), op(ASL, ZPX, 6), op(SLO, ZPX, 6), // 14
    op(CLC, IMP, 2), op(ORA, ABY, 4), op(NOP, IMP, 2), op(SLO, ABY, 7), // 18
    op(NOP, ABX, 4), op(ORA, ABX, 4), op(ASL, ABX, 7), op(SLO, ABX, 7), // 1C
    op(JSR, ABS, 6), op(AND, IZX, 6), op(XXX, IMP, 0), op(RLA, IZX, 8), // 20
    op(BIT, ZP0, 3), op(AND, ZP0, 3), op(ROL, ZP0, 5), op(RLA, ZP0, 5), // 24
    op(PLP, IMP, 4), op(AND, IMM, 2), op(ROLA, ACC, 2), op(XXX, IMP, 0), // 28
    op(BIT, ABS, 4), op(AND, ABS, 4), op(ROL, ABS, 6), op(RLA, ABS, 6), // 2C
    op(BMI, REL, 2), op(AND, IZY, 5), op(XXX, IMP, 0), op(RLA, IZY, 8), // 30
    op(NOP, ZPX, 4), op(AND, ZPX, 4), op(ROL, ZPX, 6), op(RLA, ZPX, 6), // 34
    op(SEC, IMP, 2), op(AND, ABY, 4), op(NOP, IMP, 2), op(RLA, ABY, 7), // 38
    op(NOP, ABX, 4), op(AND, ABX, 4), op(ROL, ABX, 7), op(RLA, ABX, 7), // 3C
    op(RTI, IMP, 6), op(EOR, IZX, 6), op(XXX, IMP, 0), op(SRE, IZX, 8), // 40
    op(NOP, ZP0, 3), op(EOR, ZP0, 3), op(LSR, ZP0, 5), op(SRE, ZP0, 5), // 44
    op(PHA, IMP, 3), op(EOR, IMM, 2), op(LSRA, ACC, 2), op(XXX, IMP, 0), // 48
    op(JMP, ABS, 3), op(EOR, ABS, 4), op(LSR, ABS, 6), op(SRE, ABS, 6), // 4C
    op(BVC, REL, 2), op(EOR, IZY, 5), op(XXX, IMP, 0), op(SRE, IZY, 8), // 50
    op(NOP, ZPX, 4), op(EOR, ZPX, 4), op(LSR, ZPX, 6), op(SRE, ZPX, 6), // 54
    op(CLI, IMP, 2), op(EOR, ABY, 4), op(NOP, IMP, 2), op(SRE, ABY, 7), // 58
    op(NOP, ABX, 4), op(EOR, ABX, 4), op(LSR, ABX, 7), op(SRE, ABX, 7), // 5C
    op(RTS, IMP, 6), op(ADC, IZX, 6), op(XXX, IMP, 0), op(RRA, IZX, 8), // 60
    op(NOP, ZP0, 3), op(ADC, ZP0, 3), op(ROR, ZP0, 5), op(RRA, ZP0, 5), // 64
    op(PLA, IMP, 4), op(ADC, IMM, 2), op(RORA, ACC, 2), op(XXX, IMP, 0), // 68
    op(JMP, IND, 5), op(ADC, ABS, 4), op(ROR, ABS, 6), op(RRA, ABS, 6), // 6C
    op(BVS, REL, 2), op(ADC, IZY, 5), op(XXX, IMP, 0), op(RRA, IZY, 8), // 70
    op(NOP, ZPX, 4), op(ADC, ZPX, 4), op(ROR, ZPX, 6), op(RRA, ZPX, 6), // 74
    op(SEI, IMP, 2), op(ADC, ABY, 4), op(NOP, IMP, 2), op(RRA, ABY, 7), // 78
    op(NOP, ABX, 4), op(ADC, ABX, 4), op(ROR, ABX, 7), op(RRA, ABX, 7), // 7C
    op(NOP, IMM, 2), op(STA, IZX, 6), op(XXX, IMP, 0), op(SAX, IZX, 6), // 80
    op(STY, ZP0, 3), op(STA, ZP0, 3), op(STX, ZP0, 3), op(SAX, ZP0, 3), // 84
    op(DEY, IMP, 2), op(XXX, IMP, 0), op(TXA, IMP, 2), op(XXX, IMP, 0), // 88
    op(STY, ABS, 4), op(STA, ABS, 4), op(STX, ABS, 4), op(SAX, ABS, 4), // 8C
    op(BCC, REL, 2), op(STA, IZY, 6), op(XXX, IMP, 0), op(XXX, IMP, 0), // 90
    op(STY, ZPX, 4), op(STA, ZPX, 4), op(STX, ZPY, 4), op(SAX, ZPY, 4), // 94
    op(TYA, IMP, 2), op(STA, ABY, 5), op(TXS, IMP, 2), op(XXX, IMP, 0), // 98
    op(XXX, IMP, 0), op(STA, ABX, 5), op(XXX, IMP, 0), op(XXX, IMP, 0), // 9C
    op(LDY, IMM, 2), op(LDA, IZX, 6), op(LDX, IMM, 2), op(LAX, IZX, 6), // A0
    op(LDY, ZP0, 3), op(LDA, ZP0, 3), op(LDX, ZP0, 3), op(LAX, ZP0, 3), // A4
    op(TAY, IMP, 2), op(LDA, IMM, 2), op(TAX, IMP, 2), op(LAX, IMM, 2), // A8
    op(LDY, ABS, 4), op(LDA, ABS, 4), op(LDX, ABS, 4), op(LAX, ABS, 4), // AC
    op(BCS, REL, 2), op(LDA, IZY, 5), op(XXX, IMP, 0), op(LAX, IZY, 5), // B0
    op(LDY, ZPX, 4), op(LDA, ZPX, 4), op(LDX, ZPY, 4), op(LAX, ZPY, 4), // B4
    op(CLV, IMP, 2), op(LDA, ABY, 4), op(TSX, IMP, 2), op(XXX, IMP, 0), // B8
    op(LDY, ABX, 4), op(LDA, ABX, 4), op(LDX, ABY, 4), op(LAX, ABY, 4), // BC
    op(CPY, IMM, 2), op(CMP, IZX, 6), op(XXX, IMP, 0), op(DCP, IZX, 8), // C0
    op(CPY, ZP0, 3), op(CMP, ZP0, 3), op(DEC, ZP0, 5), op(DCP, ZP0, 5), // C4
    op(INY, IMP, 2), op(CMP, IMM, 2), op(DEX, IMP, 2), op(XXX, IMP, 0), // C8
    op(CPY, ABS, 4), op(CMP, ABS, 4), op(DEC, ABS, 6), op(DCP, ABS, 6), // CC
    op(BNE, REL, 2), op(CMP, IZY, 5), op(XXX, IMP, 0), op(DCP, IZY, 8), // D0
    op(NOP, ZPX, 4), op(CMP, ZPX, 4), op(DEC, ZPX, 6), op(DCP, ZPX, 6), // D4
    op(CLD, IMP, 2), op(CMP, ABY, 4), op(NOP, IMP, 2), op(DCP, ABY, 7), // D8
    op(NOP, ABX, 4), op(CMP, ABX, 4), op(DEC, ABX, 7), op(DCP, ABX, 7), // DC
    op(CPX, IMM, 2), op(SBC, IZX, 6), op(XXX, IMP, 0), op(ISC, IZX, 8), // E0
    op(CPX, ZP0, 3), op(SBC, ZP0, 3), op(INC, ZP0, 5), op(ISC, ZP0, 5), // E4
    op(INX, IMP, 2), op(SBC, IMM, 2), op(NOP, IMP, 2), op(SBC, IMM, 2), // E8
    op(CPX, ABS, 4), op(SBC, ABS, 4), op(INC, ABS, 6), op(ISC, ABS, 6), // EC
    op(BEQ, REL, 2), op(SBC, IZY, 5), op(XXX, IMP, 0), op(ISC, IZY, 8), // F0
    op(NOP, ZPX, 4), op(SBC, ZPX, 4), op(INC, ZPX, 6), op(ISC, ZPX, 6), // F4
    op(SED, IMP, 2), op(SBC, ABY, 4), op(NOP, IMP, 2), op(ISC, ABY, 7), // F8
    op(NOP, ABX, 4), op(SBC, ABX, 4), op(INC, ABX, 7), op(ISC, ABX, 7), // FC
];
