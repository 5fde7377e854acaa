//! Instruction routines.
//!
//! Each routine performs the semantic work for one mnemonic and returns
//! its extra-cycle byte. Read instructions that can pay the page-cross
//! penalty return 1; stores and read-modify-write instructions return 0,
//! which is what makes indexed stores fixed-cost under the AND rule.
//! Branches return 1 when taken plus 1 more when the target is on a
//! different page.
//!
//! Reference: <https://www.nesdev.org/obelisk-6502-guide/reference.html>

use crate::flags::flag;
use crate::table::Mnemonic;
use crate::Mos6502;
use ferricom_core::Bus;

impl Mos6502 {
    /// Run the instruction routine for the current instruction.
    pub(crate) fn execute(&mut self, mnemonic: Mnemonic, bus: &mut impl Bus) -> u8 {
        use Mnemonic::*;
        match mnemonic {
            LDA => self.lda(),
            LDX => self.ldx(),
            LDY => self.ldy(),
            STA => self.sta(bus),
            STX => self.stx(bus),
            STY => self.sty(bus),
            TAX => self.tax(),
            TAY => self.tay(),
            TXA => self.txa(),
            TYA => self.tya(),
            TSX => self.tsx(),
            TXS => self.txs(),
            PHA => self.pha(bus),
            PHP => self.php(bus),
            PLA => self.pla(bus),
            PLP => self.plp(bus),
            AND => self.and(),
            EOR => self.eor(),
            ORA => self.ora(),
            BIT => self.bit(),
            ADC => self.adc(),
            SBC => self.sbc(),
            CMP => self.cmp(),
            CPX => self.cpx(),
            CPY => self.cpy(),
            INC => self.inc(bus),
            INX => self.inx(),
            INY => self.iny(),
            DEC => self.dec(bus),
            DEX => self.dex(),
            DEY => self.dey(),
            ASL => self.asl(bus),
            ASLA => self.asl_acc(),
            LSR => self.lsr(bus),
            LSRA => self.lsr_acc(),
            ROL => self.rol(bus),
            ROLA => self.rol_acc(),
            ROR => self.ror(bus),
            RORA => self.ror_acc(),
            JMP => self.jmp(),
            JSR => self.jsr(bus),
            RTS => self.rts(bus),
            RTI => self.rti(bus),
            BCC => self.branch(!self.flag(flag::C)),
            BCS => self.branch(self.flag(flag::C)),
            BNE => self.branch(!self.flag(flag::Z)),
            BEQ => self.branch(self.flag(flag::Z)),
            BPL => self.branch(!self.flag(flag::N)),
            BMI => self.branch(self.flag(flag::N)),
            BVC => self.branch(!self.flag(flag::V)),
            BVS => self.branch(self.flag(flag::V)),
            CLC => self.set_flag_op(flag::C, false),
            CLD => self.set_flag_op(flag::D, false),
            CLI => self.set_flag_op(flag::I, false),
            CLV => self.set_flag_op(flag::V, false),
            SEC => self.set_flag_op(flag::C, true),
            SED => self.set_flag_op(flag::D, true),
            SEI => self.set_flag_op(flag::I, true),
            BRK => self.brk(bus),
            NOP => 1,
            LAX => self.lax(),
            SAX => self.sax(bus),
            DCP => self.dcp(bus),
            ISC => self.isc(bus),
            SLO => self.slo(bus),
            RLA => self.rla(bus),
            SRE => self.sre(bus),
            RRA => self.rra(bus),
            // Never reaches execute(); the engine faults or no-ops first.
            XXX => 0,
        }
    }

    // =========================================================================
    // Shared ALU helpers
    // =========================================================================

    /// Add `value` and the carry into A, setting C, Z, V and N.
    ///
    /// Overflow is signed: set when A and the operand agree in sign but
    /// the result does not.
    fn add_to_a(&mut self, value: u8) {
        let carry = u16::from(self.flag(flag::C));
        let sum = self.a as u16 + value as u16 + carry;
        let result = sum as u8;

        self.set_flag(flag::V, (self.a ^ result) & (value ^ result) & 0x80 != 0);
        self.set_flag(flag::C, sum > 0xFF);
        self.set_zn(result);
        self.a = result;
    }

    /// Compare a register against the operand: C when reg >= M.
    fn compare(&mut self, reg: u8) {
        self.set_flag(flag::C, reg >= self.fetched);
        self.set_flag(flag::Z, reg == self.fetched);
        self.set_flag(flag::N, reg.wrapping_sub(self.fetched) & 0x80 != 0);
    }

    // =========================================================================
    // Load/store
    // =========================================================================

    fn lda(&mut self) -> u8 {
        self.a = self.fetched;
        self.set_zn(self.a);
        1
    }

    fn ldx(&mut self) -> u8 {
        self.x = self.fetched;
        self.set_zn(self.x);
        1
    }

    fn ldy(&mut self) -> u8 {
        self.y = self.fetched;
        self.set_zn(self.y);
        1
    }

    fn sta(&mut self, bus: &mut impl Bus) -> u8 {
        bus.write(self.addr, self.a);
        0
    }

    fn stx(&mut self, bus: &mut impl Bus) -> u8 {
        bus.write(self.addr, self.x);
        0
    }

    fn sty(&mut self, bus: &mut impl Bus) -> u8 {
        bus.write(self.addr, self.y);
        0
    }

    // =========================================================================
    // Register transfers
    // =========================================================================

    fn tax(&mut self) -> u8 {
        self.x = self.a;
        self.set_zn(self.x);
        0
    }

    fn tay(&mut self) -> u8 {
        self.y = self.a;
        self.set_zn(self.y);
        0
    }

    fn txa(&mut self) -> u8 {
        self.a = self.x;
        self.set_zn(self.a);
        0
    }

    fn tya(&mut self) -> u8 {
        self.a = self.y;
        self.set_zn(self.a);
        0
    }

    fn tsx(&mut self) -> u8 {
        self.x = self.sp;
        self.set_zn(self.x);
        0
    }

    /// TXS is the one transfer that sets no flags.
    fn txs(&mut self) -> u8 {
        self.sp = self.x;
        0
    }

    // =========================================================================
    // Stack
    // =========================================================================

    fn pha(&mut self, bus: &mut impl Bus) -> u8 {
        self.push(bus, self.a);
        0
    }

    fn php(&mut self, bus: &mut impl Bus) -> u8 {
        let status = self.status_for_push(true);
        self.push(bus, status);
        0
    }

    fn pla(&mut self, bus: &mut impl Bus) -> u8 {
        self.a = self.pull(bus);
        self.set_zn(self.a);
        0
    }

    fn plp(&mut self, bus: &mut impl Bus) -> u8 {
        let status = self.pull(bus);
        self.set_status_from_stack(status);
        0
    }

    // =========================================================================
    // Logical
    // =========================================================================

    fn and(&mut self) -> u8 {
        self.a &= self.fetched;
        self.set_zn(self.a);
        1
    }

    fn eor(&mut self) -> u8 {
        self.a ^= self.fetched;
        self.set_zn(self.a);
        1
    }

    fn ora(&mut self) -> u8 {
        self.a |= self.fetched;
        self.set_zn(self.a);
        1
    }

    /// BIT: Z from A & M; N and V copied straight from bits 7 and 6 of M.
    fn bit(&mut self) -> u8 {
        self.set_flag(flag::Z, self.a & self.fetched == 0);
        self.set_flag(flag::V, self.fetched & 0x40 != 0);
        self.set_flag(flag::N, self.fetched & 0x80 != 0);
        0
    }

    // =========================================================================
    // Arithmetic
    // =========================================================================

    fn adc(&mut self) -> u8 {
        self.add_to_a(self.fetched);
        1
    }

    /// SBC is ADC of the complement: A - M - (1-C) == A + !M + C.
    fn sbc(&mut self) -> u8 {
        self.add_to_a(!self.fetched);
        1
    }

    fn cmp(&mut self) -> u8 {
        self.compare(self.a);
        1
    }

    fn cpx(&mut self) -> u8 {
        self.compare(self.x);
        0
    }

    fn cpy(&mut self) -> u8 {
        self.compare(self.y);
        0
    }

    // =========================================================================
    // Increment/decrement
    // =========================================================================

    fn inc(&mut self, bus: &mut impl Bus) -> u8 {
        self.fetched = self.fetched.wrapping_add(1);
        bus.write(self.addr, self.fetched);
        self.set_zn(self.fetched);
        0
    }

    fn inx(&mut self) -> u8 {
        self.x = self.x.wrapping_add(1);
        self.set_zn(self.x);
        0
    }

    fn iny(&mut self) -> u8 {
        self.y = self.y.wrapping_add(1);
        self.set_zn(self.y);
        0
    }

    fn dec(&mut self, bus: &mut impl Bus) -> u8 {
        self.fetched = self.fetched.wrapping_sub(1);
        bus.write(self.addr, self.fetched);
        self.set_zn(self.fetched);
        0
    }

    fn dex(&mut self) -> u8 {
        self.x = self.x.wrapping_sub(1);
        self.set_zn(self.x);
        0
    }

    fn dey(&mut self) -> u8 {
        self.y = self.y.wrapping_sub(1);
        self.set_zn(self.y);
        0
    }

    // =========================================================================
    // Shifts and rotates (memory and accumulator forms)
    // =========================================================================

    fn shift_left(&mut self, value: u8, carry_in: u8) -> u8 {
        self.set_flag(flag::C, value & 0x80 != 0);
        let result = (value << 1) | carry_in;
        self.set_zn(result);
        result
    }

    fn shift_right(&mut self, value: u8, carry_in: u8) -> u8 {
        self.set_flag(flag::C, value & 0x01 != 0);
        let result = (value >> 1) | (carry_in << 7);
        self.set_zn(result);
        result
    }

    fn asl(&mut self, bus: &mut impl Bus) -> u8 {
        let result = self.shift_left(self.fetched, 0);
        bus.write(self.addr, result);
        0
    }

    fn asl_acc(&mut self) -> u8 {
        self.a = self.shift_left(self.a, 0);
        0
    }

    fn lsr(&mut self, bus: &mut impl Bus) -> u8 {
        let result = self.shift_right(self.fetched, 0);
        bus.write(self.addr, result);
        0
    }

    fn lsr_acc(&mut self) -> u8 {
        self.a = self.shift_right(self.a, 0);
        0
    }

    fn rol(&mut self, bus: &mut impl Bus) -> u8 {
        let carry = u8::from(self.flag(flag::C));
        let result = self.shift_left(self.fetched, carry);
        bus.write(self.addr, result);
        0
    }

    fn rol_acc(&mut self) -> u8 {
        let carry = u8::from(self.flag(flag::C));
        self.a = self.shift_left(self.a, carry);
        0
    }

    fn ror(&mut self, bus: &mut impl Bus) -> u8 {
        let carry = u8::from(self.flag(flag::C));
        let result = self.shift_right(self.fetched, carry);
        bus.write(self.addr, result);
        0
    }

    fn ror_acc(&mut self) -> u8 {
        let carry = u8::from(self.flag(flag::C));
        self.a = self.shift_right(self.a, carry);
        0
    }

    // =========================================================================
    // Jumps, calls and branches
    // =========================================================================

    fn jmp(&mut self) -> u8 {
        self.pc = self.addr;
        0
    }

    /// JSR pushes the return address minus one; RTS undoes it.
    fn jsr(&mut self, bus: &mut impl Bus) -> u8 {
        let ret = self.pc.wrapping_sub(1);
        self.push_word(bus, ret);
        self.pc = self.addr;
        0
    }

    fn rts(&mut self, bus: &mut impl Bus) -> u8 {
        self.pc = self.pull_word(bus).wrapping_add(1);
        0
    }

    fn rti(&mut self, bus: &mut impl Bus) -> u8 {
        let status = self.pull(bus);
        self.set_status_from_stack(status);
        self.pc = self.pull_word(bus);
        0
    }

    /// Shared branch body: +1 when taken, +1 more when the new PC lands on
    /// a different page. Not-taken branches return 0 and cost nothing
    /// extra.
    fn branch(&mut self, condition: bool) -> u8 {
        if !condition {
            return 0;
        }
        let old_pc = self.pc;
        self.pc = self.pc.wrapping_add(self.fetched as i8 as u16);
        1 + u8::from((self.pc & 0xFF00) != (old_pc & 0xFF00))
    }

    // =========================================================================
    // Flag operations and system
    // =========================================================================

    fn set_flag_op(&mut self, mask: u8, value: bool) -> u8 {
        self.set_flag(mask, value);
        0
    }

    /// BRK: a software interrupt through $FFFE with B set in the pushed
    /// status. The byte after the opcode is fetched and discarded, so the
    /// pushed return address skips it.
    fn brk(&mut self, bus: &mut impl Bus) -> u8 {
        self.fetch(bus);
        self.push_word(bus, self.pc);
        let status = self.status_for_push(true);
        self.push(bus, status);
        self.set_flag(flag::I, true);
        self.pc = self.read_word(bus, crate::IRQ_VECTOR);
        0
    }

    // =========================================================================
    // Unofficial opcodes
    // =========================================================================

    /// LAX: LDA and LDX in one.
    fn lax(&mut self) -> u8 {
        self.a = self.fetched;
        self.x = self.fetched;
        self.set_zn(self.fetched);
        1
    }

    /// SAX: store A & X.
    fn sax(&mut self, bus: &mut impl Bus) -> u8 {
        bus.write(self.addr, self.a & self.x);
        0
    }

    /// DCP: DEC then CMP.
    fn dcp(&mut self, bus: &mut impl Bus) -> u8 {
        self.fetched = self.fetched.wrapping_sub(1);
        bus.write(self.addr, self.fetched);
        self.compare(self.a);
        0
    }

    /// ISC: INC then SBC.
    fn isc(&mut self, bus: &mut impl Bus) -> u8 {
        self.fetched = self.fetched.wrapping_add(1);
        bus.write(self.addr, self.fetched);
        self.add_to_a(!self.fetched);
        0
    }

    /// SLO: ASL then ORA.
    fn slo(&mut self, bus: &mut impl Bus) -> u8 {
        let result = self.shift_left(self.fetched, 0);
        bus.write(self.addr, result);
        self.a |= result;
        self.set_zn(self.a);
        0
    }

    /// RLA: ROL then AND.
    fn rla(&mut self, bus: &mut impl Bus) -> u8 {
        let carry = u8::from(self.flag(flag::C));
        let result = self.shift_left(self.fetched, carry);
        bus.write(self.addr, result);
        self.a &= result;
        self.set_zn(self.a);
        0
    }

    /// SRE: LSR then EOR.
    fn sre(&mut self, bus: &mut impl Bus) -> u8 {
        let result = self.shift_right(self.fetched, 0);
        bus.write(self.addr, result);
        self.a ^= result;
        self.set_zn(self.a);
        0
    }

    /// RRA: ROR then ADC, with the rotate's carry-out feeding the add.
    fn rra(&mut self, bus: &mut impl Bus) -> u8 {
        let carry = u8::from(self.flag(flag::C));
        let result = self.shift_right(self.fetched, carry);
        bus.write(self.addr, result);
        self.add_to_a(result);
        0
    }
}
