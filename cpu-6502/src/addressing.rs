//! Addressing-mode routines.
//!
//! Each routine consumes any operand bytes at PC, leaves the effective
//! address in `addr`, pre-fetches the operand value into `fetched` for the
//! memory modes, and returns the extra cycles the mode can require. The
//! extra cycle is only charged when the instruction routine asks for it
//! too (see the AND rule in `cycle`); relative mode returns 0b11 so that
//! both branch penalties (+1 taken, +1 page crossed) survive the AND.
//!
//! Reference: <https://www.nesdev.org/obelisk-6502-guide/addressing.html>

use crate::table::AddrMode;
use crate::Mos6502;
use ferricom_core::Bus;

impl Mos6502 {
    /// Run the addressing-mode routine for the current instruction.
    pub(crate) fn resolve(&mut self, mode: AddrMode, bus: &mut impl Bus) -> u8 {
        match mode {
            AddrMode::IMP => 0,
            AddrMode::ACC => self.acc(),
            AddrMode::IMM => self.imm(bus),
            AddrMode::ZP0 => self.zp0(bus),
            AddrMode::ZPX => self.zpx(bus),
            AddrMode::ZPY => self.zpy(bus),
            AddrMode::REL => self.rel(bus),
            AddrMode::ABS => self.abs(bus),
            AddrMode::ABX => self.abx(bus),
            AddrMode::ABY => self.aby(bus),
            AddrMode::IND => self.ind(bus),
            AddrMode::IZX => self.izx(bus),
            AddrMode::IZY => self.izy(bus),
        }
    }

    /// Accumulator: the operand is A.
    fn acc(&mut self) -> u8 {
        self.fetched = self.a;
        0
    }

    /// Immediate: the operand is the next program byte.
    fn imm(&mut self, bus: &mut impl Bus) -> u8 {
        self.fetched = self.fetch(bus);
        0
    }

    /// Zero page: one operand byte addresses the first 256 bytes.
    fn zp0(&mut self, bus: &mut impl Bus) -> u8 {
        self.addr = self.fetch(bus) as u16;
        self.fetched = bus.read(self.addr);
        0
    }

    /// Zero page,X. The sum wraps within the page: $80,X with X=$FF reads
    /// $007F, not $017F.
    fn zpx(&mut self, bus: &mut impl Bus) -> u8 {
        self.addr = self.fetch(bus).wrapping_add(self.x) as u16;
        self.fetched = bus.read(self.addr);
        0
    }

    /// Zero page,Y. Same wrap rule; only LDX/STX (and LAX/SAX) use it.
    fn zpy(&mut self, bus: &mut impl Bus) -> u8 {
        self.addr = self.fetch(bus).wrapping_add(self.y) as u16;
        self.fetched = bus.read(self.addr);
        0
    }

    /// Relative: a signed displacement for the branch group.
    ///
    /// Returns 0b11: branch routines return 1 or 2 when taken, and ANDing
    /// against 0b11 passes either through unchanged.
    fn rel(&mut self, bus: &mut impl Bus) -> u8 {
        self.fetched = self.fetch(bus);
        0x03
    }

    /// Absolute: a full 16-bit address.
    fn abs(&mut self, bus: &mut impl Bus) -> u8 {
        let low = self.fetch(bus) as u16;
        let high = self.fetch(bus) as u16;
        self.addr = (high << 8) | low;
        self.fetched = bus.read(self.addr);
        0
    }

    /// Absolute,X. Crossing a page costs the "oops" cycle on read
    /// instructions.
    fn abx(&mut self, bus: &mut impl Bus) -> u8 {
        let low = self.fetch(bus) as u16;
        let high = self.fetch(bus) as u16;
        let base = (high << 8) | low;
        self.addr = base.wrapping_add(self.x as u16);
        self.fetched = bus.read(self.addr);
        u8::from((base & 0xFF00) != (self.addr & 0xFF00))
    }

    /// Absolute,Y. Same page-cross rule as ABX.
    fn aby(&mut self, bus: &mut impl Bus) -> u8 {
        let low = self.fetch(bus) as u16;
        let high = self.fetch(bus) as u16;
        let base = (high << 8) | low;
        self.addr = base.wrapping_add(self.y as u16);
        self.fetched = bus.read(self.addr);
        u8::from((base & 0xFF00) != (self.addr & 0xFF00))
    }

    /// Indirect, used only by JMP. Reproduces the hardware bug: a pointer
    /// at $xxFF fetches its high byte from $xx00 instead of the next page.
    fn ind(&mut self, bus: &mut impl Bus) -> u8 {
        let ptr_low = self.fetch(bus) as u16;
        let ptr_high = self.fetch(bus) as u16;
        let ptr = (ptr_high << 8) | ptr_low;

        let low = bus.read(ptr) as u16;
        let high = if ptr_low == 0x00FF {
            bus.read(ptr & 0xFF00) as u16
        } else {
            bus.read(ptr + 1) as u16
        };
        self.addr = (high << 8) | low;
        self.fetched = bus.read(self.addr);
        0
    }

    /// Indexed indirect: ($nn,X). The pointer lives in zero page at
    /// operand+X, both pointer bytes wrapping within the page.
    fn izx(&mut self, bus: &mut impl Bus) -> u8 {
        let base = self.fetch(bus) as u16;
        let low = bus.read((base + self.x as u16) & 0x00FF) as u16;
        let high = bus.read((base + self.x as u16 + 1) & 0x00FF) as u16;
        self.addr = (high << 8) | low;
        self.fetched = bus.read(self.addr);
        0
    }

    /// Indirect indexed: ($nn),Y. The zero-page pointer is read first,
    /// then Y is added; crossing a page costs the oops cycle.
    fn izy(&mut self, bus: &mut impl Bus) -> u8 {
        let ptr = self.fetch(bus) as u16;
        let low = bus.read(ptr) as u16;
        let high = bus.read((ptr + 1) & 0x00FF) as u16;
        let base = (high << 8) | low;
        self.addr = base.wrapping_add(self.y as u16);
        self.fetched = bus.read(self.addr);
        u8::from((base & 0xFF00) != (self.addr & 0xFF00))
    }
}
