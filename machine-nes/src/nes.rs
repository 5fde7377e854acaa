//! The NES system container.

use crate::apu::Apu;
use crate::bus::{CpuBus, PpuBus};
use crate::cartridge::{Cartridge, CartridgeError};
use crate::controller::{Controller, Port};
use crate::image::Image;
use crate::palette::PaletteRam;
use crate::ppu::Ppu;
use crate::ram::Ram;
use crate::rom::RomImage;
use crate::vram::Vram;
use ferricom_6502::{CpuError, Mos6502};
use ferricom_core::Cpu;

/// The machine: CPU, PPU, memories, cartridge and controllers under one
/// master clock.
///
/// One [`cycle`](Nes::cycle) is one PPU dot; the CPU runs every third
/// dot, and a pending vblank NMI is injected between CPU instructions.
/// Given the same cartridge and the same sequence of `set_button` and
/// `cycle` calls, every observable output is bit-identical across runs.
pub struct Nes {
    cpu: Mos6502,
    ppu: Ppu,
    apu: Apu,
    ram: Ram<2048>,
    vram: Vram,
    palette: PaletteRam,
    cartridge: Cartridge,
    controllers: [Controller; 2],
    /// NMI raised by the PPU, waiting for an instruction boundary.
    nmi_pending: bool,
    /// Master clock ticks (PPU dots) since reset.
    master_clock: u64,
}

impl Nes {
    /// Build a machine around a cartridge and reset it.
    pub fn new(cartridge: Cartridge) -> Self {
        let mut nes = Self {
            cpu: Mos6502::new(),
            ppu: Ppu::new(),
            apu: Apu::new(),
            ram: Ram::new(),
            vram: Vram::new(cartridge.mirroring()),
            palette: PaletteRam::new(),
            cartridge,
            controllers: [Controller::new(), Controller::new()],
            nmi_pending: false,
            master_clock: 0,
        };
        nes.reset();
        nes
    }

    /// Build a machine from a parsed iNES image.
    pub fn from_image(image: RomImage) -> Result<Self, CartridgeError> {
        Ok(Self::new(Cartridge::new(image)?))
    }

    /// Reset CPU and PPU and restart the master clock.
    pub fn reset(&mut self) {
        let Nes {
            cpu,
            ppu,
            apu,
            ram,
            vram,
            palette,
            cartridge,
            controllers,
            nmi_pending,
            master_clock,
        } = self;
        ppu.reset();
        let mut bus = CpuBus {
            ram,
            ppu,
            apu,
            cartridge,
            vram,
            palette,
            controllers,
        };
        cpu.reset(&mut bus);
        *nmi_pending = false;
        *master_clock = 0;
    }

    /// Advance one master tick: one PPU dot, a CPU cycle on every third
    /// tick, then NMI delivery once the CPU sits between instructions.
    pub fn cycle(&mut self) -> Result<(), CpuError> {
        let Nes {
            cpu,
            ppu,
            apu,
            ram,
            vram,
            palette,
            cartridge,
            controllers,
            nmi_pending,
            master_clock,
        } = self;

        if ppu.cycle() {
            *nmi_pending = true;
        }

        let mut bus = CpuBus {
            ram,
            ppu,
            apu,
            cartridge,
            vram,
            palette,
            controllers,
        };
        if *master_clock % 3 == 0 {
            cpu.cycle(&mut bus)?;
        }
        if *nmi_pending && cpu.idle() {
            cpu.nmi(&mut bus);
            *nmi_pending = false;
        }

        *master_clock += 1;
        Ok(())
    }

    /// Run master ticks until the CPU completes one instruction. Cycles
    /// still owed by a reset or interrupt drain first.
    pub fn step(&mut self) -> Result<(), CpuError> {
        let target = self.cpu.instructions() + 1;
        loop {
            self.cycle()?;
            if self.cpu.instructions() >= target && self.cpu.idle() {
                return Ok(());
            }
        }
    }

    /// Run master ticks until the PPU's frame-complete latch rises.
    pub fn run_until_frame(&mut self) -> Result<(), CpuError> {
        loop {
            self.cycle()?;
            if self.ppu.frame_complete() {
                return Ok(());
            }
        }
    }

    /// False once the CPU has faulted or fetched BRK, the usual end
    /// marker for self-terminating headless programs.
    pub fn is_running(&self) -> bool {
        !self.cpu.halted() && (self.cpu.instructions() == 0 || self.cpu.opcode() != 0x00)
    }

    // =========================================================================
    // Host surface
    // =========================================================================

    pub fn pc(&self) -> u16 {
        self.cpu.pc()
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.cpu.set_pc(pc);
    }

    /// CPU cycles executed since construction.
    pub fn cycles(&self) -> u64 {
        self.cpu.cycles()
    }

    /// CPU instructions executed since construction.
    pub fn instructions(&self) -> u64 {
        self.cpu.instructions()
    }

    /// Frames completed by the PPU.
    pub fn frames(&self) -> u64 {
        self.ppu.frames()
    }

    /// Update a controller button. Takes effect at the next strobe.
    pub fn set_button(&mut self, port: Port, button: u8, pressed: bool) {
        self.controllers[port.index()].set_button(button, pressed);
    }

    pub fn cpu(&self) -> &Mos6502 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Mos6502 {
        &mut self.cpu
    }

    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    /// Read through the CPU bus, register side effects included.
    pub fn cpu_bus_read(&mut self, addr: u16) -> u8 {
        use ferricom_core::Bus;
        let Nes {
            ppu,
            apu,
            ram,
            vram,
            palette,
            cartridge,
            controllers,
            ..
        } = self;
        let mut bus = CpuBus {
            ram,
            ppu,
            apu,
            cartridge,
            vram,
            palette,
            controllers,
        };
        bus.read(addr)
    }

    /// Write through the CPU bus.
    pub fn cpu_bus_write(&mut self, addr: u16, value: u8) {
        use ferricom_core::Bus;
        let Nes {
            ppu,
            apu,
            ram,
            vram,
            palette,
            cartridge,
            controllers,
            ..
        } = self;
        let mut bus = CpuBus {
            ram,
            ppu,
            apu,
            cartridge,
            vram,
            palette,
            controllers,
        };
        bus.write(addr, value);
    }

    /// Read through the PPU bus.
    pub fn ppu_bus_read(&mut self, addr: u16) -> u8 {
        use ferricom_core::Bus;
        let Nes {
            vram,
            palette,
            cartridge,
            ..
        } = self;
        let mut bus = PpuBus {
            cartridge,
            vram,
            palette,
        };
        bus.read(addr)
    }

    /// Write through the PPU bus.
    pub fn ppu_bus_write(&mut self, addr: u16, value: u8) {
        use ferricom_core::Bus;
        let Nes {
            vram,
            palette,
            cartridge,
            ..
        } = self;
        let mut bus = PpuBus {
            cartridge,
            vram,
            palette,
        };
        bus.write(addr, value);
    }

    // =========================================================================
    // Framebuffer accessors
    // =========================================================================

    /// Blit the background layer: the 32x30 tile grid visible from the
    /// latched coarse scroll and nametable select, wrapping across
    /// nametables on both axes.
    pub fn render_background(&self) -> Image<256, 240> {
        let mut frame = Image::new();
        let (scroll_x, scroll_y) = self.ppu.coarse_scroll();
        let select = self.ppu.nametable_select();
        let base_nx = select & 0x01;
        let base_ny = (select >> 1) & 0x01;
        let table = self.ppu.background_table();

        for ty in 0..30u16 {
            for tx in 0..32u16 {
                let gx = scroll_x + tx;
                let gy = scroll_y + ty;
                let nx = (base_nx + gx / 32) & 0x01;
                let ny = (base_ny + gy / 30) & 0x01;
                let tile_x = gx % 32;
                let tile_y = gy % 30;

                let nametable = 0x2000 | (ny << 11) | (nx << 10);
                let index = self.vram.read(nametable + tile_y * 32 + tile_x);
                let attr = self
                    .vram
                    .read(nametable + 0x03C0 + (tile_y >> 2) * 8 + (tile_x >> 2));
                // Each attribute byte covers a 32x32 area; two bits per
                // 16x16 quadrant.
                let shift = ((tile_y & 0x02) | ((tile_x & 0x02) >> 1)) * 2;
                let palette = (attr >> shift) & 0x03;

                let tile = self.cartridge.tile(index, table);
                for (y, row) in tile.iter().enumerate() {
                    for (x, &value) in row.iter().enumerate() {
                        let color = self.palette.color(palette, value);
                        frame.set(tx as usize * 8 + x, ty as usize * 8 + y, color);
                    }
                }
            }
        }
        frame
    }

    /// Render one pattern table (0 = left, 1 = right) as a 16x16 grid of
    /// tiles, colored through the given palette.
    pub fn render_pattern_table(&self, table: u8, palette: u8) -> Image<128, 128> {
        let mut frame = Image::new();
        for ty in 0..16usize {
            for tx in 0..16usize {
                let tile = self.cartridge.tile((ty * 16 + tx) as u8, table);
                for (y, row) in tile.iter().enumerate() {
                    for (x, &value) in row.iter().enumerate() {
                        frame.set(tx * 8 + x, ty * 8 + y, self.palette.color(palette, value));
                    }
                }
            }
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::Mirroring;
    use crate::controller::buttons;
    use crate::palette::NTSC_PALETTE;
    use crate::ppu::ctrl;

    /// A 32KB NROM cartridge with the reset vector pointing at $8000.
    fn test_nes(program: &[u8]) -> Nes {
        let mut prg = vec![0u8; 0x8000];
        prg[..program.len()].copy_from_slice(program);
        prg[0x7FFC] = 0x00;
        prg[0x7FFD] = 0x80;
        Nes::new(Cartridge::from_parts(prg, vec![], Mirroring::Horizontal).unwrap())
    }

    #[test]
    fn reset_vectors_through_fffc() {
        let nes = test_nes(&[0xEA]);
        assert_eq!(nes.pc(), 0x8000);
    }

    #[test]
    fn ram_mirrors_through_1fff() {
        let mut nes = test_nes(&[0xEA]);
        nes.cpu_bus_write(0x0002, 0x99);
        assert_eq!(nes.cpu_bus_read(0x0802), 0x99);
        assert_eq!(nes.cpu_bus_read(0x1802), 0x99);
    }

    #[test]
    fn cpu_runs_every_third_dot() {
        let mut nes = test_nes(&[0xEA, 0xEA, 0xEA]);
        for _ in 0..21 {
            nes.cycle().unwrap();
        }
        // 21 dots = 7 CPU cycles: exactly the reset debt.
        assert_eq!(nes.cycles(), 7);
        assert_eq!(nes.instructions(), 0);
    }

    #[test]
    fn step_executes_one_instruction() {
        let mut nes = test_nes(&[0xA9, 0x42, 0xEA]);
        nes.step().unwrap();
        assert_eq!(nes.instructions(), 1);
        assert_eq!(nes.cpu().a(), 0x42);
        assert_eq!(nes.cycles(), 7 + 2);
    }

    #[test]
    fn run_until_frame_covers_one_frame_of_dots() {
        // Harmless infinite loop: JMP $8000.
        let mut nes = test_nes(&[0x4C, 0x00, 0x80]);
        nes.run_until_frame().unwrap();
        assert_eq!(nes.frames(), 1);
        // Starting from scanline 0, the first frame is 261 scanlines of
        // 341 dots.
        assert_eq!(nes.master_clock, 261 * 341);

        nes.run_until_frame().unwrap();
        assert_eq!(nes.frames(), 2);
        assert_eq!(nes.master_clock, (261 + 262) * 341);
    }

    #[test]
    fn vblank_nmi_vectors_the_cpu() {
        // Main program enables NMI via PPUCTRL and loops; the NMI handler
        // at $9000 stores $55 to $0010 and loops.
        let mut prg = vec![0u8; 0x8000];
        prg[..8].copy_from_slice(&[
            0xA9, 0x80, // LDA #$80
            0x8D, 0x00, 0x20, // STA $2000
            0x4C, 0x05, 0x80, // JMP $8005
        ]);
        prg[0x1000] = 0xA9; // $9000: LDA #$55
        prg[0x1001] = 0x55;
        prg[0x1002] = 0x8D; // STA $0010
        prg[0x1003] = 0x10;
        prg[0x1004] = 0x00;
        prg[0x1005] = 0x4C; // JMP $9005
        prg[0x1006] = 0x05;
        prg[0x1007] = 0x90;
        prg[0x7FFA] = 0x00; // NMI vector -> $9000
        prg[0x7FFB] = 0x90;
        prg[0x7FFC] = 0x00; // reset vector -> $8000
        prg[0x7FFD] = 0x80;
        let mut nes =
            Nes::new(Cartridge::from_parts(prg, vec![], Mirroring::Horizontal).unwrap());

        nes.run_until_frame().unwrap();
        assert_eq!(nes.cpu_bus_read(0x0010), 0x55);
        assert_ne!(nes.ppu().frames(), 0);
    }

    #[test]
    fn ppudata_write_then_buffered_read() {
        let mut nes = test_nes(&[0xEA]);
        // Write $2A to $3F10 via PPUADDR/PPUDATA.
        nes.cpu_bus_read(0x2002); // clear the latch
        nes.cpu_bus_write(0x2006, 0x3F);
        nes.cpu_bus_write(0x2006, 0x10);
        nes.cpu_bus_write(0x2007, 0x2A);

        // Read $3F00: the alias makes it the same cell, and palette
        // reads return fresh data, so the second read surely sees it.
        nes.cpu_bus_read(0x2002);
        nes.cpu_bus_write(0x2006, 0x3F);
        nes.cpu_bus_write(0x2006, 0x00);
        nes.cpu_bus_read(0x2007);
        nes.cpu_bus_write(0x2006, 0x3F);
        nes.cpu_bus_write(0x2006, 0x00);
        assert_eq!(nes.cpu_bus_read(0x2007), 0x2A);
    }

    #[test]
    fn controller_strobe_and_shift_through_4016() {
        let mut nes = test_nes(&[0xEA]);
        nes.set_button(Port::One, buttons::A, true);
        nes.set_button(Port::One, buttons::START, true);
        nes.cpu_bus_write(0x4016, 0x01);
        nes.cpu_bus_write(0x4016, 0x00);

        let bits: Vec<u8> = (0..8).map(|_| nes.cpu_bus_read(0x4016)).collect();
        assert_eq!(bits, [1, 0, 0, 1, 0, 0, 0, 0]);
        // Port two was strobed with nothing pressed.
        assert_eq!(nes.cpu_bus_read(0x4017), 0);
    }

    #[test]
    fn apu_window_reads_zero_and_ignores_writes() {
        let mut nes = test_nes(&[0xEA]);
        nes.cpu_bus_write(0x4000, 0xFF);
        nes.cpu_bus_write(0x4017, 0xFF);
        assert_eq!(nes.cpu_bus_read(0x4000), 0);
        assert_eq!(nes.cpu_bus_read(0x4015), 0);
        // Open expansion area floats low.
        assert_eq!(nes.cpu_bus_read(0x5000), 0);
    }

    #[test]
    fn render_pattern_table_colors_through_palette_ram() {
        let mut chr = vec![0u8; 0x2000];
        // Tile 0: solid plane-0 rows -> every pixel value 1.
        for y in 0..8 {
            chr[y] = 0xFF;
        }
        let mut prg = vec![0u8; 0x8000];
        prg[0x7FFC] = 0x00;
        prg[0x7FFD] = 0x80;
        let mut nes =
            Nes::new(Cartridge::from_parts(prg, chr, Mirroring::Horizontal).unwrap());

        nes.ppu_bus_write(0x3F01, 0x2A);
        let image = nes.render_pattern_table(0, 0);
        assert_eq!(image.get(0, 0), NTSC_PALETTE[0x2A]);
        // Tile 1 is empty: entry 0 of palette 0.
        assert_eq!(image.get(8, 0), NTSC_PALETTE[0x00]);
    }

    #[test]
    fn render_background_reads_tiles_and_attributes() {
        let mut chr = vec![0u8; 0x2000];
        // Tile 7 in the left table: all pixels value 1.
        for y in 0..8 {
            chr[7 * 16 + y] = 0xFF;
        }
        let mut prg = vec![0u8; 0x8000];
        prg[0x7FFC] = 0x00;
        prg[0x7FFD] = 0x80;
        let mut nes =
            Nes::new(Cartridge::from_parts(prg, chr, Mirroring::Horizontal).unwrap());

        // Tile (1, 0) of nametable 0 shows tile 7; attribute quadrant
        // selects palette 1; palette 1 entry 1 is color $16.
        nes.ppu_bus_write(0x2001, 0x07);
        nes.ppu_bus_write(0x23C0, 0b0000_0001);
        nes.ppu_bus_write(0x3F05, 0x16);

        let frame = nes.render_background();
        assert_eq!(frame.get(8, 0), NTSC_PALETTE[0x16]);
        // A tile the nametable leaves at zero renders palette 0 entry 0.
        assert_eq!(frame.get(16, 0), NTSC_PALETTE[0x00]);
    }

    #[test]
    fn background_table_select_follows_ppuctrl() {
        let mut chr = vec![0u8; 0x2000];
        for y in 0..8 {
            chr[0x1000 + y] = 0xFF; // right-table tile 0, all value 1
        }
        let mut prg = vec![0u8; 0x8000];
        prg[0x7FFC] = 0x00;
        prg[0x7FFD] = 0x80;
        let mut nes =
            Nes::new(Cartridge::from_parts(prg, chr, Mirroring::Horizontal).unwrap());
        nes.ppu_bus_write(0x3F01, 0x30);

        // Left table selected: tile 0 is blank there.
        let frame = nes.render_background();
        assert_eq!(frame.get(0, 0), NTSC_PALETTE[0x00]);

        nes.cpu_bus_write(0x2000, ctrl::BG_PATTERN);
        let frame = nes.render_background();
        assert_eq!(frame.get(0, 0), NTSC_PALETTE[0x30]);
    }
}
