//! CPU and PPU bus views.
//!
//! The machine owns every device; the CPU and PPU are handed short-lived
//! views that borrow just the devices their address space routes to. The
//! ownership graph stays a tree (no back-pointers, no reference
//! counting), and a PPU register access can still recurse into the PPU's
//! own address space.

use crate::apu::Apu;
use crate::cartridge::Cartridge;
use crate::controller::Controller;
use crate::palette::PaletteRam;
use crate::ppu::Ppu;
use crate::ram::Ram;
use crate::vram::Vram;
use ferricom_core::Bus;

/// The PPU's 14-bit address space: pattern tables on cartridge CHR,
/// nametable VRAM (with $3000-$3EFF aliasing $2000-$2EFF), palette RAM.
pub(crate) struct PpuBus<'a> {
    pub cartridge: &'a mut Cartridge,
    pub vram: &'a mut Vram,
    pub palette: &'a mut PaletteRam,
}

impl Bus for PpuBus<'_> {
    fn read(&mut self, address: u16) -> u8 {
        match address & 0x3FFF {
            0x0000..=0x1FFF => self.cartridge.chr_read(address & 0x1FFF),
            0x2000..=0x3EFF => self.vram.read(address),
            _ => self.palette.read(address),
        }
    }

    fn write(&mut self, address: u16, value: u8) {
        match address & 0x3FFF {
            0x0000..=0x1FFF => self.cartridge.chr_write(address & 0x1FFF, value),
            0x2000..=0x3EFF => self.vram.write(address, value),
            _ => self.palette.write(address, value),
        }
    }
}

/// The CPU's address space: work RAM, the PPU register window, the APU
/// window, controllers, and cartridge PRG.
pub(crate) struct CpuBus<'a> {
    pub ram: &'a mut Ram<2048>,
    pub ppu: &'a mut Ppu,
    pub apu: &'a mut Apu,
    pub cartridge: &'a mut Cartridge,
    pub vram: &'a mut Vram,
    pub palette: &'a mut PaletteRam,
    pub controllers: &'a mut [Controller; 2],
}

impl Bus for CpuBus<'_> {
    fn read(&mut self, address: u16) -> u8 {
        match address {
            // 2KB work RAM, mirrored through $1FFF.
            0x0000..=0x1FFF => self.ram.read(address),
            // PPU registers, mirrored every 8 bytes. Only STATUS, OAMDATA
            // and DATA are readable; the rest float low.
            0x2000..=0x3FFF => match address & 0x0007 {
                2 => self.ppu.read_status(),
                4 => self.ppu.read_oam_data(),
                7 => {
                    let mut ppu_bus = PpuBus {
                        cartridge: &mut *self.cartridge,
                        vram: &mut *self.vram,
                        palette: &mut *self.palette,
                    };
                    self.ppu.read_data(&mut ppu_bus)
                }
                _ => 0,
            },
            // Controller shift registers.
            0x4016 => self.controllers[0].read(),
            0x4017 => self.controllers[1].read(),
            // APU window (stubbed).
            0x4000..=0x4015 => self.apu.read_register(address),
            // Test-mode registers and open expansion area.
            0x4018..=0x7FFF => 0,
            // Cartridge PRG through the mapper.
            0x8000..=0xFFFF => self.cartridge.prg_read(address),
        }
    }

    fn write(&mut self, address: u16, value: u8) {
        match address {
            0x0000..=0x1FFF => self.ram.write(address, value),
            0x2000..=0x3FFF => match address & 0x0007 {
                0 => self.ppu.write_ctrl(value),
                1 => self.ppu.write_mask(value),
                // STATUS is read-only.
                2 => {}
                3 => self.ppu.write_oam_addr(value),
                4 => self.ppu.write_oam_data(value),
                5 => self.ppu.write_scroll(value),
                6 => self.ppu.write_addr(value),
                7 => {
                    let mut ppu_bus = PpuBus {
                        cartridge: &mut *self.cartridge,
                        vram: &mut *self.vram,
                        palette: &mut *self.palette,
                    };
                    self.ppu.write_data(&mut ppu_bus, value);
                }
                _ => {}
            },
            // Any strobe write latches both controllers.
            0x4016 => {
                self.controllers[0].strobe();
                self.controllers[1].strobe();
            }
            // $4017 writes belong to the APU frame counter, not port 2.
            0x4000..=0x4015 | 0x4017 => self.apu.write_register(address, value),
            0x4018..=0x7FFF => {}
            0x8000..=0xFFFF => self.cartridge.prg_write(address, value),
        }
    }
}
