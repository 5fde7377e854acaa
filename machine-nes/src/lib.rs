//! Nintendo Entertainment System machine emulation.
//!
//! This crate wires a [`ferricom_6502::Mos6502`] CPU, the 2C02 PPU, 2KB of
//! work RAM, nametable VRAM, palette RAM, two controllers and an NROM
//! cartridge into a deterministic machine:
//!
//! - [`Nes::cycle`] advances one master clock tick (one PPU dot; the CPU
//!   runs every third tick; a pending vblank NMI is delivered between
//!   instructions).
//! - [`Nes::run_until_frame`] ticks until the PPU signals frame
//!   completion.
//! - [`Nes::render_background`] and [`Nes::render_pattern_table`] produce
//!   RGB images for a frontend to display.
//!
//! The host parses an iNES byte image into a [`RomImage`], builds a
//! [`Cartridge`], and constructs the machine from it. No files are read or
//! written here.

mod apu;
mod bus;
mod cartridge;
mod controller;
mod image;
mod mapper;
mod nes;
mod palette;
mod ppu;
mod ram;
mod rom;
mod vram;

pub use cartridge::{Cartridge, CartridgeError, Mirroring, Tile};
pub use ferricom_6502::{CpuError, Mos6502};
pub use controller::{buttons, Controller, Port};
pub use image::{Color, Image};
pub use nes::Nes;
pub use palette::{PaletteRam, NTSC_PALETTE};
pub use ppu::Ppu;
pub use rom::RomImage;
