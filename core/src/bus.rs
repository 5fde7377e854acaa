/// A 16-bit address space that supports byte read/write operations.
///
/// Memory-mapped I/O systems use this directly: the NES routes CPU reads
/// and writes to RAM, PPU registers, controllers and cartridge PRG through
/// one implementation, and PPU accesses to CHR, nametables and palette RAM
/// through another.
///
/// `read` takes `&mut self` because several hardware registers change state
/// when read (PPUSTATUS clears the vblank flag and the shared write toggle,
/// PPUDATA refills its buffer, controller ports shift).
pub trait Bus {
    /// Read a byte from the given address.
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte to the given address.
    fn write(&mut self, address: u16, value: u8);
}
