use crate::Bus;

/// A CPU that can be clocked against a bus.
///
/// The bus is passed into every call rather than stored: the machine owns
/// both the CPU and the devices the bus routes to, so handing a borrow per
/// call keeps the ownership graph a tree.
pub trait Cpu<B: Bus> {
    /// Error produced when execution cannot continue (e.g. an illegal
    /// opcode was fetched).
    type Error;

    /// Advance the CPU by one clock cycle.
    ///
    /// A new instruction is fetched and executed only when the cycles owed
    /// by the previous one have drained.
    fn cycle(&mut self, bus: &mut B) -> Result<(), Self::Error>;

    /// Run whole cycles until the current instruction completes.
    fn step(&mut self, bus: &mut B) -> Result<(), Self::Error>;

    /// Reset the CPU: load the program counter from the reset vector and
    /// return the registers to their power-on state.
    fn reset(&mut self, bus: &mut B);

    /// Request a maskable interrupt. Honored only when the I flag is clear.
    fn irq(&mut self, bus: &mut B);

    /// Request a non-maskable interrupt. Always honored.
    fn nmi(&mut self, bus: &mut B);

    /// Current program counter.
    fn pc(&self) -> u16;
}
