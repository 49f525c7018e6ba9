/// Trait for reader communication backends.
/// Implement this trait for different transports (serial port, test doubles, etc.)
pub trait RfidTransport {
    /// Error type for transport operations
    type Error: std::fmt::Debug;

    /// Write data to the transport, returning the number of bytes accepted
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Read up to `buf.len()` bytes. `Ok(0)` means no more data is coming.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Clear the input buffer
    fn clear_input(&mut self) -> Result<(), Self::Error>;
}
