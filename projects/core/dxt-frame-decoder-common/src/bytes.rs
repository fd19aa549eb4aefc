//! Bounds-checked little endian reads from byte slices.
//!
//! Block data arrives as plain `&[u8]` with no alignment guarantees. These helpers
//! replace reinterpreting pointer casts: a read that would go past the end of the
//! slice returns [`None`] instead of touching memory outside it.

/// Extension trait providing little endian reads at a byte offset.
pub trait ReadLittleEndian {
    /// Reads a [`u16`] at `offset`, or [`None`] if `offset + 2` exceeds the slice.
    fn read_u16_le_at(&self, offset: usize) -> Option<u16>;

    /// Reads a [`u32`] at `offset`, or [`None`] if `offset + 4` exceeds the slice.
    fn read_u32_le_at(&self, offset: usize) -> Option<u32>;

    /// Reads a 48-bit value at `offset` into the low bits of a [`u64`],
    /// or [`None`] if `offset + 6` exceeds the slice.
    ///
    /// Byte `i` contributes bits `[i * 8, i * 8 + 8)`.
    fn read_u48_le_at(&self, offset: usize) -> Option<u64>;
}

impl ReadLittleEndian for [u8] {
    #[inline]
    fn read_u16_le_at(&self, offset: usize) -> Option<u16> {
        let bytes = self.get(offset..offset.checked_add(2)?)?;
        Some(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    #[inline]
    fn read_u32_le_at(&self, offset: usize) -> Option<u32> {
        let bytes = self.get(offset..offset.checked_add(4)?)?;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    #[inline]
    fn read_u48_le_at(&self, offset: usize) -> Option<u64> {
        let mut bytes = [0u8; 8];
        bytes[..6].copy_from_slice(self.get(offset..offset.checked_add(6)?)?);
        Some(u64::from_le_bytes(bytes))
    }
}
