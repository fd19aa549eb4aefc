use crate::color_8888::Color8888;

/// Represents a 16-bit RGB565 color (5 bits red, 6 bits green, 5 bits blue)
/// As encountered in the colour endpoints of DXT1 and DXT5 blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color565 {
    /// The underlying 16-bit RGB565 value
    value: u16,
}

impl Color565 {
    /// Creates a new [`Color565`] from the raw 16-bit value
    #[inline]
    pub const fn from_raw(value: u16) -> Self {
        Self { value }
    }

    /// Creates a new [`Color565`] from separate RGB components
    ///
    /// The low bits of each channel that do not fit the 5/6/5 layout are discarded.
    ///
    /// # Parameters
    ///
    /// - `r`: The red component (0-255)
    /// - `g`: The green component (0-255)
    /// - `b`: The blue component (0-255)
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            value: ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3),
        }
    }

    /// Returns the raw 16-bit value
    #[inline]
    pub const fn raw_value(&self) -> u16 {
        self.value
    }

    // NOTE: Endpoints are expanded by shifting the field into the top of the byte.
    // The low bits stay zero; there is no top-bit replication (unlike the D3D11 functional spec),
    // which is what the video pipeline this decoder mirrors produces. Output must match it exactly.

    /// Extracts the expanded 8-bit red component (`field << 3`)
    #[inline]
    pub const fn red(&self) -> u8 {
        (((self.value >> 11) & 0x1F) << 3) as u8
    }

    /// Extracts the expanded 8-bit green component (`field << 2`)
    #[inline]
    pub const fn green(&self) -> u8 {
        (((self.value >> 5) & 0x3F) << 2) as u8
    }

    /// Extracts the expanded 8-bit blue component (`field << 3`)
    #[inline]
    pub const fn blue(&self) -> u8 {
        ((self.value & 0x1F) << 3) as u8
    }

    /// Compares two [`Color565`] values by their packed representation.
    ///
    /// This decides between the four colour and three colour + transparent palettes
    /// in a DXT1 block, the expanded channels play no part in it.
    #[inline]
    pub const fn greater_than(&self, other: &Self) -> bool {
        self.value > other.value
    }

    /// Converts this [`Color565`] to a [`Color8888`] with full opacity (alpha=255)
    ///
    /// # Examples
    ///
    /// ```
    /// use dxt_frame_decoder_common::color_565::Color565;
    ///
    /// let rgb565 = Color565::from_raw(0xF800);
    /// let rgba8888 = rgb565.to_color_8888();
    /// assert_eq!(rgba8888.r, 248);
    /// assert_eq!(rgba8888.g, 0);
    /// assert_eq!(rgba8888.b, 0);
    /// assert_eq!(rgba8888.a, 255);
    /// ```
    #[inline]
    pub const fn to_color_8888(&self) -> Color8888 {
        Color8888::new(self.red(), self.green(), self.blue(), 255)
    }
}
