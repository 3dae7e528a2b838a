use std::fmt;

/// PNG-payload icon types that can be stored in an ICNS file.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IconType {
    /// 16x16 32-bit icon.
    RGBA32_16x16,
    /// 16x16 32-bit icon at 2x "retina" density (so, 32 by 32 pixels).
    RGBA32_16x16_2x,
    /// 32x32 32-bit icon.
    RGBA32_32x32,
    /// 32x32 32-bit icon at 2x "retina" density (so, 64 by 64 pixels).
    RGBA32_32x32_2x,
    /// 64x64 32-bit icon.
    RGBA32_64x64,
    /// 128x128 32-bit icon.
    RGBA32_128x128,
    /// 128x128 32-bit icon at 2x "retina" density (so, 256 by 256 pixels).
    RGBA32_128x128_2x,
    /// 256x256 32-bit icon.
    RGBA32_256x256,
    /// 256x256 32-bit icon at 2x "retina" density (so, 512 by 512 pixels).
    RGBA32_256x256_2x,
    /// 512x512 32-bit icon.
    RGBA32_512x512,
    /// 512x512 32-bit icon at 2x "retina" density (so, 1024 by 1024 pixels).
    RGBA32_512x512_2x,
}

const ALL_ICON_TYPES: [IconType; 11] = [
    IconType::RGBA32_16x16,
    IconType::RGBA32_16x16_2x,
    IconType::RGBA32_32x32,
    IconType::RGBA32_32x32_2x,
    IconType::RGBA32_64x64,
    IconType::RGBA32_128x128,
    IconType::RGBA32_128x128_2x,
    IconType::RGBA32_256x256,
    IconType::RGBA32_256x256_2x,
    IconType::RGBA32_512x512,
    IconType::RGBA32_512x512_2x,
];

impl IconType {
    /// Get the icon type associated with the given OSType, if any.
    pub fn from_ostype(ostype: OSType) -> Option<IconType> {
        let OSType(raw_ostype) = ostype;
        match &raw_ostype {
            b"icp4" => Some(IconType::RGBA32_16x16),
            b"ic11" => Some(IconType::RGBA32_16x16_2x),
            b"icp5" => Some(IconType::RGBA32_32x32),
            b"ic12" => Some(IconType::RGBA32_32x32_2x),
            b"icp6" => Some(IconType::RGBA32_64x64),
            b"ic07" => Some(IconType::RGBA32_128x128),
            b"ic13" => Some(IconType::RGBA32_128x128_2x),
            b"ic08" => Some(IconType::RGBA32_256x256),
            b"ic14" => Some(IconType::RGBA32_256x256_2x),
            b"ic09" => Some(IconType::RGBA32_512x512),
            b"ic10" => Some(IconType::RGBA32_512x512_2x),
            _ => None,
        }
    }

    /// Get the OSType that represents this icon type.
    pub fn ostype(self) -> OSType {
        match self {
            IconType::RGBA32_16x16 => OSType(*b"icp4"),
            IconType::RGBA32_16x16_2x => OSType(*b"ic11"),
            IconType::RGBA32_32x32 => OSType(*b"icp5"),
            IconType::RGBA32_32x32_2x => OSType(*b"ic12"),
            IconType::RGBA32_64x64 => OSType(*b"icp6"),
            IconType::RGBA32_128x128 => OSType(*b"ic07"),
            IconType::RGBA32_128x128_2x => OSType(*b"ic13"),
            IconType::RGBA32_256x256 => OSType(*b"ic08"),
            IconType::RGBA32_256x256_2x => OSType(*b"ic14"),
            IconType::RGBA32_512x512 => OSType(*b"ic09"),
            IconType::RGBA32_512x512_2x => OSType(*b"ic10"),
        }
    }

    /// Finds the icon type with the given screen size and density.
    pub fn from_screen_size(screen_size: u32, density: u32) -> Option<IconType> {
        ALL_ICON_TYPES.iter().copied().find(|icon_type| {
            icon_type.screen_width() == screen_size
                && icon_type.pixel_density() == density
        })
    }

    /// Finds the icon type for an iconset file name such as
    /// `icon_32x32.png` or `icon_32x32@2x.png`.
    pub fn from_iconset_label(label: &str) -> Option<IconType> {
        let stem = label.strip_prefix("icon_")?.strip_suffix(".png")?;
        let (dimensions, density) = match stem.strip_suffix("@2x") {
            Some(dimensions) => (dimensions, 2),
            None => (stem, 1),
        };
        let (width, height) = dimensions.split_once('x')?;
        let width: u32 = width.parse().ok()?;
        let height: u32 = height.parse().ok()?;
        if width != height {
            return None;
        }
        IconType::from_screen_size(width, density)
    }

    /// Returns the pixel data width of this icon type.  Normally this is the
    /// same as the screen width, but for 2x "retina" density icons, this will
    /// be twice that value.
    ///
    /// # Examples
    /// ```
    /// use iconkit::IconType;
    /// assert_eq!(IconType::RGBA32_64x64.pixel_width(), 64);
    /// assert_eq!(IconType::RGBA32_256x256_2x.pixel_width(), 512);
    /// ```
    pub fn pixel_width(self) -> u32 {
        self.screen_width() * self.pixel_density()
    }

    /// Returns the pixel density for this icon type -- that is, 2 for 2x
    /// "retina" density icons, or 1 for other icon types.
    pub fn pixel_density(self) -> u32 {
        match self {
            IconType::RGBA32_16x16_2x
            | IconType::RGBA32_32x32_2x
            | IconType::RGBA32_128x128_2x
            | IconType::RGBA32_256x256_2x
            | IconType::RGBA32_512x512_2x => 2,
            _ => 1,
        }
    }

    /// Returns the screen width of this icon type (icons are square).
    pub fn screen_width(self) -> u32 {
        match self {
            IconType::RGBA32_16x16 | IconType::RGBA32_16x16_2x => 16,
            IconType::RGBA32_32x32 | IconType::RGBA32_32x32_2x => 32,
            IconType::RGBA32_64x64 => 64,
            IconType::RGBA32_128x128 | IconType::RGBA32_128x128_2x => 128,
            IconType::RGBA32_256x256 | IconType::RGBA32_256x256_2x => 256,
            IconType::RGBA32_512x512 | IconType::RGBA32_512x512_2x => 512,
        }
    }
}

/// A Macintosh OSType (also known as a ResType), used in ICNS files to
/// identify the type of each icon element.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct OSType(pub [u8; 4]);

impl fmt::Display for OSType {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        let &OSType(raw) = self;
        for &byte in &raw {
            write!(out, "{}", char::from(byte))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_type_ostype_round_trip() {
        for icon_type in &ALL_ICON_TYPES {
            assert_eq!(Some(*icon_type), IconType::from_ostype(icon_type.ostype()));
        }
        assert_eq!(IconType::from_ostype(OSType(*b"is32")), None);
    }

    #[test]
    fn iconset_labels() {
        assert_eq!(
            IconType::from_iconset_label("icon_16x16.png"),
            Some(IconType::RGBA32_16x16)
        );
        assert_eq!(
            IconType::from_iconset_label("icon_512x512@2x.png"),
            Some(IconType::RGBA32_512x512_2x)
        );
        assert_eq!(
            IconType::from_iconset_label("icon_64x64.png"),
            Some(IconType::RGBA32_64x64)
        );
        // No ICNS slot holds a 2x 64-point icon.
        assert_eq!(IconType::from_iconset_label("icon_64x64@2x.png"), None);
        assert_eq!(IconType::from_iconset_label("icon_32x16.png"), None);
        assert_eq!(IconType::from_iconset_label("logo_32x32.png"), None);
        assert_eq!(IconType::from_iconset_label("icon_32x32.jpg"), None);
    }

    #[test]
    fn ostype_display() {
        assert_eq!(OSType(*b"ic10").to_string(), "ic10");
        assert_eq!(IconType::RGBA32_16x16.ostype().to_string(), "icp4");
    }
}
