use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use super::error::IconError;
use super::icontype::{IconType, OSType};
use super::pngio::png_dimensions;

/// The length of an icon element header, in bytes:
const ICON_ELEMENT_HEADER_LENGTH: u32 = 8;

/// One entry in an ICNS file: an OSType tag and its payload.
pub struct IconElement {
    ostype: OSType,
    data: Vec<u8>,
}

impl IconElement {
    /// Creates an icon element with the given OSType and data payload.
    pub fn new(ostype: OSType, data: Vec<u8>) -> IconElement {
        IconElement { ostype, data }
    }

    /// Wraps an encoded PNG as an element of the given icon type.  Returns
    /// an error if the PNG dimensions do not match the type.
    pub fn from_png(icon_type: IconType, data: Vec<u8>) -> Result<IconElement, IconError> {
        let (width, height) = png_dimensions(&data)?;
        let expected = icon_type.pixel_width();
        if width != expected || height != expected {
            return Err(IconError::InvalidContainer(format!(
                "PNG for '{}' has wrong dimensions ({}x{} instead of {}x{})",
                icon_type.ostype(),
                width,
                height,
                expected,
                expected
            )));
        }
        Ok(IconElement::new(icon_type.ostype(), data))
    }

    /// Returns the OSType for this element (e.g. `ic08`).
    pub fn ostype(&self) -> OSType {
        self.ostype
    }

    /// Returns the type of icon encoded by this element, or `None` if the
    /// OSType is not one this crate writes.
    pub fn icon_type(&self) -> Option<IconType> {
        IconType::from_ostype(self.ostype)
    }

    /// Returns the encoded data for this element.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the encoded length of the element, in bytes, including the
    /// length of the header.
    pub fn total_length(&self) -> u32 {
        ICON_ELEMENT_HEADER_LENGTH + (self.data.len() as u32)
    }

    /// Reads an icon element from within an ICNS file.
    pub fn read<R: Read>(mut reader: R) -> Result<IconElement, IconError> {
        let mut raw_ostype = [0u8; 4];
        reader.read_exact(&mut raw_ostype)?;
        let element_length = reader.read_u32::<BigEndian>()?;
        if element_length < ICON_ELEMENT_HEADER_LENGTH {
            return Err(IconError::InvalidContainer(
                "invalid element length".to_string(),
            ));
        }
        let data_length = element_length - ICON_ELEMENT_HEADER_LENGTH;
        let mut data = vec![0u8; data_length as usize];
        reader.read_exact(&mut data)?;
        Ok(IconElement::new(OSType(raw_ostype), data))
    }

    /// Writes the icon element to within an ICNS file.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<(), IconError> {
        let OSType(ref raw_ostype) = self.ostype;
        writer.write_all(raw_ostype)?;
        writer.write_u32::<BigEndian>(self.total_length())?;
        writer.write_all(&self.data)?;
        Ok(())
    }
}
