use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use super::element::IconElement;
use super::error::IconError;
use super::icontype::IconType;

/// The first four bytes of an ICNS file:
const ICNS_MAGIC_LITERAL: &[u8; 4] = b"icns";

/// The length of an icon family header, in bytes:
const ICON_FAMILY_HEADER_LENGTH: u32 = 8;

/// A set of icons stored in a single ICNS file.
pub struct IconFamily {
    /// The icon elements stored in the ICNS file.
    pub elements: Vec<IconElement>,
}

impl IconFamily {
    /// Creates a new, empty icon family.
    pub fn new() -> IconFamily {
        IconFamily { elements: Vec::new() }
    }

    /// Returns true if the icon family contains no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Adds an encoded PNG under the given icon type, replacing any element
    /// already stored for that type.  Returns an error if the PNG has the
    /// wrong dimensions for the type.
    pub fn add_png(&mut self, icon_type: IconType, data: Vec<u8>) -> Result<(), IconError> {
        let element = IconElement::from_png(icon_type, data)?;
        let ostype = element.ostype();
        self.elements.retain(|existing| existing.ostype() != ostype);
        self.elements.push(element);
        Ok(())
    }

    /// Returns the icon types present in the family, in file order.
    pub fn available_icons(&self) -> Vec<IconType> {
        self.elements.iter().filter_map(IconElement::icon_type).collect()
    }

    /// Determines whether the icon family contains an icon with the given
    /// type.
    pub fn has_icon_with_type(&self, icon_type: IconType) -> bool {
        let ostype = icon_type.ostype();
        self.elements.iter().any(|element| element.ostype() == ostype)
    }

    /// Reads an icon family from an ICNS file.
    pub fn read<R: Read>(mut reader: R) -> Result<IconFamily, IconError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != *ICNS_MAGIC_LITERAL {
            return Err(IconError::InvalidContainer(
                "not an icns file (wrong magic literal)".to_string(),
            ));
        }
        let file_length = reader.read_u32::<BigEndian>()?;
        let mut file_position: u32 = ICON_FAMILY_HEADER_LENGTH;
        let mut family = IconFamily::new();
        while file_position < file_length {
            let element = IconElement::read(reader.by_ref())?;
            file_position += element.total_length();
            family.elements.push(element);
        }
        Ok(family)
    }

    /// Writes the icon family to an ICNS file.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<(), IconError> {
        writer.write_all(ICNS_MAGIC_LITERAL)?;
        writer.write_u32::<BigEndian>(self.total_length())?;
        for element in &self.elements {
            element.write(writer.by_ref())?;
        }
        Ok(())
    }

    /// Returns the encoded length of the file, in bytes, including the
    /// length of the header.
    pub fn total_length(&self) -> u32 {
        let mut length = ICON_FAMILY_HEADER_LENGTH;
        for element in &self.elements {
            length += element.total_length();
        }
        length
    }
}

impl Default for IconFamily {
    fn default() -> Self {
        IconFamily::new()
    }
}
