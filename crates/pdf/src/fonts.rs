//! Font-aware decoding of the strings drawn by text operators.
//!
//! String operands hold character codes, not text. A font's `/ToUnicode` CMap maps those
//! codes to Unicode; composite (Type0) fonts such as the Identity-H fonts used for CJK
//! documents draw two-byte codes, simple fonts one byte per code. Strings drawn with a
//! font that has no map are read as raw bytes.

use pdf::font::{Font, ToUnicodeMap};
use pdf::object::{Resolve, Resources};
use pdf::primitive::PdfString;
use std::collections::HashMap;
use tracing::debug;

/// Maps the codes drawn with one font to Unicode.
#[derive(Debug, Default)]
pub struct FontDecoder {
    /// Composite fonts draw two-byte codes.
    two_byte: bool,
    to_unicode: Option<ToUnicodeMap>,
}

impl FontDecoder {
    pub fn new(two_byte: bool, to_unicode: Option<ToUnicodeMap>) -> Self {
        Self {
            two_byte,
            to_unicode,
        }
    }

    fn from_font(font: &Font, resolve: &impl Resolve) -> Self {
        let to_unicode = match font.to_unicode(resolve) {
            Some(Ok(map)) => Some(map),
            Some(Err(e)) => {
                debug!(error = %e, "Ignoring unreadable ToUnicode map");
                None
            }
            None => None,
        };
        Self::new(font.is_cid(), to_unicode)
    }

    pub fn decode(&self, text: &PdfString) -> String {
        let Some(map) = &self.to_unicode else {
            return text.to_string_lossy();
        };

        let bytes = text.as_bytes();
        let mut out = String::with_capacity(bytes.len());
        if self.two_byte {
            for code in bytes.chunks(2) {
                let code = match *code {
                    [hi, lo] => u16::from_be_bytes([hi, lo]),
                    [single] => u16::from(single),
                    _ => continue,
                };
                // Codes missing from the map have no text.
                if let Some(unicode) = map.get(code) {
                    out.push_str(unicode);
                }
            }
        } else {
            for &byte in bytes {
                match map.get(u16::from(byte)) {
                    Some(unicode) => out.push_str(unicode),
                    None => out.push(char::from(byte)),
                }
            }
        }
        out
    }
}

/// The decoders for the fonts named in one page's resources.
#[derive(Debug, Default)]
pub struct PageFonts {
    by_name: HashMap<String, FontDecoder>,
}

impl PageFonts {
    /// Loads every font in `resources`. A font that fails to load is left out, so its
    /// strings fall back to raw bytes.
    pub fn load(resources: &Resources, resolve: &impl Resolve) -> Self {
        let mut fonts = Self::default();
        for (name, font) in &resources.fonts {
            match font.load(resolve) {
                Ok(font) => fonts.insert(name.as_str(), FontDecoder::from_font(&font, resolve)),
                Err(e) => debug!(font = name.as_str(), error = %e, "Skipping unloadable font"),
            }
        }
        fonts
    }

    pub fn insert(&mut self, name: &str, decoder: FontDecoder) {
        self.by_name.insert(name.to_string(), decoder);
    }

    /// Decodes `text` drawn with the resource named `font`.
    pub fn decode(&self, font: Option<&str>, text: &PdfString) -> String {
        match font.and_then(|name| self.by_name.get(name)) {
            Some(decoder) => decoder.decode(text),
            None => text.to_string_lossy(),
        }
    }
}
