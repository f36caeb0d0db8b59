//! Decoding the status payload.
//!
//! A response to the legacy ping starts with five bytes of framing that
//! carry nothing we are interested in. The rest is UTF-16 text in little
//! endian byte order. It consists of fields separated by NUL characters
//! that are read as alternating keys and values.
//!
//! Nothing in here can fail. Whatever the server sends is decoded into
//! some sequence of fields, and if that makes no sense the fields simply
//! aren’t there.

use std::char;
use std::collections::HashMap;

/// The number of framing bytes at the start of a response.
pub const FRAMING_LEN: usize = 5;

//------------ Payload -------------------------------------------------------

/// The decoded fields of a status response.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Payload {
    fields: Vec<String>,
}

impl Payload {
    /// Decodes a raw response.
    ///
    /// The framing bytes are skipped. A trailing odd byte is dropped and
    /// unpaired surrogates are replaced with U+FFFD.
    pub fn decode(data: &[u8]) -> Self {
        let data = data.get(FRAMING_LEN..).unwrap_or_default();
        let units = data
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
        let text: String = char::decode_utf16(units)
            .map(|ch| ch.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
        Payload {
            fields: text.split('\0').map(Into::into).collect(),
        }
    }

    /// Returns all decoded fields in order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns an iterator over the key/value pairs.
    ///
    /// A final field without a partner is skipped.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.fields
            .chunks_exact(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }

    /// Returns the value for the given key.
    ///
    /// If a key appears more than once, the last value wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs()
            .filter(|(k, _)| *k == key)
            .last()
            .map(|(_, v)| v)
    }

    /// Converts the payload into a map of keys to values.
    pub fn into_map(self) -> HashMap<String, String> {
        let mut res = HashMap::new();
        let mut fields = self.fields.into_iter();
        while let (Some(key), Some(value)) = (fields.next(), fields.next()) {
            res.insert(key, value);
        }
        res
    }
}

//------------ parse_int -----------------------------------------------------

/// Leniently parses a decimal integer.
///
/// Leading whitespace and an optional sign are accepted and parsing
/// stops at the first character that isn’t a digit, so `" 42 players"`
/// is 42. Returns `None` if there are no digits at all or the value
/// doesn’t fit.
pub fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let mut res: i64 = 0;
    for digit in digits[..end].bytes() {
        res = res.checked_mul(10)?;
        let digit = i64::from(digit - b'0');
        res = if negative {
            res.checked_sub(digit)?
        } else {
            res.checked_add(digit)?
        };
    }
    Some(res)
}

//============ Testing =======================================================
