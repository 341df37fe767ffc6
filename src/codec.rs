//! Postal record codec.
//!
//! Maps the ordered text fields of one input line onto the fixed postal
//! record layout (code, place, subdivision, county, latitude, longitude) and
//! moves decoded records in and out of a [`FieldBuffer`].
//!
//! Decoding never fails. Over-long text is cut to the field's maximum and
//! unparseable coordinates become `0.0`; both rules live in [`ParsePolicy`].

use crate::constants::{
    CODE_LENGTH, COORDINATE_LENGTH, COORDINATE_PRECISION, COUNTY_LENGTH, PLACE_LENGTH,
    RECORD_FIELD_COUNT, RECORD_FIELD_SIZES, SUBDIVISION_LENGTH,
};
use crate::error::FieldBufferError;
use crate::field_buffer::{FieldBuffer, FieldSchema, truncate_to_boundary};
use crate::models::DecodedRecord;
use arrayvec::ArrayString;

/// Truncate-don't-reject parsing rules for fixed-width records.
///
/// Field lengths are measured in bytes, matching the field buffer layout;
/// a cut never lands inside a multi-byte character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParsePolicy;

impl ParsePolicy {
    /// Value used for missing or malformed coordinates
    pub const COORDINATE_FALLBACK: f64 = 0.0;

    /// Keep at most `max` bytes of `text`
    pub fn truncate<'a>(&self, text: &'a str, max: usize) -> &'a str {
        truncate_to_boundary(text, max)
    }

    /// Truncate `text` into a fixed-capacity string of `N` bytes
    pub fn bounded<const N: usize>(&self, text: &str) -> ArrayString<N> {
        let mut bounded = ArrayString::new();
        bounded.push_str(self.truncate(text, N));
        bounded
    }

    /// Parse the leading numeric prefix of a coordinate text.
    ///
    /// The text is first cut to the coordinate field width. Leading
    /// whitespace, a sign, a fraction and an exponent are accepted; anything
    /// after the prefix is ignored. No prefix yields
    /// [`Self::COORDINATE_FALLBACK`].
    pub fn parse_coordinate(&self, text: &str) -> f64 {
        let text = self.truncate(text, COORDINATE_LENGTH);
        numeric_prefix(text)
            .parse::<f64>()
            .unwrap_or(Self::COORDINATE_FALLBACK)
    }
}

/// Longest prefix of `text` that reads as a decimal number
fn numeric_prefix(text: &str) -> &str {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |mut pos: usize| {
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        pos
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer_end = digits_from(end);
    let mut digit_count = integer_end - end;
    end = integer_end;

    if bytes.get(end) == Some(&b'.') {
        let fraction_end = digits_from(end + 1);
        let fraction_digits = fraction_end - (end + 1);
        if digit_count + fraction_digits > 0 {
            digit_count += fraction_digits;
            end = fraction_end;
        }
    }

    if digit_count == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_end = digits_from(exponent);
        if exponent_end > exponent {
            end = exponent_end;
        }
    }

    &text[..end]
}

/// Format a coordinate the way every report and export writes it
pub fn format_coordinate(value: f64) -> String {
    format!("{:.*}", COORDINATE_PRECISION, value)
}

/// Format a coordinate into at most `width` bytes.
///
/// Uses [`format_coordinate`] when it fits, otherwise scientific notation
/// with as many of the four decimals as fit, so a fixed-width cell never
/// cuts digits off a number. Needs `width` of at least 7 for every finite
/// value.
pub fn fit_coordinate(value: f64, width: usize) -> String {
    let fixed = format_coordinate(value);
    if fixed.len() <= width {
        return fixed;
    }
    (0..=COORDINATE_PRECISION)
        .rev()
        .map(|precision| format!("{:.*e}", precision, value))
        .find(|text| text.len() <= width)
        .unwrap_or(fixed)
}

/// Positional codec between raw text fields, decoded records and field buffers
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordCodec {
    policy: ParsePolicy,
}

impl RecordCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn policy(&self) -> &ParsePolicy {
        &self.policy
    }

    /// Field schema of a packed postal record
    pub fn schema() -> Result<FieldSchema, FieldBufferError> {
        FieldSchema::new(RECORD_FIELD_SIZES.to_vec())
    }

    /// Allocate a buffer sized for one packed postal record
    pub fn init_buffer() -> Result<FieldBuffer, FieldBufferError> {
        Ok(FieldBuffer::new(Self::schema()?))
    }

    /// Map positional text fields onto a record.
    ///
    /// Position 0 is the code, 1 the place, 2 the subdivision, 3 the county,
    /// 4 the latitude and 5 the longitude. Extra positions are ignored and
    /// missing ones read as empty text.
    pub fn decode<S: AsRef<str>>(&self, fields: &[S]) -> DecodedRecord {
        let field = |index: usize| fields.get(index).map(|f| f.as_ref()).unwrap_or("");

        DecodedRecord {
            code: self.policy.bounded::<CODE_LENGTH>(field(0)),
            place: self.policy.bounded::<PLACE_LENGTH>(field(1)),
            subdivision: self.policy.bounded::<SUBDIVISION_LENGTH>(field(2)),
            county: self.policy.bounded::<COUNTY_LENGTH>(field(3)),
            latitude: self.policy.parse_coordinate(field(4)),
            longitude: self.policy.parse_coordinate(field(5)),
        }
    }

    /// Clear `buffer` and pack `record` into it.
    ///
    /// Coordinates are written with four decimals, switching to scientific
    /// notation when that would not fit the 10-byte field.
    pub fn pack(
        &self,
        record: &DecodedRecord,
        buffer: &mut FieldBuffer,
    ) -> Result<(), FieldBufferError> {
        buffer.clear();
        buffer.pack(&record.code)?;
        buffer.pack(&record.place)?;
        buffer.pack(&record.subdivision)?;
        buffer.pack(&record.county)?;
        buffer.pack(&fit_coordinate(record.latitude, COORDINATE_LENGTH))?;
        buffer.pack(&fit_coordinate(record.longitude, COORDINATE_LENGTH))?;
        Ok(())
    }

    /// Read a packed record back, dropping pad spaces
    pub fn unpack(&self, buffer: &mut FieldBuffer) -> Result<DecodedRecord, FieldBufferError> {
        let mut fields = Vec::with_capacity(RECORD_FIELD_COUNT);
        for _ in 0..RECORD_FIELD_COUNT {
            fields.push(buffer.unpack()?.trim_end().to_string());
        }
        Ok(self.decode(&fields))
    }
}
