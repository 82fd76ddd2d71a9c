//! Program fields and lines
//!
//! A field is a letter plus an optional number (`G0`, `X12.5`, `M30`); a line
//! is an ordered list of fields with an optional trailing comment.

use serde::{Deserialize, Serialize};

/// Number of fractional digits kept when comparing and printing values.
pub const OUTPUT_PRECISION: i32 = 8;

/// Rounds a value to output precision.
pub fn round_value(value: f64) -> f64 {
    let scale = 10f64.powi(OUTPUT_PRECISION);
    let rounded = (value * scale).round() / scale;
    // Normalise negative zero so it never prints as "-0".
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Formats a value for output.
///
/// The value is rounded to output precision first. Integral results print
/// without a decimal point and trailing zeros are trimmed otherwise.
pub fn format_number(value: f64) -> String {
    let rounded = round_value(value);
    if rounded.fract() == 0.0 && rounded.abs() < 1e15 {
        return format!("{}", rounded as i64);
    }
    let text = format!("{:.*}", OUTPUT_PRECISION as usize, rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// A letter with an optional numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub letter: char,
    pub number: Option<f64>,
}

impl Field {
    pub fn new(letter: char, number: f64) -> Self {
        Self {
            letter,
            number: Some(number),
        }
    }

    /// A field that is only a letter.
    pub fn bare(letter: char) -> Self {
        Self {
            letter,
            number: None,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.number {
            Some(n) => write!(f, "{}{}", self.letter, format_number(n)),
            None => write!(f, "{}", self.letter),
        }
    }
}

/// An ordered list of fields plus an optional trailing comment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgramLine {
    pub fields: Vec<Field>,
    pub comment: Option<String>,
}

impl ProgramLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field and returns the line, for chained construction.
    pub fn with_field(mut self, letter: char, number: f64) -> Self {
        self.fields.push(Field::new(letter, number));
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// The number carried by the first field with `letter`.
    pub fn value(&self, letter: char) -> Option<f64> {
        self.fields
            .iter()
            .find(|f| f.letter == letter)
            .and_then(|f| f.number)
    }

    pub fn has_field(&self, letter: char) -> bool {
        self.fields.iter().any(|f| f.letter == letter)
    }
}

impl std::fmt::Display for ProgramLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for field in &self.fields {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", field)?;
            first = false;
        }
        if let Some(comment) = &self.comment {
            if !first {
                write!(f, " ")?;
            }
            // A line break inside a comment would start a new program line.
            let single_line = comment.replace(['\r', '\n'], " ");
            write!(f, "; {}", single_line)?;
        }
        Ok(())
    }
}
