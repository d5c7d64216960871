//! Parsed representation of EIP-712 type references.
//!
//! A type reference like `OrderComponents[2][2]` is parsed once, during
//! validation, into a [`FieldType`] tree. The encoder dispatches on the
//! parsed tree instead of re-reading the string at every recursive call.
//! Array suffixes apply left-to-right: `Foo[2][3]` is an array of 3 arrays
//! of 2 `Foo`, so the rightmost suffix is the outermost dimension.

use crate::error::TypedDataError;
use std::fmt;

/// The elementary (non-struct) EIP-712 field types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementaryType {
	Address,
	Bool,
	/// Dynamic byte string; contributes the keccak-256 of its content.
	Bytes,
	/// Dynamic UTF-8 string; contributes the keccak-256 of its bytes.
	String,
	/// `bytesN` for N in 1..=32.
	FixedBytes(usize),
	/// `intN` for N in 8..=256, multiples of 8.
	Int(usize),
	/// `uintN` for N in 8..=256, multiples of 8.
	Uint(usize),
}

impl ElementaryType {
	/// Parses an elementary type name. Returns `None` for anything that is
	/// not one of the fixed elementary names, including bare `int`/`uint`
	/// (EIP-712 has no aliases) and out-of-range widths like `bytes33`.
	pub fn parse(name: &str) -> Option<Self> {
		match name {
			"address" => Some(Self::Address),
			"bool" => Some(Self::Bool),
			"bytes" => Some(Self::Bytes),
			"string" => Some(Self::String),
			_ => {
				if let Some(digits) = name.strip_prefix("bytes") {
					let n = parse_width(digits)?;
					(1..=32).contains(&n).then_some(Self::FixedBytes(n))
				} else if let Some(digits) = name.strip_prefix("uint") {
					let n = parse_width(digits)?;
					(n % 8 == 0 && (8..=256).contains(&n)).then_some(Self::Uint(n))
				} else if let Some(digits) = name.strip_prefix("int") {
					let n = parse_width(digits)?;
					(n % 8 == 0 && (8..=256).contains(&n)).then_some(Self::Int(n))
				} else {
					None
				}
			},
		}
	}
}

impl fmt::Display for ElementaryType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Address => f.write_str("address"),
			Self::Bool => f.write_str("bool"),
			Self::Bytes => f.write_str("bytes"),
			Self::String => f.write_str("string"),
			Self::FixedBytes(n) => write!(f, "bytes{}", n),
			Self::Int(n) => write!(f, "int{}", n),
			Self::Uint(n) => write!(f, "uint{}", n),
		}
	}
}

/// A fully parsed field type: elementary, struct reference, or array of a
/// nested field type with an optional fixed length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
	Elementary(ElementaryType),
	Struct(String),
	Array {
		elem: Box<FieldType>,
		/// `Some(n)` for `[n]`, `None` for `[]`.
		len: Option<usize>,
	},
}

impl FieldType {
	/// Parses a type reference string, validating bracket syntax and
	/// fixed-array size tokens. Size tokens must be positive integers.
	pub fn parse(type_ref: &str) -> Result<Self, TypedDataError> {
		Self::parse_part(type_ref, type_ref)
	}

	fn parse_part(part: &str, original: &str) -> Result<Self, TypedDataError> {
		let malformed = || TypedDataError::MalformedTypeRef(original.to_string());
		if let Some(stripped) = part.strip_suffix(']') {
			let open = stripped.rfind('[').ok_or_else(malformed)?;
			let token = &stripped[open + 1..];
			let len = if token.is_empty() {
				None
			} else {
				if !token.bytes().all(|b| b.is_ascii_digit()) {
					return Err(malformed());
				}
				let n: usize = token.parse().map_err(|_| malformed())?;
				if n == 0 {
					return Err(malformed());
				}
				Some(n)
			};
			let elem = Self::parse_part(&stripped[..open], original)?;
			Ok(Self::Array {
				elem: Box::new(elem),
				len,
			})
		} else {
			if part.is_empty() || part.contains('[') || part.contains(']') {
				return Err(malformed());
			}
			Ok(match ElementaryType::parse(part) {
				Some(elem) => Self::Elementary(elem),
				None => Self::Struct(part.to_string()),
			})
		}
	}

	/// The struct name this type ultimately refers to, seen through any
	/// number of array dimensions. `None` for elementary types.
	pub fn base_struct(&self) -> Option<&str> {
		match self {
			Self::Elementary(_) => None,
			Self::Struct(name) => Some(name),
			Self::Array { elem, .. } => elem.base_struct(),
		}
	}
}

impl fmt::Display for FieldType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Elementary(elem) => elem.fmt(f),
			Self::Struct(name) => f.write_str(name),
			Self::Array { elem, len } => match len {
				Some(n) => write!(f, "{}[{}]", elem, n),
				None => write!(f, "{}[]", elem),
			},
		}
	}
}

fn parse_width(digits: &str) -> Option<usize> {
	if digits.is_empty()
		|| !digits.bytes().all(|b| b.is_ascii_digit())
		|| (digits.len() > 1 && digits.starts_with('0'))
	{
		return None;
	}
	digits.parse().ok()
}
