//! Canonical EIP-712 type strings and type hashes.
//!
//! The canonical string of a type is its own signature followed by the
//! signatures of every distinct struct type it transitively references, in
//! ascending lexicographic order, each dependency exactly once. The type
//! hash is the keccak-256 of that string. Both are pure functions of the
//! schema and never consult message values.

use crate::error::TypedDataError;
use crate::validate::ResolvedTypes;
use alloy_primitives::{keccak256, B256};
use std::collections::BTreeSet;

/// Builds the canonical type string for `name`, e.g.
/// `Mail(Person from,Person to,string contents)Person(string name,address wallet)`.
///
/// Array suffixes are preserved verbatim in field types. The dependency
/// closure is collected with an explicit worklist over a sorted visited
/// set, which keeps both termination and ordering auditable.
pub fn encode_type(name: &str, types: &ResolvedTypes) -> Result<String, TypedDataError> {
	let mut deps: BTreeSet<&str> = BTreeSet::new();
	let mut worklist = vec![name];
	while let Some(current) = worklist.pop() {
		let fields = types
			.get(current)
			.ok_or_else(|| TypedDataError::UnknownType(current.to_string()))?;
		for field in fields {
			if let Some(base) = field.parsed.base_struct() {
				if base != name && deps.insert(base) {
					worklist.push(base);
				}
			}
		}
	}

	let mut out = single_type(name, types)?;
	for dep in deps {
		out.push_str(&single_type(dep, types)?);
	}
	Ok(out)
}

/// The keccak-256 type hash of the canonical string for `name`.
pub fn type_hash(name: &str, types: &ResolvedTypes) -> Result<B256, TypedDataError> {
	Ok(keccak256(encode_type(name, types)?.as_bytes()))
}

/// One type's own signature: `Name(type1 name1,type2 name2,...)`.
fn single_type(name: &str, types: &ResolvedTypes) -> Result<String, TypedDataError> {
	let fields = types
		.get(name)
		.ok_or_else(|| TypedDataError::UnknownType(name.to_string()))?;
	let mut out = String::with_capacity(name.len() + 2 + 16 * fields.len());
	out.push_str(name);
	out.push('(');
	for (i, field) in fields.iter().enumerate() {
		if i > 0 {
			out.push(',');
		}
		out.push_str(&field.type_ref);
		out.push(' ');
		out.push_str(&field.name);
	}
	out.push(')');
	Ok(out)
}
