//! Schema validation and resolved-schema construction.
//!
//! Validation parses every field's type reference once and checks that all
//! struct references resolve to declared types. The parsed schema is then
//! reused by the canonical type-string builder and the recursive encoder,
//! so no type reference is re-parsed during hashing.

use crate::error::TypedDataError;
use crate::field_type::FieldType;
use crate::types::{TypeField, TypedData};
use std::collections::HashMap;

/// A field declaration with its parsed type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
	pub name: String,
	/// The verbatim type reference, preserved for canonical type strings.
	pub type_ref: String,
	pub parsed: FieldType,
}

/// A validated schema: type name to parsed field declarations, including
/// the synthesized `EIP712Domain` entry.
pub type ResolvedTypes = HashMap<String, Vec<ResolvedField>>;

impl TypedData {
	/// Checks that the schema is well-formed: every type reference resolves
	/// to an elementary type or a declared struct after stripping array
	/// suffixes, array syntax is sound, and the primary type is declared or
	/// elementary. A type may reference itself through an array indirection;
	/// no further acyclicity is required.
	pub fn validate(&self) -> Result<(), TypedDataError> {
		self.resolved_types().map(|_| ())
	}

	/// Validates the schema and returns its parsed form.
	///
	/// The returned map always carries an `EIP712Domain` entry synthesized
	/// from the populated domain fields. The synthesized entry supersedes a
	/// declared one for domain hashing, since the domain's effective type is
	/// instance-dependent; a declared `EIP712Domain` is still validated like
	/// any other type.
	pub fn resolved_types(&self) -> Result<ResolvedTypes, TypedDataError> {
		let domain_fields = self.domain.type_fields();
		let mut declarations: HashMap<&str, &[TypeField]> = self
			.types
			.iter()
			.map(|(name, fields)| (name.as_str(), fields.as_slice()))
			.collect();
		declarations.insert("EIP712Domain", domain_fields.as_slice());

		let mut resolved = ResolvedTypes::with_capacity(declarations.len());
		for (name, fields) in &declarations {
			let mut resolved_fields = Vec::with_capacity(fields.len());
			for field in *fields {
				let parsed = FieldType::parse(&field.type_ref)?;
				if let Some(base) = parsed.base_struct() {
					if !declarations.contains_key(base) {
						return Err(TypedDataError::UnknownType(field.type_ref.clone()));
					}
				}
				resolved_fields.push(ResolvedField {
					name: field.name.clone(),
					type_ref: field.type_ref.clone(),
					parsed,
				});
			}
			resolved.insert(name.to_string(), resolved_fields);
		}

		// The synthesized entry shadows a declared EIP712Domain in the loop
		// above, so check the declared fields separately; a malformed
		// declaration must not pass silently.
		if let Some(declared_domain) = self.types.get("EIP712Domain") {
			for field in declared_domain {
				let parsed = FieldType::parse(&field.type_ref)?;
				if let Some(base) = parsed.base_struct() {
					if !declarations.contains_key(base) {
						return Err(TypedDataError::UnknownType(field.type_ref.clone()));
					}
				}
			}
		}

		let primary = FieldType::parse(&self.primary_type)?;
		if let Some(base) = primary.base_struct() {
			if !resolved.contains_key(base) {
				return Err(TypedDataError::UnknownType(self.primary_type.clone()));
			}
		}
		Ok(resolved)
	}
}
