//! Field descriptors: the indexing pipeline's view of a document field.

use crate::native::NativeType;

/// Read-only description of a data field about to be indexed.
///
/// Implemented by the indexing pipeline's own field representations; the
/// registry only ever reads through this trait.
pub trait IndexableField {
    /// Field name. May be empty for anonymous/computed fields.
    fn name(&self) -> &str;

    /// Declared storage/type identifier (distinct from the native type).
    fn type_key(&self) -> &str;

    /// Native runtime type of the field value, when known.
    fn native_type(&self) -> Option<&NativeType>;
}

/// Owned [`IndexableField`] implementation for callers that build field
/// descriptions by hand.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    type_key: String,
    native_type: Option<NativeType>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_key: type_key.into(),
            native_type: None,
        }
    }

    pub fn with_native_type(mut self, native_type: NativeType) -> Self {
        self.native_type = Some(native_type);
        self
    }
}

impl IndexableField for FieldDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_key(&self) -> &str {
        &self.type_key
    }

    fn native_type(&self) -> Option<&NativeType> {
        self.native_type.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_defaults() {
        let field = FieldDescriptor::new("title", "string");
        assert_eq!(field.name(), "title");
        assert_eq!(field.type_key(), "string");
        assert!(field.native_type().is_none());
    }

    #[test]
    fn test_descriptor_with_native_type() {
        let native = NativeType::of::<String>("system.string");
        let field = FieldDescriptor::new("title", "string").with_native_type(native.clone());
        assert_eq!(field.native_type(), Some(&native));
    }
}
