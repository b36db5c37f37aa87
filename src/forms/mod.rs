//! Form definitions: the static configuration that parameterises the
//! prediction pipeline. One `FormDefinition` per side-menu entry.

pub mod catalog;
pub mod types;

pub use catalog::FormCatalog;
pub use types::{
    Choice, FieldDomain, FieldSpec, FieldWarningStyle, FormDefinition, FormId, ResultRule,
};
