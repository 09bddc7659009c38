//! Attribute schemas
//!
//! A schema is the ordered list of attributes a dataset is bound to. Feature
//! attributes are always numeric; the trailing class attribute is numeric for
//! regression and nominal for classification.

mod attribute;
mod builder;

pub use attribute::{Attribute, AttributeSchema, NominalDomain};
pub use builder::build_schema;
