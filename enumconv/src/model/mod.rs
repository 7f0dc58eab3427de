//! In-memory model of the enum being converted, and its lowering into a
//! [`crate::decl::RecordDecl`].

mod payload;
mod property;
mod union;
mod variant;

pub use payload::PayloadSlot;
pub use property::Property;
pub use union::Union;
pub use variant::Variant;
