use contracts::*;

/// One positional value carried by a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadSlot {
    /// Declared label; `None` when the position is unlabeled.
    pub name: Option<String>,
    /// Declared type.
    pub ty: String,
}

impl PayloadSlot {
    /// A slot with the given label and type. `_` and empty labels count as
    /// unlabeled.
    pub fn new(name: Option<String>, ty: impl Into<String>) -> Self {
        PayloadSlot {
            name: name.filter(|n| !n.is_empty() && n != "_"),
            ty: ty.into(),
        }
    }

    /// The identifier used for this slot at position `index`: its label, or
    /// `value<index>` when it has none.
    #[ensures(!ret.is_empty())]
    pub fn parameter_name(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("value{index}"),
        }
    }
}
