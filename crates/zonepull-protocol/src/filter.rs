//! Tree-processing hooks attached to envelopes.

use crate::error::ProtocolResult;
use crate::xml::Element;

/// A hook invoked against an envelope's element tree.
///
/// Request filters run after the wire text is parsed and before field
/// extraction; reply filters run after the tree is built and before it
/// is serialized. Hooks run in registration order and may rewrite the
/// tree in place.
pub trait TreeFilter {
    /// Processes the tree.
    fn apply(&self, tree: &mut Element) -> ProtocolResult<()>;
}

impl<F> TreeFilter for F
where
    F: Fn(&mut Element) -> ProtocolResult<()>,
{
    fn apply(&self, tree: &mut Element) -> ProtocolResult<()> {
        self(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_filters() {
        let filter = |tree: &mut Element| -> ProtocolResult<()> {
            tree.name = "renamed".to_owned();
            Ok(())
        };
        let mut tree = Element::new("original");
        filter.apply(&mut tree).unwrap();
        assert_eq!(tree.name, "renamed");
    }
}
