//! Named catalog of shape footprints shared by the board's pieces.

use block_slide_core::{ShapeFootprint, ShapeId};

use crate::BoardError;

#[derive(Clone, Debug)]
struct ShapeEntry {
    name: String,
    footprint: ShapeFootprint,
}

/// Registry that stores shape footprints and allocates their identifiers.
///
/// Identifiers are dense and follow registration order.
#[derive(Clone, Debug, Default)]
pub struct ShapeCatalog {
    entries: Vec<ShapeEntry>,
}

impl ShapeCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a footprint under a unique name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        footprint: ShapeFootprint,
    ) -> Result<ShapeId, BoardError> {
        let name = name.into();
        if self.find(&name).is_some() {
            return Err(BoardError::DuplicateShapeName { name });
        }

        let id = u32::try_from(self.entries.len())
            .map(ShapeId::new)
            .map_err(|_| BoardError::CatalogFull)?;
        self.entries.push(ShapeEntry { name, footprint });
        Ok(id)
    }

    /// Footprint registered under the identifier.
    #[must_use]
    pub fn footprint(&self, shape: ShapeId) -> Option<&ShapeFootprint> {
        self.entry(shape).map(|entry| &entry.footprint)
    }

    /// Name registered for the identifier.
    #[must_use]
    pub fn name(&self, shape: ShapeId) -> Option<&str> {
        self.entry(shape).map(|entry| entry.name.as_str())
    }

    /// Looks up a shape identifier by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<ShapeId> {
        self.entries
            .iter()
            .position(|entry| entry.name == name)
            .and_then(|index| u32::try_from(index).ok())
            .map(ShapeId::new)
    }

    /// Iterates every registered shape in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &str, &ShapeFootprint)> {
        self.entries.iter().enumerate().filter_map(|(index, entry)| {
            let id = u32::try_from(index).ok().map(ShapeId::new)?;
            Some((id, entry.name.as_str(), &entry.footprint))
        })
    }

    /// Number of registered shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no shape has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, shape: ShapeId) -> Option<&ShapeEntry> {
        usize::try_from(shape.get())
            .ok()
            .and_then(|index| self.entries.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use block_slide_core::CellOffset;

    #[test]
    fn identifiers_follow_registration_order() {
        let mut catalog = ShapeCatalog::new();
        let single = catalog
            .register("single", ShapeFootprint::single_cell())
            .expect("unique name");
        let bar = catalog
            .register(
                "bar",
                ShapeFootprint::new(vec![CellOffset::new(0, 0), CellOffset::new(1, 0)])
                    .expect("valid footprint"),
            )
            .expect("unique name");

        assert_eq!(single, ShapeId::new(0));
        assert_eq!(bar, ShapeId::new(1));
        assert_eq!(catalog.find("bar"), Some(bar));
        assert_eq!(catalog.name(single), Some("single"));
        assert_eq!(catalog.footprint(bar).map(ShapeFootprint::cell_count), Some(2));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut catalog = ShapeCatalog::new();
        let _ = catalog
            .register("single", ShapeFootprint::single_cell())
            .expect("unique name");

        let error = catalog
            .register("single", ShapeFootprint::single_cell())
            .expect_err("duplicate name");
        assert_eq!(
            error,
            BoardError::DuplicateShapeName {
                name: "single".to_owned()
            }
        );
    }

    #[test]
    fn unknown_identifiers_resolve_to_nothing() {
        let catalog = ShapeCatalog::new();
        assert!(catalog.is_empty());
        assert!(catalog.footprint(ShapeId::new(3)).is_none());
        assert!(catalog.name(ShapeId::new(3)).is_none());
    }
}
