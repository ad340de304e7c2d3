//! Mapping from logical dimension names to dense factor indices.
//!
//! Each process declares the underlying it simulates by name. The first
//! declaration of a name allocates the next factor index; repeats return
//! the existing one, so two processes modelling the same named underlying
//! deliberately share a factor slot while distinct names never collide.
//! The dense 0..N index space is what makes concurrent evolution safe
//! without locking.

use std::any::Any;
use std::collections::HashMap;

use crate::error::EngineError;
use crate::features::collection::{Feature, FreezeContext};

/// Dense, collision-free name-to-factor-index mapping.
///
/// # Examples
///
/// ```
/// use simkit_engine::features::PathMappingFeature;
///
/// let mut mapping = PathMappingFeature::default();
/// assert_eq!(mapping.add_dimension("EQ.ACME").unwrap(), 0);
/// assert_eq!(mapping.add_dimension("FX.EURUSD").unwrap(), 1);
/// // Repeat declarations share the slot.
/// assert_eq!(mapping.add_dimension("EQ.ACME").unwrap(), 0);
/// assert_eq!(mapping.len(), 2);
/// ```
#[derive(Default)]
pub struct PathMappingFeature {
    names: Vec<String>,
    indices: HashMap<String, usize>,
    frozen: bool,
}

impl PathMappingFeature {
    /// Declares a dimension, returning its factor index.
    ///
    /// Strictly increasing for new names, stable for repeats.
    ///
    /// # Errors
    ///
    /// `EngineError::FeatureFrozen` after the freeze.
    pub fn add_dimension(&mut self, name: &str) -> Result<usize, EngineError> {
        if self.frozen {
            return Err(EngineError::FeatureFrozen {
                feature: "PathMappingFeature",
            });
        }
        if let Some(&index) = self.indices.get(name) {
            return Ok(index);
        }
        let index = self.names.len();
        self.names.push(name.to_string());
        self.indices.insert(name.to_string(), index);
        Ok(index)
    }

    /// The factor index of a declared dimension.
    ///
    /// # Errors
    ///
    /// `EngineError::UnknownDimension` for a name never declared.
    pub fn dimension_index(&self, name: &str) -> Result<usize, EngineError> {
        self.indices
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::UnknownDimension {
                name: name.to_string(),
            })
    }

    /// Number of distinct dimensions declared.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no dimensions have been declared.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Dimension names in factor-index order.
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether the mapping has been frozen.
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

impl Feature for PathMappingFeature {
    fn freeze(&mut self, _ctx: &FreezeContext) -> Result<(), EngineError> {
        self.frozen = true;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
