//! Lazy-singleton feature registry with a one-shot freeze barrier.
//!
//! The collection has two states: **Open**, where processes may register
//! their needs, and **Finished**, where every feature is frozen and
//! read-only. The transition is one-way and driven centrally by the
//! orchestrator so that no process has to know whether it runs first or
//! last.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

use simkit_core::types::time::DayCountConvention;

use crate::error::EngineError;

/// Context handed to every feature when the collection freezes.
///
/// Carries the externally supplied conventions features need to derive
/// their read-only state.
#[derive(Debug, Clone, Copy)]
pub struct FreezeContext {
    /// Day count convention for converting dates to year fractions.
    pub day_count: DayCountConvention,
}

/// A shared simulation capability held as a singleton by the
/// [`FeatureCollection`].
///
/// Implementors accumulate declarations pre-freeze and derive their
/// read-only state in [`freeze`](Self::freeze). After freezing, every
/// mutating entry point must fail with `EngineError::FeatureFrozen`.
pub trait Feature: Any + Send {
    /// Derives the feature's frozen state. Called exactly once by the
    /// collection's freeze barrier.
    fn freeze(&mut self, ctx: &FreezeContext) -> Result<(), EngineError>;

    /// Upcast for registry downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for registry downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Registry mapping each capability type to its singleton instance.
///
/// `get_mut::<F>()` lazily creates the singleton on first request, so the
/// registration order across independently-written processes does not
/// matter: whichever process asks first creates the instance the rest
/// share.
///
/// # Examples
///
/// ```
/// use simkit_engine::features::{FeatureCollection, TimeStepsFeature};
/// use simkit_core::types::time::{Date, DayCountConvention};
///
/// let mut features = FeatureCollection::new(DayCountConvention::Act365);
///
/// let anchor = Date::from_ymd(2026, 1, 1).unwrap();
/// features
///     .get_mut::<TimeStepsFeature>()
///     .unwrap()
///     .add_date(anchor)
///     .unwrap();
///
/// features.finish_setup().unwrap();
/// assert!(features.is_finished());
///
/// // Read-only access works after the freeze; mutation does not.
/// let grid = features.get::<TimeStepsFeature>().unwrap();
/// assert_eq!(grid.times().unwrap()[0], 0.0);
/// assert!(features.get_mut::<TimeStepsFeature>().is_err());
/// ```
pub struct FeatureCollection {
    day_count: DayCountConvention,
    features: HashMap<TypeId, Box<dyn Feature>>,
    finished: bool,
}

impl FeatureCollection {
    /// Creates an open collection using the given day count convention.
    pub fn new(day_count: DayCountConvention) -> Self {
        Self {
            day_count,
            features: HashMap::new(),
            finished: false,
        }
    }

    /// Whether the collection has been frozen.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The day count convention features freeze with.
    #[inline]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Returns the mutable singleton for capability `F`, creating and
    /// registering a default instance on first request.
    ///
    /// # Errors
    ///
    /// `EngineError::FeatureFrozen` once the collection is finished; the
    /// mutation window is over.
    pub fn get_mut<F: Feature + Default>(&mut self) -> Result<&mut F, EngineError> {
        if self.finished {
            return Err(EngineError::FeatureFrozen {
                feature: short_type_name::<F>(),
            });
        }
        let entry = self
            .features
            .entry(TypeId::of::<F>())
            .or_insert_with(|| Box::new(F::default()));
        // Entries are keyed by TypeId, so the downcast cannot fail.
        Ok(entry
            .as_any_mut()
            .downcast_mut::<F>()
            .expect("feature registry keyed by TypeId"))
    }

    /// Returns the singleton for capability `F` read-only.
    ///
    /// Valid in both states; the instance is the same one `get_mut`
    /// created.
    ///
    /// # Errors
    ///
    /// `EngineError::UnknownFeature` if no process ever registered `F`.
    pub fn get<F: Feature>(&self) -> Result<&F, EngineError> {
        self.features
            .get(&TypeId::of::<F>())
            .and_then(|f| f.as_any().downcast_ref::<F>())
            .ok_or(EngineError::UnknownFeature {
                feature: short_type_name::<F>(),
            })
    }

    /// Freezes every registered feature and closes the collection.
    ///
    /// One-way and idempotent: the first call runs each feature's freeze,
    /// repeat calls are no-ops. The orchestrator calls this exactly once
    /// after every process has registered; processes must never call it
    /// themselves.
    pub fn finish_setup(&mut self) -> Result<(), EngineError> {
        if self.finished {
            return Ok(());
        }
        let ctx = FreezeContext {
            day_count: self.day_count,
        };
        for feature in self.features.values_mut() {
            feature.freeze(&ctx)?;
        }
        self.finished = true;
        Ok(())
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
