//! Concrete scoring strategies.
//!
//! | Name | Module | Raw range |
//! |---|---|---|
//! | `sample-plugin` | [`hash`] | `[0, 100)` |
//! | `PodState` | [`density`] | `(-∞, 100]` |

pub mod density;
pub mod hash;

pub use density::DensityScorer;
pub use hash::HashScorer;

use crate::framework::PluginFactory;

/// Name → factory table used by [`Registry::from_config`].
///
/// [`Registry::from_config`]: crate::framework::Registry::from_config
pub const FACTORIES: &[(&str, PluginFactory)] = &[
    (hash::NAME, hash::factory),
    (density::NAME, density::factory),
];
