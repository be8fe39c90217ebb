//! Discriminator - closed set of backend kinds

use std::fmt;
use std::hash::Hash;

/// Value selecting which strategy handles a configuration
///
/// The set of values is closed and known at build time through [`Discriminator::ALL`].
pub trait Discriminator:
    Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Every value of the set
    const ALL: &'static [Self];
}
