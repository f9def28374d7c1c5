//! domlog
//!
//! Declare UI elements and 2D positions in Rust, and get back a linear log of
//! instructions an external renderer (a browser page, a canvas host) replays
//! to build and update them.
//!
//! # Features
//!
//! - **Registry**: hands out element ids and owns every element it creates
//! - **Instruction log**: append-only `createElement(..);` / `updateElement(..);` lines
//! - **Vector2d**: small 2D vector type used for element positions
//! - `random` (default): enables [`Vector2d::random`]
//!
//! Updates are not diffed: [`Registry::update`] re-sends every element in full.
//! [`Registry::update_changed`] is the opt-in alternative.
//!
//! # Example
//!
//! ```
//! use domlog::{ElementOptions, Registry, RegistryConfig, Vector2d};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RegistryConfig {
//!     strict_options: true,
//!     ..Default::default()
//! };
//!
//! let mut registry = Registry::with_config(config);
//! let button = registry.create_element(
//!     ElementOptions::new()
//!         .tag("button")
//!         .inner_text("Go")
//!         .click(|el| println!("clicked {}", el.id())),
//! )?;
//! button.pos.add(Vector2d::new(10.0, 4.0));
//!
//! registry.update()?;
//! for line in registry.log() {
//!     println!("{}", line);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod element;
pub mod instruction;
pub mod registry;
pub mod vector;

pub use element::{
    noop_handler, Element, ElementKind, ElementOptions, ElementRecord, EventHandler, EventTable, OptionValue,
    CLICK_EVENT, UNASSIGNED_ID,
};
pub use instruction::Instruction;
pub use registry::Registry;
pub use vector::Vector2d;

/// Configuration for a [`Registry`]
///
/// Both switches are off by default, which keeps the lenient behavior: odd
/// option lists fall back to defaults and non-finite positions are written
/// as `null`.
///
/// # Examples
///
/// ```
/// let cfg = domlog::RegistryConfig::default();
/// assert!(!cfg.strict_options);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    /// Reject key/value count mismatches, duplicate keys and mistyped
    /// recognized options instead of falling back to defaults
    pub strict_options: bool,
    /// Refuse to serialize elements whose position has NaN or infinite components
    pub reject_non_finite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();
        assert!(!config.strict_options);
        assert!(!config.reject_non_finite);
    }

    #[test]
    fn test_registry_keeps_config() {
        let reg = Registry::with_config(RegistryConfig {
            reject_non_finite: true,
            ..Default::default()
        });
        assert!(reg.config().reject_non_finite);
        assert!(reg.is_empty());
        assert_eq!(reg.next_id(), 0);
    }
}
