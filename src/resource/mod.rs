//! Resources the declarative executor can converge

pub mod macos_default;

pub use macos_default::MacOSDefault;
