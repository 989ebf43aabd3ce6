//! Data-file loaders for the production-line calculator.
//!
//! This crate reads a data directory into fully parsed records:
//! - Spire catalogs (`*.spire`, JSON)
//! - Part catalogs (`*.part`, and the older `*.core`, JSON)
//! - Bonus catalogs (`*.bonus`, JSON) with their script resources inlined
//! - The scope table (`sides.toml`, TOML)
//!
//! Loading either yields a complete [`ContentSet`] or an error; nothing is
//! installed here. The runtime registry decides how records reach sides.
//!
//! All loaders use calc-core types directly with serde for deserialization.

pub mod loaders;

pub use loaders::{
    BonusLoader, ContentFactory, ContentSet, LoadResult, PartLoader, RecordFile, RecordKind,
    Records, SideDefinition, SidesLoader, SpireLoader,
};
