//! ember-loader — chargement des modules de bytecode
//!
//! Un module arrive sous forme de conteneur IFF (`FOR1 … BEAM`) :
//! ```text
//! Header: "FOR1" + size u32 BE + "BEAM"
//! [Chunk*]
//!   chunk = TAG[4] + len u32 BE + payload (paddé à 4)
//! ```
//!
//! Étapes :
//! - [`scan`] : répertoire de sections → [`OffsetTable`]
//! - [`resolve_imports`] : `ImpT` → handlers natifs via un [`BifRegistry`]
//! - [`ExportTable::search`] : `name/arity` → [`Label`]
//! - [`LabelTable`] : rempli par la passe de validation externe
//! - [`literals::inflate`] (feature `zlib`) : `LitT` → table des littéraux
//!
//! [`Module::new`] enchaîne le tout.

#![deny(missing_docs)]

mod atoms;
mod code;
mod error;
mod exports;
mod imports;
mod labels;
pub mod literals;
mod module;
mod registry;
mod scan;

pub use atoms::{encode_atoms, AtomIter, AtomTable};
pub use code::CodeHeader;
pub use error::{LoadError, LoadResult};
pub use exports::{Export, ExportTable, Label};
pub use imports::{encode_entries, resolve_imports, Import, ImportTable};
pub use labels::LabelTable;
pub use literals::{LiteralError, LiteralTable};
pub use module::Module;
pub use registry::{BifRegistry, NativeRegistry};
pub use scan::{scan, ChunkSpan, OffsetTable};

/// Prélude pratique pour importer d'un coup.
pub mod prelude {
    pub use crate::{
        BifRegistry, ChunkSpan, Label, LabelTable, LoadError, LoadResult, Module, NativeRegistry,
        OffsetTable,
    };
    pub use ember_core::ChunkTag;
}
