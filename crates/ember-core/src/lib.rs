//! ember-core — primitives partagées du chargeur de modules
//!
//! Fournit :
//! - le conteneur IFF (`FORM_MAGIC`, `BEAM_MAGIC`, tailles d'en-têtes, `align4`)
//! - `ChunkTag` : ensemble fermé des sections reconnues (fourcc)
//! - IO mémoire big-endian alignée : `ByteReader`, `ByteWriter`, `FormBuilder`
//! - Erreurs `CoreError` + alias `CoreResult<T>`
//!
//! Features :
//! - `serde` : derive (dé)sérialisation sur `ChunkTag`

#![deny(missing_docs)]

/* ─────────────────────────── Modules publics ─────────────────────────── */

mod error;
mod reader;
mod tag;
mod writer;

pub use error::{CoreError, CoreResult};
pub use reader::ByteReader;
pub use tag::ChunkTag;
pub use writer::{ByteWriter, FormBuilder};

/* ─────────────────────────── Conteneur IFF — Constantes ─────────────────────────── */

/// Magic de la forme IFF : `b"FOR1"`.
pub const FORM_MAGIC: &[u8; 4] = b"FOR1";

/// Type de forme attendu après la taille : `b"BEAM"`.
pub const BEAM_MAGIC: &[u8; 4] = b"BEAM";

/// `FOR1` + taille u32 + `BEAM`. Plus petit conteneur acceptable.
pub const FORM_HEADER_SIZE: usize = 12;

/// Tag (4) + longueur u32 (4) devant chaque payload de section.
pub const CHUNK_HEADER_SIZE: usize = 8;

/// Arrondit `n` au multiple de 4 supérieur (`None` en cas de débordement).
pub const fn align4(n: usize) -> Option<usize> {
    match n.checked_add(3) {
        Some(v) => Some(v & !3),
        None => None,
    }
}

/* ─────────────────────────── Prélude ─────────────────────────── */

/// Prélude pratique pour importer les types/funcs clés du crate.
pub mod prelude {
    /// Réexports utiles pour une importation rapide.
    pub use super::{
        align4, ByteReader, ByteWriter, ChunkTag, CoreError, CoreResult, FormBuilder,
        BEAM_MAGIC, CHUNK_HEADER_SIZE, FORM_HEADER_SIZE, FORM_MAGIC,
    };
}

/* ─────────────────────────── Tests ─────────────────────────── */
