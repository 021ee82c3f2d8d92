//! Erreurs de chargement.

use ember_core::{ChunkTag, CoreError};
use thiserror::Error;

/// Résultat du chargeur.
pub type LoadResult<T> = core::result::Result<T, LoadError>;

/// Conteneur mal formé.
///
/// Chaque variante est fatale pour le chargement : aucun module partiel
/// n'est jamais renvoyé.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Plus court que l'en-tête `FOR1 <size> BEAM`.
    #[error("container too short: {len} bytes")]
    TooShort {
        /// Taille reçue.
        len: usize,
    },

    /// `FOR1` ou `BEAM` absent.
    #[error("invalid form magic")]
    BadMagic,

    /// La taille de forme déclarée dépasse le buffer.
    #[error("form declares {declared} bytes but container holds {len}")]
    Truncated {
        /// Fin de forme déclarée (en-tête compris).
        declared: usize,
        /// Taille du buffer.
        len: usize,
    },

    /// Une section déclare une longueur qui sort de la forme.
    #[error("chunk {tag} at {at} declares {len} bytes past the end of the form")]
    ChunkOverrun {
        /// Fourcc lu (lossy).
        tag: String,
        /// Offset de l'en-tête de section.
        at: usize,
        /// Longueur déclarée.
        len: usize,
    },

    /// Octets résiduels trop courts pour un en-tête de section.
    #[error("{len} trailing bytes at {at}")]
    TrailingBytes {
        /// Offset du résidu.
        at: usize,
        /// Taille du résidu.
        len: usize,
    },

    /// Section obligatoire absente.
    #[error("missing required chunk {0}")]
    MissingChunk(ChunkTag),

    /// Index d'atome hors de la table.
    #[error("atom index {index} out of range")]
    AtomOutOfRange {
        /// Index fautif (base 1).
        index: u32,
    },

    /// Table (imports/exports/atomes/littéraux) incohérente.
    #[error("malformed {tag} table: {reason}")]
    BadTable {
        /// Section concernée.
        tag: ChunkTag,
        /// Diagnostic court.
        reason: &'static str,
    },

    /// En-tête de la section Code incohérent.
    #[error("malformed code header: {0}")]
    BadCodeHeader(&'static str),

    /// Lecture bas niveau (EOF, alignement, débordement).
    #[error(transparent)]
    Core(#[from] CoreError),
}
