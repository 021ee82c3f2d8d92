//! Erreurs de bas niveau communes.

use thiserror::Error;

/// Alias résultat commun au core.
pub type CoreResult<T> = core::result::Result<T, CoreError>;

/// Erreurs de lecture du conteneur.
///
/// Toutes signalent un conteneur mal formé : le lecteur ne lit jamais hors
/// du slice, il échoue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Fin de buffer inattendue.
    #[error("unexpected EOF: need {needed} bytes at {at}")]
    UnexpectedEof {
        /// Nombre d'octets demandés.
        needed: usize,
        /// Offset où l'erreur s'est produite.
        at: usize,
    },
    /// Lecture u32 sur un offset non multiple de 4.
    #[error("misaligned 32-bit read at {at}")]
    Misaligned {
        /// Offset fautif.
        at: usize,
    },
    /// Calcul d'offset débordant `usize`.
    #[error("offset overflow")]
    Overflow,
}
