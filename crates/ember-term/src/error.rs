//! Erreurs d'interop.

use thiserror::Error;

/// Résultat des opérations d'interop.
pub type InteropResult<T> = core::result::Result<T, InteropError>;

/// Échecs locaux et récupérables : le terme fourni n'a pas la forme attendue.
///
/// C'est à l'appelant (une native) de décider comment les remonter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InteropError {
    /// La liste se termine par autre chose que `[]`.
    #[error("not a proper list")]
    NotAProperList,
    /// Forme de terme non supportée par l'opération.
    #[error("unsupported term shape")]
    UnsupportedTermShape,
    /// Élément de liste qui n'est pas un entier dans `0..=255`.
    #[error("list element is not a byte")]
    NotAByte,
    /// Octets extraits non valides en UTF-8.
    #[error("invalid utf-8")]
    InvalidUtf8,
}
