//! Tags de section (fourcc) reconnus par le chargeur.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ensemble fermé des sections reconnues, 4 octets chacune.
///
/// L'ordre des variantes fixe l'index dans la table d'offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u32)]
pub enum ChunkTag {
    /// AtU8 : table des atomes (longueur u8 + octets UTF-8)
    AtU8 = u32::from_be_bytes(*b"AtU8"),
    /// Code : en-tête + flux de bytecode
    Code = u32::from_be_bytes(*b"Code"),
    /// ExpT : fonctions exportées
    ExpT = u32::from_be_bytes(*b"ExpT"),
    /// LocT : fonctions locales
    LocT = u32::from_be_bytes(*b"LocT"),
    /// ImpT : fonctions importées
    ImpT = u32::from_be_bytes(*b"ImpT"),
    /// LitU : table des littéraux non compressée
    LitU = u32::from_be_bytes(*b"LitU"),
    /// LitT : table des littéraux compressée (zlib)
    LitT = u32::from_be_bytes(*b"LitT"),
    /// StrT : pool de chaînes
    StrT = u32::from_be_bytes(*b"StrT"),
    /// FunT : table des lambdas
    FunT = u32::from_be_bytes(*b"FunT"),
}

impl ChunkTag {
    /// Nombre de tags reconnus (taille de la table d'offsets).
    pub const COUNT: usize = 9;

    /// Tous les tags, dans l'ordre de [`ChunkTag::index`].
    pub const ALL: [Self; Self::COUNT] = [
        Self::AtU8,
        Self::Code,
        Self::ExpT,
        Self::LocT,
        Self::ImpT,
        Self::LitU,
        Self::LitT,
        Self::StrT,
        Self::FunT,
    ];

    /// Sections sans lesquelles un module ne peut pas être chargé.
    pub const REQUIRED: [Self; 4] = [Self::Code, Self::ExpT, Self::ImpT, Self::AtU8];

    /// Position dans la table d'offsets.
    pub const fn index(self) -> usize {
        match self {
            Self::AtU8 => 0,
            Self::Code => 1,
            Self::ExpT => 2,
            Self::LocT => 3,
            Self::ImpT => 4,
            Self::LitU => 5,
            Self::LitT => 6,
            Self::StrT => 7,
            Self::FunT => 8,
        }
    }

    /// Renvoie le fourcc sous forme de 4 octets big-endian.
    pub const fn to_be_bytes(self) -> [u8; 4] { (self as u32).to_be_bytes() }

    /// Lit un tag depuis 4 octets big-endian (`None` si inconnu).
    pub const fn from_be_bytes(b: [u8; 4]) -> Option<Self> {
        match u32::from_be_bytes(b) {
            x if x == Self::AtU8 as u32 => Some(Self::AtU8),
            x if x == Self::Code as u32 => Some(Self::Code),
            x if x == Self::ExpT as u32 => Some(Self::ExpT),
            x if x == Self::LocT as u32 => Some(Self::LocT),
            x if x == Self::ImpT as u32 => Some(Self::ImpT),
            x if x == Self::LitU as u32 => Some(Self::LitU),
            x if x == Self::LitT as u32 => Some(Self::LitT),
            x if x == Self::StrT as u32 => Some(Self::StrT),
            x if x == Self::FunT as u32 => Some(Self::FunT),
            _ => None,
        }
    }
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.to_be_bytes();
        // fourcc toujours ASCII
        for c in b {
            write!(f, "{}", c as char)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_roundtrip() {
        for tag in ChunkTag::ALL {
            assert_eq!(ChunkTag::from_be_bytes(tag.to_be_bytes()), Some(tag));
        }
        assert_eq!(ChunkTag::from_be_bytes(*b"Attr"), None);
    }

    #[test]
    fn index_matches_all_order() {
        for (i, tag) in ChunkTag::ALL.iter().enumerate() {
            assert_eq!(tag.index(), i);
        }
    }

    #[test]
    fn display_is_fourcc() {
        assert_eq!(ChunkTag::ImpT.to_string(), "ImpT");
        assert_eq!(ChunkTag::AtU8.to_string(), "AtU8");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_variant_name() {
        let json = serde_json::to_string(&ChunkTag::LitT).unwrap();
        assert_eq!(json, "\"LitT\"");
    }
}
