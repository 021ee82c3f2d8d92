//! Vue sur la table des exports (`ExpT`).

use core::num::NonZeroU32;

use ember_core::{ByteReader, ChunkTag};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::imports::{table_len, ENTRY_SIZE};
use crate::{AtomTable, LoadResult};

/// Référence numérique vers un point d'entrée du bytecode. `0` n'est jamais
/// un label valide.
pub type Label = NonZeroU32;

/// Entrée brute de la table des exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Export {
    /// Index (base 1) du nom de fonction dans la table des atomes.
    pub atom: u32,
    /// Arité.
    pub arity: u32,
    /// Label d'entrée.
    pub label: u32,
}

/// Vue en lecture seule : `count: u32` puis `count` entrées
/// `(atom, arity, label)`.
#[derive(Debug, Clone, Copy)]
pub struct ExportTable<'a> {
    payload: &'a [u8],
    count: usize,
}

impl<'a> ExportTable<'a> {
    /// Vérifie que les entrées déclarées tiennent dans le payload.
    pub fn new(payload: &'a [u8]) -> LoadResult<Self> {
        let count = table_len(&ByteReader::new(payload), ChunkTag::ExpT)?;
        Ok(Self { payload, count })
    }

    /// Nombre d'exports.
    pub const fn len(&self) -> usize { self.count }

    /// Vrai si rien n'est exporté.
    pub const fn is_empty(&self) -> bool { self.count == 0 }

    /// Entrée `index`, dans l'ordre de la table.
    pub fn get(&self, index: usize) -> Option<Export> {
        if index >= self.count {
            return None;
        }
        let r = ByteReader::new(self.payload);
        let base = 4 + index * ENTRY_SIZE;
        Some(Export {
            atom: r.u32_at(base).ok()?,
            arity: r.u32_at(base + 4).ok()?,
            label: r.u32_at(base + 8).ok()?,
        })
    }

    /// Entrées dans l'ordre de la table.
    pub fn iter(&self) -> impl Iterator<Item = Export> + '_ {
        (0..self.count).filter_map(|i| self.get(i))
    }

    /// Label d'entrée de `name/arity`.
    ///
    /// Première correspondance dans l'ordre de la table ; `None` si la
    /// fonction n'est pas exportée.
    pub fn search(&self, atoms: &AtomTable<'_>, name: &[u8], arity: u32) -> Option<Label> {
        self.iter()
            .filter(|e| e.arity == arity)
            .find(|e| atoms.resolve(e.atom) == Some(name))
            .and_then(|e| Label::new(e.label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::encode_atoms;
    use crate::imports::encode_entries;
    use crate::LoadError;
    use pretty_assertions::assert_eq;

    #[test]
    fn finds_name_and_arity() -> LoadResult<()> {
        let atoms_payload = encode_atoms(["m", "start", "stop"]);
        let atoms = AtomTable::new(&atoms_payload)?;
        let payload = encode_entries(&[[2, 0, 2], [2, 1, 4], [3, 0, 6]]);
        let exports = ExportTable::new(&payload)?;

        assert_eq!(exports.len(), 3);
        assert_eq!(exports.search(&atoms, b"start", 1), Label::new(4));
        assert_eq!(exports.search(&atoms, b"stop", 0), Label::new(6));
        assert_eq!(exports.search(&atoms, b"stop", 1), None);
        assert_eq!(exports.search(&atoms, b"missing", 0), None);
        Ok(())
    }

    #[test]
    fn first_match_wins() -> LoadResult<()> {
        let atoms_payload = encode_atoms(["m", "f"]);
        let atoms = AtomTable::new(&atoms_payload)?;
        let payload = encode_entries(&[[2, 0, 8], [2, 0, 10]]);
        let exports = ExportTable::new(&payload)?;
        assert_eq!(exports.search(&atoms, b"f", 0), Label::new(8));
        Ok(())
    }

    #[test]
    fn zero_label_is_never_reported() -> LoadResult<()> {
        let atoms_payload = encode_atoms(["m", "f"]);
        let atoms = AtomTable::new(&atoms_payload)?;
        let payload = encode_entries(&[[2, 0, 0]]);
        let exports = ExportTable::new(&payload)?;
        assert_eq!(exports.search(&atoms, b"f", 0), None);
        Ok(())
    }

    #[test]
    fn iter_decodes_records() -> LoadResult<()> {
        let payload = encode_entries(&[[2, 0, 8]]);
        let exports = ExportTable::new(&payload)?;
        assert_eq!(exports.iter().collect::<Vec<_>>(), vec![Export { atom: 2, arity: 0, label: 8 }]);
        assert_eq!(exports.get(1), None);
        Ok(())
    }

    #[test]
    fn truncated_table_is_malformed() {
        let mut payload = encode_entries(&[[2, 0, 8]]);
        payload.truncate(12);
        assert!(matches!(ExportTable::new(&payload), Err(LoadError::BadTable { tag: ChunkTag::ExpT, .. })));
    }
}
