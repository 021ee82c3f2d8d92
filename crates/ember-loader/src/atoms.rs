//! Vue sur la table des atomes (`AtU8`).

use ember_core::{ByteReader, ChunkTag};

use crate::{LoadError, LoadResult};

/// Table des atomes d'un module : `count: u32` puis `count` fois
/// `len: u8` + `len` octets.
///
/// Les index sont en base 1 ; l'atome 1 est le nom du module.
#[derive(Debug, Clone)]
pub struct AtomTable<'a> {
    payload: &'a [u8],
    count: u32,
    // offset de l'octet de longueur de chaque atome
    starts: Box<[usize]>,
}

impl<'a> AtomTable<'a> {
    /// Valide que chaque atome déclaré tient dans le payload.
    pub fn new(payload: &'a [u8]) -> LoadResult<Self> {
        let r = ByteReader::new(payload);
        let raw = r.u32_at(0)?;
        // OTP 28 encode un compte négatif pour les longueurs compactes
        if i32::from_be_bytes(raw.to_be_bytes()) < 0 {
            return Err(LoadError::BadTable { tag: ChunkTag::AtU8, reason: "compact atom encoding" });
        }

        let mut starts = Vec::new();
        let mut off = 4usize;
        for _ in 0..raw {
            let len = r.bytes_at(off, 1)?[0] as usize;
            r.bytes_at(off + 1, len)?;
            starts.push(off);
            off += 1 + len;
        }

        Ok(Self { payload, count: raw, starts: starts.into_boxed_slice() })
    }

    /// Nombre d'atomes.
    pub const fn len(&self) -> u32 { self.count }

    /// Vrai si la table est vide.
    pub const fn is_empty(&self) -> bool { self.count == 0 }

    /// Nom de l'atome `index` (base 1), `None` hors table.
    pub fn resolve(&self, index: u32) -> Option<&'a [u8]> {
        let off = *self.starts.get(usize::try_from(index).ok()?.checked_sub(1)?)?;
        let len = *self.payload.get(off)? as usize;
        self.payload.get(off + 1..off + 1 + len)
    }

    /// Comme [`AtomTable::resolve`], mais hors table est une erreur de format.
    pub fn require(&self, index: u32) -> LoadResult<&'a [u8]> {
        self.resolve(index).ok_or(LoadError::AtomOutOfRange { index })
    }

    /// Noms dans l'ordre de la table.
    pub fn iter(&self) -> AtomIter<'a> {
        AtomIter { payload: self.payload, off: 4, left: self.count }
    }
}

/// Itérateur renvoyé par [`AtomTable::iter`].
#[derive(Debug, Clone)]
pub struct AtomIter<'a> {
    payload: &'a [u8],
    off: usize,
    left: u32,
}

impl<'a> Iterator for AtomIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.left == 0 {
            return None;
        }
        let len = *self.payload.get(self.off)? as usize;
        let name = self.payload.get(self.off + 1..self.off + 1 + len)?;
        self.off += 1 + len;
        self.left -= 1;
        Some(name)
    }
}

/// Encode une table `AtU8` (tests, benchmarks).
///
/// # Panics
///
/// Si un nom dépasse 255 octets.
pub fn encode_atoms<'s>(names: impl IntoIterator<Item = &'s str>) -> Vec<u8> {
    let names: Vec<&str> = names.into_iter().collect();
    let mut w = ember_core::ByteWriter::new();
    w.write_u32_be(u32::try_from(names.len()).expect("atom count exceeds u32::MAX"));
    for name in names {
        w.write_u8(u8::try_from(name.len()).expect("atom name longer than 255 bytes"));
        w.write_bytes(name.as_bytes());
    }
    w.into_vec()
}
