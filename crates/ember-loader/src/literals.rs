//! Table des littéraux : décompression de `LitT` et vue sur les entrées.

use ember_core::{ByteReader, ChunkTag};
use thiserror::Error;

use crate::{LoadError, LoadResult};

/// Échec de décompression de `LitT`. Fatal pour le chargement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    /// Payload trop court pour la taille déclarée.
    #[error("literal chunk shorter than its size header")]
    Truncated,
    /// Flux zlib invalide.
    #[error("inflate failed: {0}")]
    Inflate(String),
    /// Le flux ne se termine pas en une passe avec exactement la taille déclarée.
    #[error("inflate produced {produced} of {expected} bytes ({consumed}/{input} input consumed)")]
    Incomplete {
        /// Taille déclarée.
        expected: usize,
        /// Octets produits.
        produced: usize,
        /// Octets d'entrée consommés.
        consumed: usize,
        /// Octets d'entrée disponibles.
        input: usize,
    },
}

/// Taille décompressée déclarée en tête du payload `LitT`.
pub fn declared_size(payload: &[u8]) -> Result<usize, LiteralError> {
    ByteReader::new(payload).u32_at(0).map(|v| v as usize).map_err(|_| LiteralError::Truncated)
}

/// Décompresse le payload `LitT` en une seule passe.
///
/// Alloue exactement la taille déclarée ; le flux doit être entièrement
/// consommé et produire exactement cette taille.
#[cfg(feature = "zlib")]
pub fn inflate(payload: &[u8]) -> Result<Vec<u8>, LiteralError> {
    use flate2::{Decompress, FlushDecompress, Status};

    let expected = declared_size(payload)?;
    let input = &payload[4..];
    let mut out = vec![0u8; expected];

    let mut z = Decompress::new(true);
    let status = z
        .decompress(input, &mut out, FlushDecompress::Finish)
        .map_err(|e| LiteralError::Inflate(e.to_string()))?;

    let produced = usize::try_from(z.total_out()).unwrap_or(usize::MAX);
    let consumed = usize::try_from(z.total_in()).unwrap_or(usize::MAX);
    if status != Status::StreamEnd || produced != expected || consumed != input.len() {
        return Err(LiteralError::Incomplete { expected, produced, consumed, input: input.len() });
    }
    Ok(out)
}

/// Vue sur une table de littéraux décodée : `count: u32` puis `count` fois
/// `size: u32` + `size` octets au format externe.
#[derive(Debug, Clone, Copy)]
pub struct LiteralTable<'a> {
    data: &'a [u8],
    count: u32,
}

impl<'a> LiteralTable<'a> {
    /// Vérifie que chaque littéral déclaré tient dans les données.
    pub fn new(data: &'a [u8]) -> LoadResult<Self> {
        let r = ByteReader::new(data);
        let count = r.u32_at(0)?;
        let mut off = 4usize;
        for _ in 0..count {
            let size = read_size(data, off)?;
            r.bytes_at(off + 4, size)?;
            off += 4 + size;
        }
        Ok(Self { data, count })
    }

    /// Nombre de littéraux.
    pub const fn len(&self) -> u32 { self.count }

    /// Vrai si la table est vide.
    pub const fn is_empty(&self) -> bool { self.count == 0 }

    /// Octets (format externe) du littéral `index`, base 0.
    pub fn get(&self, index: u32) -> Option<&'a [u8]> {
        if index >= self.count {
            return None;
        }
        let mut off = 4usize;
        for _ in 0..index {
            off += 4 + read_size(self.data, off).ok()?;
        }
        let size = read_size(self.data, off).ok()?;
        self.data.get(off + 4..off + 4 + size)
    }
}

// Les tailles ne sont pas alignées sur 4 : lecture octet par octet.
fn read_size(data: &[u8], off: usize) -> LoadResult<usize> {
    let b = ByteReader::new(data).bytes_at(off, 4).map_err(|_| LoadError::BadTable {
        tag: ChunkTag::LitT,
        reason: "literal size past end of table",
    })?;
    Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]) as usize)
}
