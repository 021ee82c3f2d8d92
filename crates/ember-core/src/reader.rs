//! Lecteur big-endian borné sur un slice d'octets.

use byteorder::{BigEndian, ByteOrder};

use crate::{CoreError, CoreResult};

/// Lecteur séquentiel sur un slice d'octets (helpers BE alignés).
///
/// Le slice est supposé commencer sur une frontière de 4 octets du
/// conteneur ; toute lecture u32 dont l'offset n'est pas multiple de 4 échoue.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    off: usize,
}

impl<'a> ByteReader<'a> {
    /// Construit un lecteur positionné au début.
    pub const fn new(data: &'a [u8]) -> Self { Self { data, off: 0 } }

    /// Offset courant.
    pub const fn offset(&self) -> usize { self.off }

    /// Taille restante.
    pub const fn remaining(&self) -> usize { self.data.len().saturating_sub(self.off) }

    /// Slice complet sous-jacent.
    pub const fn data(&self) -> &'a [u8] { self.data }

    /// Repositionne le lecteur (borné à la fin du slice).
    pub fn seek(&mut self, off: usize) -> CoreResult<()> {
        if off > self.data.len() {
            return Err(CoreError::UnexpectedEof { needed: off - self.data.len(), at: self.data.len() });
        }
        self.off = off;
        Ok(())
    }

    /// Avance de `n` octets.
    pub fn skip(&mut self, n: usize) -> CoreResult<()> {
        let to = self.off.checked_add(n).ok_or(CoreError::Overflow)?;
        self.seek(to)
    }

    /// Lit `n` octets (ou erreur si EOF).
    pub fn read_bytes(&mut self, n: usize) -> CoreResult<&'a [u8]> {
        let bytes = self.bytes_at(self.off, n)?;
        self.off += n;
        Ok(bytes)
    }

    /// Lit un fourcc brut (tags inconnus compris).
    pub fn read_fourcc(&mut self) -> CoreResult<[u8; 4]> {
        let b = self.read_bytes(4)?;
        Ok([b[0], b[1], b[2], b[3]])
    }

    /// Lit un u8.
    pub fn read_u8(&mut self) -> CoreResult<u8> {
        let b = self.read_bytes(1)?;
        Ok(b[0])
    }

    /// Lit un u32 BE à l'offset courant (aligné sur 4).
    pub fn read_u32_be(&mut self) -> CoreResult<u32> {
        let v = self.u32_at(self.off)?;
        self.off += 4;
        Ok(v)
    }

    /// Lit un u32 BE à un offset absolu, sans déplacer le curseur.
    pub fn u32_at(&self, off: usize) -> CoreResult<u32> {
        if off % 4 != 0 {
            return Err(CoreError::Misaligned { at: off });
        }
        Ok(BigEndian::read_u32(self.bytes_at(off, 4)?))
    }

    /// Sous-slice `[off, off + n)` borné.
    pub fn bytes_at(&self, off: usize, n: usize) -> CoreResult<&'a [u8]> {
        let end = off.checked_add(n).ok_or(CoreError::Overflow)?;
        if end > self.data.len() {
            return Err(CoreError::UnexpectedEof { needed: n, at: off });
        }
        Ok(&self.data[off..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_big_endian() -> CoreResult<()> {
        let data = [0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x00, 0x00, 0x2A, 7];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_u32_be()?, 0xDEAD_BEEF);
        assert_eq!(r.read_u32_be()?, 42);
        assert_eq!(r.read_u8()?, 7);
        assert_eq!(r.remaining(), 0);
        Ok(())
    }

    #[test]
    fn truncated_read_fails() {
        let data = [0, 0, 1];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_u32_be(), Err(CoreError::UnexpectedEof { needed: 4, at: 0 }));
        assert_eq!(r.offset(), 0);
    }

    #[test]
    fn misaligned_read_fails() {
        let data = [0u8; 12];
        let mut r = ByteReader::new(&data);
        r.read_u8().unwrap();
        assert_eq!(r.read_u32_be(), Err(CoreError::Misaligned { at: 1 }));
        assert_eq!(r.u32_at(6), Err(CoreError::Misaligned { at: 6 }));
        assert_eq!(r.u32_at(8), Ok(0));
    }

    #[test]
    fn bytes_at_overflow() {
        let r = ByteReader::new(&[]);
        assert_eq!(r.bytes_at(usize::MAX, 2), Err(CoreError::Overflow));
    }

    #[test]
    fn seek_past_end_fails() {
        let data = [0u8; 4];
        let mut r = ByteReader::new(&data);
        assert!(r.seek(5).is_err());
        assert!(r.skip(4).is_ok());
        assert_eq!(r.remaining(), 0);
    }
}
