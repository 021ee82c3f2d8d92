//! Écriture big-endian et assemblage de conteneurs IFF.
//!
//! Utilisé par les tests et les benchmarks pour fabriquer des modules.

use byteorder::{BigEndian, ByteOrder};

use crate::{align4, BEAM_MAGIC, FORM_MAGIC};

/// Buffer d'écriture (croît automatiquement).
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// Crée un writer vide.
    pub const fn new() -> Self { Self { buf: Vec::new() } }
    /// Accès en lecture au contenu.
    pub fn as_slice(&self) -> &[u8] { &self.buf }
    /// Longueur écrite.
    pub fn len(&self) -> usize { self.buf.len() }
    /// Vrai si rien n'a été écrit.
    pub fn is_empty(&self) -> bool { self.buf.is_empty() }
    /// Récupère le buffer (consomme).
    pub fn into_vec(self) -> Vec<u8> { self.buf }
    /// Ajoute des octets bruts.
    pub fn write_bytes(&mut self, bytes: &[u8]) { self.buf.extend_from_slice(bytes); }
    /// Écrit un u8.
    pub fn write_u8(&mut self, v: u8) { self.buf.push(v); }
    /// Écrit un u32 big-endian.
    pub fn write_u32_be(&mut self, v: u32) {
        let mut b = [0u8; 4];
        BigEndian::write_u32(&mut b, v);
        self.buf.extend_from_slice(&b);
    }
    /// Complète avec des zéros jusqu'au prochain multiple de 4.
    pub fn pad4(&mut self) {
        let target = align4(self.buf.len()).unwrap_or(self.buf.len());
        self.buf.resize(target, 0);
    }
}

/// Assemble une forme `FOR1 … BEAM` à partir de sections.
#[derive(Debug, Default, Clone)]
pub struct FormBuilder {
    chunks: Vec<([u8; 4], Vec<u8>)>,
}

impl FormBuilder {
    /// Forme vide.
    pub const fn new() -> Self { Self { chunks: Vec::new() } }

    /// Ajoute une section (tag arbitraire, y compris inconnu).
    pub fn chunk(mut self, tag: [u8; 4], payload: impl Into<Vec<u8>>) -> Self {
        self.chunks.push((tag, payload.into()));
        self
    }

    /// Sérialise : en-tête IFF, puis chaque section paddée à 4.
    ///
    /// # Panics
    ///
    /// Si une section ou la forme dépasse `u32::MAX` octets.
    pub fn build(&self) -> Vec<u8> {
        let mut body = ByteWriter::new();
        body.write_bytes(BEAM_MAGIC);
        for (tag, payload) in &self.chunks {
            body.write_bytes(tag);
            body.write_u32_be(u32::try_from(payload.len()).expect("chunk larger than u32::MAX"));
            body.write_bytes(payload);
            body.pad4();
        }

        let mut out = ByteWriter::new();
        out.write_bytes(FORM_MAGIC);
        out.write_u32_be(u32::try_from(body.len()).expect("form larger than u32::MAX"));
        out.write_bytes(body.as_slice());
        out.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ByteReader;
    use pretty_assertions::assert_eq;

    #[test]
    fn writer_pads_to_four() {
        let mut w = ByteWriter::new();
        w.write_u8(1);
        w.pad4();
        assert_eq!(w.as_slice(), &[1, 0, 0, 0]);
        w.write_u32_be(0x0102_0304);
        assert_eq!(&w.as_slice()[4..], &[1, 2, 3, 4]);
    }

    #[test]
    fn form_layout() {
        let bytes = FormBuilder::new().chunk(*b"Code", vec![9u8; 5]).build();
        // 12 (en-tête) + 8 (section) + 5 payload + 3 padding
        assert_eq!(bytes.len(), 28);
        let r = ByteReader::new(&bytes);
        assert_eq!(r.bytes_at(0, 4).unwrap(), b"FOR1");
        assert_eq!(r.u32_at(4).unwrap() as usize, bytes.len() - 8);
        assert_eq!(r.bytes_at(8, 4).unwrap(), b"BEAM");
        assert_eq!(r.u32_at(16).unwrap(), 5);
    }
}
