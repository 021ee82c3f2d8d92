//! En-tête de la section `Code`.

use ember_core::ByteReader;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{LoadError, LoadResult};

/// Champs fixes en tête du payload `Code` (cinq u32 BE).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CodeHeader {
    /// Taille de l'en-tête après ce champ (≥ 16).
    pub info_size: u32,
    /// Version du jeu d'instructions.
    pub instruction_set: u32,
    /// Plus grand opcode utilisé.
    pub max_opcode: u32,
    /// Nombre de labels : taille de la table de labels.
    pub label_count: u32,
    /// Nombre de fonctions.
    pub function_count: u32,
}

impl CodeHeader {
    /// Taille minimale de `info_size`.
    pub const MIN_INFO_SIZE: u32 = 16;

    /// Décode l'en-tête et renvoie le flux de bytecode qui le suit.
    pub fn parse(payload: &[u8]) -> LoadResult<(Self, &[u8])> {
        let mut r = ByteReader::new(payload);
        let header = Self {
            info_size: r.read_u32_be()?,
            instruction_set: r.read_u32_be()?,
            max_opcode: r.read_u32_be()?,
            label_count: r.read_u32_be()?,
            function_count: r.read_u32_be()?,
        };
        if header.info_size < Self::MIN_INFO_SIZE {
            return Err(LoadError::BadCodeHeader("info size below 16"));
        }
        let start = (header.info_size as usize)
            .checked_add(4)
            .filter(|&start| start <= payload.len())
            .ok_or(LoadError::BadCodeHeader("info size past end of chunk"))?;
        let code = &payload[start..];
        // chaque label pointe sur au moins un octet d'opcode
        if header.label_count as usize > code.len() + 1 {
            return Err(LoadError::BadCodeHeader("label count exceeds code size"));
        }
        Ok((header, code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::ByteWriter;
    use pretty_assertions::assert_eq;

    fn payload(info_size: u32, labels: u32, code: &[u8]) -> Vec<u8> {
        let mut w = ByteWriter::new();
        for v in [info_size, 0, 169, labels, 2] {
            w.write_u32_be(v);
        }
        w.write_bytes(code);
        w.into_vec()
    }

    #[test]
    fn parses_fields_and_stream() -> LoadResult<()> {
        let bytes = payload(16, 3, &[1, 2, 3]);
        let (header, code) = CodeHeader::parse(&bytes)?;
        assert_eq!(header.label_count, 3);
        assert_eq!(header.max_opcode, 169);
        assert_eq!(header.function_count, 2);
        assert_eq!(code, &[1, 2, 3]);
        Ok(())
    }

    #[test]
    fn larger_info_size_skips_extra_fields() -> LoadResult<()> {
        let bytes = payload(20, 1, &[0, 0, 0, 9, 42]);
        let (_, code) = CodeHeader::parse(&bytes)?;
        assert_eq!(code, &[42]);
        Ok(())
    }

    #[test]
    fn rejects_bad_info_size() {
        assert_eq!(
            CodeHeader::parse(&payload(8, 1, &[])),
            Err(LoadError::BadCodeHeader("info size below 16"))
        );
        assert_eq!(
            CodeHeader::parse(&payload(64, 1, &[])),
            Err(LoadError::BadCodeHeader("info size past end of chunk"))
        );
        assert!(matches!(CodeHeader::parse(&[0, 0, 0, 16]), Err(LoadError::Core(_))));
    }

    #[test]
    fn rejects_label_count_larger_than_code() {
        assert!(CodeHeader::parse(&payload(16, 4, &[1, 2, 3])).is_ok());
        assert_eq!(
            CodeHeader::parse(&payload(16, 5, &[1, 2, 3])),
            Err(LoadError::BadCodeHeader("label count exceeds code size"))
        );
        assert_eq!(
            CodeHeader::parse(&payload(16, u32::MAX, &[])),
            Err(LoadError::BadCodeHeader("label count exceeds code size"))
        );
    }
}
