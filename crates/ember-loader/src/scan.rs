//! Scan du répertoire de sections et table d'offsets.

use core::ops::Range;

use ember_core::{
    align4, ByteReader, ChunkTag, CoreError, BEAM_MAGIC, CHUNK_HEADER_SIZE, FORM_HEADER_SIZE,
    FORM_MAGIC,
};
use tracing::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{LoadError, LoadResult};

/// Position d'un payload de section dans le conteneur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChunkSpan {
    /// Offset du payload (juste après l'en-tête de section).
    pub offset: usize,
    /// Longueur déclarée du payload (hors padding).
    pub len: usize,
}

impl ChunkSpan {
    /// Plage d'octets du payload.
    pub const fn range(&self) -> Range<usize> { self.offset..self.offset + self.len }

    /// Payload de la section dans `container`.
    pub fn slice<'a>(&self, container: &'a [u8]) -> LoadResult<&'a [u8]> {
        Ok(ByteReader::new(container).bytes_at(self.offset, self.len)?)
    }
}

/// Table indexée par [`ChunkTag`] : une entrée par tag reconnu.
///
/// Un tag absent du conteneur vaut `None`, jamais un offset nul.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OffsetTable {
    spans: [Option<ChunkSpan>; ChunkTag::COUNT],
}

impl OffsetTable {
    /// Offset du payload de `tag`, si présent.
    pub const fn offset(&self, tag: ChunkTag) -> Option<usize> {
        match self.spans[tag.index()] {
            Some(span) => Some(span.offset),
            None => None,
        }
    }

    /// Span complet de `tag`, si présent.
    pub const fn span(&self, tag: ChunkTag) -> Option<ChunkSpan> { self.spans[tag.index()] }

    /// Vrai si la section a été vue.
    pub const fn contains(&self, tag: ChunkTag) -> bool { self.spans[tag.index()].is_some() }

    /// Span de `tag` ou [`LoadError::MissingChunk`].
    pub fn require(&self, tag: ChunkTag) -> LoadResult<ChunkSpan> {
        self.span(tag).ok_or(LoadError::MissingChunk(tag))
    }

    /// Sections présentes, dans l'ordre de [`ChunkTag::ALL`].
    pub fn iter(&self) -> impl Iterator<Item = (ChunkTag, ChunkSpan)> + '_ {
        ChunkTag::ALL.into_iter().filter_map(|tag| self.span(tag).map(|span| (tag, span)))
    }

    fn record(&mut self, tag: ChunkTag, span: ChunkSpan) { self.spans[tag.index()] = Some(span); }
}

/// Parcourt le répertoire de sections et construit la table d'offsets.
///
/// Les tags inconnus sont ignorés. Les sections obligatoires ne sont pas
/// vérifiées ici : voir [`OffsetTable::require`].
pub fn scan(container: &[u8]) -> LoadResult<OffsetTable> {
    if container.len() < FORM_HEADER_SIZE {
        return Err(LoadError::TooShort { len: container.len() });
    }

    let header = ByteReader::new(container);
    if header.bytes_at(0, 4)? != FORM_MAGIC || header.bytes_at(8, 4)? != BEAM_MAGIC {
        return Err(LoadError::BadMagic);
    }
    let declared = (header.u32_at(4)? as usize).checked_add(8).ok_or(CoreError::Overflow)?;
    if declared > container.len() {
        return Err(LoadError::Truncated { declared, len: container.len() });
    }

    let form = &container[..declared];
    let mut r = ByteReader::new(form);
    r.seek(FORM_HEADER_SIZE)?;

    let mut table = OffsetTable::default();
    while r.remaining() >= CHUNK_HEADER_SIZE {
        let at = r.offset();
        let fourcc = r.read_fourcc()?;
        let len = r.read_u32_be()? as usize;
        let offset = r.offset();
        if len > r.remaining() {
            return Err(LoadError::ChunkOverrun {
                tag: String::from_utf8_lossy(&fourcc).into_owned(),
                at,
                len,
            });
        }

        match ChunkTag::from_be_bytes(fourcc) {
            Some(tag) => {
                trace!(%tag, offset, len, "chunk");
                table.record(tag, ChunkSpan { offset, len });
            }
            None => trace!(tag = %String::from_utf8_lossy(&fourcc), offset, len, "skipping unknown chunk"),
        }

        // le padding de la dernière section peut manquer
        let next = offset + align4(len).ok_or(CoreError::Overflow)?;
        r.seek(next.min(form.len()))?;
    }

    if r.remaining() != 0 {
        return Err(LoadError::TrailingBytes { at: r.offset(), len: r.remaining() });
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::FormBuilder;
    use pretty_assertions::assert_eq;

    #[test]
    fn offsets_point_past_chunk_header() -> LoadResult<()> {
        let bytes = FormBuilder::new()
            .chunk(*b"AtU8", vec![0, 0, 0, 0])
            .chunk(*b"Code", vec![1; 5])
            .chunk(*b"ExpT", vec![0, 0, 0, 0])
            .build();
        let table = scan(&bytes)?;

        assert_eq!(table.offset(ChunkTag::AtU8), Some(20));
        // 20 + 4 (AtU8) + 8 (en-tête Code)
        assert_eq!(table.offset(ChunkTag::Code), Some(32));
        // 32 + 5 arrondi à 8, + 8
        assert_eq!(table.offset(ChunkTag::ExpT), Some(48));
        assert_eq!(table.span(ChunkTag::Code), Some(ChunkSpan { offset: 32, len: 5 }));
        assert_eq!(table.offset(ChunkTag::ImpT), None);
        assert_eq!(table.iter().count(), 3);
        Ok(())
    }

    #[test]
    fn unknown_tags_are_skipped() -> LoadResult<()> {
        let bytes = FormBuilder::new()
            .chunk(*b"Attr", vec![7; 3])
            .chunk(*b"ImpT", vec![0, 0, 0, 0])
            .build();
        let table = scan(&bytes)?;
        assert_eq!(table.offset(ChunkTag::ImpT), Some(12 + 8 + 4 + 8));
        Ok(())
    }

    #[test]
    fn require_reports_missing_chunk() {
        let bytes = FormBuilder::new().chunk(*b"Code", vec![0; 4]).build();
        let table = scan(&bytes).unwrap();
        assert!(table.require(ChunkTag::Code).is_ok());
        assert_eq!(table.require(ChunkTag::ImpT), Err(LoadError::MissingChunk(ChunkTag::ImpT)));
    }

    #[test]
    fn too_short_and_bad_magic() {
        assert_eq!(scan(b"FOR1"), Err(LoadError::TooShort { len: 4 }));
        assert_eq!(scan(b"FOR2\0\0\0\x04BEAM"), Err(LoadError::BadMagic));
        assert_eq!(scan(b"FOR1\0\0\0\x04ELF!"), Err(LoadError::BadMagic));
    }

    #[test]
    fn declared_form_size_past_end() {
        let mut bytes = FormBuilder::new().chunk(*b"Code", vec![0; 4]).build();
        bytes.truncate(bytes.len() - 4);
        assert!(matches!(scan(&bytes), Err(LoadError::Truncated { .. })));
    }

    #[test]
    fn chunk_length_past_end() {
        let mut bytes = FormBuilder::new().chunk(*b"Code", vec![0; 4]).build();
        // longueur de Code : 4 -> 64
        bytes[19] = 64;
        assert_eq!(
            scan(&bytes),
            Err(LoadError::ChunkOverrun { tag: "Code".into(), at: 12, len: 64 })
        );
    }

    #[test]
    fn trailing_fragment_is_malformed() {
        let mut bytes = FormBuilder::new().chunk(*b"Code", vec![0; 4]).build();
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        let size = (bytes.len() - 8) as u32;
        bytes[4..8].copy_from_slice(&size.to_be_bytes());
        assert_eq!(scan(&bytes), Err(LoadError::TrailingBytes { at: 24, len: 4 }));
    }

    #[test]
    fn last_chunk_without_padding() -> LoadResult<()> {
        let mut bytes = FormBuilder::new().chunk(*b"StrT", vec![b'a'; 3]).build();
        bytes.pop();
        let size = (bytes.len() - 8) as u32;
        bytes[4..8].copy_from_slice(&size.to_be_bytes());
        let table = scan(&bytes)?;
        assert_eq!(table.span(ChunkTag::StrT), Some(ChunkSpan { offset: 20, len: 3 }));
        Ok(())
    }

    #[cfg(feature = "serde")]
    #[test]
    fn offset_table_serializes() {
        let bytes = FormBuilder::new().chunk(*b"Code", vec![0; 4]).build();
        let table = scan(&bytes).unwrap();
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["spans"][1]["offset"], 20);
        assert!(json["spans"][0].is_null());
    }
}
