//! Résolution de la table des imports (`ImpT`).

use ember_core::{ByteReader, ChunkTag};
use tracing::trace;

use crate::{AtomTable, BifRegistry, LoadError, LoadResult};

/// Taille d'une entrée d'import ou d'export.
pub(crate) const ENTRY_SIZE: usize = 12;

/// Une entrée d'import décodée (MFA).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Import<'a> {
    /// Nom du module cible.
    pub module: &'a [u8],
    /// Nom de la fonction.
    pub function: &'a [u8],
    /// Arité.
    pub arity: u32,
}

/// Imports d'un module : une case de résolution par entrée.
///
/// `None` = import non résolu, laissé à l'exécuteur au moment de l'appel.
#[derive(Debug, Clone)]
pub struct ImportTable<'a, H> {
    entries: Box<[Import<'a>]>,
    resolved: Box<[Option<H>]>,
}

impl<'a, H: Copy> ImportTable<'a, H> {
    /// Nombre d'entrées déclarées.
    pub fn len(&self) -> usize { self.resolved.len() }

    /// Vrai si le module n'importe rien.
    pub fn is_empty(&self) -> bool { self.resolved.is_empty() }

    /// Handler natif de l'import `index`, s'il a été résolu.
    pub fn get(&self, index: usize) -> Option<H> { self.resolved.get(index).copied().flatten() }

    /// Cases de résolution, dans l'ordre de la table.
    pub fn imported_functions(&self) -> &[Option<H>] { &self.resolved }

    /// Entrées décodées, dans l'ordre de la table.
    pub fn entries(&self) -> &[Import<'a>] { &self.entries }

    /// Nombre d'imports liés à une native.
    pub fn resolved_count(&self) -> usize { self.resolved.iter().filter(|s| s.is_some()).count() }
}

/// Lit `count` puis les entrées `(module, function, arity)` et interroge
/// le registre pour chacune.
pub fn resolve_imports<'a, R>(
    payload: &'a [u8],
    atoms: &AtomTable<'a>,
    registry: &R,
) -> LoadResult<ImportTable<'a, R::Handler>>
where
    R: BifRegistry + ?Sized,
{
    let r = ByteReader::new(payload);
    let count = table_len(&r, ChunkTag::ImpT)?;

    let mut entries = Vec::with_capacity(count);
    let mut resolved = Vec::with_capacity(count);
    for i in 0..count {
        let base = 4 + i * ENTRY_SIZE;
        let module = atoms.require(r.u32_at(base)?)?;
        let function = atoms.require(r.u32_at(base + 4)?)?;
        let arity = r.u32_at(base + 8)?;

        let handler = if registry.is_builtin(module, function, arity) {
            registry.get_handler(module, function, arity)
        } else {
            trace!(
                module = %String::from_utf8_lossy(module),
                function = %String::from_utf8_lossy(function),
                arity,
                "unresolved import"
            );
            None
        };
        entries.push(Import { module, function, arity });
        resolved.push(handler);
    }

    Ok(ImportTable { entries: entries.into_boxed_slice(), resolved: resolved.into_boxed_slice() })
}

/// Compte d'entrées d'une table `count + 12 * count`, vérifié contre le payload.
pub(crate) fn table_len(r: &ByteReader<'_>, tag: ChunkTag) -> LoadResult<usize> {
    let count = r.u32_at(0)? as usize;
    let needed = count
        .checked_mul(ENTRY_SIZE)
        .and_then(|n| n.checked_add(4))
        .ok_or(LoadError::BadTable { tag, reason: "entry count overflows" })?;
    if needed > r.data().len() {
        return Err(LoadError::BadTable { tag, reason: "entries past end of chunk" });
    }
    Ok(count)
}

/// Encode une table d'entrées de 12 octets (tests, benchmarks).
///
/// # Panics
///
/// Si `entries` compte plus de `u32::MAX` entrées.
pub fn encode_entries(entries: &[[u32; 3]]) -> Vec<u8> {
    let mut w = ember_core::ByteWriter::new();
    w.write_u32_be(u32::try_from(entries.len()).expect("entry count exceeds u32::MAX"));
    for entry in entries {
        for v in entry {
            w.write_u32_be(*v);
        }
    }
    w.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::encode_atoms;
    use crate::NativeRegistry;
    use pretty_assertions::assert_eq;

    fn registry() -> NativeRegistry<u8> {
        let mut reg = NativeRegistry::new();
        reg.register("erlang", "+", 2, 1);
        reg.register("erlang", "self", 0, 2);
        reg
    }

    #[test]
    fn resolves_known_builtins_only() -> LoadResult<()> {
        let atoms_payload = encode_atoms(["m", "erlang", "+", "self", "lists", "map"]);
        let atoms = AtomTable::new(&atoms_payload)?;
        let payload = encode_entries(&[[2, 3, 2], [5, 6, 2], [2, 4, 0], [2, 3, 3]]);

        let table = resolve_imports(&payload, &atoms, &registry())?;
        assert_eq!(table.len(), 4);
        assert_eq!(table.imported_functions(), &[Some(1), None, Some(2), None]);
        assert_eq!(table.resolved_count(), 2);
        assert_eq!(table.get(2), Some(2));
        assert_eq!(table.get(9), None);
        assert_eq!(
            table.entries()[1],
            Import { module: b"lists", function: b"map", arity: 2 }
        );
        Ok(())
    }

    #[test]
    fn empty_table() -> LoadResult<()> {
        let atoms_payload = encode_atoms(["m"]);
        let atoms = AtomTable::new(&atoms_payload)?;
        let payload = encode_entries(&[]);
        let table = resolve_imports(&payload, &atoms, &registry())?;
        assert!(table.is_empty());
        Ok(())
    }

    #[test]
    fn count_past_end_is_malformed() {
        let atoms_payload = encode_atoms(["m"]);
        let atoms = AtomTable::new(&atoms_payload).unwrap();
        let mut payload = encode_entries(&[[1, 1, 0]]);
        payload[3] = 2;
        let err = resolve_imports(&payload, &atoms, &registry()).unwrap_err();
        assert_eq!(err, LoadError::BadTable { tag: ChunkTag::ImpT, reason: "entries past end of chunk" });
    }

    #[test]
    fn unknown_atom_is_malformed() {
        let atoms_payload = encode_atoms(["m"]);
        let atoms = AtomTable::new(&atoms_payload).unwrap();
        let payload = encode_entries(&[[1, 7, 0]]);
        let err = resolve_imports(&payload, &atoms, &registry()).unwrap_err();
        assert_eq!(err, LoadError::AtomOutOfRange { index: 7 });
    }
}
