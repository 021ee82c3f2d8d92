//! Module chargé : agrégat des vues et tables construites au chargement.

use std::borrow::Cow;

use ember_core::ChunkTag;
use tracing::{debug, instrument};

use crate::{
    resolve_imports, scan, AtomTable, BifRegistry, CodeHeader, ExportTable, Import, ImportTable,
    Label, LabelTable, LiteralTable, LoadResult, OffsetTable,
};

/// Module chargé depuis un conteneur emprunté.
///
/// Possède la table des labels et celle des imports ; le code, les exports,
/// les atomes et les chaînes sont des vues sur `container`, qui doit survivre
/// au module.
#[derive(Debug)]
pub struct Module<'a, H, A = usize> {
    offsets: OffsetTable,
    header: CodeHeader,
    code: &'a [u8],
    atoms: AtomTable<'a>,
    exports: ExportTable<'a>,
    imports: ImportTable<'a, H>,
    labels: LabelTable<A>,
    literals: Option<Cow<'a, [u8]>>,
    strings: Option<&'a [u8]>,
}

impl<'a, H: Copy, A> Module<'a, H, A> {
    /// Charge un module : scan des sections, résolution des imports,
    /// allocation de la table des labels, littéraux.
    ///
    /// # Panics
    ///
    /// Si la table `LitT` ne se décompresse pas (feature `zlib`).
    #[instrument(level = "debug", skip_all, fields(len = container.len()))]
    pub fn new<R>(container: &'a [u8], registry: &R) -> LoadResult<Self>
    where
        R: BifRegistry<Handler = H> + ?Sized,
    {
        let offsets = scan(container)?;
        for tag in ChunkTag::REQUIRED {
            offsets.require(tag)?;
        }

        let atoms = AtomTable::new(offsets.require(ChunkTag::AtU8)?.slice(container)?)?;
        let imports = resolve_imports(offsets.require(ChunkTag::ImpT)?.slice(container)?, &atoms, registry)?;
        let exports = ExportTable::new(offsets.require(ChunkTag::ExpT)?.slice(container)?)?;
        let (header, code) = CodeHeader::parse(offsets.require(ChunkTag::Code)?.slice(container)?)?;
        let labels = LabelTable::new(header.label_count as usize);
        let strings = offsets.span(ChunkTag::StrT).map(|s| s.slice(container)).transpose()?;
        let literals = load_literals(container, &offsets)?;

        debug!(
            atoms = atoms.len(),
            imports = imports.len(),
            resolved = imports.resolved_count(),
            exports = exports.len(),
            labels = labels.len(),
            code = code.len(),
            "module loaded"
        );

        Ok(Self { offsets, header, code, atoms, exports, imports, labels, literals, strings })
    }

    /// Flux de bytecode (après l'en-tête de la section `Code`).
    pub const fn code(&self) -> &'a [u8] { self.code }

    /// En-tête de la section `Code`.
    pub const fn code_header(&self) -> &CodeHeader { &self.header }

    /// Table d'offsets du conteneur.
    pub const fn offsets(&self) -> &OffsetTable { &self.offsets }

    /// Table des atomes.
    pub const fn atoms(&self) -> &AtomTable<'a> { &self.atoms }

    /// Nom du module (atome 1).
    pub fn module_name(&self) -> Option<&'a [u8]> { self.atoms.resolve(1) }

    /// Table des exports.
    pub const fn exports(&self) -> &ExportTable<'a> { &self.exports }

    /// Label d'entrée de `name/arity`, `None` si non exportée.
    pub fn search_exported_function(&self, name: &[u8], arity: u32) -> Option<Label> {
        self.exports.search(&self.atoms, name, arity)
    }

    /// Cases de résolution des imports (lecture seule après chargement).
    pub fn imported_functions(&self) -> &[Option<H>] { self.imports.imported_functions() }

    /// Entrées d'import décodées.
    pub fn imports(&self) -> &[Import<'a>] { self.imports.entries() }

    /// Table des labels.
    pub const fn labels(&self) -> &LabelTable<A> { &self.labels }

    /// Table des labels, pour la passe de validation du bytecode.
    pub fn labels_mut(&mut self) -> &mut LabelTable<A> { &mut self.labels }

    /// Raccourci pour [`LabelTable::set`].
    ///
    /// # Panics
    ///
    /// Si `index` dépasse le nombre de labels déclaré par l'en-tête `Code`.
    pub fn add_label(&mut self, index: usize, address: A) { self.labels.set(index, address); }

    /// Données de la table des littéraux (`LitU`, ou `LitT` décompressée).
    pub fn literals(&self) -> Option<&[u8]> { self.literals.as_deref() }

    /// Vue indexée sur la table des littéraux, si présente.
    pub fn literal_table(&self) -> LoadResult<Option<LiteralTable<'_>>> {
        self.literals().map(LiteralTable::new).transpose()
    }

    /// Pool de chaînes (`StrT`), si présent.
    pub const fn strings(&self) -> Option<&'a [u8]> { self.strings }
}

fn load_literals<'a>(container: &'a [u8], offsets: &OffsetTable) -> LoadResult<Option<Cow<'a, [u8]>>> {
    if let Some(span) = offsets.span(ChunkTag::LitU) {
        return Ok(Some(Cow::Borrowed(span.slice(container)?)));
    }
    let Some(span) = offsets.span(ChunkTag::LitT) else {
        return Ok(None);
    };

    #[cfg(feature = "zlib")]
    let literals = match crate::literals::inflate(span.slice(container)?) {
        Ok(data) => Some(Cow::Owned(data)),
        Err(e) => {
            tracing::error!(error = %e, "literal table decompression failed");
            panic!("literal table decompression failed: {e}");
        }
    };

    #[cfg(not(feature = "zlib"))]
    let literals = {
        tracing::warn!(offset = span.offset, "LitT present but zlib support is disabled");
        None
    };

    Ok(literals)
}
