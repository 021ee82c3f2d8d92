//! Fixtures partagées par les benchmarks.

use ember_core::{ByteWriter, FormBuilder};
use ember_loader::{encode_atoms, encode_entries, NativeRegistry};
use ember_term::Value;

/// Handler factice : index dans la table des natives.
pub type Handler = usize;

/// Conteneur synthétique : `atoms` atomes, `imports` imports, `exports`
/// exports et `code_len` octets de code.
pub fn synthetic_module(atoms: usize, imports: usize, exports: usize, code_len: usize) -> Vec<u8> {
    let names: Vec<String> = (0..atoms.max(2)).map(|i| format!("atom_{i}")).collect();
    let count = u32::try_from(names.len()).unwrap_or(u32::MAX);
    let pick = |i: usize| u32::try_from(i).map_or(1, |i| i % count + 1);

    let imp: Vec<[u32; 3]> = (0..imports).map(|i| [2, pick(i), pick(i) % 4]).collect();
    let exp: Vec<[u32; 3]> = (0..exports).map(|i| [pick(i), pick(i) % 4, pick(i)]).collect();

    let mut code = ByteWriter::new();
    for v in [16, 0, 169, count, u32::try_from(exports).unwrap_or(u32::MAX)] {
        code.write_u32_be(v);
    }
    code.write_bytes(&vec![0u8; code_len]);

    FormBuilder::new()
        .chunk(*b"AtU8", encode_atoms(names.iter().map(String::as_str)))
        .chunk(*b"Code", code.into_vec())
        .chunk(*b"ImpT", encode_entries(&imp))
        .chunk(*b"ExpT", encode_entries(&exp))
        .build()
}

/// Registre où la moitié des atomes de `synthetic_module` sont des natives
/// du module `atom_1`.
pub fn synthetic_registry(atoms: usize) -> NativeRegistry<Handler> {
    let mut reg = NativeRegistry::new();
    for i in (0..atoms).step_by(2) {
        for arity in 0..4 {
            reg.register("atom_1", &format!("atom_{i}"), arity, i);
        }
    }
    reg
}

/// Iolist équilibrée de profondeur `depth`, chaque nœud portant `fanout`
/// enfants ; les feuilles alternent octets et petits binaires.
pub fn balanced_iolist(depth: u32, fanout: usize) -> Value {
    if depth == 0 {
        return Value::list((0..fanout).map(|i| {
            if i % 2 == 0 {
                Value::Integer(i64::try_from(i).unwrap_or(0))
            } else {
                Value::binary(b"ember".to_vec())
            }
        }));
    }
    Value::list((0..fanout).map(|_| balanced_iolist(depth - 1, fanout)))
}
