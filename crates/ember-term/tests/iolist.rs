//! Iolists : taille et aplatissement cohérents, imbrication profonde.

use ember_term::prelude::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Iolist arbitraire et les octets qu'elle doit produire.
fn iolist() -> impl Strategy<Value = (Value, Vec<u8>)> {
    let leaf = prop_oneof![
        any::<u8>().prop_map(|b| (Value::from(b), vec![b])),
        prop::collection::vec(any::<u8>(), 0..8).prop_map(|bs| (Value::binary(bs.clone()), bs)),
    ];
    leaf.prop_recursive(6, 64, 6, |inner| {
        prop::collection::vec(inner, 0..6).prop_map(|items| {
            let mut bytes = Vec::new();
            let mut terms = Vec::new();
            for (t, b) in items {
                terms.push(t);
                bytes.extend(b);
            }
            (Value::list(terms), bytes)
        })
    })
}

proptest! {
    #[test]
    fn size_matches_flattened_bytes((io, expected) in iolist()) {
        let root = Value::list([io]);
        prop_assert_eq!(iolist_size(&root), Ok(expected.len()));
        prop_assert_eq!(iolist_to_bytes(&root), Ok(expected));
    }

    #[test]
    fn byte_lists_read_back_as_strings(s in "[a-z0-9 ]{0,32}") {
        prop_assert_eq!(term_to_string(&Value::charlist(&s)), Ok(s.clone()));
        prop_assert_eq!(term_to_string(&Value::binary(s.as_bytes())), Ok(s));
    }
}

#[test]
fn deeply_nested_heads() {
    let depth = 100_000;
    let mut io = Value::binary(b"x".to_vec());
    for _ in 0..depth {
        io = Value::list([io, Value::Integer(i64::from(b'y'))]);
    }
    assert_eq!(iolist_size(&io), Ok(depth + 1));
    let bytes = iolist_to_bytes(&io).unwrap();
    assert_eq!(bytes[0], b'x');
    assert!(bytes[1..].iter().all(|&b| b == b'y'));
}

#[test]
fn deeply_nested_tails() {
    let depth = 100_000;
    let mut io = Value::binary(b"end".to_vec());
    for _ in 0..depth {
        io = Value::improper_list([Value::Integer(1)], io);
    }
    assert_eq!(iolist_size(&io), Ok(depth + 3));
    assert_eq!(list_length(&io), None);
}

#[test]
fn long_flat_list() {
    let io = Value::list((0..50_000).map(|i: i64| Value::Integer(i % 256)));
    assert_eq!(iolist_size(&io), Ok(50_000));
    assert_eq!(list_length(&io), Some(50_000));
}
