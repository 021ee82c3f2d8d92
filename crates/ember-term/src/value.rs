//! Représentation possédée des termes.

use std::fmt;
use std::mem;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::term::Term;

/* ─────────────────────────── Value ─────────────────────────── */

/// Terme possédé. Les listes sont des chaînes de cellules `Cons`, une liste
/// impropre se termine par autre chose que `Nil`.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// `[]`
    Nil,
    /// Entier (small ou big tronqué à 64 bits).
    Integer(i64),
    /// Atome, par son nom.
    Atom(String),
    /// Binaire.
    Binary(Vec<u8>),
    /// Tuple.
    Tuple(Vec<Value>),
    /// Cellule de liste `[head | tail]`.
    Cons(Box<(Value, Value)>),
    /// Map, paires dans l'ordre d'insertion, clés uniques.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Atome `name`.
    pub fn atom(name: impl Into<String>) -> Self { Self::Atom(name.into()) }

    /// Binaire à partir d'octets.
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self { Self::Binary(bytes.into()) }

    /// Tuple.
    pub fn tuple(items: impl IntoIterator<Item = Self>) -> Self { Self::Tuple(items.into_iter().collect()) }

    /// Cellule `[head | tail]`.
    pub fn cons(head: Self, tail: Self) -> Self { Self::Cons(Box::new((head, tail))) }

    /// Liste propre.
    pub fn list(items: impl IntoIterator<Item = Self>) -> Self { Self::improper_list(items, Self::Nil) }

    /// Liste terminée par `tail`.
    pub fn improper_list(items: impl IntoIterator<Item = Self>, tail: Self) -> Self {
        let items: Vec<Self> = items.into_iter().collect();
        items.into_iter().rev().fold(tail, |acc, head| Self::cons(head, acc))
    }

    /// Chaîne Erlang : liste d'entiers, un par octet.
    pub fn charlist(s: &str) -> Self { Self::list(s.bytes().map(Self::from)) }

    /// Map ; une clé répétée remplace la précédente.
    pub fn map(pairs: impl IntoIterator<Item = (Self, Self)>) -> Self {
        let mut out: Vec<(Self, Self)> = Vec::new();
        for (k, v) in pairs {
            match out.iter_mut().find(|(ek, _)| *ek == k) {
                Some(slot) => slot.1 = v,
                None => out.push((k, v)),
            }
        }
        Self::Map(out)
    }

    fn is_compound(&self) -> bool {
        match self {
            Self::Cons(_) => true,
            Self::Tuple(items) => !items.is_empty(),
            Self::Map(pairs) => !pairs.is_empty(),
            _ => false,
        }
    }

    fn has_compound_children(&self) -> bool {
        match self {
            Self::Cons(cell) => cell.0.is_compound() || cell.1.is_compound(),
            Self::Tuple(items) => items.iter().any(Self::is_compound),
            Self::Map(pairs) => pairs.iter().any(|(k, v)| k.is_compound() || v.is_compound()),
            _ => false,
        }
    }

    fn take_compound_children(&mut self, out: &mut Vec<Self>) {
        let mut take = |v: &mut Self| {
            if v.is_compound() {
                out.push(mem::replace(v, Self::Nil));
            }
        };
        match self {
            Self::Cons(cell) => {
                take(&mut cell.0);
                take(&mut cell.1);
            }
            Self::Tuple(items) => items.iter_mut().for_each(take),
            Self::Map(pairs) => {
                for (k, v) in pairs.iter_mut() {
                    take(k);
                    take(v);
                }
            }
            _ => {}
        }
    }
}

// Libération itérative : une liste longue ou très imbriquée ne doit pas
// épuiser la pile native.
impl Drop for Value {
    fn drop(&mut self) {
        if !self.has_compound_children() {
            return;
        }
        let mut pending = Vec::new();
        self.take_compound_children(&mut pending);
        while let Some(mut v) = pending.pop() {
            v.take_compound_children(&mut pending);
        }
    }
}

/* ─────────────────────────── Term ─────────────────────────── */

impl Term for Value {
    fn is_nil(&self) -> bool { matches!(self, Self::Nil) }

    fn as_cons(&self) -> Option<(&Self, &Self)> {
        match self {
            Self::Cons(cell) => Some((&cell.0, &cell.1)),
            _ => None,
        }
    }

    fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }

    fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    fn is_atom(&self) -> bool { matches!(self, Self::Atom(_)) }

    fn tuple_arity(&self) -> Option<usize> {
        match self {
            Self::Tuple(items) => Some(items.len()),
            _ => None,
        }
    }

    fn tuple_element(&self, index: usize) -> Option<&Self> {
        match self {
            Self::Tuple(items) => items.get(index),
            _ => None,
        }
    }

    fn map_find_pos(&self, key: &Self) -> Option<usize> {
        match self {
            Self::Map(pairs) => pairs.iter().position(|(k, _)| k == key),
            _ => None,
        }
    }

    fn map_value(&self, pos: usize) -> Option<&Self> {
        match self {
            Self::Map(pairs) => pairs.get(pos).map(|(_, v)| v),
            _ => None,
        }
    }

    fn true_atom() -> Self { Self::atom("true") }
}

/* ─────────────────────────── Conversions ─────────────────────────── */

impl From<i64> for Value {
    fn from(v: i64) -> Self { Self::Integer(v) }
}
impl From<i32> for Value {
    fn from(v: i32) -> Self { Self::Integer(i64::from(v)) }
}
impl From<u8> for Value {
    fn from(v: u8) -> Self { Self::Integer(i64::from(v)) }
}
impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self { Self::Binary(v) }
}
impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self { Self::Binary(v.to_vec()) }
}

/* ─────────────────────────── Affichage ─────────────────────────── */

// Syntaxe Erlang : `[1,2|3]`, `{a,1}`, `<<"hi">>`, `#{k => v}`.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("[]"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Atom(name) => f.write_str(name),
            Self::Binary(bytes) => write!(f, "<<{:?}>>", String::from_utf8_lossy(bytes)),
            Self::Tuple(items) => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item:?}")?;
                }
                f.write_str("}")
            }
            Self::Cons(_) => {
                f.write_str("[")?;
                let mut cur = self;
                let mut first = true;
                while let Some((head, tail)) = cur.as_cons() {
                    if !first {
                        f.write_str(",")?;
                    }
                    write!(f, "{head:?}")?;
                    first = false;
                    cur = tail;
                }
                if !cur.is_nil() {
                    write!(f, "|{cur:?}")?;
                }
                f.write_str("]")
            }
            Self::Map(pairs) => {
                f.write_str("#{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{k:?} => {v:?}")?;
                }
                f.write_str("}")
            }
        }
    }
}
