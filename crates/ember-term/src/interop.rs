//! Conversions entre termes et données natives.
//!
//! Toutes les fonctions sont génériques sur [`Term`] et ne modifient jamais
//! les termes reçus. Les parcours de listes et d'iolists sont itératifs.

use crate::error::{InteropError, InteropResult};
use crate::term::Term;

/* ─────────────────────────── Chaînes ─────────────────────────── */

/// Octets d'une chaîne Erlang : liste d'octets ou binaire.
pub fn term_to_bytes<T: Term>(t: &T) -> InteropResult<Vec<u8>> {
    if t.is_list() {
        list_to_bytes(t)
    } else {
        binary_to_bytes(t)
    }
}

/// Comme [`term_to_bytes`], puis décodage UTF-8.
pub fn term_to_string<T: Term>(t: &T) -> InteropResult<String> {
    String::from_utf8(term_to_bytes(t)?).map_err(|_| InteropError::InvalidUtf8)
}

/// Copie des octets d'un binaire.
pub fn binary_to_bytes<T: Term>(t: &T) -> InteropResult<Vec<u8>> {
    t.as_binary().map(<[u8]>::to_vec).ok_or(InteropError::UnsupportedTermShape)
}

/// Octets d'une liste propre d'entiers `0..=255`.
pub fn list_to_bytes<T: Term>(t: &T) -> InteropResult<Vec<u8>> {
    let len = list_length(t).ok_or(InteropError::NotAProperList)?;
    let mut out = Vec::with_capacity(len);
    let mut cur = t;
    while let Some((head, tail)) = cur.as_cons() {
        out.push(head.as_u8().ok_or(InteropError::NotAByte)?);
        cur = tail;
    }
    Ok(out)
}

/// Nombre d'éléments d'une liste propre, `None` pour une liste impropre
/// ou un terme qui n'est pas une liste.
pub fn list_length<T: Term>(t: &T) -> Option<usize> {
    let mut len = 0usize;
    let mut cur = t;
    while let Some((_, tail)) = cur.as_cons() {
        len += 1;
        cur = tail;
    }
    cur.is_nil().then_some(len)
}

/* ─────────────────────────── Proplists ─────────────────────────── */

/// Résultat d'une recherche de proplist.
#[derive(Debug, PartialEq)]
pub enum PropValue<'a, T> {
    /// Second élément d'un tuple `{Key, Value}`.
    Value(&'a T),
    /// Atome nu égal à la clé, vaut `true`.
    Flag,
}

impl<T> Clone for PropValue<'_, T> {
    fn clone(&self) -> Self { *self }
}
impl<T> Copy for PropValue<'_, T> {}

impl<'a, T: Term + Clone> PropValue<'a, T> {
    /// Terme équivalent : la valeur, ou l'atome `true` pour un drapeau.
    pub fn into_term(self) -> T {
        match self {
            Self::Value(v) => v.clone(),
            Self::Flag => T::true_atom(),
        }
    }
}

/// Valeur associée à `key` dans une proplist.
///
/// La recherche s'arrête au premier élément dont la clé correspond : un
/// tuple dont le premier élément vaut `key` mais d'arité autre que 2 donne
/// `None`. Les éléments d'autres formes sont ignorés et une queue impropre
/// termine le parcours.
pub fn proplist_get_value<'a, T: Term>(list: &'a T, key: &T) -> Option<PropValue<'a, T>> {
    let mut cur = list;
    while let Some((head, tail)) = cur.as_cons() {
        if let Some(arity) = head.tuple_arity() {
            if head.tuple_element(0) == Some(key) {
                return if arity == 2 { head.tuple_element(1).map(PropValue::Value) } else { None };
            }
        } else if head.is_atom() && head == key {
            return Some(PropValue::Flag);
        }
        cur = tail;
    }
    None
}

/// [`proplist_get_value`] avec une valeur par défaut.
pub fn proplist_get_value_default<'a, T: Term>(list: &'a T, key: &T, default: &'a T) -> PropValue<'a, T> {
    proplist_get_value(list, key).unwrap_or(PropValue::Value(default))
}

/* ─────────────────────────── Iolists ─────────────────────────── */

/// Morceau produit par le parcours d'une iolist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment<'a> {
    /// Octet issu d'un entier (8 bits de poids faible).
    Byte(u8),
    /// Contenu d'un binaire.
    Bytes(&'a [u8]),
}

impl Fragment<'_> {
    /// Nombre d'octets.
    pub const fn len(&self) -> usize {
        match self {
            Self::Byte(_) => 1,
            Self::Bytes(b) => b.len(),
        }
    }

    /// Vrai pour un binaire vide.
    pub const fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Parcours en profondeur, de gauche à droite, d'une iolist.
///
/// Les queues en attente sont gardées sur une pile explicite : la
/// profondeur d'imbrication n'est bornée que par la mémoire. Les entiers
/// et binaires sont acceptés aussi en position de queue. Tout autre terme
/// produit une erreur, après quoi l'itérateur est épuisé.
#[derive(Debug)]
pub struct IolistWalker<'a, T> {
    current: Option<&'a T>,
    pending: Vec<&'a T>,
}

impl<'a, T: Term> IolistWalker<'a, T> {
    /// Démarre sur `root`, qui doit être un binaire ou une liste.
    pub fn new(root: &'a T) -> InteropResult<Self> {
        if root.is_binary() || root.is_list() {
            Ok(Self { current: Some(root), pending: Vec::new() })
        } else {
            Err(InteropError::UnsupportedTermShape)
        }
    }
}

impl<'a, T: Term> Iterator for IolistWalker<'a, T> {
    type Item = InteropResult<Fragment<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let t = self.current.take()?;
            if let Some((head, tail)) = t.as_cons() {
                self.pending.push(tail);
                self.current = Some(head);
                continue;
            }
            self.current = self.pending.pop();
            if t.is_nil() {
                continue;
            }
            if let Some(i) = t.as_integer() {
                return Some(Ok(Fragment::Byte(i.to_le_bytes()[0])));
            }
            if let Some(bytes) = t.as_binary() {
                if bytes.is_empty() {
                    continue;
                }
                return Some(Ok(Fragment::Bytes(bytes)));
            }
            self.current = None;
            self.pending.clear();
            return Some(Err(InteropError::UnsupportedTermShape));
        }
    }
}

/// Taille en octets de l'iolist aplatie.
pub fn iolist_size<T: Term>(t: &T) -> InteropResult<usize> {
    IolistWalker::new(t)?.try_fold(0usize, |acc, fragment| -> InteropResult<usize> { Ok(acc + fragment?.len()) })
}

/// Aplatit l'iolist dans `buf` et renvoie le nombre d'octets écrits.
///
/// # Panics
///
/// Si `buf` est plus court que [`iolist_size`].
pub fn write_iolist<T: Term>(t: &T, buf: &mut [u8]) -> InteropResult<usize> {
    let mut pos = 0usize;
    for fragment in IolistWalker::new(t)? {
        match fragment? {
            Fragment::Byte(b) => {
                buf[pos] = b;
                pos += 1;
            }
            Fragment::Bytes(bytes) => {
                buf[pos..pos + bytes.len()].copy_from_slice(bytes);
                pos += bytes.len();
            }
        }
    }
    Ok(pos)
}

/// Iolist aplatie dans un nouveau buffer.
pub fn iolist_to_bytes<T: Term>(t: &T) -> InteropResult<Vec<u8>> {
    let mut buf = vec![0u8; iolist_size(t)?];
    let written = write_iolist(t, &mut buf)?;
    debug_assert_eq!(written, buf.len());
    Ok(buf)
}

/* ─────────────────────────── Maps ─────────────────────────── */

/// Valeur associée à `key`, `None` si la clé est absente.
pub fn map_get_value<'a, T: Term>(map: &'a T, key: &T) -> Option<&'a T> {
    map.map_find_pos(key).and_then(|pos| map.map_value(pos))
}

/// [`map_get_value`] avec une valeur par défaut.
pub fn map_get_value_default<'a, T: Term>(map: &'a T, key: &T, default: &'a T) -> &'a T {
    map_get_value(map, key).unwrap_or(default)
}
