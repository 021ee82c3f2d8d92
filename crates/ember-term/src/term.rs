//! Capacités attendues de la représentation des termes.

/// Terme taggé du tas de la VM, vu au travers de ses prédicats et
/// accesseurs. L'égalité (`PartialEq`) sert à comparer atomes et clés.
pub trait Term: PartialEq + Sized {
    /// Liste vide `[]`.
    fn is_nil(&self) -> bool;

    /// Tête et queue d'une cellule de liste non vide.
    fn as_cons(&self) -> Option<(&Self, &Self)>;

    /// Octets d'un binaire.
    fn as_binary(&self) -> Option<&[u8]>;

    /// Valeur d'un entier.
    fn as_integer(&self) -> Option<i64>;

    /// Vrai pour un atome.
    fn is_atom(&self) -> bool;

    /// Arité d'un tuple.
    fn tuple_arity(&self) -> Option<usize>;

    /// Élément `index` (base 0) d'un tuple.
    fn tuple_element(&self, index: usize) -> Option<&Self>;

    /// Position de `key` dans une map, `None` si absente ou si `self`
    /// n'est pas une map.
    fn map_find_pos(&self, key: &Self) -> Option<usize>;

    /// Valeur à la position `pos` d'une map.
    fn map_value(&self, pos: usize) -> Option<&Self>;

    /// L'atome `true`.
    fn true_atom() -> Self;

    /// `[]` ou cellule de liste.
    fn is_list(&self) -> bool { self.is_nil() || self.as_cons().is_some() }

    /// Vrai pour un binaire.
    fn is_binary(&self) -> bool { self.as_binary().is_some() }

    /// Vrai pour un entier.
    fn is_integer(&self) -> bool { self.as_integer().is_some() }

    /// Vrai pour un tuple.
    fn is_tuple(&self) -> bool { self.tuple_arity().is_some() }

    /// Entier tenant sur un octet non signé.
    fn as_u8(&self) -> Option<u8> { self.as_integer().and_then(|i| u8::try_from(i).ok()) }
}
