//! Registre des fonctions natives (BIF) consulté à la résolution des imports.

use std::collections::HashMap;
use std::fmt;

/// Capacité « registre de built-ins » injectée dans le chargeur.
///
/// Les noms sont les octets bruts des atomes.
pub trait BifRegistry {
    /// Référence vers l'implémentation native (pointeur de fonction, index…).
    type Handler: Copy;

    /// Renvoie le handler de `module:function/arity`, s'il est connu.
    fn get_handler(&self, module: &[u8], function: &[u8], arity: u32) -> Option<Self::Handler>;

    /// Vrai si `module:function/arity` est une fonction native.
    fn is_builtin(&self, module: &[u8], function: &[u8], arity: u32) -> bool {
        self.get_handler(module, function, arity).is_some()
    }
}

impl<R: BifRegistry + ?Sized> BifRegistry for &R {
    type Handler = R::Handler;

    fn get_handler(&self, module: &[u8], function: &[u8], arity: u32) -> Option<Self::Handler> {
        (**self).get_handler(module, function, arity)
    }

    fn is_builtin(&self, module: &[u8], function: &[u8], arity: u32) -> bool {
        (**self).is_builtin(module, function, arity)
    }
}

/// Registre en mémoire indexé par `(module, function, arity)`.
#[derive(Clone)]
pub struct NativeRegistry<H> {
    entries: HashMap<Vec<u8>, H>,
}

impl<H> Default for NativeRegistry<H> {
    fn default() -> Self { Self::new() }
}

impl<H> fmt::Debug for NativeRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeRegistry").field("len", &self.entries.len()).finish()
    }
}

impl<H> NativeRegistry<H> {
    /// Registre vide.
    pub fn new() -> Self { Self { entries: HashMap::new() } }

    /// Nombre de natives enregistrées.
    pub fn len(&self) -> usize { self.entries.len() }

    /// Vrai si aucune native n'est enregistrée.
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Enregistre une native (remplace une entrée existante).
    pub fn register(&mut self, module: &str, function: &str, arity: u32, handler: H) {
        self.entries.insert(mfa_key(module.as_bytes(), function.as_bytes(), arity), handler);
    }

    /// Enregistre un lot pour un même module.
    pub fn register_all(&mut self, module: &str, entries: impl IntoIterator<Item = (&'static str, u32, H)>) {
        for (function, arity, handler) in entries {
            self.register(module, function, arity, handler);
        }
    }
}

impl<H: Copy> BifRegistry for NativeRegistry<H> {
    type Handler = H;

    fn get_handler(&self, module: &[u8], function: &[u8], arity: u32) -> Option<H> {
        self.entries.get(&mfa_key(module, function, arity)).copied()
    }
}

fn mfa_key(module: &[u8], function: &[u8], arity: u32) -> Vec<u8> {
    // module préfixé par sa longueur : la clé reste non ambiguë
    let mut key = Vec::with_capacity(module.len() + function.len() + 12);
    key.extend_from_slice(&module.len().to_be_bytes());
    key.extend_from_slice(module);
    key.extend_from_slice(function);
    key.extend_from_slice(&arity.to_be_bytes());
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_lookup() {
        let mut reg = NativeRegistry::new();
        reg.register_all("erlang", [("self", 0, 1u32), ("length", 1, 2)]);
        reg.register("lists", "reverse", 2, 3);

        assert_eq!(reg.len(), 3);
        assert_eq!(reg.get_handler(b"erlang", b"length", 1), Some(2));
        assert!(reg.is_builtin(b"lists", b"reverse", 2));
        assert!(!reg.is_builtin(b"lists", b"reverse", 1));
        assert!(!reg.is_builtin(b"erlang", b"self", 1));
    }

    #[test]
    fn key_separators_do_not_collide() {
        let mut reg = NativeRegistry::new();
        reg.register("a:b", "c", 1, ());
        assert!(!reg.is_builtin(b"a", b"b:c", 1));
    }

    #[test]
    fn works_through_reference() {
        let mut reg = NativeRegistry::new();
        reg.register("m", "f", 0, 'x');
        fn lookup<R: BifRegistry>(r: R) -> Option<R::Handler> { r.get_handler(b"m", b"f", 0) }
        assert_eq!(lookup(&reg), Some('x'));
    }
}
