//! Table des labels : label → adresse de code.

/// Tableau de taille fixe, alloué au chargement avec toutes les cases à
/// `None` et rempli par la passe de validation du bytecode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable<A> {
    slots: Box<[Option<A>]>,
}

impl<A> LabelTable<A> {
    /// `len` cases non résolues.
    pub fn new(len: usize) -> Self {
        Self { slots: std::iter::repeat_with(|| None).take(len).collect() }
    }

    /// Nombre de cases (fixé à l'allocation).
    pub fn len(&self) -> usize { self.slots.len() }

    /// Vrai si le module ne déclare aucun label.
    pub fn is_empty(&self) -> bool { self.slots.is_empty() }

    /// Écrit l'adresse du label `index`, en écrasant une valeur précédente.
    ///
    /// # Panics
    ///
    /// Si `index >= self.len()` : l'appelant a violé le contrat de la table.
    pub fn set(&mut self, index: usize, address: A) {
        let len = self.slots.len();
        match self.slots.get_mut(index) {
            Some(slot) => *slot = Some(address),
            None => {
                tracing::error!(index, len, "label index out of range");
                panic!("label index {index} out of range for table of {len} labels");
            }
        }
    }

    /// Adresse du label `index`, si elle a été écrite.
    pub fn get(&self, index: usize) -> Option<&A> { self.slots.get(index)?.as_ref() }

    /// Cases dans l'ordre des labels.
    pub fn iter(&self) -> impl Iterator<Item = Option<&A>> + '_ { self.slots.iter().map(Option::as_ref) }

    /// Nombre de labels déjà résolus.
    pub fn resolved_count(&self) -> usize { self.slots.iter().filter(|s| s.is_some()).count() }
}
