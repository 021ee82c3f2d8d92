//! ember-term — interop entre termes taggés et buffers natifs
//!
//! Le crate ne définit pas la représentation des termes : il travaille sur
//! n'importe quel type qui implémente [`Term`]. [`Value`] est une
//! représentation possédée de référence (tests, benchmarks, embarqueurs
//! sans tas dédié).
//!
//! - `interop` : chaînes, longueur de liste, proplists, iolists, maps
//! - `IolistWalker` : parcours en profondeur à pile explicite, partagé par
//!   `iolist_size` et `write_iolist`

#![deny(missing_docs)]

mod error;
pub mod interop;
mod term;
mod value;

pub use error::{InteropError, InteropResult};
pub use interop::{Fragment, IolistWalker, PropValue};
pub use term::Term;
pub use value::Value;

/// Prélude pratique pour importer d'un coup.
pub mod prelude {
    pub use crate::interop::{
        iolist_size, iolist_to_bytes, list_length, map_get_value, map_get_value_default,
        proplist_get_value, proplist_get_value_default, term_to_bytes, term_to_string,
        write_iolist,
    };
    pub use crate::{InteropError, InteropResult, PropValue, Term, Value};
}
