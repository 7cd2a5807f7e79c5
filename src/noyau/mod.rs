//! Noyau — calculatrice complexe décimale
//!
//! Organisation interne :
//! - decimal.rs     : scalaire décimal (BigInt × 10^e, 100 chiffres significatifs)
//! - complexe.rs    : arithmétique complexe (+ - * /, con, mod)
//! - operateurs.rs  : table des puissances de liaison + règle de dépilement
//! - jetons.rs      : tokenisation + contrôle des parenthèses
//! - eval.rs        : shunting-yard en une passe (analyse + exécution)
//! - variables.rs   : environnement de session
//! - format.rs      : affichage fixe / scientifique
//! - erreurs.rs     : taxonomie lexicale / sémantique
//! - session.rs     : commandes + pipeline complet d’une ligne

pub mod complexe;
pub mod decimal;
pub mod erreurs;
pub mod eval;
pub mod format;
pub mod jetons;
pub mod operateurs;
pub mod session;
pub mod variables;

#[cfg(test)]
mod tests_proprietes;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use erreurs::avec_contexte;
pub use session::{Reponse, Session};
