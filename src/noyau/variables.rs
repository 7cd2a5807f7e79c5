// src/noyau/variables.rs
//
// Environnement de session : nom -> dernière valeur affectée.
// Lecture d’un nom absent = erreur côté évaluateur (jamais de zéro implicite).

use std::collections::BTreeMap;

use super::complexe::Complex;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Environnement {
    // BTreeMap : ordre alphabétique stable pour l’affichage
    vars: BTreeMap<String, Complex>,
}

impl Environnement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lire(&self, nom: &str) -> Option<&Complex> {
        self.vars.get(nom)
    }

    pub fn definir(&mut self, nom: impl Into<String>, valeur: Complex) {
        self.vars.insert(nom.into(), valeur);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Complex)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
