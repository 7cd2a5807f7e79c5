// src/noyau/session.rs
//
// Session : une ligne -> commande ou expression.
// Possède l’environnement et la configuration d’affichage (passés par référence au noyau).

use log::{debug, info, warn};
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};

use super::erreurs::CalcError;
use super::eval::{evaluate, Evaluation};
use super::format::{borner_digits, format_complex, FormatConfig};
use super::jetons::{format_tokens, scan};
use super::variables::Environnement;

pub const AIDE: &str = "\
Commandes :
  help              affiche cette aide
  format sci        affichage scientifique (d.ddde±XX)
  format fixed      affichage décimal (entiers sans virgule)
  precision N       N chiffres après la virgule (0 à 200)
  quit / exit       quitter
Expressions :
  + - * /, affectation =, con(z) conjugué, mod(z) module
  littéraux : 3.14  .5  1e10  2.5i  i  -i
  variables : lettres, chiffres, _ (pas de chiffre en tête)";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reponse {
    /// ligne vide
    Rien,
    Quitter,
    Aide(&'static str),
    /// commande appliquée (message de confirmation)
    Info(String),
    /// affectation réussie : rien à afficher
    Affecte,
    Valeur(String),
    Erreur(CalcError),
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    env: Environnement,
    config: FormatConfig,
    /// jetons de la dernière expression scannée (panneau « Démarche »)
    derniers_jetons: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    pub fn env(&self) -> &Environnement {
        &self.env
    }

    pub fn derniers_jetons(&self) -> &str {
        &self.derniers_jetons
    }

    /// Traite une ligne saisie.
    pub fn traiter(&mut self, ligne: &str) -> Reponse {
        let mots: Vec<&str> = ligne.split_whitespace().collect();

        match mots.as_slice() {
            [] => Reponse::Rien,
            ["quit"] | ["exit"] => Reponse::Quitter,
            ["help"] => Reponse::Aide(AIDE),
            ["format", "sci"] => {
                self.set_scientifique(true);
                Reponse::Info("affichage scientifique".to_string())
            }
            ["format", "fixed"] => {
                self.set_scientifique(false);
                Reponse::Info("affichage décimal".to_string())
            }
            ["precision", reste @ ..] if !reste.is_empty() => {
                let brut = reste.join(" ");
                match lire_precision(&brut) {
                    Some(n) => {
                        self.set_digits(n);
                        Reponse::Info(format!("précision : {} chiffres", self.config.digits))
                    }
                    None => {
                        warn!("précision refusée : {brut:?}");
                        Reponse::Erreur(CalcError::InvalidPrecision(brut))
                    }
                }
            }
            _ => match self.evaluer_ligne(ligne) {
                Ok(ev) if ev.affectation => Reponse::Affecte,
                Ok(ev) => Reponse::Valeur(format_complex(&ev.valeur, &self.config)),
                Err(e) => {
                    warn!("ligne refusée : {e}");
                    Reponse::Erreur(e)
                }
            },
        }
    }

    /// Scan + évaluation (sans formatage).
    pub fn evaluer_ligne(&mut self, ligne: &str) -> Result<Evaluation, CalcError> {
        self.derniers_jetons.clear();

        let jetons = scan(ligne)?;
        self.derniers_jetons = format_tokens(&jetons);
        debug!("jetons : {}", self.derniers_jetons);

        let ev = evaluate(&jetons, &mut self.env)?;
        debug!("résultat : {}", ev.valeur);
        Ok(ev)
    }

    pub fn set_scientifique(&mut self, sci: bool) {
        self.config.scientifique = sci;
        info!("format : {}", if sci { "sci" } else { "fixed" });
    }

    /// Borné à [0, DIGITS_MAX].
    pub fn set_digits(&mut self, digits: i64) {
        self.config.digits = borner_digits(digits);
        info!("précision : {}", self.config.digits);
    }

    /// Variables triées par nom, valeurs formatées.
    pub fn variables(&self) -> Vec<(String, String)> {
        self.env
            .iter()
            .map(|(nom, v)| (nom.to_string(), format_complex(v, &self.config)))
            .collect()
    }

    /// Nouvelle session : variables et format remis à zéro.
    pub fn reset(&mut self) {
        *self = Session::default();
        info!("session réinitialisée");
    }
}

/// Entier signé quelconque ; hors i64 => saturé (puis borné par la session).
fn lire_precision(brut: &str) -> Option<i64> {
    let n: BigInt = brut.parse().ok()?;
    Some(n.to_i64().unwrap_or(if n.is_negative() { i64::MIN } else { i64::MAX }))
}
