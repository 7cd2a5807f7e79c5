//! src/app/etat.rs
//!
//! État UI (sans vue).
//!
//! Rôle : contenir l’état de la calculatrice (entrée, session, historique, erreur)
//! et offrir des opérations simples (C/CLR/AC, soumettre) sans logique d’affichage.
//!
//! Contrats :
//! - Aucun parsing ici : une ligne soumise part telle quelle dans la Session.
//! - Actions déterministes, sans effet de bord caché.
//! - Garde-fous : historique borné, précision bornée par la session.

use crate::noyau::{avec_contexte, Reponse, Session};

/// Garde-fou : nombre de lignes conservées dans l’historique.
const HISTORIQUE_MAX: usize = 200;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LigneHistorique {
    pub entree: String,
    /// valeur, message de commande, ou message d’erreur
    pub sortie: String,
    pub erreur: bool,
}

#[derive(Clone, Debug)]
pub struct AppCalc {
    // --- entrée utilisateur ---
    pub entree: String,

    // --- noyau (variables + format) ---
    pub session: Session,

    // --- sorties ---
    pub historique: Vec<LigneHistorique>,
    pub erreur: String, // diagnostic de la dernière ligne (avec ^ sous la position)

    // --- UX ---
    pub aide_ouverte: bool,
    pub quitter: bool,
    // Permet à vue.rs de redonner le focus à l’entrée après un clic sur un bouton.
    pub focus_entree: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self {
            entree: String::new(),
            session: Session::new(),
            historique: Vec::new(),
            erreur: String::new(),
            aide_ouverte: false,
            quitter: false,
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
        }
    }
}

impl AppCalc {
    /* ------------------------ Actions “boutons” (état seulement) ------------------------ */

    /// AC : nouvelle session (variables + format par défaut), entrée et historique vidés.
    pub fn reset_total(&mut self) {
        self.entree.clear();
        self.clear_historique();
        self.session.reset();
        self.focus_entree = true;
    }

    /// C : effacer seulement l’entrée (sans toucher à l’historique).
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.focus_entree = true;
    }

    /// CLR : effacer historique + erreur (variables conservées).
    pub fn clear_historique(&mut self) {
        self.historique.clear();
        self.erreur.clear();
        self.focus_entree = true;
    }

    fn ajouter(&mut self, entree: &str, sortie: impl Into<String>, erreur: bool) {
        if self.historique.len() >= HISTORIQUE_MAX {
            self.historique.remove(0);
        }
        self.historique.push(LigneHistorique {
            entree: entree.to_string(),
            sortie: sortie.into(),
            erreur,
        });
    }

    /// Soumet la ligne en cours à la session.
    ///
    /// Choix UX :
    /// - succès : l’entrée est vidée (prête pour la ligne suivante)
    /// - échec : l’entrée est CONSERVÉE pour corriger, le diagnostic s’affiche
    pub fn soumettre(&mut self) {
        let ligne = self.entree.trim().to_string();
        self.focus_entree = true;

        match self.session.traiter(&ligne) {
            Reponse::Rien => return,
            Reponse::Quitter => {
                self.quitter = true;
                return;
            }
            Reponse::Aide(_) => {
                self.aide_ouverte = true;
                self.ajouter(&ligne, "aide affichée", false);
            }
            Reponse::Info(msg) => self.ajouter(&ligne, msg, false),
            Reponse::Affecte => self.ajouter(&ligne, "", false),
            Reponse::Valeur(v) => self.ajouter(&ligne, v, false),
            Reponse::Erreur(e) => {
                self.erreur = avec_contexte(&e, &ligne);
                self.ajouter(&ligne, e.to_string(), true);
                return;
            }
        }

        self.erreur.clear();
        self.entree.clear();
    }

    /// Bascule fixe / scientifique (équivalent de `format sci|fixed`).
    pub fn set_scientifique(&mut self, sci: bool) {
        self.session.set_scientifique(sci);
        self.focus_entree = true;
    }

    /// Équivalent de `precision N` (borné par la session).
    pub fn set_digits(&mut self, digits: u32) {
        self.session.set_digits(i64::from(digits));
        self.focus_entree = true;
    }
}
