//! Noyau : évaluation en une passe (analyse + exécution fusionnées)
//!
//! Shunting-yard sans RPN intermédiaire : chaque opérateur dépilé est appliqué
//! immédiatement sur la pile d’opérandes.
//!
//! - pile d’opérandes : `Operande::Valeur` ou `Operande::Cible` (nom en attente de '=')
//! - pile d’opérateurs : `OpEmpile` (op + position + drapeau préfixe)
//! - `attend_operande` : distingue le signe unaire du binaire, détecte les trous
//!
//! Les affectations sont mises en attente et ne touchent l’environnement
//! qu’à la fin d’une ligne réussie (pas de commit partiel).

use log::{debug, trace};

use super::complexe::Complex;
use super::decimal::Decimal;
use super::erreurs::SemanticError;
use super::jetons::{Jeton, Tok};
use super::operateurs::{doit_depiler, Op, OpEmpile};
use super::variables::Environnement;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub valeur: Complex,
    /// vrai si au moins un '=' a été appliqué (la session n’affiche alors rien)
    pub affectation: bool,
}

#[derive(Clone, Debug)]
enum Operande {
    Valeur(Complex),
    Cible { nom: String, pos: usize },
}

/// Fin de ligne réussie : résultat + affectations à committer.
struct Bilan {
    evaluation: Evaluation,
    en_attente: Vec<(String, Complex)>,
}

struct Machine<'a> {
    operandes: Vec<Operande>,
    operateurs: Vec<OpEmpile>,
    en_attente: Vec<(String, Complex)>,
    env: &'a Environnement,
    attend_operande: bool,
    affectation: bool,
}

/// API publique : évalue une suite de jetons contre l’environnement.
pub fn evaluate(jetons: &[Jeton], env: &mut Environnement) -> Result<Evaluation, SemanticError> {
    let mut machine = Machine::new(env);

    for (i, jeton) in jetons.iter().enumerate() {
        let suivi_de_egal = matches!(
            jetons.get(i + 1),
            Some(Jeton {
                tok: Tok::Op(Op::Assign),
                ..
            })
        );
        machine.etape(jeton, suivi_de_egal)?;
    }

    let Bilan {
        evaluation,
        en_attente,
    } = machine.terminer()?;

    for (nom, v) in en_attente {
        debug!("affectation {nom} = {v}");
        env.definir(nom, v);
    }

    Ok(evaluation)
}

/// Lexème numérique -> complexe.
/// "i" / "…i" : imaginaire pur ("", "+", "-" devant donnent 1, 1, -1) ; sinon réel pur.
fn lire_nombre(lexeme: &str, pos: usize) -> Result<Complex, SemanticError> {
    let invalide = || SemanticError::InvalidNumber {
        lexeme: lexeme.to_string(),
        pos,
    };

    match lexeme.strip_suffix('i') {
        Some(coeff) => {
            let im = match coeff {
                "" | "+" => Decimal::one(),
                "-" => -Decimal::one(),
                _ => coeff.parse::<Decimal>().map_err(|_| invalide())?,
            };
            Ok(Complex::imaginaire(im))
        }
        None => {
            let re = lexeme.parse::<Decimal>().map_err(|_| invalide())?;
            Ok(Complex::reel(re))
        }
    }
}

impl<'a> Machine<'a> {
    fn new(env: &'a Environnement) -> Self {
        Machine {
            operandes: Vec::new(),
            operateurs: Vec::new(),
            en_attente: Vec::new(),
            env,
            attend_operande: true,
            affectation: false,
        }
    }

    fn etape(&mut self, jeton: &Jeton, suivi_de_egal: bool) -> Result<(), SemanticError> {
        let pos = jeton.pos;

        match &jeton.tok {
            Tok::Num(lexeme) => {
                let v = lire_nombre(lexeme, pos)?;
                self.operandes.push(Operande::Valeur(v));
                self.attend_operande = false;
            }

            Tok::Ident(nom) => {
                if suivi_de_egal {
                    self.operandes.push(Operande::Cible {
                        nom: nom.clone(),
                        pos,
                    });
                } else {
                    let v = self.lire_variable(nom, pos)?;
                    self.operandes.push(Operande::Valeur(v));
                }
                self.attend_operande = false;
            }

            Tok::Op(op) => self.operateur(*op, pos)?,
        }

        Ok(())
    }

    /// Les affectations de la ligne en cours masquent l’environnement.
    fn lire_variable(&self, nom: &str, pos: usize) -> Result<Complex, SemanticError> {
        self.en_attente
            .iter()
            .rev()
            .find(|(n, _)| n == nom)
            .map(|(_, v)| v)
            .or_else(|| self.env.lire(nom))
            .cloned()
            .ok_or_else(|| SemanticError::UndefinedVariable {
                name: nom.to_string(),
                pos,
            })
    }

    fn operateur(&mut self, op: Op, pos: usize) -> Result<(), SemanticError> {
        match op {
            Op::Con | Op::Mod | Op::LPar => {
                if !self.attend_operande {
                    return Err(SemanticError::MissingOperator { pos });
                }
                self.operateurs.push(OpEmpile::new(op, pos));
                self.attend_operande = true;
            }

            Op::RPar => {
                if self.attend_operande {
                    return Err(SemanticError::MissingOperand { pos });
                }

                // dépile jusqu’à '('
                loop {
                    match self.operateurs.last() {
                        None => return Err(SemanticError::MismatchedParentheses { pos }),
                        Some(s) if s.op == Op::LPar => {
                            self.operateurs.pop();
                            break;
                        }
                        Some(_) => self.depiler_appliquer()?,
                    }
                }

                // con( … ) / mod( … ) : la fonction sort avec sa parenthèse
                if self.operateurs.last().is_some_and(|s| s.op.est_fonction()) {
                    self.depiler_appliquer()?;
                }

                self.attend_operande = false;
            }

            Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Assign => {
                if self.attend_operande {
                    // position d’opérande : signe unaire ou trou
                    match op {
                        Op::Add => {}
                        Op::Sub => {
                            // -x => 0 - x
                            self.operandes.push(Operande::Valeur(Complex::zero()));
                            self.operateurs.push(OpEmpile::negation(pos));
                        }
                        _ => return Err(SemanticError::MissingOperand { pos }),
                    }
                    return Ok(());
                }

                while self.operateurs.last().is_some_and(|s| doit_depiler(s, op)) {
                    self.depiler_appliquer()?;
                }

                self.operateurs.push(OpEmpile::new(op, pos));
                self.attend_operande = true;
            }
        }

        Ok(())
    }

    fn pop_valeur(&mut self) -> Result<Complex, SemanticError> {
        match self.operandes.pop() {
            Some(Operande::Valeur(v)) => Ok(v),
            Some(Operande::Cible { pos, .. }) => Err(SemanticError::InvalidAssignmentTarget { pos }),
            None => Err(SemanticError::InvalidExpression),
        }
    }

    /// (gauche, droite) : la droite est au sommet.
    fn pop_paire(&mut self) -> Result<(Complex, Complex), SemanticError> {
        let droite = self.pop_valeur()?;
        let gauche = self.pop_valeur()?;
        Ok((gauche, droite))
    }

    fn depiler_appliquer(&mut self) -> Result<(), SemanticError> {
        let sommet = self
            .operateurs
            .pop()
            .ok_or(SemanticError::InvalidExpression)?;
        let pos = sommet.pos;

        let resultat = match sommet.op {
            Op::Add => {
                let (g, d) = self.pop_paire()?;
                &g + &d
            }
            Op::Sub => {
                let (g, d) = self.pop_paire()?;
                &g - &d
            }
            Op::Mul => {
                let (g, d) = self.pop_paire()?;
                &g * &d
            }
            Op::Div => {
                let (g, d) = self.pop_paire()?;
                g.checked_div(&d)
                    .ok_or(SemanticError::DivisionByZero { pos })?
            }

            Op::Con => self.pop_valeur()?.conjugue(),
            Op::Mod => self.pop_valeur()?.module(),

            Op::Assign => {
                let valeur = self.pop_valeur()?;
                match self.operandes.pop() {
                    Some(Operande::Cible { nom, .. }) => {
                        self.en_attente.push((nom, valeur.clone()));
                        self.affectation = true;
                        valeur
                    }
                    Some(Operande::Valeur(_)) => {
                        return Err(SemanticError::InvalidAssignmentTarget { pos })
                    }
                    None => return Err(SemanticError::InvalidExpression),
                }
            }

            Op::LPar | Op::RPar => return Err(SemanticError::MismatchedParentheses { pos }),
        };

        trace!("applique {} (pos {pos}) -> {resultat}", sommet.op.symbole());
        self.operandes.push(Operande::Valeur(resultat));
        Ok(())
    }

    fn terminer(mut self) -> Result<Bilan, SemanticError> {
        if self.attend_operande {
            return Err(SemanticError::UnexpectedEndOfExpression);
        }

        while !self.operateurs.is_empty() {
            self.depiler_appliquer()?;
        }

        if self.operandes.len() != 1 {
            return Err(SemanticError::InvalidExpression);
        }

        let valeur = self.pop_valeur()?;
        Ok(Bilan {
            evaluation: Evaluation {
                valeur,
                affectation: self.affectation,
            },
            en_attente: self.en_attente,
        })
    }
}
