// src/noyau/erreurs.rs
//
// Taxonomie des erreurs du noyau.
// - LexicalError  : balayage (jetons, parenthèses)
// - SemanticError : évaluation (pile, variables, arithmétique)
// - CalcError     : ce que voit la session (les deux + commandes)
//
// Les positions sont des décalages en octets dans la ligne source.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LexicalError {
    #[error("jeton invalide « {lexeme} » (pos {pos})")]
    InvalidToken { lexeme: String, pos: usize },

    #[error("identificateur invalide « {lexeme} » (pos {pos})")]
    InvalidIdentifier { lexeme: String, pos: usize },

    #[error("')' sans '(' correspondante (pos {pos})")]
    UnmatchedParenthesis { pos: usize },

    #[error("parenthèses non fermées ('(' ouverte en pos {pos})")]
    MismatchedParentheses { pos: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SemanticError {
    #[error("variable indéfinie : {name} (pos {pos})")]
    UndefinedVariable { name: String, pos: usize },

    #[error("opérateur manquant (pos {pos})")]
    MissingOperator { pos: usize },

    #[error("opérande manquante (pos {pos})")]
    MissingOperand { pos: usize },

    #[error("cible d’affectation invalide : seule une variable peut recevoir '=' (pos {pos})")]
    InvalidAssignmentTarget { pos: usize },

    #[error("expression terminée par un opérateur")]
    UnexpectedEndOfExpression,

    #[error("expression invalide")]
    InvalidExpression,

    #[error("division par zéro (pos {pos})")]
    DivisionByZero { pos: usize },

    #[error("nombre invalide « {lexeme} » (pos {pos})")]
    InvalidNumber { lexeme: String, pos: usize },

    #[error("parenthèses non appariées (pos {pos})")]
    MismatchedParentheses { pos: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error(transparent)]
    Lexical(#[from] LexicalError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),

    #[error("précision invalide : « {0} » (entier attendu)")]
    InvalidPrecision(String),
}

impl LexicalError {
    pub fn pos(&self) -> usize {
        match self {
            LexicalError::InvalidToken { pos, .. }
            | LexicalError::InvalidIdentifier { pos, .. }
            | LexicalError::UnmatchedParenthesis { pos }
            | LexicalError::MismatchedParentheses { pos } => *pos,
        }
    }
}

impl SemanticError {
    pub fn pos(&self) -> Option<usize> {
        use SemanticError::*;

        match self {
            UndefinedVariable { pos, .. }
            | MissingOperator { pos }
            | MissingOperand { pos }
            | InvalidAssignmentTarget { pos }
            | DivisionByZero { pos }
            | InvalidNumber { pos, .. }
            | MismatchedParentheses { pos } => Some(*pos),
            UnexpectedEndOfExpression | InvalidExpression => None,
        }
    }
}

impl CalcError {
    pub fn pos(&self) -> Option<usize> {
        match self {
            CalcError::Lexical(e) => Some(e.pos()),
            CalcError::Semantic(e) => e.pos(),
            CalcError::InvalidPrecision(_) => None,
        }
    }
}

/// Message d’erreur + ligne source soulignée (^ sous la position fautive).
pub fn avec_contexte(err: &CalcError, source: &str) -> String {
    let Some(pos) = err.pos().filter(|p| *p <= source.len()) else {
        return err.to_string();
    };

    // pos est un décalage en octets, le caret se place en caractères
    let colonne = source
        .char_indices()
        .take_while(|(i, _)| *i < pos)
        .count();

    format!("{err}\n  {source}\n  {}^", " ".repeat(colonne))
}
