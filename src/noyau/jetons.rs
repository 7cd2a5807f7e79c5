// src/noyau/jetons.rs

use super::decimal::grammaire_decimale;
use super::erreurs::LexicalError;
use super::operateurs::Op;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tok {
    // Lexème brut : la conversion décimale est faite à l’évaluation.
    Num(String),
    Ident(String),
    Op(Op),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Jeton {
    pub tok: Tok,
    /// décalage (octets) dans la ligne source
    pub pos: usize,
}

impl Jeton {
    pub fn new(tok: Tok, pos: usize) -> Self {
        Jeton { tok, pos }
    }
}

/// Vrai si le lexème est un nombre : décimal avec `i` final optionnel, ou `i` seul.
fn est_nombre(lexeme: &str) -> bool {
    if lexeme == "i" {
        return true;
    }
    grammaire_decimale(lexeme.strip_suffix('i').unwrap_or(lexeme))
}

/// Classe le lexème accumulé : nombre, con/mod, ou identificateur.
fn classer(lexeme: String, pos: usize) -> Result<Tok, LexicalError> {
    if est_nombre(&lexeme) {
        return Ok(Tok::Num(lexeme));
    }

    let tete_ok = lexeme
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !tete_ok {
        return Err(LexicalError::InvalidToken { lexeme, pos });
    }
    if !lexeme.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(LexicalError::InvalidIdentifier { lexeme, pos });
    }

    Ok(match lexeme.as_str() {
        "con" => Tok::Op(Op::Con),
        "mod" => Tok::Op(Op::Mod),
        _ => Tok::Ident(lexeme),
    })
}

/// Tokenize une ligne en jetons.
/// Supporte:
/// - nombres décimaux (12, 3.5, .5, 1e10) avec `i` final optionnel (2.5i), et `i` seul
/// - opérateurs = + - * / (toujours un caractère, jamais collés au lexème)
/// - parenthèses ( ) avec contrôle d’équilibre
/// - con / mod (fonctions), identifiants [a-zA-Z_][a-zA-Z0-9_]*
///
/// NOTE: '+' et '-' coupent toujours le lexème : "1e-5" donne "1e" (invalide).
pub fn scan(s: &str) -> Result<Vec<Jeton>, LexicalError> {
    let mut out = Vec::new();
    let mut courant = String::new();
    let mut debut: usize = 0;

    // positions des '(' encore ouvertes
    let mut ouvertes: Vec<usize> = Vec::new();

    for (i, c) in s.char_indices() {
        if c.is_whitespace() {
            vider(&mut courant, debut, &mut out)?;
            continue;
        }

        if let Some(op) = Op::depuis_char(c) {
            vider(&mut courant, debut, &mut out)?;

            match op {
                Op::LPar => ouvertes.push(i),
                Op::RPar => {
                    if ouvertes.pop().is_none() {
                        return Err(LexicalError::UnmatchedParenthesis { pos: i });
                    }
                }
                _ => {}
            }

            out.push(Jeton::new(Tok::Op(op), i));
            continue;
        }

        if courant.is_empty() {
            debut = i;
        }
        courant.push(c);
    }

    vider(&mut courant, debut, &mut out)?;

    if let Some(pos) = ouvertes.pop() {
        return Err(LexicalError::MismatchedParentheses { pos });
    }

    Ok(out)
}

fn vider(courant: &mut String, debut: usize, out: &mut Vec<Jeton>) -> Result<(), LexicalError> {
    if courant.is_empty() {
        return Ok(());
    }
    let lexeme = std::mem::take(courant);
    let tok = classer(lexeme, debut)?;
    out.push(Jeton::new(tok, debut));
    Ok(())
}

/// Format utilitaire (démarche) : liste de jetons en texte.
pub fn format_tokens(jetons: &[Jeton]) -> String {
    let mut out = Vec::new();
    for j in jetons {
        let s = match &j.tok {
            Tok::Num(lexeme) => lexeme.clone(),
            Tok::Ident(name) => format!("«{name}»"),
            Tok::Op(op) => op.symbole().to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
