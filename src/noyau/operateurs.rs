// src/noyau/operateurs.rs
//
// Table des opérateurs : puissances de liaison (gauche, droite).
//
//   =          (4, 5)    associatif à droite : a = b = 3
//   + -        (10, 9)
//   * /        (15, 14)
//   con mod    (20, 19)
//   (          (100, —)  jamais dépilée par un opérateur entrant
//   )          (—, —)    jamais empilée
//
// Règle de dépilement (sommet vs entrant) :
//   entrant '='  : sommet.gauche >  entrant.droite
//   sinon        : sommet.gauche >= entrant.droite
// L’inégalité stricte pour '=' est ce qui rend l’affectation chaînée associative à droite.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    LPar,
    RPar,
    Con,
    Mod,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Liaison {
    pub gauche: i32,
    pub droite: Option<i32>,
}

/// Moins unaire (0 - x) : plus serré que * et /, plus lâche que con/mod.
pub const GAUCHE_NEGATION: i32 = 17;

impl Op {
    pub fn depuis_char(c: char) -> Option<Op> {
        match c {
            '=' => Some(Op::Assign),
            '+' => Some(Op::Add),
            '-' => Some(Op::Sub),
            '*' => Some(Op::Mul),
            '/' => Some(Op::Div),
            '(' => Some(Op::LPar),
            ')' => Some(Op::RPar),
            _ => None,
        }
    }

    pub fn symbole(self) -> &'static str {
        match self {
            Op::Assign => "=",
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::LPar => "(",
            Op::RPar => ")",
            Op::Con => "con",
            Op::Mod => "mod",
        }
    }

    /// con / mod : fonctions préfixées, appliquées à la fermeture de leur parenthèse.
    pub fn est_fonction(self) -> bool {
        matches!(self, Op::Con | Op::Mod)
    }

    /// None pour ')' (jamais comparée).
    pub fn liaison(self) -> Option<Liaison> {
        let (gauche, droite) = match self {
            Op::Assign => (4, Some(5)),
            Op::Add | Op::Sub => (10, Some(9)),
            Op::Mul | Op::Div => (15, Some(14)),
            Op::Con | Op::Mod => (20, Some(19)),
            Op::LPar => (100, None),
            Op::RPar => return None,
        };
        Some(Liaison { gauche, droite })
    }
}

/// Entrée de la pile d’opérateurs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpEmpile {
    pub op: Op,
    pub pos: usize,
    /// '-' en position d’opérande (précédé d’un 0 sur la pile d’opérandes)
    pub prefixe: bool,
}

impl OpEmpile {
    pub fn new(op: Op, pos: usize) -> Self {
        OpEmpile {
            op,
            pos,
            prefixe: false,
        }
    }

    pub fn negation(pos: usize) -> Self {
        OpEmpile {
            op: Op::Sub,
            pos,
            prefixe: true,
        }
    }

    pub fn gauche(&self) -> Option<i32> {
        if self.prefixe {
            return Some(GAUCHE_NEGATION);
        }
        self.op.liaison().map(|l| l.gauche)
    }
}

/// Faut-il appliquer le sommet avant d’empiler `entrant` ?
pub fn doit_depiler(sommet: &OpEmpile, entrant: Op) -> bool {
    if sommet.op == Op::LPar {
        return false;
    }

    let (Some(g), Some(d)) = (sommet.gauche(), entrant.liaison().and_then(|l| l.droite)) else {
        return false;
    };

    if entrant == Op::Assign {
        g > d
    } else {
        g >= d
    }
}
