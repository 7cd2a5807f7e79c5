//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - expressions bien formées : seules erreurs admises = division par zéro
//! - entrées poubelle : jamais de panique, positions d’erreur dans la ligne

use std::time::{Duration, Instant};

use super::erreurs::{CalcError, SemanticError};
use super::session::{Reponse, Session};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    let entier = rng.pick(13);
    let base = match rng.pick(4) {
        0 => format!("{entier}"),
        1 => format!("{entier}.{}", rng.pick(1000)),
        2 => format!(".{}", rng.pick(100)),
        _ => format!("{entier}e{}", rng.pick(4)),
    };
    if rng.pick(3) == 0 {
        format!("{base}i")
    } else {
        base
    }
}

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 | 1 | 2 => gen_nombre(rng),
        3 => "i".to_string(),
        4 => "a".to_string(), // défini avant la campagne
        _ => format!("-{}", gen_nombre(rng)),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    match rng.pick(9) {
        0 => gen_atom(rng),
        1 => format!(
            "({} + {})",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
        2 => format!(
            "({} - {})",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
        3 => format!(
            "{} * {}",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
        4 => format!(
            "({}) / ({})",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
        5 => format!("con({})", gen_expr(rng, depth - 1)),
        6 => format!("mod({})", gen_expr(rng, depth - 1)),
        7 => format!("-({})", gen_expr(rng, depth - 1)),
        _ => {
            // zéro exact caché : la division doit échouer proprement
            if rng.coin() {
                "(1 / (i - i))".to_string()
            } else {
                "(2 / 0)".to_string()
            }
        }
    }
}

/// Ligne poubelle : mélange de fragments valides et de caractères hors grammaire.
fn gen_poubelle(rng: &mut Rng) -> String {
    const MORCEAUX: [&str; 22] = [
        "1", "2.5", ".", "e", "i", "(", ")", "=", "+", "-", "*", "/", " ", "con", "mod", "x",
        "_", "$", "é", "1e", "a", "9i",
    ];
    let n = 1 + rng.pick(12) as usize;
    (0..n)
        .map(|_| MORCEAUX[rng.pick(MORCEAUX.len() as u32) as usize])
        .collect()
}

fn session_fuzz() -> Session {
    let mut s = Session::new();
    assert_eq!(s.traiter("a = 1.5 - 2i"), Reponse::Affecte);
    s
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_expressions_bien_formees() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);

    let mut rng = Rng::new(0xC0FFEE_u64);
    let mut s = session_fuzz();

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..120 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);

        match s.traiter(&expr) {
            Reponse::Valeur(_) => seen_ok += 1,
            Reponse::Erreur(CalcError::Semantic(SemanticError::DivisionByZero { .. })) => {
                seen_err += 1
            }
            autre => panic!("réponse non attendue: expr={expr:?} -> {autre:?}"),
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 10, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_determinisme() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    // Même seed => mêmes expressions => mêmes sorties
    let passe = || {
        let mut rng = Rng::new(0xBADC0DE_u64);
        let mut s = session_fuzz();
        (0..40)
            .map(|_| {
                budget(t0, max);
                s.traiter(&gen_expr(&mut rng, 3))
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(passe(), passe());
}

#[test]
fn fuzz_safe_entrees_poubelle() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let mut rng = Rng::new(0x5EED_u64);
    let mut s = session_fuzz();
    let mut seen_err = 0usize;

    for _ in 0..400 {
        budget(t0, max);

        let ligne = gen_poubelle(&mut rng);
        if let Reponse::Erreur(e) = s.traiter(&ligne) {
            if let Some(pos) = e.pos() {
                assert!(pos < ligne.len(), "pos hors ligne: {ligne:?} -> {e:?}");
                assert!(ligne.is_char_boundary(pos), "pos hors caractère: {ligne:?}");
            }
            seen_err += 1;
        }
    }

    // la variable de départ survit : les échecs ne committent rien
    assert!(s.variables().iter().any(|(nom, _)| nom == "a"));
    assert!(seen_err > 100, "trop peu d’erreurs: {seen_err}");
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let expr = somme_balancee("0.5", 800);
    let mut s = Session::new();
    let r = s.traiter(&expr);
    budget(t0, max);

    // 800 * 0.5 = 400
    assert_eq!(r, Reponse::Valeur("400".to_string()));
}

#[test]
fn fuzz_safe_imbrication_profonde() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    // évaluation itérative : pas de récursion, donc pas de débordement de pile
    let n = 5000;
    let expr = format!("{}1 + i{}", "(".repeat(n), ")".repeat(n));
    let mut s = Session::new();
    let r = s.traiter(&expr);
    budget(t0, max);

    assert_eq!(r, Reponse::Valeur("1 + i".to_string()));

    let expr = format!("{}2i", "-".repeat(1001));
    assert_eq!(s.traiter(&expr), Reponse::Valeur("-2i".to_string()));
}
