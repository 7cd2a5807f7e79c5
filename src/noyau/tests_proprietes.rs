//! Tests de propriétés (campagne) : invariants du noyau sur des familles d’entrées.
//!
//! - idempotence des lectures
//! - lois algébriques à la précision de travail
//! - affectations (chaînées, atomiques)
//! - taxonomie des erreurs sur les cas limites

use std::time::{Duration, Instant};

use super::complexe::Complex;
use super::decimal::Decimal;
use super::erreurs::{CalcError, LexicalError, SemanticError};
use super::eval::{evaluate, Evaluation};
use super::format::{format_complex, FormatConfig};
use super::jetons::scan;
use super::session::{Reponse, Session};
use super::variables::Environnement;

fn eval_env(expr: &str, env: &mut Environnement) -> Result<Evaluation, CalcError> {
    let jetons = scan(expr)?;
    Ok(evaluate(&jetons, env)?)
}

fn eval_ok(expr: &str, env: &mut Environnement) -> Complex {
    eval_env(expr, env)
        .unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
        .valeur
}

fn val(expr: &str) -> Complex {
    eval_ok(expr, &mut Environnement::new())
}

fn erreur(expr: &str) -> CalcError {
    match eval_env(expr, &mut Environnement::new()) {
        Ok(ev) => panic!("expr={expr:?} devait échouer, obtenu {}", ev.valeur),
        Err(e) => e,
    }
}

fn proche(a: &Complex, b: &Complex, eps: &Decimal) -> bool {
    let d = a - b;
    d.re.abs() <= *eps && d.im.abs() <= *eps
}

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/// Petits complexes variés (entiers, décimaux, imaginaires purs).
const VALEURS: [&str; 8] = [
    "(3 + 4i)",
    "(-2.5 + 0.125i)",
    "(7)",
    "(-i)",
    "(0.001 - 12i)",
    "(1e3 + 0.001i)",
    "(-6.75)",
    "(2i)",
];

/* ------------------------ Idempotence ------------------------ */

#[test]
fn prop_lecture_idempotente() {
    let mut env = Environnement::new();
    eval_ok("z = 1.5 - 2i", &mut env);
    let avant = env.clone();

    let a = eval_ok("z * con(z) + mod(z) / 3", &mut env);
    let b = eval_ok("z * con(z) + mod(z) / 3", &mut env);
    assert_eq!(a, b);
    assert_eq!(env, avant);
}

/* ------------------------ Lois algébriques ------------------------ */

#[test]
fn prop_commutativite() {
    for x in VALEURS {
        for y in VALEURS {
            assert_eq!(val(&format!("{x} + {y}")), val(&format!("{y} + {x}")), "{x} {y}");
            assert_eq!(val(&format!("{x} * {y}")), val(&format!("{y} * {x}")), "{x} {y}");
        }
    }
}

#[test]
fn prop_associativite() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    // valeurs courtes : aucun arrondi, l’égalité est exacte
    for x in VALEURS {
        for y in VALEURS {
            for z in ["(1 - i)", "(0.5)", "(-3i)"] {
                budget(t0, max);
                assert_eq!(
                    val(&format!("({x} + {y}) + {z}")),
                    val(&format!("{x} + ({y} + {z})"))
                );
                assert_eq!(
                    val(&format!("({x} * {y}) * {z}")),
                    val(&format!("{x} * ({y} * {z})"))
                );
            }
        }
    }
}

#[test]
fn prop_division_inverse_du_produit() {
    let eps: Decimal = "1e-90".parse().unwrap();
    for z in VALEURS {
        for w in VALEURS {
            let q = val(&format!("({z} / {w}) * {w}"));
            assert!(proche(&q, &val(z), &eps), "({z} / {w}) * {w} = {q}");
        }
    }
}

#[test]
fn prop_division_par_zero_exact() {
    for z in VALEURS {
        for zero in ["0", "(0i)", "(i - i)", "(2 - 2)"] {
            assert!(
                matches!(
                    erreur(&format!("{z} / {zero}")),
                    CalcError::Semantic(SemanticError::DivisionByZero { .. })
                ),
                "{z} / {zero}"
            );
        }
    }
}

#[test]
fn prop_module_et_conjugue() {
    let m = val("mod(3+4i)");
    assert_eq!(m, Complex::reel(Decimal::from(5)));
    assert!(m.im.is_zero());
    assert_eq!(val("con(2-3i)"), val("2+3i"));

    // z * con(z) = mod(z)² (réel)
    let eps: Decimal = "1e-90".parse().unwrap();
    for z in VALEURS {
        let a = val(&format!("{z} * con({z})"));
        let b = val(&format!("mod({z}) * mod({z})"));
        assert!(a.im.is_zero(), "{z}");
        assert!(proche(&a, &b, &eps), "{z} : {a} vs {b}");
    }
}

#[test]
fn prop_precision_decimale() {
    // pas d’erreur binaire : 0.1 + 0.2 == 0.3 exactement
    assert_eq!(val("0.1 + 0.2"), val("0.3"));
    assert_eq!(
        format_complex(&val("1 / 3"), &FormatConfig::default()),
        format!("0.{}", "3".repeat(30))
    );
}

/* ------------------------ Signes ------------------------ */

#[test]
fn prop_signes_unaires() {
    assert_eq!(val("-5i"), val("0 - 5i"));
    assert_eq!(val("3 - -2"), Complex::reel(Decimal::from(5)));
    for x in VALEURS {
        assert_eq!(val(&format!("-{x}")), val(&format!("0 - {x}")), "{x}");
        assert_eq!(val(&format!("+{x}")), val(x), "{x}");
        assert_eq!(val(&format!("--{x}")), val(x), "{x}");
    }
}

/* ------------------------ Affectations ------------------------ */

#[test]
fn prop_affectation_chainee() {
    let mut env = Environnement::new();
    let ev = eval_env("a = b = 3 + 4i", &mut env).unwrap();
    assert!(ev.affectation);
    let attendu = val("3 + 4i");
    assert_eq!(env.lire("a"), Some(&attendu));
    assert_eq!(env.lire("b"), Some(&attendu));
}

#[test]
fn prop_variable_indefinie_puis_definie() {
    let mut env = Environnement::new();
    assert!(matches!(
        eval_env("x + 1", &mut env),
        Err(CalcError::Semantic(SemanticError::UndefinedVariable { .. }))
    ));
    assert!(eval_env("x = 2", &mut env).is_ok());
    assert_eq!(eval_ok("x + 1", &mut env), val("3"));
}

#[test]
fn prop_aucun_commit_partiel() {
    let mut env = Environnement::new();
    eval_ok("a = 1", &mut env);
    let avant = env.clone();

    for ligne in [
        "(a = 5) + 1 / 0",
        "(b = 2) + inconnue",
        "(a = b = 3) * ",
        "(c = 1) = 2",
    ] {
        assert!(eval_env(ligne, &mut env).is_err(), "{ligne:?}");
        assert_eq!(env, avant, "{ligne:?}");
    }
}

/* ------------------------ Parenthèses ------------------------ */

#[test]
fn prop_parentheses() {
    assert_eq!(
        erreur("(1+2"),
        CalcError::Lexical(LexicalError::MismatchedParentheses { pos: 0 })
    );
    assert_eq!(
        erreur("1+2)"),
        CalcError::Lexical(LexicalError::UnmatchedParenthesis { pos: 3 })
    );
}

/* ------------------------ Formatage ------------------------ */

#[test]
fn prop_formatage_de_base() {
    let cfg = FormatConfig::default();
    assert_eq!(format_complex(&val("4"), &cfg), "4");
    assert_eq!(format_complex(&val("0 + 1i"), &cfg), "i");
    assert_eq!(format_complex(&val("0 - 1i"), &cfg), "-i");
}

/* ------------------------ Coût ------------------------ */

#[test]
fn prop_cout_evaluation() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let mut env = Environnement::new();
    eval_ok("a = 3 + 4i", &mut env);

    let jetons = scan("mod(con(a) * (1 - 2i))").unwrap();
    let attendu = val("mod(-5 - 10i)");
    for _ in 0..1000 {
        let ev = evaluate(&jetons, &mut env).unwrap();
        assert_eq!(ev.valeur, attendu);
    }
    budget(t0, max);

    // formatage fixe d’un exposant extrême : coût borné par les chiffres affichés
    let t1 = Instant::now();
    let minuscule = val(&format!("1{}", " / 1e100000".repeat(40)));
    assert_eq!(
        format_complex(&minuscule, &FormatConfig::default()),
        format!("0.{}", "0".repeat(30))
    );
    budget(t1, Duration::from_secs(1));
}

/* ------------------------ Session ------------------------ */

#[test]
fn prop_commandes_sans_effet_sur_les_variables() {
    let mut s = Session::new();
    assert_eq!(s.traiter("u = 1 + i"), Reponse::Affecte);
    assert_eq!(s.traiter("v = u = 2"), Reponse::Affecte);
    let avant = s.env().clone();

    for cmd in ["format sci", "precision 4", "format fixed", "help", "precision -1"] {
        s.traiter(cmd);
        assert_eq!(*s.env(), avant, "{cmd:?}");
    }
    assert_eq!(s.config().digits, 0);
}
