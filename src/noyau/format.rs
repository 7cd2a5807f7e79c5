// src/noyau/format.rs

use num_bigint::BigInt;
use num_traits::Zero;

use super::complexe::Complex;
use super::decimal::{arrondi_div, nb_chiffres, pow10, scaled_to_decimal, Decimal};

/// Plafond de `digits` accepté par la session.
pub const DIGITS_MAX: u32 = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatConfig {
    pub scientifique: bool,
    /// chiffres après la virgule (fixe) ou après le premier chiffre (sci)
    pub digits: u32,
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig {
            scientifique: false,
            digits: 30,
        }
    }
}

/* ------------------------ Scalaires ------------------------ */

/// mantisse × 10^(exposant + digits), arrondi demi loin de zéro.
fn scaled(d: &Decimal, digits: usize) -> BigInt {
    let decalage = d.exposant().saturating_add(digits as i64);
    if decalage >= 0 {
        return d.mantisse() * pow10(decalage as usize);
    }

    // |mantisse| < 10^n : sous 10^-(n+1) le résultat est < 0.01, arrondi à 0
    if decalage < -(nb_chiffres(d.mantisse()) as i64 + 1) {
        return BigInt::zero();
    }
    arrondi_div(d.mantisse(), &pow10(decalage.unsigned_abs() as usize))
}

fn format_fixe(d: &Decimal, digits: usize) -> String {
    if d.est_entier() {
        return d.to_string();
    }
    scaled_to_decimal(&scaled(d, digits), digits)
}

/// d.ddd…e±XX (exposant sur deux chiffres au moins)
fn format_sci(d: &Decimal, digits: usize) -> String {
    if d.is_zero() {
        return format!("{}e+00", scaled_to_decimal(&BigInt::from(0), digits));
    }

    let m = d.mantisse();
    let n = nb_chiffres(m);
    let voulus = digits + 1;
    let mut exp10 = d.exposant() + n as i64 - 1;

    let mut chiffres = if n > voulus {
        arrondi_div(m, &pow10(n - voulus))
    } else {
        m * pow10(voulus - n)
    };

    // 9.99… arrondi en 10.0…
    if nb_chiffres(&chiffres) > voulus {
        chiffres /= BigInt::from(10);
        exp10 += 1;
    }

    let signe = if exp10 < 0 { '-' } else { '+' };
    format!(
        "{}e{signe}{:02}",
        scaled_to_decimal(&chiffres, digits),
        exp10.unsigned_abs()
    )
}

pub fn format_decimal(d: &Decimal, config: &FormatConfig) -> String {
    let digits = config.digits as usize;
    if config.scientifique {
        format_sci(d, digits)
    } else {
        format_fixe(d, digits)
    }
}

/* ------------------------ Complexes ------------------------ */

/// Partie imaginaire suivie de `i`, coefficient 1 omis.
fn format_imaginaire(im: &Decimal, config: &FormatConfig) -> String {
    if *im == Decimal::one() {
        return "i".to_string();
    }
    if *im == -Decimal::one() {
        return "-i".to_string();
    }
    format!("{}i", format_decimal(im, config))
}

/// Rendu d’un résultat : "4", "i", "-2.5i", "3 - 4i"…
pub fn format_complex(z: &Complex, config: &FormatConfig) -> String {
    if z.im.is_zero() {
        return format_decimal(&z.re, config);
    }
    if z.re.is_zero() {
        return format_imaginaire(&z.im, config);
    }

    let signe = if z.im.is_negative() { " - " } else { " + " };
    format!(
        "{}{signe}{}",
        format_decimal(&z.re, config),
        format_imaginaire(&z.im.abs(), config)
    )
}

/// `precision N` : négatifs ramenés à 0, plafond [`DIGITS_MAX`].
pub fn borner_digits(n: i64) -> u32 {
    n.clamp(0, DIGITS_MAX as i64) as u32
}
