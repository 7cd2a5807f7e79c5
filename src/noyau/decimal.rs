// src/noyau/decimal.rs
//
// Scalaire décimal à précision arbitraire (sans flottants).
// valeur = mantisse × 10^exposant
//
// Forme canonique (tenue par `normaliser`) :
// - au plus PRECISION chiffres significatifs (arrondi demi loin de zéro)
// - mantisse sans zéro final
// - zéro <=> mantisse 0 et exposant 0
// => l’égalité structurelle (derive PartialEq) est l’égalité de valeur.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Pow, Signed, Zero};
use thiserror::Error;

/// Chiffres significatifs de travail.
pub const PRECISION: usize = 100;

/// Garde-fou : exposant maximal accepté dans un littéral.
const EXPOSANT_MAX: u64 = 100_000;

/// Chiffres de garde pour la division (arrondis ensuite à PRECISION).
const GARDE: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("décimal invalide : « {0} »")]
pub struct DecimalInvalide(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantisse: BigInt,
    exposant: i64,
}

/* ------------------------ Outils big int ------------------------ */

pub(crate) fn pow10(n: usize) -> BigInt {
    let dix = BigInt::from(10);
    match u32::try_from(n) {
        Ok(n) => dix.pow(n),
        // au-delà de u32::MAX : exposant en BigUint, jamais tronqué
        Err(_) => Pow::pow(dix, BigUint::from(n)),
    }
}

/// Nombre de chiffres décimaux de |n| (1 pour zéro).
pub(crate) fn nb_chiffres(n: &BigInt) -> usize {
    if n.is_zero() {
        return 1;
    }
    n.magnitude().to_str_radix(10).len()
}

/// n / d arrondi demi loin de zéro (d > 0).
pub(crate) fn arrondi_div(n: &BigInt, d: &BigInt) -> BigInt {
    let q = n / d;
    let r = n - &q * d;
    if (r.abs() << 1) >= *d {
        if n.is_negative() {
            q - BigInt::one()
        } else {
            q + BigInt::one()
        }
    } else {
        q
    }
}

/// Convertit un entier “scalé” (×10^digits) en texte décimal.
/// Un zéro scalé s’affiche sans signe.
pub(crate) fn scaled_to_decimal(scaled: &BigInt, digits: usize) -> String {
    let neg = scaled.is_negative();
    let abs = scaled.abs();

    if digits == 0 {
        return if neg { format!("-{abs}") } else { format!("{abs}") };
    }

    let scale = pow10(digits);
    let int_part = &abs / &scale;
    let frac_part = &abs % &scale;

    let mut frac = frac_part.to_str_radix(10);
    while frac.len() < digits {
        frac.insert(0, '0');
    }

    if neg {
        format!("-{int_part}.{frac}")
    } else {
        format!("{int_part}.{frac}")
    }
}

/// Vérifie la grammaire d’un décimal :
/// [+-]? (chiffres (. chiffres?)? | . chiffres) ([eE] [+-]? chiffres)?
pub fn grammaire_decimale(s: &str) -> bool {
    decouper(s).is_some()
}

/// Découpe un texte décimal en (négatif, entier, fraction, exposant brut).
fn decouper(s: &str) -> Option<(bool, &str, &str, Option<&str>)> {
    let (negatif, reste) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (corps, exp) = match reste.find(|c: char| c == 'e' || c == 'E') {
        Some(p) => (&reste[..p], Some(&reste[p + 1..])),
        None => (reste, None),
    };

    let (entier, frac) = match corps.find('.') {
        Some(p) => (&corps[..p], &corps[p + 1..]),
        None => (corps, ""),
    };

    let chiffres = |t: &str| t.bytes().all(|b| b.is_ascii_digit());
    if entier.is_empty() && frac.is_empty() {
        return None;
    }
    if !chiffres(entier) || !chiffres(frac) {
        return None;
    }

    if let Some(e) = exp {
        let e = e.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(e);
        if e.is_empty() || !chiffres(e) {
            return None;
        }
    }

    Some((negatif, entier, frac, exp))
}

/* ------------------------ Forme canonique ------------------------ */

fn normaliser(mut mantisse: BigInt, mut exposant: i64) -> Decimal {
    if mantisse.is_zero() {
        return Decimal::zero();
    }

    let n = nb_chiffres(&mantisse);
    if n > PRECISION {
        let coupe = n - PRECISION;
        mantisse = arrondi_div(&mantisse, &pow10(coupe));
        exposant = exposant.saturating_add(coupe as i64);
    }

    let dix = BigInt::from(10);
    while (&mantisse % &dix).is_zero() {
        mantisse /= &dix;
        exposant = exposant.saturating_add(1);
    }

    Decimal { mantisse, exposant }
}

impl Decimal {
    pub fn zero() -> Self {
        Decimal {
            mantisse: BigInt::zero(),
            exposant: 0,
        }
    }

    pub fn one() -> Self {
        Decimal {
            mantisse: BigInt::one(),
            exposant: 0,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.mantisse.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.mantisse.is_negative()
    }

    pub fn is_positive(&self) -> bool {
        self.mantisse.is_positive()
    }

    /// Vrai si la valeur est entière (forme canonique : exposant >= 0).
    pub fn est_entier(&self) -> bool {
        self.exposant >= 0
    }

    pub fn abs(&self) -> Decimal {
        Decimal {
            mantisse: self.mantisse.abs(),
            exposant: self.exposant,
        }
    }

    pub(crate) fn mantisse(&self) -> &BigInt {
        &self.mantisse
    }

    pub(crate) fn exposant(&self) -> i64 {
        self.exposant
    }

    /// Position (puissance de 10) juste au-dessus du chiffre de tête.
    fn haut(&self) -> i64 {
        self.exposant
            .saturating_add(nb_chiffres(&self.mantisse) as i64)
    }

    fn ajouter(&self, autre: &Decimal) -> Decimal {
        if self.is_zero() {
            return autre.clone();
        }
        if autre.is_zero() {
            return self.clone();
        }

        // Terme entièrement sous la précision de l’autre : il ne change pas l’arrondi.
        let marge = PRECISION as i64 + 2;
        let ecart = self.haut().saturating_sub(autre.haut());
        if ecart > marge {
            return self.clone();
        }
        if ecart < -marge {
            return autre.clone();
        }

        let (grand, petit) = if self.exposant >= autre.exposant {
            (self, autre)
        } else {
            (autre, self)
        };
        let decalage = (grand.exposant - petit.exposant) as usize;
        let mantisse = &grand.mantisse * pow10(decalage) + &petit.mantisse;
        normaliser(mantisse, petit.exposant)
    }

    fn multiplier(&self, autre: &Decimal) -> Decimal {
        normaliser(
            &self.mantisse * &autre.mantisse,
            self.exposant.saturating_add(autre.exposant),
        )
    }

    /// Division arrondie à PRECISION chiffres ; None si le diviseur est nul.
    pub fn checked_div(&self, diviseur: &Decimal) -> Option<Decimal> {
        if diviseur.is_zero() {
            return None;
        }
        if self.is_zero() {
            return Some(Decimal::zero());
        }

        let decalage = (PRECISION + GARDE + nb_chiffres(&diviseur.mantisse))
            .saturating_sub(nb_chiffres(&self.mantisse));
        let quotient = (&self.mantisse * pow10(decalage)) / &diviseur.mantisse;
        let exposant = self
            .exposant
            .saturating_sub(diviseur.exposant)
            .saturating_sub(decalage as i64);
        Some(normaliser(quotient, exposant))
    }

    /// Racine carrée arrondie à PRECISION chiffres ; None si négatif.
    pub fn sqrt(&self) -> Option<Decimal> {
        if self.is_negative() {
            return None;
        }
        if self.is_zero() {
            return Some(Decimal::zero());
        }

        // m·10^s doit porter au moins 2·(PRECISION+2) chiffres, avec (e - s) pair.
        let mut s = (2 * (PRECISION + 2)).saturating_sub(nb_chiffres(&self.mantisse)) as i64;
        if (self.exposant - s).rem_euclid(2) != 0 {
            s += 1;
        }

        let racine = (&self.mantisse * pow10(s as usize)).sqrt();
        Some(normaliser(racine, (self.exposant - s) / 2))
    }
}

impl From<i64> for Decimal {
    fn from(n: i64) -> Self {
        normaliser(BigInt::from(n), 0)
    }
}

impl FromStr for Decimal {
    type Err = DecimalInvalide;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalide = || DecimalInvalide(s.to_string());
        let (negatif, entier, frac, exp) = decouper(s).ok_or_else(invalide)?;

        let exposant = match exp {
            None => 0,
            Some(e) => e.parse::<i64>().map_err(|_| invalide())?,
        };
        if exposant.unsigned_abs() > EXPOSANT_MAX {
            return Err(invalide());
        }

        let chiffres = format!("{entier}{frac}");
        let mantisse = BigInt::parse_bytes(chiffres.as_bytes(), 10).ok_or_else(invalide)?;
        let mantisse = if negatif { -mantisse } else { mantisse };

        Ok(normaliser(mantisse, exposant - frac.len() as i64))
    }
}

/* ------------------------ Opérateurs ------------------------ */

impl<'a> Add<&'a Decimal> for &'a Decimal {
    type Output = Decimal;
    fn add(self, autre: &'a Decimal) -> Decimal {
        self.ajouter(autre)
    }
}

impl<'a> Sub<&'a Decimal> for &'a Decimal {
    type Output = Decimal;
    fn sub(self, autre: &'a Decimal) -> Decimal {
        self.ajouter(&-autre)
    }
}

impl<'a> Mul<&'a Decimal> for &'a Decimal {
    type Output = Decimal;
    fn mul(self, autre: &'a Decimal) -> Decimal {
        self.multiplier(autre)
    }
}

impl Neg for &Decimal {
    type Output = Decimal;
    fn neg(self) -> Decimal {
        Decimal {
            mantisse: -&self.mantisse,
            exposant: self.exposant,
        }
    }
}

impl Neg for Decimal {
    type Output = Decimal;
    fn neg(self) -> Decimal {
        -&self
    }
}

impl Ord for Decimal {
    fn cmp(&self, autre: &Self) -> Ordering {
        let diff = self - autre;
        if diff.is_zero() {
            Ordering::Equal
        } else if diff.is_negative() {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, autre: &Self) -> Option<Ordering> {
        Some(self.cmp(autre))
    }
}

/// Écriture décimale complète (sans notation scientifique).
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exposant >= 0 {
            let zeros = "0".repeat(self.exposant as usize);
            if self.is_zero() {
                return write!(f, "0");
            }
            write!(f, "{}{zeros}", self.mantisse)
        } else {
            let digits = self.exposant.unsigned_abs() as usize;
            write!(f, "{}", scaled_to_decimal(&self.mantisse, digits))
        }
    }
}
