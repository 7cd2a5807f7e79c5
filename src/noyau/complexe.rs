// src/noyau/complexe.rs
//
// Complexe à composantes décimales (re, im).
// Aucune opération ne modifie ses opérandes : tout renvoie une nouvelle valeur.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use super::decimal::Decimal;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Complex {
    pub re: Decimal,
    pub im: Decimal,
}

impl Complex {
    pub fn new(re: Decimal, im: Decimal) -> Self {
        Complex { re, im }
    }

    pub fn zero() -> Self {
        Complex::new(Decimal::zero(), Decimal::zero())
    }

    /// Réel pur : (d, 0).
    pub fn reel(d: Decimal) -> Self {
        Complex::new(d, Decimal::zero())
    }

    /// Imaginaire pur : (0, d).
    pub fn imaginaire(d: Decimal) -> Self {
        Complex::new(Decimal::zero(), d)
    }

    pub fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }

    /// con(z) : opposé de la partie imaginaire.
    pub fn conjugue(&self) -> Complex {
        Complex::new(self.re.clone(), -&self.im)
    }

    /// mod(z) : √(re² + im²), rendu comme réel pur (im exactement 0).
    pub fn module(&self) -> Complex {
        let carre = &(&self.re * &self.re) + &(&self.im * &self.im);
        // carre >= 0 : la racine existe toujours
        Complex::reel(carre.sqrt().unwrap_or_else(Decimal::zero))
    }

    /// Division ; None si le diviseur vaut exactement 0 + 0i.
    ///
    /// (a+bi)/(c+di) = ((ac+bd) + (bc−ad)i) / (c²+d²)
    pub fn checked_div(&self, autre: &Complex) -> Option<Complex> {
        let (a, b) = (&self.re, &self.im);
        let (c, d) = (&autre.re, &autre.im);

        let denom = &(c * c) + &(d * d);
        if denom.is_zero() {
            return None;
        }

        let re = &(a * c) + &(b * d);
        let im = &(b * c) - &(a * d);
        Some(Complex::new(re.checked_div(&denom)?, im.checked_div(&denom)?))
    }
}

impl<'a> Add<&'a Complex> for &'a Complex {
    type Output = Complex;
    fn add(self, autre: &'a Complex) -> Complex {
        Complex::new(&self.re + &autre.re, &self.im + &autre.im)
    }
}

impl<'a> Sub<&'a Complex> for &'a Complex {
    type Output = Complex;
    fn sub(self, autre: &'a Complex) -> Complex {
        Complex::new(&self.re - &autre.re, &self.im - &autre.im)
    }
}

/// (a+bi)(c+di) = (ac − bd) + (ad + bc)i
impl<'a> Mul<&'a Complex> for &'a Complex {
    type Output = Complex;
    fn mul(self, autre: &'a Complex) -> Complex {
        let (a, b) = (&self.re, &self.im);
        let (c, d) = (&autre.re, &autre.im);
        Complex::new(&(a * c) - &(b * d), &(a * d) + &(b * c))
    }
}

/// Forme brute (debug / journal) : re+imi, pleine précision.
impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im.is_negative() {
            write!(f, "{}-{}i", self.re, self.im.abs())
        } else {
            write!(f, "{}+{}i", self.re, self.im)
        }
    }
}
