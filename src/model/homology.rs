use std::f64::consts::PI;

use itertools::izip;
use ndarray::{Array1, ArrayView1};

use super::Profile;
use crate::{constants::PhysicalConstants, equations::ADIABATIC_INDEX};

/// Dimensionless structure coefficients over the interior of a [Profile], as used by stellar
/// oscillation codes. The surface point, where the equation of state no longer holds, is
/// excluded.
#[derive(Debug, Clone)]
pub struct DimensionlessProperties {
    /// Radial coordinate \[R\]
    pub x: Box<[f64]>,
    /// Mass coordinate \[M\]
    pub q: Box<[f64]>,
    /// Negative logarithmic derivative of pressure
    pub v: Box<[f64]>,
    /// Logarithmic derivative of mass coordinate
    pub u: Box<[f64]>,
    /// Inverse average inner density, scaled by overal average density
    pub c1: Box<[f64]>,
    /// First adiabatic exponent
    pub gamma1: Box<[f64]>,
    /// Difference of pressure and density logarithmic derivatives
    pub a_star: Box<[f64]>,
}

/// Derivative on a non-uniform grid, central differences inside and one-sided at the edges
fn gradient(f: ArrayView1<f64>, x: ArrayView1<f64>) -> Array1<f64> {
    let n = f.len();
    let mut out = Array1::zeros(n);

    if n < 2 {
        return out;
    }

    out[0] = (f[1] - f[0]) / (x[1] - x[0]);
    out[n - 1] = (f[n - 1] - f[n - 2]) / (x[n - 1] - x[n - 2]);
    for i in 1..n - 1 {
        out[i] = (f[i + 1] - f[i - 1]) / (x[i + 1] - x[i - 1]);
    }

    out
}

impl Profile {
    /// Squared Brunt–Väisälä frequency over the interior points \[s^-2\]
    pub fn brunt_vaisala(&self, constants: &PhysicalConstants) -> Array1<f64> {
        let n = self.interior_len();
        let r = ArrayView1::from(&self.r_coord[..n]);
        let m = ArrayView1::from(&self.m_coord[..n]);

        let ln_p = ArrayView1::from(&self.p[..n]).mapv(f64::ln);
        let ln_rho = ArrayView1::from(&self.rho[..n]).mapv(f64::ln);
        let dln_p = gradient(ln_p.view(), r);
        let dln_rho = gradient(ln_rho.view(), r);

        let grav = constants.grav * &m / r.mapv(|r| r.powi(2));

        grav * (dln_p / ADIABATIC_INDEX - dln_rho)
    }

    /// Compute the dimensionless coefficients, scaled by the radius and mass at the last retained
    /// point. Points without enclosed mass get their central limits.
    pub fn dimensionless(&self, constants: &PhysicalConstants) -> DimensionlessProperties {
        let n = self.interior_len();
        let radius = self.r_star();
        let mass = self.m_star();

        let r_coord = ArrayView1::from(&self.r_coord[..n]);
        let m_coord = ArrayView1::from(&self.m_coord[..n]);
        let rho = ArrayView1::from(&self.rho[..n]);
        let p = ArrayView1::from(&self.p[..n]);
        let r_cubed = r_coord.mapv(|r| r.powi(3));

        let mut c1 = &r_cubed / radius.powi(3) * mass / m_coord;
        let mut v = constants.grav * &m_coord * rho / (&p * &r_coord);
        let mut u = 4. * PI * &rho * &r_cubed / m_coord;
        let mut a_star = &r_cubed * &self.brunt_vaisala(constants) / (constants.grav * &m_coord);

        for (i, (&m, &rho)) in izip!(m_coord, rho).enumerate() {
            if m == 0. {
                c1[i] = mass / radius.powi(3) * 3. / (4. * PI * rho);
                v[i] = 0.;
                u[i] = 3.;
                a_star[i] = 0.;
            }
        }

        DimensionlessProperties {
            x: (r_coord.to_owned() / radius).to_vec().into(),
            q: (m_coord.to_owned() / mass).to_vec().into(),
            v: v.to_vec().into(),
            u: u.to_vec().into(),
            gamma1: vec![ADIABATIC_INDEX; n].into(),
            c1: c1.to_vec().into(),
            a_star: a_star.to_vec().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;

    use super::*;
    use crate::build_star;

    #[test]
    fn gradient_of_quadratic() {
        let x = array![0., 1., 2., 3.];
        let f = x.mapv(|x: f64| x.powi(2));
        let df = gradient(f.view(), x.view());

        assert_eq!(df, array![1., 2., 4., 5.]);
    }

    #[test]
    fn central_limits() {
        let star = build_star(1.5e7, 1e18, 0.7, 0.28).unwrap();
        let props = star.dimensionless(&PhysicalConstants::cgs());

        assert_eq!(props.x.len(), star.interior_len());
        assert_eq!(props.u[0], 3.);
        assert_eq!(props.v[0], 0.);
        assert_eq!(props.a_star[0], 0.);
        assert!(props.c1[0] > 0.);
    }

    #[test]
    fn interior_values() {
        let star = build_star(1.5e7, 1e18, 0.7, 0.28).unwrap();
        let props = star.dimensionless(&PhysicalConstants::cgs());
        let n = props.x.len();

        assert!(props.x.iter().all(|&x| x > 0. && x < 1.));
        assert!(props.q.windows(2).all(|w| w[1] >= w[0]));
        assert!(props.v[1..].iter().all(|&v| v > 0.));
        assert!(props.u[1..].iter().all(|&u| u > 0.));
        assert!(props.c1.iter().all(|&c1| c1 > 0.));
        assert_relative_eq!(props.q[n - 1], 1., max_relative = 0.05);
    }
}
