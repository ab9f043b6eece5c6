use serde::{Deserialize, Serialize};

use typenum::{N2, Z0};
use uom::num_traits::Zero;
use uom::si::marker::AngleKind;
use uom::si::{
    angle::radian,
    area::square_meter,
    curvature::radian_per_meter,
    length::meter,
    Quantity, ISQ, SI,
};

/// put angle into [-pi, pi) range
pub fn angle_unwrap(angle: Angle) -> Angle {
    let two_pi = 2.0 * PI;
    let mut wrapped = (angle.get::<radian>() + PI) % two_pi;
    // % keeps the sign of the dividend
    if wrapped < 0.0 {
        wrapped += two_pi;
    }
    Angle::new::<radian>(wrapped - PI)
}

/*
dimension: ISQ<
        N2,     // length
        Z0,     // mass
        Z0,     // time
        Z0,     // electric current
        Z0,     // thermodynamic temperature
        Z0,     // amount of substance
        Z0>;    // luminous intensity
*/
pub type CurvaturePerLength = Quantity<ISQ<N2, Z0, Z0, Z0, Z0, Z0, Z0, dyn AngleKind>, SI<V>, V>;

// TODO(lucasw) need a custom reciprocal_square_meter unit
pub fn curvature_per_meter(val: Float) -> CurvaturePerLength {
    (1.0 / Area::new::<square_meter>(1.0 / val)).into()
}

/// turn CurvaturePerLength into a float
pub fn curvature_per_meter_float(cpl: CurvaturePerLength) -> Float {
    let area: Area = (1.0 / cpl).into();
    1.0 / area.get::<square_meter>()
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: Length,
    pub y: Length,
}

impl Position {
    pub fn from_array_meter(p: [Float; 2]) -> Self {
        Position {
            x: Length::new::<meter>(p[0]),
            y: Length::new::<meter>(p[1]),
        }
    }

    pub fn as_array_meter(&self) -> [Float; 2] {
        [self.x.get::<meter>(), self.y.get::<meter>()]
    }

    pub fn distance(&self, other: &Position) -> Length {
        let dx = other.x.get::<meter>() - self.x.get::<meter>();
        let dy = other.y.get::<meter>() - self.y.get::<meter>();
        Length::new::<meter>(sqrt(dx * dx + dy * dy))
    }
}

/// A curve whose curvature changes linearly with arc length.
///
/// theta(s) = theta0 + kappa0 * s + 1/2 * dk * s^2
#[derive(Debug, Clone, PartialEq)]
pub struct Clothoid {
    /// start point xy
    pub xy0: Position,
    /// start point theta/yaw/heading
    pub theta0: Angle,
    kappa0: Curvature,      // start point curvature 1/r
    dk: CurvaturePerLength, // curvature rate, how much curvature changes per unit length
    pub length: Length,     // how long the curve is (end kappa will be kappa0 + length * dk)
}

impl Default for Clothoid {
    fn default() -> Self {
        Self {
            xy0: Position::default(),
            theta0: Angle::zero(),
            kappa0: Curvature::zero(),
            dk: CurvaturePerLength::zero(),
            length: Length::zero(),
        }
    }
}

/*
// Rational approximation coefficients for the fresnel cosine and sine integrals.
//
// Adapted from:
// Atlas for computing mathematical functions : an illustrated guide for
// practitioners, with programs in C and Mathematica / William J. Thompson.
// New York : Wiley, c1997.
//
// Author: Venkata Sivakanth Telasula
// email: sivakanth.telasula@gmail.com
// date: August 11, 2005
*/
#[allow(clippy::excessive_precision)]
const FRN: &[Float] = &[
    0.49999988085884732562,
    1.3511177791210715095,
    1.3175407836168659241,
    1.1861149300293854992,
    0.7709627298888346769,
    0.4173874338787963957,
    0.19044202705272903923,
    0.06655998896627697537,
    0.022789258616785717418,
    0.0040116689358507943804,
    0.0012192036851249883877,
];

#[allow(clippy::excessive_precision)]
const FRD: &[Float] = &[
    1.0,
    2.7022305772400260215,
    4.2059268151438492767,
    4.5221882840107715516,
    3.7240352281630359588,
    2.4589286254678152943,
    1.3125491629443702962,
    0.5997685720120932908,
    0.20907680750378849485,
    0.07159621634657901433,
    0.012602969513793714191,
    0.0038302423512931250065,
];

#[allow(clippy::excessive_precision)]
const GN: &[Float] = &[
    0.50000014392706344801,
    0.032346434925349128728,
    0.17619325157863254363,
    0.038606273170706486252,
    0.023693692309257725361,
    0.007092018516845033662,
    0.0012492123212412087428,
    0.00044023040894778468486,
    -8.80266827476172521e-6,
    -1.4033554916580018648e-8,
    2.3509221782155474353e-10,
];

#[allow(clippy::excessive_precision)]
const GD: &[Float] = &[
    1.0,
    2.0646987497019598937,
    2.9109311766948031235,
    2.6561936751333032911,
    2.0195563983177268073,
    1.1167891129189363902,
    0.57267874755973172715,
    0.19408481169593070798,
    0.07634808341431248904,
    0.011573247407207865977,
    0.0044099273693067311209,
    -0.00009070958410429993314,
];

/// Normalized Fresnel integrals, adapted from ebertolazzi/Clothoids Fresnel.cc
///
/// C(y) = int_0^y cos(pi/2 t^2) dt, S(y) = int_0^y sin(pi/2 t^2) dt
///
/// | y   | C(y)       | S(y)       |
/// |-----|------------|------------|
/// | 0.5 | 0.49234423 | 0.06473243 |
/// | 1.0 | 0.77989340 | 0.43825915 |
/// | 2.0 | 0.48825341 | 0.34341568 |
pub fn fresnel_cs(y: Float) -> (Float, Float) {
    let eps = 1E-15;
    let x = y.abs();

    let mut c_value: Float;
    let mut s_value: Float;

    if x < 1.0 {
        let s = FRAC_PI_2 * (x * x);
        let t = -s * s;

        // Cosine integral series
        {
            let mut twofn = 0.0;
            let mut fact = 1.0;
            let mut denterm = 1.0;
            let mut numterm = 1.0;
            let mut sum: Float = 1.0;
            loop {
                twofn += 2.0;
                fact *= twofn * (twofn - 1.0);
                denterm += 4.0;
                numterm *= t;
                let term = numterm / (fact * denterm);
                sum += term;
                if term.abs() <= eps * sum.abs() {
                    break;
                }
            }

            c_value = x * sum;
        }

        // Sine integral series
        {
            let mut twofn = 1.0;
            let mut fact = 1.0;
            let mut denterm = 3.0;
            let mut numterm = 1.0;
            let mut sum: Float = numterm / denterm;
            loop {
                twofn += 2.0;
                fact *= twofn * (twofn - 1.0);
                denterm += 4.0;
                numterm *= t;
                let term = numterm / (fact * denterm);
                sum += term;
                if term.abs() <= (eps * sum.abs()) {
                    break;
                }
            }

            s_value = FRAC_PI_2 * sum * (x * x * x);
        }
    } else if x < 6.0 {
        // Rational approximation for f
        let f: Float;
        {
            let mut sumn = 0.0;
            let mut sumd = FRD[11];
            for k in (0..=10).rev() {
                sumn = FRN[k] + x * sumn;
                sumd = FRD[k] + x * sumd;
            }
            f = sumn / sumd;
        }

        // Rational approximation for g
        let g: Float;
        {
            let mut sumn = 0.0;
            let mut sumd = GD[11];
            for k in (0..=10).rev() {
                sumn = GN[k] + x * sumn;
                sumd = GD[k] + x * sumd;
            }
            g = sumn / sumd;
        }

        let u_value = FRAC_PI_2 * (x * x);
        let sin_u = sin(u_value);
        let cos_u = cos(u_value);
        c_value = 0.5 + f * sin_u - g * cos_u;
        s_value = 0.5 - f * cos_u - g * sin_u;
    } else {
        // x >= 6; asymptotic expansions for  f  and  g
        let s = PI * x * x;
        let t = -1.0 / (s * s);

        // Expansion for f
        let mut numterm = -1.0;
        let mut term = 1.0;
        let mut sum = 1.0;
        let eps10 = 0.1 * eps;

        loop {
            numterm += 4.0;
            term *= numterm * (numterm - 2.0) * t;
            sum += term;
            if term.abs() <= eps10 * sum.abs() {
                break;
            }
        }

        let f = sum / (PI * x);

        //  Expansion for  g
        numterm = -1.0;
        term = 1.0;
        sum = 1.0;

        loop {
            numterm += 4.0;
            term *= numterm * (numterm + 2.0) * t;
            sum += term;
            if term.abs() <= eps10 * sum.abs() {
                break;
            }
        }

        let g0 = PI * x;
        let g = sum / (g0 * g0 * x);

        let u_value = FRAC_PI_2 * (x * x);
        let sin_u = sin(u_value);
        let cos_u = cos(u_value);
        c_value = 0.5 + f * sin_u - g * cos_u;
        s_value = 0.5 - f * cos_u - g * sin_u;
    }
    if y < 0.0 {
        c_value = -c_value;
        s_value = -s_value;
    }

    (c_value, s_value)
}

fn lommel_reduced(mu: Float, nu: Float, b: Float) -> Float {
    let mut tmp = 1.0 / ((mu + nu + 1.0) * (mu - nu + 1.0));
    let mut res = tmp;
    for n in 1..=100 {
        let nf = n as Float;
        tmp *= (-b / (2.0 * nf + mu - nu + 1.0)) * (b / (2.0 * nf + mu + nu + 1.0));
        res += tmp;
        if tmp.abs() < (res.abs() * 1e-50) {
            break;
        }
    }
    res
}

/// moments int_0^1 t^k cos(b t) dt and int_0^1 t^k sin(b t) dt for k in 0..nk
fn eval_xyazero(nk: usize, b: Float) -> ([Float; 43], [Float; 43]) {
    let mut x: [Float; 43] = [0.0; 43];
    let mut y: [Float; 43] = [0.0; 43];
    let sb = sin(b);
    let cb = cos(b);
    let b2 = b * b;
    let threshold = 1e-3;
    if b.abs() < threshold {
        x[0] = 1.0 - (b2 / 6.0) * (1.0 - (b2 / 20.0) * (1.0 - (b2 / 42.0)));
        y[0] = (b / 2.0) * (1.0 - (b2 / 12.0) * (1.0 - (b2 / 30.0)));
    } else {
        x[0] = sb / b;
        y[0] = (1.0 - cb) / b;
    }
    // use recurrence in the stable part
    let mut m = floor(2.0 * b) as usize;
    if m >= nk {
        m = nk - 1;
    }
    if m < 1 {
        m = 1;
    }
    for k in 1..m {
        let kf = k as Float;
        x[k] = (sb - kf * y[k - 1]) / b;
        y[k] = (kf * x[k - 1] - cb) / b;
    }
    //  use Lommel for the unstable part
    if m < nk {
        let a = b * sb;
        let d = sb - b * cb;
        let b = b * d;
        let c = -b2 * sb;
        let m_offset = m as Float + 0.5;
        let mut r_la = lommel_reduced(m_offset, 1.5, b);
        let mut r_ld = lommel_reduced(m_offset, 0.5, b);
        for k in m..nk {
            let kf = k as Float;
            let k_offset = kf + 1.5;
            let r_lb = lommel_reduced(k_offset, 0.5, b);
            let r_lc = lommel_reduced(k_offset, 1.5, b);
            x[k] = (kf * a * r_la + b * r_lb + cb) / (1.0 + kf);
            y[k] = (c * r_lc + sb) / (2.0 + kf) + d * r_ld;
            r_la = r_lc;
            r_ld = r_lb;
        }
    }

    (x, y)
}

fn eval_xy_a_small(a: Float, b: Float, p: usize) -> (Float, Float) {
    let nkk = 4 * p + 3; // max 43
    let (x0, y0) = eval_xyazero(nkk, b);

    let mut x = x0[0] - (a / 2.0) * y0[2];
    let mut y = y0[0] + (a / 2.0) * x0[2];

    let mut t = 1.0;
    let aa = -a * a / 4.0;
    for n in 1..=p {
        t *= aa / ((2 * n * (2 * n - 1)) as Float);
        let bf = a / ((4 * n + 2) as Float);
        let jj = 4 * n;
        x += t * (x0[jj] - bf * y0[jj + 2]);
        y += t * (y0[jj] + bf * x0[jj + 2]);
    }
    (x, y)
}

fn eval_xy_a_large(a: Float, b: Float) -> (Float, Float) {
    let s = a.signum();
    let absa = a.abs();
    let m_1_sqrt_pi = FRAC_2_SQRT_PI * 0.5;
    let z = m_1_sqrt_pi * sqrt(absa);
    let ell = s * b * m_1_sqrt_pi / sqrt(absa);
    let g = -0.5 * s * (b * b) / absa;
    let cg = cos(g) / z;
    let sg = sin(g) / z;

    let (cl, sl) = fresnel_cs(ell);
    let (cz, sz) = fresnel_cs(ell + z);

    let d_c0 = cz - cl;
    let d_s0 = sz - sl;

    let x = cg * d_c0 - s * sg * d_s0;
    let y = sg * d_c0 + s * cg * d_s0;

    (x, y)
}

/// Generalized Fresnel integrals
///
/// X(a, b, c) = int_0^1 cos(a/2 t^2 + b t + c) dt
/// Y(a, b, c) = int_0^1 sin(a/2 t^2 + b t + c) dt
///
/// A clothoid of length L starting at heading c reaches
/// (x0 + L * X(dk L^2, kappa0 L, c), y0 + L * Y(dk L^2, kappa0 L, c)).
pub fn generalized_fresnel_cs(a: Float, b: Float, c: Angle) -> (Float, Float) {
    let threshold = 0.01;
    let a_series_size = 3;
    let (xx, yy) = if a.abs() < threshold {
        eval_xy_a_small(a, b, a_series_size)
    } else {
        eval_xy_a_large(a, b)
    };

    let cosc = cos(c.get::<radian>());
    let sinc = sin(c.get::<radian>());

    let int_c = xx * cosc - yy * sinc;
    let int_s = xx * sinc + yy * cosc;

    (int_c, int_s)
}

impl Clothoid {
    pub fn create(
        x0: Length,
        y0: Length,
        theta0: Angle,
        curvature0: Curvature,
        curvature_rate: CurvaturePerLength,
        length: Length,
    ) -> Self {
        Self {
            xy0: Position { x: x0, y: y0 },
            theta0: angle_unwrap(theta0),
            kappa0: curvature0,
            dk: curvature_rate,
            length,
        }
    }

    pub fn curvature(&self) -> Curvature {
        self.kappa0
    }

    pub fn curvature_rate(&self) -> CurvaturePerLength {
        self.dk
    }

    // s is length along the curve, x and y will be in same units
    pub fn get_xy(&self, s: Length) -> Position {
        let s_m = s.get::<meter>();
        let (f_c, f_s) = generalized_fresnel_cs(
            curvature_per_meter_float(self.dk) * s_m * s_m,
            self.kappa0.get::<radian_per_meter>() * s_m,
            self.theta0,
        );
        let x = self.xy0.x + s * f_c;
        let y = self.xy0.y + s * f_s;
        Position { x, y }
    }

    /// heading at s, not wrapped, so the total turning of the curve is preserved
    pub fn theta_at(&self, s: Length) -> Angle {
        let s_m = s.get::<meter>();
        let kappa0 = self.kappa0.get::<radian_per_meter>();
        let dk = curvature_per_meter_float(self.dk);
        self.theta0 + Angle::new::<radian>(s_m * (kappa0 + 0.5 * dk * s_m))
    }

    /// curvature changes linearly with curvature_rate
    pub fn curvature_at(&self, s: Length) -> Curvature {
        let dk = curvature_per_meter_float(self.dk);
        self.kappa0 + Curvature::new::<radian_per_meter>(dk * s.get::<meter>())
    }

    /// get a new Clothoid at this location along the current one
    pub fn get_clothoid(&self, s: Length) -> Self {
        let xy_s = self.get_xy(s);
        let theta_s = self.theta_at(s);
        Self {
            xy0: xy_s,
            theta0: angle_unwrap(theta_s),
            kappa0: self.curvature_at(s),
            dk: self.dk, // curvature rate is constant through the clothoid segment
            length: self.length - s,
        }
    }

    pub fn get_end_clothoid(&self) -> Self {
        self.get_clothoid(self.length)
    }

    pub fn end_theta(&self) -> Angle {
        self.theta_at(self.length)
    }

    pub fn end_curvature(&self) -> Curvature {
        self.curvature_at(self.length)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use std::format;

    fn quarter_circle(radius: Float) -> Clothoid {
        let curvature = Curvature::new::<radian_per_meter>(1.0 / radius);
        let length = Length::new::<meter>(FRAC_PI_2 * radius);
        Clothoid::create(
            Length::zero(),
            Length::zero(),
            Angle::zero(),
            curvature,
            CurvaturePerLength::zero(),
            length,
        )
    }

    #[test]
    fn fresnel_table() {
        let (c, s) = fresnel_cs(1.0);
        assert!((c - 0.7798934).abs() < 1e-5, "{c}");
        assert!((s - 0.4382591).abs() < 1e-5, "{s}");
        let (c, s) = fresnel_cs(-2.0);
        assert!((c + 0.4882534).abs() < 1e-5, "{c}");
        assert!((s + 0.3434157).abs() < 1e-5, "{s}");
    }

    #[test]
    fn angle_unwrap_negative() {
        let wrapped = angle_unwrap(Angle::new::<radian>(-1.5 * PI)).get::<radian>();
        assert!((wrapped - 0.5 * PI).abs() < 1e-4, "{wrapped}");
        let wrapped = angle_unwrap(Angle::new::<radian>(2.5 * PI)).get::<radian>();
        assert!((wrapped - 0.5 * PI).abs() < 1e-4, "{wrapped}");
    }

    #[test]
    fn quarter_circle_end() {
        let c0 = quarter_circle(2.0);
        let end = c0.get_xy(c0.length);
        assert!((end.x.get::<meter>() - 2.0).abs() < 1e-4, "{end:?}");
        assert!((end.y.get::<meter>() - 2.0).abs() < 1e-4, "{end:?}");
        assert!((c0.end_theta().get::<radian>() - FRAC_PI_2).abs() < 1e-4);
    }

    #[test]
    fn straight_when_no_curvature() {
        let c0 = Clothoid::create(
            Length::new::<meter>(1.0),
            Length::new::<meter>(-1.0),
            Angle::new::<radian>(FRAC_PI_2),
            Curvature::zero(),
            CurvaturePerLength::zero(),
            Length::new::<meter>(3.0),
        );
        let end = c0.get_xy(c0.length);
        assert!((end.x.get::<meter>() - 1.0).abs() < 1e-4, "{end:?}");
        assert!((end.y.get::<meter>() - 2.0).abs() < 1e-4, "{end:?}");
    }

    #[test]
    fn curvatures() {
        // start straight, reach curvature 1.0 after 2 meters
        let rate = curvature_per_meter(0.5);
        let length = Length::new::<meter>(2.0);
        let clothoid0 = Clothoid::create(
            Length::zero(),
            Length::zero(),
            Angle::zero(),
            Curvature::zero(),
            rate,
            length,
        );

        let clothoid1 = clothoid0.get_end_clothoid();
        assert!(clothoid0.curvature_rate() == clothoid1.curvature_rate());

        let msg = format!(
            "{:?} -> {:?} at rate {:?}",
            clothoid0.curvature(),
            clothoid1.curvature(),
            clothoid0.curvature_rate()
        );
        let end_curvature = clothoid1.curvature().get::<radian_per_meter>();
        assert!((end_curvature - 1.0).abs() < 1e-4, "{}", msg);
        // theta = 1/2 * dk * s^2
        assert!((clothoid0.end_theta().get::<radian>() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn small_and_large_series_agree() {
        // either side of the series threshold should give nearly the same integral
        let (c_small, s_small) = generalized_fresnel_cs(0.0099, 0.7, Angle::zero());
        let (c_large, s_large) = generalized_fresnel_cs(0.0101, 0.7, Angle::zero());
        assert!((c_small - c_large).abs() < 1e-3);
        assert!((s_small - s_large).abs() < 1e-3);
    }
}
