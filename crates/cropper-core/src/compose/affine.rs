/// 2-D affine transform in canvas convention:
///
/// ```text
/// x' = a*x + c*y + e
/// y' = b*x + d*y + f
/// ```
///
/// `translate`, `rotate`, and `scale` post-multiply, so the last call is
/// applied to points first, exactly like a 2D canvas context.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn then(self, m: Affine) -> Affine {
        Affine {
            a: self.a * m.a + self.c * m.b,
            b: self.b * m.a + self.d * m.b,
            c: self.a * m.c + self.c * m.d,
            d: self.b * m.c + self.d * m.d,
            e: self.a * m.e + self.c * m.f + self.e,
            f: self.b * m.e + self.d * m.f + self.f,
        }
    }

    pub fn translate(self, tx: f64, ty: f64) -> Affine {
        self.then(Affine {
            e: tx,
            f: ty,
            ..Affine::IDENTITY
        })
    }

    pub fn scale(self, sx: f64, sy: f64) -> Affine {
        self.then(Affine {
            a: sx,
            d: sy,
            ..Affine::IDENTITY
        })
    }

    /// Rotate by `radians`, clockwise on screen (y axis points down).
    pub fn rotate(self, radians: f64) -> Affine {
        let (sin, cos) = radians.sin_cos();
        self.rotate_sin_cos(sin, cos)
    }

    /// Rotate by whole degrees. Quarter turns use exact sine/cosine so a
    /// full turn composes back to the identity.
    pub fn rotate_degrees(self, degrees: i64) -> Affine {
        match degrees.rem_euclid(360) {
            0 => self,
            90 => self.rotate_sin_cos(1.0, 0.0),
            180 => self.rotate_sin_cos(0.0, -1.0),
            270 => self.rotate_sin_cos(-1.0, 0.0),
            reduced => self.rotate((reduced as f64).to_radians()),
        }
    }

    fn rotate_sin_cos(self, sin: f64, cos: f64) -> Affine {
        self.then(Affine {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        })
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Inverse transform, or `None` when the matrix is singular.
    pub fn invert(&self) -> Option<Affine> {
        let det = self.determinant();
        if det.abs() < 1e-12 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        Some(Affine {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            e: (self.c * self.f - self.d * self.e) * inv,
            f: (self.b * self.e - self.a * self.f) * inv,
        })
    }
}
