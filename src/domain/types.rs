//! Shared domain types.
//!
//! Configuration types (`PhysicalConstants`, `RegimeBoundaries`, `DensityParams`,
//! `CorrectionParams`) are immutable once built and can only be built through a
//! validating constructor, including when deserialized from JSON. Everything the
//! evaluator produces (`EvaluationResult`, `Comparison`) is a pure function of a
//! record plus that configuration.

use serde::{Deserialize, Serialize};

use crate::error::{SegError, SegResult};

/// Gravitational constant [m³/(kg·s²)] (CODATA 2018).
pub const G: f64 = 6.67430e-11;
/// Speed of light [m/s].
pub const C: f64 = 299_792_458.0;
/// Solar mass [kg].
pub const M_SUN: f64 = 1.98847e30;
/// Golden ratio φ = (1 + √5) / 2.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Fundamental scalars shared by every computation in a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawConstants")]
pub struct PhysicalConstants {
    g: f64,
    c: f64,
    m_sun: f64,
    phi: f64,
}

#[derive(Deserialize)]
#[serde(default)]
struct RawConstants {
    g: f64,
    c: f64,
    m_sun: f64,
    phi: f64,
}

impl TryFrom<RawConstants> for PhysicalConstants {
    type Error = SegError;

    fn try_from(raw: RawConstants) -> Result<Self, Self::Error> {
        PhysicalConstants::new(raw.g, raw.c, raw.m_sun, raw.phi)
    }
}

impl PhysicalConstants {
    pub fn new(g: f64, c: f64, m_sun: f64, phi: f64) -> SegResult<Self> {
        for (name, value) in [("g", g), ("c", c), ("m_sun", m_sun), ("phi", phi)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SegError::config(format!(
                    "constant {name} must be finite and > 0, got {value}"
                )));
            }
        }
        Ok(Self { g, c, m_sun, phi })
    }

    pub fn g(&self) -> f64 {
        self.g
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn m_sun(&self) -> f64 {
        self.m_sun
    }

    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// Reference radius `r_s = 2GM/c²` for a mass in kilograms.
    pub fn schwarzschild_radius(&self, mass_kg: f64) -> SegResult<f64> {
        if !(mass_kg.is_finite() && mass_kg > 0.0) {
            return Err(SegError::input(format!(
                "mass must be finite and > 0 kg, got {mass_kg}"
            )));
        }
        Ok(2.0 * self.g * mass_kg / (self.c * self.c))
    }
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            g: G,
            c: C,
            m_sun: M_SUN,
            phi: PHI,
        }
    }
}

/// One of the five radius bands, ordered from the reference radius outwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Innermost band, below the blend start. Near-field formula.
    VeryClose,
    /// Between blend start and blend end. Quintic blend of both formulas.
    Blended,
    /// Mid-field band nearest the blend zone.
    PhotonSphere,
    /// Mid-field band up to the far-field boundary.
    Strong,
    /// Far field. The mass correction is forced to zero here.
    Weak,
}

impl Regime {
    pub const ALL: [Regime; 5] = [
        Regime::VeryClose,
        Regime::Blended,
        Regime::PhotonSphere,
        Regime::Strong,
        Regime::Weak,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Regime::VeryClose => "very_close",
            Regime::Blended => "blended",
            Regime::PhotonSphere => "photon_sphere",
            Regime::Strong => "strong",
            Regime::Weak => "weak",
        }
    }

    pub fn is_far_field(self) -> bool {
        self == Regime::Weak
    }
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Four strictly increasing thresholds on the normalized radius.
///
/// Regimes are the half-open intervals they delimit:
/// `(0, blend_low)`, `[blend_low, blend_high)`, `[blend_high, mid_field)`,
/// `[mid_field, far_field)`, `[far_field, ∞)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBoundaries")]
pub struct RegimeBoundaries {
    blend_low: f64,
    blend_high: f64,
    mid_field: f64,
    far_field: f64,
}

#[derive(Deserialize)]
#[serde(default)]
struct RawBoundaries {
    blend_low: f64,
    blend_high: f64,
    mid_field: f64,
    far_field: f64,
}

impl TryFrom<RawBoundaries> for RegimeBoundaries {
    type Error = SegError;

    fn try_from(raw: RawBoundaries) -> Result<Self, Self::Error> {
        RegimeBoundaries::new(raw.blend_low, raw.blend_high, raw.mid_field, raw.far_field)
    }
}

impl RegimeBoundaries {
    pub const DEFAULT_BLEND_LOW: f64 = 1.8;
    pub const DEFAULT_BLEND_HIGH: f64 = 2.2;
    pub const DEFAULT_MID_FIELD: f64 = 3.0;
    pub const DEFAULT_FAR_FIELD: f64 = 10.0;

    pub fn new(blend_low: f64, blend_high: f64, mid_field: f64, far_field: f64) -> SegResult<Self> {
        let thresholds = [blend_low, blend_high, mid_field, far_field];
        if thresholds.iter().any(|t| !(t.is_finite() && *t > 0.0)) {
            return Err(SegError::config(format!(
                "regime thresholds must be finite and > 0, got {thresholds:?}"
            )));
        }
        // Strictly increasing thresholds make the blend interval disjoint from
        // both neighbours by construction.
        if !thresholds.windows(2).all(|w| w[0] < w[1]) {
            return Err(SegError::config(format!(
                "regime thresholds must be strictly increasing, got {thresholds:?}"
            )));
        }
        Ok(Self {
            blend_low,
            blend_high,
            mid_field,
            far_field,
        })
    }

    pub fn blend_low(&self) -> f64 {
        self.blend_low
    }

    pub fn blend_high(&self) -> f64 {
        self.blend_high
    }

    pub fn mid_field(&self) -> f64 {
        self.mid_field
    }

    pub fn far_field(&self) -> f64 {
        self.far_field
    }

    /// Thresholds in ascending order.
    pub fn thresholds(&self) -> [f64; 4] {
        [self.blend_low, self.blend_high, self.mid_field, self.far_field]
    }
}

impl Default for RegimeBoundaries {
    fn default() -> Self {
        Self {
            blend_low: Self::DEFAULT_BLEND_LOW,
            blend_high: Self::DEFAULT_BLEND_HIGH,
            mid_field: Self::DEFAULT_MID_FIELD,
            far_field: Self::DEFAULT_FAR_FIELD,
        }
    }
}

/// Parameters of the segment density function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDensity")]
pub struct DensityParams {
    ceiling: f64,
}

#[derive(Deserialize)]
#[serde(default)]
struct RawDensity {
    ceiling: f64,
}

impl TryFrom<RawDensity> for DensityParams {
    type Error = SegError;

    fn try_from(raw: RawDensity) -> Result<Self, Self::Error> {
        DensityParams::new(raw.ceiling)
    }
}

impl DensityParams {
    pub fn new(ceiling: f64) -> SegResult<Self> {
        if !(ceiling.is_finite() && ceiling > 0.0 && ceiling <= 1.0) {
            return Err(SegError::config(format!(
                "density ceiling must be in (0, 1], got {ceiling}"
            )));
        }
        Ok(Self { ceiling })
    }

    /// Saturation value `ξ_max` of the near-field branch; no density exceeds it.
    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }
}

impl Default for DensityParams {
    fn default() -> Self {
        Self { ceiling: 1.0 }
    }
}

/// Calibration of the mass-dependent redshift correction Δ(M).
///
/// `Δ(M) = (amplitude · exp(−decay · r_s) + offset) · norm(M)` in percent, where
/// `norm` maps `log10(M / kg)` linearly from `[log_mass_min, log_mass_max]` onto
/// `[0, 1]` and clamps. The log-mass bounds are fitted externally and are
/// supplied as configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCorrection")]
pub struct CorrectionParams {
    amplitude: f64,
    decay_per_m: f64,
    offset: f64,
    log_mass_min: f64,
    log_mass_max: f64,
}

#[derive(Deserialize)]
#[serde(default)]
struct RawCorrection {
    amplitude: f64,
    decay_per_m: f64,
    offset: f64,
    log_mass_min: f64,
    log_mass_max: f64,
}

impl TryFrom<RawCorrection> for CorrectionParams {
    type Error = SegError;

    fn try_from(raw: RawCorrection) -> Result<Self, Self::Error> {
        CorrectionParams::new(
            raw.amplitude,
            raw.decay_per_m,
            raw.offset,
            raw.log_mass_min,
            raw.log_mass_max,
        )
    }
}

impl CorrectionParams {
    pub const DEFAULT_AMPLITUDE: f64 = 98.01;
    pub const DEFAULT_DECAY_PER_M: f64 = 2.7177e4;
    pub const DEFAULT_OFFSET: f64 = 1.96;
    pub const DEFAULT_LOG_MASS_MIN: f64 = 10.0;
    pub const DEFAULT_LOG_MASS_MAX: f64 = 42.0;

    pub fn new(
        amplitude: f64,
        decay_per_m: f64,
        offset: f64,
        log_mass_min: f64,
        log_mass_max: f64,
    ) -> SegResult<Self> {
        let values = [amplitude, decay_per_m, offset, log_mass_min, log_mass_max];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SegError::config(format!(
                "correction parameters must be finite, got {values:?}"
            )));
        }
        if amplitude < 0.0 || decay_per_m < 0.0 || offset < 0.0 {
            return Err(SegError::config(
                "correction amplitude, decay and offset must be >= 0",
            ));
        }
        if log_mass_max <= log_mass_min {
            return Err(SegError::config(format!(
                "correction log-mass bounds must satisfy min < max, got [{log_mass_min}, {log_mass_max}]"
            )));
        }
        Ok(Self {
            amplitude,
            decay_per_m,
            offset,
            log_mass_min,
            log_mass_max,
        })
    }

    /// Same shape, different calibration bounds.
    pub fn with_log_mass_bounds(self, log_mass_min: f64, log_mass_max: f64) -> SegResult<Self> {
        Self::new(
            self.amplitude,
            self.decay_per_m,
            self.offset,
            log_mass_min,
            log_mass_max,
        )
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn decay_per_m(&self) -> f64 {
        self.decay_per_m
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn log_mass_min(&self) -> f64 {
        self.log_mass_min
    }

    pub fn log_mass_max(&self) -> f64 {
        self.log_mass_max
    }
}

impl Default for CorrectionParams {
    fn default() -> Self {
        Self {
            amplitude: Self::DEFAULT_AMPLITUDE,
            decay_per_m: Self::DEFAULT_DECAY_PER_M,
            offset: Self::DEFAULT_OFFSET,
            log_mass_min: Self::DEFAULT_LOG_MASS_MIN,
            log_mass_max: Self::DEFAULT_LOG_MASS_MAX,
        }
    }
}

// Missing fields in a JSON section fall back to the defaults, so a file may name
// only the values it changes.
impl Default for RawConstants {
    fn default() -> Self {
        let d = PhysicalConstants::default();
        Self { g: d.g, c: d.c, m_sun: d.m_sun, phi: d.phi }
    }
}

impl Default for RawBoundaries {
    fn default() -> Self {
        let d = RegimeBoundaries::default();
        Self {
            blend_low: d.blend_low,
            blend_high: d.blend_high,
            mid_field: d.mid_field,
            far_field: d.far_field,
        }
    }
}

impl Default for RawDensity {
    fn default() -> Self {
        Self { ceiling: DensityParams::default().ceiling }
    }
}

impl Default for RawCorrection {
    fn default() -> Self {
        let d = CorrectionParams::default();
        Self {
            amplitude: d.amplitude,
            decay_per_m: d.decay_per_m,
            offset: d.offset,
            log_mass_min: d.log_mass_min,
            log_mass_max: d.log_mass_max,
        }
    }
}

/// The full, immutable configuration of a run.
///
/// Passed by reference into every evaluation; nothing in the crate mutates it
/// after construction. Besides each section's own invariants, the combination
/// must keep the blended density non-increasing (see
/// [`check_blend_ordering`](crate::models::check_blend_ordering)).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEngineConfig")]
pub struct EngineConfig {
    constants: PhysicalConstants,
    boundaries: RegimeBoundaries,
    density: DensityParams,
    correction: CorrectionParams,
}

#[derive(Deserialize)]
struct RawEngineConfig {
    #[serde(default)]
    constants: PhysicalConstants,
    #[serde(default)]
    boundaries: RegimeBoundaries,
    #[serde(default)]
    density: DensityParams,
    #[serde(default)]
    correction: CorrectionParams,
}

impl TryFrom<RawEngineConfig> for EngineConfig {
    type Error = SegError;

    fn try_from(raw: RawEngineConfig) -> Result<Self, Self::Error> {
        EngineConfig::new(raw.constants, raw.boundaries, raw.density, raw.correction)
    }
}

impl EngineConfig {
    pub fn new(
        constants: PhysicalConstants,
        boundaries: RegimeBoundaries,
        density: DensityParams,
        correction: CorrectionParams,
    ) -> SegResult<Self> {
        crate::models::check_blend_ordering(&constants, &boundaries, &density)?;
        Ok(Self {
            constants,
            boundaries,
            density,
            correction,
        })
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    pub fn boundaries(&self) -> &RegimeBoundaries {
        &self.boundaries
    }

    pub fn density(&self) -> &DensityParams {
        &self.density
    }

    pub fn correction(&self) -> &CorrectionParams {
        &self.correction
    }

    pub fn with_constants(self, constants: PhysicalConstants) -> SegResult<Self> {
        Self::new(constants, self.boundaries, self.density, self.correction)
    }

    pub fn with_boundaries(self, boundaries: RegimeBoundaries) -> SegResult<Self> {
        Self::new(self.constants, boundaries, self.density, self.correction)
    }

    pub fn with_density(self, density: DensityParams) -> SegResult<Self> {
        Self::new(self.constants, self.boundaries, density, self.correction)
    }

    /// The correction never enters the density, so no cross-check is needed.
    pub fn with_correction(self, correction: CorrectionParams) -> Self {
        Self { correction, ..self }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            constants: PhysicalConstants::default(),
            boundaries: RegimeBoundaries::default(),
            density: DensityParams::default(),
            correction: CorrectionParams::default(),
        }
    }
}

/// One catalog entry, already normalized to SI units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub id: String,
    pub mass_kg: f64,
    pub radius_m: f64,
    /// Bulk speed [m/s].
    pub v_mps: Option<f64>,
    /// Line-of-sight velocity [m/s], positive = receding.
    pub v_los_mps: Option<f64>,
    pub z_obs: Option<f64>,
}

impl ObjectRecord {
    pub fn new(id: impl Into<String>, mass_kg: f64, radius_m: f64) -> Self {
        Self {
            id: id.into(),
            mass_kg,
            radius_m,
            v_mps: None,
            v_los_mps: None,
            z_obs: None,
        }
    }

    pub fn with_observation(mut self, z_obs: f64) -> Self {
        self.z_obs = Some(z_obs);
        self
    }

    pub fn with_velocity(mut self, v_mps: f64, v_los_mps: Option<f64>) -> Self {
        self.v_mps = Some(v_mps);
        self.v_los_mps = v_los_mps;
        self
    }
}

/// Redshift predictions of both models for one object.
///
/// Absent in an [`EvaluationResult`] exactly at the reference radius, where the
/// baseline dilation is zero and its redshift diverges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RedshiftPrediction {
    /// Baseline gravitational redshift `1/D_gr − 1`.
    pub z_gr: f64,
    /// Special-relativistic (Doppler) redshift from the record's velocities.
    pub z_sr: f64,
    /// Baseline total: `z_gr` combined with `z_sr`.
    pub z_grsr: f64,
    /// Alternative gravitational redshift with the mass correction applied.
    pub z_seg_grav: f64,
    /// Alternative total: `z_seg_grav` combined with `z_sr`.
    pub z_seg_total: f64,
    /// Alternative total without the mass correction (equals `z_grsr`).
    pub z_seg_uncorrected: f64,
}

/// Empirical energy scaling with compactness, see `models::power_law`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyScaling {
    /// `r_s / r = 1 / x`.
    pub compactness: f64,
    /// `E_obs / E_rest`.
    pub e_norm: f64,
    /// `(E_obs − E_rest) / E_rest` in percent.
    pub e_excess_pct: f64,
}

/// Everything derived for one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub id: String,
    /// Reference radius `r_s` for the object's mass [m].
    pub r_s_m: f64,
    /// Normalized radius `x = r / r_s`.
    pub r_over_rs: f64,
    pub regime: Regime,
    /// Blended segment density `ξ(x)`.
    pub xi: f64,
    /// Alternative-model dilation `1 / (1 + ξ)`.
    pub d_seg: f64,
    /// Baseline dilation `√(1 − 1/x)`; exactly 0 at `x = 1`.
    pub d_gr: f64,
    /// `d_seg − d_gr`.
    pub d_delta: f64,
    /// `d_delta` relative to `d_gr` [percent]; `None` at `x = 1`.
    pub d_delta_pct: Option<f64>,
    /// Radius where the two dilation curves cross for this mass [m].
    pub r_star_m: f64,
    pub d_at_intersection: f64,
    pub energy: EnergyScaling,
    /// Correction actually applied [percent]; zero in the far field.
    pub delta_m_pct: f64,
    pub redshift: Option<RedshiftPrediction>,
}

/// Outcome of a model comparison against an observation.
///
/// The alternative (segmented) model is model A, the baseline is model B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Segmented,
    Baseline,
    Tie,
}

impl Verdict {
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Segmented => "SEG",
            Verdict::Baseline => "GR",
            Verdict::Tie => "TIE",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A comparison with an observed value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonVerdict {
    pub z_obs: f64,
    /// Signed residual `z_seg_total − z_obs`.
    pub residual_seg: f64,
    /// Signed residual `z_grsr − z_obs`.
    pub residual_gr: f64,
    pub verdict: Verdict,
}

/// What the comparator emits when there is no observation to judge against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionOnly {
    /// `(z_seg_total − z_grsr) / |z_grsr|`.
    pub relative_difference: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Comparison {
    Verdict(ComparisonVerdict),
    PredictionOnly(PredictionOnly),
}

impl Comparison {
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            Comparison::Verdict(v) => Some(v.verdict),
            Comparison::PredictionOnly(_) => None,
        }
    }
}
