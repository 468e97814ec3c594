//! Color profiles and the de-duplicating profile store
//!
//! Profiles are immutable and shared as `Rc<ColorProfile>`. The store only
//! keeps weak references: a profile leaves the store, and gives its id
//! back, when its last reference is dropped.

pub mod builder;
mod extract;
mod params;

use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::color::{D50, Xyz};
use crate::config::ColorManagerConfig;
use crate::curve::ToneCurve;
use crate::error::{Error, Result};
use crate::icc::{ColorSpace, IccProfile, LutData, ProfileClass};
use crate::id_alloc::IdAllocator;
use crate::math::{Matrix3x3, adaptation_matrix, rgb_to_xyz_matrix};
use crate::pipeline::{LutPipeline, Stage};
use crate::properties::RenderIntent;

pub use builder::{BuilderError, BuilderErrorCode, Capabilities, ProfileParamsBuilder};
pub use extract::OutputExtract;
pub use params::{ColorProfileParams, UNSET};

/// Normalized 16-bit encoding of PCS XYZ: 1.0 is 0x8000
const XYZ_ENCODING_SCALE: f64 = 65535.0 / 32768.0;

/// What a profile is made of
#[derive(Debug)]
pub enum ProfileKind {
    Icc {
        profile: Box<IccProfile>,
        /// SHA-256 of the ICC bytes
        digest: [u8; 32],
    },
    Params(ColorProfileParams),
}

pub struct ColorProfile {
    id: u32,
    description: String,
    kind: ProfileKind,
    extract: OnceCell<OutputExtract>,
    store: Rc<StoreShared>,
}

impl fmt::Debug for ColorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorProfile")
            .field("id", &self.id)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl ColorProfile {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> &ProfileKind {
        &self.kind
    }

    pub fn params(&self) -> Option<&ColorProfileParams> {
        match &self.kind {
            ProfileKind::Params(params) => Some(params),
            ProfileKind::Icc { .. } => None,
        }
    }

    pub fn icc(&self) -> Option<&IccProfile> {
        match &self.kind {
            ProfileKind::Icc { profile, .. } => Some(&**profile),
            ProfileKind::Params(_) => None,
        }
    }

    fn digest(&self) -> Option<&[u8; 32]> {
        match &self.kind {
            ProfileKind::Icc { digest, .. } => Some(digest),
            ProfileKind::Params(_) => None,
        }
    }

    /// EOTF, inverse EOTF and vcgt, computed on first use
    pub fn output_extract(&self) -> Result<&OutputExtract> {
        if let Some(extract) = self.extract.get() {
            return Ok(extract);
        }

        let extract = match &self.kind {
            ProfileKind::Icc { profile, .. } => OutputExtract::from_icc(
                profile,
                || icc_device_to_pcs(profile, RenderIntent::Absolute),
                self.store.lut_1d_points,
            )?,
            ProfileKind::Params(params) => OutputExtract::from_params(params)?,
        };
        Ok(self.extract.get_or_init(|| extract))
    }

    /// Device RGB → relative PCS XYZ
    pub fn device_to_pcs(&self, intent: RenderIntent) -> Result<Vec<Stage>> {
        match &self.kind {
            ProfileKind::Icc { profile, .. } => icc_device_to_pcs(profile, intent),
            ProfileKind::Params(params) => {
                let eotf = &self.output_extract()?.eotf;
                Ok(vec![Stage::curves(eotf.clone()), Stage::matrix(params_to_xyz(params)?)])
            }
        }
    }

    /// Relative PCS XYZ → device RGB
    pub fn pcs_to_device(&self, intent: RenderIntent) -> Result<Vec<Stage>> {
        let matrix_shaper = |to_xyz: Matrix3x3| -> Result<Vec<Stage>> {
            let from_xyz = to_xyz
                .inverse()
                .ok_or_else(|| Error::Construction(format!("p{}: RGB to XYZ matrix is singular", self.id)))?;
            let inv_eotf = &self.output_extract()?.inv_eotf;
            Ok(vec![Stage::matrix(from_xyz), Stage::curves(inv_eotf.clone())])
        };

        match &self.kind {
            ProfileKind::Icc { profile, .. } if profile.is_matrix_shaper() => matrix_shaper(colorant_matrix(profile)?),
            ProfileKind::Icc { profile, .. } => {
                let icc_intent = intent.info().icc_intent;
                let lut = profile.b2a(icc_intent).ok_or_else(|| {
                    Error::Construction("ICC profile has neither B2A nor matrix-shaper tags".into())
                })?;
                let xyz_pcs = profile.header.pcs == ColorSpace::Xyz;
                let encode = if xyz_pcs {
                    Stage::matrix(Matrix3x3::diagonal(
                        1.0 / XYZ_ENCODING_SCALE,
                        1.0 / XYZ_ENCODING_SCALE,
                        1.0 / XYZ_ENCODING_SCALE,
                    ))
                } else {
                    Stage::XyzToLab { legacy: lut.is_16bit }
                };
                Ok(vec![encode, Stage::Clut(Rc::new(LutPipeline::new(lut, xyz_pcs)?))])
            }
            ProfileKind::Params(params) => matrix_shaper(params_to_xyz(params)?),
        }
    }

    /// Media white in PCS XYZ, used by the absolute colorimetric intent
    pub fn media_white_point(&self) -> Xyz {
        match &self.kind {
            ProfileKind::Icc { profile, .. } => profile.media_white_point(),
            ProfileKind::Params(params) => {
                let (x, y) = params.gamut().white_f64();
                Xyz::from_xyy(x, y, 1.0)
            }
        }
    }
}

impl Drop for ColorProfile {
    fn drop(&mut self) {
        debug!(
            target: "compcms::profiles",
            "Destroyed color profile p{}. Description: {}", self.id, self.description
        );
        self.store.ids.borrow_mut().put_id(self.id);
        // Busy while the store itself is iterating; the next prune catches it.
        if let Ok(mut profiles) = self.store.profiles.try_borrow_mut() {
            profiles.retain(|p| p.strong_count() > 0);
        }
    }
}

fn icc_device_to_pcs(icc: &IccProfile, intent: RenderIntent) -> Result<Vec<Stage>> {
    if icc.is_matrix_shaper() {
        let trc = |ch| icc.trc(ch).map(ToneCurve::from_icc);
        let (Some(r), Some(g), Some(b)) = (trc(0), trc(1), trc(2)) else {
            return Err(Error::Construction("TRC tag missing from matrix-shaper ICC profile".into()));
        };
        return Ok(vec![Stage::curves([r, g, b]), Stage::matrix(colorant_matrix(icc)?)]);
    }

    let lut = icc
        .a2b(intent.info().icc_intent)
        .ok_or_else(|| Error::Construction("ICC profile has neither A2B nor matrix-shaper tags".into()))?;
    Ok(vec![Stage::Clut(Rc::new(LutPipeline::new(lut, false)?)), pcs_decode(icc, lut)])
}

fn pcs_decode(icc: &IccProfile, lut: &LutData) -> Stage {
    if icc.header.pcs == ColorSpace::Xyz {
        Stage::matrix(Matrix3x3::diagonal(XYZ_ENCODING_SCALE, XYZ_ENCODING_SCALE, XYZ_ENCODING_SCALE))
    } else {
        Stage::LabToXyz { legacy: lut.is_16bit }
    }
}

fn colorant_matrix(icc: &IccProfile) -> Result<Matrix3x3> {
    let column = |ch| icc.colorant(ch).map(|xyz| xyz.to_array());
    match (column(0), column(1), column(2)) {
        (Some(r), Some(g), Some(b)) => Ok(Matrix3x3::from_columns(r, g, b)),
        _ => Err(Error::Construction("colorant tag missing from matrix-shaper ICC profile".into())),
    }
}

/// RGB → D50-relative XYZ for a parametric profile
fn params_to_xyz(params: &ColorProfileParams) -> Result<Matrix3x3> {
    let gamut = params.gamut();
    let to_xyz = rgb_to_xyz_matrix(gamut.primaries_f64(), gamut.white_f64())
        .ok_or_else(|| Error::Construction("primaries do not define an RGB to XYZ conversion".into()))?;
    let (x, y) = gamut.white_f64();
    Ok(adaptation_matrix(Xyz::from_xyy(x, y, 1.0), D50).multiply(&to_xyz))
}

#[derive(Debug)]
struct StoreShared {
    ids: RefCell<IdAllocator>,
    profiles: RefCell<Vec<Weak<ColorProfile>>>,
    lut_1d_points: usize,
}

/// Registry of live profiles
#[derive(Debug)]
pub struct ProfileStore {
    shared: Rc<StoreShared>,
    max_icc_size: usize,
}

impl ProfileStore {
    pub fn new(config: &ColorManagerConfig) -> Self {
        Self {
            shared: Rc::new(StoreShared {
                ids: RefCell::new(IdAllocator::new()),
                profiles: RefCell::new(Vec::new()),
                lut_1d_points: config.lut_1d_points,
            }),
            max_icc_size: config.max_icc_size,
        }
    }

    /// The stock sRGB profile, with its output extract ready
    pub fn create_stock_srgb(&self) -> Result<Rc<ColorProfile>> {
        let profile = self.insert("sRGB stock".to_string(), ProfileKind::Params(ColorProfileParams::srgb()));
        profile.output_extract()?;
        Ok(profile)
    }

    /// Validate and register an ICC profile, or return the live profile
    /// with the same bytes
    pub fn get_from_icc(&self, data: &[u8], name_part: &str) -> Result<Rc<ColorProfile>> {
        if data.is_empty() {
            return Err(Error::NoIccData);
        }
        if data.len() > self.max_icc_size {
            return Err(Error::IccTooLarge);
        }

        let icc = IccProfile::parse(data).map_err(Error::IccNotUnderstood)?;
        validate_icc(&icc)?;

        let digest: [u8; 32] = Sha256::digest(data).into();
        if let Some(found) = self.find(|p| p.digest() == Some(&digest)) {
            return Ok(found);
        }

        let hex: String = digest[..16].iter().map(|b| format!("{:02x}", b)).collect();
        let description = format!("ICCv{:.1} {} {}", icc.header.version.as_f32(), name_part, hex);

        Ok(self.insert(
            description,
            ProfileKind::Icc {
                profile: Box::new(icc),
                digest,
            },
        ))
    }

    /// Register a parametric profile, or return the live profile with
    /// identical parameters
    pub fn get_from_params(&self, params: &ColorProfileParams, name_part: &str) -> Result<Rc<ColorProfile>> {
        if let Some(found) = self.find(|p| p.params().is_some_and(|q| q.same_as(params))) {
            return Ok(found);
        }

        params_to_xyz(params)?;

        let primaries = params
            .named_primaries()
            .map_or("custom primaries", |p| p.desc());
        let description = format!("Parametric ({}): {}, {}", name_part, primaries, params.tf().desc());

        Ok(self.insert(description, ProfileKind::Params(*params)))
    }

    /// Every profile still referenced somewhere
    pub fn live_profiles(&self) -> Vec<Rc<ColorProfile>> {
        self.shared.profiles.borrow().iter().filter_map(Weak::upgrade).collect()
    }

    fn find(&self, pred: impl Fn(&ColorProfile) -> bool) -> Option<Rc<ColorProfile>> {
        self.shared
            .profiles
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .find(|p| pred(&**p))
    }

    fn insert(&self, description: String, kind: ProfileKind) -> Rc<ColorProfile> {
        let id = self.shared.ids.borrow_mut().get_id();
        let profile = Rc::new(ColorProfile {
            id,
            description,
            kind,
            extract: OnceCell::new(),
            store: Rc::clone(&self.shared),
        });

        debug!(
            target: "compcms::profiles",
            "New color profile: p{}\n  description: {}", id, profile.description
        );

        self.shared.profiles.borrow_mut().push(Rc::downgrade(&profile));
        profile
    }
}

fn validate_icc(icc: &IccProfile) -> Result<()> {
    let header = &icc.header;
    if header.version.major != 2 && header.version.major != 4 {
        return Err(Error::UnsupportedVersion(header.version.major));
    }

    let channels = header.color_space.channels();
    if channels != 3 {
        return Err(Error::ChannelCount(channels));
    }

    if header.device_class != ProfileClass::Display {
        return Err(Error::DeviceClass {
            name: header.device_class.name(),
            signature: header.device_class.to_u32(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icc::tags::identity_lut16_payload;
    use crate::icc::testing::{assemble, matrix_shaper};
    use crate::pipeline::eval_stages;
    use crate::properties::{NamedPrimaries, TransferFunction};

    fn store() -> ProfileStore {
        ProfileStore::new(&ColorManagerConfig::default())
    }

    fn lut_profile() -> Vec<u8> {
        let mut lut = b"mft2\0\0\0\0".to_vec();
        lut.extend(identity_lut16_payload(9));
        assemble(
            4,
            b"mntr",
            b"XYZ ",
            &[(*b"A2B0", lut.clone()), (*b"B2A0", lut)],
        )
    }

    #[test]
    fn test_icc_dedup_by_content() {
        let store = store();
        let data = matrix_shaper(4, b"mntr", 2.2);
        let a = store.get_from_icc(&data, "first").unwrap();
        let b = store.get_from_icc(&data, "second").unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(a.id(), 1);
        assert!(a.description().starts_with("ICCv4.0 first "));
        assert_eq!(a.description().len(), "ICCv4.0 first ".len() + 32);

        let other = store.get_from_icc(&matrix_shaper(4, b"mntr", 1.8), "other").unwrap();
        assert!(!Rc::ptr_eq(&a, &other));
        assert_eq!(other.id(), 2);
    }

    #[test]
    fn test_icc_validation_errors() {
        let store = store();
        assert!(matches!(store.get_from_icc(&[], "x"), Err(Error::NoIccData)));
        assert!(matches!(
            store.get_from_icc(&vec![0u8; 5 * 1024 * 1024], "x"),
            Err(Error::IccTooLarge)
        ));
        assert!(matches!(store.get_from_icc(&[1, 2, 3], "x"), Err(Error::IccNotUnderstood(_))));
        assert!(matches!(
            store.get_from_icc(&matrix_shaper(3, b"mntr", 2.2), "x"),
            Err(Error::UnsupportedVersion(3))
        ));

        for (space, channels) in [(b"CMYK", 4), (b"GRAY", 1)] {
            let mut data = matrix_shaper(4, b"mntr", 2.2);
            data[16..20].copy_from_slice(space);
            let err = store.get_from_icc(&data, "x").unwrap_err();
            assert!(matches!(err, Error::ChannelCount(n) if n == channels));
            assert_eq!(
                err.to_string(),
                format!("ICC profile must contain 3 channels for the color space, not {}.", channels)
            );
        }

        let err = store.get_from_icc(&matrix_shaper(4, b"scnr", 2.2), "x").unwrap_err();
        assert!(matches!(err, Error::DeviceClass { name: "Input", .. }));
        assert_eq!(
            err.to_string(),
            "ICC profile is required to be of Display device class, but it is Input class (0x73636e72)"
        );
        assert!(store.live_profiles().is_empty());
    }

    #[test]
    fn test_drop_releases_id() {
        let store = store();
        let a = store.get_from_icc(&matrix_shaper(2, b"mntr", 2.2), "a").unwrap();
        assert_eq!(store.live_profiles().len(), 1);
        drop(a);
        assert!(store.live_profiles().is_empty());
        let b = store.get_from_icc(&matrix_shaper(4, b"mntr", 2.2), "b").unwrap();
        assert_eq!(b.id(), 1);
    }

    #[test]
    fn test_params_dedup_and_description() {
        let store = store();
        let params = ColorProfileParams::with_named_primaries(NamedPrimaries::CicpBt2020, TransferFunction::St2084Pq);
        let a = store.get_from_params(&params, "hdr").unwrap();
        let b = store.get_from_params(&params, "again").unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(
            a.description(),
            "Parametric (hdr): Color primaries as defined by the BT.2020 and BT.2100 standard, \
             Perceptual quantizer transfer function"
        );

        let mut custom = params;
        custom.set_named_primaries(None);
        let c = store.get_from_params(&custom, "custom").unwrap();
        assert!(!Rc::ptr_eq(&a, &c));
        assert!(c.description().contains("custom primaries"));
    }

    #[test]
    fn test_stock_srgb_matches_icc_matrix() {
        let store = store();
        let stock = store.create_stock_srgb().unwrap();
        assert_eq!(stock.description(), "sRGB stock");

        let stages = stock.device_to_pcs(RenderIntent::Perceptual).unwrap();
        let white = eval_stages(&stages, [1.0, 1.0, 1.0]);
        assert!(Xyz::from_array(white).approx_eq(&D50, 1e-3), "{:?}", white);
        let red = eval_stages(&stages, [1.0, 0.0, 0.0]);
        assert!((red[0] - 0.4360).abs() < 2e-3, "{:?}", red);
        assert!((red[1] - 0.2225).abs() < 2e-3, "{:?}", red);
    }

    #[test]
    fn test_matrix_shaper_extract() {
        let store = store();
        let profile = store.get_from_icc(&matrix_shaper(4, b"mntr", 2.2), "g").unwrap();
        let extract = profile.output_extract().unwrap();
        assert!((extract.eotf[0].eval(0.5) - 0.5f64.powf(2.2)).abs() < 1e-3);
        assert!(extract.vcgt.is_none());
        assert!(std::ptr::eq(extract, profile.output_extract().unwrap()));
    }

    #[test]
    fn test_lut_profile_roundtrip() {
        let store = store();
        let profile = store.get_from_icc(&lut_profile(), "lut").unwrap();

        let extract = profile.output_extract().unwrap();
        assert!((extract.eotf[0].eval(0.5) - 0.5).abs() < 1e-2);

        let mut stages = profile.device_to_pcs(RenderIntent::Perceptual).unwrap();
        stages.extend(profile.pcs_to_device(RenderIntent::Perceptual).unwrap());
        let out = eval_stages(&stages, [0.2, 0.4, 0.3]);
        for (o, i) in out.iter().zip([0.2, 0.4, 0.3]) {
            assert!((o - i).abs() < 1e-2, "{:?}", out);
        }
    }
}
