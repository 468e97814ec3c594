//! Transform cache
//!
//! Transforms are looked up by [`SearchKey`]; a miss builds the chain,
//! optimizes it and translates it into renderer steps. The cache holds
//! weak references only, so a transform lives exactly as long as its
//! users keep it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{error, info};

use crate::config::ColorManagerConfig;
use crate::error::{Error, Result};
use crate::id_alloc::IdAllocator;
use crate::pipeline::{build_chain, optimize};
use crate::transform::{ColorTransform, SearchKey, TransformCategory, translate};

const LOG_TARGET: &str = "compcms::transformations";

/// Ids and weak references shared by the cache and its transforms
#[derive(Debug, Default)]
pub(crate) struct Registry {
    ids: RefCell<IdAllocator>,
    transforms: RefCell<Vec<Weak<ColorTransform>>>,
}

impl Registry {
    /// Called from `ColorTransform::drop`
    pub(crate) fn release(&self, id: u32) {
        self.ids.borrow_mut().put_id(id);
        // Busy while a lookup is iterating; dead entries go on the next release.
        if let Ok(mut transforms) = self.transforms.try_borrow_mut() {
            transforms.retain(|t| t.strong_count() > 0);
        }
    }
}

#[derive(Debug)]
pub struct TransformCache {
    registry: Rc<Registry>,
    lut_1d_points: usize,
    lut_3d_points: usize,
}

impl TransformCache {
    pub fn new(config: &ColorManagerConfig) -> Self {
        Self {
            registry: Rc::new(Registry::default()),
            lut_1d_points: config.lut_1d_points,
            lut_3d_points: config.lut_3d_points,
        }
    }

    /// The live transform for `key`, built on a miss
    pub fn get_transform(&self, key: &SearchKey) -> Result<Rc<ColorTransform>> {
        if let Some(found) = self.find(key) {
            return Ok(found);
        }

        let id = self.registry.ids.borrow_mut().get_id();
        info!(target: LOG_TARGET, "New color transformation: t{}\n{}", id, key.describe());

        match self.build(id, key) {
            Ok(transform) => {
                info!(target: LOG_TARGET, "  {}", transform.describe());
                self.registry.transforms.borrow_mut().push(Rc::downgrade(&transform));
                Ok(transform)
            }
            Err(e) => {
                self.registry.ids.borrow_mut().put_id(id);
                info!(target: LOG_TARGET, "  {}", e);
                error!(target: LOG_TARGET, "failed to create a color transformation.");
                Err(e)
            }
        }
    }

    /// Every transform still referenced somewhere
    pub fn live_transforms(&self) -> Vec<Rc<ColorTransform>> {
        self.registry
            .transforms
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .collect()
    }

    fn find(&self, key: &SearchKey) -> Option<Rc<ColorTransform>> {
        self.registry
            .transforms
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .find(|t| t.key.matches(key))
    }

    fn build(&self, id: u32, key: &SearchKey) -> Result<Rc<ColorTransform>> {
        let stages = build_chain(
            key.category,
            key.input_profile.as_deref(),
            &key.output_profile,
            key.render_intent,
        )?;
        let optimized = optimize(stages, self.lut_1d_points);
        let steps = translate(&optimized, self.lut_1d_points, self.lut_3d_points);

        if key.category == TransformCategory::BlendToOutput && steps.mapping.is_lut3d() {
            return Err(Error::Construction(format!(
                "blend-to-output transform t{} needs a 3D LUT",
                id
            )));
        }

        let post_curve = if optimized.clamp_output {
            steps.post_curve.with_output_clamp(self.lut_1d_points)
        } else {
            steps.post_curve
        };

        Ok(Rc::new(ColorTransform {
            id,
            key: key.clone(),
            pre_curve: steps.pre_curve,
            mapping: steps.mapping,
            post_curve,
            clamp_output: optimized.clamp_output,
            registry: Rc::clone(&self.registry),
        }))
    }
}
