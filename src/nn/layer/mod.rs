/*
 * @Description  : Layer 模块 - 层的统一接口（setup → reshape → forward/backward）
 *
 * 每个层在`set_up`时根据配置与输入形状推导内部状态，之后可反复调用
 * forward/backward；setup 失败的层进入`Failed`终态。
 */

mod crop;
mod params;
mod unpooling;

pub use crop::{CropLayer, CropWindow};
pub use params::{Border, CropParameter, LayerConfig, LayerParameter, UnpoolingParameter};
pub use unpooling::UnpoolingLayer;

use crate::errors::{BlobRole, LayerError};
use crate::tensor::{Blob, Shape4};
use enum_dispatch::enum_dispatch;
use std::fmt::{self, Display};
use tracing::{debug, trace, warn};

/// Lifecycle of a layer: `Unconfigured → Ready`, or `Failed` after a bad setup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayerPhase {
    #[default]
    Unconfigured,
    Ready,
    Failed,
}
impl Display for LayerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase_name = match self {
            LayerPhase::Unconfigured => "unconfigured",
            LayerPhase::Ready => "ready",
            LayerPhase::Failed => "failed",
        };
        write!(f, "{}", phase_name)
    }
}

#[enum_dispatch]
#[derive(Debug, Clone)]
pub enum LayerType {
    CropLayer,
    UnpoolingLayer,
}

impl LayerType {
    pub fn from_param(param: &LayerParameter) -> Self {
        match param {
            LayerParameter::Crop(p) => CropLayer::new(p.clone()).into(),
            LayerParameter::Unpooling(p) => UnpoolingLayer::new(*p).into(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, LayerError> {
        let config = LayerConfig::from_json(json)?;
        Ok(Self::from_param(&config.param))
    }
}

#[enum_dispatch(LayerType)]
pub trait TraitLayer {
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓各层实现↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    fn type_name(&self) -> &'static str;

    fn phase(&self) -> LayerPhase;

    fn set_phase(&mut self, phase: LayerPhase);

    /// 根据配置与输入形状推导内部状态（只在`set_up`中调用）
    fn layer_setup(&mut self, bottom_shape: Shape4) -> Result<(), LayerError>;

    /// 根据当前输入形状推导输出形状，必要时重新推导内部状态
    fn infer_top_shape(&mut self, bottom_shape: Shape4) -> Result<Shape4, LayerError>;

    /// 调用方保证各 blob 形状与`infer_top_shape`一致
    fn forward_cpu(&self, bottom: &[&Blob], top: &mut [&mut Blob]);

    fn backward_cpu(&self, top: &[&Blob], propagate_down: &[bool], bottom: &mut [&mut Blob]);
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑各层实现↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    fn exact_num_bottom_blobs(&self) -> usize {
        1
    }

    fn exact_num_top_blobs(&self) -> usize {
        1
    }

    fn is_ready(&self) -> bool {
        self.phase() == LayerPhase::Ready
    }

    fn check_blob_counts(&self, num_bottom: usize, num_top: usize) -> Result<(), LayerError> {
        let checks = [
            (BlobRole::Bottom, self.exact_num_bottom_blobs(), num_bottom),
            (BlobRole::Top, self.exact_num_top_blobs(), num_top),
        ];
        for (role, expected, got) in checks {
            if expected != got {
                return Err(LayerError::BlobCount {
                    layer: self.type_name(),
                    role,
                    expected,
                    got,
                });
            }
        }
        Ok(())
    }

    fn ensure_ready(&self) -> Result<(), LayerError> {
        match self.phase() {
            LayerPhase::Ready => Ok(()),
            LayerPhase::Failed => Err(LayerError::Failed {
                layer: self.type_name(),
            }),
            phase => Err(LayerError::NotReady {
                layer: self.type_name(),
                phase,
            }),
        }
    }

    /// 校验 blob 数量、推导内部状态并声明输出形状。
    /// 任一步失败都会使层进入`Failed`终态。
    fn set_up(&mut self, bottom: &[&Blob], top: &mut [&mut Blob]) -> Result<(), LayerError> {
        if self.phase() == LayerPhase::Failed {
            return Err(LayerError::Failed {
                layer: self.type_name(),
            });
        }

        let result = self
            .check_blob_counts(bottom.len(), top.len())
            .and_then(|()| self.layer_setup(bottom[0].shape()))
            .and_then(|()| self.infer_top_shape(bottom[0].shape()));

        match result {
            Ok(top_shape) => {
                top[0].reshape(top_shape);
                self.set_phase(LayerPhase::Ready);
                debug!(
                    layer = self.type_name(),
                    bottom = ?bottom[0].shape().dims(),
                    top = ?top_shape.dims(),
                    "layer set up"
                );
                Ok(())
            }
            Err(e) => {
                warn!(layer = self.type_name(), error = %e, "layer setup failed");
                self.set_phase(LayerPhase::Failed);
                Err(e)
            }
        }
    }

    /// 输入形状变化后重新声明输出形状。失败时保留原有状态，层仍可用。
    fn reshape(&mut self, bottom: &[&Blob], top: &mut [&mut Blob]) -> Result<(), LayerError> {
        self.ensure_ready()?;
        self.check_blob_counts(bottom.len(), top.len())?;
        let top_shape = self.infer_top_shape(bottom[0].shape())?;
        if top[0].shape() != top_shape {
            debug!(
                layer = self.type_name(),
                from = ?top[0].shape().dims(),
                to = ?top_shape.dims(),
                "top reshaped"
            );
        }
        top[0].reshape(top_shape);
        Ok(())
    }

    fn forward(&self, bottom: &[&Blob], top: &mut [&mut Blob]) -> Result<(), LayerError> {
        self.ensure_ready()?;
        self.check_blob_counts(bottom.len(), top.len())?;
        trace!(layer = self.type_name(), "forward");
        self.forward_cpu(bottom, top);
        Ok(())
    }

    fn backward(
        &self,
        top: &[&Blob],
        propagate_down: &[bool],
        bottom: &mut [&mut Blob],
    ) -> Result<(), LayerError> {
        self.ensure_ready()?;
        self.check_blob_counts(bottom.len(), top.len())?;
        if propagate_down.len() != bottom.len() {
            return Err(LayerError::PropagateDownCount {
                expected: bottom.len(),
                got: propagate_down.len(),
            });
        }
        trace!(layer = self.type_name(), ?propagate_down, "backward");
        self.backward_cpu(top, propagate_down, bottom);
        Ok(())
    }
}
