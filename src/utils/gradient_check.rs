/*
 * @Description  : 数值梯度检查：用中心差分验证层的 backward 是 forward 的伴随
 */

use crate::errors::{LayerError, TensorError};
use crate::nn::TraitLayer;
use crate::tensor::{Blob, Tensor};
use thiserror::Error;
use tracing::debug;

/// 反向传播前写入输入梯度的“脏”值，用于发现没有被覆盖的位置
const STALE_DIFF: f32 = 0.5;

#[derive(Error, Debug)]
pub enum GradientCheckError {
    #[error(
        "梯度不一致：top{top:?}对bottom{bottom:?}的解析梯度为{analytic}，数值梯度为{numeric}"
    )]
    Mismatch {
        top: [usize; 4],
        bottom: [usize; 4],
        analytic: f32,
        numeric: f32,
    },
    #[error(transparent)]
    Layer(#[from] LayerError),
    #[error(transparent)]
    Tensor(#[from] TensorError),
}

/// Compares a layer's analytic backward pass against central finite differences.
///
/// Every entry of the Jacobian d(top)/d(bottom) is checked, so the cost grows
/// with `top.count() * bottom.count()`; keep the blobs small.
#[derive(Debug, Clone, Copy)]
pub struct GradientChecker {
    stepsize: f32,
    threshold: f32,
}

impl Default for GradientChecker {
    fn default() -> Self {
        Self::new(1e-4, 1e-2)
    }
}

impl GradientChecker {
    pub const fn new(stepsize: f32, threshold: f32) -> Self {
        Self {
            stepsize,
            threshold,
        }
    }

    /// 对每个(top 元素, bottom 元素)对比解析梯度与数值梯度。
    /// 层会先被`set_up`，`top`按推导的形状重新分配。
    pub fn check_gradient_exhaustive<L: TraitLayer>(
        &self,
        layer: &mut L,
        bottom: &mut Blob,
        top: &mut Blob,
    ) -> Result<(), GradientCheckError> {
        layer.set_up(&[&*bottom], &mut [&mut *top])?;

        let numeric = self.numeric_jacobian(layer, bottom, top)?;
        let bottom_shape = bottom.shape();
        let top_shape = top.shape();
        let bottom_count = bottom_shape.count();

        let mut one_hot = vec![0.0; top_shape.count()];
        for top_index in 0..top_shape.count() {
            one_hot[top_index] = 1.0;
            top.set_diff(Tensor::new(&one_hot, top_shape)?)?;
            one_hot[top_index] = 0.0;

            bottom.diff_mut().fill(STALE_DIFF);
            layer.backward(&[&*top], &[true], &mut [&mut *bottom])?;

            for (bottom_index, &analytic) in bottom.diff().iter().enumerate() {
                let numeric = numeric[top_index * bottom_count + bottom_index];
                if !self.is_close(analytic, numeric) {
                    return Err(GradientCheckError::Mismatch {
                        top: top_shape.unravel(top_index).unwrap_or_default(),
                        bottom: bottom_shape.unravel(bottom_index).unwrap_or_default(),
                        analytic,
                        numeric,
                    });
                }
            }
        }

        debug!(
            layer = layer.type_name(),
            entries = top_shape.count() * bottom_count,
            "gradient check passed"
        );
        Ok(())
    }

    /// Row-major `[top.count(), bottom.count()]` Jacobian, one bottom element
    /// perturbed at a time.
    fn numeric_jacobian<L: TraitLayer>(
        &self,
        layer: &L,
        bottom: &mut Blob,
        top: &mut Blob,
    ) -> Result<Vec<f32>, GradientCheckError> {
        let bottom_shape = bottom.shape();
        let bottom_count = bottom_shape.count();
        let top_count = top.count();
        let original = bottom.data().to_vec();
        let mut jacobian = vec![0.0; top_count * bottom_count];

        let mut perturbed = original.clone();
        for bottom_index in 0..bottom_count {
            perturbed[bottom_index] = original[bottom_index] + self.stepsize;
            bottom.set_data(Tensor::new(&perturbed, bottom_shape)?)?;
            layer.forward(&[&*bottom], &mut [&mut *top])?;
            let positive = top.data().to_vec();

            perturbed[bottom_index] = original[bottom_index] - self.stepsize;
            bottom.set_data(Tensor::new(&perturbed, bottom_shape)?)?;
            layer.forward(&[&*bottom], &mut [&mut *top])?;
            let negative = top.data().to_vec();

            perturbed[bottom_index] = original[bottom_index];
            for (top_index, (p, n)) in positive.iter().zip(&negative).enumerate() {
                jacobian[top_index * bottom_count + bottom_index] =
                    (p - n) / (2.0 * self.stepsize);
            }
        }

        bottom.set_data(Tensor::new(&original, bottom_shape)?)?;
        layer.forward(&[&*bottom], &mut [&mut *top])?;
        Ok(jacobian)
    }

    fn is_close(&self, analytic: f32, numeric: f32) -> bool {
        let scale = analytic.abs().max(numeric.abs()).max(1.0);
        (analytic - numeric).abs() <= self.threshold * scale
    }
}
