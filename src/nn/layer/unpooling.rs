/*
 * @Description  : Unpooling（最近邻反池化）层
 *
 * - 输入格式：[batch, C, H, W]
 * - 输出格式：[batch, C, H * k, W * k]
 * - 前向：每个输入元素复制成 k×k 的块
 * - 反向：k×k 块内的输出梯度求和回到对应的输入元素
 *
 * 暂不支持 switch（最大值位置）输入，因此只有一个输入、一个输出。
 */

use super::{LayerPhase, TraitLayer, UnpoolingParameter};
use crate::errors::{ComparisonOperator, LayerError};
use crate::tensor::{Blob, Shape4};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct UnpoolingLayer {
    param: UnpoolingParameter,
    phase: LayerPhase,
    kernel_h: usize,
    kernel_w: usize,
}

impl UnpoolingLayer {
    pub fn new(param: UnpoolingParameter) -> Self {
        Self {
            param,
            phase: LayerPhase::Unconfigured,
            kernel_h: 0,
            kernel_w: 0,
        }
    }

    pub fn param(&self) -> UnpoolingParameter {
        self.param
    }

    /// (kH, kW)，`set_up`之前为 (0, 0)
    pub fn kernel(&self) -> (usize, usize) {
        (self.kernel_h, self.kernel_w)
    }
}

impl TraitLayer for UnpoolingLayer {
    fn type_name(&self) -> &'static str {
        "Unpooling"
    }

    fn phase(&self) -> LayerPhase {
        self.phase
    }

    fn set_phase(&mut self, phase: LayerPhase) {
        self.phase = phase;
    }

    fn layer_setup(&mut self, _bottom_shape: Shape4) -> Result<(), LayerError> {
        let kernel_size = self.param.kernel_size;
        if kernel_size == 0 {
            return Err(LayerError::ValueMustSatisfyComparison {
                value_name: "kernel_size".to_string(),
                operator: ComparisonOperator::GreaterThan,
                threshold: 0,
            });
        }
        self.kernel_h = kernel_size;
        self.kernel_w = kernel_size;
        debug!(kernel_h = self.kernel_h, kernel_w = self.kernel_w, "unpooling kernel resolved");
        Ok(())
    }

    fn infer_top_shape(&mut self, bottom_shape: Shape4) -> Result<Shape4, LayerError> {
        Ok(bottom_shape.with_spatial(
            bottom_shape.height * self.kernel_h,
            bottom_shape.width * self.kernel_w,
        ))
    }

    fn forward_cpu(&self, bottom: &[&Blob], top: &mut [&mut Blob]) {
        let (k_h, k_w) = (self.kernel_h, self.kernel_w);
        let bottom_data = bottom[0].data();
        debug_assert_eq!(
            top[0].shape(),
            bottom_data
                .shape()
                .with_spatial(bottom_data.shape().height * k_h, bottom_data.shape().width * k_w)
        );

        // 遍历输出，输入按 k 步慢速前进
        for ((n, c, h, w), value) in top[0].data_mut().view_mut().indexed_iter_mut() {
            *value = bottom_data[[n, c, h / k_h, w / k_w]];
        }
    }

    fn backward_cpu(&self, top: &[&Blob], _propagate_down: &[bool], bottom: &mut [&mut Blob]) {
        let (k_h, k_w) = (self.kernel_h, self.kernel_w);
        let top_diff = top[0].diff();
        let bottom_diff = bottom[0].diff_mut();
        debug_assert_eq!(
            top_diff.shape(),
            bottom_diff
                .shape()
                .with_spatial(bottom_diff.shape().height * k_h, bottom_diff.shape().width * k_w)
        );

        // 每个输入元素影响了 k×k 个输出，其梯度是这些输出梯度之和
        bottom_diff.fill(0.0);
        for ((n, c, h, w), &grad) in top_diff.view().indexed_iter() {
            bottom_diff[[n, c, h / k_h, w / k_w]] += grad;
        }
    }
}
