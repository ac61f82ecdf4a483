/*
 * @Description  : Crop（空间裁剪）层
 *
 * - 输入格式：[batch, C, H, W]
 * - 输出格式：[batch, C, H - top - bottom, W - left - right]
 * - 前向：复制裁剪窗口内部的数据
 * - 反向：梯度写回窗口对应位置，窗口外的梯度为 0
 */

use super::{Border, CropParameter, LayerPhase, TraitLayer};
use crate::errors::{LayerError, SpatialAxis};
use crate::tensor::{Blob, Shape4};
use ndarray::s;
use tracing::debug;

/// 输入中被保留的区域：行`[valid_h_begin, valid_h_end)`，列`[valid_w_begin, valid_w_end)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CropWindow {
    pub valid_h_begin: usize,
    pub valid_h_end: usize,
    pub valid_w_begin: usize,
    pub valid_w_end: usize,
}

impl CropWindow {
    pub fn derive(h: Border, w: Border, bottom_shape: Shape4) -> Result<Self, LayerError> {
        let rows = h.window(bottom_shape.height, SpatialAxis::Height)?;
        let cols = w.window(bottom_shape.width, SpatialAxis::Width)?;
        Ok(Self {
            valid_h_begin: rows.start,
            valid_h_end: rows.end,
            valid_w_begin: cols.start,
            valid_w_end: cols.end,
        })
    }

    pub const fn height(&self) -> usize {
        self.valid_h_end - self.valid_h_begin
    }

    pub const fn width(&self) -> usize {
        self.valid_w_end - self.valid_w_begin
    }

    pub const fn contains(&self, h: usize, w: usize) -> bool {
        h >= self.valid_h_begin && h < self.valid_h_end && w >= self.valid_w_begin && w < self.valid_w_end
    }
}

/// Removes a fixed border from the two spatial axes of its single input.
#[derive(Debug, Clone)]
pub struct CropLayer {
    param: CropParameter,
    phase: LayerPhase,
    h_border: Border,
    w_border: Border,
    window: CropWindow,
}

impl CropLayer {
    pub fn new(param: CropParameter) -> Self {
        Self {
            param,
            phase: LayerPhase::Unconfigured,
            h_border: Border::default(),
            w_border: Border::default(),
            window: CropWindow::default(),
        }
    }

    pub fn param(&self) -> &CropParameter {
        &self.param
    }

    /// (高方向边界, 宽方向边界)，`set_up`之前均为 0
    pub fn borders(&self) -> (Border, Border) {
        (self.h_border, self.w_border)
    }

    pub fn window(&self) -> CropWindow {
        self.window
    }
}

impl TraitLayer for CropLayer {
    fn type_name(&self) -> &'static str {
        "Crop"
    }

    fn phase(&self) -> LayerPhase {
        self.phase
    }

    fn set_phase(&mut self, phase: LayerPhase) {
        self.phase = phase;
    }

    fn layer_setup(&mut self, bottom_shape: Shape4) -> Result<(), LayerError> {
        // 两个轴各自独立解析
        let h_border = Border::resolve(&self.param.crop_h, SpatialAxis::Height)?;
        let w_border = Border::resolve(&self.param.crop_w, SpatialAxis::Width)?;
        let window = CropWindow::derive(h_border, w_border, bottom_shape)?;

        self.h_border = h_border;
        self.w_border = w_border;
        self.window = window;
        debug!(?h_border, ?w_border, ?window, "crop window resolved");
        Ok(())
    }

    fn infer_top_shape(&mut self, bottom_shape: Shape4) -> Result<Shape4, LayerError> {
        self.window = CropWindow::derive(self.h_border, self.w_border, bottom_shape)?;
        Ok(bottom_shape.with_spatial(self.window.height(), self.window.width()))
    }

    fn forward_cpu(&self, bottom: &[&Blob], top: &mut [&mut Blob]) {
        let win = &self.window;
        debug_assert_eq!(
            top[0].shape(),
            bottom[0].shape().with_spatial(win.height(), win.width())
        );

        let bottom_data = bottom[0].data().view();
        let valid = bottom_data.slice(s![
            ..,
            ..,
            win.valid_h_begin..win.valid_h_end,
            win.valid_w_begin..win.valid_w_end
        ]);
        top[0].data_mut().view_mut().assign(&valid);
    }

    fn backward_cpu(&self, top: &[&Blob], propagate_down: &[bool], bottom: &mut [&mut Blob]) {
        if !propagate_down[0] {
            return;
        }
        let win = &self.window;
        debug_assert_eq!(
            top[0].shape(),
            bottom[0].shape().with_spatial(win.height(), win.width())
        );

        // 窗口外的位置对输出没有影响，梯度必须为 0
        let bottom_diff = bottom[0].diff_mut();
        bottom_diff.fill(0.0);
        bottom_diff
            .view_mut()
            .slice_mut(s![
                ..,
                ..,
                win.valid_h_begin..win.valid_h_end,
                win.valid_w_begin..win.valid_w_end
            ])
            .assign(&top[0].diff().view());
    }
}
