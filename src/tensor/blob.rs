/*
 * @Description  : Blob：同形状的数据（data）与梯度（diff）两个缓冲区
 */

use super::{Shape4, Tensor};
use crate::errors::TensorError;

/// A layer input or output: forward values in `data`, gradients in `diff`.
///
/// Both buffers always share one shape. The owner (the caller of a layer)
/// allocates them; layers only borrow them for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    data: Tensor,
    diff: Tensor,
}

impl Blob {
    pub fn new(shape: Shape4) -> Self {
        Self {
            data: Tensor::zeros(shape),
            diff: Tensor::zeros(shape),
        }
    }

    /// 以已有数据创建，梯度置零
    pub fn from_data(data: Tensor) -> Self {
        let diff = Tensor::zeros(data.shape());
        Self { data, diff }
    }

    /// 改变形状。形状未变时保留原有缓冲区，否则两个缓冲区都重新分配并置零
    pub fn reshape(&mut self, shape: Shape4) {
        if self.shape() == shape {
            return;
        }
        self.data = Tensor::zeros(shape);
        self.diff = Tensor::zeros(shape);
    }

    pub fn shape(&self) -> Shape4 {
        self.data.shape()
    }

    pub fn num(&self) -> usize {
        self.shape().num
    }

    pub fn channels(&self) -> usize {
        self.shape().channels
    }

    pub fn height(&self) -> usize {
        self.shape().height
    }

    pub fn width(&self) -> usize {
        self.shape().width
    }

    pub fn count(&self) -> usize {
        self.shape().count()
    }

    pub fn offset(&self, n: usize, c: usize, h: usize, w: usize) -> usize {
        self.shape().offset(n, c, h, w)
    }

    pub fn data(&self) -> &Tensor {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Tensor {
        &mut self.data
    }

    pub fn diff(&self) -> &Tensor {
        &self.diff
    }

    pub fn diff_mut(&mut self) -> &mut Tensor {
        &mut self.diff
    }

    /// 替换数据，形状必须一致
    pub fn set_data(&mut self, data: Tensor) -> Result<(), TensorError> {
        if !data.is_same_shape(&self.data) {
            return Err(TensorError::ShapeMismatch {
                expected: self.shape().dims(),
                got: data.shape().dims(),
            });
        }
        self.data = data;
        Ok(())
    }

    /// 替换梯度，形状必须一致
    pub fn set_diff(&mut self, diff: Tensor) -> Result<(), TensorError> {
        if !diff.is_same_shape(&self.diff) {
            return Err(TensorError::ShapeMismatch {
                expected: self.shape().dims(),
                got: diff.shape().dims(),
            });
        }
        self.diff = diff;
        Ok(())
    }

    pub fn data_at(&self, n: usize, c: usize, h: usize, w: usize) -> f32 {
        self.data[[n, c, h, w]]
    }

    pub fn diff_at(&self, n: usize, c: usize, h: usize, w: usize) -> f32 {
        self.diff[[n, c, h, w]]
    }
}
