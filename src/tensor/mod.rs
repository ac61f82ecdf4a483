use ndarray::Array4;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::errors::TensorError;

mod blob;
mod index;
mod property;
mod shape;

pub use blob::Blob;
pub use shape::Shape4;


/// 4维稠密张量，按`[N, C, H, W]`（batch, channel, height, width）寻址，
/// 行优先存储，W 变化最快。
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: Array4<f32>,
}

impl Tensor {
    /// 由扁平数据创建张量，`data`的长度必须等于`shape`中所有元素的乘积。
    pub fn new(data: &[f32], shape: Shape4) -> Result<Tensor, TensorError> {
        if data.len() != shape.count() {
            return Err(TensorError::DataLengthMismatch {
                shape: shape.dims(),
                expected: shape.count(),
                got: data.len(),
            });
        }
        let data = Array4::from_shape_vec(shape.dims(), data.to_vec()).map_err(|_| {
            TensorError::DataLengthMismatch {
                shape: shape.dims(),
                expected: shape.count(),
                got: data.len(),
            }
        })?;
        Ok(Tensor { data })
    }

    /// 由任意长度的形状切片创建张量，形状必须是4维。
    pub fn from_dims(data: &[f32], dims: &[usize]) -> Result<Tensor, TensorError> {
        let shape = Shape4::try_from(dims)?;
        Tensor::new(data, shape)
    }

    pub fn zeros(shape: Shape4) -> Tensor {
        Tensor::full(0.0, shape)
    }

    pub fn ones(shape: Shape4) -> Tensor {
        Tensor::full(1.0, shape)
    }

    pub fn full(value: f32, shape: Shape4) -> Tensor {
        Tensor {
            data: Array4::from_elem(shape.dims(), value),
        }
    }

    /// 创建一个服从正态分布的随机张量（高斯填充）。
    /// 使用固定种子，相同的`seed`总是得到相同的数据。
    pub fn new_normal(mean: f32, std_dev: f32, shape: Shape4, seed: u64) -> Tensor {
        let mut rng = StdRng::seed_from_u64(seed);
        let data_len = shape.count();
        let mut data = Vec::with_capacity(data_len);

        while data.len() < data_len {
            let u1: f32 = rng.r#gen();
            let u2: f32 = rng.r#gen();
            let r = (-2.0 * u1.ln()).sqrt();
            let theta = 2.0 * std::f32::consts::PI * u2;
            let z0 = mean + std_dev * r * theta.cos();
            let z1 = mean + std_dev * r * theta.sin();

            if z0.is_finite() {
                data.push(z0);
            }
            if data.len() < data_len && z1.is_finite() {
                data.push(z1);
            }
        }

        Tensor {
            data: Array4::from_shape_fn(shape.dims(), |(n, c, h, w)| {
                data[shape.offset(n, c, h, w)]
            }),
        }
    }

    /// 将所有元素设为`value`
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }
}
