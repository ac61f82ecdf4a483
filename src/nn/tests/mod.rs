mod layer_lifecycle;

use crate::errors::TensorError;
use crate::tensor::{Blob, Shape4, Tensor};

/// 固定随机种子
const SEED: u64 = 1701;

/// 测试夹具：[batch=2, C=3, H=6, W=5] 的高斯随机输入
fn gaussian_bottom() -> Blob {
    Blob::from_data(Tensor::new_normal(0.0, 1.0, Shape4::new(2, 3, 6, 5), SEED))
}

/// 0, 1, 2, ... 依内存顺序递增的张量，便于定位每个元素
fn arange(shape: Shape4) -> Result<Tensor, TensorError> {
    let data: Vec<f32> = (0..shape.count()).map(|i| i as f32).collect();
    Tensor::new(&data, shape)
}
