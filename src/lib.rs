//! # Only Torch Vision
//!
//! 两个空间（spatial）层及其前向/反向传播：
//! - [`nn::CropLayer`]：裁掉输入在 H、W 两个方向上的边界；
//! - [`nn::UnpoolingLayer`]：最近邻反池化，把每个元素复制成 k×k 的块。
//!
//! 两者共享同一套层接口 [`nn::TraitLayer`]：`set_up` → `reshape` → `forward`/`backward`。
//!

pub mod errors;
pub mod nn;
pub mod tensor;
pub mod utils;
