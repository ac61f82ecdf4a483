/*
 * @Description  : 负责神经网络（neural network）层的构建
 */

pub mod layer;

pub use layer::{
    Border, CropLayer, CropParameter, CropWindow, LayerConfig, LayerParameter, LayerPhase,
    LayerType, TraitLayer, UnpoolingLayer, UnpoolingParameter,
};

#[cfg(test)]
mod tests;
