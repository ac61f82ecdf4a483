/*
 * @Description  : 层参数（可由 JSON 反序列化）及裁剪边界的解析
 */

use crate::errors::{LayerError, SpatialAxis};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Crop amounts per spatial axis. Each list holds 0, 1 (symmetric) or
/// 2 (leading, trailing) values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropParameter {
    pub crop_h: Vec<usize>,
    pub crop_w: Vec<usize>,
}

impl CropParameter {
    pub fn new(crop_h: &[usize], crop_w: &[usize]) -> Self {
        Self {
            crop_h: crop_h.to_vec(),
            crop_w: crop_w.to_vec(),
        }
    }
}

/// 反池化参数：高、宽两个方向使用同一个核尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnpoolingParameter {
    pub kernel_size: usize,
}

impl UnpoolingParameter {
    pub const fn new(kernel_size: usize) -> Self {
        Self { kernel_size }
    }
}

/// 按`"type"`字段区分的层参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerParameter {
    Crop(CropParameter),
    Unpooling(UnpoolingParameter),
}

/// 带名称的层配置，如`{"name": "crop1", "type": "crop", "crop_h": [2]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub param: LayerParameter,
}

impl LayerConfig {
    pub fn from_json(json: &str) -> Result<Self, LayerError> {
        Ok(serde_json::from_str(json)?)
    }

    /// 解析一组按顺序堆叠的层配置
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, LayerError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Border removed from both ends of one spatial axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Border {
    pub leading: usize,
    pub trailing: usize,
}

impl Border {
    pub const fn new(leading: usize, trailing: usize) -> Self {
        Self { leading, trailing }
    }

    /// 0个值 → 不裁剪；1个值 → 两侧对称；2个值 → (前, 后)；更多则报错
    pub fn resolve(values: &[usize], axis: SpatialAxis) -> Result<Self, LayerError> {
        match *values {
            [] => Ok(Self::default()),
            [v] => Ok(Self::new(v, v)),
            [leading, trailing] => Ok(Self::new(leading, trailing)),
            _ => Err(LayerError::TooManyCropValues {
                axis,
                got: values.len(),
            }),
        }
    }

    /// `[leading, extent - trailing)`, rejected when empty or inverted.
    pub fn window(&self, extent: usize, axis: SpatialAxis) -> Result<Range<usize>, LayerError> {
        match extent.checked_sub(self.trailing) {
            Some(end) if end > self.leading => Ok(self.leading..end),
            _ => Err(LayerError::EmptyCropWindow {
                axis,
                extent,
                leading: self.leading,
                trailing: self.trailing,
            }),
        }
    }
}
