use thiserror::Error;
mod ops;
pub use self::ops::*;

use crate::nn::LayerPhase;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    #[error("数据长度与形状不匹配：形状{shape:?}需要{expected}个元素，实际得到{got}个")]
    DataLengthMismatch {
        shape: [usize; 4],
        expected: usize,
        got: usize,
    },
    #[error("张量形状不一致：期望{expected:?}，得到{got:?}")]
    ShapeMismatch { expected: [usize; 4], got: [usize; 4] },
    #[error("张量必须是4维[N, C, H, W]，得到{0:?}")]
    InvalidDimension(Vec<usize>),
}

/// Errors raised by layer setup, reshape and the forward/backward wrappers.
#[derive(Error, Debug)]
pub enum LayerError {
    #[error("{layer} layer takes exactly {expected} {role} blob(s), got {got}")]
    BlobCount {
        layer: &'static str,
        role: BlobRole,
        expected: usize,
        got: usize,
    },
    #[error("at most 2 crop values are allowed on the {axis} axis, got {got}")]
    TooManyCropValues { axis: SpatialAxis, got: usize },
    // 数字比较用
    #[error("{value_name}须{operator}{threshold}")]
    ValueMustSatisfyComparison {
        value_name: String,
        operator: ComparisonOperator,
        threshold: usize,
    },
    #[error(
        "crop output {axis} should be greater than zero: extent {extent} minus borders ({leading}, {trailing})"
    )]
    EmptyCropWindow {
        axis: SpatialAxis,
        extent: usize,
        leading: usize,
        trailing: usize,
    },
    #[error("propagate_down needs one flag per bottom blob: expected {expected}, got {got}")]
    PropagateDownCount { expected: usize, got: usize },
    #[error("{layer} layer is {phase}; call set_up first")]
    NotReady {
        layer: &'static str,
        phase: LayerPhase,
    },
    #[error("{layer} layer failed setup and can no longer be used")]
    Failed { layer: &'static str },
    #[error("invalid layer configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
    #[error(transparent)]
    Tensor(#[from] TensorError),
}
