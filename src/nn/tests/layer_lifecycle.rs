/*
 * @Description  : 层生命周期：Unconfigured → Ready，setup 失败进入 Failed 终态
 */

use super::gaussian_bottom;
use crate::errors::{BlobRole, LayerError};
use crate::nn::{
    CropLayer, CropParameter, LayerParameter, LayerPhase, LayerType, TraitLayer, UnpoolingLayer,
    UnpoolingParameter,
};
use crate::tensor::{Blob, Shape4};

#[test]
fn test_new_layer_is_unconfigured() {
    let crop = CropLayer::new(CropParameter::default());
    let unpool = UnpoolingLayer::new(UnpoolingParameter::new(2));

    assert_eq!(crop.phase(), LayerPhase::Unconfigured);
    assert_eq!(unpool.phase(), LayerPhase::Unconfigured);
    assert!(!crop.is_ready());
}

#[test]
fn test_forward_before_setup_is_rejected() {
    let bottom = gaussian_bottom();
    let mut top = Blob::new(Shape4::new(2, 3, 12, 10));
    let layer = UnpoolingLayer::new(UnpoolingParameter::new(2));

    let err = layer.forward(&[&bottom], &mut [&mut top]).unwrap_err();
    assert!(matches!(
        err,
        LayerError::NotReady {
            layer: "Unpooling",
            phase: LayerPhase::Unconfigured,
        }
    ));
}

#[test]
fn test_backward_before_setup_is_rejected() {
    let mut bottom = gaussian_bottom();
    let top = Blob::new(Shape4::new(2, 3, 6, 5));
    let layer = CropLayer::new(CropParameter::default());

    let err = layer.backward(&[&top], &[true], &mut [&mut bottom]).unwrap_err();
    assert!(matches!(err, LayerError::NotReady { layer: "Crop", .. }));
}

#[test]
fn test_setup_enters_ready() -> Result<(), LayerError> {
    let bottom = gaussian_bottom();
    let mut top = Blob::new(Shape4::default());
    let mut layer = CropLayer::new(CropParameter::new(&[1], &[1]));

    layer.set_up(&[&bottom], &mut [&mut top])?;

    assert_eq!(layer.phase(), LayerPhase::Ready);
    assert!(layer.is_ready());
    Ok(())
}

// ==================== blob 数量 ====================

#[test]
fn test_wrong_bottom_count_fails_setup() {
    let bottom = gaussian_bottom();
    let mut top = Blob::new(Shape4::default());
    let mut layer = CropLayer::new(CropParameter::default());

    let err = layer.set_up(&[&bottom, &bottom], &mut [&mut top]).unwrap_err();

    assert!(matches!(
        err,
        LayerError::BlobCount {
            layer: "Crop",
            role: BlobRole::Bottom,
            expected: 1,
            got: 2,
        }
    ));
    assert_eq!(layer.phase(), LayerPhase::Failed);
}

#[test]
fn test_wrong_top_count_fails_setup() {
    let bottom = gaussian_bottom();
    let mut layer = UnpoolingLayer::new(UnpoolingParameter::new(2));

    let err = layer.set_up(&[&bottom], &mut []).unwrap_err();

    assert!(matches!(
        err,
        LayerError::BlobCount {
            role: BlobRole::Top,
            expected: 1,
            got: 0,
            ..
        }
    ));
    assert_eq!(layer.phase(), LayerPhase::Failed);
}

#[test]
fn test_empty_bottom_fails_setup() {
    let mut top = Blob::new(Shape4::default());
    let mut layer = UnpoolingLayer::new(UnpoolingParameter::new(2));

    let err = layer.set_up(&[], &mut [&mut top]).unwrap_err();
    assert!(matches!(
        err,
        LayerError::BlobCount {
            role: BlobRole::Bottom,
            got: 0,
            ..
        }
    ));
}

// ==================== Failed 终态 ====================

/// setup 失败后，层不能再被使用，重新 setup 也不行
#[test]
fn test_failed_layer_stays_failed() {
    let bottom = gaussian_bottom();
    let mut top = Blob::new(Shape4::default());
    let mut layer = CropLayer::new(CropParameter::new(&[3], &[]));

    assert!(layer.set_up(&[&bottom], &mut [&mut top]).is_err());
    assert_eq!(layer.phase(), LayerPhase::Failed);

    let err = layer.forward(&[&bottom], &mut [&mut top]).unwrap_err();
    assert!(matches!(err, LayerError::Failed { layer: "Crop" }));

    let err = layer.reshape(&[&bottom], &mut [&mut top]).unwrap_err();
    assert!(matches!(err, LayerError::Failed { .. }));

    let err = layer.set_up(&[&bottom], &mut [&mut top]).unwrap_err();
    assert!(matches!(err, LayerError::Failed { .. }));
}

// ==================== 其它 ====================

#[test]
fn test_propagate_down_length_must_match() -> Result<(), LayerError> {
    let mut bottom = gaussian_bottom();
    let mut top = Blob::new(Shape4::default());
    let mut layer = CropLayer::new(CropParameter::new(&[1], &[]));
    layer.set_up(&[&bottom], &mut [&mut top])?;

    let err = layer.backward(&[&top], &[], &mut [&mut bottom]).unwrap_err();
    assert!(matches!(
        err,
        LayerError::PropagateDownCount {
            expected: 1,
            got: 0,
        }
    ));
    Ok(())
}

/// 已 Ready 的层可以针对新输入重新 setup
#[test]
fn test_setup_again_on_ready_layer() -> Result<(), LayerError> {
    let bottom = gaussian_bottom();
    let mut top = Blob::new(Shape4::default());
    let mut layer = UnpoolingLayer::new(UnpoolingParameter::new(2));
    layer.set_up(&[&bottom], &mut [&mut top])?;

    let other = Blob::new(Shape4::new(4, 1, 2, 2));
    layer.set_up(&[&other], &mut [&mut top])?;

    assert_eq!(top.shape(), Shape4::new(4, 1, 4, 4));
    assert_eq!(layer.phase(), LayerPhase::Ready);
    Ok(())
}

/// 通过 LayerType 分发调用与直接调用结果一致
#[test]
fn test_layer_type_dispatch() -> Result<(), LayerError> {
    let bottom = gaussian_bottom();
    let mut direct_top = Blob::new(Shape4::default());
    let mut dispatched_top = Blob::new(Shape4::default());

    let mut direct = CropLayer::new(CropParameter::new(&[2, 1], &[1, 3]));
    let mut dispatched =
        LayerType::from_param(&LayerParameter::Crop(CropParameter::new(&[2, 1], &[1, 3])));

    direct.set_up(&[&bottom], &mut [&mut direct_top])?;
    dispatched.set_up(&[&bottom], &mut [&mut dispatched_top])?;
    direct.forward(&[&bottom], &mut [&mut direct_top])?;
    dispatched.forward(&[&bottom], &mut [&mut dispatched_top])?;

    assert_eq!(dispatched.phase(), LayerPhase::Ready);
    assert_eq!(dispatched_top, direct_top);
    Ok(())
}
