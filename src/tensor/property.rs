/*
 * @Description  : 本类仅包含一些属性方法，不包含任何运算方法
 */

use super::{Shape4, Tensor};
use ndarray::{ArrayView4, ArrayViewMut4};

impl Tensor {
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓快照/view(_mut)↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    pub fn view(&self) -> ArrayView4<'_, f32> {
        self.data.view()
    }
    pub fn view_mut(&mut self) -> ArrayViewMut4<'_, f32> {
        self.data.view_mut()
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑快照/view(_mut)↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    pub fn shape(&self) -> Shape4 {
        let (num, channels, height, width) = self.data.dim();
        Shape4::new(num, channels, height, width)
    }

    /// 计算张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 判断两个张量的形状是否严格一致
    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    /// 按内存顺序（即`Shape4::offset`的顺序）迭代所有元素
    pub fn iter(&self) -> impl Iterator<Item = &f32> {
        self.data.iter()
    }

    /// 按内存顺序复制出扁平数据
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }
}
