use super::Tensor;
use std::ops::{Index, IndexMut};

// 引用式索引，越界时 panic（与 ndarray 一致）
impl Index<[usize; 4]> for Tensor {
    type Output = f32;

    fn index(&self, index: [usize; 4]) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<[usize; 4]> for Tensor {
    fn index_mut(&mut self, index: [usize; 4]) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl Tensor {
    /// 取`(n, c, h, w)`处的值，越界时返回`None`
    pub fn at(&self, n: usize, c: usize, h: usize, w: usize) -> Option<f32> {
        self.data.get([n, c, h, w]).copied()
    }
}
