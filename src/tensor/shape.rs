use crate::errors::TensorError;

/// `[N, C, H, W]`形状，同时负责行优先（W 最快）的扁平偏移计算。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Shape4 {
    pub num: usize,
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl Shape4 {
    pub const fn new(num: usize, channels: usize, height: usize, width: usize) -> Self {
        Self {
            num,
            channels,
            height,
            width,
        }
    }

    pub const fn dims(&self) -> [usize; 4] {
        [self.num, self.channels, self.height, self.width]
    }

    /// 元素总数
    pub const fn count(&self) -> usize {
        self.num * self.channels * self.height * self.width
    }

    /// 单个(n, c)平面的元素数
    pub const fn plane(&self) -> usize {
        self.height * self.width
    }

    /// `(n, c, h, w)`在扁平缓冲区中的下标
    pub fn offset(&self, n: usize, c: usize, h: usize, w: usize) -> usize {
        debug_assert!(
            n < self.num && c < self.channels && h < self.height && w < self.width,
            "index ({n}, {c}, {h}, {w}) out of bounds for shape {:?}",
            self.dims()
        );
        ((n * self.channels + c) * self.height + h) * self.width + w
    }

    /// `offset`的逆运算；越界时返回`None`
    pub const fn unravel(&self, index: usize) -> Option<[usize; 4]> {
        if index >= self.count() {
            return None;
        }
        let w = index % self.width;
        let rest = index / self.width;
        let h = rest % self.height;
        let rest = rest / self.height;
        let c = rest % self.channels;
        let n = rest / self.channels;
        Some([n, c, h, w])
    }

    /// 保持 N、C 不变，替换空间尺寸
    pub const fn with_spatial(&self, height: usize, width: usize) -> Self {
        Self::new(self.num, self.channels, height, width)
    }
}

impl From<[usize; 4]> for Shape4 {
    fn from([num, channels, height, width]: [usize; 4]) -> Self {
        Self::new(num, channels, height, width)
    }
}

impl TryFrom<&[usize]> for Shape4 {
    type Error = TensorError;

    fn try_from(dims: &[usize]) -> Result<Self, Self::Error> {
        match *dims {
            [num, channels, height, width] => Ok(Self::new(num, channels, height, width)),
            _ => Err(TensorError::InvalidDimension(dims.to_vec())),
        }
    }
}
