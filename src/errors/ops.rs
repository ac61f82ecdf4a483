use std::fmt::{self, Display};

/// 比较运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    GreaterOrEqual,
    LessOrEqual,
    GreaterThan,
    LessThan,
    Equal,
    NotEqual,
}
impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator_name = match self {
            ComparisonOperator::GreaterOrEqual => "≥",
            ComparisonOperator::LessOrEqual => "≤",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
        };
        write!(f, "{}", operator_name)
    }
}

/// Spatial axis of a `[N, C, H, W]` blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpatialAxis {
    Height,
    Width,
}
impl Display for SpatialAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axis_name = match self {
            SpatialAxis::Height => "height",
            SpatialAxis::Width => "width",
        };
        write!(f, "{}", axis_name)
    }
}

/// Which side of a layer a blob list sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobRole {
    Bottom,
    Top,
}
impl Display for BlobRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role_name = match self {
            BlobRole::Bottom => "bottom (input)",
            BlobRole::Top => "top (output)",
        };
        write!(f, "{}", role_name)
    }
}
