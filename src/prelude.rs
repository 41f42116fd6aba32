pub use crate::client::QuickChart;
pub use crate::config::{ChartSpec, ChartValue};
pub use crate::helpers::{
    GradientDimensions, GradientStop, Helper, gradient_fill, gradient_fill_helper, image_fill,
    pattern,
};
pub use crate::{Error, Result};
