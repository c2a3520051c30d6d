use gdal::raster::{GdalDataType, GdalType};
use num_traits::{NumCast, ToPrimitive};

/// Numeric sample type a raster band can hold.
///
/// The on-disk GDAL type of each sample type comes from [`GdalType`], so the
/// codec never branches on the concrete type.
pub trait Sample:
    Copy + PartialOrd + Default + ToPrimitive + NumCast + GdalType + Send + Sync + std::fmt::Debug + 'static
{
    fn data_type() -> GdalDataType {
        <Self as GdalType>::datatype()
    }

    fn to_f64_lossy(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }

    fn is_nan(self) -> bool {
        #[allow(clippy::eq_op)]
        let nan = self != self;
        nan
    }
}

macro_rules! impl_sample {
    ($($t:ty),*) => {
        $(impl Sample for $t {})*
    };
}

impl_sample!(u8, u16, i16, u32, i32, f32, f64);
