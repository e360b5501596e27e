pub mod csv_loader;
pub mod frames;
pub mod heart_rate;
pub mod respiratory;

pub use csv_loader::{load_rows, load_series, SampleSeries};
pub use frames::{FsMediaResolver, ImageSequenceDecoder, ImageSequenceDecoderFactory};
pub use heart_rate::{
    FrameDecoder, FrameDecoderFactory, HeartRateConfig, HeartRateEstimator, MediaResolver,
    RegionOfInterest,
};
pub use respiratory::{estimate_respiratory_rate, RespiratoryConfig};
