pub mod allocation;
pub mod normalization;

pub use allocation::{Buckets, TaskAllocator};
pub use normalization::{
    DeficitPolicy, HOURS_FLOOR, HourNormalizer, NormalizerSettings, round_hours,
};
