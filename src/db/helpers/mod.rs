use anyhow::{anyhow, bail, Result};

use crate::db::models::MAX_RATING;

pub fn to_rating(value: i64, field: &str) -> Result<u8> {
    let rating = u8::try_from(value).map_err(|_| anyhow!("{field} contains invalid rating {value}"))?;
    if rating > MAX_RATING {
        bail!("{field} rating {rating} exceeds {MAX_RATING}");
    }
    Ok(rating)
}

pub fn check_vital(value: f64, field: &str) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        bail!("{field} must be a non-negative number, got {value}");
    }
    Ok(value)
}
