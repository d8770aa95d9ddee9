//! Setting value validation.

use image_processor::ContextPolicy;

const MIB: u64 = 1024 * 1024;

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "SERVER_PORT" => {
            let v: u16 = value.parse().map_err(|_| "must be a port number")?;
            if v == 0 {
                return Err("must be between 1 and 65535".into());
            }
        }
        "MERGE_CONCURRENCY" => validate_int_range(value, 1, 64)?,
        "MAX_UPLOAD_BYTES" => validate_int_range(value, MIB, 1024 * MIB)?,
        "CANVAS_MAX_SIDE" => validate_int_range(value, 1, u64::from(u32::MAX))?,
        "CANVAS_MAX_PIXELS" => validate_int_range(value, 1, u64::MAX)?,
        "MERGE_CONTEXT" => {
            value.parse::<ContextPolicy>()?;
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: u64, max: u64) -> Result<(), String> {
    let v: u64 = value.parse().map_err(|_| "must be an integer")?;
    if !(min..=max).contains(&v) {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}
