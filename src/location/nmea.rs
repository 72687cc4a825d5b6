// src/location/nmea.rs
//! NMEA sentence parsing for position fixes

use super::Accuracy;
use crate::geo::Coordinate;

/// Extract a position fix from a GGA or RMC sentence.
///
/// Returns `None` for other sentence types, sentences with a bad checksum,
/// and sentences that report no fix or a fix worse than `accuracy` allows.
pub fn parse_fix(line: &str, accuracy: Accuracy) -> Option<Coordinate> {
    if !checksum_ok(line) {
        return None;
    }

    let body = line.split('*').next().unwrap_or(line);
    let parts: Vec<&str> = body.split(',').collect();
    let kind = parts.first()?.trim_start_matches('$');

    if kind.ends_with("GGA") {
        parse_gga(&parts, accuracy)
    } else if kind.ends_with("RMC") {
        parse_rmc(&parts)
    } else {
        None
    }
}

/// Validate the `*hh` checksum when one is present
pub fn checksum_ok(line: &str) -> bool {
    let Some(stripped) = line.trim().strip_prefix('$') else {
        return false;
    };
    match stripped.split_once('*') {
        Some((payload, checksum)) => {
            let computed = payload.bytes().fold(0u8, |acc, b| acc ^ b);
            u8::from_str_radix(checksum.trim(), 16).map_or(false, |expected| expected == computed)
        }
        None => true,
    }
}

/// GGA (Global Positioning System Fix Data)
fn parse_gga(parts: &[&str], accuracy: Accuracy) -> Option<Coordinate> {
    if parts.len() < 9 {
        return None;
    }

    let quality = parts[6].parse::<u8>().ok()?;
    if quality == 0 {
        return None;
    }

    if let Some(max_hdop) = accuracy.max_hdop() {
        if let Ok(hdop) = parts[8].parse::<f64>() {
            if hdop > max_hdop {
                return None;
            }
        }
    }

    coordinate_from_fields(parts[2], parts[3], parts[4], parts[5])
}

/// RMC (Recommended Minimum), status field must be `A` (active)
fn parse_rmc(parts: &[&str]) -> Option<Coordinate> {
    if parts.len() < 7 || parts[2] != "A" {
        return None;
    }

    coordinate_from_fields(parts[3], parts[4], parts[5], parts[6])
}

fn coordinate_from_fields(lat: &str, lat_hemi: &str, lon: &str, lon_hemi: &str) -> Option<Coordinate> {
    let latitude = parse_degrees_minutes(lat, lat_hemi, "S")?;
    let longitude = parse_degrees_minutes(lon, lon_hemi, "W")?;
    Some(Coordinate::new(latitude, longitude))
}

/// `ddmm.mmmm` / `dddmm.mmmm` to signed decimal degrees
fn parse_degrees_minutes(value: &str, hemisphere: &str, negative: &str) -> Option<f64> {
    if value.is_empty() || hemisphere.is_empty() {
        return None;
    }

    let raw = value.parse::<f64>().ok()?;
    let degrees = (raw / 100.0).trunc();
    let minutes = raw - degrees * 100.0;
    let decimal = degrees + minutes / 60.0;

    Some(if hemisphere == negative { -decimal } else { decimal })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GGA: &str = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";
    const RMC: &str = "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A";

    #[test]
    fn test_gga_fix() {
        let fix = parse_fix(GGA, Accuracy::High).unwrap();
        assert!((fix.latitude - 48.1173).abs() < 1e-4);
        assert!((fix.longitude - 11.516_667).abs() < 1e-4);
    }

    #[test]
    fn test_rmc_fix() {
        let fix = parse_fix(RMC, Accuracy::High).unwrap();
        assert!((fix.latitude - 48.1173).abs() < 1e-4);
    }

    #[test]
    fn test_southern_western_hemispheres() {
        let line = "$GNGGA,123519,3352.000,S,15112.000,W,1,08,0.9,10.0,M,0.0,M,,";
        let fix = parse_fix(line, Accuracy::High).unwrap();
        assert!((fix.latitude + 33.866_667).abs() < 1e-4);
        assert!((fix.longitude + 151.2).abs() < 1e-4);
    }

    #[test]
    fn test_no_fix_quality() {
        let line = "$GPGGA,123519,4807.038,N,01131.000,E,0,00,99.9,,M,,M,,";
        assert!(parse_fix(line, Accuracy::Low).is_none());
    }

    #[test]
    fn test_hdop_threshold() {
        let line = "$GPGGA,123519,4807.038,N,01131.000,E,1,04,3.5,545.4,M,46.9,M,,";
        assert!(parse_fix(line, Accuracy::High).is_none());
        assert!(parse_fix(line, Accuracy::Balanced).is_some());
    }

    #[test]
    fn test_void_rmc() {
        let line = "$GPRMC,123519,V,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W";
        assert!(parse_fix(line, Accuracy::Low).is_none());
    }

    #[test]
    fn test_bad_checksum() {
        let corrupted = GGA.replace("*47", "*48");
        assert!(!checksum_ok(&corrupted));
        assert!(parse_fix(&corrupted, Accuracy::Low).is_none());
    }

    #[test]
    fn test_other_sentences_ignored() {
        let gsv = "$GPGSV,3,1,12,01,40,083,46,02,17,308,41,12,07,344,39,14,22,228,45*75";
        assert!(parse_fix(gsv, Accuracy::Low).is_none());
        assert!(parse_fix("$INVALID,123,456", Accuracy::Low).is_none());
        assert!(parse_fix("garbage", Accuracy::Low).is_none());
    }
}
