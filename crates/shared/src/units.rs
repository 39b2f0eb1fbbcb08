//! Единицы измерения. Вся геометрия считается в дюймах.

/// Дюймов в футе
pub const FEET: f64 = 12.0;

/// Метров в дюйме (масштаб сцены)
pub const INCH_UNITS: f64 = 0.0254;

pub const NINETY_DEGREES: f64 = std::f64::consts::FRAC_PI_2;

pub fn inches_to_meters(inches: f64) -> f64 {
    inches * INCH_UNITS
}

/// Короткая запись числа дюймов: не более трёх знаков после точки,
/// без хвостовых нулей.
pub fn format_inches(value: f64) -> String {
    let s = format!("{:.3}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_inches() {
        assert_eq!(format_inches(96.0), "96");
        assert_eq!(format_inches(1.5), "1.5");
        assert_eq!(format_inches(35.5), "35.5");
        assert_eq!(format_inches(32.0 / 3.0), "10.667");
        assert_eq!(format_inches(-0.0001), "0");
        assert_eq!(format_inches(0.0), "0");
    }

    #[test]
    fn test_inches_to_meters() {
        assert!((inches_to_meters(FEET) - 0.3048).abs() < 1e-12);
    }
}
