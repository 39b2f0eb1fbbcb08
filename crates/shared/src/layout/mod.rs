//! Раскладка досок: параметры -> производные смещения -> плоский список досок.
//!
//! Каждая конструкция — чистая функция от набора параметров. Результат
//! не зависит от состояния просмотра (разнесение применяется позже).

mod bar;
mod platform;

use crate::parameters::{ParameterError, ParameterSet, Resolved};
use crate::{Model, ModelKind};

/// Ошибки раскладки
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Ошибка вычисления параметров
    Parameter(ParameterError),
    /// Размер вне допустимого диапазона
    InvalidDimension { name: String, value: f64 },
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::Parameter(e) => write!(f, "{}", e),
            LayoutError::InvalidDimension { name, value } => {
                write!(f, "Invalid dimension '{}' = {}", name, value)
            }
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LayoutError::Parameter(e) => Some(e),
            LayoutError::InvalidDimension { .. } => None,
        }
    }
}

impl From<ParameterError> for LayoutError {
    fn from(e: ParameterError) -> Self {
        LayoutError::Parameter(e)
    }
}

/// Параметры по умолчанию для конструкции
pub fn default_parameters(kind: ModelKind) -> ParameterSet {
    match kind {
        ModelKind::Platform => platform::default_parameters(),
        ModelKind::Bench => bar::default_parameters(bar::Top::Boards),
        ModelKind::SlottedBar => bar::default_parameters(bar::Top::Slats),
    }
}

/// Построить модель из параметров
pub fn build_model(kind: ModelKind, params: &ParameterSet) -> Result<Model, LayoutError> {
    let resolved = params.resolve()?;
    let boards = match kind {
        ModelKind::Platform => platform::layout(&resolved)?,
        ModelKind::Bench => bar::layout(&resolved, bar::Top::Boards)?,
        ModelKind::SlottedBar => bar::layout(&resolved, bar::Top::Slats)?,
    };

    if let Some(bad) = boards.iter().find(|b| !b.has_valid_dimensions()) {
        let value = [bad.length, bad.width, bad.thickness]
            .into_iter()
            .find(|v| !(v.is_finite() && *v > 0.0))
            .unwrap_or(f64::NAN);
        return Err(LayoutError::InvalidDimension {
            name: bad.name.clone(),
            value,
        });
    }

    Ok(Model { kind, boards })
}

/// Положительная конечная длина
pub(crate) fn length(resolved: &Resolved, name: &str) -> Result<f64, LayoutError> {
    let value = resolved.get(name)?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(LayoutError::InvalidDimension {
            name: name.to_string(),
            value,
        })
    }
}

/// Конечное значение (может быть нулём или отрицательным)
pub(crate) fn offset(resolved: &Resolved, name: &str) -> Result<f64, LayoutError> {
    let value = resolved.get(name)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LayoutError::InvalidDimension {
            name: name.to_string(),
            value,
        })
    }
}

/// Количество: целое от 1 до 1000, дробные значения отвергаются
pub(crate) fn count(resolved: &Resolved, name: &str) -> Result<usize, LayoutError> {
    let value = resolved.get(name)?;
    let rounded = value.round();
    if value.is_finite() && (value - rounded).abs() < 1e-9 && (1.0..=1000.0).contains(&rounded) {
        Ok(rounded as usize)
    } else {
        Err(LayoutError::InvalidDimension {
            name: name.to_string(),
            value,
        })
    }
}

/// Смещения `count` элементов с шагом `pitch`, симметрично относительно нуля
pub(crate) fn centered_offsets(count: usize, pitch: f64) -> Vec<f64> {
    let mid = (count as f64 - 1.0) / 2.0;
    (0..count).map(|i| (i as f64 - mid) * pitch).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parameter;

    #[test]
    fn test_centered_offsets() {
        assert_eq!(centered_offsets(5, 2.0), vec![-4.0, -2.0, 0.0, 2.0, 4.0]);
        assert_eq!(centered_offsets(2, 3.0), vec![-1.5, 1.5]);
        assert_eq!(centered_offsets(1, 3.0), vec![0.0]);
    }

    #[test]
    fn test_every_kind_builds_with_defaults() {
        for kind in ModelKind::all() {
            let model = build_model(*kind, &default_parameters(*kind)).unwrap();
            assert_eq!(model.kind, *kind);
            assert!(!model.boards.is_empty());
            assert!(model.boards.iter().all(|b| b.has_valid_dimensions()));
        }
    }

    #[test]
    fn test_layout_is_deterministic() {
        for kind in ModelKind::all() {
            let params = default_parameters(*kind);
            assert_eq!(build_model(*kind, &params), build_model(*kind, &params));
        }
    }

    #[test]
    fn test_parameter_error_propagates() {
        let mut params = default_parameters(ModelKind::Platform);
        params.set_formula("long_width", "8 * nope").unwrap();
        assert!(matches!(
            build_model(ModelKind::Platform, &params),
            Err(LayoutError::Parameter(ParameterError::NotFound(_)))
        ));
    }

    #[test]
    fn test_count_rejects_zero() {
        let mut params = default_parameters(ModelKind::Platform);
        params.set_number("wall_courses", 0.0).unwrap();
        let err = build_model(ModelKind::Platform, &params).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidDimension { ref name, .. } if name == "wall_courses"));
    }

    #[test]
    fn test_fractional_count_rejected() {
        let mut params = default_parameters(ModelKind::Bench);
        params.set_number("top_boards", 2.5).unwrap();
        let err = build_model(ModelKind::Bench, &params).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidDimension { ref name, .. } if name == "top_boards"));

        let mut params = default_parameters(ModelKind::Platform);
        params.set_formula("floorboard_count", "11 / 2.0").unwrap();
        assert!(build_model(ModelKind::Platform, &params).is_err());
    }

    #[test]
    fn test_integral_formula_count_accepted() {
        let mut params = default_parameters(ModelKind::Platform);
        params.set_formula("floorboard_count", "12 / 2").unwrap();
        let model = build_model(ModelKind::Platform, &params).unwrap();
        let floor = model.boards.iter().filter(|b| b.stock == crate::Stock::DeckBoard).count();
        assert_eq!(floor, 6);
    }

    #[test]
    fn test_negative_length_rejected() {
        let mut params = default_parameters(ModelKind::Bench);
        params.insert(Parameter::number("bar_length", -5.0)).unwrap();
        assert!(matches!(
            build_model(ModelKind::Bench, &params),
            Err(LayoutError::InvalidDimension { .. })
        ));
    }
}
