use evalexpr::{build_operator_tree, ContextWithMutableVariables, HashMapContext, Node, Value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Результат вычисления параметра
pub type ParameterResult = Result<f64, ParameterError>;

/// Ошибки при работе с параметрами
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// Параметр не найден
    NotFound(String),
    /// Ошибка парсинга формулы
    ParseError(String),
    /// Ошибка вычисления формулы
    EvaluationError(String),
    /// Циклическая зависимость
    CircularDependency(Vec<String>),
    /// Неверный тип значения
    InvalidType(String),
    /// Недопустимое имя параметра
    InvalidName(String),
}

impl std::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterError::NotFound(name) => write!(f, "Parameter '{}' not found", name),
            ParameterError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ParameterError::EvaluationError(msg) => write!(f, "Evaluation error: {}", msg),
            ParameterError::CircularDependency(chain) => {
                write!(f, "Circular dependency: {}", chain.join(" -> "))
            }
            ParameterError::InvalidType(msg) => write!(f, "Invalid type: {}", msg),
            ParameterError::InvalidName(name) => write!(f, "Invalid parameter name '{}'", name),
        }
    }
}

impl std::error::Error for ParameterError {}

/// Значение параметра: число или формула
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParameterValue {
    Number { value: f64 },
    Formula { expression: String },
}

/// Именованный параметр модели
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: ParameterValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Parameter {
    pub fn number(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value: ParameterValue::Number { value },
            unit: None,
            description: None,
        }
    }

    pub fn formula(name: &str, expression: &str) -> Self {
        Self {
            name: name.to_string(),
            value: ParameterValue::Formula {
                expression: expression.to_string(),
            },
            unit: None,
            description: None,
        }
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn is_formula(&self) -> bool {
        matches!(self.value, ParameterValue::Formula { .. })
    }
}

/// Упорядоченный набор параметров (порядок сохраняется для отображения)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    params: Vec<Parameter>,
}

/// Вычисленные значения всех параметров
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolved {
    values: BTreeMap<String, f64>,
}

impl Resolved {
    pub fn get(&self, name: &str) -> ParameterResult {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| ParameterError::NotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parameters(params: Vec<Parameter>) -> Self {
        Self { params }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.params.iter().map(|p| p.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Добавить параметр или заменить существующий с тем же именем (позиция сохраняется)
    pub fn insert(&mut self, param: Parameter) -> Result<(), ParameterError> {
        if !is_valid_name(&param.name) {
            return Err(ParameterError::InvalidName(param.name));
        }
        match self.params.iter_mut().find(|p| p.name == param.name) {
            Some(existing) => *existing = param,
            None => self.params.push(param),
        }
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<Parameter> {
        let idx = self.params.iter().position(|p| p.name == name)?;
        Some(self.params.remove(idx))
    }

    /// Переименовать параметр. Формулы, ссылающиеся на старое имя, не переписываются.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<(), ParameterError> {
        if !is_valid_name(new_name) || self.contains(new_name) {
            return Err(ParameterError::InvalidName(new_name.to_string()));
        }
        let param = self
            .params
            .iter_mut()
            .find(|p| p.name == old_name)
            .ok_or_else(|| ParameterError::NotFound(old_name.to_string()))?;
        param.name = new_name.to_string();
        Ok(())
    }

    pub fn set_number(&mut self, name: &str, value: f64) -> Result<(), ParameterError> {
        let param = self
            .params
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| ParameterError::NotFound(name.to_string()))?;
        param.value = ParameterValue::Number { value };
        Ok(())
    }

    /// Заменить значение формулой. Формула проверяется парсером до записи.
    pub fn set_formula(&mut self, name: &str, expression: &str) -> Result<(), ParameterError> {
        build_operator_tree(expression).map_err(|e| ParameterError::ParseError(e.to_string()))?;
        let param = self
            .params
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| ParameterError::NotFound(name.to_string()))?;
        param.value = ParameterValue::Formula {
            expression: expression.to_string(),
        };
        Ok(())
    }

    /// Вычислить значение параметра
    pub fn evaluate(&self, name: &str) -> ParameterResult {
        let mut visiting = HashSet::new();
        let mut path = Vec::new();
        self.evaluate_internal(name, &mut visiting, &mut path)
    }

    fn evaluate_internal(
        &self,
        name: &str,
        visiting: &mut HashSet<String>,
        path: &mut Vec<String>,
    ) -> ParameterResult {
        // Проверка на циклическую зависимость
        if visiting.contains(name) {
            path.push(name.to_string());
            return Err(ParameterError::CircularDependency(path.clone()));
        }

        let param = self
            .get(name)
            .ok_or_else(|| ParameterError::NotFound(name.to_string()))?;

        visiting.insert(name.to_string());
        path.push(name.to_string());

        let result = match &param.value {
            ParameterValue::Number { value } => Ok(*value),
            ParameterValue::Formula { expression } => {
                self.evaluate_formula(expression, visiting, path)
            }
        };

        visiting.remove(name);
        path.pop();

        result
    }

    fn evaluate_formula(
        &self,
        expression: &str,
        visiting: &mut HashSet<String>,
        path: &mut Vec<String>,
    ) -> ParameterResult {
        let tree = build_operator_tree(expression)
            .map_err(|e| ParameterError::ParseError(e.to_string()))?;

        let mut context = HashMapContext::new();
        context
            .set_value("PI".to_string(), Value::Float(std::f64::consts::PI))
            .ok();
        context
            .set_value("E".to_string(), Value::Float(std::f64::consts::E))
            .ok();

        for dep in referenced_identifiers(&tree) {
            if dep == "PI" || dep == "E" {
                continue;
            }
            let value = self.evaluate_internal(&dep, visiting, path)?;
            context
                .set_value(dep, Value::Float(value))
                .map_err(|e| ParameterError::EvaluationError(e.to_string()))?;
        }

        let value = tree
            .eval_with_context(&context)
            .map_err(|e| ParameterError::EvaluationError(e.to_string()))?;

        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            other => Err(ParameterError::InvalidType(format!(
                "Expected number, got {:?}",
                other
            ))),
        }
    }

    /// Все параметры с вычисленными значениями (в порядке набора)
    pub fn evaluate_all(&self) -> Vec<(String, ParameterResult)> {
        self.params
            .iter()
            .map(|p| (p.name.clone(), self.evaluate(&p.name)))
            .collect()
    }

    /// Вычислить все параметры; первая ошибка прерывает вычисление
    pub fn resolve(&self) -> Result<Resolved, ParameterError> {
        let mut values = BTreeMap::new();
        for param in &self.params {
            values.insert(param.name.clone(), self.evaluate(&param.name)?);
        }
        Ok(Resolved { values })
    }

    /// Параметры, на которые ссылается формула
    pub fn dependencies(&self, name: &str) -> HashSet<String> {
        let Some(ParameterValue::Formula { expression }) = self.get(name).map(|p| &p.value) else {
            return HashSet::new();
        };
        match build_operator_tree(expression) {
            Ok(tree) => referenced_identifiers(&tree)
                .into_iter()
                .filter(|dep| dep != name && self.contains(dep))
                .collect(),
            Err(_) => HashSet::new(),
        }
    }

    /// Проверить, есть ли циклические зависимости в параметрах
    pub fn has_circular_dependencies(&self) -> bool {
        self.params.iter().any(|p| {
            matches!(
                self.evaluate(&p.name),
                Err(ParameterError::CircularDependency(_))
            )
        })
    }
}

fn referenced_identifiers(tree: &Node) -> Vec<String> {
    let mut seen = Vec::new();
    for ident in tree.iter_variable_identifiers() {
        if !seen.iter().any(|s: &String| s == ident) {
            seen.push(ident.to_string());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(params: Vec<Parameter>) -> ParameterSet {
        ParameterSet::from_parameters(params)
    }

    #[test]
    fn test_evaluate_number_parameter() {
        let params = set(vec![Parameter::number("width", 10.0).with_unit("in")]);
        assert_eq!(params.evaluate("width"), Ok(10.0));
    }

    #[test]
    fn test_evaluate_formula_parameter() {
        let params = set(vec![
            Parameter::number("feet", 12.0),
            Parameter::formula("long_width", "8 * feet"),
            Parameter::formula("short_width", "8 * feet / 3"),
        ]);
        assert_eq!(params.evaluate("long_width"), Ok(96.0));
        assert_eq!(params.evaluate("short_width"), Ok(32.0));
    }

    #[test]
    fn test_integer_only_formula_widens() {
        let params = set(vec![Parameter::formula("n", "2 + 3")]);
        assert_eq!(params.evaluate("n"), Ok(5.0));
    }

    #[test]
    fn test_circular_dependency() {
        let params = set(vec![
            Parameter::formula("a", "b + 1"),
            Parameter::formula("b", "a + 1"),
        ]);
        assert!(matches!(
            params.evaluate("a"),
            Err(ParameterError::CircularDependency(_))
        ));
        assert!(params.has_circular_dependencies());
    }

    #[test]
    fn test_complex_formula_with_constants() {
        let params = set(vec![
            Parameter::number("radius", 5.0),
            Parameter::formula("area", "PI * radius^2"),
        ]);
        let value = params.evaluate("area").unwrap();
        assert!((value - std::f64::consts::PI * 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_dependencies_are_identifiers_not_substrings() {
        let params = set(vec![
            Parameter::number("width", 10.0),
            Parameter::number("long_width", 96.0),
            Parameter::formula("half", "long_width / 2"),
        ]);
        let deps = params.dependencies("half");
        assert!(deps.contains("long_width"));
        assert!(!deps.contains("width"));
        assert_eq!(deps.len(), 1);
    }

    #[test]
    fn test_missing_dependency_reports_not_found() {
        let params = set(vec![Parameter::formula("a", "missing * 2")]);
        assert_eq!(
            params.evaluate("a"),
            Err(ParameterError::NotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_parse_error() {
        let params = set(vec![Parameter::formula("a", "2 * (3")]);
        assert!(matches!(params.evaluate("a"), Err(ParameterError::ParseError(_))));
    }

    #[test]
    fn test_non_numeric_result_is_invalid_type() {
        let params = set(vec![Parameter::formula("a", "true")]);
        assert!(matches!(params.evaluate("a"), Err(ParameterError::InvalidType(_))));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut params = set(vec![Parameter::number("a", 1.0), Parameter::number("b", 2.0)]);
        params.insert(Parameter::number("a", 5.0)).unwrap();
        assert_eq!(params.names(), vec!["a", "b"]);
        assert_eq!(params.evaluate("a"), Ok(5.0));
    }

    #[test]
    fn test_insert_rejects_bad_name() {
        let mut params = ParameterSet::new();
        assert!(matches!(
            params.insert(Parameter::number("two words", 1.0)),
            Err(ParameterError::InvalidName(_))
        ));
        assert!(params.insert(Parameter::number("1abc", 1.0)).is_err());
    }

    #[test]
    fn test_rename() {
        let mut params = set(vec![Parameter::number("a", 1.0), Parameter::number("b", 2.0)]);
        params.rename("a", "c").unwrap();
        assert!(params.contains("c"));
        assert!(!params.contains("a"));
        assert!(params.rename("c", "b").is_err());
        assert!(params.rename("zzz", "y").is_err());
    }

    #[test]
    fn test_set_formula_validates_before_writing() {
        let mut params = set(vec![Parameter::number("a", 1.0)]);
        assert!(params.set_formula("a", "(1 + 2").is_err());
        assert_eq!(params.evaluate("a"), Ok(1.0));
        params.set_formula("a", "1 + 1").unwrap();
        assert_eq!(params.evaluate("a"), Ok(2.0));
    }

    #[test]
    fn test_resolve_all() {
        let params = set(vec![
            Parameter::number("feet", 12.0),
            Parameter::formula("len", "feet * 2"),
        ]);
        let resolved = params.resolve().unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved.get("len"), Ok(24.0));
        assert!(resolved.get("nope").is_err());
    }

    #[test]
    fn test_serde_roundtrip_keeps_order() {
        let params = set(vec![
            Parameter::number("z", 1.0),
            Parameter::formula("a", "z * 2"),
        ]);
        let json = serde_json::to_string(&params).unwrap();
        let back: ParameterSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back.names(), vec!["z", "a"]);
        assert_eq!(back, params);
    }
}
