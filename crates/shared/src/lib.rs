use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

pub mod layout;
pub mod parameters;
pub mod units;

pub use layout::{build_model, default_parameters, LayoutError};
pub use parameters::{Parameter, ParameterError, ParameterResult, ParameterSet, ParameterValue, Resolved};
pub use units::{format_inches, inches_to_meters, FEET, INCH_UNITS, NINETY_DEGREES};

/// Цвет доски по умолчанию (0x666655)
pub const BOARD_COLOR: [u8; 3] = [0x66, 0x66, 0x55];
/// Цвет доски под курсором (0x666666)
pub const HOVER_COLOR: [u8; 3] = [0x66, 0x66, 0x66];
/// Цвет рёбер (0x444433)
pub const EDGE_COLOR: [u8; 3] = [0x44, 0x44, 0x33];
/// Цвет земли (0xbbffbb)
pub const GROUND_COLOR: [u8; 3] = [0xbb, 0xff, 0xbb];

/// Сортамент пиломатериала (фактическое сечение в дюймах)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stock {
    /// 2x6: 1.5" x 5.5"
    TwoBySix,
    /// 2x4: 1.5" x 3.5"
    TwoByFour,
    /// 2x2: 1.5" x 1.5"
    TwoByTwo,
    /// Доска настила: 1" x 5.5"
    DeckBoard,
}

impl Stock {
    /// Сечение (толщина, ширина) в дюймах
    pub fn section(&self) -> (f64, f64) {
        match self {
            Stock::TwoBySix => (1.5, 5.5),
            Stock::TwoByFour => (1.5, 3.5),
            Stock::TwoByTwo => (1.5, 1.5),
            Stock::DeckBoard => (1.0, 5.5),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Stock::TwoBySix => "2x6",
            Stock::TwoByFour => "2x4",
            Stock::TwoByTwo => "2x2",
            Stock::DeckBoard => "Deck board",
        }
    }
}

/// Доска — прямоугольный брусок в сцене.
///
/// Локальные оси: длина по X, ширина по Y, толщина по Z.
/// Поворот применяется как у узла сцены: сначала X, затем Y, затем Z
/// (внутренние оси), после чего доска переносится в `position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    /// Имя доски (например, "wall.long.front.0")
    pub name: String,
    pub stock: Stock,
    /// Положение центра в дюймах (без разнесения)
    pub position: [f64; 3],
    /// Углы поворота в радианах
    pub rotation: [f64; 3],
    pub length: f64,
    pub width: f64,
    pub thickness: f64,
    #[serde(default = "default_board_color")]
    pub color: [u8; 3],
}

fn default_board_color() -> [u8; 3] {
    BOARD_COLOR
}

impl Board {
    /// Новая доска заданного сортамента, в начале координат, без поворота
    pub fn new(name: impl Into<String>, stock: Stock, length: f64) -> Self {
        let (thickness, width) = stock.section();
        Self {
            name: name.into(),
            stock,
            position: [0.0; 3],
            rotation: [0.0; 3],
            length,
            width,
            thickness,
            color: BOARD_COLOR,
        }
    }

    pub fn at(mut self, x: f64, y: f64, z: f64) -> Self {
        self.position = [x, y, z];
        self
    }

    pub fn rotated(mut self, rx: f64, ry: f64, rz: f64) -> Self {
        self.rotation = [rx, ry, rz];
        self
    }

    /// Положение с учётом коэффициента разнесения
    pub fn exploded_position(&self, explode: f64) -> [f64; 3] {
        [
            self.position[0] * explode,
            self.position[1] * explode,
            self.position[2] * explode,
        ]
    }

    /// Подпись размеров: `1.5" x 5.5" x 96"`
    pub fn dimension_label(&self) -> String {
        format!(
            "{}\" x {}\" x {}\"",
            format_inches(self.thickness),
            format_inches(self.width),
            format_inches(self.length)
        )
    }

    /// Высота шрифта подписи в дюймах
    pub fn label_font_size(&self) -> f64 {
        self.width.max(2.5)
    }

    /// Все размеры конечны и положительны
    pub fn has_valid_dimensions(&self) -> bool {
        [self.length, self.width, self.thickness]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}

/// Вариант конструкции
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    /// Помост (настил на ножках со стенками)
    #[default]
    Platform,
    /// Барная стойка со сплошной столешницей
    Bench,
    /// Барная стойка со столешницей из реек с зазорами
    SlottedBar,
}

impl ModelKind {
    pub fn all() -> &'static [ModelKind] {
        &[ModelKind::Platform, ModelKind::Bench, ModelKind::SlottedBar]
    }

    pub fn slug(&self) -> &'static str {
        match self {
            ModelKind::Platform => "platform",
            ModelKind::Bench => "bench",
            ModelKind::SlottedBar => "slotted-bar",
        }
    }
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKind::all()
            .iter()
            .copied()
            .find(|k| k.slug() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = ModelKind::all().iter().map(|k| k.slug()).collect();
                format!("Unknown model '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// Готовая модель — плоский список досок
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub kind: ModelKind,
    pub boards: Vec<Board>,
}

impl Model {
    /// Количество досок по сортаменту
    pub fn board_count_by_stock(&self) -> BTreeMap<Stock, usize> {
        let mut counts = BTreeMap::new();
        for board in &self.boards {
            *counts.entry(board.stock).or_insert(0) += 1;
        }
        counts
    }
}
