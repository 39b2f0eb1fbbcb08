//! Помост: стенки из 2x6, ножки и обвязка из 2x4, настил, стойки 2x2 и лаги.

use super::{centered_offsets, count, length, LayoutError};
use crate::parameters::{Parameter, ParameterSet, Resolved};
use crate::units::NINETY_DEGREES;
use crate::{Board, Stock};

/// Ширина 2x6 (шаг рядов стенки)
const COURSE: f64 = 5.5;
/// Толщина 2x стандартного пиломатериала
const STOCK_THICKNESS: f64 = 1.5;
const TWO_BY_FOUR_WIDTH: f64 = 3.5;

pub(super) fn default_parameters() -> ParameterSet {
    ParameterSet::from_parameters(vec![
        Parameter::number("feet", 12.0)
            .with_unit("in")
            .with_description("Inches per foot"),
        Parameter::formula("long_width", "8 * feet")
            .with_unit("in")
            .with_description("Long side span"),
        Parameter::formula("short_width", "8 * feet / 3")
            .with_unit("in")
            .with_description("Short side span, a third of a stock length"),
        Parameter::formula("leg_height", "8 * feet / 3")
            .with_unit("in")
            .with_description("Leg length, a third of a stock length"),
        Parameter::number("wall_courses", 3.0).with_description("2x6 courses per wall"),
        Parameter::number("floorboard_count", 5.0).with_description("Deck boards across the floor"),
        Parameter::formula(
            "floorboard_separation",
            "(short_width - 1.5 * 2) / floorboard_count",
        )
        .with_unit("in")
        .with_description("Centre-to-centre floorboard spacing"),
    ])
}

struct Dims {
    long_width: f64,
    short_width: f64,
    leg_height: f64,
    courses: usize,
    floorboards: usize,
    floorboard_separation: f64,
}

impl Dims {
    fn from_resolved(resolved: &Resolved) -> Result<Self, LayoutError> {
        Ok(Self {
            long_width: length(resolved, "long_width")?,
            short_width: length(resolved, "short_width")?,
            leg_height: length(resolved, "leg_height")?,
            courses: count(resolved, "wall_courses")?,
            floorboards: count(resolved, "floorboard_count")?,
            floorboard_separation: length(resolved, "floorboard_separation")?,
        })
    }

    /// Высота стенки из всех рядов
    fn wall_depth(&self) -> f64 {
        COURSE * self.courses as f64
    }

    /// Смещение ножек наружу от короткой стороны
    fn leg_z(&self) -> f64 {
        self.short_width / 2.0 + STOCK_THICKNESS / 2.0
    }
}

pub(super) fn layout(resolved: &Resolved) -> Result<Vec<Board>, LayoutError> {
    let d = Dims::from_resolved(resolved)?;
    let mut boards = Vec::new();

    walls(&d, &mut boards);
    legs(&d, &mut boards);
    caps(&d, &mut boards);
    floorboards(&d, &mut boards);
    vertical_supports(&d, &mut boards);
    crossbars(&d, &mut boards);

    Ok(boards)
}

/// Ряды 2x6 одной стенки, сверху вниз
fn wall(
    d: &Dims,
    name: &str,
    wall_length: f64,
    x: f64,
    z: f64,
    ry: f64,
    out: &mut Vec<Board>,
) {
    let top = d.leg_height - COURSE / 2.0;
    for course in 0..d.courses {
        out.push(
            Board::new(format!("{}.{}", name, course), Stock::TwoBySix, wall_length)
                .at(x, top - COURSE * course as f64, z)
                .rotated(0.0, ry, 0.0),
        );
    }
}

fn walls(d: &Dims, out: &mut Vec<Board>) {
    let long_z = d.short_width / 2.0 - STOCK_THICKNESS / 2.0;
    let short_x = d.long_width / 2.0 + STOCK_THICKNESS / 2.0;

    wall(d, "wall.front", d.long_width, 0.0, long_z, 0.0, out);
    wall(d, "wall.back", d.long_width, 0.0, -long_z, 0.0, out);
    wall(d, "wall.right", d.short_width, short_x, 0.0, NINETY_DEGREES, out);
    wall(d, "wall.left", d.short_width, -short_x, 0.0, NINETY_DEGREES, out);
}

fn legs(d: &Dims, out: &mut Vec<Board>) {
    let half = d.long_width / 2.0;
    let z = d.leg_z();
    let spots = [(0.0, z), (0.0, -z), (half, z), (half, -z), (-half, z), (-half, -z)];

    for (i, (x, z)) in spots.into_iter().enumerate() {
        out.push(
            Board::new(format!("leg.{}", i), Stock::TwoByFour, d.leg_height)
                .at(x, d.leg_height / 2.0, z)
                .rotated(0.0, 0.0, NINETY_DEGREES),
        );
    }
}

fn caps(d: &Dims, out: &mut Vec<Board>) {
    let y = d.leg_height + STOCK_THICKNESS / 2.0;
    let short_length = d.short_width + TWO_BY_FOUR_WIDTH;
    let short_x = d.long_width / 2.0 + TWO_BY_FOUR_WIDTH / 2.0;

    out.push(
        Board::new("cap.front", Stock::TwoByFour, d.long_width)
            .at(0.0, y, d.short_width / 2.0)
            .rotated(-NINETY_DEGREES, 0.0, 0.0),
    );
    out.push(
        Board::new("cap.back", Stock::TwoByFour, d.long_width)
            .at(0.0, y, -d.short_width / 2.0)
            .rotated(-NINETY_DEGREES, 0.0, 0.0),
    );
    out.push(
        Board::new("cap.right", Stock::TwoByFour, short_length)
            .at(short_x, y, 0.0)
            .rotated(-NINETY_DEGREES, 0.0, NINETY_DEGREES),
    );
    out.push(
        Board::new("cap.left", Stock::TwoByFour, short_length)
            .at(-short_x, y, 0.0)
            .rotated(-NINETY_DEGREES, 0.0, NINETY_DEGREES),
    );
}

fn floorboards(d: &Dims, out: &mut Vec<Board>) {
    // Настил на полдюйма выше низа стенки
    let y = d.leg_height - d.wall_depth() + 0.5;

    for (i, z) in centered_offsets(d.floorboards, d.floorboard_separation)
        .into_iter()
        .enumerate()
    {
        out.push(
            Board::new(format!("floorboard.{}", i), Stock::DeckBoard, d.long_width)
                .at(0.0, y, z)
                .rotated(-NINETY_DEGREES, 0.0, 0.0),
        );
    }
}

fn vertical_supports(d: &Dims, out: &mut Vec<Board>) {
    let support_length = d.wall_depth() + STOCK_THICKNESS;
    let y = d.leg_height - support_length / 2.0;
    let quarter = d.long_width / 4.0;
    let z = d.leg_z();
    let spots = [(quarter, z), (-quarter, z), (quarter, -z), (-quarter, -z)];

    for (i, (x, z)) in spots.into_iter().enumerate() {
        out.push(
            Board::new(format!("support.{}", i), Stock::TwoByTwo, support_length)
                .at(x, y, z)
                .rotated(0.0, 0.0, NINETY_DEGREES),
        );
    }
}

fn crossbars(d: &Dims, out: &mut Vec<Board>) {
    let y = d.leg_height - d.wall_depth() - STOCK_THICKNESS / 2.0;
    let half = d.long_width / 2.0;
    let quarter = d.long_width / 4.0;
    let spots = [
        (0.0, Stock::TwoByFour),
        (half, Stock::TwoByFour),
        (-half, Stock::TwoByFour),
        (quarter, Stock::TwoByTwo),
        (-quarter, Stock::TwoByTwo),
    ];

    for (i, (x, stock)) in spots.into_iter().enumerate() {
        out.push(
            Board::new(format!("crossbar.{}", i), stock, d.short_width)
                .at(x, y, 0.0)
                .rotated(NINETY_DEGREES, 0.0, NINETY_DEGREES),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_model, ModelKind};

    const EPS: f64 = 1e-9;

    fn boards() -> Vec<Board> {
        build_model(ModelKind::Platform, &default_parameters())
            .unwrap()
            .boards
    }

    fn named<'a>(boards: &'a [Board], prefix: &str) -> Vec<&'a Board> {
        boards.iter().filter(|b| b.name.starts_with(prefix)).collect()
    }

    #[test]
    fn test_default_board_counts() {
        let boards = boards();
        assert_eq!(named(&boards, "wall.").len(), 12);
        assert_eq!(named(&boards, "leg.").len(), 6);
        assert_eq!(named(&boards, "cap.").len(), 4);
        assert_eq!(named(&boards, "floorboard.").len(), 5);
        assert_eq!(named(&boards, "support.").len(), 4);
        assert_eq!(named(&boards, "crossbar.").len(), 5);
        assert_eq!(boards.len(), 36);
    }

    #[test]
    fn test_wall_courses_step_down_from_top() {
        let boards = boards();
        let front = named(&boards, "wall.front.");
        assert!((front[0].position[1] - (32.0 - 2.75)).abs() < EPS);
        assert!((front[1].position[1] - (32.0 - 2.75 - 5.5)).abs() < EPS);
        assert!((front[2].position[1] - (32.0 - 2.75 - 11.0)).abs() < EPS);
        assert!((front[0].position[2] - 15.25).abs() < EPS);
        assert_eq!(front[0].length, 96.0);

        let right = named(&boards, "wall.right.");
        assert!((right[0].position[0] - 48.75).abs() < EPS);
        assert_eq!(right[0].length, 32.0);
        assert_eq!(right[0].rotation, [0.0, NINETY_DEGREES, 0.0]);
    }

    #[test]
    fn test_legs_stand_on_ground() {
        for leg in named(&boards(), "leg.") {
            assert_eq!(leg.length, 32.0);
            assert!((leg.position[1] - 16.0).abs() < EPS);
            assert!((leg.position[2].abs() - 16.75).abs() < EPS);
            assert_eq!(leg.dimension_label(), "1.5\" x 3.5\" x 32\"");
        }
    }

    #[test]
    fn test_caps_sit_on_legs() {
        let boards = boards();
        let caps = named(&boards, "cap.");
        assert!(caps.iter().all(|c| (c.position[1] - 32.75).abs() < EPS));
        assert_eq!(caps[2].length, 35.5);
        assert!((caps[2].position[0] - 49.75).abs() < EPS);
        assert_eq!(caps[2].rotation, [-NINETY_DEGREES, 0.0, NINETY_DEGREES]);
    }

    #[test]
    fn test_floorboard_spacing() {
        let boards = boards();
        let floor = named(&boards, "floorboard.");
        let zs: Vec<f64> = floor.iter().map(|b| b.position[2]).collect();
        let expected = [-11.6, -5.8, 0.0, 5.8, 11.6];
        for (z, e) in zs.iter().zip(expected) {
            assert!((z - e).abs() < EPS, "{} != {}", z, e);
        }
        assert!(floor.iter().all(|b| (b.position[1] - 16.0).abs() < EPS));
        assert!(floor.iter().all(|b| b.thickness == 1.0 && b.width == 5.5));
    }

    #[test]
    fn test_supports_and_crossbars() {
        let boards = boards();
        let supports = named(&boards, "support.");
        assert!(supports.iter().all(|s| s.length == 18.0));
        assert!(supports.iter().all(|s| (s.position[1] - 23.0).abs() < EPS));
        assert!((supports[0].position[0] - 24.0).abs() < EPS);

        let bars = named(&boards, "crossbar.");
        assert!(bars.iter().all(|b| (b.position[1] - 14.75).abs() < EPS));
        assert_eq!(bars[0].width, 3.5);
        assert_eq!(bars[3].width, 1.5);
        assert_eq!(bars[3].stock, Stock::TwoByTwo);
        assert_eq!(bars[0].rotation, [NINETY_DEGREES, 0.0, NINETY_DEGREES]);
    }

    #[test]
    fn test_more_courses_lower_the_floor() {
        let mut params = default_parameters();
        params.set_number("wall_courses", 4.0).unwrap();
        let model = build_model(ModelKind::Platform, &params).unwrap();
        assert_eq!(named(&model.boards, "wall.").len(), 16);
        let floor = named(&model.boards, "floorboard.");
        assert!((floor[0].position[1] - (32.0 - 22.0 + 0.5)).abs() < EPS);
    }

    #[test]
    fn test_resized_platform_follows_parameters() {
        let mut params = default_parameters();
        params.set_formula("long_width", "10 * feet").unwrap();
        let model = build_model(ModelKind::Platform, &params).unwrap();
        let front = named(&model.boards, "wall.front.");
        assert_eq!(front[0].length, 120.0);
        let legs = named(&model.boards, "leg.");
        assert!((legs[2].position[0] - 60.0).abs() < EPS);
    }
}
