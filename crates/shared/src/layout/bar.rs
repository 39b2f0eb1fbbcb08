//! Барная стойка: рама из 2x4 и столешница из 2x6 или из реек 2x2 с зазорами.

use super::{centered_offsets, count, length, offset, LayoutError};
use crate::parameters::{Parameter, ParameterSet, Resolved};
use crate::units::NINETY_DEGREES;
use crate::{Board, Stock};

const STOCK_THICKNESS: f64 = 1.5;
const TWO_BY_FOUR_WIDTH: f64 = 3.5;
const TWO_BY_SIX_WIDTH: f64 = 5.5;

/// Тип столешницы
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Top {
    /// Сплошные доски 2x6
    Boards,
    /// Рейки 2x2 с зазором `slot_width`
    Slats,
}

pub(super) fn default_parameters(top: Top) -> ParameterSet {
    let mut params = vec![
        Parameter::number("feet", 12.0)
            .with_unit("in")
            .with_description("Inches per foot"),
        Parameter::formula("bar_length", "6 * feet")
            .with_unit("in")
            .with_description("Top length"),
        Parameter::formula("bar_height", "3.5 * feet")
            .with_unit("in")
            .with_description("Height of the top surface"),
        Parameter::number("leg_inset", 6.0)
            .with_unit("in")
            .with_description("Leg distance from the top ends"),
        Parameter::number("footrest_height", 8.0)
            .with_unit("in")
            .with_description("Height of the foot cleats"),
    ];

    match top {
        Top::Boards => {
            params.push(Parameter::number("top_boards", 3.0).with_description("2x6 boards in the top"));
            params.push(
                Parameter::formula("top_width", "top_boards * 5.5")
                    .with_unit("in")
                    .with_description("Top depth"),
            );
        }
        Top::Slats => {
            params.push(Parameter::number("slat_count", 9.0).with_description("2x2 slats in the top"));
            params.push(
                Parameter::number("slot_width", 0.5)
                    .with_unit("in")
                    .with_description("Open gap between slats"),
            );
            params.push(
                Parameter::formula("top_width", "slat_count * 1.5 + (slat_count - 1) * slot_width")
                    .with_unit("in")
                    .with_description("Top depth"),
            );
        }
    }

    ParameterSet::from_parameters(params)
}

struct Dims {
    bar_length: f64,
    bar_height: f64,
    leg_inset: f64,
    footrest_height: f64,
    top_width: f64,
    top_count: usize,
    /// Шаг досок/реек столешницы
    top_pitch: f64,
    top_stock: Stock,
}

impl Dims {
    fn from_resolved(resolved: &Resolved, top: Top) -> Result<Self, LayoutError> {
        let (top_count, top_pitch, top_stock) = match top {
            Top::Boards => (count(resolved, "top_boards")?, TWO_BY_SIX_WIDTH, Stock::TwoBySix),
            Top::Slats => {
                let slot = offset(resolved, "slot_width")?;
                if slot < 0.0 {
                    return Err(LayoutError::InvalidDimension {
                        name: "slot_width".to_string(),
                        value: slot,
                    });
                }
                (count(resolved, "slat_count")?, STOCK_THICKNESS + slot, Stock::TwoByTwo)
            }
        };

        Ok(Self {
            bar_length: length(resolved, "bar_length")?,
            bar_height: length(resolved, "bar_height")?,
            leg_inset: offset(resolved, "leg_inset")?,
            footrest_height: length(resolved, "footrest_height")?,
            top_width: length(resolved, "top_width")?,
            top_count,
            top_pitch,
            top_stock,
        })
    }

    fn leg_x(&self) -> f64 {
        self.bar_length / 2.0 - self.leg_inset
    }

    fn leg_length(&self) -> f64 {
        self.bar_height - STOCK_THICKNESS
    }

    /// Центр планки у внутренней грани пары ножек
    fn cleat_x(&self) -> f64 {
        self.leg_x() - TWO_BY_FOUR_WIDTH / 2.0 - STOCK_THICKNESS / 2.0
    }
}

pub(super) fn layout(resolved: &Resolved, top: Top) -> Result<Vec<Board>, LayoutError> {
    let d = Dims::from_resolved(resolved, top)?;
    let mut boards = Vec::new();

    top_surface(&d, &mut boards);
    legs(&d, &mut boards);
    cleats(&d, &mut boards);
    footrest(&d, &mut boards);

    Ok(boards)
}

fn top_surface(d: &Dims, out: &mut Vec<Board>) {
    let y = d.bar_height - STOCK_THICKNESS / 2.0;
    let prefix = match d.top_stock {
        Stock::TwoByTwo => "slat",
        _ => "top",
    };

    for (i, z) in centered_offsets(d.top_count, d.top_pitch).into_iter().enumerate() {
        out.push(
            Board::new(format!("{}.{}", prefix, i), d.top_stock, d.bar_length)
                .at(0.0, y, z)
                .rotated(-NINETY_DEGREES, 0.0, 0.0),
        );
    }
}

fn legs(d: &Dims, out: &mut Vec<Board>) {
    let x = d.leg_x();
    let z = d.top_width / 2.0 - STOCK_THICKNESS / 2.0;
    let leg_length = d.leg_length();
    let spots = [(x, z), (x, -z), (-x, z), (-x, -z)];

    for (i, (x, z)) in spots.into_iter().enumerate() {
        out.push(
            Board::new(format!("leg.{}", i), Stock::TwoByFour, leg_length)
                .at(x, leg_length / 2.0, z)
                .rotated(0.0, 0.0, NINETY_DEGREES),
        );
    }
}

fn cleats(d: &Dims, out: &mut Vec<Board>) {
    let cleat_length = d.top_width - 2.0 * STOCK_THICKNESS;
    let top_y = d.bar_height - STOCK_THICKNESS - TWO_BY_FOUR_WIDTH / 2.0;
    let x = d.cleat_x();

    for (name, y) in [("cleat.top", top_y), ("cleat.foot", d.footrest_height)] {
        for (side, x) in [("right", x), ("left", -x)] {
            out.push(
                Board::new(format!("{}.{}", name, side), Stock::TwoByFour, cleat_length)
                    .at(x, y, 0.0)
                    .rotated(0.0, NINETY_DEGREES, 0.0),
            );
        }
    }
}

fn footrest(d: &Dims, out: &mut Vec<Board>) {
    let rail_length = d.bar_length - 2.0 * d.leg_inset - TWO_BY_FOUR_WIDTH;
    let y = d.footrest_height + TWO_BY_FOUR_WIDTH / 2.0 + STOCK_THICKNESS / 2.0;

    out.push(
        Board::new("footrest", Stock::TwoByFour, rail_length)
            .at(0.0, y, 0.0)
            .rotated(-NINETY_DEGREES, 0.0, 0.0),
    );
}
